use std::collections::BTreeMap;

use streaming::protocol::Article;

/// Label for articles that came without a source name.
pub const UNKNOWN_SOURCE: &str = "Sin fuente";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumn {
    pub medio: String,
    pub articles: Vec<Article>,
}

/// Side-by-side coverage of one hecho by two sources.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComparisonColumns {
    pub left: Option<SourceColumn>,
    pub right: Option<SourceColumn>,
    /// Sources with coverage that did not get a column.
    pub other_sources: Vec<String>,
}

impl ComparisonColumns {
    /// Groups `articles` by source and picks two columns: preferred sources
    /// first (in the given order), then by article count, ties by name.
    pub fn build(articles: &[Article], preferred: &[String]) -> Self {
        let mut by_source: BTreeMap<String, Vec<Article>> = BTreeMap::new();
        for a in articles {
            let medio = a.medio.trim();
            let medio = if medio.is_empty() { UNKNOWN_SOURCE } else { medio };
            by_source.entry(medio.to_string()).or_default().push(a.clone());
        }

        let mut ranked: Vec<(String, Vec<Article>)> = Vec::with_capacity(by_source.len());
        for name in preferred {
            if let Some(list) = by_source.remove(name) {
                ranked.push((name.clone(), list));
            }
        }
        let mut rest: Vec<(String, Vec<Article>)> = by_source.into_iter().collect();
        rest.sort_by(|(na, a), (nb, b)| b.len().cmp(&a.len()).then_with(|| na.cmp(nb)));
        ranked.extend(rest);

        let mut iter = ranked.into_iter();
        let left = iter.next().map(|(medio, articles)| SourceColumn { medio, articles });
        let right = iter.next().map(|(medio, articles)| SourceColumn { medio, articles });
        Self {
            left,
            right,
            other_sources: iter.map(|(name, _)| name).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{ComparisonColumns, UNKNOWN_SOURCE};
    use pretty_assertions::assert_eq;
    use streaming::protocol::Article;

    fn art(medio: &str, titulo: &str) -> Article {
        Article {
            medio: medio.to_string(),
            titulo: titulo.to_string(),
            ..Article::default()
        }
    }

    #[test]
    fn most_covered_sources_win_ties_by_name() {
        let articles = vec![
            art("El Mundo", "1"),
            art("ABC", "2"),
            art("El País", "3"),
            art("El País", "4"),
            art("ABC", "5"),
            art("", "6"),
        ];
        let cols = ComparisonColumns::build(&articles, &[]);
        let left = cols.left.unwrap();
        let right = cols.right.unwrap();
        assert_eq!(left.medio, "ABC");
        assert_eq!(left.articles.len(), 2);
        assert_eq!(right.medio, "El País");
        assert_eq!(
            cols.other_sources,
            vec!["El Mundo".to_string(), UNKNOWN_SOURCE.to_string()]
        );
    }

    #[test]
    fn preferred_sources_come_first_when_present() {
        let articles = vec![art("ABC", "1"), art("ABC", "2"), art("elDiario.es", "3")];
        let preferred = vec!["La Razón".to_string(), "elDiario.es".to_string()];
        let cols = ComparisonColumns::build(&articles, &preferred);
        assert_eq!(cols.left.unwrap().medio, "elDiario.es");
        assert_eq!(cols.right.unwrap().medio, "ABC");
        assert!(cols.other_sources.is_empty());
    }

    #[test]
    fn no_articles_no_columns() {
        let cols = ComparisonColumns::build(&[], &[]);
        assert!(cols.is_empty());
        assert_eq!(cols.right, None);
    }
}
