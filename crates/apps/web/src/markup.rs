//! HTML for the prism faces. Every API string goes through [`escape`].

use foundation::ids::HechoId;
use prism::{ComparisonColumns, SourceColumn};
use std::fmt::Write;
use streaming::protocol::Hecho;

pub const LOADING_HTML: &str = r#"<div class="face-loading">Cargando…</div>"#;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Event cards, one per hecho, tagged with their feed position.
pub fn feed_html(hechos: &[Hecho]) -> String {
    let mut html = String::new();
    for (i, h) in hechos.iter().enumerate() {
        let _ = write!(
            html,
            r#"<article class="hecho-card" data-index="{i}" data-id="{}"><time>{}</time><p>{}</p>"#,
            escape(h.id.as_str()),
            escape(&h.date),
            escape(&h.text),
        );
        if let Some(m) = h.macroevento.as_deref().filter(|m| !m.is_empty()) {
            let _ = write!(html, r#"<span class="macro">{}</span>"#, escape(m));
        }
        html.push_str("</article>");
    }
    html
}

pub fn header_html(selected: Option<&Hecho>, index: usize, total: usize) -> String {
    match selected {
        Some(h) => format!(
            r#"<span class="position">{} / {total}</span><span class="title">{}</span>"#,
            index + 1,
            escape(&h.text)
        ),
        None => String::new(),
    }
}

/// Escaped link target, or `None` unless the scheme is http or https.
fn safe_href(link: &str) -> Option<String> {
    let link = link.trim();
    let lower = link.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")).then(|| escape(link))
}

fn column_html(html: &mut String, side: &str, column: Option<&SourceColumn>) {
    let _ = write!(html, r#"<section class="source-column {side}">"#);
    if let Some(col) = column {
        let _ = write!(html, "<h3>{}</h3>", escape(&col.medio));
        for a in &col.articles {
            let body = format!("<h4>{}</h4><p>{}</p>", escape(&a.titulo), escape(&a.summary));
            match safe_href(&a.link) {
                Some(href) => {
                    let _ = write!(
                        html,
                        r#"<a class="article" href="{href}" target="_blank" rel="noopener">{body}</a>"#
                    );
                }
                None => {
                    let _ = write!(html, r#"<div class="article">{body}</div>"#);
                }
            }
        }
    }
    html.push_str("</section>");
}

pub fn comparison_html(hecho: &HechoId, columns: &ComparisonColumns) -> String {
    if columns.is_empty() {
        return r#"<div class="face-empty">Sin cobertura</div>"#.to_string();
    }
    let mut html = format!(r#"<div class="comparison" data-id="{}">"#, escape(hecho.as_str()));
    column_html(&mut html, "left", columns.left.as_ref());
    column_html(&mut html, "right", columns.right.as_ref());
    if !columns.other_sources.is_empty() {
        let names: Vec<String> = columns.other_sources.iter().map(|s| escape(s)).collect();
        let _ = write!(html, r#"<footer class="other-sources">{}</footer>"#, names.join(", "));
    }
    html.push_str("</div>");
    html
}

pub fn timeline_html(macro_name: Option<&str>, hechos: &[Hecho], selected: Option<&HechoId>) -> String {
    let Some(name) = macro_name else {
        return r#"<div class="face-empty">Sin macroevento</div>"#.to_string();
    };
    let mut html = format!("<h3>{}</h3><ol class=\"timeline\">", escape(name));
    for h in hechos {
        let class = if Some(&h.id) == selected { "node selected" } else { "node" };
        let _ = write!(
            html,
            r#"<li class="{class}" data-id="{}"><time>{}</time><p>{}</p></li>"#,
            escape(h.id.as_str()),
            escape(&h.date),
            escape(&h.text),
        );
    }
    html.push_str("</ol>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use streaming::protocol::Article;

    #[test]
    fn api_text_is_escaped() {
        assert_eq!(escape(r#"<b>"A&B"</b>"#), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
        let html = feed_html(&[Hecho::new("H1", "2025-06-28", "<script>")]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn cards_carry_index_and_id() {
        let mut h = Hecho::new("H2", "2025-06-28", "b");
        h.macroevento = Some("Cumbre".to_string());
        let html = feed_html(&[Hecho::new("H1", "2025-06-28", "a"), h]);
        assert!(html.contains(r#"data-index="1" data-id="H2""#));
        assert!(html.contains(r#"<span class="macro">Cumbre</span>"#));
        assert_eq!(html.matches("<article").count(), 2);
    }

    #[test]
    fn timeline_marks_selected_node() {
        let hechos = [Hecho::new("H1", "d1", "a"), Hecho::new("H2", "d2", "b")];
        let html = timeline_html(Some("Cumbre"), &hechos, Some(&HechoId::from("H2")));
        assert!(html.contains(r#"<li class="node selected" data-id="H2">"#));
        assert!(html.contains(r#"<li class="node" data-id="H1">"#));
        assert!(timeline_html(None, &[], None).contains("face-empty"));
    }

    #[test]
    fn comparison_lists_both_columns() {
        let articles = vec![
            Article {
                medio: "ABC".to_string(),
                titulo: "t1".to_string(),
                ..Article::default()
            },
            Article {
                medio: "El País".to_string(),
                titulo: "t2".to_string(),
                ..Article::default()
            },
        ];
        let columns = ComparisonColumns::build(&articles, &[]);
        let html = comparison_html(&HechoId::from("H1"), &columns);
        assert!(html.contains("<h3>ABC</h3>"));
        assert!(html.contains("<h3>El País</h3>"));
        assert_eq!(header_html(None, 0, 0), "");
    }

    #[test]
    fn only_web_links_become_anchors() {
        let article = |medio: &str, link: &str| Article {
            medio: medio.to_string(),
            titulo: "t".to_string(),
            link: link.to_string(),
            ..Article::default()
        };
        let articles = vec![
            article("ABC", " JavaScript:alert(1)"),
            article("El País", "https://elpais.com/a?x=1&y=2"),
        ];
        let columns = ComparisonColumns::build(&articles, &[]);
        let html = comparison_html(&HechoId::from("H1"), &columns);
        assert!(!html.to_ascii_lowercase().contains("javascript:"));
        assert!(html.contains(r#"<div class="article"><h4>t</h4><p></p></div>"#));
        assert!(html.contains(r#"href="https://elpais.com/a?x=1&amp;y=2""#));

        assert_eq!(safe_href("HTTP://abc.es"), Some("HTTP://abc.es".to_string()));
        assert_eq!(safe_href("data:text/html,x"), None);
        assert_eq!(safe_href(""), None);
    }
}
