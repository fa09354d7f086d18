//! JSON types and endpoint catalogue of the news API.
//!
//! The API is a read-only data source. Every list endpoint returns a JSON
//! array; fields the server may omit are `#[serde(default)]`.

use foundation::ids::HechoId;
use serde::{Deserialize, Serialize};

/// Geolocated news item (`/api/news`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsItem {
    pub city: String,
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    pub date: String,
}

/// Calendar dot (`/api/dates`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCount {
    pub date: String,
    #[serde(default)]
    pub count: u32,
}

/// Topic filter option (`/api/topics`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: String,
    #[serde(default)]
    pub count: u32,
}

/// Macro-event grouping hechos (`/api/macros`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroEvent {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// News fact. Timeline entries carry only `id`, `date` and `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hecho {
    pub id: HechoId,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub macroevento: Option<String>,
    #[serde(default)]
    pub newspapers: Vec<String>,
}

impl Hecho {
    pub fn new(id: impl Into<HechoId>, date: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            text: text.into(),
            macroevento: None,
            newspapers: Vec::new(),
        }
    }
}

/// Source article covering a hecho (`/api/hecho/{id}/articles`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub medio: String,
    pub titulo: String,
    pub summary: String,
    pub link: String,
}

/// Every endpoint the front end consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    News {
        date: Option<String>,
        topic: Option<String>,
    },
    Dates {
        topic: Option<String>,
    },
    Topics,
    Macros {
        with_timeline: bool,
        topic: Option<String>,
    },
    Timeline {
        macro_name: String,
    },
    RecentHechos,
    HechosByDate {
        date: String,
    },
    HechoArticles {
        id: HechoId,
    },
}

/// Decoded response body, one variant per payload shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPayload {
    News(Vec<NewsItem>),
    Dates(Vec<DateCount>),
    Topics(Vec<TopicCount>),
    Macros(Vec<MacroEvent>),
    Hechos(Vec<Hecho>),
    Articles(Vec<Article>),
}

impl FetchPayload {
    pub fn len(&self) -> usize {
        match self {
            FetchPayload::News(v) => v.len(),
            FetchPayload::Dates(v) => v.len(),
            FetchPayload::Topics(v) => v.len(),
            FetchPayload::Macros(v) => v.len(),
            FetchPayload::Hechos(v) => v.len(),
            FetchPayload::Articles(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Server answered with a non-success status.
    Status { path: String, status: u16 },
    /// Body did not match the endpoint's shape.
    Decode { path: String, message: String },
    /// Request never produced a response.
    Transport { path: String, message: String },
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Status { path, status } => {
                write!(f, "{path}: unexpected status {status}")
            }
            ProtocolError::Decode { path, message } => {
                write!(f, "{path}: invalid body: {message}")
            }
            ProtocolError::Transport { path, message } => {
                write!(f, "{path}: request failed: {message}")
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

fn push_query(path: &mut String, params: &[(&str, &Option<String>)]) {
    let mut first = true;
    for (name, value) in params {
        let Some(value) = value.as_deref().filter(|v| !v.is_empty()) else {
            continue;
        };
        path.push(if first { '?' } else { '&' });
        first = false;
        path.push_str(name);
        path.push('=');
        path.push_str(&urlencoding::encode(value));
    }
}

impl Endpoint {
    /// Path plus query, with every dynamic segment URL-encoded.
    pub fn path(&self) -> String {
        match self {
            Endpoint::News { date, topic } => {
                let mut p = "/api/news".to_string();
                push_query(&mut p, &[("date", date), ("topic", topic)]);
                p
            }
            Endpoint::Dates { topic } => {
                let mut p = "/api/dates".to_string();
                push_query(&mut p, &[("topic", topic)]);
                p
            }
            Endpoint::Topics => "/api/topics".to_string(),
            Endpoint::Macros {
                with_timeline,
                topic,
            } => {
                let mut p = if *with_timeline {
                    "/api/macros/timeline".to_string()
                } else {
                    "/api/macros".to_string()
                };
                push_query(&mut p, &[("topic", topic)]);
                p
            }
            Endpoint::Timeline { macro_name } => {
                format!("/api/timeline/{}", urlencoding::encode(macro_name))
            }
            Endpoint::RecentHechos => "/api/hechos/recent".to_string(),
            Endpoint::HechosByDate { date } => {
                format!("/api/hechos/by-date/{}", urlencoding::encode(date))
            }
            Endpoint::HechoArticles { id } => {
                format!("/api/hecho/{}/articles", urlencoding::encode(id.as_str()))
            }
        }
    }

    /// Absolute URL against `base` (trailing slashes tolerated; empty base
    /// yields a same-origin relative path).
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }

    /// Parses a response body into the payload this endpoint returns.
    pub fn decode(&self, body: &str) -> Result<FetchPayload, ProtocolError> {
        let err = |e: serde_json::Error| ProtocolError::Decode {
            path: self.path(),
            message: e.to_string(),
        };
        let payload = match self {
            Endpoint::News { .. } => FetchPayload::News(serde_json::from_str(body).map_err(err)?),
            Endpoint::Dates { .. } => FetchPayload::Dates(serde_json::from_str(body).map_err(err)?),
            Endpoint::Topics => FetchPayload::Topics(serde_json::from_str(body).map_err(err)?),
            Endpoint::Macros { .. } => {
                FetchPayload::Macros(serde_json::from_str(body).map_err(err)?)
            }
            Endpoint::Timeline { .. } | Endpoint::RecentHechos | Endpoint::HechosByDate { .. } => {
                FetchPayload::Hechos(serde_json::from_str(body).map_err(err)?)
            }
            Endpoint::HechoArticles { .. } => {
                FetchPayload::Articles(serde_json::from_str(body).map_err(err)?)
            }
        };
        Ok(payload)
    }
}
