use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a news fact ("hecho"), as issued by the API.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HechoId(String);

impl HechoId {
    pub fn new(id: impl Into<String>) -> Self {
        HechoId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HechoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HechoId {
    fn from(s: &str) -> Self {
        HechoId(s.to_string())
    }
}

impl From<String> for HechoId {
    fn from(s: String) -> Self {
        HechoId(s)
    }
}

/// One of the three content faces of the prism carousel.
///
/// Faces form a closed ring: index arithmetic is always mod 3.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceId {
    /// Side-by-side source coverage columns.
    Comparison,
    /// Scrollable feed of hecho cards.
    Events,
    /// Vertical list of hechos for the active macro-event.
    Timeline,
}

impl FaceId {
    pub const COUNT: usize = 3;
    pub const ALL: [FaceId; 3] = [FaceId::Comparison, FaceId::Events, FaceId::Timeline];

    /// Maps any (possibly negative) ring position onto a face.
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(Self::COUNT as i64) as usize]
    }

    pub fn index(self) -> usize {
        match self {
            FaceId::Comparison => 0,
            FaceId::Events => 1,
            FaceId::Timeline => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() as i64 + 1)
    }

    pub fn prev(self) -> Self {
        Self::from_index(self.index() as i64 - 1)
    }

    /// Faces whose content is fetched asynchronously per selected hecho.
    pub fn loads_async(self) -> bool {
        !matches!(self, FaceId::Events)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FaceId::Comparison => "comparison",
            FaceId::Events => "events",
            FaceId::Timeline => "timeline",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

#[cfg(test)]
mod tests {
    use super::{FaceId, HechoId};

    #[test]
    fn face_ring_wraps_both_ways() {
        assert_eq!(FaceId::from_index(3), FaceId::Comparison);
        assert_eq!(FaceId::from_index(-1), FaceId::Timeline);
        assert_eq!(FaceId::Timeline.next(), FaceId::Comparison);
        assert_eq!(FaceId::Comparison.prev(), FaceId::Timeline);
        assert_eq!(FaceId::Events.next().prev(), FaceId::Events);
        assert_eq!(FaceId::parse("timeline"), Some(FaceId::Timeline));
        assert_eq!(FaceId::parse("front"), None);
    }

    #[test]
    fn hecho_id_is_transparent_in_json() {
        let id: HechoId = serde_json::from_str("\"H42\"").unwrap();
        assert_eq!(id, HechoId::from("H42"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"H42\"");
    }
}
