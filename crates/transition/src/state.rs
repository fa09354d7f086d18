use serde::{Deserialize, Serialize};

/// Which engine owns the view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// Orbital globe interactive, tile layer hidden.
    #[default]
    Orbital,
    /// Orbital still interactive; tile layer displayed invisibly and kept in
    /// sync so tiles are warm when the hand-off starts.
    Preload,
    /// Cross-fade in flight; neither layer accepts input.
    Transitioning,
    /// Tile map interactive, orbital canvas hidden.
    Local,
}

impl EngineState {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineState::Orbital => "orbital",
            EngineState::Preload => "preload",
            EngineState::Transitioning => "transitioning",
            EngineState::Local => "local",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ToLocal,
    ToOrbital,
}

/// The independent globe instances on the page.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobeId {
    Main,
    Desktop,
    Phone,
}

impl GlobeId {
    pub const ALL: [GlobeId; 3] = [GlobeId::Main, GlobeId::Desktop, GlobeId::Phone];

    pub fn as_str(self) -> &'static str {
        match self {
            GlobeId::Main => "main",
            GlobeId::Desktop => "desktop",
            GlobeId::Phone => "phone",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "main" => Some(GlobeId::Main),
            "desktop" => Some(GlobeId::Desktop),
            "phone" => Some(GlobeId::Phone),
            _ => None,
        }
    }
}
