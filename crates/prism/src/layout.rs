use serde::{Deserialize, Serialize};

/// Page-wide presentation mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Faces on a rotating 3D prism, one visible at a time.
    #[default]
    Phone,
    /// Three side-by-side panels.
    Desktop,
    /// Prism hidden, globe takes the whole page.
    FullscreenGlobe,
}

impl LayoutMode {
    /// Breakpoint check used on load and resize.
    pub fn for_width(width_px: f64, breakpoint_px: f64) -> Self {
        if width_px < breakpoint_px {
            LayoutMode::Phone
        } else {
            LayoutMode::Desktop
        }
    }

    pub fn shows_prism(self) -> bool {
        !matches!(self, LayoutMode::FullscreenGlobe)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::Phone => "phone",
            LayoutMode::Desktop => "desktop",
            LayoutMode::FullscreenGlobe => "fullscreen_globe",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "phone" => Some(LayoutMode::Phone),
            "desktop" => Some(LayoutMode::Desktop),
            "fullscreen_globe" | "fullscreen" => Some(LayoutMode::FullscreenGlobe),
            _ => None,
        }
    }
}
