pub mod easing;
pub mod geodesy;
pub mod zoom;

pub use easing::*;
pub use geodesy::*;
pub use zoom::*;
