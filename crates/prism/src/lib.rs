//! Three-face news carousel: rotation, gestures, scroll-driven selection and
//! the shared reading-flow sequence.

pub mod comparison;
pub mod config;
pub mod controller;
pub mod gesture;
pub mod layout;
pub mod rotation;
pub mod scroll;
pub mod sequence;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use comparison::*;
pub use config::*;
pub use controller::*;
pub use gesture::*;
pub use layout::*;
pub use rotation::*;
pub use scroll::*;
pub use sequence::*;
pub use view::*;
