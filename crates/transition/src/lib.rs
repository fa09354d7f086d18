//! Orbital ⇄ tile engine hand-off for one globe instance.
//!
//! The controller owns no rendering: it drives two engines and two DOM layers
//! through the traits in [`surface`], with time passed in on every call.

pub mod controller;
pub mod markers;
pub mod profile;
pub mod state;
pub mod surface;
pub mod tap;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::*;
pub use markers::*;
pub use profile::*;
pub use state::*;
pub use surface::*;
pub use tap::*;
