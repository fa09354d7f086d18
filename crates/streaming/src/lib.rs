pub mod protocol;
pub mod request;
pub mod residency;
pub mod sync;

pub use protocol::*;
pub use request::*;
pub use residency::*;
pub use sync::*;
