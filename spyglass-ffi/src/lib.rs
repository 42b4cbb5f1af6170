// spyglass-ffi: #[repr(C)] types shared across the engine bridge.
// Zero external dependencies. This crate defines the complete contract
// between the native console plugin and the embedding engine's runtime.

pub mod status;
pub mod log_type;
pub mod callbacks;

pub use status::*;
pub use log_type::*;
pub use callbacks::*;
