//! crates/domains/src/lib.rs
//!
//! The content model and interface definitions for the Pixel site.
//! Nothing in this crate performs I/O.

pub mod content;
pub mod edit;
pub mod errors;
pub mod icons;
pub mod media;
pub mod models;
pub mod ports;
pub mod session;
pub mod slot;
pub mod views;

// Re-exporting for easier access in other crates
pub use content::*;
pub use errors::*;
pub use media::*;
pub use models::*;
pub use ports::*;
pub use session::Session;
pub use slot::*;
