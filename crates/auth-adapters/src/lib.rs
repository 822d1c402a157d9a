//! crates/auth-adapters/src/lib.rs
//!
//! `AuthProvider` implementations: a local argon2 admin account and the
//! hosted email/password service.

#[cfg(feature = "auth-simple")]
pub mod simple;

#[cfg(feature = "auth-hosted")]
pub mod hosted;

#[cfg(feature = "auth-simple")]
pub use simple::{hash_password, SimpleAuthProvider};

#[cfg(feature = "auth-hosted")]
pub use hosted::HostedAuthProvider;
