//! End-to-end tests against an in-process movie service.

#[path = "../support/mod.rs"]
mod support;

mod auth;
#[cfg(feature = "file-store")]
mod restart;
mod transport;
