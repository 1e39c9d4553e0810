#![deny(missing_docs)]
//! Zenwallet core: the native contract runtime and the keyring bootstrap.
//!
//! The api crate defines what a wallet does; this crate makes it do it.
//! [Ed25519Runtime] executes the cryptographic contracts in-process, and
//! [ensure_keyring] brings a deployment's key material into a known good
//! state before the first request is signed.

pub mod config;
pub use config::Config;

pub mod gql;

mod runtime;
pub use runtime::Ed25519Runtime;

mod bootstrap;
pub use bootstrap::{ensure_keyring, load_keyring};
