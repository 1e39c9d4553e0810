#![deny(missing_docs)]
//! Zenwallet API contains the wallet types, the request signing workflow,
//! and the traits required to plug in a cryptographic contract runtime.
//!
//! If you want a working wallet, pair this with the native runtime and
//! keyring bootstrap in the zenwallet_core crate and the ledger client in
//! zenwallet_client.

mod error;
pub use error::*;

pub mod keyring;
pub use keyring::{Keyring, PublicKeyBundle};

pub mod runtime;
pub use runtime::{Contract, ContractRuntime, DynContractRuntime};

pub mod sign;
pub use sign::{
    verify_request, AuthHeaders, GqlData, IdentityHeader, SignedGql,
    VerifyGql, VerifyOutput, IDENTITY_HEADER, PUBLIC_KEY_HEADER,
    SIGNATURE_HEADER,
};

pub mod ledger;
pub use ledger::*;

mod timestamp;
pub use timestamp::*;
