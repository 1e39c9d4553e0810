//! The cryptographic contract runtime boundary.
//!
//! Every cryptographic operation the wallet performs is expressed as one of
//! a small fixed set of [Contract]s executed against a [ContractRuntime].
//! The contracts take up to two json context documents, by convention named
//! data (per-call input) and keys (key material), and produce a json result.
//!
//! This module is agnostic to how contracts are executed. The default
//! runtime in the core crate executes them natively; the same trait can
//! front an external vm executing the contracts as scripts, which is where
//! the data/keys split and the json-in/json-out shape come from. Execution
//! is synchronous, callers that need a timeout enforce it themselves.

use crate::*;
use std::sync::Arc;

/// The cryptographic contracts the wallet invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contract {
    /// Generate a fresh private keyring. Takes no contexts, returns the
    /// keyring envelope.
    CreateKeyring,

    /// Derive the public key bundle from a keyring. Takes the keyring
    /// envelope as the keys context, returns the bundle.
    CreatePublicKey,

    /// Sign a base64 graphql payload. Data context: `{"gql": <base64>}`.
    /// Keys context: the keyring envelope. Returns the signature, the
    /// canonical payload base64, and the payload hash.
    SignGraphql,

    /// Verify a signature over a base64 payload. Data context carries
    /// `gql`, `eddsa_signature`, `eddsa_public_key`. Returns
    /// `{"output":["1"]}` when the signature is authentic.
    VerifyGraphql,
}

impl Contract {
    /// The script-style name of this contract, for logs and error context.
    pub fn name(&self) -> &'static str {
        match self {
            Contract::CreateKeyring => "create_keyring",
            Contract::CreatePublicKey => "create_public_key",
            Contract::SignGraphql => "sign_graphql",
            Contract::VerifyGraphql => "verify_graphql",
        }
    }
}

impl std::fmt::Display for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Defines a type capable of executing cryptographic contracts.
pub trait ContractRuntime: 'static + Send + Sync + std::fmt::Debug {
    /// Execute a contract with optional data and keys contexts, returning
    /// the contract's json result.
    fn exec(
        &self,
        contract: Contract,
        data: Option<&str>,
        keys: Option<&str>,
    ) -> WalletResult<String>;
}

/// Trait-object [ContractRuntime].
pub type DynContractRuntime = Arc<dyn ContractRuntime>;
