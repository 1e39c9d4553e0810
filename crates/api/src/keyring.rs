//! Wallet key material.
//!
//! The private keyring lives on disk as `keyring.json` and travels to the
//! contract runtime as the keys context. Both use the same envelope:
//!
//! ```json
//! { "keyring": { "eddsa": "<base58 secret key>" } }
//! ```
//!
//! The derived public half is persisted separately as `public_keys.json`:
//!
//! ```json
//! { "eddsa_public_key": "<base58 public key>" }
//! ```
//!
//! Key strings are plain base58, no checksum, as produced by the
//! create-keyring contract. The field names are algorithm-tagged so
//! additional algorithms can be added alongside `eddsa` without changing
//! the envelope.

use crate::*;

/// Private key material for one wallet identity.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Keyring {
    /// Base58 encoded ed25519 secret key.
    pub eddsa: String,
}

impl Keyring {
    /// Decode a keyring from its json envelope.
    ///
    /// This is the single parse path for key material: both the result of
    /// the create-keyring contract and a reloaded `keyring.json` go through
    /// here, so a corrupt file fails loudly at load time rather than
    /// producing undiagnosable signing failures later.
    pub fn decode(encoded: &[u8]) -> WalletResult<Self> {
        #[derive(serde::Deserialize)]
        struct Ref {
            keyring: Keyring,
        }
        let v: Ref = serde_json::from_slice(encoded)
            .map_err(|e| WalletError::crypto_src("decoding keyring", e))?;
        Ok(v.keyring)
    }

    /// Get the canonical json envelope of this keyring.
    ///
    /// The same bytes serve as the `keyring.json` file content and as the
    /// keys context handed to signing contracts.
    pub fn encode(&self) -> WalletResult<String> {
        #[derive(serde::Serialize)]
        struct Ref<'a> {
            keyring: &'a Keyring,
        }
        serde_json::to_string(&Ref { keyring: self })
            .map_err(|e| WalletError::crypto_src("encoding keyring", e))
    }
}

/// Public counterpart of a [Keyring], safe to publish.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PublicKeyBundle {
    /// Base58 encoded ed25519 public key.
    pub eddsa_public_key: String,
}

impl PublicKeyBundle {
    /// Decode a bundle from its json encoding.
    pub fn decode(encoded: &[u8]) -> WalletResult<Self> {
        serde_json::from_slice(encoded)
            .map_err(|e| WalletError::crypto_src("decoding public keys", e))
    }

    /// Get the canonical json encoding of this bundle.
    pub fn encode(&self) -> WalletResult<String> {
        serde_json::to_string(self)
            .map_err(|e| WalletError::crypto_src("encoding public keys", e))
    }
}
