//! Request signing and authentication headers.
//!
//! Ledger requests are authenticated by a detached EdDSA signature over the
//! request payload, carried in http headers alongside an identity header:
//!
//! - [SIGNATURE_HEADER] -- base64 signature over the serialized payload.
//! - [IDENTITY_HEADER] -- an opaque owner identity chosen by the caller.
//! - [PUBLIC_KEY_HEADER] -- alternatively, the signer's public key, for
//!   ledgers that resolve identity from key material.
//!
//! The payload is canonicalized before signing: serialize to json, then
//! base64 (standard alphabet, padded). The base64 string is what travels to
//! the signing contract in the data context, wrapped as `{"gql": ...}`.
//! Whatever identity value the caller supplies is passed through to the
//! header byte-for-byte; no validation or resolution happens here.
//!
//! #### Cryptography
//!
//! This module is agnostic to how signatures are produced. Signing and
//! verification go through the [ContractRuntime] trait; by convention the
//! signature is ed25519 and key strings are base58, but that convention
//! lives entirely in the runtime implementation.

use crate::*;

/// Name of the http header carrying the payload signature.
pub const SIGNATURE_HEADER: &str = "zenflows-sign";

/// Name of the http header carrying the caller-supplied owner identity.
pub const IDENTITY_HEADER: &str = "zenflows-id";

/// Name of the http header carrying the signer's public key.
pub const PUBLIC_KEY_HEADER: &str = "zenflows-key";

/// Data context for [Contract::SignGraphql].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GqlData {
    /// Base64 of the serialized payload.
    pub gql: String,
}

/// Result of [Contract::SignGraphql].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignedGql {
    /// Base64 detached signature over the payload.
    pub eddsa_signature: String,

    /// Canonical base64 of the payload that was signed.
    pub gql: String,

    /// Lowercase hex digest of the payload that was signed.
    pub hash: String,
}

/// Data context for [Contract::VerifyGraphql].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VerifyGql {
    /// Base64 of the payload the signature claims to cover.
    pub gql: String,

    /// Base64 detached signature.
    pub eddsa_signature: String,

    /// Base58 public key to verify against.
    pub eddsa_public_key: String,
}

/// Result of [Contract::VerifyGraphql].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VerifyOutput {
    /// Contract output lines. `["1"]` means the signature is authentic.
    pub output: Vec<String>,
}

/// Which identity header accompanies a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityHeader {
    /// An opaque owner identity, sent as [IDENTITY_HEADER]. The wallet
    /// never interprets this value.
    OwnerId(String),

    /// The signer's base58 public key, sent as [PUBLIC_KEY_HEADER].
    PublicKey(String),
}

/// Authentication headers for one signed ledger request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    /// Base64 signature over the serialized payload.
    pub signature: String,

    /// The identity header accompanying the signature.
    pub identity: IdentityHeader,
}

impl AuthHeaders {
    /// Generate auth headers by signing a payload with a keyring.
    ///
    /// The `owner_id` is attached as the identity header exactly as
    /// supplied. Any failing step rejects the whole operation with that
    /// step's error; nothing is written and nothing is retried.
    pub fn sign<R, P>(
        runtime: &R,
        payload: &P,
        keyring: &Keyring,
        owner_id: impl Into<String>,
    ) -> WalletResult<Self>
    where
        R: ContractRuntime + ?Sized,
        P: serde::Serialize,
    {
        let signature = sign_payload(runtime, payload, keyring)?;
        Ok(Self {
            signature,
            identity: IdentityHeader::OwnerId(owner_id.into()),
        })
    }

    /// Generate auth headers using the keyring's own public key as the
    /// identity, for ledgers that authenticate by key material instead of
    /// an owner id.
    pub fn sign_with_public_key<R, P>(
        runtime: &R,
        payload: &P,
        keyring: &Keyring,
    ) -> WalletResult<Self>
    where
        R: ContractRuntime + ?Sized,
        P: serde::Serialize,
    {
        let signature = sign_payload(runtime, payload, keyring)?;
        let keys = keyring.encode()?;
        let result =
            runtime.exec(Contract::CreatePublicKey, None, Some(&keys))?;
        let bundle = PublicKeyBundle::decode(result.as_bytes())?;
        Ok(Self {
            signature,
            identity: IdentityHeader::PublicKey(bundle.eddsa_public_key),
        })
    }

    /// The `(header name, value)` pairs to attach to the request.
    pub fn header_pairs(&self) -> [(&'static str, &str); 2] {
        match &self.identity {
            IdentityHeader::OwnerId(id) => [
                (SIGNATURE_HEADER, self.signature.as_str()),
                (IDENTITY_HEADER, id.as_str()),
            ],
            IdentityHeader::PublicKey(pk) => [
                (SIGNATURE_HEADER, self.signature.as_str()),
                (PUBLIC_KEY_HEADER, pk.as_str()),
            ],
        }
    }
}

fn sign_payload<R, P>(
    runtime: &R,
    payload: &P,
    keyring: &Keyring,
) -> WalletResult<String>
where
    R: ContractRuntime + ?Sized,
    P: serde::Serialize,
{
    use base64::prelude::*;
    let encoded = serde_json::to_string(payload)
        .map_err(|e| WalletError::crypto_src("encoding payload", e))?;
    let data = serde_json::to_string(&GqlData {
        gql: BASE64_STANDARD.encode(encoded.as_bytes()),
    })
    .map_err(|e| WalletError::crypto_src("encoding sign_graphql data", e))?;
    let keys = keyring.encode()?;
    tracing::debug!(contract = %Contract::SignGraphql, "signing payload");
    let result =
        runtime.exec(Contract::SignGraphql, Some(&data), Some(&keys))?;
    let signed: SignedGql = serde_json::from_str(&result).map_err(|e| {
        WalletError::crypto_src("decoding sign_graphql result", e)
    })?;
    Ok(signed.eddsa_signature)
}

/// Verify a signature header against the raw bytes of a request payload.
///
/// This is the receiving side of [AuthHeaders::sign]: base64-encode the raw
/// body, run [Contract::VerifyGraphql], and require the contract to report
/// `"1"`. Anything else, including a contract that aborts on an invalid
/// signature, is an error.
pub fn verify_request<R: ContractRuntime + ?Sized>(
    runtime: &R,
    payload: &[u8],
    signature: &str,
    public_key: &str,
) -> WalletResult<()> {
    use base64::prelude::*;
    let data = serde_json::to_string(&VerifyGql {
        gql: BASE64_STANDARD.encode(payload),
        eddsa_signature: signature.into(),
        eddsa_public_key: public_key.into(),
    })
    .map_err(|e| WalletError::crypto_src("encoding verify_graphql data", e))?;
    let result = runtime.exec(Contract::VerifyGraphql, Some(&data), None)?;
    let out: VerifyOutput = serde_json::from_str(&result).map_err(|e| {
        WalletError::crypto_src("decoding verify_graphql result", e)
    })?;
    if out.output.first().map(String::as_str) != Some("1") {
        return Err(WalletError::crypto("signature is not authentic"));
    }
    Ok(())
}
