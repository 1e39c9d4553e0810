//! Graphql payload canonicalization.
//!
//! The base64 payload string handed to the signing and verification
//! contracts may have picked up whitespace or other stray bytes in
//! transit, graphql clients in particular are fond of reflowing request
//! bodies. Both contracts therefore normalize the string before decoding
//! it, so the bytes that get signed and the bytes that get verified agree
//! even when the transports in between disagree about formatting.

use zenwallet_api::*;

/// Retain only graphic ascii (`'!'..='~'`), dropping whitespace and any
/// other bytes a transport may have injected into the base64 string.
pub fn compact_ascii(s: &str) -> String {
    s.chars().filter(|c| ('!'..='~').contains(c)).collect()
}

/// Normalize a base64 payload string and decode it to the payload bytes.
///
/// These bytes are the message that signatures and hashes are computed
/// over.
pub fn decode_compacted(gql: &str) -> WalletResult<Vec<u8>> {
    use base64::prelude::*;
    BASE64_STANDARD
        .decode(compact_ascii(gql))
        .map_err(|e| WalletError::crypto_src("decoding gql payload", e))
}
