//! Native contract runtime based on ed25519_dalek.

use crate::gql;
use zenwallet_api::*;

/// A default [ContractRuntime] based on ed25519_dalek.
///
/// Executes all four wallet contracts in-process. Key strings are plain
/// base58 over the raw 32 byte ed25519 key material, signatures are base64
/// over the 64 byte detached signature, payload hashes are lowercase hex
/// sha256. Signing is deterministic: the same keyring and payload always
/// produce the same signature.
#[derive(Debug)]
pub struct Ed25519Runtime;

impl ContractRuntime for Ed25519Runtime {
    fn exec(
        &self,
        contract: Contract,
        data: Option<&str>,
        keys: Option<&str>,
    ) -> WalletResult<String> {
        tracing::debug!(contract = %contract, "executing contract");
        match contract {
            Contract::CreateKeyring => create_keyring(),
            Contract::CreatePublicKey => create_public_key(keys),
            Contract::SignGraphql => sign_graphql(data, keys),
            Contract::VerifyGraphql => verify_graphql(data),
        }
    }
}

fn create_keyring() -> WalletResult<String> {
    let secret =
        ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng);
    let keyring = Keyring {
        eddsa: bs58::encode(secret.as_bytes()).into_string(),
    };
    keyring.encode()
}

fn create_public_key(keys: Option<&str>) -> WalletResult<String> {
    let keys = keys.ok_or_else(|| {
        WalletError::crypto("create_public_key requires a keys context")
    })?;
    let secret = decode_signing_key(&Keyring::decode(keys.as_bytes())?)?;
    let bundle = PublicKeyBundle {
        eddsa_public_key: bs58::encode(secret.verifying_key().as_bytes())
            .into_string(),
    };
    bundle.encode()
}

fn sign_graphql(
    data: Option<&str>,
    keys: Option<&str>,
) -> WalletResult<String> {
    use base64::prelude::*;
    use ed25519_dalek::Signer;
    use sha2::Digest;

    let data = data.ok_or_else(|| {
        WalletError::crypto("sign_graphql requires a data context")
    })?;
    let keys = keys.ok_or_else(|| {
        WalletError::crypto("sign_graphql requires a keys context")
    })?;
    let data: GqlData = serde_json::from_str(data).map_err(|e| {
        WalletError::crypto_src("decoding sign_graphql data", e)
    })?;
    let secret = decode_signing_key(&Keyring::decode(keys.as_bytes())?)?;

    let message = gql::decode_compacted(&data.gql)?;
    let signature = secret.sign(&message);

    let signed = SignedGql {
        eddsa_signature: BASE64_STANDARD.encode(signature.to_bytes()),
        gql: BASE64_STANDARD.encode(&message),
        hash: hex::encode(sha2::Sha256::digest(&message)),
    };
    serde_json::to_string(&signed).map_err(|e| {
        WalletError::crypto_src("encoding sign_graphql result", e)
    })
}

fn verify_graphql(data: Option<&str>) -> WalletResult<String> {
    use base64::prelude::*;
    use ed25519_dalek::Verifier;

    let data = data.ok_or_else(|| {
        WalletError::crypto("verify_graphql requires a data context")
    })?;
    let data: VerifyGql = serde_json::from_str(data).map_err(|e| {
        WalletError::crypto_src("decoding verify_graphql data", e)
    })?;

    let message = gql::decode_compacted(&data.gql)?;

    let signature = BASE64_STANDARD
        .decode(&data.eddsa_signature)
        .map_err(|e| WalletError::crypto_src("decoding eddsa_signature", e))?;
    let signature: [u8; 64] = signature.as_slice().try_into().map_err(|_| {
        WalletError::crypto(format!(
            "eddsa_signature must be 64 bytes, got {}",
            signature.len(),
        ))
    })?;
    let signature = ed25519_dalek::Signature::from_bytes(&signature);

    let public_key = decode_verifying_key(&data.eddsa_public_key)?;
    public_key.verify(&message, &signature).map_err(|e| {
        WalletError::crypto_src("signature verification failed", e)
    })?;

    let out = VerifyOutput {
        output: vec!["1".into()],
    };
    serde_json::to_string(&out).map_err(|e| {
        WalletError::crypto_src("encoding verify_graphql result", e)
    })
}

fn decode_signing_key(
    keyring: &Keyring,
) -> WalletResult<ed25519_dalek::SigningKey> {
    let raw = decode_key_bytes("eddsa secret key", &keyring.eddsa)?;
    Ok(ed25519_dalek::SigningKey::from_bytes(&raw))
}

fn decode_verifying_key(
    b58: &str,
) -> WalletResult<ed25519_dalek::VerifyingKey> {
    let raw = decode_key_bytes("eddsa public key", b58)?;
    ed25519_dalek::VerifyingKey::from_bytes(&raw)
        .map_err(|e| WalletError::crypto_src("invalid eddsa public key", e))
}

fn decode_key_bytes(field: &str, b58: &str) -> WalletResult<[u8; 32]> {
    let raw = bs58::decode(b58)
        .into_vec()
        .map_err(|e| WalletError::crypto_src(format!("decoding {field}"), e))?;
    raw.as_slice().try_into().map_err(|_| {
        WalletError::crypto(format!(
            "{field} must be 32 bytes, got {}",
            raw.len(),
        ))
    })
}
