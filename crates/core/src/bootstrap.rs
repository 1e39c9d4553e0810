//! Keyring bootstrap.
//!
//! Runs once at startup, before the wallet signs anything:
//!
//! - If `keyring.json` exists it is loaded and parsed. If not, a fresh
//!   keyring is generated by the create-keyring contract and written with
//!   mode 0600. A failing contract here is fatal and leaves no file
//!   behind.
//! - The public key bundle is then rederived from whichever keyring we
//!   ended up with, and `public_keys.json` is deleted and rewritten, also
//!   0600. This happens on every bootstrap, not just the first: it is
//!   what makes manual key rotation (delete `keyring.json`, restart)
//!   propagate to the published bundle, and it repairs a corrupt or stale
//!   bundle for free.
//!
//! Bootstrap is single-threaded and does no locking. Two processes
//! bootstrapping the same directory at once can race on the keyring
//! file; serializing that is the deployment's job.

use crate::config::Config;
use std::io::Write;
use zenwallet_api::*;

/// Ensure a private keyring exists, returning it, and rewrite the derived
/// public key bundle.
pub fn ensure_keyring<R: ContractRuntime + ?Sized>(
    config: &Config,
    runtime: &R,
) -> WalletResult<Keyring> {
    let keyring_path = config.keyring_path();
    let keyring = if keyring_path.exists() {
        tracing::debug!(path = ?keyring_path, "loading existing keyring");
        load_keyring(config)?
    } else {
        tracing::info!(path = ?keyring_path, "generating new keyring");
        let result = runtime.exec(Contract::CreateKeyring, None, None)?;
        let keyring = Keyring::decode(result.as_bytes())?;
        std::fs::create_dir_all(&config.files_dir).map_err(|e| {
            WalletError::io_src(
                format!("creating {}", config.files_dir.display()),
                e,
            )
        })?;
        write_restricted(&keyring_path, keyring.encode()?.as_bytes())?;
        keyring
    };

    let result = runtime.exec(
        Contract::CreatePublicKey,
        None,
        Some(&keyring.encode()?),
    )?;
    let bundle = PublicKeyBundle::decode(result.as_bytes())?;

    let public_keys_path = config.public_keys_path();
    match std::fs::remove_file(&public_keys_path) {
        Ok(()) => (),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => (),
        Err(err) => {
            return Err(WalletError::io_src(
                "removing stale public keys",
                err,
            ));
        }
    }
    write_restricted(&public_keys_path, bundle.encode()?.as_bytes())?;
    tracing::info!(path = ?public_keys_path, "public keys written");

    Ok(keyring)
}

/// Load an existing keyring without bootstrapping.
///
/// For signer paths that must not create state: a missing or corrupt
/// keyring file is an error, nothing is generated.
pub fn load_keyring(config: &Config) -> WalletResult<Keyring> {
    let keyring_path = config.keyring_path();
    let raw = std::fs::read(&keyring_path).map_err(|e| {
        WalletError::io_src(
            format!("reading {}", keyring_path.display()),
            e,
        )
    })?;
    Keyring::decode(&raw)
}

/// Write key material readable by the owning user only.
///
/// The mode is applied at create time. Callers only ever write fresh
/// files here: the keyring is written once on generation, the public
/// bundle is deleted before every rewrite.
fn write_restricted(
    path: &std::path::Path,
    content: &[u8],
) -> WalletResult<()> {
    let mut opts = std::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(path).map_err(|e| {
        WalletError::io_src(format!("opening {}", path.display()), e)
    })?;
    file.write_all(content).map_err(|e| {
        WalletError::io_src(format!("writing {}", path.display()), e)
    })?;
    file.sync_data().map_err(|e| {
        WalletError::io_src(format!("syncing {}", path.display()), e)
    })?;
    Ok(())
}
