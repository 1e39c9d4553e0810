//! The binary zenwallet-demo.

use url::Url;
use zenwallet_api::*;
use zenwallet_client::LedgerClient;
use zenwallet_core::{ensure_keyring, load_keyring, Config, Ed25519Runtime};

/// Zenwallet demo. Bootstraps a keyring on disk and signs token
/// transactions against a zenflows token ledger.
///
/// The key artifact directory is taken from the FILES_DIR environment
/// variable (default "data"), read from the environment or a .env file
/// in the working directory.
#[derive(clap::Parser, Debug)]
#[command(version)]
pub struct Args {
    /// The token ledger to talk to.
    #[arg(long, default_value = "http://localhost:8000")]
    pub url: String,

    /// Timeout applied to each ledger call, in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub cmd: Cmd,
}

/// The demo commands.
#[derive(clap::Subcommand, Debug)]
pub enum Cmd {
    /// Generate or load the private keyring and rewrite the public key
    /// bundle. Run this once before anything that signs.
    Init,

    /// Sign and submit a token transaction.
    Send {
        /// The token kind to credit.
        #[arg(long)]
        token: String,

        /// The amount to credit. Negative amounts debit.
        #[arg(long)]
        amount: i64,

        /// The owner account to credit.
        #[arg(long)]
        owner: String,

        /// The identity header value to authenticate as.
        #[arg(long)]
        id: String,
    },

    /// Fetch the balance of one token for one owner.
    Balance {
        /// The token kind.
        #[arg(long)]
        token: String,

        /// The owner account.
        #[arg(long)]
        owner: String,

        /// Only count transactions recorded at or before this instant,
        /// epoch milliseconds.
        #[arg(long)]
        until: Option<i64>,
    },

    /// Fetch the last transactions of one token for one owner.
    History {
        /// The token kind.
        #[arg(long)]
        token: String,

        /// The owner account.
        #[arg(long)]
        owner: String,

        /// How many transactions to fetch.
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = <Args as clap::Parser>::parse();
    let config = Config::from_env();

    if let Err(err) = run(&args, &config) {
        tracing::error!(?err, "command failed");
        // a failed bootstrap aborts with the init exit code, everything
        // else is an ordinary failure
        if matches!(args.cmd, Cmd::Init) {
            std::process::exit(-1);
        }
        std::process::exit(1);
    }
}

fn run(args: &Args, config: &Config) -> WalletResult<()> {
    let runtime: DynContractRuntime = std::sync::Arc::new(Ed25519Runtime);
    match &args.cmd {
        Cmd::Init => {
            ensure_keyring(config, &*runtime)?;
            println!(
                "keyring ready: {}",
                config.keyring_path().display(),
            );
            println!(
                "public keys rewritten: {}",
                config.public_keys_path().display(),
            );
            Ok(())
        }
        Cmd::Send {
            token,
            amount,
            owner,
            id,
        } => {
            let keyring = load_keyring(config)?;
            let body = AddTokens {
                token: token.clone(),
                amount: *amount,
                owner: owner.clone(),
            };
            let auth =
                AuthHeaders::sign(&*runtime, &body, &keyring, id.clone())?;
            print_response(&client(args)?.add_tokens(&body, &auth)?)
        }
        Cmd::Balance {
            token,
            owner,
            until,
        } => print_response(&client(args)?.balance(
            token,
            owner,
            until.map(Timestamp::from_millis),
        )?),
        Cmd::History {
            token,
            owner,
            count,
        } => print_response(
            &client(args)?.last_transactions(token, owner, *count)?,
        ),
    }
}

fn client(args: &Args) -> WalletResult<LedgerClient> {
    let url = Url::parse(&args.url)
        .map_err(|e| WalletError::http_src("invalid ledger url", e))?;
    Ok(LedgerClient::with_timeout(
        url,
        std::time::Duration::from_millis(args.timeout_ms),
    ))
}

fn print_response<T: serde::Serialize>(response: &T) -> WalletResult<()> {
    let encoded = serde_json::to_string_pretty(response)
        .map_err(|e| WalletError::http_src("encoding response", e))?;
    println!("{encoded}");
    Ok(())
}
