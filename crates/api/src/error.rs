//! Zenwallet error types.

use std::sync::Arc;

/// A clonable trait-object inner error.
#[derive(Clone, Default)]
pub struct InnerError(
    pub Option<Arc<dyn std::error::Error + 'static + Send + Sync>>,
);

impl std::fmt::Debug for InnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for InnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_ref() {
            None => f.write_str("None"),
            Some(s) => s.fmt(f),
        }
    }
}

impl std::error::Error for InnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.as_ref().map(|s| {
            let out: &(dyn std::error::Error + 'static) = &**s;
            out
        })
    }
}

impl InnerError {
    /// Construct a new InnerError from a source error.
    pub fn new<E: std::error::Error + 'static + Send + Sync>(e: E) -> Self {
        Self(Some(Arc::new(e)))
    }
}

/// The zenwallet error type, used across all wallet apis.
///
/// The variants partition failures by which external boundary misbehaved:
/// the cryptographic contract runtime, the filesystem holding key material,
/// or the ledger http transport. Callers that need to distinguish a dead
/// ledger from a corrupt keyring can match on the variant; everything else
/// can treat the type opaquely.
///
/// This type is required to implement `Clone` so results that carry it can
/// be cheaply shared.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    /// A cryptographic contract failed to execute, or produced output
    /// that could not be decoded.
    #[error("crypto: {ctx} (src: {src})")]
    Crypto {
        /// Any context associated with this error.
        ctx: Arc<str>,

        /// The inner error (if any).
        #[source]
        src: InnerError,
    },

    /// Reading or writing persisted key material failed.
    #[error("io: {ctx} (src: {src})")]
    Io {
        /// Any context associated with this error.
        ctx: Arc<str>,

        /// The inner error (if any).
        #[source]
        src: InnerError,
    },

    /// The ledger could not be reached, returned a transport-level
    /// failure, or sent a response that could not be decoded.
    #[error("http: {ctx} (src: {src})")]
    Http {
        /// Any context associated with this error.
        ctx: Arc<str>,

        /// The inner error (if any).
        #[source]
        src: InnerError,
    },
}

impl WalletError {
    /// Construct a crypto error with an inner source error.
    pub fn crypto_src<
        C: std::fmt::Display,
        S: std::error::Error + 'static + Send + Sync,
    >(
        ctx: C,
        src: S,
    ) -> Self {
        Self::Crypto {
            ctx: ctx.to_string().into_boxed_str().into(),
            src: InnerError::new(src),
        }
    }

    /// Construct a crypto error.
    pub fn crypto<C: std::fmt::Display>(ctx: C) -> Self {
        Self::Crypto {
            ctx: ctx.to_string().into_boxed_str().into(),
            src: InnerError::default(),
        }
    }

    /// Construct an io error with an inner source error.
    pub fn io_src<
        C: std::fmt::Display,
        S: std::error::Error + 'static + Send + Sync,
    >(
        ctx: C,
        src: S,
    ) -> Self {
        Self::Io {
            ctx: ctx.to_string().into_boxed_str().into(),
            src: InnerError::new(src),
        }
    }

    /// Construct an io error.
    pub fn io<C: std::fmt::Display>(ctx: C) -> Self {
        Self::Io {
            ctx: ctx.to_string().into_boxed_str().into(),
            src: InnerError::default(),
        }
    }

    /// Construct an http error with an inner source error.
    pub fn http_src<
        C: std::fmt::Display,
        S: std::error::Error + 'static + Send + Sync,
    >(
        ctx: C,
        src: S,
    ) -> Self {
        Self::Http {
            ctx: ctx.to_string().into_boxed_str().into(),
            src: InnerError::new(src),
        }
    }

    /// Construct an http error.
    pub fn http<C: std::fmt::Display>(ctx: C) -> Self {
        Self::Http {
            ctx: ctx.to_string().into_boxed_str().into(),
            src: InnerError::default(),
        }
    }
}

/// The zenwallet result type.
pub type WalletResult<T> = Result<T, WalletError>;
