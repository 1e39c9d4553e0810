use axum::*;
use std::sync::atomic::*;
use std::sync::{Arc, Mutex};
use url::Url;
use zenwallet_api::*;
use zenwallet_client::LedgerClient;
use zenwallet_core::Ed25519Runtime;

/// A test ledger server.
///
/// Submissions are cryptographically verified the way a real ledger
/// verifies them: the raw request body is checked against the signature
/// header, using the public key header when present and the wallet's
/// published public key otherwise.
struct TestLedgerSrv {
    kill: Option<tokio::sync::oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<std::io::Result<()>>,
    halt: Arc<AtomicBool>,
    addr: String,
    received: Arc<Mutex<Vec<(String, AddTokens)>>>,
}

impl Drop for TestLedgerSrv {
    fn drop(&mut self) {
        if let Some(kill) = self.kill.take() {
            let _ = kill.send(());
        }
        self.task.abort();
    }
}

fn ledger_txs() -> Vec<Transaction> {
    vec![
        Transaction {
            id: 2,
            timestamp: 2000,
            amount: 50,
        },
        Transaction {
            id: 1,
            timestamp: 1000,
            amount: 100,
        },
    ]
}

#[derive(serde::Deserialize)]
struct UntilQuery {
    until: Option<i64>,
}

impl TestLedgerSrv {
    /// Construct a test ledger server trusting the given public key.
    pub async fn new(public_key: String) -> Self {
        let (kill, kill_r) = tokio::sync::oneshot::channel();
        let kill = Some(kill);
        let kill_r = async move {
            let _ = kill_r.await;
        };

        let l = tokio::net::TcpListener::bind(std::net::SocketAddr::from((
            [127, 0, 0, 1],
            0,
        )))
        .await
        .unwrap();
        let addr = format!("http://{:?}", l.local_addr().unwrap());

        let halt = Arc::new(AtomicBool::new(false));
        let received = Arc::new(Mutex::new(Vec::new()));

        #[derive(Clone)]
        struct State {
            halt: Arc<AtomicBool>,
            public_key: Arc<str>,
            received: Arc<Mutex<Vec<(String, AddTokens)>>>,
        }

        let post_state = State {
            halt: halt.clone(),
            public_key: public_key.into_boxed_str().into(),
            received: received.clone(),
        };
        let balance_state = post_state.clone();
        let txs_state = post_state.clone();

        let app: Router = Router::new()
            .route(
                "/token",
                routing::post(move |headers: http::HeaderMap, body: String| async move {
                    if post_state.halt.load(Ordering::SeqCst) {
                        return Err(
                            http::status::StatusCode::INTERNAL_SERVER_ERROR,
                        );
                    }
                    let header = |name: &str| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string)
                    };
                    let Some(signature) = header(SIGNATURE_HEADER) else {
                        return Ok(serde_json::to_string(&AddTokensResponse {
                            success: false,
                            error: Some(
                                "Signature not present in request".into(),
                            ),
                        })
                        .unwrap());
                    };
                    // did-style auth sends the key, id-style auth relies
                    // on the key the wallet published
                    let (identity, key) = match header(PUBLIC_KEY_HEADER) {
                        Some(key) => (key.clone(), key),
                        None => (
                            header(IDENTITY_HEADER).unwrap_or_default(),
                            post_state.public_key.to_string(),
                        ),
                    };
                    let response = match verify_request(
                        &Ed25519Runtime,
                        body.as_bytes(),
                        &signature,
                        &key,
                    ) {
                        Ok(()) => {
                            let parsed: AddTokens =
                                serde_json::from_str(&body).unwrap();
                            post_state
                                .received
                                .lock()
                                .unwrap()
                                .push((identity, parsed));
                            AddTokensResponse {
                                success: true,
                                error: None,
                            }
                        }
                        Err(_) => AddTokensResponse {
                            success: false,
                            error: Some("Signature is not authentic".into()),
                        },
                    };
                    Ok(serde_json::to_string(&response).unwrap())
                }),
            )
            .route(
                "/token/{token}/{owner}",
                routing::get(
                    move |_path: extract::Path<(String, String)>,
                          extract::Query(q): extract::Query<UntilQuery>| async move {
                        if balance_state.halt.load(Ordering::SeqCst) {
                            return Err(
                                http::status::StatusCode::INTERNAL_SERVER_ERROR,
                            );
                        }
                        let amount = ledger_txs()
                            .iter()
                            .filter(|tx| match q.until {
                                Some(until) => tx.timestamp <= until as u64,
                                None => true,
                            })
                            .map(|tx| tx.amount)
                            .sum();
                        Ok(serde_json::to_string(&BalanceResponse {
                            success: true,
                            error: None,
                            amount: Some(amount),
                        })
                        .unwrap())
                    },
                ),
            )
            .route(
                "/token/{token}/{owner}/last/{count}",
                routing::get(
                    move |extract::Path((_token, _owner, count)): extract::Path<(
                        String,
                        String,
                        usize,
                    )>| async move {
                        if txs_state.halt.load(Ordering::SeqCst) {
                            return Err(
                                http::status::StatusCode::INTERNAL_SERVER_ERROR,
                            );
                        }
                        let txs =
                            ledger_txs().into_iter().take(count).collect();
                        Ok(serde_json::to_string(&TransactionsResponse {
                            success: true,
                            error: None,
                            txs: Some(txs),
                        })
                        .unwrap())
                    },
                ),
            );

        let task = tokio::task::spawn(std::future::IntoFuture::into_future(
            serve(l, app).with_graceful_shutdown(kill_r),
        ));

        Self {
            kill,
            task,
            halt,
            addr,
            received,
        }
    }

    pub fn set_halt(&self, halt: bool) {
        self.halt.store(halt, Ordering::SeqCst);
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

fn test_keyring() -> (Keyring, String) {
    let keyring = Ed25519Runtime
        .exec(Contract::CreateKeyring, None, None)
        .unwrap();
    let keyring = Keyring::decode(keyring.as_bytes()).unwrap();
    let bundle = Ed25519Runtime
        .exec(
            Contract::CreatePublicKey,
            None,
            Some(&keyring.encode().unwrap()),
        )
        .unwrap();
    let bundle = PublicKeyBundle::decode(bundle.as_bytes()).unwrap();
    (keyring, bundle.eddsa_public_key)
}

#[tokio::test(flavor = "multi_thread")]
async fn signed_submit_roundtrip() {
    let (keyring, public_key) = test_keyring();
    let srv = TestLedgerSrv::new(public_key).await;
    let client = LedgerClient::new(Url::parse(srv.addr()).unwrap());

    let body = AddTokens {
        token: "idea".into(),
        amount: 100,
        owner: "alice".into(),
    };
    let auth = AuthHeaders::sign(
        &Ed25519Runtime,
        &body,
        &keyring,
        "interfacer-user-42",
    )
    .unwrap();

    let response =
        tokio::task::block_in_place(|| client.add_tokens(&body, &auth))
            .unwrap();
    assert!(response.success, "ledger rejected: {:?}", response.error);
    assert_eq!(None, response.error);

    let received = srv.received.lock().unwrap();
    assert_eq!(1, received.len());
    assert_eq!("interfacer-user-42", received[0].0);
    assert_eq!(body, received[0].1);
}

#[tokio::test(flavor = "multi_thread")]
async fn tampered_body_rejected() {
    let (keyring, public_key) = test_keyring();
    let srv = TestLedgerSrv::new(public_key).await;
    let client = LedgerClient::new(Url::parse(srv.addr()).unwrap());

    let signed_over = AddTokens {
        token: "idea".into(),
        amount: 100,
        owner: "alice".into(),
    };
    let sent = AddTokens {
        token: "idea".into(),
        amount: 9999,
        owner: "alice".into(),
    };
    // signature covers a different payload than the one submitted
    let auth =
        AuthHeaders::sign(&Ed25519Runtime, &signed_over, &keyring, "alice")
            .unwrap();

    let response =
        tokio::task::block_in_place(|| client.add_tokens(&sent, &auth))
            .unwrap();
    assert!(!response.success);
    assert_eq!(
        Some("Signature is not authentic".to_string()),
        response.error,
    );
    assert!(srv.received.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn public_key_header_auth() {
    let (keyring, _public_key) = test_keyring();
    // the server is given an unrelated trusted key, auth must ride on the
    // public key header instead
    let (_other, unrelated_key) = test_keyring();
    let srv = TestLedgerSrv::new(unrelated_key).await;
    let client = LedgerClient::new(Url::parse(srv.addr()).unwrap());

    let body = AddTokens {
        token: "strength".into(),
        amount: 7,
        owner: "bob".into(),
    };
    let auth =
        AuthHeaders::sign_with_public_key(&Ed25519Runtime, &body, &keyring)
            .unwrap();
    let IdentityHeader::PublicKey(expected_key) = auth.identity.clone()
    else {
        panic!("expected public key identity");
    };

    let response =
        tokio::task::block_in_place(|| client.add_tokens(&body, &auth))
            .unwrap();
    assert!(response.success, "ledger rejected: {:?}", response.error);

    let received = srv.received.lock().unwrap();
    assert_eq!(1, received.len());
    assert_eq!(expected_key, received[0].0);
}

#[tokio::test(flavor = "multi_thread")]
async fn balance_with_and_without_until() {
    let (_keyring, public_key) = test_keyring();
    let srv = TestLedgerSrv::new(public_key).await;
    let client = LedgerClient::new(Url::parse(srv.addr()).unwrap());

    let all = tokio::task::block_in_place(|| {
        client.balance("idea", "alice", None)
    })
    .unwrap();
    assert!(all.success);
    assert_eq!(Some(150), all.amount);

    let bounded = tokio::task::block_in_place(|| {
        client.balance("idea", "alice", Some(Timestamp::from_millis(1500)))
    })
    .unwrap();
    assert_eq!(Some(100), bounded.amount);
}

#[tokio::test(flavor = "multi_thread")]
async fn last_transactions_decoded() {
    let (_keyring, public_key) = test_keyring();
    let srv = TestLedgerSrv::new(public_key).await;
    let client = LedgerClient::new(Url::parse(srv.addr()).unwrap());

    let response = tokio::task::block_in_place(|| {
        client.last_transactions("idea", "alice", 10)
    })
    .unwrap();
    assert!(response.success);
    assert_eq!(ledger_txs(), response.txs.unwrap());

    let response = tokio::task::block_in_place(|| {
        client.last_transactions("idea", "alice", 1)
    })
    .unwrap();
    assert_eq!(1, response.txs.unwrap().len());
}

#[tokio::test(flavor = "multi_thread")]
async fn halted_server_maps_to_http_error() {
    let (keyring, public_key) = test_keyring();
    let srv = TestLedgerSrv::new(public_key).await;
    let client = LedgerClient::new(Url::parse(srv.addr()).unwrap());
    srv.set_halt(true);

    let err = tokio::task::block_in_place(|| {
        client.balance("idea", "alice", None)
    })
    .unwrap_err();
    assert!(matches!(err, WalletError::Http { .. }));

    let body = AddTokens {
        token: "idea".into(),
        amount: 1,
        owner: "alice".into(),
    };
    let auth =
        AuthHeaders::sign(&Ed25519Runtime, &body, &keyring, "alice").unwrap();
    let err =
        tokio::task::block_in_place(|| client.add_tokens(&body, &auth))
            .unwrap_err();
    assert!(matches!(err, WalletError::Http { .. }));
}
