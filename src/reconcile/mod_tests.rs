//! Tests for the reconciliation flow.
//!
//! The whole flow runs against a scripted HTTP client shared by the
//! resolver and the DNS control client, so the call sequence (echo,
//! listing, mutations) can be asserted end to end.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Outcome, ReconcileError, Reconciler};
use crate::dns::DirectAdminClient;
use crate::notify::{Notifier, NotifyError};
use crate::resolver::ExternalIpResolver;
use crate::state::mock::MockStateStore;
use crate::state::{StateError, StateStore};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Mock HTTP client returning a scripted sequence of responses.
struct MockClient {
    responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.responses.lock().unwrap().remove(0)
    }
}

impl HttpClient for Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).request(req).await
    }
}

/// Notifier recording every delivered message.
#[derive(Default)]
struct MockNotifier {
    calls: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl MockNotifier {
    fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn notifications(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    async fn notify(&self, old_ip: &str, new_ip: &str) -> Result<(), NotifyError> {
        self.calls
            .lock()
            .unwrap()
            .push((old_ip.to_string(), new_ip.to_string()));
        if self.fail {
            Err(NotifyError::NonSuccessStatus {
                status: http::StatusCode::BAD_GATEWAY,
            })
        } else {
            Ok(())
        }
    }
}

impl Notifier for Arc<MockNotifier> {
    async fn notify(&self, old_ip: &str, new_ip: &str) -> Result<(), NotifyError> {
        (**self).notify(old_ip, new_ip).await
    }
}

impl StateStore for Arc<MockStateStore> {
    fn load(&self) -> Result<Option<String>, StateError> {
        (**self).load()
    }

    fn save(&self, ip: &str) -> Result<(), StateError> {
        (**self).save(ip)
    }
}

/// Store whose save always fails.
struct ReadOnlyStore {
    stored: Option<String>,
}

impl StateStore for ReadOnlyStore {
    fn load(&self) -> Result<Option<String>, StateError> {
        Ok(self.stored.clone())
    }

    fn save(&self, _ip: &str) -> Result<(), StateError> {
        Err(StateError::Write {
            path: "external_ip.txt".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }
}

fn ok(body: &str) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::new(
        http::StatusCode::OK,
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    ))
}

/// Wires a reconciler over a scripted transport, returning inspection
/// handles for the transport, the store and the notifier.
fn reconciler(
    responses: Vec<Result<HttpResponse, HttpError>>,
    store: MockStateStore,
    notifier: MockNotifier,
    subdomains: &[&str],
) -> (
    Reconciler<Arc<MockClient>, Arc<MockStateStore>, Arc<MockNotifier>>,
    Arc<MockClient>,
    Arc<MockStateStore>,
    Arc<MockNotifier>,
) {
    let mock = Arc::new(MockClient::new(responses));
    let store = Arc::new(store);
    let notifier = Arc::new(notifier);

    let resolver = ExternalIpResolver::new(Arc::clone(&mock));
    let dns = DirectAdminClient::new(
        Arc::clone(&mock),
        "dns.example.net",
        2222,
        "user",
        "pass",
        "example.com",
    )
    .unwrap();

    let rec = Reconciler::new(
        resolver,
        dns,
        Arc::clone(&store),
        Arc::clone(&notifier),
        subdomains.iter().map(ToString::to_string).collect(),
    );
    (rec, mock, store, notifier)
}

fn body_text(req: &HttpRequest) -> String {
    String::from_utf8(req.body.clone().unwrap_or_default()).unwrap()
}

#[tokio::test]
async fn unchanged_ip_performs_no_dns_calls() {
    let (rec, mock, _store, notifier) = reconciler(
        vec![ok("203.0.113.7\n")],
        MockStateStore::with_ip("203.0.113.7"),
        MockNotifier::default(),
        &["home"],
    );

    let outcome = rec.check_and_update().await.unwrap();

    assert_eq!(outcome, Outcome::Unchanged);
    // Only the echo service was contacted.
    assert_eq!(mock.calls(), 1);
    assert!(notifier.notifications().is_empty());
}

#[tokio::test]
async fn first_run_notifies_with_empty_old_ip_and_caches() {
    let (rec, _mock, store, notifier) = reconciler(
        vec![
            ok("198.51.100.5\n"),
            ok("home\t600\tIN\tA\t198.51.100.5\n"),
        ],
        MockStateStore::empty(),
        MockNotifier::default(),
        &["home"],
    );

    let outcome = rec.check_and_update().await.unwrap();

    assert_eq!(
        notifier.notifications(),
        vec![(String::new(), "198.51.100.5".to_string())]
    );
    assert_eq!(store.stored_ip().as_deref(), Some("198.51.100.5"));
    assert_eq!(
        outcome,
        Outcome::Updated {
            ip: "198.51.100.5".to_string(),
            rewritten: vec![],
        }
    );
}

#[tokio::test]
async fn stale_subdomain_is_deleted_then_added_with_new_ip() {
    let (rec, mock, _store, _notifier) = reconciler(
        vec![
            ok("198.51.100.5\n"),
            ok("home\t600\tIN\tA\t198.51.100.4\n"),
            ok(""),
            ok(""),
        ],
        MockStateStore::with_ip("198.51.100.4"),
        MockNotifier::default(),
        &["home"],
    );

    let outcome = rec.check_and_update().await.unwrap();

    let reqs = mock.captured_requests();
    assert_eq!(reqs.len(), 4, "echo, listing, delete, add");

    // Delete strictly before add.
    let delete_body = body_text(&reqs[2]);
    let add_body = body_text(&reqs[3]);
    assert!(delete_body.contains("delete=Delete+Selected"));
    assert!(delete_body.contains("arecs0=name%3Dhome"));
    assert!(add_body.contains("action=add"));
    assert!(add_body.contains("value=198.51.100.5"));

    assert_eq!(
        outcome,
        Outcome::Updated {
            ip: "198.51.100.5".to_string(),
            rewritten: vec!["home".to_string()],
        }
    );
}

#[tokio::test]
async fn missing_subdomain_fails_fast_before_later_ones() {
    // "api" is listed first and absent from the zone; "home" is stale
    // but must not be touched.
    let (rec, mock, _store, _notifier) = reconciler(
        vec![
            ok("198.51.100.5\n"),
            ok("home\t600\tIN\tA\t198.51.100.4\n"),
        ],
        MockStateStore::with_ip("198.51.100.4"),
        MockNotifier::default(),
        &["api", "home"],
    );

    let err = rec.check_and_update().await.unwrap_err();

    match &err {
        ReconcileError::UnknownSubdomain { name } => assert_eq!(name, "api"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.to_string(),
        "Could not find current ip for subdomain: api"
    );
    // Echo and listing only; no mutation was issued for "home".
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn up_to_date_subdomain_skipped_while_stale_one_rewritten() {
    let (rec, mock, _store, _notifier) = reconciler(
        vec![
            ok("198.51.100.5\n"),
            ok("home\t600\tIN\tA\t198.51.100.5\napi\t600\tIN\tA\t198.51.100.4\n"),
            ok(""),
            ok(""),
        ],
        MockStateStore::with_ip("198.51.100.4"),
        MockNotifier::default(),
        &["home", "api"],
    );

    let outcome = rec.check_and_update().await.unwrap();

    // home needed nothing; api got the delete/add pair.
    assert_eq!(mock.calls(), 4);
    let reqs = mock.captured_requests();
    assert!(body_text(&reqs[2]).contains("arecs0=name%3Dapi"));
    assert!(body_text(&reqs[3]).contains("name=api"));

    assert_eq!(
        outcome,
        Outcome::Updated {
            ip: "198.51.100.5".to_string(),
            rewritten: vec!["api".to_string()],
        }
    );
}

#[tokio::test]
async fn notification_failure_does_not_block_the_dns_update() {
    let (rec, mock, store, notifier) = reconciler(
        vec![
            ok("198.51.100.5\n"),
            ok("home\t600\tIN\tA\t198.51.100.4\n"),
            ok(""),
            ok(""),
        ],
        MockStateStore::with_ip("198.51.100.4"),
        MockNotifier::failing(),
        &["home"],
    );

    let outcome = rec.check_and_update().await.unwrap();

    assert_eq!(notifier.notifications().len(), 1);
    assert_eq!(store.stored_ip().as_deref(), Some("198.51.100.5"));
    assert_eq!(mock.calls(), 4);
    assert!(matches!(outcome, Outcome::Updated { .. }));
}

#[tokio::test]
async fn cache_write_failure_is_fatal_before_any_dns_call() {
    let mock = Arc::new(MockClient::new(vec![ok("198.51.100.5\n")]));
    let resolver = ExternalIpResolver::new(Arc::clone(&mock));
    let dns = DirectAdminClient::new(
        Arc::clone(&mock),
        "dns.example.net",
        2222,
        "user",
        "pass",
        "example.com",
    )
    .unwrap();
    let rec = Reconciler::new(
        resolver,
        dns,
        ReadOnlyStore {
            stored: Some("198.51.100.4".to_string()),
        },
        Arc::new(MockNotifier::default()),
        vec!["home".to_string()],
    );

    let err = rec.check_and_update().await.unwrap_err();

    assert!(matches!(err, ReconcileError::State(StateError::Write { .. })));
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn dry_run_resolves_and_lists_but_mutates_nothing() {
    let (rec, mock, store, notifier) = reconciler(
        vec![
            ok("198.51.100.5\n"),
            ok("home\t600\tIN\tA\t198.51.100.4\n"),
        ],
        MockStateStore::with_ip("198.51.100.4"),
        MockNotifier::default(),
        &["home"],
    );
    let rec = rec.with_dry_run(true);

    let outcome = rec.check_and_update().await.unwrap();

    // Echo and listing happened, the delete/add pair did not.
    assert_eq!(mock.calls(), 2);
    assert!(notifier.notifications().is_empty());
    assert_eq!(store.stored_ip().as_deref(), Some("198.51.100.4"));
    assert_eq!(
        outcome,
        Outcome::Updated {
            ip: "198.51.100.5".to_string(),
            rewritten: vec!["home".to_string()],
        }
    );
}

#[tokio::test]
async fn invalid_echo_body_aborts_before_anything_else() {
    let (rec, mock, store, notifier) = reconciler(
        vec![ok("service unavailable")],
        MockStateStore::with_ip("198.51.100.4"),
        MockNotifier::default(),
        &["home"],
    );

    let err = rec.check_and_update().await.unwrap_err();

    assert!(matches!(err, ReconcileError::Resolve(_)));
    assert_eq!(mock.calls(), 1);
    assert!(notifier.notifications().is_empty());
    assert_eq!(store.stored_ip().as_deref(), Some("198.51.100.4"));
}
