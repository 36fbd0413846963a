//! Integration tests for recording stubs to disk and playing them back.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stubborn_http::{
    ClientResponse, HttpClient, MatchOptions, PersistentStore, RecordMode, ReqwestClient,
    StubConfig, StubError, StubRequest, StubResponse, StubSource, StubSourceLocation, StubStore,
    StubbornNetwork, TransportError,
};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing_test::traced_test;

/// Fake backend answering every request with a numbered body.
#[derive(Default)]
struct Backend {
    calls: AtomicUsize,
}

impl Backend {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for Backend {
    async fn perform(&self, request: &StubRequest) -> Result<ClientResponse, TransportError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if request.url.path() == "/offline" {
            return Err(TransportError::new("The Internet connection appears to be offline."));
        }
        Ok(ClientResponse {
            response: StubResponse::new(200)
                .with_url(request.url.clone())
                .with_header("Content-Type", "text/plain"),
            body: Some(Bytes::from(format!("response {n}"))),
        })
    }
}

fn persistent_config(dir: &TempDir, mode: RecordMode) -> StubConfig {
    StubConfig {
        source: StubSource::Persistent(StubSourceLocation::new(
            "-[LoginTests testLogin]",
            dir.path(),
        )),
        record_mode: mode,
        ..Default::default()
    }
}

fn login() -> StubRequest {
    StubRequest::post("https://api.example.com/login?b=2&a=1")
        .unwrap()
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"user":"ana"}"#)
}

#[tokio::test]
#[traced_test]
async fn test_recorded_stubs_play_back_in_new_network() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(Backend::default());

    let network =
        StubbornNetwork::from_config(&persistent_config(&dir, RecordMode::Record)).unwrap();
    let recorded = network.session(backend.clone()).handle(&login()).await.unwrap();
    assert_eq!(recorded.body.as_deref(), Some(&b"response 0"[..]));
    assert!(dir.path().join("LoginTests_testLogin.json").is_file());

    // a fresh network reads the file back
    let network =
        StubbornNetwork::from_config(&persistent_config(&dir, RecordMode::Playback)).unwrap();
    let session = network.session(backend.clone());

    let reordered = StubRequest::post("https://api.example.com/login?a=1&b=2")
        .unwrap()
        .with_header("content-type", "application/json")
        .with_body(r#"{"user":"ana"}"#);
    let played = session.handle(&reordered).await.unwrap();

    assert_eq!(played, recorded);
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_playback_miss_never_calls_backend() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(Backend::default());
    let network =
        StubbornNetwork::from_config(&persistent_config(&dir, RecordMode::Playback)).unwrap();

    let err = network.session(backend.clone()).handle(&login()).await.unwrap_err();
    assert!(matches!(err, StubError::NoStubFound { ref method, .. } if method == "POST"));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_record_new_keeps_existing_stubs() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(Backend::default());
    let network =
        StubbornNetwork::from_config(&persistent_config(&dir, RecordMode::RecordNew)).unwrap();
    let session = network.session(backend.clone());

    let other = StubRequest::get("https://api.example.com/profile").unwrap();
    session.handle(&login()).await.unwrap();
    session.handle(&other).await.unwrap();
    let again = session.handle(&login()).await.unwrap();

    assert_eq!(again.body.as_deref(), Some(&b"response 0"[..]));
    assert_eq!(backend.calls(), 2);
    assert_eq!(network.persistent_store().unwrap().len(), 2);
}

#[tokio::test]
async fn test_switching_into_record_clears_file_once() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(Backend::default());
    let network =
        StubbornNetwork::from_config(&persistent_config(&dir, RecordMode::RecordNew)).unwrap();
    let mut session = network.session(backend.clone());
    session.handle(&login()).await.unwrap();

    session.set_record_mode(RecordMode::Record).unwrap();
    assert!(network.persistent_store().unwrap().is_empty());

    session.handle(&login()).await.unwrap();
    session.set_record_mode(RecordMode::Record).unwrap();
    assert_eq!(network.persistent_store().unwrap().len(), 1);

    let path = dir.path().join("LoginTests_testLogin.json");
    assert_eq!(PersistentStore::open(path).unwrap().len(), 1);
}

#[tokio::test]
async fn test_rerecording_replaces_previous_recording() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(Backend::default());

    for _ in 0..2 {
        let network =
            StubbornNetwork::from_config(&persistent_config(&dir, RecordMode::Record)).unwrap();
        network.session(backend.clone()).handle(&login()).await.unwrap();
    }

    let path = dir.path().join("LoginTests_testLogin.json");
    assert_eq!(PersistentStore::open(&path).unwrap().len(), 1);

    let network =
        StubbornNetwork::from_config(&persistent_config(&dir, RecordMode::Playback)).unwrap();
    let played = network.session(backend.clone()).handle(&login()).await.unwrap();
    assert_eq!(played.body.as_deref(), Some(&b"response 1"[..]));
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn test_recorded_transport_error_replays() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(Backend::default());
    let offline = StubRequest::get("https://api.example.com/offline").unwrap();

    let network =
        StubbornNetwork::from_config(&persistent_config(&dir, RecordMode::Record)).unwrap();
    let err = network.session(backend.clone()).handle(&offline).await.unwrap_err();
    assert!(matches!(err, StubError::Transport(_)));

    let network =
        StubbornNetwork::from_config(&persistent_config(&dir, RecordMode::Playback)).unwrap();
    let err = network.session(backend.clone()).handle(&offline).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Transport error: The Internet connection appears to be offline."
    );
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_manual_stub_answers_in_playback() {
    let network = StubbornNetwork::ephemeral().with_options(MatchOptions::url_only());
    network
        .stub(
            StubRequest::get("https://api.example.com/x?q=1").unwrap(),
            Some(Bytes::from_static(b"stubbed")),
            Some(StubResponse::new(204)),
            None,
        )
        .unwrap();

    let session = network.session(Arc::new(Backend::default()));
    let delivered = session
        .handle(&StubRequest::post("https://api.example.com/x?q=1").unwrap())
        .await
        .unwrap();
    assert_eq!(delivered.response.map(|r| r.status), Some(204));
    assert_eq!(delivered.body.as_deref(), Some(&b"stubbed"[..]));
}

/// Serve a single canned HTTP response on a local port.
async fn serve_once(extra_headers: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await.unwrap();
        let response = format!(
            "HTTP/1.1 201 Created\r\nContent-Type: text/plain\r\nX-Stub: yes\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            extra_headers,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });
    format!("http://{addr}/resource")
}

#[tokio::test]
async fn test_reqwest_client_records_live_response() {
    let url = serve_once("", "hello").await;
    let network = StubbornNetwork::ephemeral().with_record_mode(RecordMode::Record);
    let session = network.session(Arc::new(ReqwestClient::new().unwrap()));

    let request = StubRequest::get(&url).unwrap();
    let delivered = session.handle(&request).await.unwrap();
    let response = delivered.response.unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(response.header("x-stub"), Some("yes"));
    assert_eq!(delivered.body.as_deref(), Some(&b"hello"[..]));

    // the server is gone, playback still answers
    let mut session = session;
    session.set_record_mode(RecordMode::Playback).unwrap();
    let replayed = session.handle(&request).await.unwrap();
    assert_eq!(replayed.body.as_deref(), Some(&b"hello"[..]));
    assert!(network
        .stub_source()
        .has_stub(&request, &MatchOptions::strict()));
}

#[tokio::test]
async fn test_reqwest_client_keeps_utf8_header_values() {
    let url = serve_once("X-Name: caf\u{e9}\r\n", "hi").await;
    let client = ReqwestClient::new().unwrap();

    let live = client
        .perform(&StubRequest::get(&url).unwrap())
        .await
        .unwrap();
    assert_eq!(live.response.header("x-name"), Some("caf\u{e9}"));
    assert_eq!(live.response.header("x-stub"), Some("yes"));
}
