//! Delivery of stubbed responses to an intercepting caller.

use crate::error::StubError;
use crate::recording::StubSession;
use crate::request::{StubRequest, StubResponse};
use bytes::Bytes;
use tracing::debug;
use url::Url;

/// Receives the outcome of an intercepted request.
///
/// For every loaded request `did_finish_loading` is called exactly once, after
/// all other callbacks.
pub trait InterceptionClient: Send + Sync {
    fn did_receive_response(&self, response: &StubResponse);
    fn did_load(&self, body: &Bytes);
    fn did_finish_loading(&self);
    fn did_fail(&self, error: &StubError);
}

/// Intercepts requests and answers them through a [`StubSession`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StubbedProtocol;

impl StubbedProtocol {
    /// Only plain HTTP and HTTPS requests are intercepted.
    pub fn can_handle(url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
    }

    /// Answer `request` and report the outcome to `client`.
    pub async fn start_loading(
        session: &StubSession,
        request: &StubRequest,
        client: &dyn InterceptionClient,
    ) {
        match session.handle(request).await {
            Ok(stubbed) => {
                if let Some(response) = &stubbed.response {
                    client.did_receive_response(response);
                }
                if let Some(body) = &stubbed.body {
                    client.did_load(body);
                }
            }
            Err(error) => {
                debug!(
                    "Intercepted {} {} failed: {}",
                    request.method, request.url, error
                );
                client.did_fail(&error);
            }
        }
        client.did_finish_loading();
    }

    /// Loading is never cancelled.
    pub fn stop_loading() {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientResponse, HttpClient};
    use crate::error::TransportError;
    use crate::store::{EphemeralStore, StubStore};
    use crate::stub::StubRecord;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct EventLog {
        events: Mutex<Vec<String>>,
    }

    impl InterceptionClient for EventLog {
        fn did_receive_response(&self, response: &StubResponse) {
            self.events.lock().push(format!("response {}", response.status));
        }
        fn did_load(&self, body: &Bytes) {
            self.events
                .lock()
                .push(format!("load {}", String::from_utf8_lossy(body)));
        }
        fn did_finish_loading(&self) {
            self.events.lock().push("finish".to_string());
        }
        fn did_fail(&self, _error: &StubError) {
            self.events.lock().push("fail".to_string());
        }
    }

    struct Offline;

    #[async_trait]
    impl HttpClient for Offline {
        async fn perform(&self, _request: &StubRequest) -> Result<ClientResponse, TransportError> {
            Err(TransportError::new("offline"))
        }
    }

    fn request() -> StubRequest {
        StubRequest::get("https://api.example.com/x").unwrap()
    }

    #[test]
    fn test_can_handle_only_http() {
        assert!(StubbedProtocol::can_handle(&Url::parse("http://a.com").unwrap()));
        assert!(StubbedProtocol::can_handle(&Url::parse("https://a.com").unwrap()));
        assert!(!StubbedProtocol::can_handle(&Url::parse("ftp://a.com").unwrap()));
        assert!(!StubbedProtocol::can_handle(&Url::parse("file:///tmp/x").unwrap()));
    }

    #[tokio::test]
    async fn test_success_callbacks_in_order() {
        let store = Arc::new(EphemeralStore::new());
        store
            .store(
                StubRecord::new(request())
                    .with_response(StubResponse::new(200))
                    .with_body("abc"),
            )
            .unwrap();
        let session = StubSession::new(store, Arc::new(Offline));
        let log = EventLog::default();

        StubbedProtocol::start_loading(&session, &request(), &log).await;
        assert_eq!(
            *log.events.lock(),
            vec!["response 200", "load abc", "finish"]
        );
    }

    #[tokio::test]
    async fn test_failure_still_finishes_once() {
        let session = StubSession::new(Arc::new(EphemeralStore::new()), Arc::new(Offline));
        let log = EventLog::default();

        StubbedProtocol::start_loading(&session, &request(), &log).await;
        StubbedProtocol::stop_loading();
        assert_eq!(*log.events.lock(), vec!["fail", "finish"]);
    }

    #[tokio::test]
    async fn test_missing_parts_are_skipped() {
        let store = Arc::new(EphemeralStore::new());
        store.store(StubRecord::new(request())).unwrap();
        let session = StubSession::new(store, Arc::new(Offline));
        let log = EventLog::default();

        StubbedProtocol::start_loading(&session, &request(), &log).await;
        assert_eq!(*log.events.lock(), vec!["finish"]);
    }
}
