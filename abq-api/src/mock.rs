//! Scripted in-memory [`Transport`] for tests.
//!
//! Responses are registered per method and URL and replayed in order; the
//! last response registered for a route keeps being returned once the
//! earlier ones are consumed. Unrouted requests answer `404 Not Found`.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use crate::error::Result;
use crate::transport::{HttpRequest, HttpResponse, Transport};

type Route = (Method, String);

#[derive(Debug, Default)]
struct State {
    routes: HashMap<Route, VecDeque<HttpResponse>>,
    requests: Vec<HttpRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method url`.
    pub fn on(&self, method: Method, url: &str, status: StatusCode, body: &str) -> &Self {
        self.lock()
            .routes
            .entry((method, url.to_owned()))
            .or_default()
            .push_back(HttpResponse::new(status, body));
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// Requests received for `method url`.
    pub fn requests_to(&self, method: &Method, url: &str) -> Vec<HttpRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| &r.method == method && r.url.as_str() == url)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the recorded requests.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut state = self.lock();
        let route = (request.method.clone(), request.url.to_string());
        state.requests.push(request);
        let response = match state.routes.get_mut(&route) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| HttpResponse::new(StatusCode::NOT_FOUND, "")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;
    use reqwest::header::HeaderMap;

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            method: Method::GET,
            url: Url::parse(url).unwrap(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_last_response_is_sticky() {
        let mock = MockTransport::new();
        mock.on(Method::GET, "http://h/a", StatusCode::OK, "first")
            .on(Method::GET, "http://h/a", StatusCode::OK, "second");

        let bodies = [
            mock.send(get("http://h/a")).await.unwrap().body,
            mock.send(get("http://h/a")).await.unwrap().body,
            mock.send(get("http://h/a")).await.unwrap().body,
        ];
        assert_eq!(bodies, ["first", "second", "second"]);
        assert_eq!(mock.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_unrouted_request_is_not_found() {
        let mock = MockTransport::new();
        let response = mock.send(get("http://h/missing")).await.unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
