//! In-memory HTTP client for tests: fixed routes, counted requests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

use super::{HttpClient, HttpResponse};

#[derive(Clone)]
struct Route {
    status: u32,
    content_type: Option<String>,
    body: Vec<u8>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeClient {
    routes: Arc<Mutex<HashMap<String, Route>>>,
    hits: Arc<AtomicUsize>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl FakeClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(self, url: &str, content_type: Option<&str>, body: &str) -> Self {
        self.route_status(url, 200, content_type, body)
    }

    pub(crate) fn route_status(
        self,
        url: &str,
        status: u32,
        content_type: Option<&str>,
        body: &str,
    ) -> Self {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Route {
                status,
                content_type: content_type.map(str::to_string),
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl HttpClient for FakeClient {
    fn get(&self, url: &Url) -> anyhow::Result<HttpResponse> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());
        let route = self.routes.lock().unwrap().get(url.as_str()).cloned();
        match route {
            Some(r) => Ok(HttpResponse {
                status: r.status,
                content_type: r.content_type,
                final_url: Some(url.clone()),
                body: r.body,
            }),
            None => anyhow::bail!("connection refused"),
        }
    }
}
