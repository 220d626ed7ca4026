//! Minimal HTTP/1.1 server serving fixed module sources for integration tests.
//!
//! Routes map a request path to a content type and body; anything else is 404.
//! Every request is counted so tests can assert on network use.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Default, Clone)]
pub struct Routes(HashMap<String, Route>);

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` at `path` (e.g. "/lib/a.js").
    pub fn module(mut self, path: &str, content_type: Option<&str>, body: &str) -> Self {
        self.0.insert(
            path.to_string(),
            Route {
                content_type: content_type.map(str::to_string),
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }
}

pub struct ModuleServer {
    /// Base URL without trailing slash, e.g. "http://127.0.0.1:12345".
    pub base: String,
    requests: Arc<AtomicUsize>,
}

impl ModuleServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(routes: Routes) -> ModuleServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let counter = Arc::clone(&counter);
            thread::spawn(move || handle(stream, &routes, &counter));
        }
    });
    ModuleServer {
        base: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &Routes, counter: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    counter.fetch_add(1, Ordering::SeqCst);

    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");
    let route = method
        .eq_ignore_ascii_case("GET")
        .then(|| routes.0.get(path))
        .flatten();

    let response = match route {
        Some(route) => {
            let content_type = route
                .content_type
                .as_ref()
                .map(|ct| format!("Content-Type: {}\r\n", ct))
                .unwrap_or_default();
            let mut head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
                route.body.len(),
                content_type
            )
            .into_bytes();
            head.extend_from_slice(&route.body);
            head
        }
        None => b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec(),
    };
    let _ = stream.write_all(&response);
    let _ = stream.flush();
}
