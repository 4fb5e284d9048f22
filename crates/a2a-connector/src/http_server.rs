//! Lightweight read-only HTTP surface over the registry.
//!
//! - `GET /registry`: JSON array of every entry
//! - `GET /registry/{name}`: one entry, or an empty body when unknown
//!
//! Other paths answer 404 and other methods 405. One request per
//! connection.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use a2a_registry::{RegistryEntry, RegistryRepository};

const JSON: &str = "application/json; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

/// A response ready to be written to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn json(body: String) -> Self {
        Self {
            status: "200 OK",
            content_type: JSON,
            body,
        }
    }

    fn text(status: &'static str, body: &str) -> Self {
        Self {
            status,
            content_type: TEXT,
            body: body.to_string(),
        }
    }

    fn to_http(&self) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.content_type,
            self.body.len(),
            self.body,
        )
    }
}

/// HTTP server answering registry queries.
pub struct RegistryHttpServer {
    listener: TcpListener,
    repository: Arc<RegistryRepository>,
}

impl RegistryHttpServer {
    /// Bind `bind_addr`, which may be `host:port` with a hostname.
    pub async fn bind(
        bind_addr: &str,
        repository: Arc<RegistryRepository>,
    ) -> Result<Self, anyhow::Error> {
        let listener = TcpListener::bind(bind_addr)
            .await
            .with_context(|| format!("Failed to bind registry HTTP server on {bind_addr}"))?;
        Ok(Self {
            listener,
            repository,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, anyhow::Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until the task is dropped.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        if let Ok(addr) = self.listener.local_addr() {
            tracing::info!(%addr, "Registry HTTP server listening");
        }
        serve(self.listener, self.repository).await
    }
}

/// Serve registry queries on an already bound listener.
pub async fn serve(
    listener: TcpListener,
    repository: Arc<RegistryRepository>,
) -> Result<(), anyhow::Error> {
    loop {
        let (mut stream, peer_addr) = listener.accept().await?;
        let repository = Arc::clone(&repository);
        tokio::spawn(async move {
            if let Err(e) = handle_http_request(&mut stream, &repository).await {
                tracing::debug!(peer = %peer_addr, error = %e, "HTTP request error");
            }
        });
    }
}

async fn handle_http_request(
    stream: &mut TcpStream,
    repository: &RegistryRepository,
) -> Result<(), anyhow::Error> {
    let mut buf = vec![0u8; 4096];
    let n = stream.read(&mut buf).await?;
    if n == 0 {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&buf[..n]);
    let (method, path) = parse_request_line(&request);
    let response = route(method, path, repository);
    tracing::debug!(method, path, status = response.status, "HTTP request");

    stream.write_all(response.to_http().as_bytes()).await?;
    stream.flush().await?;
    Ok(())
}

/// Parse the method and path (without query string) from an HTTP request.
fn parse_request_line(request: &str) -> (&str, &str) {
    // "GET /path?query HTTP/1.1\r\n..."
    let first_line = request.lines().next().unwrap_or("");
    let mut parts = first_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("/");
    let path = target.split('?').next().unwrap_or(target);
    (method, path)
}

/// Answer one request against the current registry state.
pub fn route(method: &str, path: &str, repository: &RegistryRepository) -> HttpResponse {
    let path = path.trim_end_matches('/');
    let lookup = if path == "/registry" {
        None
    } else if let Some(name) = path.strip_prefix("/registry/") {
        Some(name)
    } else {
        return HttpResponse::text("404 Not Found", "Not Found. Available: /registry, /registry/{name}");
    };

    if method != "GET" {
        return HttpResponse::text("405 Method Not Allowed", "Method Not Allowed");
    }

    let body = match lookup {
        None => {
            let entries = repository.find_all();
            let entries: Vec<&RegistryEntry> = entries.iter().map(Arc::as_ref).collect();
            serde_json::to_string(&entries)
        }
        Some(name) => match repository.find_by_name(name) {
            Some(entry) => serde_json::to_string(entry.as_ref()),
            None => Ok(String::new()),
        },
    };

    match body {
        Ok(body) => HttpResponse::json(body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize registry entries");
            HttpResponse::text("500 Internal Server Error", "Internal Server Error")
        }
    }
}
