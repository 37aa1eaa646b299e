//! In-process HTTP server standing in for a JIRA instance
//!
//! Answers the session endpoint and the field list endpoint with canned
//! responses, so the client sees real HTTP statuses and bodies.
#![allow(dead_code)]

use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Canned HTTP response
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into(),
        }
    }

    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/html;charset=UTF-8",
            body: body.into(),
        }
    }
}

/// Running fake; stops when dropped
pub struct FakeJira {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl FakeJira {
    /// Serve `session` on `/rest/auth/1/session` and `fields` on the field list
    pub async fn start(session: Reply, fields: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake JIRA");
        let addr = listener.local_addr().expect("Fake JIRA has no address");

        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let session = session.clone();
                let fields = fields.clone();
                tokio::spawn(async move {
                    let _ = handle_connection(stream, &session, &fields).await;
                });
            }
        });

        Self { addr, handle }
    }

    /// Logged-in session, with `fields` as the field list response
    pub async fn with_fields(fields: Reply) -> Self {
        Self::start(Reply::json(200, r#"{"name":"bot"}"#), fields).await
    }

    /// Base URL to use as JIRA_URL
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for FakeJira {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    session: &Reply,
    fields: &Reply,
) -> std::io::Result<()> {
    // Read the request head; GET requests carry no body
    let mut request = Vec::new();
    let mut buffer = [0u8; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        let size = stream.read(&mut buffer).await?;
        if size == 0 {
            return Ok(());
        }
        request.extend_from_slice(&buffer[..size]);
    }

    let request = String::from_utf8_lossy(&request);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    let not_found = Reply::json(404, r#"{"errorMessages":["Not found"]}"#);
    let reply = if path.contains("/session") {
        session
    } else if path.contains("/field") {
        fields
    } else {
        &not_found
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reason_phrase(reply.status),
        reply.content_type,
        reply.body.len(),
        reply.body
    );

    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
