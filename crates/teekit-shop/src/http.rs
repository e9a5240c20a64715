//! Minimal HTTP transport.
//!
//! The order service and the model catalogue speak plain HTTP with small
//! JSON or multipart payloads, so the client here is a deliberately small
//! HTTP/1.1 implementation over `std::net::TcpStream` behind a transport
//! trait. The trait is the seam: tests inject a mock, and an embedding
//! application with its own HTTP stack can do the same.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use tracing::debug;

use teekit_core::SubmissionError;

const IO_TIMEOUT: Duration = Duration::from_secs(30);

/// A request to execute. `url` must be an `http://host[:port]/path` URL.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: &'static str,
    pub url: String,
    /// Extra headers beyond Host/Content-Length/Connection.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET",
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn post(url: impl Into<String>, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            method: "POST",
            url: url.into(),
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes HTTP requests. Implemented by [`TcpTransport`] for production
/// and by in-memory mocks in tests.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, SubmissionError>;
}

/// Blocking HTTP/1.1 over a TCP stream, one connection per request.
#[derive(Debug, Default)]
pub struct TcpTransport;

impl TcpTransport {
    pub fn new() -> Self {
        Self
    }
}

impl HttpTransport for TcpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, SubmissionError> {
        let (host, port, path) = parse_url(&request.url)?;
        let endpoint = format!("{host}:{port}");

        let mut stream = TcpStream::connect(&endpoint).map_err(|e| SubmissionError::Connect {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;
        stream
            .set_read_timeout(Some(IO_TIMEOUT))
            .and_then(|_| stream.set_write_timeout(Some(IO_TIMEOUT)))
            .map_err(io_err)?;

        let mut head = format!(
            "{} {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\nContent-Length: {}\r\n",
            request.method,
            path,
            host,
            request.body.len()
        );
        for (name, value) in &request.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str("\r\n");

        debug!(method = request.method, url = %request.url, bytes = request.body.len(), "http request");
        stream.write_all(head.as_bytes()).map_err(io_err)?;
        stream.write_all(&request.body).map_err(io_err)?;

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).map_err(io_err)?;
        parse_response(&raw)
    }
}

fn io_err(e: std::io::Error) -> SubmissionError {
    SubmissionError::Io {
        reason: e.to_string(),
    }
}

/// Splits an `http://host[:port]/path` URL. Anything else is refused;
/// the order endpoint is plain HTTP on the internal network.
fn parse_url(url: &str) -> Result<(String, u16, String), SubmissionError> {
    let rest = url
        .strip_prefix("http://")
        .ok_or_else(|| SubmissionError::Protocol {
            reason: format!("unsupported url: {url}"),
        })?;

    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, "/"),
    };
    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (
            host,
            port.parse::<u16>().map_err(|_| SubmissionError::Protocol {
                reason: format!("bad port in url: {url}"),
            })?,
        ),
        None => (authority, 80),
    };
    if host.is_empty() {
        return Err(SubmissionError::Protocol {
            reason: format!("missing host in url: {url}"),
        });
    }
    Ok((host.to_string(), port, path.to_string()))
}

/// Parses a full HTTP/1.1 response read to connection close. Responses
/// from the collaborating services are small JSON bodies; chunked
/// transfer coding is not accepted.
fn parse_response(raw: &[u8]) -> Result<HttpResponse, SubmissionError> {
    let header_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| SubmissionError::Protocol {
            reason: "response without header terminator".to_string(),
        })?;
    let head = std::str::from_utf8(&raw[..header_end]).map_err(|_| SubmissionError::Protocol {
        reason: "non-utf8 response head".to_string(),
    })?;
    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();

    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| SubmissionError::Protocol {
            reason: format!("malformed status line: {status_line}"),
        })?;

    let mut content_length = None;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name == "transfer-encoding" && value.trim().eq_ignore_ascii_case("chunked") {
            return Err(SubmissionError::Protocol {
                reason: "chunked responses are not supported".to_string(),
            });
        }
        if name == "content-length" {
            content_length = value.trim().parse::<usize>().ok();
        }
    }

    let mut body = raw[header_end + 4..].to_vec();
    if let Some(len) = content_length {
        if body.len() < len {
            return Err(SubmissionError::Protocol {
                reason: format!("truncated body: {} of {} bytes", body.len(), len),
            });
        }
        body.truncate(len);
    }
    Ok(HttpResponse { status, body })
}
