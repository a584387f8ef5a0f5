use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/query";

#[derive(Serialize)]
struct QueryRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    ai_understanding: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

/// Text of a backend `error` field, if it signals a failure.
///
/// Falsy JSON values (`null`, `false`, `0`, `""`) mean no error; strings are
/// shown as-is and anything else as its JSON text.
fn error_text(error: &Value) -> Option<String> {
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A successful answer from the query backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReply {
    /// The backend's restatement of what it understood the user to ask
    pub ai_understanding: String,
    pub response: String,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{0}")]
    Application(String),
    #[error("{0}")]
    Task(String),
}

#[derive(Clone)]
pub struct QueryClient {
    client: Client,
    endpoint: String,
}

impl QueryClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one query. The status code is not consulted: the backend
    /// reports failures as `{"error": ...}` bodies, with or without a 500.
    pub async fn query(&self, message: &str) -> Result<QueryReply, QueryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&QueryRequest { message })
            .send()
            .await?;

        debug!(status = %response.status(), endpoint = %self.endpoint, "query response received");

        let body = response.text().await?;
        let parsed: QueryResponse = serde_json::from_str(&body)?;

        if let Some(error) = parsed.error.as_ref().and_then(error_text) {
            return Err(QueryError::Application(error));
        }

        Ok(QueryReply {
            ai_understanding: parsed.ai_understanding.unwrap_or_default(),
            response: parsed.response.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP response on a random local port.
    ///
    /// Returns the endpoint URL and a handle resolving to the raw request text.
    pub async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let status = status.to_string();
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}/api/query", addr), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }
}
