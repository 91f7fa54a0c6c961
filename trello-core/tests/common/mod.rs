// Shared test harness: a one-connection-per-request stub API

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned response returned by the stub API, in order.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// Request heads (request line + headers) seen by the stub, in order.
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// Spawn a local HTTP stub that answers each incoming connection with
/// the next canned response and then closes it. Returns the base URL to
/// point the client at plus the log of observed request heads.
pub async fn spawn_stub_api(responses: Vec<StubResponse>) -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("stub should bind an ephemeral port");
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let task_log = Arc::clone(&log);

    tokio::spawn(async move {
        for response in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            // Requests carry no body, so the head is the whole request.
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }
            task_log
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(&head).into_owned());

            let reply = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                response.status,
                response.body.len(),
                response.body
            );
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (base_url, log)
}

/// The request line (e.g. `POST /boards?... HTTP/1.1`) of the n-th
/// request the stub saw.
pub fn request_line(log: &RequestLog, n: usize) -> String {
    let log = log.lock().unwrap();
    log[n].lines().next().unwrap_or_default().to_string()
}

pub fn request_count(log: &RequestLog) -> usize {
    log.lock().unwrap().len()
}
