//! In-process REST table that caps every response, like a backend configured
//! with a maximum row count.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};
use tracing::warn;

use crate::backend::{BackendConfig, BackendError, RestClient};

#[derive(Debug)]
pub(crate) struct CappedTable {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
    server: JoinHandle<()>,
}

impl CappedTable {
    /// Serve `rows` in order, never more than `max_rows` per response.
    pub(crate) async fn serve(rows: Vec<Value>, max_rows: usize) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}", listener.local_addr()?);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        let server = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                if let Err(error) = respond(stream, &rows, max_rows, &seen).await {
                    warn!(%error, "capped table request failed");
                }
            }
        });

        Ok(Self {
            url,
            requests,
            server,
        })
    }

    pub(crate) fn client(&self) -> Result<RestClient, BackendError> {
        RestClient::new(BackendConfig {
            url: self.url.clone(),
            anon_key: "anon".to_string(),
            timeout: std::time::Duration::from_secs(5),
        })
    }

    /// Request heads received so far, in arrival order.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Drop for CappedTable {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn respond(
    mut stream: TcpStream,
    rows: &[Value],
    max_rows: usize,
    seen: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buffer = [0_u8; 1024];

    while !head.windows(4).any(|window| window == b"\r\n\r\n") {
        let read = stream.read(&mut buffer).await?;

        if read == 0 {
            break;
        }

        head.extend_from_slice(buffer.get(..read).unwrap_or_default());
    }

    let head = String::from_utf8_lossy(&head).into_owned();
    let offset = query_value(&head, "offset").unwrap_or(0);
    let limit = query_value(&head, "limit").unwrap_or(usize::MAX).min(max_rows);
    let end = rows.len().min(offset.saturating_add(limit));
    let page = rows.get(offset..end).unwrap_or_default();

    let range = match end.checked_sub(1) {
        Some(last) if !page.is_empty() => format!("{offset}-{last}/{}", rows.len()),
        _ => format!("*/{}", rows.len()),
    };

    if let Ok(mut requests) = seen.lock() {
        requests.push(head);
    }

    let body = serde_json::to_vec(page)?;
    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-range: {range}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        body.len()
    );

    stream.write_all(response.as_bytes()).await?;
    stream.write_all(&body).await?;
    stream.shutdown().await
}

fn query_value(head: &str, key: &str) -> Option<usize> {
    let target = head.lines().next()?.split_whitespace().nth(1)?;
    let (_, query) = target.split_once('?')?;

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == key)?
        .1
        .parse()
        .ok()
}
