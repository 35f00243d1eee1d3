use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::mpsc,
    task::JoinSet,
};
use tracing::{debug, error, warn};

use crate::{
    commands::dispatch,
    core::errors::{AppError, AppResult},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub command: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub id: Value,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AppError>,
}

impl Response {
    fn from_result(id: Value, result: AppResult<Value>) -> Self {
        match result {
            Ok(data) => Self {
                id,
                ok: true,
                data: Some(data),
                error: None,
            },
            Err(err) => Self {
                id,
                ok: false,
                data: None,
                error: Some(err),
            },
        }
    }
}

pub async fn handle(state: &AppState, request: Request) -> Response {
    debug!(command = %request.command, "dispatching");
    let result = dispatch(state, &request.command, request.args).await;
    if let Err(err) = &result {
        warn!(command = %request.command, code = err.code(), error = %err, "command failed");
    }
    Response::from_result(request.id, result)
}

fn encode(response: &Response) -> String {
    serde_json::to_string(response).unwrap_or_else(|err| {
        error!(error = %err, "failed to encode response");
        r#"{"id":null,"ok":false,"error":{"code":"INTERNAL_ERROR","message":"response encoding failed"}}"#
            .to_string()
    })
}

/// Serves newline-delimited requests from `reader` until EOF. Each request
/// runs as its own task, so responses may come back out of order; clients
/// match them by `id`. Returns the writer once every response is flushed.
pub async fn serve<R, W>(state: AppState, reader: R, mut writer: W) -> AppResult<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let writer_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<W, std::io::Error>(writer)
    });

    let mut requests = JoinSet::new();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                let state = state.clone();
                let tx = tx.clone();
                requests.spawn(async move {
                    let response = handle(&state, request).await;
                    let _ = tx.send(encode(&response));
                });
            }
            Err(err) => {
                let response = Response::from_result(
                    Value::Null,
                    Err(AppError::Parse(format!("malformed request: {err}"))),
                );
                let _ = tx.send(encode(&response));
            }
        }
    }

    while let Some(joined) = requests.join_next().await {
        if let Err(err) = joined {
            error!(error = %err, "request task panicked");
        }
    }
    drop(tx);
    writer_task
        .await
        .map_err(|err| AppError::Internal(format!("writer task failed: {err}")))?
        .map_err(AppError::from)
}
