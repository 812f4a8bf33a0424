// src/cli/server.rs
use crate::cli::error::CliResult;
use crate::remote::{RemoteInterface, Request};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

fn parse_error(message: String) -> Value {
    json!({
        "id": Value::Null,
        "success": false,
        "error": { "code": -32700, "message": message }
    })
}

/// Answer one JSON request per input line until the reader is exhausted.
/// Returns the number of requests handled.
#[instrument(skip_all, level = "debug")]
pub async fn serve<R, W>(remote: &RemoteInterface, reader: R, mut writer: W) -> CliResult<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;
    info!("Serving requests");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                debug!(method = %request.method, "request");
                remote.handle(request).await
            }
            Err(e) => {
                warn!("Unparseable request: {}", e);
                parse_error(format!("Parse error: {}", e))
            }
        };

        writer.write_all(response.to_string().as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        handled += 1;
    }

    info!("Input closed after {} request(s)", handled);
    Ok(handled)
}
