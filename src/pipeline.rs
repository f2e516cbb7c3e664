//! Line-oriented driver around [`Engine`].
//!
//! Reads one JSON record per line (raw bytes, so a line that is not UTF-8
//! is just another malformed record), normalizes up to `workers` records at a
//! time on the blocking pool, and writes canonical records in input order.

use crate::{Engine, MalformedReason};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Counters for one [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Non-blank lines read.
    pub read: u64,
    pub emitted: u64,
    pub dropped_not_json: u64,
    pub dropped_missing_required: u64,
}

impl Summary {
    pub fn dropped(&self) -> u64 {
        self.dropped_not_json + self.dropped_missing_required
    }
}

/// Normalize every line of `reader` as a record from `source` and write the
/// results to `writer`, one JSON object per line.
///
/// Fails before reading anything if `source` has no rule set. Malformed
/// records are counted and skipped; I/O errors end the run.
pub async fn run<R, W>(
    engine: Arc<Engine>,
    source: &str,
    reader: R,
    mut writer: W,
    workers: usize,
) -> anyhow::Result<Summary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    engine.rule_set(source)?;
    let source: Arc<str> = Arc::from(source);

    let segments = stream::unfold(Some(reader.split(b'\n')), |state| async move {
        let mut segments = state?;
        match segments.next_segment().await {
            Ok(Some(segment)) => Some((Ok(segment), Some(segments))),
            Ok(None) => None,
            Err(e) => Some((Err(e), None)),
        }
    });

    let outcomes = segments
        .enumerate()
        .filter(|(_, segment)| futures::future::ready(!matches!(segment, Ok(bytes) if is_blank(bytes))))
        .map(|(index, segment)| {
            let engine = Arc::clone(&engine);
            let source = Arc::clone(&source);
            async move {
                let bytes = segment?;
                let outcome = tokio::task::spawn_blocking(move || engine.normalize(&bytes, &source)).await?;
                anyhow::Ok((index + 1, outcome))
            }
        })
        .buffered(workers.max(1));
    let mut outcomes = std::pin::pin!(outcomes);

    let mut summary = Summary::default();
    let drained = async {
        while let Some(outcome) = outcomes.next().await {
            let (line, outcome) = outcome?;
            summary.read += 1;
            match outcome {
                Ok(event) => {
                    let mut json = event.to_json_line()?;
                    json.push('\n');
                    writer.write_all(json.as_bytes()).await?;
                    summary.emitted += 1;
                }
                Err(e) => match e.malformed_reason() {
                    Some(reason) => {
                        warn!(source = %source, line, %reason, "record dropped");
                        match reason {
                            MalformedReason::NotJson => summary.dropped_not_json += 1,
                            MalformedReason::MissingRequiredField => summary.dropped_missing_required += 1,
                        }
                    }
                    None => return Err(anyhow::Error::from(e)),
                },
            }
        }
        anyhow::Ok(())
    }
    .await;

    // Whatever was emitted before a failure still reaches the sink.
    let flushed = writer.flush().await;
    drained?;
    flushed?;

    debug!(source = %source, ?summary, "pipeline finished");
    Ok(summary)
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}
