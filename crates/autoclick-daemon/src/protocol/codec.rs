//! JSONL framing: one JSON document per line.

use futures::StreamExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, LinesCodec};

use crate::errors::DaemonError;

/// Longest accepted line. Settings and status frames are far below this.
pub const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Line reader that keeps partial lines buffered across cancelled reads.
pub type MessageReader<R> = FramedRead<R, LinesCodec>;

pub fn message_reader<R: AsyncRead>(reader: R) -> MessageReader<R> {
    FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH))
}

/// Read the next message. `Ok(None)` means the peer closed the stream.
///
/// Blank lines are skipped. Cancel-safe.
pub async fn read_message<R, T>(reader: &mut MessageReader<R>) -> Result<Option<T>, DaemonError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    while let Some(line) = reader.next().await {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        return Ok(Some(serde_json::from_str(trimmed)?));
    }
    Ok(None)
}

pub async fn write_message<W, T>(writer: &mut W, msg: &T) -> Result<(), DaemonError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut buf = serde_json::to_vec(msg)?;
    buf.push(b'\n');
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}
