// ABOUTME: Thin exact-read/exact-write wrapping of an async transport.
// ABOUTME: The framed byte stream component referenced throughout the wire codec.

use crate::error::{SaneError, SaneResult};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Reads exactly `buf.len()` bytes, failing with [`SaneError::TruncatedStream`]
/// on a short read or clean EOF partway through the unit.
///
/// This is the primitive every framed unit (word, string, record) builds on;
/// no partial reads are ever handed back to a caller.
pub async fn read_exact<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut [u8]) -> SaneResult<()> {
    let mut read = 0;
    while read < buf.len() {
        let n = reader.read(&mut buf[read..]).await?;
        if n == 0 {
            return Err(SaneError::TruncatedStream {
                expected: buf.len(),
                got: read,
            });
        }
        read += n;
    }
    Ok(())
}

/// Writes the entire slice and flushes a buffered stream immediately after.
pub async fn write_all<W: AsyncWrite + Unpin>(writer: &mut W, buf: &[u8]) -> SaneResult<()> {
    writer.write_all(buf).await?;
    writer.flush().await?;
    Ok(())
}
