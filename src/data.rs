// ABOUTME: Record-framed data reader — consumes length-prefixed byte records from the
// ABOUTME: data socket until the sentinel, assembling one frame's raw pixel buffer.

use crate::error::{SaneError, SaneResult};
use crate::wire::stream;
use tokio::io::AsyncRead;

/// End-of-records sentinel: a record length of `0xFFFFFFFF` terminates a frame.
const SENTINEL: u32 = 0xFFFF_FFFF;

/// Reads one frame's worth of pixel data from a data-socket stream.
///
/// Bytes arrive as a sequence of records, each prefixed by a 4-byte
/// big-endian unsigned length. The sentinel length terminates the frame with
/// no payload. Record boundaries are a transport-level fragmentation detail;
/// payloads are appended contiguously regardless of how they were split.
///
/// `bytes_per_line * line_count` is the expected total size for this frame;
/// a mismatch between that and what was actually read is reported as
/// [`SaneError::IncompleteImage`], since it means the frame the server sent
/// does not match the geometry it advertised via `GET_PARAMETERS`.
pub async fn read_frame_records<R: AsyncRead + Unpin>(
    reader: &mut R,
    bytes_per_line: i32,
    line_count: i32,
) -> SaneResult<Vec<u8>> {
    let expected_len = (bytes_per_line as usize).saturating_mul(line_count.max(0) as usize);
    let mut buffer = Vec::with_capacity(expected_len.min(16 * 1024 * 1024));

    loop {
        let mut length_bytes = [0u8; 4];
        stream::read_exact(reader, &mut length_bytes).await?;
        let record_len = u32::from_be_bytes(length_bytes);

        if record_len == SENTINEL {
            break;
        }

        if record_len > i32::MAX as u32 {
            return Err(SaneError::ProtocolOverflow(record_len));
        }

        let mut record = vec![0u8; record_len as usize];
        stream::read_exact(reader, &mut record).await?;
        buffer.extend_from_slice(&record);
    }

    if buffer.len() != expected_len {
        return Err(SaneError::IncompleteImage(format!(
            "frame data length {} does not match declared geometry {}x{} ({} bytes)",
            buffer.len(),
            bytes_per_line,
            line_count,
            expected_len
        )));
    }

    Ok(buffer)
}
