// ABOUTME: SaneString codec — length-prefixed, NUL-terminated byte strings, with an
// ABOUTME: empty-string wire asymmetry between the read and write sides.

use crate::error::{SaneError, SaneResult};
use crate::wire::stream;
use crate::wire::word::SaneWord;
use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite};

/// Encodes `text` onto `buf` using the SANE string wire format.
///
/// An empty string is written as a single length word of value zero (no
/// content bytes follow — there is nothing to terminate). A non-empty string
/// is written as a length word `len(text) + 1`, the text's bytes, then a
/// trailing NUL. This is the write side of the empty-string asymmetry: the
/// reader always consumes a length word first, so the two sides agree even
/// though the empty case carries no payload bytes.
pub fn encode_string(buf: &mut BytesMut, text: &str) -> SaneResult<()> {
    if text.as_bytes().contains(&0) {
        return Err(SaneError::InvalidArgument(
            "string argument contains an embedded NUL byte".to_string(),
        ));
    }

    if text.is_empty() {
        SaneWord::from_int(0).encode(buf);
        return Ok(());
    }

    let len = text.len() as i32 + 1;
    SaneWord::from_int(len).encode(buf);
    buf.put_slice(text.as_bytes());
    buf.put_u8(0);
    Ok(())
}

/// Reads a SANE string from an async stream.
///
/// Reads the length word `L`. `L == 0` means an absent/empty string and no
/// further bytes are consumed. Otherwise exactly `L` bytes are read; the
/// trailing byte is assumed to be the NUL terminator and discarded, and the
/// remaining `L - 1` bytes are decoded as UTF-8 text.
pub async fn read_string<R: AsyncRead + Unpin>(reader: &mut R) -> SaneResult<String> {
    let len = SaneWord::read(reader).await?.to_int();
    if len <= 0 {
        return Ok(String::new());
    }

    let len = len as usize;
    let mut bytes = vec![0u8; len];
    stream::read_exact(reader, &mut bytes).await?;

    // Drop the trailing NUL terminator.
    bytes.truncate(len - 1);
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes a SANE string to an async stream and flushes.
pub async fn write_string<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> SaneResult<()> {
    let mut buf = BytesMut::new();
    encode_string(&mut buf, text)?;
    stream::write_all(writer, &buf).await
}
