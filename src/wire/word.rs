// ABOUTME: SaneWord codec — the opaque 4-byte big-endian integer that underlies every
// ABOUTME: other wire type (lengths, status codes, handles, version numbers).

use crate::error::SaneResult;
use crate::wire::stream;
use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite};

/// An opaque 4-byte big-endian integer, the base unit of the SANE wire format.
///
/// The wire representation is canonical network byte order; the numeric view
/// is a signed 32-bit integer.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SaneWord(i32);

impl SaneWord {
    /// Builds a word from its 4-byte big-endian wire representation.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len() != 4`. Callers reading from a stream should go
    /// through [`SaneWord::read`] instead, which reports short reads as
    /// [`crate::error::SaneError::TruncatedStream`] rather than panicking.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), 4, "SaneWord::from_bytes requires exactly 4 bytes");
        let mut arr = [0u8; 4];
        arr.copy_from_slice(bytes);
        SaneWord(i32::from_be_bytes(arr))
    }

    /// Builds a word directly from a signed 32-bit value.
    pub fn from_int(n: i32) -> Self {
        SaneWord(n)
    }

    /// Returns the signed 32-bit numeric view.
    pub fn to_int(self) -> i32 {
        self.0
    }

    /// Returns the 4-byte big-endian wire representation.
    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Encodes this word into a growable buffer.
    pub fn encode(self, buf: &mut BytesMut) {
        buf.put_i32(self.0);
    }

    /// Reads one word from an async stream, failing with `TruncatedStream` on
    /// a short read rather than panicking.
    pub async fn read<R: AsyncRead + Unpin>(reader: &mut R) -> SaneResult<Self> {
        let mut bytes = [0u8; 4];
        stream::read_exact(reader, &mut bytes).await?;
        Ok(SaneWord::from_bytes(&bytes))
    }

    /// Writes one word to an async stream and flushes.
    pub async fn write<W: AsyncWrite + Unpin>(self, writer: &mut W) -> SaneResult<()> {
        stream::write_all(writer, &self.to_bytes()).await
    }
}

/// Free function form of [`SaneWord::to_bytes`].
pub fn encode_int(n: i32) -> [u8; 4] {
    SaneWord::from_int(n).to_bytes()
}

/// Free function form of [`SaneWord::from_bytes`].
///
/// # Panics
///
/// Panics if `bytes.len() != 4`.
pub fn decode_word(bytes: &[u8]) -> i32 {
    SaneWord::from_bytes(bytes).to_int()
}

/// Packs a SANE version triple as `(major & 0xFF) << 24 | (minor & 0xFF) << 16
/// | (build & 0xFFFF)`.
pub fn encode_version(major: u8, minor: u8, build: u16) -> SaneWord {
    let packed = ((major as i32) & 0xFF) << 24 | ((minor as i32) & 0xFF) << 16 | (build as i32 & 0xFFFF);
    SaneWord::from_int(packed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_round_trips_for_all_signed_32_bit_values_sampled() {
        let samples: &[i32] = &[0, 1, -1, i32::MIN, i32::MAX, 42, -42, 0x7FFF_FFFF, -0x8000_0000];
        for &n in samples {
            let bytes = encode_int(n);
            assert_eq!(decode_word(&bytes), n);
        }
    }

    #[test]
    #[should_panic]
    fn from_bytes_panics_on_wrong_length() {
        SaneWord::from_bytes(&[0, 1, 2]);
    }

    #[test]
    fn version_packing_matches_bit_layout() {
        let v = encode_version(1, 0, 3);
        // bits 31..24 = 1, 23..16 = 0, 15..0 = 3
        assert_eq!(v.to_int(), 0x0100_0003u32 as i32);

        let v2 = encode_version(0xFF, 0xFF, 0xFFFF);
        assert_eq!(v2.to_int(), 0xFFFF_FFFFu32 as i32);
    }

    #[tokio::test]
    async fn read_word_fails_on_truncated_stream() {
        let mut cursor = std::io::Cursor::new(vec![0u8, 1]);
        let err = SaneWord::read(&mut cursor).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::SaneError::TruncatedStream { .. }
        ));
    }

    #[tokio::test]
    async fn write_then_read_round_trips_over_a_stream() {
        let mut buf = Vec::new();
        SaneWord::from_int(-7).write(&mut buf).await.unwrap();
        let mut cursor = std::io::Cursor::new(buf);
        let word = SaneWord::read(&mut cursor).await.unwrap();
        assert_eq!(word.to_int(), -7);
    }
}
