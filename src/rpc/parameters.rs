// ABOUTME: Frame type and frame parameters as returned by GET_PARAMETERS, plus the
// ABOUTME: START response (data-socket port, byte order, authorization resource).

use crate::error::{SaneError, SaneResult};
use crate::wire::{read_string, SaneWord};
use num_enum::TryFromPrimitive;
use tokio::io::AsyncRead;

/// The kind of raster data a frame carries.
#[derive(TryFromPrimitive)]
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// A complete single-channel grayscale image.
    Gray = 0,
    /// A complete interleaved RGB image.
    Rgb = 1,
    /// The red plane of an RGB image delivered as three separate frames.
    Red = 2,
    /// The green plane of an RGB image delivered as three separate frames.
    Green = 3,
    /// The blue plane of an RGB image delivered as three separate frames.
    Blue = 4,
}

impl FrameType {
    /// A singleton frame type constitutes a complete image by itself; no
    /// other frame may be added alongside one.
    pub fn is_singleton(self) -> bool {
        matches!(self, FrameType::Gray | FrameType::Rgb)
    }
}

/// Geometry and bookkeeping for one frame, as reported by `GET_PARAMETERS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameParameters {
    pub frame_type: FrameType,
    pub is_last: bool,
    pub bytes_per_line: i32,
    pub pixels_per_line: i32,
    pub line_count: i32,
    pub depth_per_pixel: i32,
}

impl FrameParameters {
    /// Reads the body of a `GET_PARAMETERS` response (after its status word
    /// has already been validated as zero).
    pub(crate) async fn read<R: AsyncRead + Unpin>(reader: &mut R) -> SaneResult<Self> {
        let frame_type_raw = SaneWord::read(reader).await?.to_int();
        let frame_type = FrameType::try_from_primitive(frame_type_raw).map_err(|_| {
            SaneError::ProtocolStatus(frame_type_raw)
        })?;
        let is_last = SaneWord::read(reader).await?.to_int() != 0;
        let bytes_per_line = SaneWord::read(reader).await?.to_int();
        let pixels_per_line = SaneWord::read(reader).await?.to_int();
        let line_count = SaneWord::read(reader).await?.to_int();
        let depth_per_pixel = SaneWord::read(reader).await?.to_int();

        Ok(FrameParameters {
            frame_type,
            is_last,
            bytes_per_line,
            pixels_per_line,
            line_count,
            depth_per_pixel,
        })
    }
}

/// Response body of a `START` RPC: the data-socket port, the server's byte
/// order for 16-bit samples, and an authorization resource string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartResponse {
    pub port: i32,
    pub byte_order: i32,
    pub resource: String,
}

impl StartResponse {
    pub(crate) async fn read<R: AsyncRead + Unpin>(reader: &mut R) -> SaneResult<Self> {
        let port = SaneWord::read(reader).await?.to_int();
        let byte_order = SaneWord::read(reader).await?.to_int();
        let resource = read_string(reader).await?;
        Ok(StartResponse {
            port,
            byte_order,
            resource,
        })
    }

    /// True if this frame's 16-bit samples need byte-swapping to match host
    /// native order. `0` denotes little-endian on the wire, matching the
    /// convention `saned` uses for its native byte order word.
    pub fn is_little_endian(&self) -> bool {
        self.byte_order == 0
    }
}
