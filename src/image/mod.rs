// ABOUTME: Frame model and image builder — accumulates frames arriving from one
// ABOUTME: acquisition, validates cross-frame consistency, and materializes
// ABOUTME: a uniform raster on build().

pub mod raster;

use crate::error::{SaneError, SaneResult};
use crate::rpc::{FrameParameters, FrameType};
pub use raster::{ColorModel, Raster, RasterLayout};

/// One frame: its declared geometry plus the raw pixel buffer that arrived
/// with it. The buffer is always exactly `bytes_per_line * line_count` bytes
/// (enforced by [`crate::data::read_frame_records`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub parameters: FrameParameters,
    pub data: Vec<u8>,
}

/// A write-once scalar: the first write fills it in, any later write must
/// agree or the builder rejects the frame. A fused set-or-check operation
/// instead of a separate wrapper type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct WriteOnce(Option<i32>);

impl WriteOnce {
    fn set_or_check(&mut self, value: i32, field: &str) -> SaneResult<()> {
        match self.0 {
            None => {
                self.0 = Some(value);
                Ok(())
            }
            Some(existing) if existing == value => Ok(()),
            Some(existing) => Err(SaneError::IncompleteImage(format!(
                "inconsistent {field}: first frame declared {existing}, later frame declared {value}"
            ))),
        }
    }

    fn get(&self) -> Option<i32> {
        self.0
    }
}

/// Accumulates frames for a single acquisition and validates them against
/// each other as they arrive.
///
/// Sequential protocol: call [`ImageBuilder::add_frame`] once per frame (any
/// arrival order is fine for an RGB trio — canonical ordering happens at
/// [`ImageBuilder::build`]), then call `build` once to materialize the
/// assembled image.
#[derive(Debug, Default)]
pub struct ImageBuilder {
    frames: Vec<Frame>,
    depth: WriteOnce,
    width: WriteOnce,
    height: WriteOnce,
    bytes_per_line: WriteOnce,
    byte_order: WriteOnce,
    payload_len: Option<usize>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the data-socket byte-order word reported by `START` for this
    /// acquisition, so the raster materializer can correct 16-bit sample
    /// byte order. Must agree across every frame of one acquisition, the
    /// same as the geometry scalars.
    pub fn set_byte_order(&mut self, byte_order: i32) -> SaneResult<()> {
        self.byte_order.set_or_check(byte_order, "byte_order")
    }

    /// Adds one frame, validating it against the invariants every frame of
    /// one acquisition must share: no two frames share a type, a singleton
    /// type excludes all others, every frame's buffer length matches the
    /// first frame's, and the four geometry scalars are consistent across
    /// frames.
    pub fn add_frame(&mut self, frame: Frame) -> SaneResult<()> {
        if self
            .frames
            .iter()
            .any(|f| f.parameters.frame_type == frame.parameters.frame_type)
        {
            return Err(SaneError::IncompleteImage(format!(
                "duplicate frame type {:?}",
                frame.parameters.frame_type
            )));
        }

        let incoming_is_singleton = frame.parameters.frame_type.is_singleton();
        let existing_has_singleton = self
            .frames
            .iter()
            .any(|f| f.parameters.frame_type.is_singleton());

        if existing_has_singleton || (incoming_is_singleton && !self.frames.is_empty()) {
            return Err(SaneError::IncompleteImage(
                "a singleton frame type (GRAY/RGB) cannot be combined with any other frame"
                    .to_string(),
            ));
        }

        if let Some(expected_len) = self.payload_len {
            if frame.data.len() != expected_len {
                return Err(SaneError::IncompleteImage(format!(
                    "frame payload length {} does not match the first frame's length {}",
                    frame.data.len(),
                    expected_len
                )));
            }
        } else {
            self.payload_len = Some(frame.data.len());
        }

        self.depth
            .set_or_check(frame.parameters.depth_per_pixel, "depth")?;
        self.width
            .set_or_check(frame.parameters.pixels_per_line, "width")?;
        self.height
            .set_or_check(frame.parameters.line_count, "height")?;
        self.bytes_per_line
            .set_or_check(frame.parameters.bytes_per_line, "bytes_per_line")?;

        self.frames.push(frame);
        Ok(())
    }

    /// Closes the image: succeeds only if exactly one singleton frame is
    /// present, or exactly one each of RED, GREEN, BLUE. The trio is
    /// reordered into canonical RED, GREEN, BLUE order regardless of
    /// arrival order.
    pub fn build(self) -> SaneResult<AssembledImage> {
        let is_trio = self.frames.len() == 3
            && [FrameType::Red, FrameType::Green, FrameType::Blue]
                .iter()
                .all(|t| self.frames.iter().any(|f| f.parameters.frame_type == *t));
        let is_singleton = self.frames.len() == 1 && self.frames[0].parameters.frame_type.is_singleton();

        if !is_trio && !is_singleton {
            return Err(SaneError::IncompleteImage(format!(
                "expected one singleton frame or a complete RED/GREEN/BLUE trio, got {} frame(s)",
                self.frames.len()
            )));
        }

        let mut frames = self.frames;
        if is_trio {
            frames.sort_by_key(|f| match f.parameters.frame_type {
                FrameType::Red => 0,
                FrameType::Green => 1,
                FrameType::Blue => 2,
                _ => unreachable!("trio branch only contains RED/GREEN/BLUE"),
            });
        }

        Ok(AssembledImage {
            frames,
            width: self.width.get().unwrap_or(0),
            height: self.height.get().unwrap_or(0),
            depth: self.depth.get().unwrap_or(0),
            bytes_per_line: self.bytes_per_line.get().unwrap_or(0),
            byte_order: self.byte_order.get().unwrap_or(0),
        })
    }
}

/// A fully assembled image: one or three frames in canonical order, plus the
/// geometry scalars every frame agreed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledImage {
    pub frames: Vec<Frame>,
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub bytes_per_line: i32,
    pub(crate) byte_order: i32,
}

impl AssembledImage {
    /// Produces the uniform raster description for this image.
    pub fn materialize(self) -> SaneResult<Raster> {
        raster::materialize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_frame(data: Vec<u8>, w: i32, h: i32) -> Frame {
        Frame {
            parameters: FrameParameters {
                frame_type: FrameType::Gray,
                is_last: true,
                bytes_per_line: w,
                pixels_per_line: w,
                line_count: h,
                depth_per_pixel: 8,
            },
            data,
        }
    }

    fn plane_frame(frame_type: FrameType, data: Vec<u8>, bpl: i32, lines: i32) -> Frame {
        Frame {
            parameters: FrameParameters {
                frame_type,
                is_last: true,
                bytes_per_line: bpl,
                pixels_per_line: bpl,
                line_count: lines,
                depth_per_pixel: 8,
            },
            data,
        }
    }

    #[test]
    fn single_gray_frame_builds() {
        let mut builder = ImageBuilder::new();
        builder
            .add_frame(gray_frame(vec![0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88], 4, 2))
            .unwrap();
        let image = builder.build().unwrap();
        assert_eq!(image.width, 4);
        assert_eq!(image.height, 2);
        assert_eq!(image.frames.len(), 1);
    }

    #[test]
    fn rgb_trio_is_order_agnostic_and_canonically_sorted() {
        let permutations: Vec<Vec<FrameType>> = vec![
            vec![FrameType::Red, FrameType::Green, FrameType::Blue],
            vec![FrameType::Red, FrameType::Blue, FrameType::Green],
            vec![FrameType::Green, FrameType::Red, FrameType::Blue],
            vec![FrameType::Green, FrameType::Blue, FrameType::Red],
            vec![FrameType::Blue, FrameType::Red, FrameType::Green],
            vec![FrameType::Blue, FrameType::Green, FrameType::Red],
        ];

        for order in permutations {
            let mut builder = ImageBuilder::new();
            for t in order {
                builder.add_frame(plane_frame(t, vec![1, 2, 3, 4], 4, 1)).unwrap();
            }
            let image = builder.build().unwrap();
            let types: Vec<FrameType> = image.frames.iter().map(|f| f.parameters.frame_type).collect();
            assert_eq!(types, vec![FrameType::Red, FrameType::Green, FrameType::Blue]);
        }
    }

    #[test]
    fn duplicate_type_is_rejected() {
        let mut builder = ImageBuilder::new();
        builder.add_frame(gray_frame(vec![0; 4], 4, 1)).unwrap();
        let err = builder.add_frame(gray_frame(vec![0; 4], 4, 1)).unwrap_err();
        assert!(matches!(err, SaneError::IncompleteImage(_)));
    }

    #[test]
    fn singleton_mixed_with_another_frame_is_rejected() {
        let mut builder = ImageBuilder::new();
        builder.add_frame(gray_frame(vec![0; 4], 4, 1)).unwrap();
        let err = builder
            .add_frame(plane_frame(FrameType::Red, vec![0; 4], 4, 1))
            .unwrap_err();
        assert!(matches!(err, SaneError::IncompleteImage(_)));
    }

    #[test]
    fn mismatched_payload_length_is_rejected() {
        let mut builder = ImageBuilder::new();
        builder
            .add_frame(plane_frame(FrameType::Red, vec![0; 4], 4, 1))
            .unwrap();
        let err = builder
            .add_frame(plane_frame(FrameType::Green, vec![0; 8], 4, 1))
            .unwrap_err();
        assert!(matches!(err, SaneError::IncompleteImage(_)));
    }

    #[test]
    fn mismatched_geometry_scalar_is_rejected() {
        let mut builder = ImageBuilder::new();
        builder
            .add_frame(plane_frame(FrameType::Red, vec![0; 4], 4, 1))
            .unwrap();
        let err = builder
            .add_frame(plane_frame(FrameType::Green, vec![0; 4], 4, 2))
            .unwrap_err();
        assert!(matches!(err, SaneError::IncompleteImage(_)));
    }

    #[test]
    fn build_with_incomplete_set_fails() {
        let mut builder = ImageBuilder::new();
        builder
            .add_frame(plane_frame(FrameType::Red, vec![0; 4], 4, 1))
            .unwrap();
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SaneError::IncompleteImage(_)));
    }
}
