// ABOUTME: Raster materializer — turns an assembled image's frames into a uniform
// ABOUTME: output-buffer description (samples, stride, color model).

use crate::error::{SaneError, SaneResult};
use crate::image::AssembledImage;
use crate::rpc::FrameType;

/// The color interpretation of a materialized raster's samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorModel {
    /// One sample per pixel, 8 or 16 bits deep.
    Gray,
    /// Three samples per pixel (or three equal-sized bands), 8 or 16 bits deep.
    LinearRgb,
    /// One bit per pixel, MSB-first within each byte.
    Binary,
}

/// How samples are arranged in [`Raster::data`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RasterLayout {
    /// One contiguous plane per band, each `stride * height` bytes, in band
    /// order. Used for the RGB-trio case.
    Banded { bands: usize, stride: usize },
    /// Samples for every band of a pixel are adjacent, one row after
    /// another. Used for single GRAY/RGB frames.
    Interleaved { samples_per_pixel: usize, bytes_per_sample: usize, stride: usize },
    /// One bit per pixel, MSB-first within each byte.
    PackedBits { stride: usize },
}

/// A materialized raster: the output buffer(s) plus everything a host image
/// consumer needs to interpret them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub color_model: ColorModel,
    pub layout: RasterLayout,
    /// The raw sample bytes. For [`RasterLayout::Banded`], this is the
    /// concatenation of each band's plane in band order (R, G, B).
    pub data: Vec<u8>,
}

impl Raster {
    /// Returns the byte offset of sample `channel` of pixel `(x, y)`.
    ///
    /// `channel` is ignored for [`RasterLayout::PackedBits`]; callers should
    /// use [`Raster::bit`] instead for that layout.
    pub fn offset(&self, x: usize, y: usize, channel: usize) -> usize {
        match self.layout {
            RasterLayout::Banded { stride, .. } => {
                let band_size = stride * self.height as usize;
                channel * band_size + y * stride + x
            }
            RasterLayout::Interleaved {
                samples_per_pixel,
                bytes_per_sample,
                stride,
            } => y * stride + x * samples_per_pixel * bytes_per_sample + channel * bytes_per_sample,
            RasterLayout::PackedBits { stride } => y * stride + x / 8,
        }
    }

    /// Reads the single bit for pixel `(x, y)` of a [`RasterLayout::PackedBits`]
    /// raster (MSB-first within each byte).
    pub fn bit(&self, x: usize, y: usize) -> bool {
        let byte = self.data[self.offset(x, y, 0)];
        let shift = 7 - (x % 8);
        (byte >> shift) & 1 != 0
    }
}

/// Translates an assembled image's frames into a [`Raster`]. Any frame
/// combination with no materializable layout is
/// [`SaneError::UnsupportedImageLayout`].
pub fn materialize(image: AssembledImage) -> SaneResult<Raster> {
    let width = image.width as usize;
    let height = image.height as usize;
    let stride = image.bytes_per_line as usize;
    let depth = image.depth;

    match image.frames.len() {
        3 => materialize_rgb_trio(image, stride, depth),
        1 => materialize_single(image, width, height, stride, depth),
        n => Err(SaneError::UnsupportedImageLayout(format!(
            "image has {n} frames; only 1 (GRAY/RGB) or 3 (RED/GREEN/BLUE) are supported"
        ))),
    }
}

fn materialize_rgb_trio(image: AssembledImage, stride: usize, depth: i32) -> SaneResult<Raster> {
    if depth != 8 && depth != 16 {
        return Err(SaneError::UnsupportedImageLayout(format!(
            "RGB planar triplet requires depth 8 or 16, got {depth}"
        )));
    }

    let mut data = Vec::with_capacity(image.frames.iter().map(|f| f.data.len()).sum());
    for frame in &image.frames {
        let bytes = maybe_swap_16(&frame.data, depth, image.byte_order);
        data.extend_from_slice(&bytes);
    }

    Ok(Raster {
        width: image.width,
        height: image.height,
        depth,
        color_model: ColorModel::LinearRgb,
        layout: RasterLayout::Banded { bands: 3, stride },
        data,
    })
}

fn materialize_single(
    image: AssembledImage,
    width: usize,
    height: usize,
    stride: usize,
    depth: i32,
) -> SaneResult<Raster> {
    let frame_type = image.frames[0].parameters.frame_type;
    let data = image.frames[0].data.clone();

    match (frame_type, depth) {
        (FrameType::Gray, 1) => Ok(Raster {
            width: width as i32,
            height: height as i32,
            depth,
            color_model: ColorModel::Binary,
            layout: RasterLayout::PackedBits { stride },
            data,
        }),
        (FrameType::Gray, 8) | (FrameType::Gray, 16) => Ok(Raster {
            width: width as i32,
            height: height as i32,
            depth,
            color_model: ColorModel::Gray,
            layout: RasterLayout::Interleaved {
                samples_per_pixel: 1,
                bytes_per_sample: (depth / 8) as usize,
                stride,
            },
            data: maybe_swap_16(&data, depth, image.byte_order),
        }),
        (FrameType::Rgb, 8) | (FrameType::Rgb, 16) => Ok(Raster {
            width: width as i32,
            height: height as i32,
            depth,
            color_model: ColorModel::LinearRgb,
            layout: RasterLayout::Interleaved {
                samples_per_pixel: 3,
                bytes_per_sample: (depth / 8) as usize,
                stride,
            },
            data: maybe_swap_16(&data, depth, image.byte_order),
        }),
        (other, d) => Err(SaneError::UnsupportedImageLayout(format!(
            "frame type {other:?} at depth {d} has no materializable raster layout"
        ))),
    }
}

/// Native byte order is little-endian on every platform this crate targets.
/// `byte_order == 0` denotes little-endian on the wire (see
/// [`crate::rpc::StartResponse::is_little_endian`]); anything else means the
/// server's 16-bit samples are big-endian and must be swapped to match host
/// order.
fn maybe_swap_16(data: &[u8], depth: i32, byte_order: i32) -> Vec<u8> {
    if depth != 16 || byte_order == 0 {
        return data.to_vec();
    }

    let mut swapped = data.to_vec();
    for pair in swapped.chunks_mut(2) {
        if pair.len() == 2 {
            pair.swap(0, 1);
        }
    }
    swapped
}
