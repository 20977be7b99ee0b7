// ABOUTME: Benchmark suite for the SANE wire codec's hot paths: word encode/decode,
// ABOUTME: string encode/decode, and per-frame image-builder validation cost.

use bytes::BytesMut;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sane_client::image::{Frame, ImageBuilder};
use sane_client::rpc::{FrameParameters, FrameType};
use sane_client::wire::{decode_word, encode_int, encode_string, encode_version};
use std::time::Duration;

fn bench_word_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_codec");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("encode_int", |b| b.iter(|| encode_int(black_box(-12345))));

    let encoded = encode_int(-12345);
    group.bench_function("decode_word", |b| b.iter(|| decode_word(black_box(&encoded))));

    group.bench_function("encode_version", |b| {
        b.iter(|| encode_version(black_box(1), black_box(0), black_box(3)))
    });

    group.finish();
}

fn bench_string_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_codec");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("encode_short", |b| {
        b.iter(|| {
            let mut buf = BytesMut::new();
            encode_string(&mut buf, black_box("dev0")).unwrap();
            buf
        })
    });

    let long_name = "A".repeat(256);
    group.bench_function("encode_long", |b| {
        b.iter(|| {
            let mut buf = BytesMut::new();
            encode_string(&mut buf, black_box(long_name.as_str())).unwrap();
            buf
        })
    });

    group.finish();
}

fn sample_plane_frame(frame_type: FrameType, bpl: i32, lines: i32) -> Frame {
    Frame {
        parameters: FrameParameters {
            frame_type,
            is_last: frame_type == FrameType::Blue,
            bytes_per_line: bpl,
            pixels_per_line: bpl,
            line_count: lines,
            depth_per_pixel: 8,
        },
        data: vec![0u8; (bpl * lines) as usize],
    }
}

fn bench_image_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_builder");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("add_single_gray_frame", |b| {
        b.iter(|| {
            let mut builder = ImageBuilder::new();
            builder
                .add_frame(black_box(sample_plane_frame(FrameType::Gray, 640, 480)))
                .unwrap();
            builder.build().unwrap()
        })
    });

    group.bench_function("add_rgb_trio_and_build", |b| {
        b.iter(|| {
            let mut builder = ImageBuilder::new();
            for frame_type in [FrameType::Red, FrameType::Green, FrameType::Blue] {
                builder
                    .add_frame(black_box(sample_plane_frame(frame_type, 640, 480)))
                    .unwrap();
            }
            builder.build().unwrap()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_word_codec,
    bench_string_codec,
    bench_image_builder
);
criterion_main!(benches);
