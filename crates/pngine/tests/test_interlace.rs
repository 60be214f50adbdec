/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use pngine::{DecodeErrorKind, InterlaceMethod};

mod common;

use common::*;

const X_ORIGIN: [usize; 7] = [0, 4, 0, 2, 0, 1, 0];
const Y_ORIGIN: [usize; 7] = [0, 0, 4, 0, 2, 0, 1];
const X_SPACING: [usize; 7] = [8, 8, 4, 4, 2, 2, 1];
const Y_SPACING: [usize; 7] = [8, 8, 8, 4, 4, 2, 2];

/// Pixel values of each reduced image, as rows of samples
fn passes(samples: &[u8], width: usize, height: usize, channels: usize) -> Vec<Vec<Vec<u8>>> {
    (0..7)
        .map(|pass| {
            let xs: Vec<usize> = (X_ORIGIN[pass]..width).step_by(X_SPACING[pass]).collect();
            if xs.is_empty() {
                return vec![];
            }
            (Y_ORIGIN[pass]..height)
                .step_by(Y_SPACING[pass])
                .map(|y| {
                    xs.iter()
                        .flat_map(|x| {
                            let start = (y * width + x) * channels;
                            samples[start..start + channels].to_vec()
                        })
                        .collect()
                })
                .collect()
        })
        .collect()
}

/// Pack sub byte samples, most significant bits first
fn pack(row: &[u8], depth: usize) -> Vec<u8> {
    if depth == 8 {
        return row.to_vec();
    }
    let per_byte = 8 / depth;

    row.chunks(per_byte)
        .map(|group| {
            group.iter().enumerate().fold(0_u8, |acc, (i, v)| {
                acc | (v << (8 - depth * (i + 1)))
            })
        })
        .collect()
}

/// Serialize the passes, every row with filter None, or Up when `up` is set.
fn scanlines(passes: &[Vec<Vec<u8>>], depth: usize, up: bool) -> Vec<u8> {
    let mut out = Vec::new();

    for pass in passes {
        // each pass starts against a zeroed previous row
        let mut prev: Vec<u8> = Vec::new();

        for row in pass {
            let packed = pack(row, depth);

            if up {
                out.push(2);
                for (i, byte) in packed.iter().enumerate() {
                    out.push(byte.wrapping_sub(prev.get(i).copied().unwrap_or(0)));
                }
            } else {
                out.push(0);
                out.extend_from_slice(&packed);
            }
            prev = packed;
        }
    }
    out
}

fn interlaced_png(
    samples: &[u8], width: usize, height: usize, depth: u8, color: u8, channels: usize, up: bool
) -> Vec<u8> {
    let data = scanlines(
        &passes(samples, width, height, channels),
        usize::from(depth),
        up
    );
    png_file(&[
        ihdr(width as u32, height as u32, depth, color, 1),
        chunk(b"IDAT", &zlib(&data)),
        iend()
    ])
}

fn test_size(width: usize, height: usize, channels: usize, color: u8) {
    let samples: Vec<u8> = (0..width * height * channels)
        .map(|x| (x * 13 + 7) as u8)
        .collect();

    for up in [false, true] {
        let file = interlaced_png(&samples, width, height, 8, color, channels, up);
        let image = pngine::decode(&file).unwrap();

        assert_eq!(image.interlace(), InterlaceMethod::Adam7);
        assert_eq!(
            image.samples(),
            &widen(&samples)[..],
            "{width}x{height} up={up}"
        );

        let (_, reference) = decode_ref(&file);
        assert_eq!(reference, samples, "{width}x{height} up={up}");
    }
}

#[test]
fn test_one_pixel() {
    // only the first pass has data
    test_size(1, 1, 1, 0);
}

#[test]
fn test_small_sizes_with_empty_passes() {
    for (width, height) in [(2, 1), (1, 2), (3, 3), (4, 5), (5, 4), (7, 1)] {
        test_size(width, height, 1, 0);
    }
}

#[test]
fn test_full_blocks_rgb() {
    test_size(8, 8, 3, 2);
    test_size(16, 8, 3, 2);
}

#[test]
fn test_odd_sizes_rgba() {
    test_size(13, 11, 4, 6);
    test_size(33, 9, 4, 6);
}

#[test]
fn test_matches_non_interlaced() {
    let (width, height) = (21, 14);
    let samples: Vec<u8> = (0..width * height * 2).map(|x| (x % 241) as u8).collect();

    let interlaced = interlaced_png(&samples, width, height, 8, 4, 2, true);
    let standard = simple_png(
        width as u32,
        height as u32,
        8,
        4,
        None,
        &unfiltered(&samples, width * 2)
    );

    let a = pngine::decode(&interlaced).unwrap();
    let b = pngine::decode(&standard).unwrap();

    assert_eq!(a.samples(), b.samples());
    assert_eq!(a.width(), b.width());
    assert_eq!(a.height(), b.height());
}

#[test]
fn test_sub_byte_interlaced() {
    for depth in [1_u8, 2, 4] {
        let (width, height) = (11, 10);
        let max = (1_usize << depth) - 1;
        let samples: Vec<u8> = (0..width * height)
            .map(|x| ((x * 5 + x / 7) % (max + 1)) as u8)
            .collect();

        let file = interlaced_png(&samples, width, height, depth, 0, 1, true);
        let image = pngine::decode(&file).unwrap();

        assert_eq!(image.samples(), &widen(&samples)[..], "depth {depth}");
    }
}

#[test]
fn test_sixteen_bit_interlaced() {
    let (width, height) = (6, 6);
    let values: Vec<u16> = (0..width * height).map(|x| (x as u16) * 1009).collect();
    // treat each 16 bit gray pixel as two 8 bit channels when laying out passes
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();

    let data = scanlines(&passes(&bytes, width, height, 2), 8, false);
    let file = png_file(&[
        ihdr(width as u32, height as u32, 16, 0, 1),
        chunk(b"IDAT", &zlib(&data)),
        iend()
    ]);
    let image = pngine::decode(&file).unwrap();

    assert_eq!(image.samples(), &values[..]);
}

#[test]
fn test_bad_filter_in_later_pass() {
    // 2x2 gray: passes 1, 6 and 7 carry data, one scanline each
    let data = [0, 10, 0, 11, 9, 12, 13];
    let file = png_file(&[
        ihdr(2, 2, 8, 0, 1),
        chunk(b"IDAT", &zlib(&data)),
        iend()
    ]);
    let err = pngine::decode(&file).unwrap_err();

    assert_eq!(err.kind, DecodeErrorKind::InvalidFilterType { filter: 9, row: 2 });
}

#[test]
fn test_interlaced_stream_length_is_checked() {
    // a non interlaced 2x2 stream is longer than the interlaced one expects
    let data = [0, 1, 2, 0, 3, 4];
    let file = png_file(&[
        ihdr(2, 2, 8, 0, 1),
        chunk(b"IDAT", &zlib(&data)),
        iend()
    ]);

    assert!(matches!(
        pngine::decode(&file).unwrap_err().kind,
        DecodeErrorKind::DecompressionFailed(_)
    ));
}
