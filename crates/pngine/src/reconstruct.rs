/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Turn an inflated stream of filtered scanlines into samples.
//!
//! The stream length is validated by the caller, so every pass here
//! is guaranteed to find all of its scanlines.
use log::{debug, trace};

use crate::constants::{ADAM7_X_ORIGIN, ADAM7_X_SPACING, ADAM7_Y_ORIGIN, ADAM7_Y_SPACING};
use crate::enums::{FilterType, InterlaceMethod};
use crate::error::DecodeErrorKind;
use crate::filters::defilter_row;
use crate::headers::{adam7_pass_size, ImageHeader};

/// Reconstruct all samples of an image, row major, one `u16` per channel per pixel
pub(crate) fn reconstruct(header: &ImageHeader, stream: &[u8]) -> Result<Vec<u16>, DecodeErrorKind> {
    let width = header.width as usize;
    let height = header.height as usize;
    let channels = header.channels();
    let out_stride = width * channels;

    let mut out = vec![0_u16; out_stride * height];

    match header.interlace {
        InterlaceMethod::Standard => {
            defilter_pass(header, stream, width, height, 0, |y, row| {
                let out_row = &mut out[y * out_stride..(y + 1) * out_stride];
                unpack_samples(row, header.depth, out_row);
            })?;
        }
        InterlaceMethod::Adam7 => {
            let mut offset = 0;
            let mut scanline = 0;
            let mut pass_samples = Vec::new();

            for pass in 0..7 {
                let (pass_width, pass_height) = adam7_pass_size(width, height, pass);

                if pass_width == 0 || pass_height == 0 {
                    trace!("Adam7 pass {pass} is empty");
                    continue;
                }
                let stride = scanline_bytes(header, pass_width);
                let pass_len = (stride + 1) * pass_height;
                let pass_stream = &stream[offset..offset + pass_len];

                debug!("Adam7 pass {pass}: {pass_width}x{pass_height}, {pass_len} bytes");

                pass_samples.resize(pass_width * channels, 0);

                let x_start = ADAM7_X_ORIGIN[pass];
                let y_start = ADAM7_Y_ORIGIN[pass];
                let x_step = ADAM7_X_SPACING[pass];
                let y_step = ADAM7_Y_SPACING[pass];

                defilter_pass(
                    header,
                    pass_stream,
                    pass_width,
                    pass_height,
                    scanline,
                    |j, row| {
                        unpack_samples(row, header.depth, &mut pass_samples);

                        let out_y = j * y_step + y_start;

                        for (i, pixel) in pass_samples.chunks_exact(channels).enumerate() {
                            let out_x = i * x_step + x_start;
                            let start = (out_y * width + out_x) * channels;

                            out[start..start + channels].copy_from_slice(pixel);
                        }
                    }
                )?;
                offset += pass_len;
                scanline += pass_height;
            }
        }
    }
    Ok(out)
}

fn scanline_bytes(header: &ImageHeader, width: usize) -> usize {
    (width * header.channels() * usize::from(header.depth) + 7) / 8
}

/// Undo filtering for `height` scanlines of `width` pixels.
///
/// `sink` receives each reconstructed row (still packed) with its index.
/// `first_scanline` is only used to report the position of a bad filter byte.
fn defilter_pass<F>(
    header: &ImageHeader, stream: &[u8], width: usize, height: usize, first_scanline: usize,
    mut sink: F
) -> Result<(), DecodeErrorKind>
where
    F: FnMut(usize, &[u8])
{
    let stride = scanline_bytes(header, width);
    let components = header.bytes_per_pixel();

    // previous row starts zeroed, that's what the first row filters against
    let mut prev_row = vec![0_u8; stride];
    let mut current = vec![0_u8; stride];

    for (y, in_stride) in stream.chunks_exact(stride + 1).take(height).enumerate() {
        let filter_byte = in_stride[0];
        let raw = &in_stride[1..];

        let filter =
            FilterType::from_int(filter_byte).ok_or(DecodeErrorKind::InvalidFilterType {
                filter: filter_byte,
                row:    first_scanline + y
            })?;

        defilter_row(filter, &prev_row, raw, &mut current, components);
        sink(y, &current);

        core::mem::swap(&mut prev_row, &mut current);
    }
    Ok(())
}

/// Split a packed row into samples.
///
/// Sub byte samples are read most significant bits first, 16 bit samples
/// are big endian. Values are kept as stored, nothing is scaled.
pub(crate) fn unpack_samples(row: &[u8], depth: u8, out: &mut [u16]) {
    match depth {
        16 => {
            for (sample, bytes) in out.iter_mut().zip(row.chunks_exact(2)) {
                *sample = u16::from_be_bytes([bytes[0], bytes[1]]);
            }
        }
        8 => {
            for (sample, byte) in out.iter_mut().zip(row) {
                *sample = u16::from(*byte);
            }
        }
        1 | 2 | 4 => {
            let depth = usize::from(depth);
            let per_byte = 8 / depth;
            let mask = (1_u8 << depth) - 1;

            for (i, sample) in out.iter_mut().enumerate() {
                let byte = row[i / per_byte];
                let shift = 8 - depth * (i % per_byte + 1);

                *sample = u16::from((byte >> shift) & mask);
            }
        }
        _ => unreachable!("bit depth validated by the header")
    }
}
