/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Builders for hand made png streams
#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};

pub const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Frame a chunk: length, tag, payload, crc
pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut crc = Crc::new();
    crc.update(tag);
    crc.update(payload);

    let mut out = Vec::with_capacity(payload.len() + 12);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    out
}

pub fn ihdr_payload(width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(13);
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&[depth, color, 0, 0, interlace]);
    out
}

pub fn ihdr(width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> Vec<u8> {
    chunk(b"IHDR", &ihdr_payload(width, height, depth, color, interlace))
}

pub fn iend() -> Vec<u8> {
    chunk(b"IEND", &[])
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Signature followed by the given chunks
pub fn png_file(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = SIGNATURE.to_vec();

    for c in chunks {
        out.extend_from_slice(c);
    }
    out
}

/// A complete file: IHDR, optional PLTE, one IDAT holding `scanlines`, IEND
pub fn simple_png(
    width: u32, height: u32, depth: u8, color: u8, palette: Option<&[u8]>, scanlines: &[u8]
) -> Vec<u8> {
    let mut chunks = vec![ihdr(width, height, depth, color, 0)];

    if let Some(p) = palette {
        chunks.push(chunk(b"PLTE", p));
    }
    chunks.push(chunk(b"IDAT", &zlib(scanlines)));
    chunks.push(iend());

    png_file(&chunks)
}

/// Prefix every row of `pixels` with filter type 0
pub fn unfiltered(pixels: &[u8], row_bytes: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() + pixels.len() / row_bytes.max(1));

    for row in pixels.chunks_exact(row_bytes) {
        out.push(0);
        out.extend_from_slice(row);
    }
    out
}

/// Decode with the `png` crate, leaving samples untouched
pub fn decode_ref(data: &[u8]) -> (png::OutputInfo, Vec<u8>) {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::IDENTITY);

    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());

    (info, buf)
}

/// Encode an image with the `png` crate
pub fn encode_ref(
    width: u32, height: u32, color: png::ColorType, depth: png::BitDepth, data: &[u8]
) -> Vec<u8> {
    encode_ref_filtered(width, height, color, depth, png::FilterType::Sub, data)
}

/// Encode an image with the `png` crate using one filter for every row
pub fn encode_ref_filtered(
    width: u32, height: u32, color: png::ColorType, depth: png::BitDepth,
    filter: png::FilterType, data: &[u8]
) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        encoder.set_filter(filter);
        encoder.set_adaptive_filter(png::AdaptiveFilterType::NonAdaptive);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }
    out
}

/// Big endian byte pairs to samples
pub fn be_samples(data: &[u8]) -> Vec<u16> {
    data.chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect()
}

pub fn widen(data: &[u8]) -> Vec<u16> {
    data.iter().map(|x| u16::from(*x)).collect()
}
