/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use pngine::zune_core::bit_depth::BitDepth;
use pngine::zune_core::colorspace::ColorSpace;
use pngine::{DecoderState, InterlaceMethod, PngColor, PngDecoder};

mod common;

use common::*;

fn gradient(len: usize) -> Vec<u8> {
    (0..len).map(|x| (x * 7 + x / 3) as u8).collect()
}

fn test_against_ref(width: u32, height: u32, color: png::ColorType, channels: usize) {
    let pixels = gradient(width as usize * height as usize * channels);
    let file = encode_ref(width, height, color, png::BitDepth::Eight, &pixels);

    let image = pngine::decode(&file).unwrap();
    let (_, reference) = decode_ref(&file);

    assert_eq!(image.width(), width);
    assert_eq!(image.height(), height);
    assert_eq!(image.channels(), channels);
    assert_eq!(image.samples(), &widen(&reference)[..]);
    assert_eq!(image.samples(), &widen(&pixels)[..]);
}

#[test]
fn test_8bit_luma() {
    test_against_ref(13, 7, png::ColorType::Grayscale, 1);
}

#[test]
fn test_8bit_luma_alpha() {
    test_against_ref(9, 9, png::ColorType::GrayscaleAlpha, 2);
}

#[test]
fn test_8bit_rgb() {
    test_against_ref(32, 17, png::ColorType::Rgb, 3);
}

#[test]
fn test_8bit_rgba() {
    test_against_ref(5, 40, png::ColorType::Rgba, 4);
}

#[test]
fn test_16bit_rgb() {
    let (width, height) = (11, 6);
    let pixels = gradient(width * height * 3 * 2);
    let file = encode_ref(
        width as u32,
        height as u32,
        png::ColorType::Rgb,
        png::BitDepth::Sixteen,
        &pixels
    );
    let image = pngine::decode(&file).unwrap();

    assert_eq!(image.bit_depth(), 16);
    assert_eq!(image.samples(), &be_samples(&pixels)[..]);
}

#[test]
fn test_16bit_luma_alpha_hand_built() {
    // one pixel, gray 0x1234, alpha 0xABCD
    let file = simple_png(1, 1, 16, 4, None, &[0, 0x12, 0x34, 0xAB, 0xCD]);
    let image = pngine::decode(&file).unwrap();

    assert_eq!(image.samples(), &[0x1234, 0xABCD]);
}

#[test]
fn test_1bit_luma() {
    // 10 pixels wide needs two bytes per row, the last 6 bits are padding
    let scanlines = [0, 0b1010_0000, 0b1100_0000, 0, 0b0000_1111, 0b0100_0000];
    let file = simple_png(10, 2, 1, 0, None, &scanlines);
    let image = pngine::decode(&file).unwrap();

    assert_eq!(image.row(0).unwrap(), &[1, 0, 1, 0, 0, 0, 0, 0, 1, 1]);
    assert_eq!(image.row(1).unwrap(), &[0, 0, 0, 0, 1, 1, 1, 1, 0, 1]);
}

#[test]
fn test_2bit_and_4bit_luma() {
    let file = simple_png(3, 1, 2, 0, None, &[0, 0b1110_0100]);
    assert_eq!(pngine::decode(&file).unwrap().samples(), &[3, 2, 1]);

    let file = simple_png(3, 1, 4, 0, None, &[0, 0xF1, 0x70]);
    assert_eq!(pngine::decode(&file).unwrap().samples(), &[15, 1, 7]);
}

#[test]
fn test_one_by_one() {
    let file = simple_png(1, 1, 8, 0, None, &[0, 0x80]);
    let image = pngine::decode(&file).unwrap();

    assert_eq!(image.samples(), &[0x80]);
    assert_eq!(image.rows().len(), 1);
    assert!(image.warnings().is_empty());
}

#[test]
fn test_headers_before_data() {
    let pixels = gradient(4 * 3 * 4);
    let file = encode_ref(4, 3, png::ColorType::Rgba, png::BitDepth::Eight, &pixels);

    let mut decoder = PngDecoder::new(&file);
    assert_eq!(decoder.state(), DecoderState::Init);
    assert!(decoder.get_info().is_none());

    decoder.decode_headers().unwrap();
    assert_eq!(decoder.state(), DecoderState::Header);
    assert_eq!(decoder.get_dimensions(), Some((4, 3)));
    assert_eq!(decoder.get_depth(), Some(BitDepth::Eight));
    assert_eq!(decoder.get_colorspace(), Some(ColorSpace::RGBA));

    let info = decoder.get_info().unwrap();
    assert_eq!(info.color, PngColor::RGBA);
    assert_eq!(info.interlace, InterlaceMethod::Standard);

    // a second call is a no-op
    decoder.decode_headers().unwrap();
    assert_eq!(decoder.state(), DecoderState::Header);

    let image = decoder.decode().unwrap();
    assert_eq!(decoder.state(), DecoderState::End);
    assert_eq!(image.samples(), &widen(&pixels)[..]);
}

#[test]
fn test_decoder_yields_one_image() {
    let file = simple_png(1, 1, 8, 0, None, &[0, 1]);
    let mut decoder = PngDecoder::new(&file);

    assert!(decoder.decode().is_ok());
    assert!(decoder.decode().is_err());
}

#[test]
fn test_known_ancillary_chunks_pass() {
    let phys = [0, 0, 0x0B, 0x13, 0, 0, 0x0B, 0x13, 1];

    let file = png_file(&[
        ihdr(2, 1, 8, 0, 0),
        chunk(b"bKGD", &[0, 0]),
        chunk(b"pHYs", &phys),
        chunk(b"IDAT", &zlib(&[0, 5, 6])),
        iend()
    ]);
    let image = pngine::decode(&file).unwrap();

    assert_eq!(image.samples(), &[5, 6]);
    assert!(image.warnings().is_empty());
}
