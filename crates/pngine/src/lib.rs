/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A png decoder
//!
//! Decodes an in memory PNG (ISO/IEC 15948:2003) into raw samples.
//!
//! The decoder understands the critical chunks (`IHDR`, `PLTE`, `IDAT`, `IEND`),
//! passes over `bKGD` and `pHYs`, skips unknown ancillary chunks and refuses
//! unknown critical ones. Every chunk has its CRC checked.
//!
//! # Usage
//!
//!```no_run
//! let data = std::fs::read("image.png").unwrap();
//! let image = pngine::decode(&data).unwrap();
//!
//! for row in image.rows() {
//!     // channel interleaved samples, one u16 per sample
//!     let _ = row;
//! }
//!```
//!
//! # Samples
//!
//! Samples are never scaled or converted. A 1 bit grayscale image yields
//! samples of 0 and 1, a 16 bit image yields the full `u16` range, and an
//! indexed image yields palette indices, which can be resolved with
//! [`DecodedImage::to_rgb`].
//!
//! # Limits and strictness
//!
//! Use [`PngDecoder::new_with_options`] with [`PngOptions`] to bound
//! image dimensions and buffer sizes, or to reject irregular chunk
//! layouts that are otherwise tolerated with a [`DecodeWarning`].
//!
//!```no_run
//! use pngine::{PngDecoder, PngOptions};
//!
//! let data = std::fs::read("image.png").unwrap();
//! let options = PngOptions::default()
//!     .set_max_width(4096)
//!     .set_max_height(4096)
//!     .set_strict_mode(true);
//!
//! let mut decoder = PngDecoder::new_with_options(&data, options);
//! decoder.decode_headers().unwrap();
//! println!("{:?}", decoder.get_dimensions());
//!
//! let image = decoder.decode().unwrap();
//! println!("{:?}", image.warnings());
//!```
pub use decoder::{DecoderState, PngDecoder};
pub use enums::{ChunkTag, FilterType, InterlaceMethod, PngColor};
pub use error::{DecodeError, DecodeErrorKind, DecodeWarning, HeaderViolation};
pub use headers::{ImageHeader, PaletteEntry};
pub use image::DecodedImage;
pub use options::PngOptions;
pub use zune_core;

mod constants;
pub mod crc;
mod cursor;
mod decoder;
mod enums;
pub mod error;
mod filters;
mod headers;
mod image;
mod options;
mod payload;
mod reconstruct;

pub use filters::paeth;

/// Decode a png held in memory with default options
pub fn decode(data: &[u8]) -> Result<DecodedImage, DecodeError> {
    PngDecoder::new(data).decode()
}
