/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::enums::{InterlaceMethod, PngColor};
use crate::error::{DecodeErrorKind, DecodeWarning};
use crate::headers::{ImageHeader, PaletteEntry};

/// A fully decoded image.
///
/// Samples are stored row major, channel interleaved, one `u16` per
/// sample regardless of the source bit depth. Values are the raw stored
/// values: a 1 bit image holds 0 and 1, a palette image holds indices.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    header:   ImageHeader,
    samples:  Vec<u16>,
    palette:  Option<Vec<PaletteEntry>>,
    warnings: Vec<DecodeWarning>
}

impl DecodedImage {
    pub(crate) fn new(
        header: ImageHeader, samples: Vec<u16>, palette: Option<Vec<PaletteEntry>>,
        warnings: Vec<DecodeWarning>
    ) -> DecodedImage {
        DecodedImage {
            header,
            samples,
            palette,
            warnings
        }
    }

    pub const fn width(&self) -> u32 {
        self.header.width
    }

    pub const fn height(&self) -> u32 {
        self.header.height
    }

    pub const fn color(&self) -> PngColor {
        self.header.color
    }

    /// Bit depth of the source samples
    pub const fn bit_depth(&self) -> u8 {
        self.header.depth
    }

    pub const fn interlace(&self) -> InterlaceMethod {
        self.header.interlace
    }

    /// Samples per pixel
    pub const fn channels(&self) -> usize {
        self.header.channels()
    }

    pub const fn header(&self) -> &ImageHeader {
        &self.header
    }

    /// All samples of the image
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u16> {
        self.samples
    }

    /// Samples of row `y`, or `None` if `y` is out of bounds
    pub fn row(&self, y: usize) -> Option<&[u16]> {
        let stride = self.row_stride();

        if y >= self.header.height as usize {
            return None;
        }
        self.samples.get(y * stride..(y + 1) * stride)
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u16]> + '_ {
        self.samples.chunks_exact(self.row_stride().max(1))
    }

    /// The palette, if the image had a PLTE chunk.
    ///
    /// Present even for grayscale images where it has no effect.
    pub fn palette(&self) -> Option<&[PaletteEntry]> {
        self.palette.as_deref()
    }

    /// Irregularities found while decoding that did not stop it
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    /// Resolve palette indices into 8 bit RGB triples.
    ///
    /// Only valid for indexed images. An index past the end of the palette is an error.
    pub fn to_rgb(&self) -> Result<Vec<u8>, DecodeErrorKind> {
        if self.header.color != PngColor::Palette {
            return Err(DecodeErrorKind::ProtocolViolation(
                "Image is not palette indexed"
            ));
        }
        let palette = self
            .palette
            .as_deref()
            .ok_or(DecodeErrorKind::ProtocolViolation("Indexed image without palette"))?;

        let mut out = Vec::with_capacity(self.samples.len() * 3);

        for index in &self.samples {
            let entry = palette.get(usize::from(*index)).ok_or(
                DecodeErrorKind::ProtocolViolation("Palette index out of range")
            )?;
            out.extend_from_slice(&[entry.red, entry.green, entry.blue]);
        }
        Ok(out)
    }

    fn row_stride(&self) -> usize {
        self.header.width as usize * self.header.channels()
    }
}
