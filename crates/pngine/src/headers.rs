/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! IHDR and PLTE parsing
use log::{error, info, trace};

use crate::constants::{ADAM7_X_ORIGIN, ADAM7_X_SPACING, ADAM7_Y_ORIGIN, ADAM7_Y_SPACING};
use crate::cursor::ByteCursor;
use crate::enums::{InterlaceMethod, PngColor};
use crate::error::{DecodeErrorKind, HeaderViolation};

pub(crate) const IHDR_LENGTH: usize = 13;

/// The validated contents of an IHDR chunk
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ImageHeader {
    pub width:     u32,
    pub height:    u32,
    pub depth:     u8,
    pub color:     PngColor,
    pub interlace: InterlaceMethod
}

impl ImageHeader {
    pub const fn channels(&self) -> usize {
        self.color.num_components() as usize
    }

    /// Filter lookback distance in bytes, never less than one
    pub const fn bytes_per_pixel(&self) -> usize {
        let bits = self.depth as usize * self.channels();
        let bytes = (bits + 7) / 8;

        if bytes == 0 {
            1
        } else {
            bytes
        }
    }

    /// Bytes of packed samples in a row `width` pixels wide, filter byte excluded
    pub fn scanline_bytes(&self, width: usize) -> Option<usize> {
        let bits = width
            .checked_mul(self.channels())?
            .checked_mul(usize::from(self.depth))?;

        Some(bits / 8 + usize::from(bits % 8 != 0))
    }

    /// Size of one stream of filtered scanlines for a `width` x `height` (sub)image
    fn filtered_len(&self, width: usize, height: usize) -> Option<usize> {
        if width == 0 || height == 0 {
            return Some(0);
        }
        self.scanline_bytes(width)?
            .checked_add(1)?
            .checked_mul(height)
    }

    /// Exact length the inflated IDAT stream must have, `None` on overflow
    pub fn inflated_len(&self) -> Option<usize> {
        let width = self.width as usize;
        let height = self.height as usize;

        match self.interlace {
            InterlaceMethod::Standard => self.filtered_len(width, height),
            InterlaceMethod::Adam7 => {
                let mut total = 0_usize;

                for pass in 0..7 {
                    let (pass_width, pass_height) = adam7_pass_size(width, height, pass);
                    total = total.checked_add(self.filtered_len(pass_width, pass_height)?)?;
                }
                Some(total)
            }
        }
    }

    /// Number of samples in the decoded image, `None` on overflow
    pub fn num_samples(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.channels())
    }
}

/// Width and height of an Adam7 pass, either may be zero
pub(crate) const fn adam7_pass_size(width: usize, height: usize, pass: usize) -> (usize, usize) {
    const fn axis(len: usize, origin: usize, spacing: usize) -> usize {
        if len <= origin {
            0
        } else {
            (len - origin + spacing - 1) / spacing
        }
    }
    (
        axis(width, ADAM7_X_ORIGIN[pass], ADAM7_X_SPACING[pass]),
        axis(height, ADAM7_Y_ORIGIN[pass], ADAM7_Y_SPACING[pass])
    )
}

/// Parse and validate an IHDR chunk payload.
///
/// All rules are checked, and every broken one ends up in the returned error.
pub(crate) fn parse_ihdr(stream: &mut ByteCursor) -> Result<ImageHeader, DecodeErrorKind> {
    let length = stream.remaining();

    if length != IHDR_LENGTH {
        return Err(DecodeErrorKind::InvalidHeaderConfiguration(vec![
            HeaderViolation::Length(length),
        ]));
    }

    let width = stream.get_u32_be_err()?;
    let height = stream.get_u32_be_err()?;
    let depth = stream.get_u8_err()?;
    let color_type = stream.get_u8_err()?;
    let compression_method = stream.get_u8_err()?;
    let filter_method = stream.get_u8_err()?;
    let interlace_method = stream.get_u8_err()?;

    let mut violations = Vec::new();

    if width == 0 {
        violations.push(HeaderViolation::ZeroWidth);
    }
    if height == 0 {
        violations.push(HeaderViolation::ZeroHeight);
    }
    let depth_known = matches!(depth, 1 | 2 | 4 | 8 | 16);

    if !depth_known {
        violations.push(HeaderViolation::BitDepth(depth));
    }
    let color = PngColor::from_int(color_type);

    if color.is_none() {
        violations.push(HeaderViolation::ColorType(color_type));
    }
    if compression_method != 0 {
        violations.push(HeaderViolation::CompressionMethod(compression_method));
    }
    if filter_method != 0 {
        violations.push(HeaderViolation::FilterMethod(filter_method));
    }
    let interlace = InterlaceMethod::from_int(interlace_method);

    if interlace.is_none() {
        violations.push(HeaderViolation::InterlaceMethod(interlace_method));
    }
    if let Some(color) = color {
        if depth_known && !color.allowed_depths().contains(&depth) {
            violations.push(HeaderViolation::DepthForColorType { depth, color_type });
        }
    }

    match (color, interlace) {
        (Some(color), Some(interlace)) if violations.is_empty() => {
            let header = ImageHeader {
                width,
                height,
                depth,
                color,
                interlace
            };
            info!("Width: {}", header.width);
            info!("Height: {}", header.height);
            info!("Color type: {:?}", header.color);
            info!("Depth: {}", header.depth);
            info!("Interlace: {:?}", header.interlace);

            Ok(header)
        }
        _ => {
            for violation in &violations {
                error!("IHDR: {violation}");
            }
            Err(DecodeErrorKind::InvalidHeaderConfiguration(violations))
        }
    }
}

/// A single palette entry
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct PaletteEntry {
    pub red:   u8,
    pub green: u8,
    pub blue:  u8
}

/// Parse a PLTE chunk payload, keeping entry order
pub(crate) fn parse_plte(stream: &mut ByteCursor) -> Result<Vec<PaletteEntry>, DecodeErrorKind> {
    let length = stream.remaining();

    if length % 3 != 0 {
        return Err(DecodeErrorKind::InvalidPaletteLength(length));
    }
    let entries = length / 3;

    if !(1..=256).contains(&entries) {
        return Err(DecodeErrorKind::PaletteSizeOutOfRange(entries));
    }
    trace!("Palette entries: {entries}");

    let mut palette = Vec::with_capacity(entries);

    for _ in 0..entries {
        let [red, green, blue] = stream.read_fixed::<3>()?;
        palette.push(PaletteEntry { red, green, blue });
    }
    Ok(palette)
}
