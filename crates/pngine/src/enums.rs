/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::upper_case_acronyms, non_camel_case_types)]

/// Chunk types the decoder knows about, see
/// https://www.w3.org/TR/2003/REC-PNG-20031110/#5Chunk-layout
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ChunkTag {
    IHDR,
    PLTE,
    IDAT,
    IEND,
    bKGD,
    pHYs,
    /// Anything else, with the tag as it was on the wire
    Unknown([u8; 4])
}

impl ChunkTag {
    /// Map a wire tag to a chunk type.
    ///
    /// Known tags are matched ignoring ASCII case.
    pub fn from_bytes(tag: [u8; 4]) -> ChunkTag {
        let lower = tag.map(|c| c.to_ascii_lowercase());

        match &lower {
            b"ihdr" => Self::IHDR,
            b"plte" => Self::PLTE,
            b"idat" => Self::IDAT,
            b"iend" => Self::IEND,
            b"bkgd" => Self::bKGD,
            b"phys" => Self::pHYs,
            _ => Self::Unknown(tag)
        }
    }

    /// True if the ancillary bit (bit 5 of the first byte) is clear
    pub const fn is_critical(tag: [u8; 4]) -> bool {
        tag[0] & (1 << 5) == 0
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterType {
    None,
    Sub,
    Up,
    Average,
    Paeth
}

impl FilterType {
    pub fn from_int(int: u8) -> Option<FilterType> {
        match int {
            0 => Some(FilterType::None),
            1 => Some(FilterType::Sub),
            2 => Some(FilterType::Up),
            3 => Some(FilterType::Average),
            4 => Some(FilterType::Paeth),
            _ => None
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InterlaceMethod {
    Standard,
    Adam7
}

impl InterlaceMethod {
    pub fn from_int(int: u8) -> Option<InterlaceMethod> {
        match int {
            0 => Some(Self::Standard),
            1 => Some(Self::Adam7),
            _ => None
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngColor {
    Luma,
    RGB,
    Palette,
    LumaA,
    RGBA
}

impl PngColor {
    pub const fn num_components(self) -> u8 {
        match self {
            PngColor::Luma => 1,
            PngColor::Palette => 1,
            PngColor::LumaA => 2,
            PngColor::RGB => 3,
            PngColor::RGBA => 4
        }
    }

    pub fn from_int(int: u8) -> Option<PngColor> {
        match int {
            0 => Some(Self::Luma),
            2 => Some(Self::RGB),
            3 => Some(Self::Palette),
            4 => Some(Self::LumaA),
            6 => Some(Self::RGBA),
            _ => None
        }
    }

    /// The color type number as stored in IHDR
    pub const fn to_int(self) -> u8 {
        match self {
            Self::Luma => 0,
            Self::RGB => 2,
            Self::Palette => 3,
            Self::LumaA => 4,
            Self::RGBA => 6
        }
    }

    /// Bit depths allowed for this color type
    pub const fn allowed_depths(self) -> &'static [u8] {
        match self {
            Self::Luma => &[1, 2, 4, 8, 16],
            Self::Palette => &[1, 2, 4, 8],
            Self::RGB | Self::LumaA | Self::RGBA => &[8, 16]
        }
    }
}
