/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors and warnings produced while decoding
use core::fmt::{Debug, Display, Formatter};

use crate::cursor::CursorError;

/// A single broken rule found while validating an `IHDR` chunk.
///
/// Header validation does not stop at the first problem, every
/// violated rule is collected and reported together.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HeaderViolation {
    /// The chunk payload was not 13 bytes long
    Length(usize),
    ZeroWidth,
    ZeroHeight,
    /// Bit depth not one of 1, 2, 4, 8 or 16
    BitDepth(u8),
    /// Color type not one of 0, 2, 3, 4 or 6
    ColorType(u8),
    CompressionMethod(u8),
    FilterMethod(u8),
    InterlaceMethod(u8),
    /// Both values are individually valid but the pair is not allowed
    DepthForColorType { depth: u8, color_type: u8 }
}

impl Display for HeaderViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Length(len) => write!(f, "IHDR length is {len}, expected 13"),
            Self::ZeroWidth => write!(f, "width cannot be zero"),
            Self::ZeroHeight => write!(f, "height cannot be zero"),
            Self::BitDepth(depth) => write!(f, "unknown bit depth {depth}"),
            Self::ColorType(color) => write!(f, "unknown color type {color}"),
            Self::CompressionMethod(method) => write!(f, "unknown compression method {method}"),
            Self::FilterMethod(method) => write!(f, "unknown filter method {method}"),
            Self::InterlaceMethod(method) => write!(f, "unknown interlace method {method}"),
            Self::DepthForColorType { depth, color_type } => write!(
                f,
                "bit depth {depth} is not allowed for color type {color_type}"
            )
        }
    }
}

/// The reason a decode failed
#[derive(Clone, Eq, PartialEq)]
pub enum DecodeErrorKind {
    /// The first eight bytes are not the PNG signature
    NotAPng,
    /// The input ended before a complete item could be read
    TruncatedInput { requested: usize, remaining: usize },
    /// Stored and computed CRC of a chunk differ
    CorruptChunk {
        tag:      [u8; 4],
        expected: u32,
        found:    u32
    },
    /// A chunk appeared where the format does not allow it
    ProtocolViolation(&'static str),
    /// An unknown chunk with the critical bit set
    UnsupportedCriticalChunk([u8; 4]),
    InvalidHeaderConfiguration(Vec<HeaderViolation>),
    /// Palette length (in bytes) not divisible by three
    InvalidPaletteLength(usize),
    /// Palette entry count outside 1..=256
    PaletteSizeOutOfRange(usize),
    /// Filter byte above 4, `row` is the scanline index in the inflated stream
    InvalidFilterType { filter: u8, row: usize },
    DecompressionFailed(String),
    ResourceLimitExceeded {
        what:  &'static str,
        limit: usize,
        found: usize
    }
}

impl DecodeErrorKind {
    /// A short, stable name for this kind of error
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NotAPng => "NotAPng",
            Self::TruncatedInput { .. } => "TruncatedInput",
            Self::CorruptChunk { .. } => "CorruptChunk",
            Self::ProtocolViolation(_) => "ProtocolViolation",
            Self::UnsupportedCriticalChunk(_) => "UnsupportedCriticalChunk",
            Self::InvalidHeaderConfiguration(_) => "InvalidHeaderConfiguration",
            Self::InvalidPaletteLength(_) => "InvalidPaletteLength",
            Self::PaletteSizeOutOfRange(_) => "PaletteSizeOutOfRange",
            Self::InvalidFilterType { .. } => "InvalidFilterType",
            Self::DecompressionFailed(_) => "DecompressionFailed",
            Self::ResourceLimitExceeded { .. } => "ResourceLimitExceeded"
        }
    }
}

impl Debug for DecodeErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotAPng => write!(f, "Bad PNG signature, not a png"),
            Self::TruncatedInput {
                requested,
                remaining
            } => write!(
                f,
                "Truncated input, requested {requested} bytes but only {remaining} remain"
            ),
            Self::CorruptChunk {
                tag,
                expected,
                found
            } => write!(
                f,
                "CRC of chunk {} does not match, expected {expected:#010x} but found {found:#010x}",
                tag_name(tag)
            ),
            Self::ProtocolViolation(reason) => write!(f, "Protocol violation: {reason}"),
            Self::UnsupportedCriticalChunk(tag) => write!(
                f,
                "Chunk {} unknown but marked critical",
                tag_name(tag)
            ),
            Self::InvalidHeaderConfiguration(violations) => {
                write!(f, "Invalid IHDR chunk: ")?;
                for (pos, violation) in violations.iter().enumerate() {
                    if pos != 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{violation}")?;
                }
                Ok(())
            }
            Self::InvalidPaletteLength(len) => {
                write!(f, "PLTE length {len} is not divisible by 3")
            }
            Self::PaletteSizeOutOfRange(entries) => {
                write!(f, "PLTE has {entries} entries, allowed range is 1..=256")
            }
            Self::InvalidFilterType { filter, row } => {
                write!(f, "Unknown filter type {filter} on scanline {row}")
            }
            Self::DecompressionFailed(reason) => {
                write!(f, "Error decoding idat chunks: {reason}")
            }
            Self::ResourceLimitExceeded { what, limit, found } => write!(
                f,
                "{what} of {found} exceeds configured limit of {limit}, aborting"
            )
        }
    }
}

impl Display for DecodeErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl From<CursorError> for DecodeErrorKind {
    fn from(value: CursorError) -> Self {
        match value {
            CursorError::OutOfRange {
                requested,
                remaining
            } => DecodeErrorKind::TruncatedInput {
                requested,
                remaining
            }
        }
    }
}

/// Error returned when decoding fails.
///
/// Carries the kind of error and where in the input it happened.
pub struct DecodeError {
    /// Why decoding failed
    pub kind:        DecodeErrorKind,
    /// Byte offset into the input of the item being processed
    pub position:    usize,
    /// Zero based index of the chunk being processed, `None` for the signature
    pub chunk_index: Option<usize>
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, position: usize, chunk_index: Option<usize>) -> DecodeError {
        DecodeError {
            kind,
            position,
            chunk_index
        }
    }
}

impl Debug for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?} (at byte {}", self.kind, self.position)?;
        if let Some(index) = self.chunk_index {
            write!(f, ", chunk {index}")?;
        }
        write!(f, ")")
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl std::error::Error for DecodeError {}

/// Non fatal irregularities retained while decoding
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecodeWarning {
    /// A PLTE chunk for a grayscale image, stored but unused
    InertPalette,
    /// An unknown ancillary chunk was skipped
    SkippedAncillaryChunk([u8; 4]),
    /// IDAT chunks were separated by another chunk
    SplitImageData,
    /// A second bKGD or pHYs chunk
    DuplicateAncillaryChunk([u8; 4]),
    /// A bKGD or pHYs chunk after image data started
    LateAncillaryChunk([u8; 4])
}

impl Display for DecodeWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InertPalette => write!(f, "PLTE chunk present for a grayscale image"),
            Self::SkippedAncillaryChunk(tag) => {
                write!(f, "Skipped unknown ancillary chunk {}", tag_name(tag))
            }
            Self::SplitImageData => write!(f, "IDAT chunks are not consecutive"),
            Self::DuplicateAncillaryChunk(tag) => {
                write!(f, "Duplicate {} chunk", tag_name(tag))
            }
            Self::LateAncillaryChunk(tag) => write!(f, "{} chunk after IDAT", tag_name(tag))
        }
    }
}

pub(crate) fn tag_name(tag: &[u8; 4]) -> &str {
    core::str::from_utf8(tag).unwrap_or("XXXX")
}
