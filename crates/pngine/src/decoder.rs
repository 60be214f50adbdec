/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The chunk dispatcher.
//!
//! Decoding is a loop over [`DecoderState`]s, each step reading one chunk
//! (or the signature plus the IHDR chunk when starting) and handing it to
//! the component that understands it.
use log::{debug, trace, warn};
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;

use crate::constants::PNG_SIGNATURE;
use crate::crc::chunk_crc;
use crate::cursor::ByteCursor;
use crate::enums::{ChunkTag, PngColor};
use crate::error::{tag_name, DecodeError, DecodeErrorKind, DecodeWarning};
use crate::headers::{parse_ihdr, parse_plte, ImageHeader, PaletteEntry};
use crate::image::DecodedImage;
use crate::options::PngOptions;
use crate::payload::CompressedPayload;
use crate::reconstruct::reconstruct;

/// Where the decoder is in the chunk sequence
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecoderState {
    /// Nothing read yet
    Init,
    /// IHDR read
    Header,
    /// PLTE read, no image data yet
    Palette,
    /// At least one IDAT read
    Data,
    /// IEND read
    End
}

/// One framed chunk, CRC already confirmed
#[derive(Copy, Clone)]
pub(crate) struct PngChunk<'a> {
    pub tag:      ChunkTag,
    pub raw_tag:  [u8; 4],
    pub payload:  &'a [u8],
    /// Offset of the length field
    pub position: usize
}

/// Everything accumulated between the first and the last chunk
#[derive(Default)]
struct DecodeSession {
    header:          Option<ImageHeader>,
    palette:         Option<Vec<PaletteEntry>>,
    payload:         CompressedPayload,
    warnings:        Vec<DecodeWarning>,
    chunk_index:     usize,
    last_was_idat:   bool,
    seen_bkgd:       bool,
    seen_phys:       bool,
    /// Offset of the IEND chunk, errors after it point there
    end_position:    usize,
    payload_taken:   bool,
    previous_failed: bool
}

/// A png decoder over an in memory buffer
pub struct PngDecoder<'a> {
    stream:  ByteCursor<'a>,
    options: PngOptions,
    state:   DecoderState,
    session: DecodeSession
}

impl<'a> PngDecoder<'a> {
    pub fn new(data: &'a [u8]) -> PngDecoder<'a> {
        PngDecoder::new_with_options(data, PngOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: PngOptions) -> PngDecoder<'a> {
        PngDecoder {
            stream: ByteCursor::new(data),
            options,
            state: DecoderState::Init,
            session: DecodeSession::default()
        }
    }

    pub const fn state(&self) -> DecoderState {
        self.state
    }

    /// Header information, present once [`decode_headers`](Self::decode_headers) succeeded
    pub const fn get_info(&self) -> Option<&ImageHeader> {
        self.session.header.as_ref()
    }

    pub fn get_dimensions(&self) -> Option<(usize, usize)> {
        self.session
            .header
            .map(|h| (h.width as usize, h.height as usize))
    }

    pub fn get_depth(&self) -> Option<BitDepth> {
        self.session.header.map(|h| match h.depth {
            16 => BitDepth::Sixteen,
            _ => BitDepth::Eight
        })
    }

    /// Colorspace of the image, indexed images report the colorspace of their palette
    pub fn get_colorspace(&self) -> Option<ColorSpace> {
        self.session.header.map(|h| match h.color {
            PngColor::Luma => ColorSpace::Luma,
            PngColor::LumaA => ColorSpace::LumaA,
            PngColor::RGB | PngColor::Palette => ColorSpace::RGB,
            PngColor::RGBA => ColorSpace::RGBA
        })
    }

    /// Warnings retained so far
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.session.warnings
    }

    /// Read up to and including the IHDR chunk.
    ///
    /// Does nothing if the header is already known.
    pub fn decode_headers(&mut self) -> Result<(), DecodeError> {
        self.check_not_failed()?;

        if self.state == DecoderState::Init {
            self.step()?;
        }
        Ok(())
    }

    /// Decode the whole image.
    ///
    /// Resumes from wherever [`decode_headers`](Self::decode_headers) stopped.
    /// A decoder produces at most one image.
    pub fn decode(&mut self) -> Result<DecodedImage, DecodeError> {
        self.check_not_failed()?;

        while self.state != DecoderState::End {
            self.step()?;
        }
        let result = self.finish();

        if result.is_err() {
            self.session.previous_failed = true;
        }
        result
    }

    fn check_not_failed(&self) -> Result<(), DecodeError> {
        if self.session.previous_failed {
            return Err(self.error_at(
                DecodeErrorKind::ProtocolViolation("Decoder already failed"),
                self.stream.position()
            ));
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), DecodeError> {
        match self.decode_next(self.state) {
            Ok(state) => {
                if state != self.state {
                    debug!("State {:?} -> {:?}", self.state, state);
                }
                self.state = state;
                Ok(())
            }
            Err(err) => {
                self.session.previous_failed = true;
                Err(err)
            }
        }
    }

    /// Run one step of the state machine, returning the next state
    fn decode_next(&mut self, state: DecoderState) -> Result<DecoderState, DecodeError> {
        match state {
            DecoderState::Init => {
                self.read_signature()?;

                let chunk = self.read_chunk()?;

                if chunk.tag != ChunkTag::IHDR {
                    return Err(self.chunk_error(
                        DecodeErrorKind::ProtocolViolation("First chunk not IHDR"),
                        &chunk
                    ));
                }
                self.handle_ihdr(&chunk)?;
                self.session.chunk_index += 1;

                Ok(DecoderState::Header)
            }
            DecoderState::End => Ok(DecoderState::End),
            _ => {
                let chunk = self.read_chunk()?;
                let next = self.dispatch(state, &chunk)?;

                self.session.last_was_idat = chunk.tag == ChunkTag::IDAT;
                self.session.chunk_index += 1;

                Ok(next)
            }
        }
    }

    fn read_signature(&mut self) -> Result<(), DecodeError> {
        let available = self.stream.remaining().min(PNG_SIGNATURE.len());
        let head = self
            .stream
            .peek(available)
            .map_err(|e| DecodeError::new(e.into(), 0, None))?;

        if head != &PNG_SIGNATURE[..available] {
            return Err(DecodeError::new(DecodeErrorKind::NotAPng, 0, None));
        }
        self.stream
            .advance(PNG_SIGNATURE.len())
            .map_err(|e| DecodeError::new(e.into(), 0, None))?;

        Ok(())
    }

    /// Read length, tag, payload and CRC of the next chunk and confirm the CRC
    fn read_chunk(&mut self) -> Result<PngChunk<'a>, DecodeError> {
        let position = self.stream.position();
        let index = Some(self.session.chunk_index);
        let wrap = |e: crate::cursor::CursorError| DecodeError::new(e.into(), position, index);

        // Format is length - chunk type - [data] - crc
        let length = self.stream.get_u32_be_err().map_err(wrap)? as usize;
        let raw_tag: [u8; 4] = self.stream.read_fixed().map_err(wrap)?;
        let payload = self.stream.read(length).map_err(wrap)?;
        let crc = self.stream.get_u32_be_err().map_err(wrap)?;

        trace!(
            "Chunk {} at {position}, {length} bytes",
            tag_name(&raw_tag)
        );

        let calculated = chunk_crc(&raw_tag, payload);

        if crc != calculated {
            return Err(DecodeError::new(
                DecodeErrorKind::CorruptChunk {
                    tag:      raw_tag,
                    expected: crc,
                    found:    calculated
                },
                position,
                index
            ));
        }

        Ok(PngChunk {
            tag: ChunkTag::from_bytes(raw_tag),
            raw_tag,
            payload,
            position
        })
    }

    fn dispatch(
        &mut self, state: DecoderState, chunk: &PngChunk<'a>
    ) -> Result<DecoderState, DecodeError> {
        match chunk.tag {
            ChunkTag::IHDR => Err(self.chunk_error(
                DecodeErrorKind::ProtocolViolation("Multiple IHDR, corrupt PNG"),
                chunk
            )),
            ChunkTag::PLTE => self.handle_plte(state, chunk),
            ChunkTag::IDAT => self.handle_idat(state, chunk),
            ChunkTag::IEND => self.handle_iend(state, chunk),
            ChunkTag::bKGD | ChunkTag::pHYs => {
                self.handle_passthrough(state, chunk)?;
                Ok(state)
            }
            ChunkTag::Unknown(tag) => {
                if ChunkTag::is_critical(tag) {
                    return Err(
                        self.chunk_error(DecodeErrorKind::UnsupportedCriticalChunk(tag), chunk)
                    );
                }
                warn!(
                    "Skipping unknown ancillary chunk {} ({} bytes)",
                    tag_name(&tag),
                    chunk.payload.len()
                );
                self.session
                    .warnings
                    .push(DecodeWarning::SkippedAncillaryChunk(tag));
                Ok(state)
            }
        }
    }

    fn handle_ihdr(&mut self, chunk: &PngChunk<'a>) -> Result<(), DecodeError> {
        let header = parse_ihdr(&mut ByteCursor::new(chunk.payload))
            .map_err(|kind| self.chunk_error(kind, chunk))?;

        let width = header.width as usize;
        let height = header.height as usize;

        if width > self.options.get_max_width() {
            return Err(self.chunk_error(
                DecodeErrorKind::ResourceLimitExceeded {
                    what:  "Image width",
                    limit: self.options.get_max_width(),
                    found: width
                },
                chunk
            ));
        }
        if height > self.options.get_max_height() {
            return Err(self.chunk_error(
                DecodeErrorKind::ResourceLimitExceeded {
                    what:  "Image height",
                    limit: self.options.get_max_height(),
                    found: height
                },
                chunk
            ));
        }
        let limit = self.options.get_max_image_size();

        let sizes = [
            ("Inflated image data size", header.inflated_len()),
            (
                "Decoded sample buffer size",
                header.num_samples().and_then(|n| n.checked_mul(2))
            )
        ];
        for (what, size) in sizes {
            match size {
                Some(found) if found <= limit => (),
                _ => {
                    return Err(self.chunk_error(
                        DecodeErrorKind::ResourceLimitExceeded {
                            what,
                            limit,
                            found: size.unwrap_or(usize::MAX)
                        },
                        chunk
                    ))
                }
            }
        }
        self.session.header = Some(header);

        Ok(())
    }

    fn handle_plte(
        &mut self, state: DecoderState, chunk: &PngChunk<'a>
    ) -> Result<DecoderState, DecodeError> {
        if state == DecoderState::Data {
            return Err(self.chunk_error(
                DecodeErrorKind::ProtocolViolation("PLTE after IDAT"),
                chunk
            ));
        }
        if self.session.palette.is_some() {
            return Err(self.chunk_error(
                DecodeErrorKind::ProtocolViolation("Multiple PLTE chunks"),
                chunk
            ));
        }
        let palette = parse_plte(&mut ByteCursor::new(chunk.payload))
            .map_err(|kind| self.chunk_error(kind, chunk))?;

        let color = self.header(chunk)?.color;

        if matches!(color, PngColor::Luma | PngColor::LumaA) {
            if self.options.get_strict_mode() {
                return Err(self.chunk_error(
                    DecodeErrorKind::ProtocolViolation("PLTE not allowed for grayscale images"),
                    chunk
                ));
            }
            warn!("PLTE chunk present for grayscale color type {color:?}, ignoring it");
            self.session.warnings.push(DecodeWarning::InertPalette);
        }
        self.session.palette = Some(palette);

        Ok(DecoderState::Palette)
    }

    fn handle_idat(
        &mut self, state: DecoderState, chunk: &PngChunk<'a>
    ) -> Result<DecoderState, DecodeError> {
        let color = self.header(chunk)?.color;

        if color == PngColor::Palette && self.session.palette.is_none() {
            return Err(self.chunk_error(
                DecodeErrorKind::ProtocolViolation("Indexed image without PLTE before IDAT"),
                chunk
            ));
        }
        if state == DecoderState::Data && !self.session.last_was_idat {
            if self.options.get_strict_mode() {
                return Err(self.chunk_error(
                    DecodeErrorKind::ProtocolViolation("IDAT chunks are not consecutive"),
                    chunk
                ));
            }
            if !self.session.warnings.contains(&DecodeWarning::SplitImageData) {
                warn!("IDAT chunks are not consecutive");
                self.session.warnings.push(DecodeWarning::SplitImageData);
            }
        }
        let limit = self.options.get_max_payload_size();

        self.session
            .payload
            .append(chunk.payload, limit)
            .map_err(|kind| self.chunk_error(kind, chunk))?;

        Ok(DecoderState::Data)
    }

    fn handle_iend(
        &mut self, state: DecoderState, chunk: &PngChunk<'a>
    ) -> Result<DecoderState, DecodeError> {
        if !chunk.payload.is_empty() {
            return Err(self.chunk_error(
                DecodeErrorKind::ProtocolViolation("IEND chunk has a payload"),
                chunk
            ));
        }
        if state != DecoderState::Data {
            return Err(self.chunk_error(
                DecodeErrorKind::ProtocolViolation("IEND before any IDAT"),
                chunk
            ));
        }
        debug!(
            "IEND: {} bytes of image data in {} IDAT chunks",
            self.session.payload.len(),
            self.session.payload.chunks()
        );
        if !self.stream.is_eof() {
            debug!("Ignoring {} bytes after IEND", self.stream.remaining());
        }
        self.session.end_position = chunk.position;

        Ok(DecoderState::End)
    }

    /// bKGD and pHYs, framed and CRC checked but otherwise ignored
    fn handle_passthrough(
        &mut self, state: DecoderState, chunk: &PngChunk<'a>
    ) -> Result<(), DecodeError> {
        let seen = match chunk.tag {
            ChunkTag::bKGD => &mut self.session.seen_bkgd,
            _ => &mut self.session.seen_phys
        };
        let duplicate = *seen;
        *seen = true;

        let warning = if duplicate {
            Some((
                "Multiple bKGD or pHYs chunks",
                DecodeWarning::DuplicateAncillaryChunk(chunk.raw_tag)
            ))
        } else if state == DecoderState::Data {
            Some((
                "bKGD or pHYs after IDAT",
                DecodeWarning::LateAncillaryChunk(chunk.raw_tag)
            ))
        } else {
            None
        };

        if let Some((reason, warning)) = warning {
            if self.options.get_strict_mode() {
                return Err(self.chunk_error(DecodeErrorKind::ProtocolViolation(reason), chunk));
            }
            warn!("{reason}, ignoring chunk {}", tag_name(&chunk.raw_tag));
            self.session.warnings.push(warning);
        }
        trace!("Skipping {} bytes of {}", chunk.payload.len(), tag_name(&chunk.raw_tag));

        Ok(())
    }

    /// Inflate, reconstruct and hand out the image
    fn finish(&mut self) -> Result<DecodedImage, DecodeError> {
        let position = self.session.end_position;
        let index = Some(self.session.chunk_index.saturating_sub(1));
        let wrap = |kind| DecodeError::new(kind, position, index);

        if self.session.payload_taken {
            return Err(wrap(DecodeErrorKind::ProtocolViolation(
                "Image already decoded"
            )));
        }
        let header = self.session.header.ok_or_else(|| {
            wrap(DecodeErrorKind::ProtocolViolation("No IHDR chunk"))
        })?;
        let expected = header.inflated_len().ok_or_else(|| {
            wrap(DecodeErrorKind::ResourceLimitExceeded {
                what:  "Inflated image data size",
                limit: self.options.get_max_image_size(),
                found: usize::MAX
            })
        })?;

        let payload = core::mem::take(&mut self.session.payload);
        self.session.payload_taken = true;

        let scanlines = payload.inflate(expected).map_err(wrap)?;
        let samples = reconstruct(&header, &scanlines).map_err(wrap)?;

        debug!("Decoded {} samples", samples.len());

        Ok(DecodedImage::new(
            header,
            samples,
            self.session.palette.take(),
            self.session.warnings.clone()
        ))
    }

    fn header(&self, chunk: &PngChunk) -> Result<ImageHeader, DecodeError> {
        self.session.header.ok_or_else(|| {
            self.chunk_error(
                DecodeErrorKind::ProtocolViolation("Chunk before IHDR"),
                chunk
            )
        })
    }

    fn chunk_error(&self, kind: DecodeErrorKind, chunk: &PngChunk) -> DecodeError {
        DecodeError::new(kind, chunk.position, Some(self.session.chunk_index))
    }

    fn error_at(&self, kind: DecodeErrorKind, position: usize) -> DecodeError {
        DecodeError::new(kind, position, Some(self.session.chunk_index))
    }
}
