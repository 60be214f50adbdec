/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use zune_core::options::DecoderOptions;

/// Decoder configuration.
///
/// Width, height and strict mode come from the shared [`DecoderOptions`],
/// the two size limits are png specific.
///
/// The default is lenient. `DecoderOptions::default()` on its own reports
/// strict mode, so pass it through [`PngOptions::set_strict_mode`] when
/// building from one.
#[derive(Debug, Copy, Clone)]
pub struct PngOptions {
    decoder:          DecoderOptions,
    max_payload_size: usize,
    max_image_size:   usize
}

impl Default for PngOptions {
    fn default() -> Self {
        PngOptions {
            decoder:          DecoderOptions::default().set_strict_mode(false),
            max_payload_size: 1 << 28,
            max_image_size:   1 << 30
        }
    }
}

impl PngOptions {
    pub fn new(decoder: DecoderOptions) -> PngOptions {
        PngOptions {
            decoder,
            ..PngOptions::default()
        }
    }

    pub fn get_decoder_options(&self) -> &DecoderOptions {
        &self.decoder
    }

    pub fn get_max_width(&self) -> usize {
        self.decoder.get_max_width()
    }

    pub fn get_max_height(&self) -> usize {
        self.decoder.get_max_height()
    }

    pub fn get_strict_mode(&self) -> bool {
        self.decoder.get_strict_mode()
    }

    /// Maximum summed size of all IDAT payloads, in bytes
    pub const fn get_max_payload_size(&self) -> usize {
        self.max_payload_size
    }

    /// Maximum size of the inflated scanline stream and of the sample buffer, in bytes
    pub const fn get_max_image_size(&self) -> usize {
        self.max_image_size
    }

    pub fn set_max_width(mut self, width: usize) -> Self {
        self.decoder = self.decoder.set_max_width(width);
        self
    }

    pub fn set_max_height(mut self, height: usize) -> Self {
        self.decoder = self.decoder.set_max_height(height);
        self
    }

    /// Treat irregular but recoverable chunk layouts as errors
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.decoder = self.decoder.set_strict_mode(yes);
        self
    }

    pub fn set_max_payload_size(mut self, size: usize) -> Self {
        self.max_payload_size = size;
        self
    }

    pub fn set_max_image_size(mut self, size: usize) -> Self {
        self.max_image_size = size;
        self
    }
}

impl From<DecoderOptions> for PngOptions {
    fn from(value: DecoderOptions) -> Self {
        PngOptions::new(value)
    }
}
