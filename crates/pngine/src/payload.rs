/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use log::{debug, trace};
use zune_inflate::{DeflateDecoder, DeflateOptions};

use crate::error::DecodeErrorKind;

/// Concatenation of all IDAT payloads, in arrival order
#[derive(Default)]
pub(crate) struct CompressedPayload {
    data:   Vec<u8>,
    chunks: usize
}

impl CompressedPayload {
    /// Append one IDAT payload, refusing to grow past `limit` bytes
    pub fn append(&mut self, bytes: &[u8], limit: usize) -> Result<(), DecodeErrorKind> {
        let new_len = self.data.len().saturating_add(bytes.len());

        if new_len > limit {
            return Err(DecodeErrorKind::ResourceLimitExceeded {
                what: "Compressed image data size",
                limit,
                found: new_len
            });
        }
        self.data.extend_from_slice(bytes);
        self.chunks += 1;

        trace!("IDAT #{}: {} bytes, {} total", self.chunks, bytes.len(), new_len);

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    /// Inflate the accumulated zlib stream.
    ///
    /// The result must be exactly `expected` bytes, anything else means the
    /// image data does not match the header.
    pub fn inflate(self, expected: usize) -> Result<Vec<u8>, DecodeErrorKind> {
        debug!(
            "Inflating {} bytes from {} IDAT chunks, expecting {} bytes",
            self.data.len(),
            self.chunks,
            expected
        );
        // deflate doesn't store its uncompressed size, but the header tells
        // us exactly how much we should get, so use it as both hint and limit.
        let options = DeflateOptions::default()
            .set_size_hint(expected)
            .set_limit(expected)
            .set_confirm_checksum(true);

        let mut decoder = DeflateDecoder::new_with_options(&self.data, options);

        let data = decoder
            .decode_zlib()
            .map_err(|err| {
                let reason = format!("{:?}", err.error);
                DecodeErrorKind::DecompressionFailed(reason.trim_end().to_string())
            })?;

        if data.len() != expected {
            return Err(DecodeErrorKind::DecompressionFailed(format!(
                "Expected {expected} bytes of scanline data but stream inflated to {} bytes",
                data.len()
            )));
        }
        Ok(data)
    }
}
