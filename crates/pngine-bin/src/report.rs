/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::Path;

use pngine::{DecodeWarning, DecodedImage, ImageHeader};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// What gets printed for one input file
pub struct ImageReport<'a> {
    file:            &'a Path,
    header:          &'a ImageHeader,
    palette_entries: Option<usize>,
    samples:         Option<usize>,
    warnings:        &'a [DecodeWarning]
}

impl<'a> ImageReport<'a> {
    /// Report for a file whose header was read but whose data was not
    pub fn from_header(
        file: &'a Path, header: &'a ImageHeader, warnings: &'a [DecodeWarning]
    ) -> ImageReport<'a> {
        ImageReport {
            file,
            header,
            palette_entries: None,
            samples: None,
            warnings
        }
    }

    pub fn from_image(file: &'a Path, image: &'a DecodedImage) -> ImageReport<'a> {
        ImageReport {
            file,
            header: image.header(),
            palette_entries: image.palette().map(|p| p.len()),
            samples: Some(image.samples().len()),
            warnings: image.warnings()
        }
    }
}

impl<'a> Serialize for ImageReport<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("ImageReport", 9)?;

        let warnings: Vec<String> = self.warnings.iter().map(|w| w.to_string()).collect();

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("width", &self.header.width)?;
        state.serialize_field("height", &self.header.height)?;
        state.serialize_field("color", &format!("{:?}", self.header.color))?;
        state.serialize_field("bit_depth", &self.header.depth)?;
        state.serialize_field("interlace", &format!("{:?}", self.header.interlace))?;
        state.serialize_field("palette_entries", &self.palette_entries)?;
        state.serialize_field("samples", &self.samples)?;
        state.serialize_field("warnings", &warnings)?;

        state.end()
    }
}
