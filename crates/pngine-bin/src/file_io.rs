/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Formatter};
use std::fs::read;
use std::path::{Path, PathBuf};

use log::debug;
use pngine::DecodeError;

pub enum CliErrors {
    Io(PathBuf, std::io::Error),
    Decode(PathBuf, DecodeError),
    Serialize(serde_json::Error)
}

impl Debug for CliErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(path, err) => write!(f, "Could not read {}: {err}", path.display()),
            Self::Decode(path, err) => write!(f, "Could not decode {}: {err}", path.display()),
            Self::Serialize(err) => write!(f, "Could not serialize report: {err}")
        }
    }
}

impl From<serde_json::Error> for CliErrors {
    fn from(value: serde_json::Error) -> Self {
        CliErrors::Serialize(value)
    }
}

/// Read a whole file into memory
pub fn read_file(path: &Path) -> Result<Vec<u8>, CliErrors> {
    let data = read(path).map_err(|e| CliErrors::Io(path.to_path_buf(), e))?;

    debug!("Read {} bytes from {}", data.len(), path.display());

    Ok(data)
}
