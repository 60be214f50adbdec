/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::ArgMatches;
use log::{info, warn};
use pngine::{PngDecoder, PngOptions};

use crate::file_io::{read_file, CliErrors};
use crate::report::ImageReport;

/// Decode every input file and print a report for each to standard output.
///
/// Stops at the first file that fails.
pub fn decode_input_files(args: &ArgMatches, options: PngOptions) -> Result<(), CliErrors> {
    let probe_only = args.get_flag("probe");

    let Some(files) = args.get_raw("in") else {
        warn!("No input files");
        return Ok(());
    };

    for in_file in files {
        let path = PathBuf::from(in_file);
        let data = read_file(&path)?;

        info!("Decoding {}", path.display());

        let mut decoder = PngDecoder::new_with_options(&data, options);

        decoder
            .decode_headers()
            .map_err(|e| CliErrors::Decode(path.clone(), e))?;

        if probe_only {
            if let Some(header) = decoder.get_info() {
                let report = ImageReport::from_header(&path, header, decoder.warnings());
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            continue;
        }
        let image = decoder
            .decode()
            .map_err(|e| CliErrors::Decode(path.clone(), e))?;

        let report = ImageReport::from_image(&path, &image);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
