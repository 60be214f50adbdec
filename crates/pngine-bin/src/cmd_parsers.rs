/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use log::{info, Level};
use pngine::PngOptions;
use zune_core::options::DecoderOptions;

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level;

    if options.get_flag("debug") {
        log_level = Level::Debug;
    } else if options.get_flag("trace") {
        log_level = Level::Trace;
    } else if options.get_flag("warn") {
        log_level = Level::Warn
    } else if options.get_flag("info") {
        log_level = Level::Info;
    } else {
        log_level = Level::Warn;
    }

    simple_logger::init_with_level(log_level).unwrap();

    info!("Initialized logger");
    info!("Log level :{}", log_level);
}

pub fn get_decoder_options(options: &ArgMatches) -> PngOptions {
    let max_width = options
        .get_one::<usize>("max-width")
        .copied()
        .unwrap_or(1 << 14);
    let max_height = options
        .get_one::<usize>("max-height")
        .copied()
        .unwrap_or(1 << 14);
    let strict_mode = options.get_flag("strict");

    info!("Max width: {max_width}, max height: {max_height}, strict: {strict_mode}");

    let decoder_options = DecoderOptions::default()
        .set_max_width(max_width)
        .set_max_height(max_height)
        .set_strict_mode(strict_mode);

    PngOptions::from(decoder_options)
}
