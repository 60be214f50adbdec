/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::process::exit;

use log::error;

use crate::decode_files::decode_input_files;

mod cmd_args;
mod cmd_parsers;
mod decode_files;
mod file_io;
mod report;

pub fn main() {
    let cmd = cmd_args::create_cmd_args();
    let options = cmd.get_matches();

    cmd_parsers::setup_logger(&options);

    let decoder_options = cmd_parsers::get_decoder_options(&options);

    let result = decode_input_files(&options, decoder_options);

    if let Err(err) = result {
        println!();
        error!(" Could not decode image, reason {:?}", err);
        println!();
        exit(-1);
    }
}
