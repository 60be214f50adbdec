/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Scanline de-filtering.
//!
//! Every function takes the filtered bytes of one row (`raw`, filter byte
//! already stripped), the reconstructed previous row (`prev_row`, all zeroes
//! for the first row of an image or pass) and writes the reconstructed row
//! to `current`. `components` is the byte distance to the corresponding
//! byte of the pixel on the left.
use crate::enums::FilterType;

pub(crate) fn defilter_row(
    filter: FilterType, prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize
) {
    match filter {
        FilterType::None => current.copy_from_slice(raw),
        FilterType::Sub => handle_sub(raw, current, components),
        FilterType::Up => handle_up(prev_row, raw, current),
        FilterType::Average => handle_avg(prev_row, raw, current, components),
        FilterType::Paeth => handle_paeth(prev_row, raw, current, components)
    }
}

#[allow(clippy::manual_memcpy)]
pub(crate) fn handle_sub(raw: &[u8], current: &mut [u8], components: usize) {
    let start = components.min(raw.len());

    // handle leftmost pixel explicitly
    for i in 0..start {
        current[i] = raw[i];
    }
    for i in start..raw.len() {
        let a = current[i - components];
        current[i] = raw[i].wrapping_add(a);
    }
}

pub(crate) fn handle_up(prev_row: &[u8], raw: &[u8], current: &mut [u8]) {
    for ((filt, recon), up) in raw.iter().zip(current).zip(prev_row) {
        *recon = (*filt).wrapping_add(*up)
    }
}

pub(crate) fn handle_avg(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    let start = components.min(raw.len());

    // left neighbour is zero for the leftmost pixel
    for i in 0..start {
        current[i] = raw[i].wrapping_add(prev_row[i] >> 1);
    }
    for i in start..raw.len() {
        let a = current[i - components];
        let b = prev_row[i];

        // floor((a + b) / 2) without leaving 8 bits
        let c = (a & b) + ((a ^ b) >> 1);

        current[i] = raw[i].wrapping_add(c);
    }
}

pub(crate) fn handle_paeth(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    let start = components.min(raw.len());

    // left and upper left are zero, so the predictor picks above
    for i in 0..start {
        current[i] = raw[i].wrapping_add(paeth(0, prev_row[i], 0));
    }
    for i in start..raw.len() {
        let paeth_res = paeth(
            current[i - components],
            prev_row[i],
            prev_row[i - components]
        );
        current[i] = raw[i].wrapping_add(paeth_res)
    }
}

/// Paeth predictor for left `a`, above `b` and upper left `c`.
///
/// Ties resolve to `a`, then `b`, then `c`.
#[inline(always)]
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    // FROM STB
    // Equivalent to the reference formulation, but branch free friendly.
    let a = i32::from(a);
    let b = i32::from(b);
    let c = i32::from(c);
    let thresh = c * 3 - (a + b);
    let lo = if a < b { a } else { b };
    let hi = if a < b { b } else { a };

    let t0 = if hi <= thresh { lo } else { c };
    let t1 = if thresh <= lo { hi } else { t0 };
    t1 as u8
}
