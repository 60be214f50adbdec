/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! CRC-32 (ISO-HDLC, reflected polynomial 0xEDB88320) as used by png chunks

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
    let mut table = [0_u32; 256];
    let mut n = 0;

    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;

        while k < 8 {
            if c & 1 == 1 {
                c = 0xEDB8_8320 ^ (c >> 1);
            } else {
                c >>= 1;
            }
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Feed `data` into a running (non-inverted) crc
#[inline]
pub fn crc32_update(mut crc: u32, data: &[u8]) -> u32 {
    for byte in data {
        crc = CRC_TABLE[((crc ^ u32::from(*byte)) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc
}

/// CRC-32 of a whole buffer
pub fn crc32(data: &[u8]) -> u32 {
    !crc32_update(u32::MAX, data)
}

/// CRC of a chunk, computed over the chunk type followed by its payload
pub fn chunk_crc(tag: &[u8; 4], payload: &[u8]) -> u32 {
    !crc32_update(crc32_update(u32::MAX, tag), payload)
}
