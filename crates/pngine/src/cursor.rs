/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A bounds checked forward only reader over a borrowed byte slice.
//!
//! Everything that reads from the input goes through [`ByteCursor::peek`]
//! and [`ByteCursor::advance`], the remaining helpers are built on those two.

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CursorError {
    /// Tried to go past the end of the buffer
    OutOfRange { requested: usize, remaining: usize }
}

/// Reader over a byte slice.
///
/// Invariant: `position <= end` at all times.
#[derive(Clone)]
pub struct ByteCursor<'a> {
    data:     &'a [u8],
    position: usize,
    end:      usize
}

impl<'a> ByteCursor<'a> {
    pub const fn new(data: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor {
            data,
            position: 0,
            end: data.len()
        }
    }

    /// Current offset from the start of the buffer
    #[inline(always)]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes left before the end
    #[inline(always)]
    pub const fn remaining(&self) -> usize {
        self.end - self.position
    }

    #[inline(always)]
    pub const fn has(&self, num: usize) -> bool {
        num <= self.remaining()
    }

    #[inline(always)]
    pub const fn is_eof(&self) -> bool {
        self.position == self.end
    }

    /// Return the next `num` bytes without moving forward
    #[inline]
    pub fn peek(&self, num: usize) -> Result<&'a [u8], CursorError> {
        if !self.has(num) {
            return Err(self.out_of_range(num));
        }
        Ok(&self.data[self.position..self.position + num])
    }

    /// Move forward by `num` bytes
    #[inline]
    pub fn advance(&mut self, num: usize) -> Result<(), CursorError> {
        if !self.has(num) {
            return Err(self.out_of_range(num));
        }
        self.position += num;
        Ok(())
    }

    /// Return the next `num` bytes and move past them
    #[inline]
    pub fn read(&mut self, num: usize) -> Result<&'a [u8], CursorError> {
        let bytes = self.peek(num)?;
        self.advance(num)?;
        Ok(bytes)
    }

    #[inline]
    pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        let mut out = [0; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    #[inline]
    pub fn get_u8_err(&mut self) -> Result<u8, CursorError> {
        Ok(self.read_fixed::<1>()?[0])
    }

    #[inline]
    pub fn get_u32_be_err(&mut self) -> Result<u32, CursorError> {
        Ok(u32::from_be_bytes(self.read_fixed()?))
    }

    fn out_of_range(&self, requested: usize) -> CursorError {
        CursorError::OutOfRange {
            requested,
            remaining: self.remaining()
        }
    }
}
