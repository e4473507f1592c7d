/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! Byte tokenizer (C1): turns a byte slice into a stream of CBOR tokens.
//!
//! Each call to [`Tokenizer::next_token`] reads exactly one initial byte plus whatever immediate
//! payload that byte's major type/additional-info calls for (an integer argument, a byte/text
//! string's content, a float's bit pattern), or emits a structural marker for array/map/tag
//! openers, indefinite-length openers, and `break`. Array/map/tag content is *not* read
//! recursively here - that's the item decoder's job (C2).

use crate::cbor::bignum::BigUint;
use crate::cbor::error::{CborError, Result};
use half::f16;

const MAX_LEN: usize = i32::MAX as usize;

/// One CBOR token. `ArrayStart`/`MapStart` carry the declared item/pair count for definite-length
/// containers; the `*Indefinite` variants carry none, and are terminated by a later `Break`.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    UInt(u64),
    /// Negative integer; the encoded magnitude `m` denotes the value `-1 - m`.
    NInt(u64),
    /// Positive bignum magnitude, carried as raw big-endian bytes (tag-2 content is always a
    /// byte string; the tokenizer itself never emits this directly - it is produced by the tag
    /// processor for tag 2/3, see `crate::cbor::tags`).
    Bytes(Vec<u8>),
    Text(String),
    ArrayStart(usize),
    ArrayStartIndefinite,
    MapStart(usize),
    MapStartIndefinite,
    BytesStartIndefinite,
    TextStartIndefinite,
    TagStart(u64),
    Simple(u8),
    Bool(bool),
    Null,
    Undefined,
    Float32(f32),
    Float64(f64),
    Break,
}

/// Cursor-based tokenizer over a byte slice.
pub struct Tokenizer<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Tokenizer { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn read_byte(&mut self) -> Result<u8> {
        let b = *self
            .buf
            .get(self.pos)
            .ok_or(CborError::InsufficientData(self.pos))?;
        self.pos += 1;
        Ok(b)
    }

    fn read_exact(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > MAX_LEN {
            return Err(CborError::TooLong(self.pos));
        }
        let end = self
            .pos
            .checked_add(len)
            .ok_or(CborError::TooLong(self.pos))?;
        if end > self.buf.len() {
            return Err(CborError::InsufficientData(self.pos));
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Read the additional-info argument for an initial byte, per RFC 8949 §3.1. Returns `None`
    /// when `info == 31` (indefinite/break marker, handled by the caller).
    fn read_argument(&mut self, info: u8, offset: usize) -> Result<Option<u64>> {
        match info {
            0..=23 => Ok(Some(info as u64)),
            24 => {
                let b = self.read_byte()?;
                Ok(Some(b as u64))
            }
            25 => {
                let bytes = self.read_exact(2)?;
                Ok(Some(u16::from_be_bytes(bytes.try_into().unwrap()) as u64))
            }
            26 => {
                let bytes = self.read_exact(4)?;
                Ok(Some(u32::from_be_bytes(bytes.try_into().unwrap()) as u64))
            }
            27 => {
                let bytes = self.read_exact(8)?;
                Ok(Some(u64::from_be_bytes(bytes.try_into().unwrap())))
            }
            28..=30 => Err(CborError::InvalidInfo(offset)),
            31 => Ok(None),
            _ => unreachable!("additional-info is a 5-bit field"),
        }
    }

    /// Read the next token. Returns `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        if self.at_eof() {
            return Ok(None);
        }
        let offset = self.pos;
        let initial = self.read_byte()?;
        let major = initial >> 5;
        let info = initial & 0x1f;

        let tok = match major {
            0 => {
                let arg = self
                    .read_argument(info, offset)?
                    .ok_or(CborError::InvalidInfo(offset))?;
                Token::UInt(arg)
            }
            1 => {
                let arg = self
                    .read_argument(info, offset)?
                    .ok_or(CborError::InvalidInfo(offset))?;
                Token::NInt(arg)
            }
            2 => match self.read_argument(info, offset)? {
                Some(len) => {
                    let bytes = self.read_exact(len as usize)?;
                    Token::Bytes(bytes.to_vec())
                }
                None => Token::BytesStartIndefinite,
            },
            3 => match self.read_argument(info, offset)? {
                Some(len) => {
                    let bytes = self.read_exact(len as usize)?;
                    let s = std::str::from_utf8(bytes)
                        .map_err(|e| CborError::MalformedUtf8(offset + 1 + e.valid_up_to()))?;
                    Token::Text(s.to_string())
                }
                None => Token::TextStartIndefinite,
            },
            4 => match self.read_argument(info, offset)? {
                Some(n) => Token::ArrayStart(n as usize),
                None => Token::ArrayStartIndefinite,
            },
            5 => match self.read_argument(info, offset)? {
                Some(n) => Token::MapStart(n as usize),
                None => Token::MapStartIndefinite,
            },
            6 => {
                let tag = self
                    .read_argument(info, offset)?
                    .ok_or(CborError::InvalidInfo(offset))?;
                Token::TagStart(tag)
            }
            7 => match info {
                0..=19 => Token::Simple(info),
                20 => Token::Bool(false),
                21 => Token::Bool(true),
                22 => Token::Null,
                23 => Token::Undefined,
                24 => {
                    let b = self.read_byte()?;
                    if b < 32 {
                        return Err(CborError::InvalidSimpleValue(offset));
                    }
                    Token::Simple(b)
                }
                25 => {
                    let bytes = self.read_exact(2)?;
                    let half = f16::from_be_bytes(bytes.try_into().unwrap());
                    Token::Float32(half.to_f32())
                }
                26 => {
                    let bytes = self.read_exact(4)?;
                    Token::Float32(f32::from_be_bytes(bytes.try_into().unwrap()))
                }
                27 => {
                    let bytes = self.read_exact(8)?;
                    Token::Float64(f64::from_be_bytes(bytes.try_into().unwrap()))
                }
                28..=30 => return Err(CborError::InvalidInfo(offset)),
                31 => Token::Break,
                _ => unreachable!(),
            },
            _ => unreachable!("major type is a 3-bit field"),
        };
        Ok(Some(tok))
    }
}

/// Build a `BigUint` from the magnitude bytes of a bignum tag's byte-string content.
pub fn bignum_from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_be_bytes(bytes)
}
