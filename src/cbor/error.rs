/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
//! Error types for the CBOR tokenizer, decoder and encoder (C1-C4).

use thiserror::Error;

/// Result alias used throughout the `cbor` module.
pub type Result<T> = core::result::Result<T, CborError>;

/// Errors raised while tokenizing, decoding or encoding CBOR.
///
/// Decoder errors carry the byte offset at which the problem was detected, per
/// the propagation rule that decoder errors surface with the offset of the
/// byte that triggered them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CborError {
    /// The additional-info field of an initial byte used a reserved encoding (28, 29, 30), or
    /// `info = 31` was used on a major type that does not support indefinite length (0, 1, 6).
    #[error("invalid additional-info encoding at offset {0}")]
    InvalidInfo(usize),
    /// Major type 7, additional-info 24 encoded a simple value below 32, which RFC 8949 requires
    /// to be encoded directly in the initial byte.
    #[error("simple value encoded as two bytes but value < 32 at offset {0}")]
    InvalidSimpleValue(usize),
    /// The input ended before a complete item (or its declared length) could be read.
    #[error("insufficient data at offset {0}")]
    InsufficientData(usize),
    /// A declared length exceeds the implementation ceiling (`i32::MAX`), or honoring it would
    /// require an excessive allocation.
    #[error("declared length too large at offset {0}")]
    TooLong(usize),
    /// A text string's content is not well-formed UTF-8.
    #[error("malformed UTF-8 at offset {0}")]
    MalformedUtf8(usize),
    /// A `break` token (major 7, info 31) appeared outside of an indefinite-length container.
    #[error("unexpected break at offset {0}")]
    UnexpectedBreak(usize),
    /// `strict_canonical` decoding rejected a non-shortest integer encoding or an
    /// indefinite-length item.
    #[error("non-canonical encoding rejected at offset {0}")]
    NonCanonical(usize),
    /// A build-from-item conversion found an item of the wrong kind.
    #[error("unexpected item kind, wanted {wanted}")]
    UnexpectedKind {
        /// Human-readable description of what was expected.
        wanted: &'static str,
    },
    /// A registered tag processor rejected its tag content.
    #[error("tag processor for tag {0} rejected its content")]
    TagProcessorFailed(u64),
    /// A numeric conversion would overflow or underflow the target type.
    #[error("numeric value out of range")]
    OutOfRange,
}
