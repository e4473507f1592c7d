/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! A hand-rolled RFC 8949 CBOR codec: byte tokenizer (C1), item decoder (C2), item model and
//! canonical encoder (C3), and tag-processor registry (C4).

pub mod bignum;
pub mod decode;
pub mod diag;
pub mod encode;
pub mod error;
pub mod item;
pub mod tags;
pub mod token;

pub use bignum::BigUint;
pub use decode::{decode_one, DecodeOptions};
pub use diag::{render as render_diagnostic, PrefixRegistry};
pub use encode::to_vec;
pub use error::{CborError, Result};
pub use item::{Bstr, Item, Pair};
pub use tags::{default_registry, register_global, well_known, TagHandler, TagRegistry};
pub use token::{Token, Tokenizer};
