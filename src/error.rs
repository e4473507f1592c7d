/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! Shared error-handling conventions for the crate.
//!
//! Each layer (`cbor`, `cose`, `cwt`, `mdoc`) owns its own `thiserror`-derived error enum and
//! `Result<T>` alias, composed via `#[from]` so a lower layer's error converts into the layer
//! above it with `?` (`CborError` into `CoseError`, `CoseError`/`CborError` into `CwtError` and
//! `MdocError`). [`Error`] is the top-level union of all four, for callers who drive more than
//! one layer (as [`crate::mdoc::builder::IssuerSignedBuilder::build`] does internally) and want a
//! single error type rather than threading each layer's through by hand.

use crate::cbor::CborError;
use crate::cose::CoseError;
use crate::cwt::CwtError;
use crate::mdoc::MdocError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Cbor(#[from] CborError),
    #[error(transparent)]
    Cose(#[from] CoseError),
    #[error(transparent)]
    Cwt(#[from] CwtError),
    #[error(transparent)]
    Mdoc(#[from] MdocError),
}
