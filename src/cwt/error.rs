/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! Error type for the CWT claims-set layer (C7).

use crate::cbor::CborError;
use crate::cose::CoseError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, CwtError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CwtError {
    #[error(transparent)]
    Cbor(#[from] CborError),
    #[error(transparent)]
    Cose(#[from] CoseError),
    /// A claims-set map carried the same label twice.
    #[error("duplicate claim label {0}")]
    DuplicateLabel(i64),
    /// A date-valued claim (`exp`/`nbf`/`iat`) overflowed the 64-bit-seconds bound.
    #[error("date claim out of range")]
    OutOfRange,
    /// The content wrapped by the CWT tag (61) was not a recognizable COSE message.
    #[error("CWT wrapper did not contain a COSE message")]
    NotACoseMessage,
}
