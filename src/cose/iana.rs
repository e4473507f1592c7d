/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! IANA-registered COSE identifiers this implementation understands: algorithms, curves, key
//! types, key operations and header-parameter labels. Only the subset the object layer actually
//! dispatches on is reified as an enum; everything else passes through as a raw integer.
//!
//! <https://www.iana.org/assignments/cose/cose.xhtml>

use crate::cose::error::CoseError;

/// Header parameter labels (§3.2).
pub mod header_label {
    pub const ALG: i64 = 1;
    pub const CRIT: i64 = 2;
    pub const CONTENT_TYPE: i64 = 3;
    pub const KID: i64 = 4;
    pub const IV: i64 = 5;
    pub const PARTIAL_IV: i64 = 6;
    pub const X5CHAIN: i64 = 33;
}

/// Signature algorithms. Only ECDSA over the three NIST curves is functional (§4.6); the others
/// round-trip through the key/header model but cannot be used with `Signer`/`Verifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Es256,
    Es384,
    Es512,
    EdDsa,
    Ps256,
    Ps384,
    Ps512,
}

impl Algorithm {
    pub fn from_i64(v: i64) -> Option<Self> {
        Some(match v {
            -7 => Algorithm::Es256,
            -35 => Algorithm::Es384,
            -36 => Algorithm::Es512,
            -8 => Algorithm::EdDsa,
            -37 => Algorithm::Ps256,
            -38 => Algorithm::Ps384,
            -39 => Algorithm::Ps512,
            _ => return None,
        })
    }

    pub fn to_i64(self) -> i64 {
        match self {
            Algorithm::Es256 => -7,
            Algorithm::Es384 => -35,
            Algorithm::Es512 => -36,
            Algorithm::EdDsa => -8,
            Algorithm::Ps256 => -37,
            Algorithm::Ps384 => -38,
            Algorithm::Ps512 => -39,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Es256 => "ES256",
            Algorithm::Es384 => "ES384",
            Algorithm::Es512 => "ES512",
            Algorithm::EdDsa => "EdDSA",
            Algorithm::Ps256 => "PS256",
            Algorithm::Ps384 => "PS384",
            Algorithm::Ps512 => "PS512",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "ES256" => Algorithm::Es256,
            "ES384" => Algorithm::Es384,
            "ES512" => Algorithm::Es512,
            "EdDSA" => Algorithm::EdDsa,
            "PS256" => Algorithm::Ps256,
            "PS384" => Algorithm::Ps384,
            "PS512" => Algorithm::Ps512,
            _ => return None,
        })
    }

    /// Expected `r`/`s` coordinate width in bytes for the ECDSA algorithms (§6.2). `None` for
    /// algorithms that are not fixed-width-ECDSA.
    pub fn ecdsa_coordinate_width(self) -> Option<usize> {
        match self {
            Algorithm::Es256 => Some(32),
            Algorithm::Es384 => Some(48),
            Algorithm::Es512 => Some(66),
            _ => None,
        }
    }

    pub fn for_curve(curve: EcCurve) -> Result<Self, CoseError> {
        Ok(match curve {
            EcCurve::P256 => Algorithm::Es256,
            EcCurve::P384 => Algorithm::Es384,
            EcCurve::P521 => Algorithm::Es512,
            EcCurve::Ed25519 | EcCurve::Ed448 => Algorithm::EdDsa,
            EcCurve::X25519 | EcCurve::X448 => {
                return Err(CoseError::UnsupportedCurve("X25519/X448 are not signing curves".into()))
            }
        })
    }
}

/// Elliptic curves (§3.4), used by both EC2 and OKP key types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcCurve {
    P256,
    P384,
    P521,
    X25519,
    X448,
    Ed25519,
    Ed448,
}

impl EcCurve {
    pub fn from_i64(v: i64) -> Option<Self> {
        Some(match v {
            1 => EcCurve::P256,
            2 => EcCurve::P384,
            3 => EcCurve::P521,
            4 => EcCurve::X25519,
            5 => EcCurve::X448,
            6 => EcCurve::Ed25519,
            7 => EcCurve::Ed448,
            _ => return None,
        })
    }

    pub fn to_i64(self) -> i64 {
        match self {
            EcCurve::P256 => 1,
            EcCurve::P384 => 2,
            EcCurve::P521 => 3,
            EcCurve::X25519 => 4,
            EcCurve::X448 => 5,
            EcCurve::Ed25519 => 6,
            EcCurve::Ed448 => 7,
        }
    }
}

/// COSE key types (§3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Okp,
    Ec2,
    Rsa,
    Symmetric,
    HssLms,
    WalnutDsa,
}

impl KeyType {
    pub fn from_i64(v: i64) -> Option<Self> {
        Some(match v {
            1 => KeyType::Okp,
            2 => KeyType::Ec2,
            3 => KeyType::Rsa,
            4 => KeyType::Symmetric,
            5 => KeyType::HssLms,
            6 => KeyType::WalnutDsa,
            _ => return None,
        })
    }

    pub fn to_i64(self) -> i64 {
        match self {
            KeyType::Okp => 1,
            KeyType::Ec2 => 2,
            KeyType::Rsa => 3,
            KeyType::Symmetric => 4,
            KeyType::HssLms => 5,
            KeyType::WalnutDsa => 6,
        }
    }
}

/// Key operations (§4.6): passed to `KeyGetter::get` to say what the key will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOp {
    Sign,
    Verify,
    Encrypt,
    Decrypt,
    WrapKey,
    UnwrapKey,
    DeriveKey,
    DeriveBits,
    MacCreate,
    MacVerify,
}

impl KeyOp {
    pub fn to_i64(self) -> i64 {
        match self {
            KeyOp::Sign => 1,
            KeyOp::Verify => 2,
            KeyOp::Encrypt => 3,
            KeyOp::Decrypt => 4,
            KeyOp::WrapKey => 5,
            KeyOp::UnwrapKey => 6,
            KeyOp::DeriveKey => 7,
            KeyOp::DeriveBits => 8,
            KeyOp::MacCreate => 9,
            KeyOp::MacVerify => 10,
        }
    }
}
