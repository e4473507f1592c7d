/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! ISO/IEC 18013-5 mdoc issuer-signed structures (C8): the `IssuerSigned` data model and a
//! builder that assembles and seals one from a set of claims.

pub mod error;
pub mod model;
#[cfg(feature = "mdoc")]
pub mod builder;

pub use error::{MdocError, Result};
pub use model::{
    DeviceKeyInfo, DigestIds, IssuerNameSpaces, IssuerSigned, IssuerSignedItem,
    IssuerSignedItemBytes, MobileSecurityObject, ValidityInfo, ValueDigests,
};
#[cfg(feature = "mdoc")]
pub use builder::{check_digest_invariant, IssuerSignedBuilder};
