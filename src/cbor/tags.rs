/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! Tag-processor registry (C4): dispatches a decoded `(tag_number, tag_content)` pair to a
//! handler that may transform it into a more specific item.
//!
//! A process-wide default registry is seeded with handlers for bignums (tags 2/3), embedded CBOR
//! (tag 24) and validating passthroughs for the COSE message tags, CWT (tag 61) and RFC 8610
//! URIs (tag 32). Per §9: the registry is copy-on-register, so registering a new handler never
//! mutates a registry an in-flight decoder already holds a clone of.

use crate::cbor::bignum::BigUint;
use crate::cbor::error::{CborError, Result};
use crate::cbor::item::{Bstr, Item};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// A tag handler: given the tag number and its already-decoded content item, produce the item
/// that should appear in the tree in its place.
pub type TagHandler = Arc<dyn Fn(u64, Item) -> Result<Item> + Send + Sync>;

/// Tag numbers for the six COSE message kinds, CWT and embedded CBOR, centralized here so both
/// the default registry and `crate::cose`/`crate::cwt` agree on them.
pub mod well_known {
    pub const COSE_SIGN: u64 = 98;
    pub const COSE_SIGN1: u64 = 18;
    pub const COSE_ENCRYPT: u64 = 96;
    pub const COSE_ENCRYPT0: u64 = 16;
    pub const COSE_MAC: u64 = 97;
    pub const COSE_MAC0: u64 = 17;
    pub const CWT: u64 = 61;
    pub const EMBEDDED_CBOR: u64 = 24;
    pub const POSITIVE_BIGNUM: u64 = 2;
    pub const NEGATIVE_BIGNUM: u64 = 3;
    pub const URI: u64 = 32;
    pub const DATE_TIME: u64 = 0;
    pub const EPOCH: u64 = 1;
}

/// A mapping from tag number to handler.
#[derive(Clone)]
pub struct TagRegistry {
    handlers: HashMap<u64, TagHandler>,
}

impl TagRegistry {
    pub fn empty() -> Self {
        TagRegistry {
            handlers: HashMap::new(),
        }
    }

    /// Register (or replace) the handler for `tag`.
    pub fn register(&mut self, tag: u64, handler: TagHandler) {
        self.handlers.insert(tag, handler);
    }

    /// Register the identity handler for `tag`: content passes through, still wrapped as
    /// `Item::Tag`, suppressing any previously-registered transformation (§4.4 "callers may
    /// register `default` ... to suppress transformation").
    pub fn suppress(&mut self, tag: u64) {
        self.handlers
            .insert(tag, Arc::new(|tag, content| Ok(Item::Tag(tag, Box::new(content)))));
    }

    /// Dispatch a decoded tag. Falls back to wrapping the content as a plain `Item::Tag` when no
    /// handler is registered.
    pub fn dispatch(&self, tag: u64, content: Item) -> Result<Item> {
        match self.handlers.get(&tag) {
            Some(handler) => handler(tag, content),
            None => Ok(Item::Tag(tag, Box::new(content))),
        }
    }
}

fn bignum_handler(negative: bool) -> TagHandler {
    Arc::new(move |tag, content| {
        let bytes = match &content {
            Item::Bytes(b) => &b.bytes,
            _ => return Err(CborError::TagProcessorFailed(tag)),
        };
        let magnitude = BigUint::from_be_bytes(bytes);
        Ok(if negative {
            Item::from_negative_magnitude(&magnitude)
        } else {
            Item::from_unsigned_bytes(&magnitude)
        })
    })
}

fn embedded_cbor_handler() -> TagHandler {
    Arc::new(|_tag, content| {
        let bytes = match &content {
            Item::Bytes(b) => b.bytes.clone(),
            _ => return Err(CborError::TagProcessorFailed(well_known::EMBEDDED_CBOR)),
        };
        let inner = crate::cbor::decode::decode_all(&bytes, &DecodeOptionsLite::default())
            .map_err(|_| CborError::TagProcessorFailed(well_known::EMBEDDED_CBOR))?;
        Ok(Item::Bytes(Bstr::with_inner(bytes, inner)))
    })
}

/// Validate that `content` is an array of `min..=max` elements, a shape shared by every COSE
/// message and by the CWT wrapper's inner COSE message.
fn validate_message_arity(tag: u64, content: Item, min: usize, max: usize) -> Result<Item> {
    match &content {
        Item::Array(items) if items.len() >= min && items.len() <= max => {
            Ok(Item::Tag(tag, Box::new(content)))
        }
        _ => Err(CborError::TagProcessorFailed(tag)),
    }
}

fn cose_message_handler(min: usize, max: usize) -> TagHandler {
    Arc::new(move |tag, content| validate_message_arity(tag, content, min, max))
}

fn cwt_handler() -> TagHandler {
    // RFC 8392 wants a tagged COSE message inside; ISO/IEC 18013-5 frequently omits the inner
    // tag. Accept either: an `Item::Tag` already naming a COSE message tag, or a bare array that
    // looks like one.
    Arc::new(|tag, content| match &content {
        Item::Tag(inner_tag, _)
            if matches!(
                *inner_tag,
                well_known::COSE_SIGN
                    | well_known::COSE_SIGN1
                    | well_known::COSE_ENCRYPT
                    | well_known::COSE_ENCRYPT0
                    | well_known::COSE_MAC
                    | well_known::COSE_MAC0
            ) =>
        {
            Ok(Item::Tag(tag, Box::new(content)))
        }
        Item::Array(items) if items.len() == 3 || items.len() == 4 => {
            Ok(Item::Tag(tag, Box::new(content)))
        }
        _ => Err(CborError::TagProcessorFailed(tag)),
    })
}

fn uri_handler() -> TagHandler {
    Arc::new(|tag, content| match &content {
        Item::Text(s) if s.contains(':') => Ok(Item::Tag(tag, Box::new(content))),
        _ => Err(CborError::TagProcessorFailed(tag)),
    })
}

fn default_table() -> TagRegistry {
    let mut reg = TagRegistry::empty();
    reg.register(well_known::POSITIVE_BIGNUM, bignum_handler(false));
    reg.register(well_known::NEGATIVE_BIGNUM, bignum_handler(true));
    reg.register(well_known::EMBEDDED_CBOR, embedded_cbor_handler());
    reg.register(well_known::COSE_SIGN, cose_message_handler(4, 4));
    reg.register(well_known::COSE_SIGN1, cose_message_handler(4, 4));
    reg.register(well_known::COSE_ENCRYPT, cose_message_handler(3, 4));
    reg.register(well_known::COSE_ENCRYPT0, cose_message_handler(3, 4));
    reg.register(well_known::COSE_MAC, cose_message_handler(4, 4));
    reg.register(well_known::COSE_MAC0, cose_message_handler(4, 4));
    reg.register(well_known::CWT, cwt_handler());
    reg.register(well_known::URI, uri_handler());
    reg
}

static GLOBAL: OnceLock<RwLock<TagRegistry>> = OnceLock::new();

fn global() -> &'static RwLock<TagRegistry> {
    GLOBAL.get_or_init(|| RwLock::new(default_table()))
}

/// A read-only snapshot of the process-wide default registry, used as the starting point for a
/// per-decoder [`crate::cbor::decode::DecodeOptions`] override.
pub fn default_registry() -> TagRegistry {
    global().read().expect("tag registry poisoned").clone()
}

/// Register a handler in the process-wide default registry. Per §5, additional registrations
/// during operation are permitted but must be externally serialized by the caller - this
/// function takes the write lock for the duration of the copy-on-register swap and no longer.
pub fn register_global(tag: u64, handler: TagHandler) {
    let mut guard = global().write().expect("tag registry poisoned");
    guard.register(tag, handler);
}

// A tiny decode-options shim used only by the embedded-CBOR tag handler above, which needs to
// recursively decode without creating a circular import on the full `DecodeOptions` (which itself
// embeds a `TagRegistry` it gets from this module). See `crate::cbor::decode::decode_all`.
pub(crate) struct DecodeOptionsLite {
    pub(crate) strict_canonical: bool,
}

impl Default for DecodeOptionsLite {
    fn default() -> Self {
        DecodeOptionsLite {
            strict_canonical: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_tag_wraps_as_plain_tag() {
        let reg = default_registry();
        let item = reg.dispatch(1000, Item::UInt32(1)).unwrap();
        assert_eq!(item, Item::Tag(1000, Box::new(Item::UInt32(1))));
    }

    #[test]
    fn positive_bignum_handler_builds_ubig() {
        let reg = default_registry();
        let content = Item::Bytes(Bstr::new(vec![
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]));
        let item = reg
            .dispatch(well_known::POSITIVE_BIGNUM, content)
            .unwrap();
        match item {
            Item::UBig(v) => assert_eq!(v.to_string(), "18446744073709551616"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn suppress_restores_identity_wrapping() {
        let mut reg = default_registry();
        reg.suppress(well_known::POSITIVE_BIGNUM);
        let content = Item::Bytes(Bstr::new(vec![0x01]));
        let item = reg
            .dispatch(well_known::POSITIVE_BIGNUM, content.clone())
            .unwrap();
        assert_eq!(item, Item::Tag(well_known::POSITIVE_BIGNUM, Box::new(content)));
    }
}
