/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! Diagnostic notation (RFC 8949 §8, with the RFC 8610 Appendix G extensions `<<…>>` and
//! `h'…'`): a one-way tree walk from an [`Item`] to its human-readable text form. No parser is
//! provided in the other direction - only rendering.

use crate::cbor::item::Item;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Maps a content-hint tag number (RFC 8949 §3.4.5) to the prefix used when rendering its
/// byte-string content, e.g. tag 22 → `b64'...'`.
#[derive(Clone, Default)]
pub struct PrefixRegistry {
    prefixes: HashMap<u64, &'static str>,
}

impl PrefixRegistry {
    pub fn empty() -> Self {
        PrefixRegistry {
            prefixes: HashMap::new(),
        }
    }

    /// The default set: tag 22, expected conversion to base64 (RFC 8949 §3.4.5.2).
    pub fn with_defaults() -> Self {
        let mut reg = Self::empty();
        reg.register(22, "b64");
        reg.register(21, "b64url");
        reg.register(23, "b16");
        reg
    }

    pub fn register(&mut self, tag: u64, prefix: &'static str) {
        self.prefixes.insert(tag, prefix);
    }

    pub fn get(&self, tag: u64) -> Option<&'static str> {
        self.prefixes.get(&tag).copied()
    }
}

fn render_hex(buf: &mut String, bytes: &[u8]) {
    for b in bytes {
        let _ = write!(buf, "{:02x}", b);
    }
}

fn render_quoted_text(buf: &mut String, s: &str) {
    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            _ => buf.push(c),
        }
    }
    buf.push('"');
}

/// Render `item` as RFC 8949 §8 diagnostic notation.
pub fn render(item: &Item, prefixes: &PrefixRegistry) -> String {
    let mut out = String::new();
    render_into(item, prefixes, &mut out);
    out
}

fn render_into(item: &Item, prefixes: &PrefixRegistry, out: &mut String) {
    match item {
        Item::UInt32(v) => {
            let _ = write!(out, "{}", v);
        }
        Item::UInt64(v) => {
            let _ = write!(out, "{}", v);
        }
        Item::UBig(v) => {
            let _ = write!(out, "{}", v);
        }
        Item::NInt32(v) => {
            let _ = write!(out, "{}", v);
        }
        Item::NInt64(v) => {
            let _ = write!(out, "{}", v);
        }
        Item::NBig(v) => {
            let _ = write!(out, "-{}", v);
        }
        Item::Bytes(b) => match &b.inner {
            Some(items) => {
                out.push_str("<<");
                for (i, inner) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    render_into(inner, prefixes, out);
                }
                out.push_str(">>");
            }
            None => {
                out.push_str("h'");
                render_hex(out, &b.bytes);
                out.push('\'');
            }
        },
        Item::Text(s) => render_quoted_text(out, s),
        Item::Array(items) => {
            out.push('[');
            for (i, it) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_into(it, prefixes, out);
            }
            out.push(']');
        }
        Item::Map(pairs) => {
            out.push('{');
            for (i, pair) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_into(&pair.key, prefixes, out);
                if let Some(c) = &pair.key_comment {
                    let _ = write!(out, " / {} /", c);
                }
                out.push_str(": ");
                render_into(&pair.value, prefixes, out);
                if let Some(c) = &pair.value_comment {
                    let _ = write!(out, " / {} /", c);
                }
            }
            out.push('}');
        }
        Item::Tag(tag, content) => {
            if let (Some(prefix), Item::Bytes(b)) = (prefixes.get(*tag), content.as_ref()) {
                let _ = write!(out, "{}'", prefix);
                render_hex(out, &b.bytes);
                out.push('\'');
            } else {
                let _ = write!(out, "{}(", tag);
                render_into(content, prefixes, out);
                out.push(')');
            }
        }
        Item::Simple(v) => {
            let _ = write!(out, "simple({})", v);
        }
        Item::Bool(true) => out.push_str("true"),
        Item::Bool(false) => out.push_str("false"),
        Item::Null => out.push_str("null"),
        Item::Undefined => out.push_str("undefined"),
        Item::Float32(v) => {
            let _ = write!(out, "{}", v);
        }
        Item::Float64(v) => {
            let _ = write!(out, "{}", v);
        }
    }
}
