//! Variant definitions and destination key layout
//!
//! The set of variants is fixed. Each variant writes to
//! `{name}/{basename(source_key)}` in the destination bucket, so the
//! directory part of the source key is dropped and two sources sharing a
//! basename land on the same key (last write wins).

use crate::constants::{MEDIUM_MAX_EDGE, THUMB_MAX_EDGE};

/// A named bounding box that a variant must fit within
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSpec {
    pub name: &'static str,
    pub max_width: u32,
    pub max_height: u32,
}

pub const THUMB: VariantSpec = VariantSpec {
    name: "thumb",
    max_width: THUMB_MAX_EDGE,
    max_height: THUMB_MAX_EDGE,
};

pub const MEDIUM: VariantSpec = VariantSpec {
    name: "medium",
    max_width: MEDIUM_MAX_EDGE,
    max_height: MEDIUM_MAX_EDGE,
};

/// Every variant produced for a source image, in upload order
pub const VARIANTS: [VariantSpec; 2] = [THUMB, MEDIUM];

impl VariantSpec {
    /// Destination key for this variant of `source_key`
    pub fn output_key(&self, source_key: &str) -> String {
        format!("{}/{}", self.name, basename(source_key))
    }

    /// True when `key` lives under this variant's prefix
    pub fn owns_key(&self, key: &str) -> bool {
        key.strip_prefix(self.name)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Final path segment of an object key
///
/// A key ending in `/` has an empty basename.
pub fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// True when `key` is itself the output of some variant
pub fn is_variant_key(key: &str) -> bool {
    VARIANTS.iter().any(|variant| variant.owns_key(key))
}
