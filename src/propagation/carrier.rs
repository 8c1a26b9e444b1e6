//! Carrier abstraction
//!
//! A carrier is the flat key/value transport that propagation keys travel in:
//! HTTP headers, messaging metadata, or a plain map. The propagator only reads
//! every entry once on extraction and appends on injection; it assumes no
//! ordering, key uniqueness, or case normalization.

use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::{BTreeMap, HashMap};

/// Key/value transport for propagated context
pub trait Carrier {
    /// Every entry in the carrier, in the carrier's own order
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>;

    /// Write an entry
    ///
    /// Multimap carriers append; map carriers replace an existing value.
    fn put(&mut self, key: &str, value: String);

    /// Whether the carrier folds key case on write
    ///
    /// When true, the baggage prefix is matched case-insensitively on read.
    fn folds_key_case(&self) -> bool {
        false
    }
}

/// Ordered multimap, duplicates allowed
impl Carrier for Vec<(String, String)> {
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    fn put(&mut self, key: &str, value: String) {
        self.push((key.to_string(), value));
    }
}

impl Carrier for HashMap<String, String> {
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    fn put(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }
}

impl Carrier for BTreeMap<String, String> {
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    fn put(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }
}

/// HTTP headers
///
/// `HeaderMap` lowercases header names. B3 keys and the baggage prefix are
/// matched case-insensitively, but baggage item names come back lowercased:
/// `baggage-UserId` is extracted as `userid`. Values that are not visible
/// ASCII are skipped on read.
impl Carrier for HeaderMap {
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(
            self.iter()
                .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?))),
        )
    }

    fn put(&mut self, key: &str, value: String) {
        let name = match HeaderName::from_bytes(key.as_bytes()) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(key, error = %e, "Skipping carrier entry with invalid header name");
                return;
            }
        };
        let value = match HeaderValue::from_str(&value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Skipping carrier entry with invalid header value");
                return;
            }
        };
        self.append(name, value);
    }

    fn folds_key_case(&self) -> bool {
        true
    }
}
