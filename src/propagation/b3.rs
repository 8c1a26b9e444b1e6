//! B3 multi-header propagator

use super::carrier::Carrier;
use super::context::TraceContext;
use super::id::{from_hex, to_hex, Id128};
use super::{
    PropagationError, FLAGS_HEADER, PARENT_SPAN_ID_HEADER, SAMPLED_HEADER, SPAN_ID_HEADER,
    TRACE_ID_HEADER,
};
use crate::config::{BaggageKeyLayout, PropagatorConfig};
use std::collections::HashMap;

/// Extracts and injects [`TraceContext`] using B3 carrier keys
///
/// Immutable after construction and holds no per-context state, so a single
/// instance can be shared freely across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct B3Propagator {
    baggage_prefix: String,
    baggage_layout: BaggageKeyLayout,
}

impl B3Propagator {
    /// Create a propagator from its configuration
    pub fn new(config: PropagatorConfig) -> Self {
        Self {
            baggage_prefix: config.baggage_prefix,
            baggage_layout: config.baggage_layout,
        }
    }

    /// Prefix identifying baggage keys in a carrier
    pub fn baggage_prefix(&self) -> &str {
        &self.baggage_prefix
    }

    /// How injected baggage keys are built
    pub fn baggage_layout(&self) -> BaggageKeyLayout {
        self.baggage_layout
    }

    /// Fixed carrier keys written by [`inject`](Self::inject)
    pub fn fields(&self) -> [&'static str; 3] {
        [TRACE_ID_HEADER, SPAN_ID_HEADER, SAMPLED_HEADER]
    }

    /// Extract trace context from a carrier
    ///
    /// # Returns
    ///
    /// * `Some(TraceContext)` if both trace and span id were found
    /// * `None` if either is missing, or either holds a malformed identifier
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use b3_propagation::propagation::B3Propagator;
    ///
    /// let mut headers = HashMap::new();
    /// headers.insert("X-B3-TraceId".to_string(), "463ac35c9f6413ad".to_string());
    /// headers.insert("X-B3-SpanId".to_string(), "a2fb4a1d1a96d312".to_string());
    /// headers.insert("X-B3-Flags".to_string(), "1".to_string());
    ///
    /// let context = B3Propagator::default().extract(&headers).unwrap();
    /// assert!(context.sampled);
    /// ```
    pub fn extract<C: Carrier + ?Sized>(&self, carrier: &C) -> Option<TraceContext> {
        // Malformed ids are logged with their key by try_extract
        self.try_extract(carrier).unwrap_or(None)
    }

    /// Extract trace context, reporting malformed identifiers
    ///
    /// # Returns
    ///
    /// * `Ok(Some(TraceContext))` if both trace and span id were found
    /// * `Ok(None)` if either is missing
    /// * `Err(PropagationError::MalformedIdentifier)` if a trace or span id
    ///   value is not hex
    pub fn try_extract<C: Carrier + ?Sized>(
        &self,
        carrier: &C,
    ) -> Result<Option<TraceContext>, PropagationError> {
        let mut trace_id: Option<Id128> = None;
        let mut span_id: Option<Id128> = None;
        let mut sampled = false;
        let mut baggage = HashMap::new();
        let fold_case = carrier.folds_key_case();

        for (key, value) in carrier.entries() {
            if key.eq_ignore_ascii_case(SAMPLED_HEADER) {
                // Anything else leaves the flag alone so X-B3-Flags can still set it
                if value == "1" || value.eq_ignore_ascii_case("true") {
                    sampled = true;
                }
            } else if key.eq_ignore_ascii_case(TRACE_ID_HEADER) {
                trace_id = Some(decode_id(key, value)?);
            } else if key.eq_ignore_ascii_case(SPAN_ID_HEADER) {
                span_id = Some(decode_id(key, value)?);
            } else if key.eq_ignore_ascii_case(FLAGS_HEADER) {
                if value == "1" {
                    sampled = true;
                }
            } else if key.eq_ignore_ascii_case(PARENT_SPAN_ID_HEADER) {
                continue;
            } else if let Some(name) = self.strip_baggage_prefix(key, fold_case) {
                baggage.insert(name.to_string(), value.to_string());
            }
        }

        let context = match (trace_id, span_id) {
            (Some(trace_id), Some(span_id)) => Some(TraceContext {
                trace_id,
                span_id,
                sampled,
                baggage,
            }),
            _ => None,
        };

        tracing::trace!(found = context.is_some(), "B3 extraction finished");
        Ok(context)
    }

    /// Inject trace context into a carrier
    ///
    /// Writes trace id, span id, the sampled flag (always, `"1"` or `"0"`)
    /// and one entry per baggage item. Existing carrier entries are left in
    /// place.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use b3_propagation::propagation::{B3Propagator, Id128, TraceContext};
    ///
    /// let context = TraceContext::new(Id128::new(0, 0xabc), Id128::new(0, 0xdef), false)
    ///     .with_baggage_item("user", "alice");
    ///
    /// let mut headers: HashMap<String, String> = HashMap::new();
    /// B3Propagator::default().inject(&context, &mut headers);
    ///
    /// assert_eq!(headers["X-B3-TraceId"], "abc");
    /// assert_eq!(headers["X-B3-Sampled"], "0");
    /// assert_eq!(headers["baggage-user"], "alice");
    /// ```
    pub fn inject<C: Carrier + ?Sized>(&self, context: &TraceContext, carrier: &mut C) {
        carrier.put(TRACE_ID_HEADER, to_hex(context.trace_id));
        carrier.put(SPAN_ID_HEADER, to_hex(context.span_id));
        carrier.put(
            SAMPLED_HEADER,
            if context.sampled { "1" } else { "0" }.to_string(),
        );

        for (key, value) in context.baggage_items() {
            carrier.put(&self.baggage_key(key), value.to_string());
        }
    }

    fn strip_baggage_prefix<'k>(&self, key: &'k str, ignore_case: bool) -> Option<&'k str> {
        if !ignore_case {
            return key.strip_prefix(self.baggage_prefix.as_str());
        }
        let len = self.baggage_prefix.len();
        let head = key.get(..len)?;
        if head.eq_ignore_ascii_case(&self.baggage_prefix) {
            key.get(len..)
        } else {
            None
        }
    }

    fn baggage_key(&self, key: &str) -> String {
        match self.baggage_layout {
            BaggageKeyLayout::Prefix => format!("{}{}", self.baggage_prefix, key),
            BaggageKeyLayout::LegacySuffix => format!("{}{}", key, self.baggage_prefix),
        }
    }
}

fn decode_id(key: &str, value: &str) -> Result<Id128, PropagationError> {
    from_hex(value).inspect_err(|e| {
        tracing::debug!(key, error = %e, "Discarding malformed B3 trace context");
    })
}

impl Default for B3Propagator {
    fn default() -> Self {
        Self::new(PropagatorConfig::default())
    }
}
