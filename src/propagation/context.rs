//! Propagated trace context

use super::id::Id128;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trace context carried across process boundaries
///
/// Both identifiers are always present; a carrier holding only one of them
/// never yields a `TraceContext`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// Trace ID shared by every span in the trace
    pub trace_id: Id128,
    /// Span ID of the sending span
    pub span_id: Id128,
    /// Whether the trace is recorded downstream
    pub sampled: bool,
    /// Baggage items, empty when none were propagated
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub baggage: HashMap<String, String>,
}

impl TraceContext {
    /// Create a context without baggage
    pub fn new(trace_id: Id128, span_id: Id128, sampled: bool) -> Self {
        Self {
            trace_id,
            span_id,
            sampled,
            baggage: HashMap::new(),
        }
    }

    /// Add a baggage item, replacing any previous value for `key`
    pub fn with_baggage_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.baggage.insert(key.into(), value.into());
        self
    }

    /// Look up a baggage item
    pub fn baggage_item(&self, key: &str) -> Option<&str> {
        self.baggage.get(key).map(String::as_str)
    }

    /// Iterate baggage items in no particular order
    pub fn baggage_items(&self) -> impl Iterator<Item = (&str, &str)> {
        self.baggage.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set the sampling decision
    pub fn set_sampled(&mut self, sampled: bool) {
        self.sampled = sampled;
    }
}

#[cfg(feature = "otel")]
impl From<&TraceContext> for opentelemetry::trace::SpanContext {
    /// Remote OpenTelemetry span context. Span ids are 64-bit there, so only
    /// the low half of the B3 span id survives.
    fn from(context: &TraceContext) -> Self {
        use opentelemetry::trace::{SpanId, TraceFlags, TraceId, TraceState};

        let flags = if context.sampled {
            TraceFlags::SAMPLED
        } else {
            TraceFlags::default()
        };

        opentelemetry::trace::SpanContext::new(
            TraceId::from_bytes(context.trace_id.as_u128().to_be_bytes()),
            SpanId::from_bytes(context.span_id.low().to_be_bytes()),
            flags,
            true,
            TraceState::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baggage_items() {
        let context = TraceContext::new(Id128::new(0, 1), Id128::new(0, 2), false)
            .with_baggage_item("user", "alice")
            .with_baggage_item("tenant", "acme")
            .with_baggage_item("user", "bob");

        assert_eq!(context.baggage_item("user"), Some("bob"));
        assert_eq!(context.baggage_item("tenant"), Some("acme"));
        assert_eq!(context.baggage_item("missing"), None);
        assert_eq!(context.baggage_items().count(), 2);
    }

    #[test]
    fn test_set_sampled() {
        let mut context = TraceContext::new(Id128::new(0, 1), Id128::new(0, 2), false);
        assert!(!context.sampled);

        context.set_sampled(true);
        assert!(context.sampled);
    }

    #[cfg(feature = "otel")]
    #[test]
    fn test_into_otel_span_context() {
        use opentelemetry::trace::SpanContext;

        let context = TraceContext::new(
            Id128::new(0x0af7651916cd43dd, 0x8448eb211c80319c),
            Id128::new(0, 0xb7ad6b7169203331),
            true,
        );
        let otel = SpanContext::from(&context);

        assert_eq!(otel.trace_id().to_string(), "0af7651916cd43dd8448eb211c80319c");
        assert_eq!(otel.span_id().to_string(), "b7ad6b7169203331");
        assert!(otel.is_sampled());
        assert!(otel.is_remote());
    }
}
