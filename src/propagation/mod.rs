//! B3 Trace Context Propagation
//!
//! Extracts trace context from inbound carriers (HTTP headers, messaging
//! metadata) and injects it into outbound ones using Zipkin's multi-header
//! B3 convention.
//!
//! ## Headers
//!
//! | Key | Direction | Meaning |
//! |-----|-----------|---------|
//! | `X-B3-TraceId` | read/write | 64 or 128-bit trace id, hex |
//! | `X-B3-SpanId` | read/write | span id, hex |
//! | `X-B3-ParentSpanId` | ignored | recognised for compatibility only |
//! | `X-B3-Sampled` | read/write | `1`/`true` means sampled |
//! | `X-B3-Flags` | read | `1` forces sampling (debug) |
//! | `baggage-*` | read/write | baggage items, prefix configurable |
//!
//! Keys are matched case-insensitively on read and written verbatim.
//!
//! ## Usage
//!
//! ```
//! use b3_propagation::propagation::{B3Propagator, Id128, TraceContext};
//!
//! let propagator = B3Propagator::default();
//!
//! let carrier = vec![
//!     ("x-b3-traceid".to_string(), "1234567890abcdef1".to_string()),
//!     ("x-b3-spanid".to_string(), "abc".to_string()),
//!     ("x-b3-sampled".to_string(), "1".to_string()),
//! ];
//!
//! let context = propagator.extract(&carrier).unwrap();
//! assert_eq!(context.trace_id, Id128::new(0x1, 0x234567890abcdef1));
//! assert!(context.sampled);
//!
//! let mut outbound: Vec<(String, String)> = Vec::new();
//! propagator.inject(&context, &mut outbound);
//! assert_eq!(outbound[0], ("X-B3-TraceId".to_string(), "1234567890abcdef1".to_string()));
//! ```

use thiserror::Error;

pub mod b3;
pub mod carrier;
pub mod context;
pub mod id;

pub use b3::B3Propagator;
pub use carrier::Carrier;
pub use context::TraceContext;
pub use id::{from_hex, to_hex, Id128};

/// Trace id key
pub const TRACE_ID_HEADER: &str = "X-B3-TraceId";
/// Span id key
pub const SPAN_ID_HEADER: &str = "X-B3-SpanId";
/// Parent span id key. Recognised on read, never consulted.
pub const PARENT_SPAN_ID_HEADER: &str = "X-B3-ParentSpanId";
/// Sampling decision key
pub const SAMPLED_HEADER: &str = "X-B3-Sampled";
/// Debug flags key
pub const FLAGS_HEADER: &str = "X-B3-Flags";
/// Default baggage key prefix
pub const DEFAULT_BAGGAGE_PREFIX: &str = "baggage-";

/// Errors that can occur while decoding propagated context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropagationError {
    #[error("Malformed identifier: {value:?} is not an unsigned hex number")]
    MalformedIdentifier { value: String },
}
