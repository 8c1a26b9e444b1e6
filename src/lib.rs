//! B3 Propagation Library
//!
//! Zipkin B3 multi-header trace context propagation.
//!
//! # Features
//!
//! - **Lossless 128-bit ids**: 64 and 128-bit hex identifiers split into
//!   high/low halves and re-encoded without padding
//! - **Case-insensitive keys**: `x-b3-traceid` and `X-B3-TraceId` are equivalent
//! - **Debug flag**: `X-B3-Flags: 1` forces sampling
//! - **Baggage**: prefixed carrier keys, prefix configurable
//! - **Carriers**: `Vec` multimaps, `HashMap`, `BTreeMap` and `hyper` headers
//!
//! # Example
//!
//! ```
//! use b3_propagation::config::PropagatorConfig;
//! use b3_propagation::propagation::B3Propagator;
//! use std::collections::HashMap;
//!
//! let propagator = B3Propagator::new(PropagatorConfig::default());
//!
//! let mut inbound = HashMap::new();
//! inbound.insert("X-B3-TraceId".to_string(), "0af7651916cd43dd8448eb211c80319c".to_string());
//! inbound.insert("X-B3-SpanId".to_string(), "b7ad6b7169203331".to_string());
//! inbound.insert("baggage-user".to_string(), "alice".to_string());
//!
//! let context = propagator.extract(&inbound).unwrap();
//!
//! let mut outbound: HashMap<String, String> = HashMap::new();
//! propagator.inject(&context, &mut outbound);
//! assert_eq!(outbound["X-B3-TraceId"], "af7651916cd43dd8448eb211c80319c");
//! assert_eq!(outbound["baggage-user"], "alice");
//! ```

pub mod config;
pub mod logging;
pub mod propagation;

// Re-export commonly used types
pub use config::{Config, PropagatorConfig};
pub use propagation::{B3Propagator, Id128, PropagationError, TraceContext};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
