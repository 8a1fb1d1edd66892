//! Metric name constants and recording helpers

use std::time::Instant;

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Histogram, Meter};

/// Instrumentation scope for every toolchat instrument
pub const METER_NAME: &str = "toolchat";

// Tool metric names
pub const TOOL_CALL_COUNT: &str = "tool.call.count";
pub const TOOL_CALL_DURATION: &str = "tool.call.duration";

// Completion metric names
pub const CHAT_COMPLETION_COUNT: &str = "chat.completion.count";
pub const CHAT_COMPLETION_DURATION: &str = "chat.completion.duration";

// Attribute keys
pub const ATTR_TOOL: &str = "tool";
pub const ATTR_OUTCOME: &str = "outcome";

/// Meter from the global provider
///
/// A no-op meter until [`crate::init`] installs an exporting provider.
pub fn meter() -> Meter {
    opentelemetry::global::meter(METER_NAME)
}

/// Record the time elapsed since `start`, in seconds
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}
