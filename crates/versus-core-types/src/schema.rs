//! Canonical schema constants for structured logging and events
//!
//! The logging macros emit these keys as bare identifiers; the constants
//! are what readers of the events (test capture, log queries) match on.

// Boundary fields, present on every event from the logging macros
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Comparison context
pub const FIELD_COMPARISON_ID: &str = "comparison_id";
pub const FIELD_MATERIALIZE: &str = "materialize";

// Artifact lifecycle
pub const FIELD_ARTIFACT: &str = "artifact";
pub const FIELD_ARTIFACT_KIND: &str = "artifact_kind";
pub const FIELD_ARTIFACT_COUNT: &str = "artifact_count";
pub const FIELD_DROPPED: &str = "dropped";

// Error fields; side and column only when the error names one
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_SIDE: &str = "err_side";
pub const FIELD_ERR_COLUMN: &str = "err_column";

// Operation boundary events
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Artifact events
pub const EVENT_ARTIFACT_RECORDED: &str = "artifact_recorded";
pub const EVENT_ARTIFACT_DROPPED: &str = "artifact_dropped";
pub const EVENT_ARTIFACT_DROP_FAILED: &str = "artifact_drop_failed";
