//! Optional observability helpers for token and resource calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `lms_token_client.call` with the `call`
//!   (token or resource) and `stage` (call site) fields, plus events for cache hits and refreshes.
//! - Enable `metrics` to count every attempt, cache hit, success and failure in
//!   `lms_token_client_call_total` (labels `call` and `outcome`) and to publish the buffered
//!   lifetime of the cached token as the `lms_token_client_token_ttl_seconds` gauge.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Call kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Access token lookup or acquisition.
	Token,
	/// Authenticated resource request.
	Resource,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Token => "token",
			CallKind::Resource => "resource",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Token served from the in-memory cache without contacting the identity endpoint.
	CacheHit,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::CacheHit => "cache_hit",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
