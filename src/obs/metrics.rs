// self
use crate::{
	_prelude::*,
	obs::{CallKind, CallOutcome},
};

#[cfg(feature = "metrics")] const CALL_TOTAL: &str = "lms_token_client_call_total";
#[cfg(feature = "metrics")] const TOKEN_TTL_SECONDS: &str = "lms_token_client_token_ttl_seconds";

/// Increments `lms_token_client_call_total{call, outcome}` (when enabled).
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(CALL_TOTAL, "call" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Sets `lms_token_client_token_ttl_seconds` to the buffered lifetime of a freshly cached
/// token; zero means the last token was served without being cached.
pub fn record_token_ttl(ttl: Duration) {
	#[cfg(feature = "metrics")]
	metrics::gauge!(TOKEN_TTL_SECONDS).set(ttl.as_seconds_f64().max(0.));
	#[cfg(not(feature = "metrics"))]
	let _ = ttl;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_safe_without_an_installed_backend() {
		for outcome in [CallOutcome::Attempt, CallOutcome::CacheHit, CallOutcome::Failure] {
			record_call_outcome(CallKind::Token, outcome);
		}

		record_token_ttl(Duration::seconds(3570));
		record_token_ttl(Duration::ZERO);
	}
}
