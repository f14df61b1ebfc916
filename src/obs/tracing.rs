// self
use crate::{_prelude::*, obs::CallKind};

/// Future returned by [`CallSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`CallSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// `lms_token_client.call` span wrapping one client operation.
///
/// The `path` field starts empty and is filled in by resource calls once the path is known.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens a span for `kind` at the given call site.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"lms_token_client.call",
				call = kind.as_str(),
				stage,
				path = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Records the resource path on the span.
	pub fn record_path(&self, path: &str) {
		#[cfg(feature = "tracing")]
		self.span.record("path", path);
		#[cfg(not(feature = "tracing"))]
		let _ = path;
	}

	/// Attaches the span to `fut` so it is entered on every poll, never across an `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

pub(crate) fn debug_event(message: &'static str) {
	#[cfg(feature = "tracing")]
	tracing::debug!("{message}");
	#[cfg(not(feature = "tracing"))]
	let _ = message;
}

/// Logs a failed call with its display text and upstream status; tokens never reach the log.
pub(crate) fn warn_error(error: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(error = %error, status = ?error.upstream_status(), "LMS call failed.");
	#[cfg(not(feature = "tracing"))]
	let _ = error;
}
