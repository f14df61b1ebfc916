//! Client-level error types shared by token acquisition and resource calls.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant renders a full sentence so embedding REST layers can forward
/// [`Display`] output as the body of a 5xx response.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; raised before any network I/O.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Identity endpoint failure while acquiring an access token.
	#[error(transparent)]
	UpstreamAuth(#[from] UpstreamAuthError),
	/// Resource endpoint failure.
	#[error(transparent)]
	UpstreamApi(#[from] UpstreamApiError),
}
impl Error {
	/// Returns the upstream HTTP status carried by the error, when one was received.
	pub fn upstream_status(&self) -> Option<u16> {
		match self {
			Self::UpstreamAuth(UpstreamAuthError::Rejected { status, .. })
			| Self::UpstreamApi(UpstreamApiError::Status { status, .. }) => Some(*status),
			Self::UpstreamAuth(UpstreamAuthError::MalformedResponse { status, .. }) =>
				Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required setting is absent or empty.
	#[error("{name} must be configured.")]
	MissingSetting {
		/// Environment variable name of the setting.
		name: &'static str,
	},
	/// A setting is present but cannot be interpreted.
	#[error("{name} has an invalid value `{value}`.")]
	InvalidSetting {
		/// Environment variable name of the setting.
		name: &'static str,
		/// Raw value that failed validation.
		value: String,
	},
	/// A base URL or a URL derived from it cannot be parsed.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error("HTTP request could not be constructed.")]
	HttpRequest(#[from] oauth2::http::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while talking to the identity endpoint.
#[derive(Debug, ThisError)]
pub enum UpstreamAuthError {
	/// Identity endpoint answered with a non-success status.
	#[error("Failed to fetch Open edX token (HTTP {status}): {body}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Response body text.
		body: String,
	},
	/// Identity endpoint answered successfully but without an access token.
	#[error("No access token received from the identity endpoint.")]
	MissingAccessToken,
	/// Identity endpoint answered with a body that is not the expected JSON document.
	#[error("Identity endpoint returned malformed JSON at `{}`.", source.path())]
	MalformedResponse {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Transport failure (DNS, TCP, TLS).
	#[error("Network error occurred while calling the identity endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the configured timeout.
	#[error("Request timed out while calling the identity endpoint.")]
	Timeout,
}

/// Failures raised while calling LMS resource endpoints.
#[derive(Debug, ThisError)]
pub enum UpstreamApiError {
	/// Resource endpoint answered with a non-success status.
	#[error("Open edX API error on `{path}` (HTTP {status}): {body}.")]
	Status {
		/// Requested resource path.
		path: String,
		/// HTTP status code.
		status: u16,
		/// Response body text.
		body: String,
	},
	/// Resource endpoint answered with a body that does not match the expected shape.
	#[error("Open edX API returned malformed JSON on `{path}` at `{}`.", source.path())]
	MalformedResponse {
		/// Requested resource path.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Transport failure (DNS, TCP, TLS).
	#[error("Network error occurred while calling `{path}`.")]
	Network {
		/// Requested resource path.
		path: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the configured timeout.
	#[error("Request timed out while calling `{path}`.")]
	Timeout {
		/// Requested resource path.
		path: String,
	},
}
