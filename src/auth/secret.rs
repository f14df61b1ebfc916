//! Redacting wrapper for the client secret and the JWTs issued by the LMS.

// self
use crate::_prelude::*;

const REDACTED: &str = "<redacted>";

/// Client secret or access token; formatters never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a sensitive string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Consumes the wrapper and returns the raw value.
	pub fn into_inner(self) -> String {
		self.0
	}

	/// `Authorization` header value for LMS resource calls, which use the `JWT` scheme.
	pub fn jwt_authorization(&self) -> String {
		format!("JWT {}", self.0)
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TokenSecret({REDACTED})")
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(REDACTED)
	}
}
