//! Cached access token, expiry policy, and identity response decoding.
//!
//! Expiry is evaluated lazily: nothing marks a token as expired, readers compare the
//! stored `expires_at` against their own notion of "now" via [`is_valid`].

// self
// crates.io
use time::PrimitiveDateTime;
// self
use crate::{_prelude::*, auth::TokenSecret, error::UpstreamAuthError};

/// Lifetime assumed when the identity endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN: Duration = Duration::seconds(3600);
/// Safety margin subtracted from the upstream-declared lifetime.
pub const DEFAULT_EXPIRY_BUFFER: Duration = Duration::seconds(30);

/// Access token held in process memory together with its buffered expiry instant.
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
	/// Bearer token value; callers must avoid logging it.
	pub value: TokenSecret,
	/// First instant at which the token must no longer be served.
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Builds a cache entry for a token acquired at `acquired_at`.
	///
	/// Returns `None` when `expires_in - buffer` is not strictly positive, in which case the
	/// token is usable once but must not be cached. Expiry instants beyond the representable
	/// range are clamped to the latest one.
	pub fn from_lifetime(
		value: TokenSecret,
		acquired_at: OffsetDateTime,
		expires_in: Duration,
		buffer: Duration,
	) -> Option<Self> {
		let lifetime = expires_in.saturating_sub(buffer);

		if !lifetime.is_positive() {
			return None;
		}

		let expires_at = acquired_at
			.checked_add(lifetime)
			.unwrap_or_else(|| PrimitiveDateTime::MAX.assume_offset(acquired_at.offset()));

		Some(Self { value, expires_at })
	}

	/// Returns `true` if the token may still be served at the provided instant.
	pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at
	}

	/// Time left before the token stops being served, clamped at zero.
	pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - now;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("value", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Returns `true` when `cache` holds a token that may be served at `now`.
pub fn is_valid(cache: Option<&CachedToken>, now: OffsetDateTime) -> bool {
	cache.is_some_and(|token| token.is_valid_at(now))
}

/// JSON document returned by `/oauth2/access_token`.
///
/// Both fields are optional at the wire level so a missing token surfaces as
/// [`UpstreamAuthError::MissingAccessToken`] rather than a parse failure.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	expires_in: Option<i64>,
}
impl TokenResponse {
	pub(crate) fn parse(
		body: &[u8],
	) -> std::result::Result<Self, serde_path_to_error::Error<serde_json::Error>> {
		let mut de = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut de)
	}

	/// Splits the response into the token and its declared lifetime.
	pub(crate) fn into_parts(
		self,
	) -> std::result::Result<(TokenSecret, Duration), UpstreamAuthError> {
		let access_token = self
			.access_token
			.filter(|value| !value.is_empty())
			.ok_or(UpstreamAuthError::MissingAccessToken)?;
		let expires_in = self.expires_in.map(Duration::seconds).unwrap_or(DEFAULT_EXPIRES_IN);

		Ok((TokenSecret::new(access_token), expires_in))
	}
}
