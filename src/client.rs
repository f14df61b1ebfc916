//! Process-wide Open edX client owning the token cache and the HTTP transport.

mod resource;
mod token;

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, DEFAULT_EXPIRY_BUFFER, TokenSecret},
	config::LmsSettings,
	http::LmsHttpClient,
	oauth::TransportErrorMapper,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestLmsClient = LmsTokenClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Acquires, caches, and applies Open edX access tokens.
///
/// Construct one instance in the composition root and share it (by reference or by cloning,
/// which is cheap and shares the cache) with every request handler. The cached token is the
/// only mutable state; reads take a short read lock and refreshes are serialized by an async
/// guard so concurrent callers on a cold or expired cache share a single identity call.
pub struct LmsTokenClient<C, M>
where
	C: LmsHttpClient,
	M: TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	settings: Arc<LmsSettings>,
	expiry_buffer: Duration,
	cache: Arc<RwLock<Option<CachedToken>>>,
	last_flight: Arc<RwLock<Flight>>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl<C, M> LmsTokenClient<C, M>
where
	C: LmsHttpClient,
	M: TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	///
	/// Settings are not validated here; missing values surface as
	/// [`ConfigError::MissingSetting`](crate::error::ConfigError::MissingSetting) on first use.
	pub fn with_http_client(
		settings: LmsSettings,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			settings: Arc::new(settings),
			expiry_buffer: DEFAULT_EXPIRY_BUFFER,
			cache: Default::default(),
			last_flight: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Overrides the safety margin subtracted from upstream lifetimes (defaults to 30 seconds).
	pub fn with_expiry_buffer(mut self, buffer: Duration) -> Self {
		self.expiry_buffer = if buffer.is_negative() { Duration::ZERO } else { buffer };

		self
	}

	/// Settings the client was built with.
	pub fn settings(&self) -> &LmsSettings {
		&self.settings
	}

	/// Safety margin subtracted from upstream lifetimes.
	pub fn expiry_buffer(&self) -> Duration {
		self.expiry_buffer
	}

	/// Snapshot of the cached token, expired or not.
	pub fn cached_token(&self) -> Option<CachedToken> {
		self.cache.read().clone()
	}

	/// Drops the cached token so the next call reacquires one.
	pub fn clear_cached_token(&self) {
		self.cache.write().take();
		self.last_flight.write().token.take();
	}
}
#[cfg(feature = "reqwest")]
impl LmsTokenClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by reqwest with the timeout from `settings`.
	pub fn new(settings: LmsSettings) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_timeout(settings.timeout)?;

		Ok(Self::with_http_client(settings, http_client, ReqwestTransportErrorMapper))
	}

	/// Creates a reqwest-backed client from `OPEN_EDX_*` environment variables.
	pub fn from_env() -> Result<Self> {
		Self::new(LmsSettings::from_env()?)
	}
}
impl<C, M> Clone for LmsTokenClient<C, M>
where
	C: LmsHttpClient,
	M: TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			transport_mapper: Arc::clone(&self.transport_mapper),
			settings: Arc::clone(&self.settings),
			expiry_buffer: self.expiry_buffer,
			cache: Arc::clone(&self.cache),
			last_flight: Arc::clone(&self.last_flight),
			refresh_guard: Arc::clone(&self.refresh_guard),
		}
	}
}
impl<C, M> Debug for LmsTokenClient<C, M>
where
	C: LmsHttpClient,
	M: TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LmsTokenClient")
			.field("settings", &self.settings)
			.field("expiry_buffer", &self.expiry_buffer)
			.field("cached_token", &*self.cache.read())
			.finish()
	}
}

// Outcome of the most recent successful acquisition, handed to callers that queued behind it.
// `token` is only kept when the cache could not hold it (lifetime within the expiry buffer).
#[derive(Default)]
struct Flight {
	epoch: u64,
	token: Option<TokenSecret>,
}
