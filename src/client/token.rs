//! Access token lookup with lazy expiry and single-flight refresh.

// crates.io
use oauth2::AsyncHttpClient;
// self
use crate::{
	_prelude::*,
	auth::{self, CachedToken, TokenSecret},
	client::LmsTokenClient,
	config::ClientCredentials,
	http::LmsHttpClient,
	oauth::{self, CallTarget, TransportErrorMapper},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

impl<C, M> LmsTokenClient<C, M>
where
	C: LmsHttpClient,
	M: TransportErrorMapper<C::TransportError>,
{
	/// Returns a currently valid access token, acquiring one when the cache is empty or stale.
	pub async fn get_access_token(&self) -> Result<TokenSecret> {
		self.access_token_at(OffsetDateTime::now_utc()).await
	}

	/// Same as [`get_access_token`](Self::get_access_token) with an explicit instant that is
	/// treated as "now" for the freshness check and for computing the new expiry.
	pub async fn access_token_at(&self, now: OffsetDateTime) -> Result<TokenSecret> {
		const KIND: CallKind = CallKind::Token;

		let span = CallSpan::new(KIND, "access_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				if let Some(token) = self.cached_at(now) {
					return Ok(token);
				}

				let epoch = self.last_flight.read().epoch;
				let _singleflight = self.refresh_guard.lock().await;

				// Another caller may have refreshed while this one waited on the guard.
				if let Some(token) = self.cached_at(now) {
					return Ok(token);
				}
				if let Some(token) = self.joined_flight(epoch) {
					return Ok(token);
				}

				let credentials = self.settings.credentials()?;

				self.acquire(&credentials, now).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(e) => {
				obs::warn_error(e);
				obs::record_call_outcome(KIND, CallOutcome::Failure);
			},
		}

		result
	}

	fn cached_at(&self, now: OffsetDateTime) -> Option<TokenSecret> {
		let cache = self.cache.read();

		if !auth::is_valid(cache.as_ref(), now) {
			return None;
		}

		obs::record_call_outcome(CallKind::Token, CallOutcome::CacheHit);
		obs::debug_event("Serving cached access token.");

		cache.as_ref().map(|token| token.value.clone())
	}

	fn joined_flight(&self, epoch: u64) -> Option<TokenSecret> {
		let flight = self.last_flight.read();

		if flight.epoch == epoch {
			return None;
		}

		obs::debug_event("Sharing an uncached token acquired while waiting.");

		flight.token.clone()
	}

	async fn acquire(
		&self,
		credentials: &ClientCredentials,
		now: OffsetDateTime,
	) -> Result<TokenSecret> {
		let request = oauth::token_request(credentials)?;
		let handle = self.http_client.handle();
		let response = handle.call(request).await.map_err(|err| {
			self.transport_mapper.map_transport_error(CallTarget::Identity, err)
		})?;
		let (token, expires_in) = oauth::read_token_response(response)?;
		let cached = CachedToken::from_lifetime(token.clone(), now, expires_in, self.expiry_buffer);

		match &cached {
			Some(entry) => {
				obs::record_token_ttl(entry.remaining_at(now));
				obs::debug_event("Acquired and cached a new access token.");
			},
			None => {
				obs::record_token_ttl(Duration::ZERO);
				obs::debug_event("Token lifetime does not exceed the expiry buffer; not caching.");
			},
		}

		{
			let mut flight = self.last_flight.write();

			flight.epoch = flight.epoch.wrapping_add(1);
			flight.token = cached.is_none().then(|| token.clone());
		}

		*self.cache.write() = cached;

		Ok(token)
	}
}
