//! Wire-level request construction and response classification for the LMS.
//!
//! Identity calls follow the Open edX client-credentials dialect: HTTP Basic client
//! authentication, `token_type=jwt` in the form body, and a `JWT` authorization scheme on
//! resource calls instead of `Bearer`.

pub use oauth2;

// crates.io
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE},
	},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{TokenResponse, TokenSecret},
	config::ClientCredentials,
	error::{ConfigError, UpstreamApiError, UpstreamAuthError},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Upstream endpoint a request was addressed to; drives error classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallTarget<'a> {
	/// `/oauth2/access_token` on the identity base URL.
	Identity,
	/// A resource path on the resource base URL.
	Resource(&'a str),
}
impl CallTarget<'_> {
	/// Error for a request that exceeded its timeout.
	pub fn timeout(self) -> Error {
		match self {
			Self::Identity => UpstreamAuthError::Timeout.into(),
			Self::Resource(path) => UpstreamApiError::Timeout { path: path.to_owned() }.into(),
		}
	}

	/// Error for a network-level failure (DNS, TCP, TLS, I/O).
	pub fn network(self, src: impl 'static + Send + Sync + StdError) -> Error {
		match self {
			Self::Identity => UpstreamAuthError::Network { source: Box::new(src) }.into(),
			Self::Resource(path) =>
				UpstreamApiError::Network { path: path.to_owned(), source: Box::new(src) }.into(),
		}
	}

	fn other(self, message: String) -> Error {
		self.network(std::io::Error::other(message))
	}
}

/// Maps HTTP transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a client error.
	fn map_transport_error(&self, target: CallTarget<'_>, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		target: CallTarget<'_>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(target, *inner),
			err => map_generic_transport_error(target, err),
		}
	}
}

/// Fallback classification shared by every mapper for the non-transport-specific variants.
pub fn map_generic_transport_error<E>(target: CallTarget<'_>, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => target.network(*inner),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) if inner.kind() == std::io::ErrorKind::TimedOut =>
			target.timeout(),
		HttpClientError::Io(inner) => target.network(inner),
		HttpClientError::Other(message) => target.other(message),
		other => target.other(other.to_string()),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(target: CallTarget<'_>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return target.timeout();
	}

	target.network(err)
}

/// Builds the client-credentials token request.
pub(crate) fn token_request(credentials: &ClientCredentials) -> Result<HttpRequest> {
	let endpoint = credentials.token_endpoint()?;
	let body = url::form_urlencoded::Serializer::new(String::new())
		.append_pair("grant_type", "client_credentials")
		.append_pair("token_type", "jwt")
		.finish();
	let request = Request::builder()
		.method(Method::POST)
		.uri(endpoint.as_str())
		.header(AUTHORIZATION, credentials.basic_authorization())
		.header(CACHE_CONTROL, "no-cache")
		.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.body(body.into_bytes())
		.map_err(ConfigError::from)?;

	Ok(request)
}

/// Builds an authenticated `GET` for a resource URL.
pub(crate) fn resource_request(url: &Url, token: &TokenSecret) -> Result<HttpRequest> {
	let request = Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.header(AUTHORIZATION, token.jwt_authorization())
		.body(Vec::new())
		.map_err(ConfigError::from)?;

	Ok(request)
}

/// Classifies an identity endpoint response into a token and its declared lifetime.
pub(crate) fn read_token_response(response: HttpResponse) -> Result<(TokenSecret, Duration)> {
	let status = response.status();

	if !status.is_success() {
		return Err(UpstreamAuthError::Rejected {
			status: status.as_u16(),
			body: body_text(response.body()),
		}
		.into());
	}

	let parsed = TokenResponse::parse(response.body()).map_err(|source| {
		UpstreamAuthError::MalformedResponse { status: status.as_u16(), source }
	})?;

	Ok(parsed.into_parts()?)
}

/// Classifies a resource response and decodes its JSON body into `T`.
pub(crate) fn read_resource_response<T>(path: &str, response: HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = response.status();

	if !status.is_success() {
		return Err(UpstreamApiError::Status {
			path: path.to_owned(),
			status: status.as_u16(),
			body: body_text(response.body()),
		}
		.into());
	}

	let mut de = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut de).map_err(|source| {
		UpstreamApiError::MalformedResponse { path: path.to_owned(), source }.into()
	})
}

fn body_text(body: &[u8]) -> String {
	String::from_utf8_lossy(body).trim().to_owned()
}
