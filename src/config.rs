//! Client settings loaded from the environment and the validated credentials derived from them.
//!
//! [`LmsSettings`] tolerates missing values so a process can start without LMS access;
//! [`LmsSettings::credentials`] performs validation on first use and reports the
//! first missing setting as [`ConfigError::MissingSetting`].

// std
use std::time::Duration as StdDuration;
// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Environment variable holding the OAuth client identifier.
pub const ENV_CLIENT_ID: &str = "OPEN_EDX_CLIENT_ID";
/// Environment variable holding the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "OPEN_EDX_CLIENT_SECRET";
/// Environment variable holding the LMS base URL (identity and, by default, resources).
pub const ENV_LMS_URL: &str = "OPEN_EDX_LMS_URL";
/// Environment variable overriding the resource base URL.
pub const ENV_RESOURCE_URL: &str = "OPEN_EDX_RESOURCE_URL";
/// Environment variable overriding the per-request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "OPEN_EDX_TIMEOUT_SECS";

/// Default per-request timeout applied to identity and resource calls.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

const TOKEN_PATH: &str = "/oauth2/access_token";

/// Raw client settings; any field may be absent until first use.
#[derive(Clone)]
pub struct LmsSettings {
	/// OAuth 2.0 client identifier.
	pub client_id: Option<String>,
	/// OAuth 2.0 client secret.
	pub client_secret: Option<TokenSecret>,
	/// LMS base URL hosting `/oauth2/access_token`.
	pub lms_url: Option<String>,
	/// Resource base URL; falls back to [`LmsSettings::lms_url`].
	pub resource_url: Option<String>,
	/// Timeout applied to every outbound request.
	pub timeout: StdDuration,
}
impl LmsSettings {
	/// Loads settings from the process environment.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads settings through an arbitrary lookup function keyed by environment variable name.
	///
	/// Empty values are treated as absent. Only a malformed timeout fails eagerly.
	pub fn from_lookup<F>(mut lookup: F) -> Result<Self>
	where
		F: FnMut(&str) -> Option<String>,
	{
		let mut get =
			|name: &str| lookup(name).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
		let timeout = match get(ENV_TIMEOUT_SECS) {
			Some(raw) => match raw.parse::<u64>() {
				Ok(secs) if secs > 0 => StdDuration::from_secs(secs),
				_ =>
					return Err(
						ConfigError::InvalidSetting { name: ENV_TIMEOUT_SECS, value: raw }.into()
					),
			},
			None => DEFAULT_TIMEOUT,
		};

		Ok(Self {
			client_id: get(ENV_CLIENT_ID),
			client_secret: get(ENV_CLIENT_SECRET).map(TokenSecret::new),
			lms_url: get(ENV_LMS_URL),
			resource_url: get(ENV_RESOURCE_URL),
			timeout,
		})
	}

	/// Sets the client identifier.
	pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Sets the LMS base URL.
	pub fn with_lms_url(mut self, url: impl Into<String>) -> Self {
		self.lms_url = Some(url.into());

		self
	}

	/// Sets a resource base URL distinct from the LMS base URL.
	pub fn with_resource_url(mut self, url: impl Into<String>) -> Self {
		self.resource_url = Some(url.into());

		self
	}

	/// Overrides the request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Validates the settings into immutable [`ClientCredentials`].
	pub fn credentials(&self) -> Result<ClientCredentials> {
		let client_id = present(self.client_id.as_deref(), ENV_CLIENT_ID)?;
		let client_secret =
			present(self.client_secret.as_ref().map(TokenSecret::expose), ENV_CLIENT_SECRET)?;
		let lms_url = present(self.lms_url.as_deref(), ENV_LMS_URL)?;
		let identity_base_url = parse_base_url(lms_url)?;
		let resource_url = self.resource_url.as_deref().map(str::trim).filter(|v| !v.is_empty());
		let resource_base_url = match resource_url {
			Some(url) => parse_base_url(url)?,
			None => identity_base_url.clone(),
		};

		Ok(ClientCredentials {
			client_id: client_id.to_owned(),
			client_secret: TokenSecret::new(client_secret),
			identity_base_url,
			resource_base_url,
		})
	}
}
impl Default for LmsSettings {
	fn default() -> Self {
		Self {
			client_id: None,
			client_secret: None,
			lms_url: None,
			resource_url: None,
			timeout: DEFAULT_TIMEOUT,
		}
	}
}
impl Debug for LmsSettings {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LmsSettings")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("lms_url", &self.lms_url)
			.field("resource_url", &self.resource_url)
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Validated, immutable credentials used for every identity and resource call.
#[derive(Clone)]
pub struct ClientCredentials {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: TokenSecret,
	/// Base URL of the identity provider.
	pub identity_base_url: Url,
	/// Base URL of the resource endpoints.
	pub resource_base_url: Url,
}
impl ClientCredentials {
	/// `Authorization` header value for the client-credentials grant.
	pub fn basic_authorization(&self) -> String {
		let credential = format!("{}:{}", self.client_id, self.client_secret.expose());

		format!("Basic {}", STANDARD.encode(credential))
	}

	/// Absolute URL of the token endpoint.
	pub fn token_endpoint(&self) -> Result<Url> {
		join(&self.identity_base_url, TOKEN_PATH)
	}

	/// Absolute URL of a resource path; a missing leading `/` is added.
	pub fn resource_url(&self, path: &str) -> Result<Url> {
		if path.starts_with('/') {
			join(&self.resource_base_url, path)
		} else {
			join(&self.resource_base_url, &format!("/{path}"))
		}
	}
}
impl Debug for ClientCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("identity_base_url", &self.identity_base_url.as_str())
			.field("resource_base_url", &self.resource_base_url.as_str())
			.finish()
	}
}

fn present<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str> {
	value
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.ok_or_else(|| ConfigError::MissingSetting { name }.into())
}

fn parse_base_url(raw: &str) -> Result<Url> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { url: raw.to_owned(), source }.into())
}

// Concatenates instead of `Url::join` so base paths such as `https://host/lms` are kept.
fn join(base: &Url, path: &str) -> Result<Url> {
	let raw = format!("{}{path}", base.as_str().trim_end_matches('/'));

	Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { url: raw, source }.into())
}
