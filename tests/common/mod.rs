//! Fixtures shared by the httpmock-backed integration tests.

#![allow(dead_code)]

// std
use std::time::Duration as StdDuration;
// crates.io
use httpmock::{Mock, prelude::*};
// self
use lms_token_client::{
	client::ReqwestLmsClient, config::LmsSettings, http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper, reqwest::Client,
};

pub const CLIENT_ID: &str = "reports";
pub const CLIENT_SECRET: &str = "top-secret";
/// `Basic base64("reports:top-secret")`.
pub const BASIC_AUTHORIZATION: &str = "Basic cmVwb3J0czp0b3Atc2VjcmV0";
pub const TOKEN_PATH: &str = "/oauth2/access_token";
pub const TOKEN_FORM: &str = "grant_type=client_credentials&token_type=jwt";

/// Settings pointing both identity and resource calls at the mock server.
pub fn settings(server: &MockServer) -> LmsSettings {
	LmsSettings::default()
		.with_client_id(CLIENT_ID)
		.with_client_secret(CLIENT_SECRET)
		.with_lms_url(server.base_url())
		.with_timeout(StdDuration::from_secs(5))
}

/// Builds a reqwest transport that honors `timeout` and accepts the self-signed certificates
/// served by `httpmock`.
pub fn test_reqwest_http_client(timeout: StdDuration) -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.timeout(timeout)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Builds a reqwest-backed client for `settings` that trusts the mock server.
pub fn build_client(settings: LmsSettings) -> ReqwestLmsClient {
	let http_client = test_reqwest_http_client(settings.timeout);

	ReqwestLmsClient::with_http_client(settings, http_client, ReqwestTransportErrorMapper)
}

/// Registers an identity mock that only answers the Open edX client-credentials form.
pub async fn mock_token<'a>(server: &'a MockServer, status: u16, body: &str) -> Mock<'a> {
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("authorization", BASIC_AUTHORIZATION)
				.header("cache-control", "no-cache")
				.header("content-type", "application/x-www-form-urlencoded")
				.body(TOKEN_FORM);
			then.status(status).header("content-type", "application/json").body(body);
		})
		.await
}
