mod common;

// std
use std::time::Duration as StdDuration;
// crates.io
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
// self
use common::*;
use lms_token_client::{
	auth::TokenSecret,
	config::LmsSettings,
	error::{ConfigError, Error, Result, UpstreamAuthError},
};

#[tokio::test]
async fn cached_token_is_reused_without_identity_calls() {
	let server = MockServer::start_async().await;
	let mock = mock_token(&server, 200, "{\"access_token\":\"abc\",\"expires_in\":3600}").await;
	let client = build_client(settings(&server));
	let first = client.get_access_token().await.expect("Initial acquisition should succeed.");
	let second = client.get_access_token().await.expect("Cached token should be served.");
	let third = client.clone().get_access_token().await.expect("Clones should share the cache.");

	assert_eq!(first.expose(), "abc");
	assert_eq!(second.expose(), "abc");
	assert_eq!(third.expose(), "abc");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn expiry_subtracts_the_safety_buffer() {
	let server = MockServer::start_async().await;
	let mock = mock_token(&server, 200, "{\"access_token\":\"abc\",\"expires_in\":3600}").await;
	let client = build_client(settings(&server));
	let now = OffsetDateTime::now_utc();

	client.access_token_at(now).await.expect("Acquisition should succeed.");

	let cached = client.cached_token().expect("Token should be cached.");

	assert_eq!(cached.expires_at, now + Duration::seconds(3570));

	mock.assert_async().await;
}

#[tokio::test]
async fn expired_token_triggers_one_reacquisition() {
	let server = MockServer::start_async().await;
	let mut first_mock =
		mock_token(&server, 200, "{\"access_token\":\"abc\",\"expires_in\":100}").await;
	let client = build_client(settings(&server));
	let t0 = OffsetDateTime::now_utc();

	client.access_token_at(t0).await.expect("Initial acquisition should succeed.");
	first_mock.assert_async().await;
	first_mock.delete_async().await;

	let second_mock =
		mock_token(&server, 200, "{\"access_token\":\"def\",\"expires_in\":100}").await;
	let reused = client
		.access_token_at(t0 + Duration::seconds(50))
		.await
		.expect("Token should still be valid at t=50.");

	assert_eq!(reused.expose(), "abc");

	second_mock.assert_calls_async(0).await;

	let refreshed = client
		.access_token_at(t0 + Duration::seconds(71))
		.await
		.expect("Token should be refreshed at t=71.");

	assert_eq!(refreshed.expose(), "def");

	second_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn empty_identity_response_caches_nothing() {
	let server = MockServer::start_async().await;
	let mock = mock_token(&server, 200, "{}").await;
	let client = build_client(settings(&server));
	let err = client.get_access_token().await.expect_err("Missing access_token should fail.");

	assert!(matches!(err, Error::UpstreamAuth(UpstreamAuthError::MissingAccessToken)));
	assert!(client.cached_token().is_none());

	mock.assert_async().await;
}

#[tokio::test]
async fn rejected_credentials_surface_status_and_body() {
	let server = MockServer::start_async().await;
	let mock = mock_token(&server, 401, "{\"error\":\"invalid_client\"}").await;
	let client = build_client(settings(&server));
	let err = client.get_access_token().await.expect_err("Rejected credentials should fail.");

	match &err {
		Error::UpstreamAuth(UpstreamAuthError::Rejected { status, body }) => {
			assert_eq!(*status, 401);
			assert_eq!(body, "{\"error\":\"invalid_client\"}");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
	assert_eq!(
		err.to_string(),
		"Failed to fetch Open edX token (HTTP 401): {\"error\":\"invalid_client\"}."
	);
	assert!(client.cached_token().is_none());

	mock.assert_async().await;
}

#[tokio::test]
async fn concurrent_callers_share_one_acquisition() {
	let server = MockServer::start_async().await;
	let mock = mock_token(&server, 200, "{\"access_token\":\"shared\",\"expires_in\":900}").await;
	let client = build_client(settings(&server));
	let (first, second, third): (Result<TokenSecret>, Result<TokenSecret>, Result<TokenSecret>) =
		tokio::join!(
			client.get_access_token(),
			client.get_access_token(),
			client.get_access_token(),
		);

	for token in [first, second, third] {
		assert_eq!(token.expect("Concurrent call should succeed.").expose(), "shared");
	}

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn queued_callers_share_an_uncacheable_token() {
	let server = MockServer::start_async().await;
	let mock = mock_token(&server, 200, "{\"access_token\":\"brief\",\"expires_in\":30}").await;
	let client = build_client(settings(&server));
	let (first, second, third): (Result<TokenSecret>, Result<TokenSecret>, Result<TokenSecret>) =
		tokio::join!(
			client.get_access_token(),
			client.get_access_token(),
			client.get_access_token(),
		);

	for token in [first, second, third] {
		assert_eq!(token.expect("Concurrent call should succeed.").expose(), "brief");
	}

	assert!(client.cached_token().is_none());

	mock.assert_calls_async(1).await;

	client.get_access_token().await.expect("A later call should reacquire.");

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn missing_secret_fails_without_network_io() {
	let server = MockServer::start_async().await;
	let mock = mock_token(&server, 200, "{\"access_token\":\"abc\",\"expires_in\":3600}").await;
	let settings =
		LmsSettings::default().with_client_id(CLIENT_ID).with_lms_url(server.base_url());
	let client = build_client(settings);
	let err = client.get_access_token().await.expect_err("Missing secret should fail.");

	assert!(matches!(
		err,
		Error::Config(ConfigError::MissingSetting { name: "OPEN_EDX_CLIENT_SECRET" })
	));

	let err = client
		.call_resource("/api/courses/v1/courses/")
		.await
		.expect_err("Resource calls should fail the same way.");

	assert!(matches!(err, Error::Config(ConfigError::MissingSetting { .. })));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn slow_identity_endpoint_times_out() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"late\",\"expires_in\":3600}")
				.delay(StdDuration::from_secs(2));
		})
		.await;
	let client = build_client(settings(&server).with_timeout(StdDuration::from_millis(200)));
	let err = client.get_access_token().await.expect_err("Slow identity call should time out.");

	assert!(matches!(err, Error::UpstreamAuth(UpstreamAuthError::Timeout)));
	assert!(client.cached_token().is_none());
}

#[tokio::test]
async fn unreachable_identity_endpoint_is_a_network_error() {
	let settings = LmsSettings::default()
		.with_client_id(CLIENT_ID)
		.with_client_secret(CLIENT_SECRET)
		.with_lms_url("http://127.0.0.1:9")
		.with_timeout(StdDuration::from_secs(2));
	let client = build_client(settings);
	let err = client.get_access_token().await.expect_err("Closed port should fail.");

	assert!(matches!(
		err,
		Error::UpstreamAuth(UpstreamAuthError::Network { .. } | UpstreamAuthError::Timeout)
	));
	assert_eq!(err.upstream_status(), None);
}
