//! Acquires a client-credentials JWT from a mocked LMS, lists the course catalog, and shows that
//! a second resource call reuses the cached token.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use lms_token_client::{
	client::ReqwestLmsClient, config::LmsSettings, http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper, reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth2/access_token")
				.body("grant_type=client_credentials&token_type=jwt");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-jwt\",\"token_type\":\"JWT\",\"expires_in\":3600}");
		})
		.await;
	let catalog_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/courses/v1/courses/")
				.header("authorization", "JWT demo-jwt");
			then.status(200).header("content-type", "application/json").body(
				r#"{
					"results": [{
						"id": "course-v1:edX+DemoX+2024",
						"course_id": "course-v1:edX+DemoX+2024",
						"name": "Demo Course",
						"number": "DemoX",
						"org": "edX"
					}],
					"pagination": {"next": null, "previous": null, "count": 1, "num_pages": 1}
				}"#,
			);
		})
		.await;
	let settings = LmsSettings::default()
		.with_client_id("reports")
		.with_client_secret("demo-secret")
		.with_lms_url(server.base_url());
	// The mock server presents a self-signed certificate.
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.timeout(settings.timeout)
			.build()?,
	);
	let client =
		ReqwestLmsClient::with_http_client(settings, http_client, ReqwestTransportErrorMapper);
	let catalog = client.courses().await?;

	for course in &catalog.results {
		println!("{} ({}): {}.", course.id, course.org, course.name);
	}

	let raw = client.call_resource("/api/courses/v1/courses/").await?;

	println!("Catalog reports {} course(s).", raw["pagination"]["count"]);

	token_mock.assert_calls_async(1).await;
	catalog_mock.assert_calls_async(2).await;

	Ok(())
}
