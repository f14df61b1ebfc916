//! Authenticated resource calls and the typed helpers built on top of them.

// crates.io
use oauth2::AsyncHttpClient;
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	client::LmsTokenClient,
	http::LmsHttpClient,
	model::{CourseDetail, CourseGradesPage, CoursesPage, GradebookPage, RawToken, UserAccount},
	oauth::{self, CallTarget, TransportErrorMapper},
	obs::{self, CallKind, CallOutcome, CallSpan},
	resource::ResourcePath,
};

impl<C, M> LmsTokenClient<C, M>
where
	C: LmsHttpClient,
	M: TransportErrorMapper<C::TransportError>,
{
	/// Issues an authenticated `GET` for `path` and returns the parsed JSON body.
	///
	/// `path` is relative to the resource base URL with parameters already substituted; a
	/// missing leading `/` is added.
	/// Non-success statuses fail with
	/// [`UpstreamApiError::Status`](crate::error::UpstreamApiError::Status); nothing is retried.
	pub async fn call_resource(&self, path: &str) -> Result<Value> {
		self.fetch(ResourcePath::custom(path)).await
	}

	/// Same as [`call_resource`](Self::call_resource) but decodes the body into `T`.
	pub async fn call_resource_as<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.fetch(ResourcePath::custom(path)).await
	}

	/// Lists the course catalog.
	pub async fn courses(&self) -> Result<CoursesPage> {
		self.fetch(ResourcePath::courses()).await
	}

	/// Fetches courseware metadata for a course.
	pub async fn course_details(&self, course_id: &str) -> Result<CourseDetail> {
		self.fetch(ResourcePath::course_details(course_id)).await
	}

	/// Fetches the first gradebook page of a course.
	pub async fn course_gradebook(&self, course_id: &str) -> Result<GradebookPage> {
		self.fetch(ResourcePath::course_gradebook(course_id)).await
	}

	/// Fetches the first course grade summary page of a course.
	pub async fn course_grades(&self, course_id: &str) -> Result<CourseGradesPage> {
		self.fetch(ResourcePath::course_grades(course_id)).await
	}

	/// Looks up user accounts registered under `email`.
	pub async fn users_by_email(&self, email: &str) -> Result<Vec<UserAccount>> {
		self.fetch(ResourcePath::users_by_email(email)).await
	}

	/// Returns the current access token in the shape exposed to internal tooling.
	pub async fn raw_token(&self) -> Result<RawToken> {
		let token = self.get_access_token().await?;

		Ok(RawToken { access_token: token.into_inner() })
	}

	async fn fetch<T>(&self, path: ResourcePath) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.get_json(path.kind().as_str(), path.as_str()).await
	}

	async fn get_json<T>(&self, stage: &'static str, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		const KIND: CallKind = CallKind::Resource;

		let span = CallSpan::new(KIND, stage);

		span.record_path(path);
		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let credentials = self.settings.credentials()?;
				let url = credentials.resource_url(path)?;
				let token = self.get_access_token().await?;
				let request = oauth::resource_request(&url, &token)?;
				let handle = self.http_client.handle();
				let response = handle.call(request).await.map_err(|err| {
					self.transport_mapper.map_transport_error(CallTarget::Resource(path), err)
				})?;

				oauth::read_resource_response(path, response)
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
}
