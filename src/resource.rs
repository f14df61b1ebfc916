//! Catalog of Open edX resource endpoints consumed by the reporting backend.

// self
use crate::_prelude::*;

/// Known resource endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
	/// Course catalog listing.
	Courses,
	/// Courseware metadata for a single course.
	CourseDetails,
	/// Per-learner gradebook with section breakdowns.
	CourseGradebook,
	/// Per-learner course grade summary.
	CourseGrades,
	/// User account lookup by email address.
	UsersByEmail,
	/// Caller-constructed path.
	Custom,
}
impl ResourceKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Courses => "courses",
			Self::CourseDetails => "course_details",
			Self::CourseGradebook => "course_gradebook",
			Self::CourseGrades => "course_grades",
			Self::UsersByEmail => "users_by_email",
			Self::Custom => "custom",
		}
	}

	/// Path template as documented by the LMS, with `{placeholders}` for parameters.
	pub const fn template(self) -> &'static str {
		match self {
			Self::Courses => "/api/courses/v1/courses/",
			Self::CourseDetails => "/api/courseware/course/{course_id}",
			Self::CourseGradebook => "/api/grades/v1/gradebook/{course_id}/",
			Self::CourseGrades => "/api/grades/v1/courses/{course_id}/",
			Self::UsersByEmail => "/api/user/v1/accounts?email={email}",
			Self::Custom => "{path}",
		}
	}
}
impl Display for ResourceKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Resource path relative to the resource base URL, parameters already substituted.
///
/// Course identifiers are inserted verbatim (`course-v1:Org+Num+Run` is valid in a path
/// segment); email addresses are form-encoded because they travel in the query string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourcePath {
	kind: ResourceKind,
	path: String,
}
impl ResourcePath {
	/// Wraps a caller-constructed path, adding a leading `/` when missing.
	pub fn custom(path: impl Into<String>) -> Self {
		let path = path.into();
		let path = if path.starts_with('/') { path } else { format!("/{path}") };

		Self { kind: ResourceKind::Custom, path }
	}

	/// `/api/courses/v1/courses/`.
	pub fn courses() -> Self {
		Self { kind: ResourceKind::Courses, path: ResourceKind::Courses.template().to_owned() }
	}

	/// `/api/courseware/course/{course_id}`.
	pub fn course_details(course_id: &str) -> Self {
		Self::with_course(ResourceKind::CourseDetails, course_id)
	}

	/// `/api/grades/v1/gradebook/{course_id}/`.
	pub fn course_gradebook(course_id: &str) -> Self {
		Self::with_course(ResourceKind::CourseGradebook, course_id)
	}

	/// `/api/grades/v1/courses/{course_id}/`.
	pub fn course_grades(course_id: &str) -> Self {
		Self::with_course(ResourceKind::CourseGrades, course_id)
	}

	/// `/api/user/v1/accounts?email={email}`.
	pub fn users_by_email(email: &str) -> Self {
		let encoded = url::form_urlencoded::byte_serialize(email.as_bytes()).collect::<String>();
		let path = ResourceKind::UsersByEmail.template().replace("{email}", &encoded);

		Self { kind: ResourceKind::UsersByEmail, path }
	}

	/// Endpoint this path targets.
	pub fn kind(&self) -> ResourceKind {
		self.kind
	}

	/// Path string passed to the transport.
	pub fn as_str(&self) -> &str {
		&self.path
	}

	fn with_course(kind: ResourceKind, course_id: &str) -> Self {
		Self { kind, path: kind.template().replace("{course_id}", course_id) }
	}
}
impl AsRef<str> for ResourcePath {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}
impl Display for ResourcePath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.path)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn course_paths_substitute_identifier() {
		let id = "course-v1:edX+DemoX+Demo_Course";

		assert_eq!(ResourcePath::courses().as_str(), "/api/courses/v1/courses/");
		assert_eq!(
			ResourcePath::course_details(id).as_str(),
			"/api/courseware/course/course-v1:edX+DemoX+Demo_Course"
		);
		assert_eq!(
			ResourcePath::course_gradebook(id).as_str(),
			"/api/grades/v1/gradebook/course-v1:edX+DemoX+Demo_Course/"
		);
		assert_eq!(
			ResourcePath::course_grades(id).as_str(),
			"/api/grades/v1/courses/course-v1:edX+DemoX+Demo_Course/"
		);
		assert_eq!(ResourcePath::course_grades(id).kind(), ResourceKind::CourseGrades);
	}

	#[test]
	fn email_is_form_encoded() {
		let path = ResourcePath::users_by_email("jane+reports@example.com");

		assert_eq!(path.as_str(), "/api/user/v1/accounts?email=jane%2Breports%40example.com");
	}

	#[test]
	fn custom_paths_gain_leading_slash() {
		assert_eq!(ResourcePath::custom("api/x").as_str(), "/api/x");
		assert_eq!(ResourcePath::custom("/api/x").as_str(), "/api/x");
		assert_eq!(ResourcePath::custom("/api/x").kind().as_str(), "custom");
	}
}
