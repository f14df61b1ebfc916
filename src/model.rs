//! Serde models for the LMS payloads the reporting backend consumes.
//!
//! Only the fields the dashboards read are typed; everything else the LMS sends lands in
//! each model's `extra` map so re-serializing a model loses nothing.

// std
use std::collections::BTreeMap as Map;
// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Unmodeled upstream fields, preserved verbatim.
pub type Extra = Map<String, Value>;

/// Cursor-paginated list used by the grades APIs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
	/// URL of the next page, if any.
	pub next: Option<String>,
	/// URL of the previous page, if any.
	pub previous: Option<String>,
	/// Items on this page.
	pub results: Vec<T>,
}

/// Response of `/api/grades/v1/gradebook/{course_id}/`.
pub type GradebookPage = Page<GradebookEntry>;
/// Response of `/api/grades/v1/courses/{course_id}/`.
pub type CourseGradesPage = Page<CourseGrade>;

/// Response of `/api/courses/v1/courses/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoursesPage {
	/// Courses on this page.
	pub results: Vec<Course>,
	/// Page-number pagination block.
	pub pagination: Pagination,
}

/// Page-number pagination block of the course catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
	/// URL of the next page, if any.
	pub next: Option<String>,
	/// URL of the previous page, if any.
	pub previous: Option<String>,
	/// Total number of courses.
	pub count: u64,
	/// Total number of pages.
	pub num_pages: u64,
}

/// Course catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
	/// Course key, e.g. `course-v1:Org+Num+Run`.
	pub id: String,
	/// Course key (duplicated by the LMS).
	pub course_id: String,
	/// Display name.
	pub name: String,
	/// Course number.
	pub number: String,
	/// Owning organization.
	pub org: String,
	/// Short marketing description.
	pub short_description: Option<String>,
	/// Start date (ISO 8601).
	pub start: Option<String>,
	/// End date (ISO 8601).
	pub end: Option<String>,
	/// Enrollment opening date (ISO 8601).
	pub enrollment_start: Option<String>,
	/// Enrollment closing date (ISO 8601).
	pub enrollment_end: Option<String>,
	/// `self` or `instructor`.
	pub pacing: Option<String>,
	/// Hidden from the public catalog.
	#[serde(default)]
	pub hidden: bool,
	/// Enrollment requires an invitation.
	#[serde(default)]
	pub invitation_only: bool,
	/// Available in the mobile apps.
	#[serde(default)]
	pub mobile_available: bool,
	/// Remaining upstream fields (media, blocks_url, effort, ...).
	#[serde(flatten)]
	pub extra: Extra,
}

/// Response of `/api/courseware/course/{course_id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseDetail {
	/// Course key.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Short marketing description.
	pub short_description: Option<String>,
	/// Start date (ISO 8601).
	pub start: Option<String>,
	/// End date (ISO 8601).
	pub end: Option<String>,
	/// Content language code.
	pub language: Option<String>,
	/// Content license identifier.
	pub license: Option<String>,
	/// Pacing mode.
	pub pacing: Option<String>,
	/// Enrollment of the requesting (service) user.
	pub enrollment: Option<Enrollment>,
	/// Identity verification status of the requesting user.
	pub verification_status: Option<String>,
	/// Whether the requesting user currently passes.
	#[serde(default)]
	pub user_has_passing_grade: bool,
	/// Remaining upstream fields (celebrations, media, notes, ...).
	#[serde(flatten)]
	pub extra: Extra,
}

/// Enrollment block embedded in [`CourseDetail`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
	/// Enrollment mode (`audit`, `verified`, ...).
	pub mode: Option<String>,
	/// Whether the enrollment is active.
	#[serde(default)]
	pub is_active: bool,
}

/// One learner row of the gradebook.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradebookEntry {
	/// LMS user identifier.
	pub user_id: u64,
	/// LMS username.
	pub username: String,
	/// Email address.
	pub email: String,
	/// Overall grade in `0.0..=1.0`.
	pub percent: f64,
	/// Per-subsection scores.
	#[serde(default)]
	pub section_breakdown: Vec<SectionBreakdown>,
	/// Remaining upstream fields.
	#[serde(flatten)]
	pub extra: Extra,
}

/// Per-subsection score inside a [`GradebookEntry`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionBreakdown {
	/// Whether the learner attempted the subsection.
	#[serde(default)]
	pub attempted: bool,
	/// Assignment type, e.g. `Self_Assessment`.
	pub category: String,
	/// Short label, e.g. `SA 01`.
	pub label: String,
	/// Usage key of the subsection.
	pub module_id: String,
	/// Subsection score in `0.0..=1.0`.
	pub percent: f64,
	/// Points earned.
	pub score_earned: f64,
	/// Points possible.
	pub score_possible: f64,
	/// Subsection display name.
	pub subsection_name: String,
	/// Remaining upstream fields.
	#[serde(flatten)]
	pub extra: Extra,
}

/// One learner row of the course grade summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseGrade {
	/// LMS username.
	pub username: String,
	/// Email address.
	pub email: String,
	/// Course key.
	pub course_id: String,
	/// Whether the learner passed the course.
	pub passed: bool,
	/// Overall grade in `0.0..=1.0`.
	pub percent: f64,
	/// Letter grade, when the grading policy defines one.
	pub letter_grade: Option<String>,
	/// Remaining upstream fields.
	#[serde(flatten)]
	pub extra: Extra,
}

/// Account returned by `/api/user/v1/accounts?email=`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
	/// LMS username.
	pub username: String,
	/// Email address.
	pub email: Option<String>,
	/// Full name.
	pub name: Option<String>,
	/// Remaining upstream fields.
	#[serde(flatten)]
	pub extra: Extra,
}

/// Access token payload handed to callers that need the JWT itself.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawToken {
	/// Current access token.
	pub access_token: String,
}
impl Debug for RawToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RawToken").field("access_token", &"<redacted>").finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unmodeled_fields_survive_round_trip() {
		let raw = serde_json::json!({
			"results": [{
				"id": "course-v1:edX+DemoX+Demo_Course",
				"course_id": "course-v1:edX+DemoX+Demo_Course",
				"name": "Demo",
				"number": "DemoX",
				"org": "edX",
				"short_description": null,
				"start": "2024-01-01T00:00:00Z",
				"end": null,
				"pacing": "self",
				"hidden": false,
				"blocks_url": "https://lms.example.com/api/courses/v2/blocks/?course_id=x",
				"media": { "image": { "raw": "r", "small": "s", "large": "l" } }
			}],
			"pagination": { "next": null, "previous": null, "count": 1, "num_pages": 1 }
		});
		let page: CoursesPage =
			serde_json::from_value(raw.clone()).expect("Course catalog fixture should decode.");
		let course = &page.results[0];

		assert_eq!(course.org, "edX");
		assert_eq!(course.pacing.as_deref(), Some("self"));
		assert!(!course.mobile_available);
		assert!(course.extra.contains_key("media"));
		assert_eq!(page.pagination.count, 1);

		let back = serde_json::to_value(&page).expect("Course catalog should encode.");

		assert_eq!(back["results"][0]["blocks_url"], raw["results"][0]["blocks_url"]);
		assert_eq!(back["results"][0]["media"], raw["results"][0]["media"]);
	}

	#[test]
	fn raw_token_debug_redacts() {
		let token = RawToken { access_token: "eyJhbGciOi".into() };

		assert!(!format!("{token:?}").contains("eyJ"));
	}
}
