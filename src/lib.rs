//! Open edX LMS client for internal reporting backends: cached OAuth 2.0 client-credentials
//! JWTs, authenticated resource calls, and typed models for courses and grades.
//!
//! ```no_run
//! # async fn demo() -> lms_token_client::error::Result<()> {
//! use lms_token_client::client::ReqwestLmsClient;
//!
//! let client = ReqwestLmsClient::from_env()?;
//! let catalog = client.courses().await?;
//! let grades = client.call_resource("/api/grades/v1/courses/course-v1:edX+DemoX+2024/").await?;
//! # let _ = (catalog, grades);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod oauth;
pub mod obs;
pub mod resource;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
