//! Optional observability helpers for platform calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `slashauth.call` with the `resource` and
//!   `operation` fields.
//! - Enable `metrics` to increment the `slashauth_call_total` counter for every
//!   attempt/success/failure, labeled by `resource` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Platform resources a call can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
	/// Users, roles, and token validation.
	Users,
	/// Organizations and role requirements.
	Organizations,
	/// Files and blob uploads.
	Files,
	/// Application info and role metadata.
	Apps,
}
impl Resource {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Resource::Users => "users",
			Resource::Organizations => "organizations",
			Resource::Files => "files",
			Resource::Apps => "apps",
		}
	}
}
impl Display for Resource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Request handed to the transport.
	Attempt,
	/// Transport returned a success status.
	Success,
	/// Transport failed or returned a non-success status.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
