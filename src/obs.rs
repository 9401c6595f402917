//! Optional observability helpers for client calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `nextengine.call` with the `call`
//!   (operation), `endpoint` (request path), and `outcome` fields.
//! - Enable `metrics` to increment the `nextengine_call_total` counter for every
//!   attempt/success/failure, labeled by `call` + `outcome`, and the
//!   `nextengine_token_rotation_total` counter whenever a rotated token is persisted.

mod metrics;
mod tracing;

pub use metrics::*;

// self
use crate::_prelude::*;

/// Client operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// `uid`/`state` exchange against `/api_neauth`.
	Authorize,
	/// Signed call carrying the stored token pair.
	Execute,
	/// Call signed with client credentials only.
	ExecuteWithoutLogin,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Authorize => "authorize",
			CallKind::Execute => "execute",
			CallKind::ExecuteWithoutLogin => "execute_without_login",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Terminal outcome of a finished call.
	pub fn of<T>(result: &Result<T>) -> Self {
		if result.is_ok() { Self::Success } else { Self::Failure }
	}

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

/// Records the attempt, runs `fut` in its call span, and records how it ended.
pub(crate) async fn observe<T, Fut>(kind: CallKind, endpoint: &str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	record_call_outcome(kind, CallOutcome::Attempt);

	let result = self::tracing::in_call_span(kind, endpoint, fut).await;

	record_call_outcome(kind, CallOutcome::of(&result));

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn outcome_follows_the_result() {
		let failed: Result<()> = Err(StoreError::Backend { message: "down".into() }.into());

		assert_eq!(CallOutcome::of(&Ok(())), CallOutcome::Success);
		assert_eq!(CallOutcome::of(&failed), CallOutcome::Failure);
		assert_eq!(CallOutcome::Failure.to_string(), "failure");
	}

	#[tokio::test]
	async fn observe_returns_the_body_result() {
		let value = observe(CallKind::ExecuteWithoutLogin, "/api_app/company", async { Ok("ok") })
			.await
			.expect("Observed body should succeed.");

		assert_eq!(value, "ok");
	}
}
