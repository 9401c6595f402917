// self
#[cfg(feature = "tracing")] use crate::obs::CallOutcome;
use crate::{_prelude::*, obs::CallKind};

/// Runs `fut` inside a `nextengine.call` span, then records the outcome on that span.
///
/// `endpoint` is the request path only; credentials never reach span fields.
pub(crate) async fn in_call_span<T, Fut>(kind: CallKind, endpoint: &str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	#[cfg(feature = "tracing")]
	{
		use tracing::{Instrument, field};

		let span = tracing::info_span!(
			"nextengine.call",
			call = kind.as_str(),
			endpoint,
			outcome = field::Empty
		);
		let result = fut.instrument(span.clone()).await;

		span.record("outcome", CallOutcome::of(&result).as_str());

		result
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, endpoint);

		fut.await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ConfigError;

	#[tokio::test]
	async fn span_passes_the_result_through() {
		let value = in_call_span(CallKind::Execute, "/api_v1_login_user/info", async { Ok(42) })
			.await
			.expect("Successful body should be returned unchanged.");

		assert_eq!(value, 42);

		let err = in_call_span::<(), _>(CallKind::Authorize, "/api_neauth", async {
			Err(ConfigError::InvalidEndpoint { endpoint: "x".into() }.into())
		})
		.await
		.expect_err("Failing body should be returned unchanged.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidEndpoint { .. })));
	}
}
