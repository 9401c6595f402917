//! Client-level error types shared across the request pipeline, transports, and stores.

// self
use crate::{_prelude::*, api::ApiResult};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Next Engine answered with a non-success result.
	#[error(transparent)]
	Api(#[from] ApiError),
}
impl Error {
	/// Returns the provider-reported failure, if this error is one.
	///
	/// Lets callers branch on API-level failures (expired token, bad parameters) versus local
	/// transport, decoding, or storage failures.
	pub fn as_api(&self) -> Option<&ApiError> {
		match self {
			Self::Api(e) => Some(e),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// API endpoint path cannot be joined onto the API host.
	#[error("Endpoint `{endpoint}` must be a path starting with `/`.")]
	InvalidEndpoint {
		/// Endpoint supplied by the caller.
		endpoint: String,
	},
	/// Host URL cannot be parsed.
	#[error("Host URL is invalid.")]
	InvalidHost {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Next Engine API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client gave up waiting for the API.
	#[error("Request timed out while calling the Next Engine API.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the Next Engine API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Body decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Response body is not a valid API envelope.
	#[error("Next Engine API returned malformed JSON.")]
	Envelope {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Envelope `data` records do not match the requested type.
	#[error("Envelope records do not match the requested type.")]
	Records {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Provider-reported failure carrying the envelope's status triple.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Next Engine API returned `{result}` with code {code}: {message}")]
pub struct ApiError {
	/// Provider error code (e.g. `002004`).
	pub code: String,
	/// Provider message.
	pub message: String,
	/// Envelope result; never [`ApiResult::Success`].
	pub result: ApiResult,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let client_error: Error = store_error.clone().into();

		assert!(matches!(client_error, Error::Storage(_)));
		assert!(client_error.to_string().contains("database unreachable"));

		let source = StdError::source(&client_error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn api_errors_are_distinguishable_from_local_failures() {
		let api: Error = ApiError {
			code: "002004".into(),
			message: "expired".into(),
			result: ApiResult::Error,
		}
		.into();
		let local: Error = TransportError::Io(std::io::Error::other("reset")).into();

		assert_eq!(api.as_api().map(|e| e.code.as_str()), Some("002004"));
		assert!(local.as_api().is_none());
		assert_eq!(api.to_string(), "Next Engine API returned `error` with code 002004: expired");
	}
}
