//! Response envelope returned by every Next Engine API call.

// crates.io
use serde::{Deserializer, de::DeserializeOwned};
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, auth::Token, error::DecodeError};

/// Loosely typed record carried in [`ApiResponse::data`].
pub type Record = Map<String, Value>;

/// Envelope `result` field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum ApiResult {
	/// The call succeeded and the envelope carries usable data.
	Success,
	/// The provider rejected the call.
	Error,
	/// The provider asks the caller to send the user through sign-in again.
	Redirect,
	/// Empty or missing value.
	#[default]
	Unknown,
	/// Unrecognized non-empty value, kept verbatim.
	Other(String),
}
impl ApiResult {
	/// Returns a stable label matching the wire value.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Success => "success",
			Self::Error => "error",
			Self::Redirect => "redirect",
			Self::Unknown => "",
			Self::Other(value) => value,
		}
	}

	/// Returns `true` only for [`ApiResult::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success)
	}
}
impl From<String> for ApiResult {
	fn from(value: String) -> Self {
		match value.as_str() {
			"success" => Self::Success,
			"error" => Self::Error,
			"redirect" => Self::Redirect,
			"" => Self::Unknown,
			_ => Self::Other(value),
		}
	}
}
impl From<Option<String>> for ApiResult {
	fn from(value: Option<String>) -> Self {
		value.map(Self::from).unwrap_or_default()
	}
}
impl From<ApiResult> for String {
	fn from(value: ApiResult) -> Self {
		value.as_str().to_owned()
	}
}
impl Display for ApiResult {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Top-level JSON object returned by the API.
///
/// Only envelopes whose [`result`](Self::result) is [`ApiResult::Success`] reach callers; the
/// client turns every other value into [`ApiError`](crate::error::ApiError).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiResponse {
	/// Provider status code.
	#[serde(deserialize_with = "nullable_string")]
	pub code: String,
	/// Provider message; usually empty on success.
	#[serde(deserialize_with = "nullable_string")]
	pub message: String,
	/// Envelope result.
	pub result: ApiResult,
	/// Token pair the provider attached to this response, empty unless rotated.
	#[serde(flatten)]
	pub token: Token,
	/// Record count as reported by the provider.
	#[serde(deserialize_with = "string_or_number")]
	pub count: String,
	/// Records returned by the endpoint.
	#[serde(deserialize_with = "nullable_records")]
	pub data: Vec<Record>,
}
impl ApiResponse {
	/// Decodes an envelope from a raw response body.
	pub fn from_slice(body: &[u8], status: Option<u16>) -> Result<Self, DecodeError> {
		let mut de = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| DecodeError::Envelope { source, status })
	}

	/// Deserializes [`data`](Self::data) into caller-defined record types.
	pub fn records<T>(&self) -> Result<Vec<T>, DecodeError>
	where
		T: DeserializeOwned,
	{
		let value = Value::Array(self.data.iter().cloned().map(Value::Object).collect());

		serde_path_to_error::deserialize(value).map_err(|source| DecodeError::Records { source })
	}
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	match Value::deserialize(deserializer)? {
		Value::Null => Ok(String::new()),
		Value::String(s) => Ok(s),
		Value::Number(n) => Ok(n.to_string()),
		other => Err(serde::de::Error::custom(format!("expected string or number, got {other}"))),
	}
}

/// Reads a JSON string field, treating `null` as empty.
pub(crate) fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_records<'de, D>(deserializer: D) -> Result<Vec<Record>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<Vec<Record>>::deserialize(deserializer)?.unwrap_or_default())
}
