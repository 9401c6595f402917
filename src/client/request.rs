//! Request side of the pipeline: credential profiles, form bodies, and dispatch.

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, CONTENT_TYPE},
};
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	api::ApiResponse,
	auth::Token,
	client::{Client, ClientConfig, response},
	error::ConfigError,
	http::{ApiHttpClient, AsyncHttpClient, HttpRequest, TransportErrorMapper},
	obs::CallKind,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Identity/token fields attached to a request, chosen by the operation.
#[derive(Clone)]
pub(super) enum CredentialProfile {
	/// `client_id`, `client_secret`, `uid`, `state`.
	Authorize { uid: String, state: String },
	/// `access_token`, `refresh_token` from the store.
	Login(Token),
	/// `client_id`, `client_secret`.
	ClientOnly,
}
impl CredentialProfile {
	pub(super) fn params(self, config: &ClientConfig) -> Vec<(&'static str, String)> {
		match self {
			Self::Authorize { uid, state } => vec![
				("client_id", config.client_id.clone()),
				("client_secret", config.client_secret.clone()),
				("uid", uid),
				("state", state),
			],
			Self::Login(token) =>
				vec![("access_token", token.access_token), ("refresh_token", token.refresh_token)],
			Self::ClientOnly => vec![
				("client_id", config.client_id.clone()),
				("client_secret", config.client_secret.clone()),
			],
		}
	}
}

impl<C, M> Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Sends one signed POST and hands the response to the response pipeline.
	pub(super) async fn dispatch(
		&self,
		kind: CallKind,
		url: Url,
		params: Vec<(String, String)>,
		profile: CredentialProfile,
	) -> Result<ApiResponse> {
		let body = encode_form(&params, &profile.params(&self.config));
		let request = build_request(&url, body)?;
		let handle = self.http_client.handle();
		let response = handle
			.call(request)
			.await
			.map_err(|err| self.transport_mapper.map_transport_error(kind, err))?;

		response::handle_response(self.store.as_ref(), kind, response).await
	}
}

/// Joins an endpoint path onto the API host.
///
/// Rejects anything that is not an absolute path, and any path that resolves onto another
/// origin (`//host`, `/\host`).
pub(super) fn endpoint_url(api_host: &Url, endpoint: &str) -> Result<Url, ConfigError> {
	let invalid = || ConfigError::InvalidEndpoint { endpoint: endpoint.to_owned() };

	if !endpoint.starts_with('/') || endpoint.starts_with("//") {
		return Err(invalid());
	}

	let url = api_host.join(endpoint).map_err(|_| invalid())?;

	if url.origin() != api_host.origin() {
		return Err(invalid());
	}

	Ok(url)
}

/// Caller params first, then credential params; colliding keys are sent twice.
pub(super) fn encode_form(
	params: &[(String, String)],
	credentials: &[(&'static str, String)],
) -> String {
	let mut form = Serializer::new(String::new());

	for (key, value) in params {
		form.append_pair(key, value);
	}
	for (key, value) in credentials {
		form.append_pair(key, value);
	}

	form.finish()
}

fn build_request(url: &Url, body: String) -> Result<HttpRequest, ConfigError> {
	Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.header(ACCEPT, "application/json")
		.body(body.into_bytes())
		.map_err(ConfigError::from)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config() -> ClientConfig {
		ClientConfig::new("client-1", "secret-1", "https://app.example.com/cb")
	}

	fn decode(body: &str) -> Vec<(String, String)> {
		url::form_urlencoded::parse(body.as_bytes()).into_owned().collect()
	}

	fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
		raw.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
	}

	#[test]
	fn caller_params_precede_credentials_and_collisions_are_kept() {
		let params = pairs(&[("limit", "1"), ("access_token", "caller")]);
		let credentials =
			CredentialProfile::Login(Token::new("stored-a", "stored-r")).params(&config());
		let body = encode_form(&params, &credentials);

		assert_eq!(
			decode(&body),
			pairs(&[
				("limit", "1"),
				("access_token", "caller"),
				("access_token", "stored-a"),
				("refresh_token", "stored-r"),
			])
		);
	}

	#[test]
	fn profiles_attach_expected_fields() {
		let authorize = CredentialProfile::Authorize { uid: "u-1".into(), state: "s-1".into() }
			.params(&config());
		let keys: Vec<&str> = authorize.iter().map(|(k, _)| *k).collect();

		assert_eq!(keys, ["client_id", "client_secret", "uid", "state"]);

		let client_only = CredentialProfile::ClientOnly.params(&config());

		assert_eq!(
			client_only,
			vec![("client_id", "client-1".to_owned()), ("client_secret", "secret-1".to_owned())]
		);
	}

	#[test]
	fn form_values_are_url_encoded() {
		let body = encode_form(&pairs(&[("where", "a=b&c d")]), &[]);

		assert_eq!(body, "where=a%3Db%26c+d");
	}

	#[test]
	fn endpoints_must_be_absolute_paths_on_the_api_host() {
		let host = Url::parse("https://api.next-engine.org").expect("Host fixture should parse.");
		let url = endpoint_url(&host, "/api_v1_users_info/search")
			.expect("Absolute endpoint path should join.");

		assert_eq!(url.as_str(), "https://api.next-engine.org/api_v1_users_info/search");

		for bad in [
			"api_v1_users_info/search",
			"",
			"//evil.example.com/x",
			"/\\evil.example.com/x",
			"/\\/evil.example.com/x",
		] {
			let err = endpoint_url(&host, bad).expect_err("Endpoints leaving the API host should be rejected.");

			assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
		}
	}

	#[test]
	fn requests_are_form_posts() {
		let url = Url::parse("https://api.next-engine.org/api_neauth").expect("URL should parse.");
		let request = build_request(&url, "a=1".into()).expect("Request should build.");

		assert_eq!(request.method(), &Method::POST);
		assert_eq!(request.uri(), "https://api.next-engine.org/api_neauth");
		assert_eq!(
			request.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
			Some(FORM_CONTENT_TYPE)
		);
		assert_eq!(request.body().as_slice(), b"a=1");
	}
}
