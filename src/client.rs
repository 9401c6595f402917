//! Next Engine API client facade.
//!
//! [`Client`] owns the application identity, the two hosts, a shared HTTP transport, and a
//! shared [`TokenStore`]. Every operation follows the same pipeline: attach the credential
//! parameters for the operation, POST a form body, decode the envelope, persist a rotated
//! token if one came back, and turn non-success results into [`ApiError`](crate::error::ApiError).
//!
//! Operations are plain futures. Dropping one cancels the in-flight request and any pending
//! store call; wrap a call in a runtime timeout (or configure
//! [`ReqwestHttpClient::with_timeout`]) to bound how long it may take.

mod request;
mod response;

// self
use crate::{
	_prelude::*,
	api::ApiResponse,
	error::ConfigError,
	http::{ApiHttpClient, TransportErrorMapper},
	obs::{self, CallKind},
	store::TokenStore,
};
#[cfg(feature = "reqwest")]
use crate::{
	auth::Token,
	http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
	store::MemoryStore,
};
use request::CredentialProfile;

/// Production auth host serving the sign-in screen.
pub const AUTH_HOST: &str = "https://base.next-engine.org";
/// Production API host.
pub const API_HOST: &str = "https://api.next-engine.org";
/// Sign-in screen path on the auth host.
pub const SIGN_IN_PATH: &str = "/users/sign_in/";
/// Token exchange endpoint on the API host.
pub const AUTHORIZE_PATH: &str = "/api_neauth";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestApiClient = Client<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Hosts the client talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// Host serving the sign-in screen.
	pub auth_host: Url,
	/// Host serving every API endpoint, including the token exchange.
	pub api_host: Url,
}
impl Endpoints {
	/// Parses custom hosts, e.g. a mock server in tests.
	pub fn new(auth_host: &str, api_host: &str) -> Result<Self, ConfigError> {
		let parse =
			|raw: &str| Url::parse(raw).map_err(|source| ConfigError::InvalidHost { source });

		Ok(Self { auth_host: parse(auth_host)?, api_host: parse(api_host)? })
	}
}
impl Default for Endpoints {
	fn default() -> Self {
		Self {
			auth_host: Url::parse(AUTH_HOST).expect("Production auth host must be a valid URL."),
			api_host: Url::parse(API_HOST).expect("Production API host must be a valid URL."),
		}
	}
}

/// Application identity registered with Next Engine, plus the hosts to use.
///
/// Deserializable so applications can load it from whatever config format they already use.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Application client identifier.
	pub client_id: String,
	/// Application client secret.
	pub client_secret: String,
	/// Redirect URI registered for the application.
	pub redirect_uri: String,
	/// Hosts; defaults to production.
	#[serde(default)]
	pub endpoints: Endpoints,
}
impl ClientConfig {
	/// Creates a config pointing at the production hosts.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			redirect_uri: redirect_uri.into(),
			endpoints: Endpoints::default(),
		}
	}

	/// Overrides the hosts.
	pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
		self.endpoints = endpoints;

		self
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("redirect_uri", &self.redirect_uri)
			.field("endpoints", &self.endpoints)
			.finish()
	}
}

/// Executes Next Engine API calls for a single application.
///
/// The identity is fixed at construction. The transport and the store are shared: clones of a
/// client (and callers holding their own `Arc` of the store) see the same token.
pub struct Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Token store consulted before signed calls and updated after rotations.
	pub store: Arc<dyn TokenStore>,
	config: ClientConfig,
}
impl<C, M> Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: ClientConfig,
		store: Arc<dyn TokenStore>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { http_client: http_client.into(), transport_mapper: mapper.into(), store, config }
	}

	/// Identity and hosts this client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Returns the URL of the Next Engine sign-in screen.
	///
	/// The query carries `client_id` and `redirect_uri` followed by every pair in `extra`, in
	/// order; repeated keys are kept. Performs no I/O.
	pub fn sign_in_url<I, K, V>(&self, extra: I) -> Url
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let mut url = self.config.endpoints.auth_host.clone();

		url.set_path(SIGN_IN_PATH);

		{
			let mut pairs = url.query_pairs_mut();

			pairs.clear();
			pairs.append_pair("client_id", &self.config.client_id);
			pairs.append_pair("redirect_uri", &self.config.redirect_uri);

			for (key, value) in extra {
				pairs.append_pair(key.as_ref(), value.as_ref());
			}
		}

		url
	}

	/// Exchanges the `uid`/`state` pair from the sign-in redirect for a token.
	///
	/// The issued token is persisted through the store before the envelope is returned.
	pub async fn authorize(&self, uid: &str, state: &str) -> Result<ApiResponse> {
		const KIND: CallKind = CallKind::Authorize;

		obs::observe(KIND, AUTHORIZE_PATH, async {
			let url = request::endpoint_url(&self.config.endpoints.api_host, AUTHORIZE_PATH)?;
			let profile =
				CredentialProfile::Authorize { uid: uid.to_owned(), state: state.to_owned() };

			self.dispatch(KIND, url, Vec::new(), profile).await
		})
		.await
	}

	/// Executes an endpoint that requires a signed-in user.
	///
	/// `endpoint` is a path starting with `/`. The stored access/refresh pair is appended after
	/// `params`; a store failure aborts the call before any request is sent.
	pub async fn execute<I, K, V>(&self, endpoint: &str, params: I) -> Result<ApiResponse>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		const KIND: CallKind = CallKind::Execute;

		let params = owned_params(params);

		obs::observe(KIND, endpoint, async {
			let url = request::endpoint_url(&self.config.endpoints.api_host, endpoint)?;
			let token = self.store.fetch().await?;

			self.dispatch(KIND, url, params, CredentialProfile::Login(token)).await
		})
		.await
	}

	/// Executes an endpoint that only needs the application's client credentials.
	///
	/// `endpoint` is a path starting with `/`.
	pub async fn execute_without_login<I, K, V>(
		&self,
		endpoint: &str,
		params: I,
	) -> Result<ApiResponse>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		const KIND: CallKind = CallKind::ExecuteWithoutLogin;

		let params = owned_params(params);

		obs::observe(KIND, endpoint, async {
			let url = request::endpoint_url(&self.config.endpoints.api_host, endpoint)?;

			self.dispatch(KIND, url, params, CredentialProfile::ClientOnly).await
		})
		.await
	}
}
impl<C, M> Clone for Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			store: self.store.clone(),
			config: self.config.clone(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by the crate's reqwest transport and the provided store.
	pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Self {
		Self::with_http_client(
			config,
			store,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}

	/// Creates a client whose token lives in a [`MemoryStore`] seeded with the given pair.
	///
	/// Pass empty strings when the application has not signed in yet and will call
	/// [`Client::authorize`] first.
	pub fn with_tokens(
		config: ClientConfig,
		access_token: impl Into<String>,
		refresh_token: impl Into<String>,
	) -> Self {
		let store = MemoryStore::new(Token::new(access_token, refresh_token));

		Self::new(config, Arc::new(store))
	}
}
impl<C, M> Debug for Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client").field("config", &self.config).finish()
	}
}

fn owned_params<I, K, V>(params: I) -> Vec<(String, String)>
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: AsRef<str>,
{
	params.into_iter().map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned())).collect()
}
