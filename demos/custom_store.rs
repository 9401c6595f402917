//! Plugs a session-scoped token store into the client and prints the sign-in URL a user would
//! be sent to. No request leaves the process.

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use color_eyre::Result;
use parking_lot::Mutex;
// self
use nextengine::{
	auth::Token,
	client::{Client, ClientConfig, ReqwestApiClient},
	store::{StoreError, StoreFuture, TokenStore},
};

/// Keeps one token per web session, the way an app would keep it in its session table.
struct SessionStore {
	session_id: String,
	sessions: Arc<Mutex<HashMap<String, Token>>>,
}
impl TokenStore for SessionStore {
	fn fetch(&self) -> StoreFuture<'_, Token> {
		Box::pin(async move {
			self.sessions.lock().get(&self.session_id).cloned().ok_or_else(|| {
				StoreError::Backend { message: format!("Session `{}` is gone", self.session_id) }
			})
		})
	}

	fn save(&self, token: Token) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.sessions.lock().entry(self.session_id.clone()).or_default().merge(token);

			Ok(())
		})
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let sessions = Arc::new(Mutex::new(HashMap::new()));
	let store =
		Arc::new(SessionStore { session_id: "session-42".into(), sessions: sessions.clone() });
	let client: ReqwestApiClient = Client::new(
		ClientConfig::new("demo-client", "demo-secret", "https://app.example.com/callback"),
		store.clone(),
	);

	println!("Send your user to {}.", client.sign_in_url([("extension_id", "demo")]));

	// Stand-in for `client.authorize(uid, state)` once the redirect comes back.
	store.save(Token::new("access-demo", "refresh-demo")).await?;
	store
		.save(Token {
			access_token: "access-rotated".into(),
			access_token_end_date: "2030-01-01 09:00:00".into(),
			..Default::default()
		})
		.await?;

	let held = client.store.fetch().await?;

	println!("Session holds {held:?}, expiring at {:?}.", held.access_token_expires_at());
	println!("Tracked sessions: {}.", sessions.lock().len());

	Ok(())
}
