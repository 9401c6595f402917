// std
use std::sync::Arc;
// self
use nextengine::{
	auth::Token,
	store::{MemoryStore, TokenStore},
};

#[tokio::test]
async fn partial_saves_never_erase_held_values() {
	let store = MemoryStore::new(Token::new("access-1", "refresh-1"));

	store
		.save(Token { access_token: "access-2".into(), ..Default::default() })
		.await
		.expect("Saving an access-only update should succeed.");
	store.save(Token::default()).await.expect("Saving an empty update should succeed.");
	store
		.save(Token {
			refresh_token_end_date: "2025-03-01 00:00:00".into(),
			..Default::default()
		})
		.await
		.expect("Saving an end-date-only update should succeed.");

	let fetched = store.fetch().await.expect("Fetching from the memory store should succeed.");

	assert_eq!(fetched.access_token, "access-2");
	assert_eq!(fetched.refresh_token, "refresh-1");
	assert_eq!(fetched.access_token_end_date, "");
	assert_eq!(fetched.refresh_token_end_date, "2025-03-01 00:00:00");
}

#[tokio::test]
async fn concurrent_saves_leave_one_complete_pair() {
	let store: Arc<dyn TokenStore> = Arc::new(MemoryStore::default());
	let tasks = (0..16)
		.map(|i| {
			let store = store.clone();

			tokio::spawn(async move {
				store.save(Token::new(format!("access-{i}"), format!("refresh-{i}"))).await
			})
		})
		.collect::<Vec<_>>();

	for task in tasks {
		task.await
			.expect("Spawned save should not panic.")
			.expect("Concurrent save should succeed.");
	}

	let held = store.fetch().await.expect("Fetching after concurrent saves should succeed.");
	let suffix = held
		.access_token
		.strip_prefix("access-")
		.expect("Held access token should come from one of the saves.");

	assert_eq!(held.refresh_token, format!("refresh-{suffix}"));
}
