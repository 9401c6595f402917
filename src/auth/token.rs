//! Access/refresh token pair plus the end dates the provider stamps on them.

// crates.io
use time::{
	PrimitiveDateTime, UtcOffset,
	format_description::BorrowedFormatItem,
	macros::{format_description, offset},
};
// self
use crate::_prelude::*;

/// Wire format of `*_token_end_date` fields.
const END_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
	format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
/// End dates are issued in Japan Standard Time.
const END_DATE_OFFSET: UtcOffset = offset!(+9);

/// Token pair as issued by the provider.
///
/// Every field is an opaque string; the client never validates formats. An empty string means
/// "no value", which [`Token::merge`] relies on to keep partial updates from clobbering held
/// values. JSON `null` reads as empty.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Token {
	/// Access token secret; callers must avoid logging it.
	#[serde(deserialize_with = "crate::api::nullable_string")]
	pub access_token: String,
	/// Refresh token secret; callers must avoid logging it.
	#[serde(deserialize_with = "crate::api::nullable_string")]
	pub refresh_token: String,
	/// Access token end date, `YYYY-MM-DD HH:MM:SS` (JST).
	#[serde(deserialize_with = "crate::api::nullable_string")]
	pub access_token_end_date: String,
	/// Refresh token end date, `YYYY-MM-DD HH:MM:SS` (JST).
	#[serde(deserialize_with = "crate::api::nullable_string")]
	pub refresh_token_end_date: String,
}
impl Token {
	/// Creates a token seeded with the provided access/refresh pair and no end dates.
	pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
		Self {
			access_token: access_token.into(),
			refresh_token: refresh_token.into(),
			..Default::default()
		}
	}

	/// Returns `true` when every field is empty.
	pub fn is_empty(&self) -> bool {
		self.access_token.is_empty()
			&& self.refresh_token.is_empty()
			&& self.access_token_end_date.is_empty()
			&& self.refresh_token_end_date.is_empty()
	}

	/// Returns `true` when both secrets are present, i.e. the provider rotated the pair.
	pub fn is_rotation(&self) -> bool {
		!self.access_token.is_empty() && !self.refresh_token.is_empty()
	}

	/// Merges a partial update field by field.
	///
	/// A field is replaced iff the incoming value is non-empty; otherwise the held value is kept.
	pub fn merge(&mut self, update: Token) {
		let Token { access_token, refresh_token, access_token_end_date, refresh_token_end_date } =
			update;

		merge_field(&mut self.access_token, access_token);
		merge_field(&mut self.refresh_token, refresh_token);
		merge_field(&mut self.access_token_end_date, access_token_end_date);
		merge_field(&mut self.refresh_token_end_date, refresh_token_end_date);
	}

	/// Parsed access token end date, if present and well formed.
	pub fn access_token_expires_at(&self) -> Option<OffsetDateTime> {
		parse_end_date(&self.access_token_end_date)
	}

	/// Parsed refresh token end date, if present and well formed.
	pub fn refresh_token_expires_at(&self) -> Option<OffsetDateTime> {
		parse_end_date(&self.refresh_token_end_date)
	}

	/// Returns `true` if the access token end date is known and not after `instant`.
	pub fn is_access_token_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.access_token_expires_at().is_some_and(|end| end <= instant)
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("access_token", &redact(&self.access_token))
			.field("refresh_token", &redact(&self.refresh_token))
			.field("access_token_end_date", &self.access_token_end_date)
			.field("refresh_token_end_date", &self.refresh_token_end_date)
			.finish()
	}
}

fn merge_field(held: &mut String, incoming: String) {
	if !incoming.is_empty() {
		*held = incoming;
	}
}

fn redact(value: &str) -> &'static str {
	if value.is_empty() { "" } else { "<redacted>" }
}

fn parse_end_date(raw: &str) -> Option<OffsetDateTime> {
	let raw = raw.trim();

	if raw.is_empty() {
		return None;
	}

	PrimitiveDateTime::parse(raw, END_DATE_FORMAT).ok().map(|dt| dt.assume_offset(END_DATE_OFFSET))
}
