//! Response side of the pipeline: envelope decoding, token rotation, and error mapping.

// self
use crate::{
	_prelude::*,
	api::ApiResponse,
	error::ApiError,
	http::HttpResponse,
	obs::{self, CallKind},
	store::TokenStore,
};

/// Decodes the envelope, persists a rotated token, and rejects non-success results.
///
/// The rotation is saved before the result is inspected, so a token issued alongside an error
/// envelope is still kept. A store failure aborts the call even though the request itself went
/// through.
pub(super) async fn handle_response(
	store: &dyn TokenStore,
	kind: CallKind,
	response: HttpResponse,
) -> Result<ApiResponse> {
	let status = response.status().as_u16();
	let envelope = ApiResponse::from_slice(response.body(), Some(status))?;

	if envelope.token.is_rotation() {
		store.save(envelope.token.clone()).await?;
		obs::record_token_rotation(kind);
	}
	if !envelope.result.is_success() {
		let ApiResponse { code, message, result, .. } = envelope;

		return Err(ApiError { code, message, result }.into());
	}

	Ok(envelope)
}
