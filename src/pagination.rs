//! Opaque page tokens.
//!
//! Grounded on the original `pagination.Pagination{Cursor, ListRequest}`
//! gob-encoded token: a page token binds a cursor to the exact listing
//! request that produced it, so a token can never be replayed against a
//! different filter/ordering than the one it was issued for. We encode with
//! `bincode` and wrap in URL-safe base64 instead of gob, since bincode is
//! the corpus's binary-serialization crate of choice.

use crate::error::BookmakerError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{de::DeserializeOwned, Serialize};

/// A page token binding a cursor value to the stripped request that must
/// match on the next call.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct PageToken<R> {
    cursor: String,
    request: R,
}

/// Encodes a cursor plus the request that produced it into an opaque token.
pub fn encode<R: Serialize>(cursor: &str, request: &R) -> Result<String, BookmakerError> {
    let token = PageToken { cursor: cursor.to_string(), request };
    let bytes = bincode::serialize(&token)
        .map_err(|e| BookmakerError::internal(format!("page token could not be encoded: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Decodes a page token and verifies it was issued for `expected_request`
/// (compared by its own serialized bytes, so any field difference —
/// including book, filters, or ordering — invalidates the token).
pub fn decode<R>(token: &str, expected_request: &R) -> Result<String, BookmakerError>
where
    R: Serialize + DeserializeOwned,
{
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| BookmakerError::invalid_argument("page token is malformed"))?;
    let decoded: PageToken<R> = bincode::deserialize(&bytes)
        .map_err(|_| BookmakerError::invalid_argument("page token is malformed"))?;

    let expected_bytes = bincode::serialize(expected_request)
        .map_err(|e| BookmakerError::internal(format!("request could not be encoded: {e}")))?;
    let decoded_request_bytes = bincode::serialize(&decoded.request)
        .map_err(|e| BookmakerError::internal(format!("request could not be encoded: {e}")))?;
    if expected_bytes != decoded_request_bytes {
        return Err(BookmakerError::invalid_argument(
            "page token does not match the request it was issued for",
        ));
    }
    Ok(decoded.cursor)
}
