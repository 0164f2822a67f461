use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::ApiError;
use crate::AppState;

/// HTTP Basic authentication middleware that verifies credentials on every
/// request and injects the principal into request extensions.
///
/// Any failure short of a verified principal is a 401; role and ownership are
/// judged later, inside the service.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (username, password) =
        extract_basic_credentials(&headers).map_err(ApiError::unauthorized)?;

    let auth_user = state
        .users
        .verify(&username, &password)
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract and decode credentials from the Authorization header
fn extract_basic_credentials(headers: &HeaderMap) -> Result<(String, String), String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    let encoded = auth_str
        .strip_prefix("Basic ")
        .ok_or_else(|| "Authorization header must use Basic authentication".to_string())?;

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| "Invalid base64 in Authorization header".to_string())?;

    let decoded =
        String::from_utf8(decoded).map_err(|_| "Credentials are not valid UTF-8".to_string())?;

    // Only the first colon separates username from password; passwords may contain colons
    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| "Credentials must be username:password".to_string())?;

    if username.is_empty() {
        return Err("Empty username".to_string());
    }

    Ok((username.to_string(), password.to_string()))
}
