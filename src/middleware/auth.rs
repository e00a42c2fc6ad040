use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use crate::clients::types::ApiResponse;
use crate::clients::IdentityClient;
use crate::context::CredentialContext;

/// Authenticated caller identity, inserted into request extensions once
/// the inbound credential passed introspection.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
}

/// Introspection-backed authentication middleware.
///
/// Reads the credential seeded by [`propagate_credentials`], validates it
/// against the identity service, and rejects with the platform envelope
/// when it is absent or invalid. An introspection transport failure counts
/// as invalid, never as a server crash.
///
/// [`propagate_credentials`]: crate::middleware::propagate_credentials
pub async fn require_authentication(
    State(identity): State<Arc<IdentityClient>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let credential = match CredentialContext::get() {
        Ok(Some(credential)) if !credential.is_empty() => credential,
        Ok(_) => return Err(unauthenticated()),
        Err(err) => {
            tracing::warn!("credential read failed during authentication: {err}");
            return Err(unauthenticated());
        }
    };

    let introspection = match identity.introspect(credential.as_str()).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!("introspection failed: {err}");
            return Err(unauthenticated());
        }
    };

    if !introspection.valid {
        return Err(unauthenticated());
    }

    let user_id = introspection.user_id.unwrap_or_default();
    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

fn unauthenticated() -> Response {
    let body = ApiResponse::<()>::error(1006, "Unauthenticated");
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
