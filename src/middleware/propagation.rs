use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::context::{Credential, CredentialContext};

/// Seed the credential context from the inbound `Authorization` header and
/// run the rest of the stack inside that unit of work.
///
/// Install this ahead of every business handler. Absence of the header is
/// legal: the scope is still installed (empty) so handlers can `set` a
/// credential mid-flow, and the slot is torn down with the scope on every
/// exit path.
pub async fn propagate_credentials(request: Request, next: Next) -> Response {
    match bearer_credential(request.headers()) {
        Some(credential) => CredentialContext::scope_with(credential, next.run(request)).await,
        None => {
            tracing::debug!("no inbound credential, starting unauthenticated unit of work");
            CredentialContext::scope(next.run(request)).await
        }
    }
}

/// Extract the bearer token from inbound headers, if any.
///
/// An empty or malformed header counts as absent; it must never turn into
/// an empty `Authorization` header on an outbound call.
pub fn bearer_credential(headers: &HeaderMap) -> Option<Credential> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(Credential::from(token))
    }
}
