//! Session management
//!
//! Sessions are opaque server-side records addressed by a signed, HTTP-only,
//! SameSite=Lax cookie. Two extractors mirror the middleware pair of the
//! HTTP surface:
//!
//! - [`AuthUser`] rejects with 401 when no identity is resolvable, first
//!   attempting guest assignment when that policy is enabled
//! - [`OptionalAuthUser`] attaches an identity when present and otherwise
//!   proceeds without one; it never creates guests

use crate::config::{AppConfig, SessionConfig};
use crate::error::ApiError;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tower_sessions::{
    cookie::{time::Duration, Key, SameSite},
    service::SignedCookie,
    Expiry, MemoryStore, Session, SessionManagerLayer,
};
use tracing::{debug, warn};

/// Key under which the authenticated user's id is stored in the session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Build the session middleware from configuration.
///
/// The secure flag is only set in production so that plain-HTTP development
/// setups keep working. The config loader guarantees the secret is long
/// enough for key derivation.
pub fn session_layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    let store = MemoryStore::default();
    let key = Key::derive_from(config.secret.as_bytes());

    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(AppConfig::is_production())
        .with_expiry(Expiry::OnInactivity(Duration::hours(config.ttl_hours)))
        .with_signed(key)
}

/// Bind a session to a user identity, regenerating the session id.
pub async fn establish_session(session: &Session, user_id: &str) -> Result<(), ApiError> {
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("failed to cycle session id: {}", e)))?;
    session
        .insert(SESSION_USER_ID_KEY, user_id.to_string())
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("failed to bind session: {}", e)))
}

/// Invalidate the server-side session record. Succeeds whether or not a
/// session existed.
pub async fn destroy_session(session: &Session) -> Result<(), ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("failed to destroy session: {}", e)))
}

async fn resolve_user_id(session: &Session) -> Result<Option<String>, ApiError> {
    session
        .get::<String>(SESSION_USER_ID_KEY)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("failed to read session: {}", e)))
}

/// Authenticated user for the current request (requireAuth)
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::Internal(anyhow::anyhow!("no session layer: {}", msg)))?;
        let state = AppState::from_ref(state);

        if let Some(user_id) = resolve_user_id(&session).await? {
            return Ok(AuthUser { user_id });
        }

        if state.config().session.guest_access {
            // Transparently assign a guest identity. Creation failure falls
            // through to an ordinary 401 instead of failing the request.
            match UserService::create_guest(state.storage()).await {
                Ok(guest) => match session
                    .insert(SESSION_USER_ID_KEY, guest.id.clone())
                    .await
                {
                    Ok(()) => {
                        debug!(username = %guest.username, "assigned guest identity");
                        return Ok(AuthUser { user_id: guest.id });
                    }
                    Err(e) => warn!(error = %e, "failed to bind guest session"),
                },
                Err(e) => warn!(error = %e, "guest creation failed, continuing unauthenticated"),
            }
        }

        Err(ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// Optionally authenticated user (optionalAuth)
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<String>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::Internal(anyhow::anyhow!("no session layer: {}", msg)))?;

        Ok(OptionalAuthUser(resolve_user_id(&session).await?))
    }
}
