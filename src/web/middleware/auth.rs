use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use cookie::Cookie;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::database::user_repo;
use crate::state::AppState;
use crate::web::session::{SessionClaims, SESSION_COOKIE};

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
}

impl From<SessionClaims> for AuthenticatedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Attaches an [`AuthenticatedUser`] extension when the request carries a
/// valid session cookie whose user still exists. Requests without one pass
/// through untouched.
pub async fn load_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = session_token(request.headers()).and_then(|t| state.sessions.decode(&t));
    if let Some(claims) = claims {
        if let Some(user) = resolve_user(&state.pool, claims).await {
            request.extensions_mut().insert(user);
        }
    }

    next.run(request).await
}

/// The signed id must still name the same account; a recreated database can
/// hand the id to someone else.
async fn resolve_user(pool: &SqlitePool, claims: SessionClaims) -> Option<AuthenticatedUser> {
    match user_repo::find_by_id(pool, claims.user_id).await {
        Ok(Some(row)) if row.username == claims.username => Some(AuthenticatedUser::from(claims)),
        Ok(_) => {
            info!(user_id = claims.user_id, "Session names an unknown account, ignoring");
            None
        }
        Err(e) => {
            warn!(user_id = claims.user_id, "Session lookup failed: {}", e);
            None
        }
    }
}

/// For page routes: no session means a redirect to the login form.
pub async fn require_auth(request: Request, next: Next) -> Response {
    if request.extensions().get::<AuthenticatedUser>().is_none() {
        return Redirect::to("/login").into_response();
    }

    next.run(request).await
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|hv| hv.to_str().ok())
        .flat_map(|s| Cookie::split_parse(s))
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark; session=abc.def"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn looks_through_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(header::COOKIE, HeaderValue::from_static("session=xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn no_cookie_means_no_token() {
        assert!(session_token(&HeaderMap::new()).is_none());
    }

    fn claims(user_id: i64, username: &str) -> SessionClaims {
        SessionClaims {
            user_id,
            username: username.to_string(),
            issued_at: 0,
        }
    }

    #[tokio::test]
    async fn session_resolves_only_to_the_matching_account() {
        let pool = crate::database::connect_in_memory().await.unwrap();
        let id = user_repo::insert_user(&pool, "ada", "hash").await.unwrap();

        let user = resolve_user(&pool, claims(id, "ada")).await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "ada");

        assert!(resolve_user(&pool, claims(id, "grace")).await.is_none());
        assert!(resolve_user(&pool, claims(id + 1, "ada")).await.is_none());
    }
}
