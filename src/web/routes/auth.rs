use askama::Template;
use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use cookie::Cookie;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::services::user_service::{self, AuthError};
use crate::state::AppState;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::session::SessionKeys;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn login_page(user: Option<Extension<AuthenticatedUser>>) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(Redirect::to("/home").into_response());
    }
    let template = LoginTemplate { error: None };
    Ok(Html(template.render()?).into_response())
}

pub async fn login_handler(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match user_service::authenticate(&state.pool, &form.username, &form.password).await {
        Ok(user) => {
            info!(user_id = user.id, "🔐 Login succeeded");
            let token = state.sessions.issue(user.id, &user.username);
            let response = Redirect::to("/home").into_response();
            with_cookie(response, state.sessions.cookie(token))
        }
        Err(e) if e.is_user_facing() => {
            let template = LoginTemplate {
                error: Some(e.to_string()),
            };
            Ok(Html(template.render()?).into_response())
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

pub async fn signup_page() -> Result<Html<String>, AppError> {
    let template = SignupTemplate { error: None };
    Ok(Html(template.render()?))
}

pub async fn signup_handler(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match user_service::sign_up(&state.pool, &form.username, &form.password).await {
        Ok(_) => Ok(Redirect::to("/login").into_response()),
        Err(e) if e.is_user_facing() => {
            if matches!(e, AuthError::UsernameTaken) {
                info!("Signup rejected: username taken");
            }
            let template = SignupTemplate {
                error: Some(e.to_string()),
            };
            Ok(Html(template.render()?).into_response())
        }
        Err(e) => {
            warn!("Signup failed: {}", e);
            Err(AppError::Internal(e.to_string()))
        }
    }
}

pub async fn logout_handler(State(keys): State<SessionKeys>) -> Result<Response, AppError> {
    let response = Redirect::to("/login").into_response();
    with_cookie(response, keys.removal_cookie())
}

fn with_cookie(mut response: Response, cookie: Cookie<'static>) -> Result<Response, AppError> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| AppError::Internal(format!("invalid cookie header: {}", e)))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(response)
}
