use askama::Template;
use axum::{response::Html, Extension};

use crate::error::AppError;
use crate::web::middleware::auth::AuthenticatedUser;

pub struct MoodOption {
    pub value: &'static str,
    pub label: &'static str,
}

const MOODS: [MoodOption; 4] = [
    MoodOption {
        value: "work",
        label: "Work",
    },
    MoodOption {
        value: "date",
        label: "Date",
    },
    MoodOption {
        value: "quick",
        label: "Quick bite",
    },
    MoodOption {
        value: "budget",
        label: "Budget",
    },
];

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub user: String,
    pub moods: &'static [MoodOption],
}

pub async fn home_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Html<String>, AppError> {
    let template = IndexTemplate {
        user: auth_user.username,
        moods: &MOODS,
    };
    Ok(Html(template.render()?))
}
