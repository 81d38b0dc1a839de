use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use validator::Validate;
use yurline_shared::{ContactForm, SubmissionResult};

use crate::{error::AppError, routes::AppState};

/// Body accepted by the relay function. Only presence is checked here;
/// email shape is the form's job.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RelayInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub message: String,
}

impl From<RelayInput> for ContactForm {
    fn from(value: RelayInput) -> Self {
        ContactForm::new(value.name, value.email, value.message)
    }
}

/// POST /api/contact - Forwards one contact submission to the Telegram chat
pub async fn send_telegram_message(
    State(app_state): State<AppState>,
    input: Result<Json<RelayInput>, JsonRejection>,
) -> Result<Json<SubmissionResult>, AppError> {
    let Ok(Json(input)) = input else {
        return Err(AppError::invalid_argument("Missing required fields"));
    };
    if input.validate().is_err() {
        return Err(AppError::invalid_argument("Missing required fields"));
    }

    let Some(notifier) = &app_state.notifier else {
        tracing::error!("Telegram bot token or chat id is not configured");
        return Err(AppError::failed_precondition("Telegram not configured"));
    };

    let form = ContactForm::from(input);
    if let Err(err) = notifier.notify(&form).await {
        tracing::error!(error = %err, "Error sending Telegram message");
        return Err(AppError::internal(err.to_string()));
    }

    Ok(Json(SubmissionResult::delivered()))
}
