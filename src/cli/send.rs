use std::sync::Arc;

use anyhow::Result;
use yurline::config::Config;
use yurline_contact::{
    ContactFormController, DirectRelay, FunctionRelay, NotificationRelay, SubmitOutcome,
};
use yurline_shared::Field;

/// Runs one submission through the same controller the contact page uses.
pub async fn send(
    config: Config,
    name: String,
    email: String,
    message: String,
    direct: bool,
) -> Result<()> {
    let relay: Arc<dyn NotificationRelay> = if direct {
        match config.notifier() {
            Some(notifier) => Arc::new(DirectRelay::new(notifier)),
            None => Arc::new(DirectRelay::unconfigured()),
        }
    } else {
        Arc::new(FunctionRelay::new(config.relay.url.to_owned()))
    };

    let controller = ContactFormController::new(relay).policy(config.relay.failure_policy);
    controller.edit(Field::Name, name);
    controller.edit(Field::Email, email);
    controller.edit(Field::Message, message);

    match controller.submit().await {
        SubmitOutcome::Invalid(errors) => {
            for (field, error) in errors.iter() {
                tracing::error!(%field, "{error}");
            }
            anyhow::bail!("contact form is invalid");
        }
        SubmitOutcome::Busy => anyhow::bail!("a submission is already in progress"),
        SubmitOutcome::Submitted { error: None } => {
            tracing::info!("Message sent, the success notice is showing");
        }
        SubmitOutcome::Submitted { error: Some(error) } => {
            tracing::info!(%error, "Success notice shown, delivery failed");
        }
        SubmitOutcome::Failed { error } => {
            tracing::error!(%error, "{}", controller.submit_error().unwrap_or_default());
            anyhow::bail!("contact form submission failed");
        }
    }

    Ok(())
}
