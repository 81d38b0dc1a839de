use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tokio::time::Instant;
use yurline_shared::{ContactForm, Field};

use crate::{FormErrors, NotificationRelay, validate_form};

/// How long the success notice stays up before the form comes back.
pub const DISPLAY_WINDOW: Duration = Duration::from_secs(5);

pub const SUBMIT_ERROR: &str = "Failed to send the message. Please try again later.";

/// What the visitor sees when the relay reports `{ success: false }`.
#[derive(
    EnumString,
    Display,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryFailurePolicy {
    /// Show success anyway and leave the failure to the logs.
    #[default]
    Acknowledge,
    /// Show the generic submit error and keep the form for a retry.
    Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitting,
    Submitted,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the relay was not called.
    Invalid(FormErrors),
    /// Another submission is still in flight.
    Busy,
    /// The success notice is showing. `error` carries a swallowed delivery
    /// failure under [`DeliveryFailurePolicy::Acknowledge`].
    Submitted { error: Option<String> },
    Failed { error: String },
}

#[derive(Debug)]
struct State {
    form: ContactForm,
    errors: FormErrors,
    submit_error: Option<String>,
    phase: Phase,
    submitted_until: Option<Instant>,
    in_flight: bool,
}

impl State {
    // The success notice is not sticky.
    fn settle(&mut self, now: Instant) {
        if self.phase != Phase::Submitted {
            return;
        }
        if self.submitted_until.is_some_and(|until| now >= until) {
            self.phase = Phase::Editing;
            self.submitted_until = None;
        }
    }
}

/// Releases the in-flight flag even when the submit future is dropped
/// mid-await, so a cancelled submission leaves the form editable.
struct InFlight<'a> {
    state: &'a Mutex<State>,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<State>) -> Self {
        Self { state, armed: true }
    }

    fn finish(mut self) -> MutexGuard<'a, State> {
        self.armed = false;
        let mut state = lock(self.state);
        state.in_flight = false;
        state
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = lock(self.state);
        state.in_flight = false;
        if state.phase == Phase::Submitting {
            state.phase = Phase::Editing;
        }
        tracing::debug!("Submission cancelled before the relay answered");
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the contact form for one page visit and drives its submission.
///
/// Methods take `&self` so the controller can be shared between tasks; the
/// in-flight flag makes overlapping submits return [`SubmitOutcome::Busy`].
pub struct ContactFormController {
    relay: Arc<dyn NotificationRelay>,
    policy: DeliveryFailurePolicy,
    display_window: Duration,
    state: Mutex<State>,
}

impl ContactFormController {
    pub fn new(relay: Arc<dyn NotificationRelay>) -> Self {
        Self {
            relay,
            policy: DeliveryFailurePolicy::default(),
            display_window: DISPLAY_WINDOW,
            state: Mutex::new(State {
                form: ContactForm::default(),
                errors: FormErrors::default(),
                submit_error: None,
                phase: Phase::Editing,
                submitted_until: None,
                in_flight: false,
            }),
        }
    }

    pub fn policy(mut self, policy: DeliveryFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn display_window(mut self, window: Duration) -> Self {
        self.display_window = window;
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        let mut state = lock(&self.state);
        state.settle(Instant::now());
        state
    }

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    pub fn form(&self) -> ContactForm {
        self.state().form.clone()
    }

    pub fn errors(&self) -> FormErrors {
        self.state().errors.clone()
    }

    pub fn submit_error(&self) -> Option<String> {
        self.state().submit_error.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.state().in_flight
    }

    /// Applies a field edit, clearing that field's error and any submit error.
    pub fn edit(&self, field: Field, value: impl Into<String>) {
        let mut state = self.state();
        state.form.set(field, value);
        state.errors.clear(field);
        state.submit_error = None;
        if state.phase == Phase::Failed {
            state.phase = Phase::Editing;
        }
    }

    /// Validates synchronously, then awaits the relay unless another
    /// submission is already running.
    pub async fn submit(&self) -> SubmitOutcome {
        let form = {
            let mut state = self.state();
            if state.in_flight {
                tracing::debug!("Submission already in progress");
                return SubmitOutcome::Busy;
            }

            let errors = validate_form(&state.form);
            if !errors.is_empty() {
                state.errors = errors.clone();
                state.phase = Phase::Editing;
                return SubmitOutcome::Invalid(errors);
            }

            state.errors = FormErrors::default();
            state.submit_error = None;
            state.phase = Phase::Submitting;
            state.in_flight = true;
            state.form.clone()
        };

        let in_flight = InFlight::new(&self.state);
        let result = self.relay.send_message(&form).await;
        let mut state = in_flight.finish();

        match result {
            Ok(result) if result.success => {
                tracing::info!("Contact message delivered");
                self.acknowledge(&mut state);
                SubmitOutcome::Submitted { error: None }
            }
            Ok(result) => {
                let error = result
                    .error
                    .unwrap_or_else(|| "unknown delivery error".to_owned());

                match self.policy {
                    DeliveryFailurePolicy::Acknowledge => {
                        tracing::warn!(%error, "Contact message delivery failed");
                        self.acknowledge(&mut state);
                        SubmitOutcome::Submitted { error: Some(error) }
                    }
                    DeliveryFailurePolicy::Report => {
                        tracing::error!(%error, "Contact message delivery failed");
                        self.fail(&mut state);
                        SubmitOutcome::Failed { error }
                    }
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "Contact form submission failed");
                self.fail(&mut state);
                SubmitOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    fn acknowledge(&self, state: &mut State) {
        state.form.clear();
        state.errors = FormErrors::default();
        state.phase = Phase::Submitted;
        state.submitted_until = Some(Instant::now() + self.display_window);
    }

    fn fail(&self, state: &mut State) {
        state.submit_error = Some(SUBMIT_ERROR.to_owned());
        state.phase = Phase::Failed;
    }
}
