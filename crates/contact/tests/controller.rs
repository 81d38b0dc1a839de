use std::{
    io,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::Notify;
use yurline_contact::{
    ContactFormController, DISPLAY_WINDOW, DeliveryFailurePolicy, NotificationRelay, Phase,
    RelayError, SUBMIT_ERROR, SubmitOutcome,
};
use yurline_shared::{ContactForm, Field, SubmissionResult};

enum Reply {
    Delivered,
    Rejected(&'static str),
    Unreachable,
}

struct StubRelay {
    reply: Reply,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl StubRelay {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            gate: None,
        })
    }

    fn gated(reply: Reply, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            gate: Some(gate),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationRelay for StubRelay {
    async fn send_message(&self, _form: &ContactForm) -> Result<SubmissionResult, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match self.reply {
            Reply::Delivered => Ok(SubmissionResult::delivered()),
            Reply::Rejected(error) => Ok(SubmissionResult::failed(error)),
            Reply::Unreachable => Err(RelayError::Transport("connection refused".to_owned())),
        }
    }
}

fn fill(controller: &ContactFormController) {
    controller.edit(Field::Name, "Aida");
    controller.edit(Field::Email, "aida@mail.kz");
    controller.edit(Field::Message, "I need help registering a company");
}

#[tokio::test]
async fn test_invalid_form_never_reaches_relay() {
    let relay = StubRelay::new(Reply::Delivered);
    let controller = ContactFormController::new(relay.clone());
    controller.edit(Field::Email, "a@b");

    let outcome = controller.submit().await;

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation errors, got {outcome:?}");
    };
    let fields: Vec<_> = errors.fields().collect();
    assert_eq!(fields, vec![Field::Name, Field::Email, Field::Message]);
    assert_eq!(relay.calls(), 0);
    assert_eq!(controller.phase(), Phase::Editing);
    assert_eq!(controller.errors(), errors);
}

#[tokio::test]
async fn test_editing_clears_field_error() {
    let controller = ContactFormController::new(StubRelay::new(Reply::Delivered));
    controller.submit().await;
    assert_eq!(controller.errors().len(), 3);

    controller.edit(Field::Name, "A");

    let errors = controller.errors();
    assert_eq!(errors.len(), 2);
    assert!(errors.get(Field::Name).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_success_clears_form_and_reverts_after_window() {
    let relay = StubRelay::new(Reply::Delivered);
    let controller = ContactFormController::new(relay.clone());
    fill(&controller);

    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Submitted { error: None }
    );
    assert_eq!(relay.calls(), 1);
    assert_eq!(controller.phase(), Phase::Submitted);
    assert!(controller.form().is_empty());

    tokio::time::advance(DISPLAY_WINDOW - Duration::from_millis(1)).await;
    assert_eq!(controller.phase(), Phase::Submitted);

    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(controller.phase(), Phase::Editing);
}

#[tokio::test]
async fn test_submitting_phase_is_observable_and_guards_duplicates() {
    let gate = Arc::new(Notify::new());
    let relay = StubRelay::gated(Reply::Delivered, gate.clone());
    let controller = Arc::new(ContactFormController::new(relay.clone()));
    fill(&controller);

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit().await }
    });

    while relay.calls() == 0 {
        tokio::task::yield_now().await;
    }
    assert_eq!(controller.phase(), Phase::Submitting);
    assert!(controller.is_submitting());

    assert_eq!(controller.submit().await, SubmitOutcome::Busy);
    assert_eq!(relay.calls(), 1);

    gate.notify_one();
    assert_eq!(
        first.await.unwrap(),
        SubmitOutcome::Submitted { error: None }
    );
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn test_rejected_delivery_is_acknowledged_by_default() {
    let controller = ContactFormController::new(StubRelay::new(Reply::Rejected("x")));
    fill(&controller);

    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Submitted {
            error: Some("x".to_owned())
        }
    );
    assert_eq!(controller.phase(), Phase::Submitted);
    assert_eq!(controller.submit_error(), None);
    assert!(controller.form().is_empty());
}

#[tokio::test]
async fn test_rejected_delivery_is_logged() {
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer({
            let captured = captured.clone();
            move || captured.clone()
        })
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let controller = ContactFormController::new(StubRelay::new(Reply::Rejected("chat not found")));
    fill(&controller);
    controller.submit().await;

    let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(logs.contains("WARN"));
    assert!(logs.contains("Contact message delivery failed"));
    assert!(logs.contains("chat not found"));
}

#[tokio::test]
async fn test_report_policy_keeps_form() {
    let controller = ContactFormController::new(StubRelay::new(Reply::Rejected("x")))
        .policy(DeliveryFailurePolicy::Report);
    fill(&controller);

    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Failed {
            error: "x".to_owned()
        }
    );
    assert_eq!(controller.phase(), Phase::Failed);
    assert_eq!(controller.submit_error().as_deref(), Some(SUBMIT_ERROR));
    assert_eq!(controller.form().name, "Aida");
}

#[tokio::test]
async fn test_unreachable_relay_fails_and_preserves_form() {
    let relay = StubRelay::new(Reply::Unreachable);
    let controller = ContactFormController::new(relay.clone());
    fill(&controller);

    let outcome = controller.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
    assert_eq!(controller.phase(), Phase::Failed);
    assert_eq!(controller.submit_error().as_deref(), Some(SUBMIT_ERROR));
    let form = controller.form();
    assert_eq!(form.email, "aida@mail.kz");
    assert_eq!(form.message, "I need help registering a company");

    // A retry is manual; editing dismisses the error.
    controller.edit(Field::Message, "Second attempt");
    assert_eq!(controller.submit_error(), None);
    assert_eq!(controller.phase(), Phase::Editing);
    assert_eq!(relay.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_submit_releases_guard() {
    let gate = Arc::new(Notify::new());
    let relay = StubRelay::gated(Reply::Delivered, gate.clone());
    let controller = ContactFormController::new(relay.clone());
    fill(&controller);

    let cancelled = tokio::time::timeout(Duration::from_secs(1), controller.submit()).await;

    assert!(cancelled.is_err());
    assert!(!controller.is_submitting());
    assert_eq!(controller.phase(), Phase::Editing);
    assert_eq!(controller.form().name, "Aida");

    gate.notify_one();
    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Submitted { error: None }
    );
    assert_eq!(relay.calls(), 2);
}
