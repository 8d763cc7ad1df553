use statig::blocking::StateMachine;
use statig::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn, Instrument};

use super::errors::{TransportError, ValidationError};
use super::form::{ContactForm, Field};
use super::state_machine::{phase_of, SubmissionEvent, SubmissionMachine, SubmissionPhase};
use super::transport::ContactTransport;
use crate::telemetry::{generate_correlation_id, submission_span};

pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(3);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionSettings {
    /// How long the success notice stays up before the form resets.
    pub reset_delay: Duration,
    /// Upper bound on a single delivery.
    pub request_timeout: Duration,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            reset_delay: DEFAULT_RESET_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    AlreadySubmitting,
    ShowingSuccess,
    AwaitingDismiss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Delivered,
    Rejected(Vec<ValidationError>),
    Failed(TransportError),
    Ignored(IgnoredReason),
}

type Machine = StateMachine<SubmissionMachine>;

fn lock(machine: &Mutex<Machine>) -> MutexGuard<'_, Machine> {
    machine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns one contact form instance: its state machine, its transport and the
/// pending auto-reset.
///
/// At most one delivery is in flight at a time. Dropping the controller
/// cancels a pending reset.
pub struct ContactController {
    machine: Arc<Mutex<Machine>>,
    transport: Arc<dyn ContactTransport>,
    settings: SubmissionSettings,
    reset_task: Mutex<Option<JoinHandle<()>>>,
}

impl ContactController {
    pub fn new(transport: Arc<dyn ContactTransport>, settings: SubmissionSettings) -> Self {
        Self {
            machine: Arc::new(Mutex::new(SubmissionMachine::default().state_machine())),
            transport,
            settings,
            reset_task: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> SubmissionSettings {
        self.settings
    }

    pub fn phase(&self) -> SubmissionPhase {
        phase_of(lock(&self.machine).state())
    }

    pub fn form(&self) -> ContactForm {
        lock(&self.machine).inner().form().clone()
    }

    pub fn attempts(&self) -> u32 {
        lock(&self.machine).inner().attempts()
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.phase().notice()
    }

    /// Updates one field. Ignored unless the form is editable.
    pub fn edit(&self, field: Field, value: impl Into<String>) {
        lock(&self.machine).handle(&SubmissionEvent::Edit {
            field,
            value: value.into(),
        });
    }

    pub fn fill(&self, form: &ContactForm) {
        for field in Field::ALL {
            self.edit(field, form.get(field));
        }
    }

    /// Clears a failure notice so the visitor can try again.
    pub fn dismiss(&self) {
        lock(&self.machine).handle(&SubmissionEvent::Dismiss);
    }

    pub async fn retry(&self) -> SubmitOutcome {
        self.dismiss();
        self.submit().await
    }

    /// Sends the current form if the machine is idle and the fields are valid.
    pub async fn submit(&self) -> SubmitOutcome {
        let form = {
            let mut machine = lock(&self.machine);
            match phase_of(machine.state()) {
                SubmissionPhase::Idle => {}
                SubmissionPhase::Submitting => {
                    debug!("Submit ignored while a request is in flight");
                    return SubmitOutcome::Ignored(IgnoredReason::AlreadySubmitting);
                }
                SubmissionPhase::Succeeded => {
                    return SubmitOutcome::Ignored(IgnoredReason::ShowingSuccess);
                }
                SubmissionPhase::Failed => {
                    return SubmitOutcome::Ignored(IgnoredReason::AwaitingDismiss);
                }
            }

            if let Err(errors) = machine.inner().form().validate() {
                debug!(errors = ?errors, "Contact form rejected before submission");
                return SubmitOutcome::Rejected(errors);
            }

            machine.handle(&SubmissionEvent::Submit);
            machine.inner().form().clone()
        };

        let correlation_id = generate_correlation_id();
        let mut in_flight = InFlight::new(&self.machine);
        let result = self
            .deliver(&form)
            .instrument(submission_span(&correlation_id))
            .await;

        match result {
            Ok(()) => {
                in_flight.settle(SubmissionEvent::ResponseOk);
                info!(correlation_id = %correlation_id, "Contact message delivered");
                self.schedule_reset();
                SubmitOutcome::Delivered
            }
            Err(err) => {
                in_flight.settle(SubmissionEvent::ResponseFailed);
                warn!(correlation_id = %correlation_id, error = %err, "Contact message not delivered");
                SubmitOutcome::Failed(err)
            }
        }
    }

    async fn deliver(&self, form: &ContactForm) -> Result<(), TransportError> {
        let timeout = self.settings.request_timeout;
        match tokio::time::timeout(timeout, self.transport.deliver(form)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(timeout)),
        }
    }

    fn schedule_reset(&self) {
        let machine = Arc::clone(&self.machine);
        let delay = self.settings.reset_delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            lock(&machine).handle(&SubmissionEvent::ResetElapsed);
            debug!("Contact form reset after success notice");
        });

        let mut slot = self.reset_task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(task) {
            previous.abort();
        }
    }

    /// True while a success reset is waiting to fire.
    pub fn reset_pending(&self) -> bool {
        self.reset_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for ContactController {
    fn drop(&mut self) {
        let slot = self.reset_task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = slot.take() {
            task.abort();
        }
    }
}

/// Resolves a submission that was started but whose future was dropped
/// before the response arrived, so the machine cannot stay in `submitting`.
struct InFlight<'a> {
    machine: &'a Mutex<Machine>,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(machine: &'a Mutex<Machine>) -> Self {
        Self {
            machine,
            settled: false,
        }
    }

    fn settle(&mut self, event: SubmissionEvent) {
        self.settled = true;
        lock(self.machine).handle(&event);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!(error = %TransportError::Abandoned, "Discarding in-flight contact submission");
            lock(self.machine).handle(&SubmissionEvent::ResponseFailed);
        }
    }
}
