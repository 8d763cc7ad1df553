use serde::{Deserialize, Serialize};
use statig::prelude::*;

use super::form::{ContactForm, Field};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    Edit { field: Field, value: String },
    Submit,
    ResponseOk,
    ResponseFailed,
    ResetElapsed,
    Dismiss,
}

/// Public view of the machine's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionPhase {
    /// Text shown to the visitor for this phase, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            SubmissionPhase::Idle => None,
            SubmissionPhase::Submitting => Some("Sending..."),
            SubmissionPhase::Succeeded => Some("Message Sent!"),
            SubmissionPhase::Failed => Some("Something went wrong. Please try again later."),
        }
    }
}

/// Contact form lifecycle: idle -> submitting -> succeeded/failed -> idle.
#[derive(Debug, Default)]
pub struct SubmissionMachine {
    form: ContactForm,
    attempts: u32,
}

impl SubmissionMachine {
    pub fn new(form: ContactForm) -> Self {
        Self { form, attempts: 0 }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Number of submissions that left `idle`.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[state_machine(initial = "State::idle()")]
impl SubmissionMachine {
    #[state]
    fn idle(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Edit { field, value } => {
                self.form.set(*field, value.clone());
                Handled
            }
            SubmissionEvent::Submit => {
                if let Err(errors) = self.form.validate() {
                    tracing::debug!(errors = ?errors, "Submit ignored for invalid form");
                    return Handled;
                }
                self.attempts += 1;
                tracing::info!(attempt = self.attempts, "Contact submission started");
                Transition(State::submitting())
            }
            _ => Handled,
        }
    }

    #[state]
    fn submitting(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::ResponseOk => {
                tracing::info!(attempt = self.attempts, "Contact submission delivered");
                Transition(State::succeeded())
            }
            SubmissionEvent::ResponseFailed => {
                tracing::warn!(attempt = self.attempts, "Contact submission failed");
                Transition(State::failed())
            }
            SubmissionEvent::Submit => {
                tracing::debug!("Submit ignored while a request is in flight");
                Handled
            }
            _ => Handled,
        }
    }

    #[state]
    fn succeeded(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::ResetElapsed => {
                self.form.clear();
                Transition(State::idle())
            }
            _ => Handled,
        }
    }

    #[state]
    fn failed(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Edit { field, value } => {
                self.form.set(*field, value.clone());
                Handled
            }
            SubmissionEvent::Dismiss => Transition(State::idle()),
            _ => Handled,
        }
    }
}

pub(crate) fn phase_of(state: &State) -> SubmissionPhase {
    match state {
        State::Idle { .. } => SubmissionPhase::Idle,
        State::Submitting { .. } => SubmissionPhase::Submitting,
        State::Succeeded { .. } => SubmissionPhase::Succeeded,
        State::Failed { .. } => SubmissionPhase::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SubmissionMachine {
        SubmissionMachine::new(ContactForm::new("Ada", "ada@example.com", "", "Hi"))
    }

    #[test]
    fn test_happy_path_clears_fields_on_reset() {
        let mut sm = filled().state_machine();
        assert_eq!(phase_of(sm.state()), SubmissionPhase::Idle);

        sm.handle(&SubmissionEvent::Submit);
        assert_eq!(phase_of(sm.state()), SubmissionPhase::Submitting);

        sm.handle(&SubmissionEvent::ResponseOk);
        assert_eq!(phase_of(sm.state()), SubmissionPhase::Succeeded);
        assert_eq!(sm.inner().form().name, "Ada");

        sm.handle(&SubmissionEvent::ResetElapsed);
        assert_eq!(phase_of(sm.state()), SubmissionPhase::Idle);
        assert!(sm.inner().form().is_blank());
    }

    #[test]
    fn test_submit_while_submitting_is_ignored() {
        let mut sm = filled().state_machine();
        sm.handle(&SubmissionEvent::Submit);
        sm.handle(&SubmissionEvent::Submit);
        sm.handle(&SubmissionEvent::Edit {
            field: Field::Name,
            value: "Charles".to_string(),
        });

        assert_eq!(phase_of(sm.state()), SubmissionPhase::Submitting);
        assert_eq!(sm.inner().attempts(), 1);
        assert_eq!(sm.inner().form().name, "Ada");
    }

    #[test]
    fn test_invalid_form_never_leaves_idle() {
        let mut sm = SubmissionMachine::new(ContactForm::new("", "ada@example.com", "", "Hi"))
            .state_machine();
        sm.handle(&SubmissionEvent::Submit);
        assert_eq!(phase_of(sm.state()), SubmissionPhase::Idle);
        assert_eq!(sm.inner().attempts(), 0);
    }

    #[test]
    fn test_failure_keeps_fields_and_dismiss_returns_to_idle() {
        let mut sm = filled().state_machine();
        sm.handle(&SubmissionEvent::Submit);
        sm.handle(&SubmissionEvent::ResponseFailed);
        assert_eq!(phase_of(sm.state()), SubmissionPhase::Failed);

        sm.handle(&SubmissionEvent::Edit {
            field: Field::Message,
            value: "Hi again".to_string(),
        });
        sm.handle(&SubmissionEvent::Dismiss);
        assert_eq!(phase_of(sm.state()), SubmissionPhase::Idle);
        assert_eq!(sm.inner().form().message, "Hi again");
    }

    #[test]
    fn test_stale_reset_outside_succeeded_is_ignored() {
        let mut sm = filled().state_machine();
        sm.handle(&SubmissionEvent::ResetElapsed);
        assert_eq!(phase_of(sm.state()), SubmissionPhase::Idle);
        assert_eq!(sm.inner().form().name, "Ada");
    }

    #[test]
    fn test_notices() {
        assert_eq!(SubmissionPhase::Idle.notice(), None);
        assert_eq!(SubmissionPhase::Succeeded.notice(), Some("Message Sent!"));
    }
}
