use thiserror::Error;

use crate::audit::{AuditContext, AuditEvent, AuditRecord, AuditSink};
use crate::flows::states::{
    ConversationEvent, ConversationState, FlowAction, FlowType, TransitionOutcome,
};

pub trait FlowDefinition {
    fn flow_type(&self) -> FlowType;
    fn initial_state(&self) -> ConversationState;
    fn transition(
        &self,
        current: &ConversationState,
        event: &ConversationEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError>;
}

/// Walks the questions strictly in order, then reveals the recommendation.
///
/// Answer ordering and index bounds are enforced by the session; the flow only
/// decides which states accept which events.
#[derive(Clone, Debug)]
pub struct LinearQuestionnaireFlow {
    question_count: usize,
}

impl LinearQuestionnaireFlow {
    pub fn new(question_count: usize) -> Self {
        Self { question_count }
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }
}

impl FlowDefinition for LinearQuestionnaireFlow {
    fn flow_type(&self) -> FlowType {
        FlowType::LinearQuestionnaire
    }

    fn initial_state(&self) -> ConversationState {
        ConversationState::NotStarted
    }

    fn transition(
        &self,
        current: &ConversationState,
        event: &ConversationEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        transition_linear(self.question_count, current, event)
    }
}

pub struct FlowEngine<F> {
    flow: F,
}

impl<F> FlowEngine<F>
where
    F: FlowDefinition,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn flow_type(&self) -> FlowType {
        self.flow.flow_type()
    }

    pub fn initial_state(&self) -> ConversationState {
        self.flow.initial_state()
    }

    pub fn apply(
        &self,
        current: &ConversationState,
        event: &ConversationEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        self.flow.transition(current, event)
    }

    pub fn apply_with_audit<S>(
        &self,
        current: &ConversationState,
        event: &ConversationEvent,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<TransitionOutcome, FlowTransitionError>
    where
        S: AuditSink + ?Sized,
    {
        let result = self.apply(current, event);
        match &result {
            Ok(outcome) => sink.emit(transition_applied_event(audit, outcome)),
            Err(error) => {
                sink.emit(transition_rejected_event(audit, current, event, &error.to_string()))
            }
        }
        result
    }
}

pub(crate) fn transition_applied_event(
    audit: &AuditContext,
    outcome: &TransitionOutcome,
) -> AuditEvent {
    AuditEvent::new(
        audit,
        AuditRecord::TransitionApplied {
            from: outcome.from.clone(),
            to: outcome.to.clone(),
            event: outcome.event.clone(),
        },
    )
}

pub(crate) fn transition_rejected_event(
    audit: &AuditContext,
    state: &ConversationState,
    event: &ConversationEvent,
    error: &str,
) -> AuditEvent {
    AuditEvent::new(
        audit,
        AuditRecord::TransitionRejected {
            state: state.clone(),
            event: event.clone(),
            error: error.to_string(),
        },
    )
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("invalid transition from {state:?} using event {event:?}")]
    InvalidTransition { state: ConversationState, event: ConversationEvent },
}

fn transition_linear(
    question_count: usize,
    current: &ConversationState,
    event: &ConversationEvent,
) -> Result<TransitionOutcome, FlowTransitionError> {
    use ConversationEvent::{AnswerSubmitted, Begin, Restart};
    use ConversationState::{AwaitingAnswer, Completed, NotStarted};
    use FlowAction::{
        AccumulateScores, FinalizeRecommendation, PresentQuestion, PresentWelcome,
        RevealRecommendation, ResetSession,
    };

    let (to, actions) = match (current, event) {
        (NotStarted, Begin) if question_count > 0 => (
            AwaitingAnswer { question_index: 0 },
            vec![PresentWelcome, PresentQuestion { question_index: 0 }],
        ),
        (AwaitingAnswer { question_index }, AnswerSubmitted { .. }) => {
            let next = question_index + 1;
            if next < question_count {
                (
                    AwaitingAnswer { question_index: next },
                    vec![AccumulateScores, PresentQuestion { question_index: next }],
                )
            } else {
                (Completed, vec![AccumulateScores, FinalizeRecommendation, RevealRecommendation])
            }
        }
        (_, Restart) => (NotStarted, vec![ResetSession]),
        _ => {
            return Err(FlowTransitionError::InvalidTransition {
                state: current.clone(),
                event: event.clone(),
            });
        }
    };

    Ok(TransitionOutcome { from: current.clone(), to, event: event.clone(), actions })
}
