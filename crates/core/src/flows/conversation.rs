//! Conversation driver: the linear flow wired to the recommendation engine.

use std::sync::Arc;

use crate::audit::{AuditContext, AuditEvent, AuditRecord, AuditSink};
use crate::domain::question::Question;
use crate::errors::DomainError;
use crate::flows::engine::{
    transition_applied_event, transition_rejected_event, FlowEngine, LinearQuestionnaireFlow,
};
use crate::flows::states::{ConversationEvent, ConversationState, TransitionOutcome};
use crate::recommend::{Recommendation, RecommendationEngine, Session};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerStep {
    pub outcome: TransitionOutcome,
    /// Present exactly when the answer completed the questionnaire.
    pub recommendation: Option<Recommendation>,
}

pub struct Conversation {
    flow: FlowEngine<LinearQuestionnaireFlow>,
    engine: RecommendationEngine,
    session: Session,
    state: ConversationState,
    recommendation: Option<Recommendation>,
    audit: Option<(Arc<dyn AuditSink>, String)>,
}

impl Conversation {
    pub fn new(engine: RecommendationEngine) -> Self {
        let flow = FlowEngine::new(LinearQuestionnaireFlow::new(engine.questionnaire().len()));
        let state = flow.initial_state();
        let session = engine.new_session();
        Self { flow, engine, session, state, recommendation: None, audit: None }
    }

    pub fn with_audit_sink(
        mut self,
        sink: Arc<dyn AuditSink>,
        correlation_id: impl Into<String>,
    ) -> Self {
        self.audit = Some((sink, correlation_id.into()));
        self
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    pub fn accepts_answer(&self) -> bool {
        self.state.accepts_answer()
    }

    pub fn current_question(&self) -> Option<(usize, &Question)> {
        let index = self.state.question_index()?;
        self.engine.questionnaire().question(index).map(|question| (index, question))
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.recommendation.as_ref()
    }

    pub fn begin(&mut self) -> Result<TransitionOutcome, DomainError> {
        let event = ConversationEvent::Begin;
        let result = self
            .flow
            .apply(&self.state, &event)
            .map_err(DomainError::from)
            .and_then(|outcome| {
                self.engine.begin(&mut self.session)?;
                Ok(outcome)
            });
        self.commit(&event, result)
    }

    pub fn submit_answer(
        &mut self,
        question_index: usize,
        choice_index: usize,
    ) -> Result<AnswerStep, DomainError> {
        let event = ConversationEvent::AnswerSubmitted { question_index, choice_index };
        let result = self
            .flow
            .apply(&self.state, &event)
            .map_err(DomainError::from)
            .and_then(|outcome| {
                let mut next = self.session.clone();
                self.engine.submit_answer(&mut next, question_index, choice_index)?;
                let recommendation = match outcome.to {
                    ConversationState::Completed => Some(self.engine.finalize(&next)?),
                    _ => None,
                };
                self.session = next;
                Ok((outcome, recommendation))
            });

        let (outcome, recommendation) = match result {
            Ok(pair) => pair,
            Err(error) => {
                self.emit(transition_rejected_event(
                    &self.audit_context(),
                    &self.state,
                    &event,
                    &error.to_string(),
                ));
                return Err(error);
            }
        };

        if let Some(recommendation) = &recommendation {
            self.emit(AuditEvent::new(
                &self.audit_context(),
                AuditRecord::RecommendationFinalized {
                    winner: recommendation.winner.id.clone(),
                    winner_score: recommendation.winner_score,
                    alternative: recommendation
                        .alternative
                        .as_ref()
                        .map(|alternative| alternative.product.id.clone()),
                },
            ));
        }
        self.recommendation = recommendation.clone();

        let outcome = self.commit(&event, Ok(outcome))?;
        Ok(AnswerStep { outcome, recommendation })
    }

    /// Discards the session from any state and starts over at `NotStarted`.
    pub fn restart(&mut self) -> Result<TransitionOutcome, DomainError> {
        let event = ConversationEvent::Restart;
        let result = self.flow.apply(&self.state, &event).map_err(DomainError::from);
        if result.is_ok() {
            self.engine.restart(&mut self.session);
            self.recommendation = None;
        }
        self.commit(&event, result)
    }

    fn commit(
        &mut self,
        event: &ConversationEvent,
        result: Result<TransitionOutcome, DomainError>,
    ) -> Result<TransitionOutcome, DomainError> {
        let context = self.audit_context();
        match &result {
            Ok(outcome) => {
                self.state = outcome.to.clone();
                self.emit(transition_applied_event(&context, outcome));
            }
            Err(error) => {
                if !matches!(event, ConversationEvent::AnswerSubmitted { .. }) {
                    self.emit(transition_rejected_event(
                        &context,
                        &self.state,
                        event,
                        &error.to_string(),
                    ));
                }
            }
        }
        result
    }

    fn audit_context(&self) -> AuditContext {
        let correlation_id =
            self.audit.as_ref().map(|(_, id)| id.clone()).unwrap_or_else(|| "unassigned".to_string());
        AuditContext::new(Some(self.session.id()), correlation_id, "conversation")
    }

    fn emit(&self, event: AuditEvent) {
        if let Some((sink, _)) = &self.audit {
            sink.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::audit::{AuditRecord, InMemoryAuditSink};
    use crate::catalog::builtin;
    use crate::domain::product::ProductId;
    use crate::errors::{DomainError, ErrorKind};
    use crate::flows::conversation::Conversation;
    use crate::flows::states::{ConversationState, FlowAction};
    use crate::recommend::{Progress, RecommendationEngine, SessionError};

    fn conversation() -> Conversation {
        let (catalog, questionnaire) = builtin().expect("builtin");
        Conversation::new(RecommendationEngine::new(catalog, questionnaire))
    }

    #[test]
    fn full_run_exposes_recommendation_on_last_answer() {
        let mut conversation = conversation();
        assert!(!conversation.accepts_answer());
        assert!(conversation.current_question().is_none());

        conversation.begin().expect("begin");
        let answers = [2, 1, 2, 0, 1, 0, 1, 0];
        for (question_index, choice_index) in answers.iter().enumerate() {
            let (current, question) = conversation.current_question().expect("question");
            assert_eq!(current, question_index);
            assert!(!question.choices.is_empty());

            let step =
                conversation.submit_answer(question_index, *choice_index).expect("valid answer");
            let last = question_index + 1 == answers.len();
            assert_eq!(step.recommendation.is_some(), last);
            if last {
                assert!(step.outcome.actions.contains(&FlowAction::RevealRecommendation));
            }
        }

        assert_eq!(conversation.state(), &ConversationState::Completed);
        assert!(!conversation.accepts_answer());
        let recommendation = conversation.recommendation().expect("result available");
        assert_eq!(recommendation.winner.id.as_str(), "medit_i700");
    }

    #[test]
    fn answers_before_begin_and_after_completion_are_invalid_state() {
        let mut conversation = conversation();

        let before = conversation.submit_answer(0, 0).expect_err("not started");
        assert_eq!(before.kind(), ErrorKind::InvalidState);

        conversation.begin().expect("begin");
        for question_index in 0..8 {
            conversation.submit_answer(question_index, 0).expect("answer");
        }

        let after = conversation.submit_answer(7, 0).expect_err("completed");
        assert_eq!(after.kind(), ErrorKind::InvalidState);
        assert_eq!(conversation.session().history().len(), 8);
    }

    #[test]
    fn rejected_answer_keeps_state_and_session() {
        let mut conversation = conversation();
        conversation.begin().expect("begin");
        conversation.submit_answer(0, 1).expect("answer");
        let session_before = conversation.session().clone();

        let error = conversation.submit_answer(3, 0).expect_err("out of order");
        assert_eq!(
            error,
            DomainError::Session(SessionError::OutOfSequence { expected: 1, actual: 3 })
        );
        let error = conversation.submit_answer(1, 9).expect_err("bad choice");
        assert_eq!(error.kind(), ErrorKind::IndexOutOfRange);

        assert_eq!(conversation.session(), &session_before);
        assert_eq!(conversation.state(), &ConversationState::AwaitingAnswer { question_index: 1 });
    }

    #[test]
    fn restart_resets_from_any_state() {
        let mut conversation = conversation();
        conversation.begin().expect("begin");
        conversation.submit_answer(0, 0).expect("answer");

        conversation.restart().expect("restart mid-run");
        assert_eq!(conversation.state(), &ConversationState::NotStarted);
        assert_eq!(conversation.session().progress(), Progress::NotStarted);
        assert!(conversation.session().history().is_empty());
        assert!(conversation.session().scores().values().all(|score| *score == 0));

        conversation.begin().expect("begin again");
        for question_index in 0..8 {
            conversation.submit_answer(question_index, 0).expect("answer");
        }
        assert!(conversation.recommendation().is_some());

        conversation.restart().expect("restart after completion");
        assert!(conversation.recommendation().is_none());
        assert!(conversation.begin().is_ok());
    }

    #[test]
    fn begin_twice_is_rejected() {
        let mut conversation = conversation();
        conversation.begin().expect("begin");

        assert_eq!(conversation.begin().expect_err("already begun").kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn audit_sink_sees_transitions_rejections_and_final_result() {
        let sink = InMemoryAuditSink::default();
        let mut conversation = conversation().with_audit_sink(Arc::new(sink.clone()), "req-7");

        conversation.begin().expect("begin");
        let _ = conversation.submit_answer(4, 0);
        for question_index in 0..8 {
            conversation.submit_answer(question_index, 0).expect("answer");
        }

        let events = sink.events();
        let types = events.iter().map(|event| event.event_type()).collect::<Vec<_>>();
        assert_eq!(types[0], "conversation.transition_applied");
        assert_eq!(types[1], "conversation.transition_rejected");
        assert_eq!(types.iter().filter(|kind| **kind == "recommendation.finalized").count(), 1);
        assert_eq!(types.len(), 1 + 1 + 8 + 1);
        assert!(events.iter().all(|event| event.correlation_id == "req-7"));
        let finalized = events
            .iter()
            .find(|event| event.event_type() == "recommendation.finalized")
            .expect("finalized event");
        assert_eq!(
            finalized.record,
            AuditRecord::RecommendationFinalized {
                winner: ProductId::new("panda_smart"),
                winner_score: 17,
                alternative: None,
            }
        );
        assert!(matches!(
            events[1].record,
            AuditRecord::TransitionRejected {
                state: ConversationState::AwaitingAnswer { question_index: 0 },
                ..
            }
        ));
    }
}
