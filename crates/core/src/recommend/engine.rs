//! Recommendation Engine implementation

use std::collections::BTreeMap;
use std::sync::Arc;

use super::selection::{rank_products, select_alternative};
use super::session::{Progress, Session, SessionError};
use super::types::*;
use crate::catalog::{Catalog, Questionnaire};
use crate::domain::product::ProductId;

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    questionnaire: Arc<Questionnaire>,
    policy: AlternativePolicy,
}

impl RecommendationEngine {
    pub fn new(catalog: Catalog, questionnaire: Questionnaire) -> Self {
        Self::from_shared(Arc::new(catalog), Arc::new(questionnaire))
    }

    pub fn from_shared(catalog: Arc<Catalog>, questionnaire: Arc<Questionnaire>) -> Self {
        Self { catalog, questionnaire, policy: AlternativePolicy::default() }
    }

    pub fn with_policy(mut self, policy: AlternativePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn policy(&self) -> AlternativePolicy {
        self.policy
    }

    pub fn new_session(&self) -> Session {
        Session::new(&self.catalog, &self.questionnaire)
    }

    pub fn begin(&self, session: &mut Session) -> Result<(), SessionError> {
        session.begin()
    }

    /// Applies one answer to `session`; all-or-nothing.
    pub fn submit_answer(
        &self,
        session: &mut Session,
        question_index: usize,
        choice_index: usize,
    ) -> Result<Progress, SessionError> {
        session.submit(&self.questionnaire, question_index, choice_index)
    }

    pub fn finalize(&self, session: &Session) -> Result<Recommendation, SessionError> {
        if !session.is_completed() {
            return Err(SessionError::InvalidState {
                state: session.progress(),
                operation: "finalize",
            });
        }
        self.recommend(session.scores())
    }

    /// Pure scoring step shared by `finalize`; identical scores always give
    /// identical recommendations.
    pub fn recommend(
        &self,
        scores: &BTreeMap<ProductId, u32>,
    ) -> Result<Recommendation, SessionError> {
        let ranking = rank_products(&self.catalog, scores);
        let alternative = select_alternative(&ranking, &self.policy);
        let winner = ranking.first().ok_or(SessionError::EmptyCatalog)?;

        Ok(Recommendation {
            winner: winner.product.clone(),
            winner_score: winner.score,
            alternative,
            ranking,
        })
    }

    /// Replaces `session` with a fresh one.
    pub fn restart(&self, session: &mut Session) {
        *session = self.new_session();
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::{builtin, Catalog, Questionnaire};
    use crate::domain::product::{MainUse, PriceTier, Product, ProductId};
    use crate::domain::question::{Choice, Question};
    use crate::recommend::{
        AlternativeReason, Progress, RecommendationEngine, SessionError,
    };

    fn two_question_engine() -> RecommendationEngine {
        let catalog = Catalog::new(vec![
            Product::new("A", "Scanner A", PriceTier::Economy, MainUse::General),
            Product::new("B", "Scanner B", PriceTier::High, MainUse::General),
        ])
        .expect("catalog");
        let questionnaire = Questionnaire::new(
            vec![
                Question::new("q1", "first", vec![Choice::new("A3").with_weight("A", 3)]),
                Question::new("q2", "second", vec![Choice::new("B5").with_weight("B", 5)]),
            ],
            &catalog,
        )
        .expect("questionnaire");
        RecommendationEngine::new(catalog, questionnaire)
    }

    fn run(engine: &RecommendationEngine, answers: &[usize]) -> crate::recommend::Session {
        let mut session = engine.new_session();
        engine.begin(&mut session).expect("begin");
        for (question_index, choice_index) in answers.iter().enumerate() {
            engine
                .submit_answer(&mut session, question_index, *choice_index)
                .expect("valid answer");
        }
        session
    }

    #[test]
    fn two_question_scenario_picks_b_with_a_as_cheaper_alternative() {
        let engine = two_question_engine();
        let session = run(&engine, &[0, 0]);

        let recommendation = engine.finalize(&session).expect("finalize");

        assert_eq!(recommendation.winner.id, ProductId::new("B"));
        assert_eq!(recommendation.winner_score, 5);
        let alternative = recommendation.alternative.expect("alternative");
        assert_eq!(alternative.product.id, ProductId::new("A"));
        assert_eq!(alternative.score, 3);
        assert_eq!(alternative.reason, AlternativeReason::DifferentPriceTier);
    }

    #[test]
    fn finalize_requires_a_completed_session() {
        let engine = two_question_engine();
        let mut session = engine.new_session();

        assert!(matches!(
            engine.finalize(&session),
            Err(SessionError::InvalidState { state: Progress::NotStarted, .. })
        ));

        engine.begin(&mut session).expect("begin");
        engine.submit_answer(&mut session, 0, 0).expect("answer");
        assert!(matches!(
            engine.finalize(&session),
            Err(SessionError::InvalidState { state: Progress::Answering(1), .. })
        ));
    }

    #[test]
    fn finalize_is_deterministic() {
        let engine = two_question_engine();
        let session = run(&engine, &[0, 0]);

        assert_eq!(engine.finalize(&session), engine.finalize(&session));
    }

    #[test]
    fn scores_equal_the_sum_of_chosen_weights() {
        let (catalog, questionnaire) = builtin().expect("builtin");
        let engine = RecommendationEngine::new(catalog, questionnaire);
        let answers = [2, 1, 2, 0, 1, 0, 1, 0];
        let session = run(&engine, &answers);

        assert_eq!(session.history().len(), answers.len());
        for product in engine.catalog().products() {
            let expected: u32 = answers
                .iter()
                .enumerate()
                .map(|(question_index, choice_index)| {
                    engine.questionnaire().questions()[question_index].choices[*choice_index]
                        .weight_for(&product.id)
                })
                .sum();
            assert_eq!(session.score(&product.id), expected, "score of {}", product.id);
        }
    }

    #[test]
    fn builtin_mixed_use_path_recommends_i700_with_classic_alternative() {
        let (catalog, questionnaire) = builtin().expect("builtin");
        let engine = RecommendationEngine::new(catalog, questionnaire);
        let session = run(&engine, &[2, 1, 2, 0, 1, 0, 1, 0]);

        let recommendation = engine.finalize(&session).expect("finalize");

        assert_eq!(recommendation.winner.id.as_str(), "medit_i700");
        assert_eq!(recommendation.winner_score, 18);
        let alternative = recommendation.alternative.expect("alternative");
        assert_eq!(alternative.product.id.as_str(), "medit_i900_classic");
        assert_eq!(alternative.score, 16);
        assert_eq!(recommendation.ranking.len(), 7);
    }

    #[test]
    fn builtin_budget_path_recommends_panda_without_alternative() {
        let (catalog, questionnaire) = builtin().expect("builtin");
        let engine = RecommendationEngine::new(catalog, questionnaire);
        let session = run(&engine, &[0; 8]);

        let recommendation = engine.finalize(&session).expect("finalize");

        assert_eq!(recommendation.winner.id.as_str(), "panda_smart");
        assert_eq!(recommendation.winner_score, 17);
        assert_eq!(recommendation.alternative, None);
        assert_eq!(recommendation.score_of(&ProductId::new("shining_elf")), Some(12));
    }

    #[test]
    fn exact_tie_for_first_goes_to_the_earlier_catalog_entry() {
        let catalog = Catalog::new(vec![
            Product::new("early", "Early", PriceTier::Mid, MainUse::General),
            Product::new("late", "Late", PriceTier::Mid, MainUse::General),
        ])
        .expect("catalog");
        let questionnaire = Questionnaire::new(
            vec![Question::new(
                "q1",
                "tie",
                vec![Choice::new("both").with_weight("late", 4).with_weight("early", 4)],
            )],
            &catalog,
        )
        .expect("questionnaire");
        let engine = RecommendationEngine::new(catalog, questionnaire);
        let session = run(&engine, &[0]);

        let recommendation = engine.finalize(&session).expect("finalize");

        assert_eq!(recommendation.winner.id.as_str(), "early");
        let alternative = recommendation.alternative.expect("runner-up tie");
        assert_eq!(alternative.product.id.as_str(), "late");
        assert_eq!(alternative.reason, AlternativeReason::NearTie);
    }

    #[test]
    fn restart_produces_a_fresh_session_from_any_state() {
        let engine = two_question_engine();
        let fresh = engine.new_session();

        for answered in 0..=2 {
            let mut session = engine.new_session();
            engine.begin(&mut session).expect("begin");
            for question_index in 0..answered {
                engine.submit_answer(&mut session, question_index, 0).expect("answer");
            }

            engine.restart(&mut session);

            assert_eq!(session.progress(), Progress::NotStarted);
            assert!(session.history().is_empty());
            assert_eq!(session.scores(), fresh.scores());
        }
    }
}
