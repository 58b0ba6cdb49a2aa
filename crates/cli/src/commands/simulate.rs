use std::path::PathBuf;
use std::sync::Arc;

use advisor_core::errors::{ApplicationError, InterfaceError};
use advisor_core::recommend::Recommendation;
use advisor_core::script::RevealScript;
use advisor_core::Conversation;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::commands::{catalog_overrides, load_config, load_engine, CommandResult};
use crate::logging::TracingAuditSink;

#[derive(Debug, Serialize)]
struct RankingEntry<'a> {
    id: &'a str,
    name: &'a str,
    score: u32,
}

/// Replays one-based `answers` through a fresh conversation.
pub fn run(answers: &[usize], catalog: Option<PathBuf>) -> CommandResult {
    let config = match load_config(catalog_overrides(catalog)) {
        Ok(config) => config,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("simulate", error_class, message, exit_code)
        }
    };
    let engine = match load_engine(&config) {
        Ok(engine) => engine,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("simulate", error_class, message, exit_code)
        }
    };
    let script = match RevealScript::new(config.presentation.brand.clone()) {
        Ok(script) => script,
        Err(error) => {
            return CommandResult::failure("simulate", "script_render", error.to_string(), 5)
        }
    };

    let question_count = engine.questionnaire().len();
    if answers.len() != question_count {
        return CommandResult::failure(
            "simulate",
            "answer_count",
            format!("expected {question_count} answers, got {}", answers.len()),
            4,
        );
    }

    let correlation_id = Uuid::new_v4().to_string();
    let mut conversation =
        Conversation::new(engine).with_audit_sink(Arc::new(TracingAuditSink), correlation_id.clone());

    let recommendation = match replay(&mut conversation, answers, &correlation_id) {
        Ok(recommendation) => recommendation,
        Err(error) => {
            return CommandResult::failure("simulate", "invalid_answer", error.to_string(), 4)
        }
    };

    let messages = match script.messages(&recommendation) {
        Ok(messages) => messages,
        Err(error) => {
            return CommandResult::failure("simulate", "script_render", error.to_string(), 5)
        }
    };

    let ranking = recommendation
        .ranking
        .iter()
        .map(|entry| RankingEntry {
            id: entry.product.id.as_str(),
            name: &entry.product.name,
            score: entry.score,
        })
        .collect::<Vec<_>>();
    let alternative = recommendation.alternative.as_ref().map(|alternative| {
        json!({
            "id": alternative.product.id,
            "name": alternative.product.name,
            "score": alternative.score,
            "reason": alternative.reason,
        })
    });
    let data = json!({
        "session_id": conversation.session().id(),
        "correlation_id": correlation_id,
        "answers": answers,
        "winner": {
            "id": recommendation.winner.id,
            "name": recommendation.winner.name,
            "score": recommendation.winner_score,
        },
        "alternative": alternative,
        "ranking": ranking,
        "messages": messages.iter().map(|message| &message.payload).collect::<Vec<_>>(),
    });

    CommandResult::success_with_data(
        "simulate",
        format!("recommended {}", recommendation.winner.name),
        Some(data),
    )
}

fn replay(
    conversation: &mut Conversation,
    answers: &[usize],
    correlation_id: &str,
) -> Result<Recommendation, InterfaceError> {
    let reject = |error: ApplicationError| error.into_interface(correlation_id);

    conversation.begin().map_err(|error| reject(error.into()))?;

    let mut recommendation = None;
    for (question_index, answer) in answers.iter().enumerate() {
        let choice_index = answer.checked_sub(1).ok_or_else(|| InterfaceError::BadRequest {
            message: format!("answer {} is zero; choices are numbered from 1", question_index + 1),
            correlation_id: correlation_id.to_string(),
        })?;
        let step = conversation
            .submit_answer(question_index, choice_index)
            .map_err(|error| reject(error.into()))?;
        recommendation = step.recommendation;
    }

    recommendation.ok_or_else(|| InterfaceError::Internal {
        message: "questionnaire finished without a recommendation".to_string(),
        correlation_id: correlation_id.to_string(),
    })
}
