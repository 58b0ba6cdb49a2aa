use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{Catalog, Questionnaire};
use crate::domain::product::ProductId;

/// Cursor over the questionnaire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "question_index", rename_all = "snake_case")]
pub enum Progress {
    NotStarted,
    Answering(usize),
    Completed,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::Answering(index) => write!(f, "awaiting answer to question {index}"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexTarget {
    Question,
    Choice,
}

impl fmt::Display for IndexTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question => f.write_str("question"),
            Self::Choice => f.write_str("choice"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("answer for question {actual} submitted while question {expected} is pending")]
    OutOfSequence { expected: usize, actual: usize },
    #[error("{target} index {index} is out of range (len {len})")]
    IndexOutOfRange { target: IndexTarget, index: usize, len: usize },
    #[error("session already completed; restart before answering again")]
    AlreadyCompleted,
    #[error("cannot {operation} while session is {state}")]
    InvalidState { state: Progress, operation: &'static str },
    #[error("score for `{product_id}` would overflow")]
    ScoreOverflow { product_id: ProductId },
    #[error("catalog has no products to rank")]
    EmptyCatalog,
    #[error("session was built for {expected} questions, questionnaire has {actual}")]
    QuestionnaireMismatch { expected: usize, actual: usize },
    #[error("product `{product_id}` is not part of this session")]
    UnknownProduct { product_id: ProductId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_index: usize,
    pub choice_index: usize,
}

/// One run through the questionnaire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: Uuid,
    question_count: usize,
    scores: BTreeMap<ProductId, u32>,
    progress: Progress,
    history: Vec<AnswerRecord>,
}

impl Session {
    pub fn new(catalog: &Catalog, questionnaire: &Questionnaire) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_count: questionnaire.len(),
            scores: catalog.products().iter().map(|product| (product.id.clone(), 0)).collect(),
            progress: Progress::NotStarted,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scores(&self) -> &BTreeMap<ProductId, u32> {
        &self.scores
    }

    pub fn score(&self, product_id: &ProductId) -> u32 {
        self.scores.get(product_id).copied().unwrap_or(0)
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    pub fn is_completed(&self) -> bool {
        self.progress == Progress::Completed
    }

    pub(crate) fn begin(&mut self) -> Result<(), SessionError> {
        match self.progress {
            Progress::NotStarted => {
                self.progress = Progress::Answering(0);
                Ok(())
            }
            Progress::Completed => Err(SessionError::AlreadyCompleted),
            state => Err(SessionError::InvalidState { state, operation: "begin" }),
        }
    }

    /// Validates the answer completely before touching any field, so a
    /// rejected call leaves scores, history and progress exactly as they were.
    /// `questionnaire` must be the one the session was created with.
    pub(crate) fn submit(
        &mut self,
        questionnaire: &Questionnaire,
        question_index: usize,
        choice_index: usize,
    ) -> Result<Progress, SessionError> {
        let expected = match self.progress {
            Progress::Completed => return Err(SessionError::AlreadyCompleted),
            Progress::NotStarted => {
                return Err(SessionError::InvalidState {
                    state: self.progress,
                    operation: "submit an answer",
                });
            }
            Progress::Answering(index) => index,
        };
        if questionnaire.len() != self.question_count {
            return Err(SessionError::QuestionnaireMismatch {
                expected: self.question_count,
                actual: questionnaire.len(),
            });
        }

        let question = questionnaire.question(question_index).ok_or(
            SessionError::IndexOutOfRange {
                target: IndexTarget::Question,
                index: question_index,
                len: questionnaire.len(),
            },
        )?;
        if question_index != expected {
            return Err(SessionError::OutOfSequence { expected, actual: question_index });
        }
        let choice = question.choice(choice_index).ok_or(SessionError::IndexOutOfRange {
            target: IndexTarget::Choice,
            index: choice_index,
            len: question.choices.len(),
        })?;

        let mut updated = Vec::with_capacity(choice.weights.len());
        for (product_id, weight) in &choice.weights {
            let current = self
                .scores
                .get(product_id)
                .ok_or_else(|| SessionError::UnknownProduct { product_id: product_id.clone() })?;
            let total = current
                .checked_add(*weight)
                .ok_or_else(|| SessionError::ScoreOverflow { product_id: product_id.clone() })?;
            updated.push((product_id.clone(), total));
        }

        for (product_id, total) in updated {
            if let Some(score) = self.scores.get_mut(&product_id) {
                *score = total;
            }
        }
        self.history.push(AnswerRecord { question_index, choice_index });
        let next = question_index + 1;
        self.progress = if next < questionnaire.len() {
            Progress::Answering(next)
        } else {
            Progress::Completed
        };

        Ok(self.progress)
    }
}
