use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowType {
    LinearQuestionnaire,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    NotStarted,
    AwaitingAnswer { question_index: usize },
    Completed,
}

impl ConversationState {
    pub fn accepts_answer(&self) -> bool {
        matches!(self, Self::AwaitingAnswer { .. })
    }

    pub fn question_index(&self) -> Option<usize> {
        match self {
            Self::AwaitingAnswer { question_index } => Some(*question_index),
            Self::NotStarted | Self::Completed => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationEvent {
    Begin,
    AnswerSubmitted { question_index: usize, choice_index: usize },
    Restart,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowAction {
    PresentWelcome,
    PresentQuestion { question_index: usize },
    AccumulateScores,
    FinalizeRecommendation,
    RevealRecommendation,
    ResetSession,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: ConversationState,
    pub to: ConversationState,
    pub event: ConversationEvent,
    pub actions: Vec<FlowAction>,
}
