pub mod conversation;
pub mod engine;
pub mod states;

pub use conversation::{AnswerStep, Conversation};
pub use engine::{FlowDefinition, FlowEngine, FlowTransitionError, LinearQuestionnaireFlow};
pub use states::{
    ConversationEvent, ConversationState, FlowAction, FlowType, TransitionOutcome,
};
