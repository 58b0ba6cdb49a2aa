//! Core of the scanner pack advisor: catalog, questionnaire scoring,
//! recommendation selection and the scripted conversation around them.

pub mod audit;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod recommend;
pub mod script;

pub use audit::{AuditContext, AuditEvent, AuditSink, InMemoryAuditSink};
pub use catalog::{Catalog, CatalogError, CatalogSource, Questionnaire};
pub use domain::product::{MainUse, PriceTier, Product, ProductId};
pub use domain::question::{Choice, Question};
pub use errors::{ApplicationError, DomainError, ErrorKind, InterfaceError};
pub use flows::{AnswerStep, Conversation, ConversationState};
pub use recommend::{
    AlternativePolicy, Recommendation, RecommendationEngine, Session, SessionError,
};
pub use script::{ChatMessage, ChatPayload, RevealScript};
