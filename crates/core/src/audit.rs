//! Audit trail of a conversation: every transition the flow applied or
//! refused, and the recommendation it finalized.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::ProductId;
use crate::flows::states::{ConversationEvent, ConversationState};

/// Who is talking and under which request, stamped on every event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditContext {
    pub session_id: Option<Uuid>,
    pub correlation_id: String,
    pub actor: String,
}

impl AuditContext {
    pub fn new(
        session_id: Option<Uuid>,
        correlation_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self { session_id, correlation_id: correlation_id.into(), actor: actor.into() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Applied,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditRecord {
    TransitionApplied {
        from: ConversationState,
        to: ConversationState,
        event: ConversationEvent,
    },
    TransitionRejected {
        state: ConversationState,
        event: ConversationEvent,
        error: String,
    },
    RecommendationFinalized {
        winner: ProductId,
        winner_score: u32,
        alternative: Option<ProductId>,
    },
}

impl AuditRecord {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TransitionApplied { .. } => "conversation.transition_applied",
            Self::TransitionRejected { .. } => "conversation.transition_rejected",
            Self::RecommendationFinalized { .. } => "recommendation.finalized",
        }
    }

    pub fn outcome(&self) -> AuditOutcome {
        match self {
            Self::TransitionRejected { .. } => AuditOutcome::Rejected,
            Self::TransitionApplied { .. } | Self::RecommendationFinalized { .. } => {
                AuditOutcome::Applied
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: Uuid,
    pub session_id: Option<Uuid>,
    pub correlation_id: String,
    pub actor: String,
    pub record: AuditRecord,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(context: &AuditContext, record: AuditRecord) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            session_id: context.session_id,
            correlation_id: context.correlation_id.clone(),
            actor: context.actor.clone(),
            record,
            occurred_at: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.record.event_type()
    }

    pub fn outcome(&self) -> AuditOutcome {
        self.record.outcome()
    }
}

pub trait AuditSink: Send + Sync {
    fn emit(&self, event: AuditEvent);
}

/// Keeps events in memory; clones share one buffer.
#[derive(Clone, Default)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl InMemoryAuditSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for InMemoryAuditSink {
    fn emit(&self, event: AuditEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
