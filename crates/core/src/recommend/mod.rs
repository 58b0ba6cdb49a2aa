//! Recommendation engine
//!
//! Accumulates per-answer weights into per-product totals over one session,
//! then ranks the catalog and picks a winner plus an optional alternative.

mod engine;
mod selection;
mod session;
mod types;

pub use engine::RecommendationEngine;
pub use selection::{rank_products, select_alternative};
pub use session::{AnswerRecord, IndexTarget, Progress, Session, SessionError};
pub use types::*;

/// Default windows for alternative selection
pub const DEFAULT_ALTERNATIVE_POLICY: AlternativePolicy =
    AlternativePolicy { price_tier_window: 3, near_tie_window: 1 };
