//! Types for the Recommendation Engine

use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// How far below the winner a product may score and still be offered as the alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativePolicy {
    /// Window for a product in a different price tier (default: 3)
    pub price_tier_window: u32,
    /// Window for the runner-up regardless of tier (default: 1)
    pub near_tie_window: u32,
}

impl Default for AlternativePolicy {
    fn default() -> Self {
        super::DEFAULT_ALTERNATIVE_POLICY
    }
}

/// A catalog product with its final score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedProduct {
    pub product: Product,
    pub score: u32,
}

/// Which selection rule produced the alternative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeReason {
    /// Scored close to the winner in a different price tier
    DifferentPriceTier,
    /// Runner-up scored almost exactly like the winner
    NearTie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub product: Product,
    pub score: u32,
    pub reason: AlternativeReason,
}

/// Final outcome of a completed session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub winner: Product,
    pub winner_score: u32,
    pub alternative: Option<Alternative>,
    /// Every catalog product, best first; ties keep catalog order
    pub ranking: Vec<RankedProduct>,
}

impl Recommendation {
    pub fn score_of(&self, product_id: &crate::domain::product::ProductId) -> Option<u32> {
        self.ranking.iter().find(|entry| &entry.product.id == product_id).map(|entry| entry.score)
    }
}
