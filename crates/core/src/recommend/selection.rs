//! Ranking and alternative selection

use std::collections::BTreeMap;

use super::types::*;
use crate::catalog::Catalog;
use crate::domain::product::ProductId;

/// Orders every catalog product by score, best first.
///
/// The sort is stable over catalog order, so products with equal scores keep
/// the order in which the catalog defines them.
pub fn rank_products(catalog: &Catalog, scores: &BTreeMap<ProductId, u32>) -> Vec<RankedProduct> {
    let mut ranking = catalog
        .products()
        .iter()
        .map(|product| RankedProduct {
            product: product.clone(),
            score: scores.get(&product.id).copied().unwrap_or(0),
        })
        .collect::<Vec<_>>();

    ranking.sort_by(|a, b| b.score.cmp(&a.score));
    ranking
}

/// Picks a secondary recommendation from a ranking whose first entry is the winner.
///
/// Rules, first match wins:
/// 1. the highest-ranked product within `price_tier_window` of the winner
///    whose price tier differs from the winner's;
/// 2. the runner-up, when within `near_tie_window` of the winner;
/// 3. nothing.
pub fn select_alternative(
    ranking: &[RankedProduct],
    policy: &AlternativePolicy,
) -> Option<Alternative> {
    let (winner, rest) = ranking.split_first()?;

    let tier_floor = winner.score.saturating_sub(policy.price_tier_window);
    let different_tier = rest.iter().find(|candidate| {
        candidate.score >= tier_floor && !candidate.product.shares_price_tier(&winner.product)
    });
    if let Some(candidate) = different_tier {
        return Some(Alternative {
            product: candidate.product.clone(),
            score: candidate.score,
            reason: AlternativeReason::DifferentPriceTier,
        });
    }

    // Runner-up fallback ignores price tier entirely.
    let near_tie_floor = winner.score.saturating_sub(policy.near_tie_window);
    rest.first().filter(|runner_up| runner_up.score >= near_tie_floor).map(|runner_up| {
        Alternative {
            product: runner_up.product.clone(),
            score: runner_up.score,
            reason: AlternativeReason::NearTie,
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::product::{MainUse, PriceTier, Product};

    fn catalog(entries: &[(&str, PriceTier)]) -> Catalog {
        Catalog::new(
            entries
                .iter()
                .map(|(id, tier)| Product::new(*id, id.to_uppercase(), *tier, MainUse::General))
                .collect(),
        )
        .expect("catalog")
    }

    fn scores(entries: &[(&str, u32)]) -> BTreeMap<ProductId, u32> {
        entries.iter().map(|(id, score)| (ProductId::new(*id), *score)).collect()
    }

    fn ids(ranking: &[RankedProduct]) -> Vec<&str> {
        ranking.iter().map(|entry| entry.product.id.as_str()).collect()
    }

    #[test]
    fn ranking_sorts_descending_and_keeps_catalog_order_on_ties() {
        let catalog = catalog(&[
            ("first", PriceTier::Mid),
            ("second", PriceTier::Mid),
            ("third", PriceTier::Mid),
            ("fourth", PriceTier::Mid),
        ]);
        let ranking =
            rank_products(&catalog, &scores(&[("first", 2), ("second", 7), ("third", 2), ("fourth", 7)]));

        assert_eq!(ids(&ranking), vec!["second", "fourth", "first", "third"]);
    }

    #[test]
    fn missing_scores_rank_as_zero() {
        let catalog = catalog(&[("a", PriceTier::Mid), ("b", PriceTier::High)]);
        let ranking = rank_products(&catalog, &scores(&[("b", 1)]));

        assert_eq!(ids(&ranking), vec!["b", "a"]);
        assert_eq!(ranking[1].score, 0);
    }

    #[test]
    fn different_tier_within_three_points_wins_over_closer_same_tier_runner_up() {
        let catalog = catalog(&[
            ("winner", PriceTier::Premium),
            ("same_tier", PriceTier::Premium),
            ("cheaper", PriceTier::Economy),
        ]);
        let ranking =
            rank_products(&catalog, &scores(&[("winner", 10), ("same_tier", 10), ("cheaper", 7)]));

        let alternative =
            select_alternative(&ranking, &AlternativePolicy::default()).expect("alternative");
        assert_eq!(alternative.product.id.as_str(), "cheaper");
        assert_eq!(alternative.reason, AlternativeReason::DifferentPriceTier);
    }

    #[test]
    fn runner_up_within_one_point_is_used_when_no_other_tier_qualifies() {
        let catalog = catalog(&[
            ("winner", PriceTier::High),
            ("second", PriceTier::High),
            ("far", PriceTier::Economy),
        ]);
        let ranking = rank_products(&catalog, &scores(&[("winner", 10), ("second", 9), ("far", 6)]));

        let alternative =
            select_alternative(&ranking, &AlternativePolicy::default()).expect("alternative");
        assert_eq!(alternative.product.id.as_str(), "second");
        assert_eq!(alternative.score, 9);
        assert_eq!(alternative.reason, AlternativeReason::NearTie);
    }

    #[test]
    fn no_alternative_when_everything_is_far_or_same_tier() {
        let catalog = catalog(&[
            ("winner", PriceTier::High),
            ("second", PriceTier::High),
            ("third", PriceTier::Economy),
        ]);
        let ranking = rank_products(&catalog, &scores(&[("winner", 10), ("second", 8), ("third", 5)]));

        assert_eq!(select_alternative(&ranking, &AlternativePolicy::default()), None);
    }

    #[test]
    fn single_product_catalog_has_no_alternative() {
        let catalog = catalog(&[("only", PriceTier::Mid)]);
        let ranking = rank_products(&catalog, &scores(&[("only", 4)]));

        assert_eq!(select_alternative(&ranking, &AlternativePolicy::default()), None);
        assert_eq!(select_alternative(&[], &AlternativePolicy::default()), None);
    }

    #[test]
    fn low_winner_scores_do_not_underflow_the_window() {
        let catalog = catalog(&[("a", PriceTier::Mid), ("b", PriceTier::Economy)]);
        let ranking = rank_products(&catalog, &scores(&[("a", 2)]));

        let alternative =
            select_alternative(&ranking, &AlternativePolicy::default()).expect("alternative");
        assert_eq!(alternative.product.id.as_str(), "b");
        assert_eq!(alternative.score, 0);
    }

    #[test]
    fn custom_windows_change_eligibility() {
        let catalog = catalog(&[("a", PriceTier::Mid), ("b", PriceTier::Economy)]);
        let ranking = rank_products(&catalog, &scores(&[("a", 10), ("b", 6)]));

        assert_eq!(select_alternative(&ranking, &AlternativePolicy::default()), None);
        let wide = AlternativePolicy { price_tier_window: 4, near_tie_window: 1 };
        assert!(select_alternative(&ranking, &wide).is_some());
    }
}
