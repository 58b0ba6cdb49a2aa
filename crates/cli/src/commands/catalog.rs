use std::path::PathBuf;

use serde_json::json;

use crate::commands::{catalog_overrides, load_config, load_engine, CommandResult};

pub fn run(catalog: Option<PathBuf>) -> CommandResult {
    let config = match load_config(catalog_overrides(catalog)) {
        Ok(config) => config,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("catalog", error_class, message, exit_code)
        }
    };
    let engine = match load_engine(&config) {
        Ok(engine) => engine,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("catalog", error_class, message, exit_code)
        }
    };

    let products = engine
        .catalog()
        .products()
        .iter()
        .map(|product| {
            json!({
                "id": product.id,
                "name": product.name,
                "price_tier": product.price_tier.label(),
                "main_use": product.main_use.label(),
                "device": product.device,
            })
        })
        .collect::<Vec<_>>();
    let questions = engine
        .questionnaire()
        .questions()
        .iter()
        .map(|question| {
            json!({
                "id": question.id,
                "prompt": question.prompt,
                "choices": question.choices.iter().map(|choice| choice.label.as_str()).collect::<Vec<_>>(),
            })
        })
        .collect::<Vec<_>>();

    let policy = engine.policy();
    CommandResult::success_with_data(
        "catalog",
        format!(
            "catalog {} is valid: {} products, {} questions",
            config.catalog_source().describe(),
            products.len(),
            questions.len()
        ),
        Some(json!({
            "products": products,
            "questions": questions,
            "alternative_policy": {
                "price_tier_window": policy.price_tier_window,
                "near_tie_window": policy.near_tie_window,
            },
        })),
    )
}
