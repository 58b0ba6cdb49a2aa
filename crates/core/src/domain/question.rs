use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

/// One answer option. Products missing from `weights` receive nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    #[serde(default)]
    pub weights: BTreeMap<ProductId, u32>,
}

impl Choice {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), weights: BTreeMap::new() }
    }

    pub fn with_weight(mut self, product_id: impl Into<String>, weight: u32) -> Self {
        self.weights.insert(ProductId::new(product_id), weight);
        self
    }

    pub fn weight_for(&self, product_id: &ProductId) -> u32 {
        self.weights.get(product_id).copied().unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub choices: Vec<Choice>,
}

impl Question {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self { id: id.into(), prompt: prompt.into(), choices }
    }

    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::product::ProductId;
    use crate::domain::question::{Choice, Question};

    #[test]
    fn absent_weight_keys_count_as_zero() {
        let choice = Choice::new("Laboratorio").with_weight("medit_i900_classic", 3);

        assert_eq!(choice.weight_for(&ProductId::new("medit_i900_classic")), 3);
        assert_eq!(choice.weight_for(&ProductId::new("panda_smart")), 0);
    }

    #[test]
    fn choice_lookup_is_bounds_checked() {
        let question = Question::new("budget", "¿Inversión?", vec![Choice::new("Eco")]);

        assert!(question.choice(0).is_some());
        assert!(question.choice(1).is_none());
    }
}
