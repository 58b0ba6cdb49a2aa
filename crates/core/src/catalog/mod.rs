//! Static product catalog and the ordered questionnaire that scores it.
//!
//! Both are built once at startup, validated against each other, and never
//! mutated afterwards. Definition order matters: it is the tie-break order
//! used when ranking products with equal scores.

mod file;
mod seeds;

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::product::{Product, ProductId};
use crate::domain::question::Question;

pub use file::{CatalogFile, CatalogLoadError};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog must define at least one product")]
    NoProducts,
    #[error("duplicate product id `{0}`")]
    DuplicateProduct(ProductId),
    #[error("questionnaire must define at least one question")]
    NoQuestions,
    #[error("duplicate question id `{0}`")]
    DuplicateQuestion(String),
    #[error("question `{question_id}` has no choices")]
    EmptyQuestion { question_id: String },
    #[error("question `{question_id}` choice {choice_index} weights unknown product `{product_id}`")]
    UnknownProduct { question_id: String, choice_index: usize, product_id: ProductId },
    #[error("question `{question_id}` choice {choice_index} gives zero weight to `{product_id}`")]
    ZeroWeight { question_id: String, choice_index: usize, product_id: ProductId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::NoProducts);
        }

        let mut seen = BTreeSet::new();
        for product in &products {
            if !seen.insert(product.id.clone()) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }

        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.find(product_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Questionnaire {
    questions: Vec<Question>,
}

impl Questionnaire {
    /// Builds a questionnaire whose every weight points at a product of `catalog`.
    pub fn new(questions: Vec<Question>, catalog: &Catalog) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::NoQuestions);
        }

        let mut seen = BTreeSet::new();
        for question in &questions {
            if !seen.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
            if question.choices.is_empty() {
                return Err(CatalogError::EmptyQuestion { question_id: question.id.clone() });
            }

            for (choice_index, choice) in question.choices.iter().enumerate() {
                for (product_id, weight) in &choice.weights {
                    if !catalog.contains(product_id) {
                        return Err(CatalogError::UnknownProduct {
                            question_id: question.id.clone(),
                            choice_index,
                            product_id: product_id.clone(),
                        });
                    }
                    if *weight == 0 {
                        return Err(CatalogError::ZeroWeight {
                            question_id: question.id.clone(),
                            choice_index,
                            product_id: product_id.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Where the catalog and questionnaire come from at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CatalogSource {
    #[default]
    Builtin,
    File(PathBuf),
}

impl CatalogSource {
    pub fn load(&self) -> Result<(Catalog, Questionnaire), CatalogLoadError> {
        match self {
            Self::Builtin => Ok(builtin()?),
            Self::File(path) => CatalogFile::load(path)?.into_parts(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Builtin => "builtin".to_string(),
            Self::File(path) => format!("file ({})", path.display()),
        }
    }
}

/// The intraoral scanner packs and the eight-question interview shipped with the advisor.
pub fn builtin() -> Result<(Catalog, Questionnaire), CatalogError> {
    let catalog = Catalog::new(seeds::products())?;
    let questionnaire = Questionnaire::new(seeds::questions(), &catalog)?;
    Ok((catalog, questionnaire))
}

#[cfg(test)]
mod tests {
    use crate::catalog::{builtin, Catalog, CatalogError, Questionnaire};
    use crate::domain::product::{MainUse, PriceTier, Product, ProductId};
    use crate::domain::question::{Choice, Question};

    fn two_products() -> Catalog {
        Catalog::new(vec![
            Product::new("a", "A", PriceTier::Economy, MainUse::General),
            Product::new("b", "B", PriceTier::High, MainUse::General),
        ])
        .expect("valid catalog")
    }

    #[test]
    fn builtin_catalog_is_valid_and_ordered() {
        let (catalog, questionnaire) = builtin().expect("builtin catalog should validate");

        assert_eq!(catalog.len(), 7);
        assert_eq!(questionnaire.len(), 8);
        assert_eq!(catalog.products()[0].id, ProductId::new("medit_i700"));
        assert_eq!(catalog.products()[6].id, ProductId::new("panda_smart"));
        assert_eq!(questionnaire.questions()[2].choices.len(), 4);
    }

    #[test]
    fn empty_and_duplicate_products_are_rejected() {
        assert_eq!(Catalog::new(Vec::new()), Err(CatalogError::NoProducts));

        let duplicate = Catalog::new(vec![
            Product::new("a", "A", PriceTier::Economy, MainUse::General),
            Product::new("a", "A again", PriceTier::High, MainUse::General),
        ]);
        assert_eq!(duplicate, Err(CatalogError::DuplicateProduct(ProductId::new("a"))));
    }

    #[test]
    fn questionnaire_rejects_weights_for_unknown_products() {
        let catalog = two_products();
        let error = Questionnaire::new(
            vec![Question::new("q1", "?", vec![Choice::new("x").with_weight("zzz", 2)])],
            &catalog,
        )
        .expect_err("unknown product must be rejected");

        assert!(matches!(
            error,
            CatalogError::UnknownProduct { ref product_id, choice_index: 0, .. }
                if product_id.as_str() == "zzz"
        ));
    }

    #[test]
    fn questionnaire_rejects_zero_weights_and_empty_questions() {
        let catalog = two_products();

        let zero = Questionnaire::new(
            vec![Question::new("q1", "?", vec![Choice::new("x").with_weight("a", 0)])],
            &catalog,
        );
        assert!(matches!(zero, Err(CatalogError::ZeroWeight { .. })));

        let empty = Questionnaire::new(vec![Question::new("q1", "?", Vec::new())], &catalog);
        assert_eq!(empty, Err(CatalogError::EmptyQuestion { question_id: "q1".to_string() }));

        assert_eq!(Questionnaire::new(Vec::new(), &catalog), Err(CatalogError::NoQuestions));
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let catalog = two_products();
        let result = Questionnaire::new(
            vec![
                Question::new("q1", "?", vec![Choice::new("x")]),
                Question::new("q1", "??", vec![Choice::new("y")]),
            ],
            &catalog,
        );

        assert_eq!(result, Err(CatalogError::DuplicateQuestion("q1".to_string())));
    }
}
