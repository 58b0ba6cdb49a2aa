use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, Questionnaire};
use crate::domain::product::Product;
use crate::domain::question::Question;

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

/// On-disk shape of a catalog: `[[products]]` followed by `[[questions]]`,
/// each question carrying `[[questions.choices]]` with a `weights` table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl CatalogFile {
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogLoadError::ReadFile { path: path.to_path_buf(), source })?;
        toml::from_str::<Self>(&raw)
            .map_err(|source| CatalogLoadError::ParseFile { path: path.to_path_buf(), source })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogLoadError> {
        Ok(toml::from_str::<Self>(raw)?)
    }

    pub fn into_parts(self) -> Result<(Catalog, Questionnaire), CatalogLoadError> {
        let catalog = Catalog::new(self.products)?;
        let questionnaire = Questionnaire::new(self.questions, &catalog)?;
        Ok((catalog, questionnaire))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::catalog::{CatalogError, CatalogFile, CatalogLoadError, CatalogSource};
    use crate::domain::product::{PriceTier, ProductId};

    const SMALL_CATALOG: &str = r#"
[[products]]
id = "a"
name = "Scanner A"
price_tier = "economy"
main_use = "general"
device = "Portátil certificado"

[[products]]
id = "b"
name = "Scanner B"
price_tier = "high"
main_use = "restorative"
features = ["Motor Gen 3"]

[[questions]]
id = "q1"
prompt = "¿Dónde?"

[[questions.choices]]
label = "Clínica"
weights = { a = 3 }

[[questions.choices]]
label = "Laboratorio"
weights = { b = 2, a = 1 }

[[questions]]
id = "q2"
prompt = "¿Qué valoras?"

[[questions.choices]]
label = "Precisión"
weights = { b = 5 }
"#;

    #[test]
    fn toml_catalog_parses_and_validates() {
        let (catalog, questionnaire) = CatalogFile::from_toml_str(SMALL_CATALOG)
            .and_then(CatalogFile::into_parts)
            .expect("catalog should load");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products()[1].price_tier, PriceTier::High);
        assert_eq!(questionnaire.len(), 2);
        let lab = &questionnaire.questions()[0].choices[1];
        assert_eq!(lab.weight_for(&ProductId::new("b")), 2);
        assert_eq!(lab.weight_for(&ProductId::new("a")), 1);
    }

    #[test]
    fn file_source_reports_validation_errors() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("catalog.toml");
        fs::write(&path, SMALL_CATALOG.replace("weights = { b = 5 }", "weights = { c = 5 }"))
            .expect("write catalog");

        let error = CatalogSource::File(path).load().expect_err("unknown product");
        assert!(matches!(
            error,
            CatalogLoadError::Invalid(CatalogError::UnknownProduct { ref question_id, .. })
                if question_id == "q2"
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().expect("tempdir");
        let error = CatalogFile::load(&dir.path().join("absent.toml")).expect_err("missing file");

        assert!(matches!(error, CatalogLoadError::ReadFile { .. }));
    }

    #[test]
    fn unknown_price_tier_is_a_parse_error() {
        let error = CatalogFile::from_toml_str(&SMALL_CATALOG.replace("\"economy\"", "\"luxury\""))
            .expect_err("unknown tier");

        assert!(matches!(error, CatalogLoadError::Parse(_)));
    }
}
