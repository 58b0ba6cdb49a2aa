use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Commercial positioning of a scanner pack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Economy,
    Mid,
    High,
    Premium,
    Specialized,
}

impl PriceTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Economy => "Eco",
            Self::Mid => "Media",
            Self::High => "Alta",
            Self::Premium => "Premium",
            Self::Specialized => "Especializada",
        }
    }
}

/// Clinical profile a scanner is primarily built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainUse {
    General,
    Restorative,
    Aesthetic,
    Mobility,
    Implantology,
    Entry,
}

impl MainUse {
    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Restorative => "Restauradora",
            Self::Aesthetic => "Estética",
            Self::Mobility => "Movilidad",
            Self::Implantology => "Implantología",
            Self::Entry => "Iniciación",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price_tier: PriceTier,
    pub main_use: MainUse,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub device: String,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price_tier: PriceTier,
        main_use: MainUse,
    ) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            price_tier,
            main_use,
            tagline: String::new(),
            description: String::new(),
            features: Vec::new(),
            image_url: None,
            device: String::new(),
        }
    }

    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = tagline.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn shares_price_tier(&self, other: &Product) -> bool {
        self.price_tier == other.price_tier
    }

    pub fn shares_main_use(&self, other: &Product) -> bool {
        self.main_use == other.main_use
    }
}
