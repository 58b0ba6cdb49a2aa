//! Chat script: the welcome lines, question prompts and the reveal sequence
//! shown once a recommendation is available.
//!
//! The script only produces messages. Pacing them (typing indicators, delays)
//! is left to whoever displays them.

mod templates;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use thiserror::Error;

use crate::domain::product::Product;
use crate::domain::question::Question;
use crate::recommend::{Alternative, Recommendation};

pub const DEFAULT_BRAND: &str = "AldraScan";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Bot,
    User,
}

/// The recommended pack as a structured card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationCard {
    pub intro: String,
    pub pack_name: String,
    pub scanner: String,
    pub device: String,
    pub training: String,
    pub closing: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum ChatPayload {
    PlainText(String),
    Recommendation(RecommendationCard),
    ImageReference { url: String, alt: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub payload: ChatPayload,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn bot(payload: ChatPayload) -> Self {
        Self { sender: Sender::Bot, payload, sent_at: Utc::now() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, payload: ChatPayload::PlainText(text.into()), sent_at: Utc::now() }
    }
}

/// One message of the reveal sequence, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    Analysis,
    Pick,
    Training,
    ProductImage,
    MarketContext,
    Alternative,
    NextSteps,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("template `{name}` failed to render: {source}")]
    Render {
        name: &'static str,
        #[source]
        source: tera::Error,
    },
    #[error("invalid script templates: {0}")]
    Templates(#[source] tera::Error),
    #[error("step `{0:?}` has nothing to show for this recommendation")]
    StepNotApplicable(ScriptStep),
}

pub struct RevealScript {
    tera: Tera,
    brand: String,
}

impl RevealScript {
    pub fn new(brand: impl Into<String>) -> Result<Self, ScriptError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates::TEMPLATES.to_vec()).map_err(ScriptError::Templates)?;
        Ok(Self { tera, brand: brand.into() })
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn welcome_messages(&self) -> Result<Vec<ChatMessage>, ScriptError> {
        let context = self.base_context();
        [templates::WELCOME_GREETING, templates::WELCOME_PACK, templates::WELCOME_START]
            .into_iter()
            .map(|name| self.render_text(name, &context).map(ChatPayload::PlainText).map(ChatMessage::bot))
            .collect()
    }

    pub fn question_message(&self, question: &Question) -> ChatMessage {
        ChatMessage::bot(ChatPayload::PlainText(question.prompt.clone()))
    }

    /// Steps to show for `recommendation`; `Alternative` only when there is one.
    pub fn steps(&self, recommendation: &Recommendation) -> Vec<ScriptStep> {
        let mut steps = vec![
            ScriptStep::Analysis,
            ScriptStep::Pick,
            ScriptStep::Training,
            ScriptStep::ProductImage,
            ScriptStep::MarketContext,
        ];
        if recommendation.alternative.is_some() {
            steps.push(ScriptStep::Alternative);
        }
        steps.push(ScriptStep::NextSteps);
        steps
    }

    pub fn render(
        &self,
        step: ScriptStep,
        recommendation: &Recommendation,
    ) -> Result<ChatPayload, ScriptError> {
        let context = self.base_context();
        let winner = &recommendation.winner;
        let payload = match step {
            ScriptStep::Analysis => ChatPayload::PlainText(self.render_text(templates::ANALYSIS, &context)?),
            ScriptStep::Pick => ChatPayload::Recommendation(self.card(winner, &context)?),
            ScriptStep::Training => ChatPayload::PlainText(self.render_text(templates::TRAINING, &context)?),
            ScriptStep::ProductImage => match &winner.image_url {
                Some(url) => ChatPayload::ImageReference { url: url.clone(), alt: winner.name.clone() },
                None => ChatPayload::PlainText(winner.name.clone()),
            },
            ScriptStep::MarketContext => ChatPayload::PlainText(self.render_text(templates::MARKET, &context)?),
            ScriptStep::Alternative => {
                let alternative = recommendation
                    .alternative
                    .as_ref()
                    .ok_or(ScriptError::StepNotApplicable(step))?;
                let mut context = context;
                insert_alternative(&mut context, winner, alternative);
                ChatPayload::PlainText(self.render_text(templates::ALTERNATIVE, &context)?)
            }
            ScriptStep::NextSteps => ChatPayload::PlainText(self.render_text(templates::NEXT_STEPS, &context)?),
        };
        Ok(payload)
    }

    /// The whole reveal sequence for `recommendation`.
    pub fn messages(&self, recommendation: &Recommendation) -> Result<Vec<ChatMessage>, ScriptError> {
        self.steps(recommendation)
            .into_iter()
            .map(|step| self.render(step, recommendation).map(ChatMessage::bot))
            .collect()
    }

    fn card(&self, winner: &Product, context: &Context) -> Result<RecommendationCard, ScriptError> {
        Ok(RecommendationCard {
            intro: self.render_text(templates::PICK_INTRO, context)?,
            pack_name: format!("Pack {}", winner.name),
            scanner: winner.name.clone(),
            device: winner.device.clone(),
            training: self.render_text(templates::PICK_TRAINING, context)?,
            closing: self.render_text(templates::PICK_CLOSING, context)?,
        })
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("brand", &self.brand);
        context
    }

    fn render_text(&self, name: &'static str, context: &Context) -> Result<String, ScriptError> {
        self.tera.render(name, context).map_err(|source| ScriptError::Render { name, source })
    }
}

fn insert_alternative(context: &mut Context, winner: &Product, alternative: &Alternative) {
    let candidate = &alternative.product;
    let similarity = if winner.shares_main_use(candidate) {
        format!("su enfoque en {}", candidate.main_use.label().to_lowercase())
    } else {
        "rendimiento general".to_string()
    };
    let difference = if winner.shares_price_tier(candidate) {
        "su diseño específico".to_string()
    } else {
        format!("su categoría ({})", candidate.price_tier.label())
    };

    context.insert("alternative_name", &candidate.name);
    context.insert("similarity", &similarity);
    context.insert("difference", &difference);
}
