//! Interactive terminal chat.
//!
//! Bot messages are printed one at a time with a simulated typing pause.
//! Choices are picked by number; `reiniciar` starts over at any point.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use advisor_core::config::{ConfigOverrides, PresentationConfig};
use advisor_core::errors::ApplicationError;
use advisor_core::script::{ChatMessage, ChatPayload, RevealScript, Sender};
use advisor_core::{Conversation, DomainError};
use anyhow::{Context, Result};
use rand::Rng;
use uuid::Uuid;

use crate::commands::{load_config, load_engine, CommandResult};
use crate::logging::TracingAuditSink;

const RESTART_KEYWORD: &str = "reiniciar";

#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub no_delay: bool,
    pub catalog: Option<PathBuf>,
}

pub fn run(options: ChatOptions) -> CommandResult {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with_io(options, stdin.lock(), stdout.lock())
}

pub fn run_with_io<R: BufRead, W: Write>(options: ChatOptions, input: R, output: W) -> CommandResult {
    let overrides = ConfigOverrides {
        catalog_path: options.catalog,
        presentation_enabled: options.no_delay.then_some(false),
        ..ConfigOverrides::default()
    };
    let config = match load_config(overrides) {
        Ok(config) => config,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("chat", error_class, message, exit_code)
        }
    };
    let engine = match load_engine(&config) {
        Ok(engine) => engine,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("chat", error_class, message, exit_code)
        }
    };
    let script = match RevealScript::new(config.presentation.brand.clone()) {
        Ok(script) => script,
        Err(error) => return CommandResult::failure("chat", "script_render", error.to_string(), 5),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let correlation_id = Uuid::new_v4().to_string();
    let conversation =
        Conversation::new(engine).with_audit_sink(Arc::new(TracingAuditSink), correlation_id.clone());
    let mut chat = ChatSession {
        conversation,
        script,
        pacing: Pacing::from(&config.presentation),
        correlation_id,
        input,
        output,
    };

    match runtime.block_on(chat.converse()) {
        Ok(()) => CommandResult::interactive(0),
        Err(error) => {
            tracing::error!(
                event_name = "advisor.chat.failed",
                correlation_id = %chat.correlation_id,
                error = %format!("{error:#}"),
                "chat session aborted"
            );
            CommandResult::failure("chat", "chat_io", format!("{error:#}"), 6)
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pacing {
    enabled: bool,
    delay_ms: u64,
    jitter_ms: u64,
}

impl From<&PresentationConfig> for Pacing {
    fn from(config: &PresentationConfig) -> Self {
        Self {
            enabled: config.enabled,
            delay_ms: config.typing_delay_ms,
            jitter_ms: config.typing_jitter_ms,
        }
    }
}

impl Pacing {
    async fn pause(&self) {
        if !self.enabled {
            return;
        }
        let jitter = if self.jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.jitter_ms)
        };
        tokio::time::sleep(Duration::from_millis(self.delay_ms + jitter)).await;
    }
}

enum Reply {
    Choice(usize),
    Restart,
    Unreadable,
    Closed,
}

struct ChatSession<R, W> {
    conversation: Conversation,
    script: RevealScript,
    pacing: Pacing,
    correlation_id: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ChatSession<R, W> {
    async fn converse(&mut self) -> Result<()> {
        loop {
            self.start().await?;
            if !self.answer_questions().await? {
                return Ok(());
            }
            if !self.offer_restart()? {
                return Ok(());
            }
            self.restart()?;
        }
    }

    async fn start(&mut self) -> Result<()> {
        self.conversation.begin().map_err(|error| self.domain_failure(error))?;
        tracing::info!(
            event_name = "advisor.chat.started",
            correlation_id = %self.correlation_id,
            session_id = %self.conversation.session().id(),
            "chat session started"
        );

        for message in self.script.welcome_messages()? {
            self.pacing.pause().await;
            self.show(&message)?;
        }
        Ok(())
    }

    /// Returns `false` when input ends before the questionnaire does.
    async fn answer_questions(&mut self) -> Result<bool> {
        loop {
            let Some((question_index, question)) = self.conversation.current_question() else {
                return Ok(true);
            };
            let prompt = self.script.question_message(question);
            let labels = question.choices.iter().map(|choice| choice.label.clone()).collect::<Vec<_>>();

            self.show(&prompt)?;
            for (number, label) in labels.iter().enumerate() {
                writeln!(self.output, "   {}. {label}", number + 1)?;
            }
            self.output.flush()?;

            let choice_index = match self.read_reply()? {
                Reply::Choice(index) => index,
                Reply::Restart => {
                    self.restart()?;
                    self.start().await?;
                    continue;
                }
                Reply::Unreadable => {
                    writeln!(self.output, "{}", invalid_choice_hint())?;
                    continue;
                }
                Reply::Closed => return Ok(false),
            };

            let step = match self.conversation.submit_answer(question_index, choice_index) {
                Ok(step) => step,
                Err(error) => {
                    let interface = ApplicationError::from(error).into_interface(&self.correlation_id);
                    writeln!(self.output, "{}", interface.user_message())?;
                    continue;
                }
            };
            if let Some(label) = labels.get(choice_index) {
                self.show(&ChatMessage::user(label.clone()))?;
            }

            if let Some(recommendation) = step.recommendation {
                tracing::info!(
                    event_name = "advisor.chat.recommended",
                    correlation_id = %self.correlation_id,
                    session_id = %self.conversation.session().id(),
                    winner = %recommendation.winner.id,
                    winner_score = recommendation.winner_score,
                    "recommendation revealed"
                );
                for message in self.script.messages(&recommendation)? {
                    self.pacing.pause().await;
                    self.show(&message)?;
                }
            }
        }
    }

    fn offer_restart(&mut self) -> Result<bool> {
        writeln!(self.output)?;
        writeln!(self.output, "¿Quieres empezar de nuevo? (s/n)")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("failed to read restart answer")?;
        let answer = line.trim().to_lowercase();
        Ok(read > 0 && matches!(answer.as_str(), "s" | "si" | "sí" | RESTART_KEYWORD))
    }

    fn restart(&mut self) -> Result<()> {
        self.conversation.restart().map_err(|error| self.domain_failure(error))?;
        writeln!(self.output)?;
        Ok(())
    }

    fn read_reply(&mut self) -> Result<Reply> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("failed to read answer")?;
        if read == 0 {
            return Ok(Reply::Closed);
        }

        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case(RESTART_KEYWORD) {
            return Ok(Reply::Restart);
        }
        Ok(match trimmed.parse::<usize>() {
            Ok(number) if number > 0 => Reply::Choice(number - 1),
            _ => Reply::Unreadable,
        })
    }

    fn show(&mut self, message: &ChatMessage) -> Result<()> {
        let body = render_payload(&message.payload);
        match message.sender {
            Sender::Bot => writeln!(self.output, "\n{body}")?,
            Sender::User => writeln!(self.output, "  > {body}")?,
        }
        self.output.flush().context("failed to flush chat output")
    }

    fn domain_failure(&self, error: DomainError) -> anyhow::Error {
        anyhow::Error::new(ApplicationError::from(error))
            .context(format!("conversation {} rejected a transition", self.correlation_id))
    }
}

fn invalid_choice_hint() -> &'static str {
    "Responde con el número de una de las opciones mostradas."
}

/// Plain-text rendering of a payload for the terminal.
pub fn render_payload(payload: &ChatPayload) -> String {
    match payload {
        ChatPayload::PlainText(text) => text.clone(),
        ChatPayload::Recommendation(card) => format!(
            "{}\n👉 {}\n\nIncluye:\n- Escáner: {}\n- Dispositivo: {}\n- {}\n\n{}",
            card.intro, card.pack_name, card.scanner, card.device, card.training, card.closing
        ),
        ChatPayload::ImageReference { url, alt } => format!("[imagen: {alt}] {url}"),
    }
}

#[cfg(test)]
mod tests {
    use advisor_core::script::{ChatPayload, RecommendationCard};

    use super::render_payload;

    #[test]
    fn card_renders_pack_contents() {
        let rendered = render_payload(&ChatPayload::Recommendation(RecommendationCard {
            intro: "Gracias por la información.".to_string(),
            pack_name: "Pack Panda Smart".to_string(),
            scanner: "Panda Smart".to_string(),
            device: "Portátil".to_string(),
            training: "Formación AldraScan adaptada a tu clínica".to_string(),
            closing: "Listo.".to_string(),
        }));

        assert!(rendered.contains("👉 Pack Panda Smart"));
        assert!(rendered.contains("- Escáner: Panda Smart"));
        assert!(rendered.contains("- Formación AldraScan adaptada a tu clínica"));
    }

    #[test]
    fn image_renders_alt_and_url() {
        let rendered = render_payload(&ChatPayload::ImageReference {
            url: "https://img.example/p.png".to_string(),
            alt: "Panda Smart".to_string(),
        });

        assert_eq!(rendered, "[imagen: Panda Smart] https://img.example/p.png");
    }
}
