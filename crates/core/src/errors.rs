use thiserror::Error;

use crate::catalog::{CatalogError, CatalogLoadError};
use crate::config::ConfigError;
use crate::flows::FlowTransitionError;
use crate::recommend::SessionError;
use crate::script::ScriptError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    FlowTransition(#[from] FlowTransitionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Caller-facing classification of a rejected conversation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    OutOfSequence,
    IndexOutOfRange,
    AlreadyCompleted,
    InvalidState,
    Invalid,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Session(SessionError::OutOfSequence { .. }) => ErrorKind::OutOfSequence,
            Self::Session(SessionError::IndexOutOfRange { .. }) => ErrorKind::IndexOutOfRange,
            Self::Session(SessionError::AlreadyCompleted) => ErrorKind::AlreadyCompleted,
            Self::Session(SessionError::InvalidState { .. }) | Self::FlowTransition(_) => {
                ErrorKind::InvalidState
            }
            Self::Session(SessionError::ScoreOverflow { .. })
            | Self::Session(SessionError::EmptyCatalog)
            | Self::Session(SessionError::QuestionnaireMismatch { .. })
            | Self::Session(SessionError::UnknownProduct { .. })
            | Self::Catalog(_) => ErrorKind::Invalid,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("catalog load failure: {0}")]
    CatalogLoad(String),
    #[error("script rendering failure: {0}")]
    Script(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "Esa opción no es válida ahora mismo. Elige una de las opciones mostradas.",
            Self::Internal { .. } => "Se ha producido un error inesperado. Empieza de nuevo, por favor.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl From<CatalogLoadError> for ApplicationError {
    fn from(value: CatalogLoadError) -> Self {
        Self::CatalogLoad(value.to_string())
    }
}

impl From<ScriptError> for ApplicationError {
    fn from(value: ScriptError) -> Self {
        Self::Script(value.to_string())
    }
}

impl From<ConfigError> for ApplicationError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(error) => match error.kind() {
                ErrorKind::Invalid => Self::Internal {
                    message: error.to_string(),
                    correlation_id: "unassigned".to_owned(),
                },
                _ => Self::BadRequest {
                    message: error.to_string(),
                    correlation_id: "unassigned".to_owned(),
                },
            },
            ApplicationError::CatalogLoad(message)
            | ApplicationError::Script(message)
            | ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError, ErrorKind, InterfaceError};
    use crate::flows::{ConversationEvent, ConversationState, FlowTransitionError};
    use crate::recommend::SessionError;

    #[test]
    fn session_errors_map_to_bad_request_interface_error() {
        let interface = ApplicationError::from(DomainError::from(SessionError::OutOfSequence {
            expected: 0,
            actual: 2,
        }))
        .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(interface.correlation_id(), "req-1");
    }

    #[test]
    fn bad_request_has_user_safe_message() {
        let interface =
            ApplicationError::from(DomainError::from(SessionError::AlreadyCompleted))
                .into_interface("req-2");

        assert_eq!(
            interface.user_message(),
            "Esa opción no es válida ahora mismo. Elige una de las opciones mostradas."
        );
    }

    #[test]
    fn flow_rejections_classify_as_invalid_state() {
        let error = DomainError::from(FlowTransitionError::InvalidTransition {
            state: ConversationState::Completed,
            event: ConversationEvent::AnswerSubmitted { question_index: 0, choice_index: 0 },
        });

        assert_eq!(error.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn script_error_maps_to_internal() {
        let interface =
            ApplicationError::Script("template `pick` failed".to_owned()).into_interface("req-4");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(
            interface.user_message(),
            "Se ha producido un error inesperado. Empieza de nuevo, por favor."
        );
    }
}
