use thiserror::Error;

use crate::simulation::SimulationError;

/// Line of a command source that an error came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub source: String,
    pub line: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{location}: {kind}")]
pub struct CommandError {
    pub location: Location,
    pub kind: CommandErrorKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandErrorKind {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' is missing its {argument} argument")]
    MissingArgument { command: &'static str, argument: &'static str },

    #[error("unexpected extra argument '{token}' to '{command}'")]
    UnexpectedArgument { command: &'static str, token: String },

    #[error("{argument} must be a non-negative integer, got '{token}'")]
    BadNumber { argument: &'static str, token: String },

    #[error("logic level must be -1, 0 or 1, got '{0}'")]
    BadLevel(String),

    #[error("line is not valid UTF-8")]
    BadEncoding,

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

impl Location {
    pub fn new(source: &str, line: usize) -> Self {
        Self { source: source.to_string(), line }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}

pub(crate) trait Report {
    fn report(&self);
}

impl Report for CommandError {
    fn report(&self) {
        tracing::error!(source = %self.location.source, line = self.location.line, "{}", self.kind);
    }
}
