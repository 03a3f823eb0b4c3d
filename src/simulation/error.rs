//! Errors raised by the simulation engine.

use thiserror::Error;

/// Everything that can go wrong while building, driving or querying a [`super::Circuit`].
///
/// None of these leave the circuit in an inconsistent state. An operation that fails validation changes nothing, and a
/// propagation that exceeds the depth limit stops where it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("unknown gate type '{0}'")]
    UnknownGateKind(String),

    #[error("name '{0}' is already in use")]
    DuplicateName(String),

    #[error("gate '{0}' not found")]
    GateNotFound(String),

    #[error("signal or gate '{0}' not found")]
    SourceNotFound(String),

    #[error("signal '{0}' not found")]
    SignalNotFound(String),

    #[error("input index {index} out of range for gate '{gate}' which has {arity} input(s)")]
    InputIndexOutOfRange { gate: String, index: usize, arity: usize },

    #[error("gate '{0}' is not a comparator")]
    NotAComparator(String),

    #[error("unknown comparator output '{0}', expected greater, equal or less")]
    UnknownComparatorOutput(String),

    #[error("gate '{gate}' has no output port '{port}'")]
    UnknownPort { gate: String, port: String },

    #[error("propagation through gate '{gate}' exceeded the depth limit of {limit}; is the circuit wired in a loop?")]
    PropagationTooDeep { gate: String, limit: usize },
}
