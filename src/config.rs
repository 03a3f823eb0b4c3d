//! Configuration for a simulation run.

use crate::simulation::GateKindTable;

/// Default bound on how many gates a single drive may cascade through.
pub const DEFAULT_MAX_PROPAGATION_DEPTH: usize = 1024;

/// Settings a [`crate::simulation::Circuit`] is created with.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Maximum length of a propagation cascade, counted in gates.
    ///
    /// A circuit wired in a loop recurses forever. With a limit the drive that reaches it fails with
    /// `PropagationTooDeep` instead of overflowing the stack. `None` removes the limit.
    pub max_propagation_depth: Option<usize>,

    /// Kind names accepted when adding gates.
    pub kinds: GateKindTable,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { max_propagation_depth: Some(DEFAULT_MAX_PROPAGATION_DEPTH), kinds: GateKindTable::standard() }
    }
}

impl SimulationConfig {
    /// A limit of 0 rejects every drive, even of a gate with nothing wired to it.
    pub fn with_max_propagation_depth(self, max_propagation_depth: usize) -> Self {
        Self { max_propagation_depth: Some(max_propagation_depth), ..self }
    }

    /// Removes the propagation depth limit. Cyclic wiring then overflows the stack.
    pub fn without_depth_limit(self) -> Self {
        Self { max_propagation_depth: None, ..self }
    }

    pub fn with_kinds(self, kinds: GateKindTable) -> Self {
        Self { kinds, ..self }
    }
}
