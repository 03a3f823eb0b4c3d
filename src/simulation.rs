//! The gate/wire propagation engine.
//!
//! A [`Circuit`] owns every gate in a slotmap arena and mediates all propagation: gates never refer to each other or to
//! the circuit, and wires store [`GateKey`]s into the arena.

pub(crate) mod circuit;
pub(crate) mod connections;
pub(crate) mod error;
pub(crate) mod kinds;
pub(crate) mod level;
pub(crate) mod logic;

pub use circuit::{Circuit, Gate, Link};
pub use error::SimulationError;
pub use kinds::GateKindTable;
pub use level::LogicLevel;
pub use logic::{ComparatorOutputs, GateKind, OutputPort};

slotmap::new_key_type! {
    pub struct GateKey;
    pub struct SignalKey;
}

pub(crate) type GateMap = slotmap::SlotMap<GateKey, Gate>;
pub(crate) type SignalMap = slotmap::SlotMap<SignalKey, circuit::Signal>;
