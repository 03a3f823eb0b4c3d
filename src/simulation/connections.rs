use std::collections::HashMap;

use crate::simulation::{error::SimulationError, level::LogicLevel, logic::OutputPort, GateKey, GateMap, SignalKey};

/// A point a wire can take its level from.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub(crate) enum Source {
    Signal(SignalKey),
    GateOutput(GateKey, OutputPort),
}

/// One gate input driven by a source.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub(crate) struct WireLink {
    pub(crate) gate: GateKey,
    pub(crate) input: usize,
}

/// Fanout table: every source with the links it drives, in the order they were registered.
pub(crate) struct Connections {
    dependants: HashMap<Source, Vec<WireLink>>,
}

impl Connections {
    pub(crate) fn new() -> Self {
        Self { dependants: HashMap::new() }
    }

    // caller is responsible for checking that the link's input is within the target's arity
    pub(crate) fn connect(&mut self, source: Source, link: WireLink) {
        self.dependants.entry(source).or_default().push(link);
    }

    pub(crate) fn dependants(&self, source: Source) -> &[WireLink] {
        self.dependants.get(&source).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn num_links(&self) -> usize {
        self.dependants.values().map(Vec::len).sum()
    }
}

/// Where a propagation cascade currently is, and how deep it may go.
#[derive(Clone, Copy)]
pub(crate) struct Propagation {
    depth: usize,
    limit: Option<usize>,
}

impl Propagation {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self { depth: 0, limit }
    }

    fn deeper(self) -> Self {
        Self { depth: self.depth + 1, ..self }
    }
}

/// Drives one gate input and, depth first, everything downstream of it.
///
/// Every output port of the gate is forwarded to its links after recomputation, whether or not its level changed.
pub(crate) fn drive_input(gates: &mut GateMap, connections: &Connections, propagation: Propagation, gate: GateKey, input: usize, level: LogicLevel) -> Result<(), SimulationError> {
    if let Some(limit) = propagation.limit {
        if propagation.depth >= limit {
            return Err(SimulationError::PropagationTooDeep { gate: gates[gate].name().to_string(), limit });
        }
    }

    gates[gate].drive_input(input, level)?;
    tracing::trace!(gate = gates[gate].name(), input, %level, depth = propagation.depth, "input driven");

    let kind = gates[gate].kind();
    for &port in kind.ports() {
        let Some(output) = gates[gate].port(port) else { continue };
        for link in connections.dependants(Source::GateOutput(gate, port)) {
            drive_input(gates, connections, propagation.deeper(), link.gate, link.input, output)?;
        }
    }

    Ok(())
}

/// Forwards `level` to every link of `source` in registration order.
pub(crate) fn drive_source(gates: &mut GateMap, connections: &Connections, propagation: Propagation, source: Source, level: LogicLevel) -> Result<(), SimulationError> {
    for link in connections.dependants(source) {
        drive_input(gates, connections, propagation, link.gate, link.input, level)?;
    }
    Ok(())
}
