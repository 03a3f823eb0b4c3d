//! Exhaustive truth tables for single gates.

use crate::{
    config::SimulationConfig,
    simulation::{Circuit, GateKind, GateKindTable, LogicLevel, OutputPort, SimulationError},
};

const GATE: &str = "gate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    pub kind: GateKind,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub inputs: Vec<LogicLevel>,
    pub outputs: Vec<(OutputPort, LogicLevel)>,
}

/// Every combination of low and high for `arity` inputs, counting in binary with the first input as the most
/// significant bit.
fn enumerate_inputs(arity: usize) -> Vec<Vec<LogicLevel>> {
    (0..1usize << arity).map(|n| (0..arity).rev().map(|bit| LogicLevel::from((n >> bit) & 1 == 1)).collect()).collect()
}

/// Drives a fresh gate of the kind named `kind` through every defined input combination.
pub fn truth_table(kinds: &GateKindTable, kind: &str) -> Result<TruthTable, SimulationError> {
    let mut circuit = Circuit::new(SimulationConfig::default().with_kinds(kinds.clone()));
    circuit.add_gate(kind, GATE)?;
    let gate_kind = circuit.gate(GATE).map(|gate| gate.kind()).ok_or_else(|| SimulationError::GateNotFound(GATE.to_string()))?;

    let ports: &[OutputPort] = match gate_kind {
        GateKind::OneBitComparator => &OutputPort::COMPARATOR,
        _ => &[OutputPort::Output],
    };

    let mut rows = Vec::new();
    for inputs in enumerate_inputs(gate_kind.arity()) {
        for (i, level) in inputs.iter().enumerate() {
            circuit.drive_gate(GATE, i, *level)?;
        }

        let outputs = ports
            .iter()
            .map(|&port| -> Result<(OutputPort, LogicLevel), SimulationError> {
                let level = match port {
                    OutputPort::Output => circuit.gate_output(GATE)?,
                    port => circuit.comparator_output(GATE, port.name())?,
                };
                Ok((port, level))
            })
            .collect::<Result<Vec<_>, _>>()?;

        rows.push(Row { inputs, outputs });
    }

    Ok(TruthTable { kind: gate_kind, rows })
}

fn label(port: OutputPort) -> &'static str {
    match port {
        OutputPort::Output => "Output",
        OutputPort::Greater => "Greater",
        OutputPort::Equal => "Equal",
        OutputPort::Less => "Less",
    }
}

impl std::fmt::Display for TruthTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.kind)?;
        for row in &self.rows {
            let inputs: Vec<_> = row.inputs.iter().enumerate().map(|(i, level)| format!("{} = {}", (b'A' + i as u8) as char, level)).collect();
            let outputs: Vec<_> = row.outputs.iter().map(|(port, level)| format!("{}: {}", label(*port), level)).collect();
            writeln!(f, "Input: {}; {}", inputs.join(", "), outputs.join(", "))?;
        }
        Ok(())
    }
}
