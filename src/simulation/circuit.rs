use std::collections::HashMap;

use crate::{
    config::SimulationConfig,
    simulation::{
        connections::{self, Connections, Propagation, Source, WireLink},
        error::SimulationError,
        level::LogicLevel,
        logic::{ComparatorOutputs, GateKind, GateLogic, OutputPort},
        GateKey, GateMap, SignalKey, SignalMap,
    },
};

/// A named gate, owned by the [`Circuit`] that created it.
#[derive(Clone, Debug)]
pub struct Gate {
    name: String,
    logic: GateLogic,
}

pub(crate) struct Signal {
    name: String,
    level: LogicLevel,
}

/// A downstream gate input, as reported by [`Circuit::links`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Link<'c> {
    pub gate: &'c str,
    pub input: usize,
}

#[derive(Clone, Copy)]
enum Name {
    Gate(GateKey),
    Signal(SignalKey),
}

/// Registry of gates and signals by name, plus the wiring between them.
pub struct Circuit {
    config: SimulationConfig,
    gates: GateMap,
    signals: SignalMap,
    names: HashMap<String, Name>,
    // insertion order, so that diagnostics are deterministic
    order: Vec<GateKey>,
    connections: Connections,
    watched: Vec<GateKey>,
}

impl Gate {
    pub(crate) fn new(name: String, kind: GateKind) -> Gate {
        Gate { name, logic: GateLogic::new(kind) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> GateKind {
        self.logic.kind()
    }
    pub fn inputs(&self) -> &[LogicLevel] {
        self.logic.inputs()
    }

    /// The primary output. Always undefined for a comparator, whose results are on its named ports.
    pub fn output(&self) -> LogicLevel {
        self.logic.output(OutputPort::Output).unwrap_or_default()
    }
    pub fn port(&self, port: OutputPort) -> Option<LogicLevel> {
        self.logic.output(port)
    }
    pub fn comparator_outputs(&self) -> Option<ComparatorOutputs> {
        self.logic.comparator_outputs()
    }

    /// Sets one input and recomputes the outputs. Does not propagate anything; that is the circuit's job.
    pub(crate) fn drive_input(&mut self, index: usize, level: LogicLevel) -> Result<(), SimulationError> {
        if self.logic.set_input(index, level) {
            Ok(())
        } else {
            Err(SimulationError::InputIndexOutOfRange { gate: self.name.clone(), index, arity: self.logic.inputs().len() })
        }
    }
}

impl Circuit {
    pub fn new(config: SimulationConfig) -> Circuit {
        Circuit { config, gates: GateMap::with_key(), signals: SignalMap::with_key(), names: HashMap::new(), order: Vec::new(), connections: Connections::new(), watched: Vec::new() }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    // building {{{1
    /// Creates a gate of the kind registered under `kind` in the configured kind table.
    ///
    /// Names are unique across gates and signals; reusing one is rejected rather than replacing the old gate, so existing
    /// wires never point at a gate that has gone away.
    pub fn add_gate(&mut self, kind: &str, name: &str) -> Result<GateKey, SimulationError> {
        let gate_kind = self.config.kinds.lookup(kind).ok_or_else(|| SimulationError::UnknownGateKind(kind.to_string()))?;
        self.check_name_free(name)?;

        let key = self.gates.insert(Gate::new(name.to_string(), gate_kind));
        self.names.insert(name.to_string(), Name::Gate(key));
        self.order.push(key);
        tracing::debug!(name, kind = %gate_kind, "gate added");
        Ok(key)
    }

    /// Declares a circuit-level signal that wires can be driven from. It starts undefined.
    pub fn add_signal(&mut self, name: &str) -> Result<SignalKey, SimulationError> {
        self.check_name_free(name)?;

        let key = self.signals.insert(Signal { name: name.to_string(), level: LogicLevel::Undefined });
        self.names.insert(name.to_string(), Name::Signal(key));
        tracing::debug!(name, "signal added");
        Ok(key)
    }

    fn check_name_free(&self, name: &str) -> Result<(), SimulationError> {
        if self.names.contains_key(name) {
            Err(SimulationError::DuplicateName(name.to_string()))
        } else {
            Ok(())
        }
    }

    /// Wires `from` to input `input` of gate `to`.
    ///
    /// `from` is a signal name, a gate name (its primary output) or `gate.port` for a named output port such as
    /// `cmp.greater`. The new link carries the next level the source produces; it does not copy the current one.
    pub fn connect(&mut self, from: &str, to: &str, input: usize) -> Result<(), SimulationError> {
        let source = self.resolve_source(from)?;
        let target = self.gate_key(to)?;

        let arity = self.gates[target].kind().arity();
        if input >= arity {
            return Err(SimulationError::InputIndexOutOfRange { gate: to.to_string(), index: input, arity });
        }

        self.connections.connect(source, WireLink { gate: target, input });
        tracing::debug!(from, to, input, "wire added");
        Ok(())
    }

    fn resolve_source(&self, from: &str) -> Result<Source, SimulationError> {
        match self.names.get(from) {
            Some(Name::Signal(key)) => return Ok(Source::Signal(*key)),
            Some(Name::Gate(key)) => return Ok(Source::GateOutput(*key, OutputPort::Output)),
            None => {}
        }

        let Some((gate_name, port_name)) = from.rsplit_once('.') else {
            return Err(SimulationError::SourceNotFound(from.to_string()));
        };
        let Some(Name::Gate(key)) = self.names.get(gate_name) else {
            return Err(SimulationError::SourceNotFound(from.to_string()));
        };
        match OutputPort::parse(port_name) {
            Some(port) if self.gates[*key].kind().has_port(port) => Ok(Source::GateOutput(*key, port)),
            _ => Err(SimulationError::UnknownPort { gate: gate_name.to_string(), port: port_name.to_string() }),
        }
    }

    // driving {{{1
    /// Sets one input of a gate and propagates the result through everything wired downstream of it before returning.
    pub fn drive_gate(&mut self, name: &str, input: usize, level: LogicLevel) -> Result<(), SimulationError> {
        let key = self.gate_key(name)?;
        tracing::info!("Input Index {input} of {name} gate runs with logic {level}");
        connections::drive_input(&mut self.gates, &self.connections, Propagation::new(self.config.max_propagation_depth), key, input, level)
    }

    /// Sets the level of a signal and drives every gate input wired to it, in the order the wires were added.
    pub fn drive_signal(&mut self, name: &str, level: LogicLevel) -> Result<(), SimulationError> {
        let key = match self.names.get(name) {
            Some(Name::Signal(key)) => *key,
            _ => return Err(SimulationError::SignalNotFound(name.to_string())),
        };
        self.signals[key].level = level;
        tracing::info!("Signal {name} runs with logic {level}");
        connections::drive_source(&mut self.gates, &self.connections, Propagation::new(self.config.max_propagation_depth), Source::Signal(key), level)
    }

    // queries {{{1
    fn gate_key(&self, name: &str) -> Result<GateKey, SimulationError> {
        match self.names.get(name) {
            Some(Name::Gate(key)) => Ok(*key),
            _ => Err(SimulationError::GateNotFound(name.to_string())),
        }
    }

    pub fn gate(&self, name: &str) -> Option<&Gate> {
        self.gate_key(name).ok().map(|key| &self.gates[key])
    }

    /// Every gate in the order it was added.
    pub fn gates(&self) -> impl ExactSizeIterator<Item = &Gate> + '_ {
        self.order.iter().map(|key| &self.gates[*key])
    }

    pub fn gate_output(&self, name: &str) -> Result<LogicLevel, SimulationError> {
        Ok(self.gates[self.gate_key(name)?].output())
    }

    /// Reads `greater`, `equal` or `less` from a comparator.
    pub fn comparator_output(&self, name: &str, which: &str) -> Result<LogicLevel, SimulationError> {
        let gate = &self.gates[self.gate_key(name)?];
        let outputs = gate.comparator_outputs().ok_or_else(|| SimulationError::NotAComparator(name.to_string()))?;
        match which {
            "greater" => Ok(outputs.greater),
            "equal" => Ok(outputs.equal),
            "less" => Ok(outputs.less),
            _ => Err(SimulationError::UnknownComparatorOutput(which.to_string())),
        }
    }

    pub fn signal_level(&self, name: &str) -> Result<LogicLevel, SimulationError> {
        match self.names.get(name) {
            Some(Name::Signal(key)) => Ok(self.signals[*key].level),
            _ => Err(SimulationError::SignalNotFound(name.to_string())),
        }
    }

    /// Signal names in no particular order.
    pub fn signals(&self) -> impl Iterator<Item = &str> + '_ {
        self.signals.values().map(|signal| signal.name.as_str())
    }

    /// Links driven by `from` (resolved the same way as in [`Circuit::connect`]), in registration order.
    pub fn links(&self, from: &str) -> Result<Vec<Link<'_>>, SimulationError> {
        let source = self.resolve_source(from)?;
        Ok(self.connections.dependants(source).iter().map(|link| Link { gate: self.gates[link.gate].name(), input: link.input }).collect())
    }

    pub fn num_links(&self) -> usize {
        self.connections.num_links()
    }

    // output bookkeeping {{{1
    /// Marks a gate to be reported at the end of a run. Watching a gate twice has no further effect.
    pub fn watch(&mut self, name: &str) -> Result<(), SimulationError> {
        let key = self.gate_key(name)?;
        if !self.watched.contains(&key) {
            self.watched.push(key);
        }
        Ok(())
    }

    pub fn watched(&self) -> impl ExactSizeIterator<Item = &Gate> + '_ {
        self.watched.iter().map(|key| &self.gates[*key])
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Circuit::new(SimulationConfig::default())
    }
}

#[cfg(test)]
mod test {
    use super::{Circuit, Link};
    use crate::{
        config::SimulationConfig,
        simulation::{
            error::SimulationError,
            kinds::GateKindTable,
            level::LogicLevel::{High, Low, Undefined},
            logic::GateKind,
        },
    };

    #[test]
    fn and_scenario() {
        let mut circuit = Circuit::default();
        circuit.add_gate("AND", "g1").unwrap();
        circuit.drive_gate("g1", 0, High).unwrap();
        circuit.drive_gate("g1", 1, High).unwrap();
        assert_eq!(circuit.gate_output("g1"), Ok(High));
        circuit.drive_gate("g1", 1, Low).unwrap();
        assert_eq!(circuit.gate_output("g1"), Ok(Low));
    }

    #[test]
    fn comparator_scenario() {
        let mut circuit = Circuit::default();
        circuit.add_gate("1BitComparator", "c1").unwrap();
        circuit.drive_gate("c1", 0, High).unwrap();
        circuit.drive_gate("c1", 1, Low).unwrap();
        assert_eq!(circuit.comparator_output("c1", "greater"), Ok(High));
        assert_eq!(circuit.comparator_output("c1", "equal"), Ok(Low));
        assert_eq!(circuit.comparator_output("c1", "less"), Ok(Low));
        assert_eq!(circuit.gate_output("c1"), Ok(Undefined));
    }

    #[test]
    fn undriven_gate_is_undefined() {
        let mut circuit = Circuit::default();
        circuit.add_gate("OR", "g").unwrap();
        assert_eq!(circuit.gate_output("g"), Ok(Undefined));
        assert_eq!(circuit.gate("g").unwrap().inputs(), &[Undefined, Undefined]);
    }

    #[test]
    fn missing_gate() {
        let mut circuit = Circuit::default();
        assert_eq!(circuit.gate_output("nope"), Err(SimulationError::GateNotFound("nope".to_string())));
        assert_eq!(circuit.drive_gate("nope", 0, High), Err(SimulationError::GateNotFound("nope".to_string())));
        assert_eq!(circuit.comparator_output("nope", "equal"), Err(SimulationError::GateNotFound("nope".to_string())));
        assert_eq!(circuit.watch("nope"), Err(SimulationError::GateNotFound("nope".to_string())));
    }

    #[test]
    fn unknown_kind() {
        let mut circuit = Circuit::default();
        assert_eq!(circuit.add_gate("NAND", "g"), Err(SimulationError::UnknownGateKind("NAND".to_string())));
        assert!(circuit.gate("g").is_none());
    }

    #[test]
    fn duplicate_name_keeps_original() {
        let mut circuit = Circuit::default();
        circuit.add_gate("NOT", "g").unwrap();
        circuit.drive_gate("g", 0, Low).unwrap();

        assert_eq!(circuit.add_gate("AND", "g"), Err(SimulationError::DuplicateName("g".to_string())));
        assert_eq!(circuit.add_signal("g"), Err(SimulationError::DuplicateName("g".to_string())));
        assert_eq!(circuit.gate("g").unwrap().kind(), GateKind::Not);
        assert_eq!(circuit.gate_output("g"), Ok(High));
        assert_eq!(circuit.gates().len(), 1);
    }

    #[test]
    fn comparator_queries_on_wrong_gate() {
        let mut circuit = Circuit::default();
        circuit.add_gate("XOR", "x").unwrap();
        circuit.add_gate("1BitComparator", "c").unwrap();
        assert_eq!(circuit.comparator_output("x", "greater"), Err(SimulationError::NotAComparator("x".to_string())));
        assert_eq!(circuit.comparator_output("c", "bigger"), Err(SimulationError::UnknownComparatorOutput("bigger".to_string())));
    }

    #[test]
    fn out_of_range_input() {
        let mut circuit = Circuit::default();
        circuit.add_gate("AND", "g").unwrap();
        circuit.drive_gate("g", 0, High).unwrap();
        assert_eq!(circuit.drive_gate("g", 2, Low), Err(SimulationError::InputIndexOutOfRange { gate: "g".to_string(), index: 2, arity: 2 }));
        assert_eq!(circuit.gate("g").unwrap().inputs(), &[High, Undefined]);

        circuit.add_gate("NOT", "n").unwrap();
        assert_eq!(circuit.connect("g", "n", 1), Err(SimulationError::InputIndexOutOfRange { gate: "n".to_string(), index: 1, arity: 1 }));
        assert_eq!(circuit.num_links(), 0);
    }

    #[test]
    fn chain_propagates() {
        // half adder followed by an inverter on the carry
        let mut circuit = Circuit::default();
        for (kind, name) in [("XOR", "sum"), ("AND", "carry"), ("NOT", "ncarry")] {
            circuit.add_gate(kind, name).unwrap();
        }
        circuit.add_signal("a").unwrap();
        circuit.add_signal("b").unwrap();
        circuit.connect("a", "sum", 0).unwrap();
        circuit.connect("a", "carry", 0).unwrap();
        circuit.connect("b", "sum", 1).unwrap();
        circuit.connect("b", "carry", 1).unwrap();
        circuit.connect("carry", "ncarry", 0).unwrap();

        circuit.drive_signal("a", High).unwrap();
        circuit.drive_signal("b", High).unwrap();
        assert_eq!(circuit.gate_output("sum"), Ok(Low));
        assert_eq!(circuit.gate_output("carry"), Ok(High));
        assert_eq!(circuit.gate_output("ncarry"), Ok(Low));
        assert_eq!(circuit.signal_level("a"), Ok(High));

        circuit.drive_signal("b", Low).unwrap();
        assert_eq!(circuit.gate_output("sum"), Ok(High));
        assert_eq!(circuit.gate_output("carry"), Ok(Low));
        assert_eq!(circuit.gate_output("ncarry"), Ok(High));
    }

    #[test]
    fn fanout_reaches_every_target() {
        let mut circuit = Circuit::default();
        circuit.add_gate("NOT", "src").unwrap();
        let targets = ["t0", "t1", "t2", "t3", "t4", "t5"];
        for name in targets {
            circuit.add_gate("NOT", name).unwrap();
            circuit.connect("src", name, 0).unwrap();
        }

        circuit.drive_gate("src", 0, Low).unwrap();
        for name in targets {
            assert_eq!(circuit.gate(name).unwrap().inputs(), &[High]);
            assert_eq!(circuit.gate_output(name), Ok(Low));
        }
        assert_eq!(circuit.links("src").unwrap().iter().map(|link| link.gate).collect::<Vec<_>>(), targets);
    }

    #[test]
    fn comparator_ports_as_sources() {
        let mut circuit = Circuit::default();
        circuit.add_gate("1BitComparator", "cmp").unwrap();
        circuit.add_gate("NOT", "not_less").unwrap();
        circuit.connect("cmp.less", "not_less", 0).unwrap();

        assert_eq!(circuit.connect("cmp.bigger", "not_less", 0), Err(SimulationError::UnknownPort { gate: "cmp".to_string(), port: "bigger".to_string() }));
        assert_eq!(circuit.connect("not_less.greater", "not_less", 0), Err(SimulationError::UnknownPort { gate: "not_less".to_string(), port: "greater".to_string() }));
        assert_eq!(circuit.connect("ghost.less", "not_less", 0), Err(SimulationError::SourceNotFound("ghost.less".to_string())));

        circuit.drive_gate("cmp", 0, Low).unwrap();
        circuit.drive_gate("cmp", 1, High).unwrap();
        assert_eq!(circuit.gate_output("not_less"), Ok(Low));
        assert_eq!(circuit.links("cmp.less").unwrap(), vec![Link { gate: "not_less", input: 0 }]);
    }

    #[test]
    fn new_link_waits_for_next_drive() {
        let mut circuit = Circuit::default();
        circuit.add_gate("NOT", "a").unwrap();
        circuit.add_gate("NOT", "b").unwrap();
        circuit.drive_gate("a", 0, High).unwrap();
        circuit.connect("a", "b", 0).unwrap();
        assert_eq!(circuit.gate_output("b"), Ok(Undefined));
        circuit.drive_gate("a", 0, High).unwrap();
        assert_eq!(circuit.gate_output("b"), Ok(High));
    }

    #[test]
    fn cyclic_wiring_is_reported() {
        let mut circuit = Circuit::new(SimulationConfig::default().with_max_propagation_depth(32));
        circuit.add_gate("NOT", "n1").unwrap();
        circuit.add_gate("NOT", "n2").unwrap();
        circuit.connect("n1", "n2", 0).unwrap();
        circuit.connect("n2", "n1", 0).unwrap();

        assert!(matches!(circuit.drive_gate("n1", 0, High), Err(SimulationError::PropagationTooDeep { limit: 32, .. })));
    }

    #[test]
    fn signals() {
        let mut circuit = Circuit::default();
        circuit.add_signal("clk").unwrap();
        assert_eq!(circuit.signal_level("clk"), Ok(Undefined));
        assert_eq!(circuit.drive_signal("nope", High), Err(SimulationError::SignalNotFound("nope".to_string())));
        circuit.add_gate("AND", "g").unwrap();
        assert_eq!(circuit.drive_signal("g", High), Err(SimulationError::SignalNotFound("g".to_string())));
        assert_eq!(circuit.signals().collect::<Vec<_>>(), vec!["clk"]);
    }

    #[test]
    fn watch_and_order() {
        let mut circuit = Circuit::default();
        for name in ["z", "a", "m"] {
            circuit.add_gate("OR", name).unwrap();
        }
        circuit.watch("m").unwrap();
        circuit.watch("z").unwrap();
        circuit.watch("m").unwrap();
        assert_eq!(circuit.gates().map(|gate| gate.name()).collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(circuit.watched().map(|gate| gate.name()).collect::<Vec<_>>(), vec!["m", "z"]);
    }

    #[test]
    fn custom_kind_table() {
        let mut circuit = Circuit::new(SimulationConfig::default().with_kinds(GateKindTable::empty().with("inv", GateKind::Not)));
        assert_eq!(circuit.add_gate("NOT", "a"), Err(SimulationError::UnknownGateKind("NOT".to_string())));
        circuit.add_gate("inv", "a").unwrap();
        circuit.drive_gate("a", 0, Low).unwrap();
        assert_eq!(circuit.gate_output("a"), Ok(High));
    }
}
