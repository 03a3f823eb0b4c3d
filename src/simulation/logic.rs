use crate::simulation::level::LogicLevel;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum GateKind {
    And,
    Or,
    Xor,
    Not,
    OneBitComparator,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum OutputPort {
    Output,
    Greater,
    Equal,
    Less,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct ComparatorOutputs {
    pub greater: LogicLevel,
    pub equal: LogicLevel,
    pub less: LogicLevel,
}

/// Input and output levels of one gate, along with the rule that computes one from the other.
#[derive(Clone, Debug)]
pub(crate) struct GateLogic(GateLogicKind);
#[derive(Clone, Debug)]
enum GateLogicKind {
    And([LogicLevel; 2], LogicLevel),
    Or([LogicLevel; 2], LogicLevel),
    Xor([LogicLevel; 2], LogicLevel),
    Not([LogicLevel; 1], LogicLevel),
    // the generic output of a comparator is never computed and always reads as undefined
    OneBitComparator([LogicLevel; 2], ComparatorOutputs),
}

impl GateKind {
    pub fn name(self) -> &'static str {
        match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Xor => "XOR",
            GateKind::Not => "NOT",
            GateKind::OneBitComparator => "1BitComparator",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            GateKind::Not => 1,
            GateKind::And | GateKind::Or | GateKind::Xor | GateKind::OneBitComparator => 2,
        }
    }

    /// Output ports in the order propagation visits them.
    pub fn ports(self) -> &'static [OutputPort] {
        match self {
            GateKind::And | GateKind::Or | GateKind::Xor | GateKind::Not => &[OutputPort::Output],
            GateKind::OneBitComparator => &[OutputPort::Output, OutputPort::Greater, OutputPort::Equal, OutputPort::Less],
        }
    }

    pub fn has_port(self, port: OutputPort) -> bool {
        self.ports().contains(&port)
    }
}

impl std::fmt::Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl OutputPort {
    pub const COMPARATOR: [OutputPort; 3] = [OutputPort::Greater, OutputPort::Equal, OutputPort::Less];

    pub fn name(self) -> &'static str {
        match self {
            OutputPort::Output => "output",
            OutputPort::Greater => "greater",
            OutputPort::Equal => "equal",
            OutputPort::Less => "less",
        }
    }

    pub fn parse(name: &str) -> Option<OutputPort> {
        match name {
            "output" => Some(OutputPort::Output),
            "greater" => Some(OutputPort::Greater),
            "equal" => Some(OutputPort::Equal),
            "less" => Some(OutputPort::Less),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl GateLogic {
    pub(crate) fn new(kind: GateKind) -> GateLogic {
        match kind {
            GateKind::And => GateLogic::new_and(),
            GateKind::Or => GateLogic::new_or(),
            GateKind::Xor => GateLogic::new_xor(),
            GateKind::Not => GateLogic::new_not(),
            GateKind::OneBitComparator => GateLogic::new_one_bit_comparator(),
        }
    }

    // every gate starts with all inputs and outputs undefined
    pub(crate) fn new_and() -> GateLogic {
        GateLogic(GateLogicKind::And([LogicLevel::Undefined; 2], LogicLevel::Undefined))
    }
    pub(crate) fn new_or() -> GateLogic {
        GateLogic(GateLogicKind::Or([LogicLevel::Undefined; 2], LogicLevel::Undefined))
    }
    pub(crate) fn new_xor() -> GateLogic {
        GateLogic(GateLogicKind::Xor([LogicLevel::Undefined; 2], LogicLevel::Undefined))
    }
    pub(crate) fn new_not() -> GateLogic {
        GateLogic(GateLogicKind::Not([LogicLevel::Undefined; 1], LogicLevel::Undefined))
    }
    pub(crate) fn new_one_bit_comparator() -> GateLogic {
        GateLogic(GateLogicKind::OneBitComparator([LogicLevel::Undefined; 2], ComparatorOutputs::default()))
    }

    pub(crate) fn kind(&self) -> GateKind {
        match self.0 {
            GateLogicKind::And(_, _) => GateKind::And,
            GateLogicKind::Or(_, _) => GateKind::Or,
            GateLogicKind::Xor(_, _) => GateKind::Xor,
            GateLogicKind::Not(_, _) => GateKind::Not,
            GateLogicKind::OneBitComparator(_, _) => GateKind::OneBitComparator,
        }
    }

    pub(crate) fn inputs(&self) -> &[LogicLevel] {
        match &self.0 {
            GateLogicKind::And(i, _) | GateLogicKind::Or(i, _) | GateLogicKind::Xor(i, _) => i,
            GateLogicKind::Not(i, _) => i,
            GateLogicKind::OneBitComparator(i, _) => i,
        }
    }
    fn inputs_mut(&mut self) -> &mut [LogicLevel] {
        match &mut self.0 {
            GateLogicKind::And(i, _) | GateLogicKind::Or(i, _) | GateLogicKind::Xor(i, _) => i,
            GateLogicKind::Not(i, _) => i,
            GateLogicKind::OneBitComparator(i, _) => i,
        }
    }

    /// Level on `port`, or `None` if this kind of gate does not have that port.
    pub(crate) fn output(&self, port: OutputPort) -> Option<LogicLevel> {
        match (&self.0, port) {
            (GateLogicKind::And(_, o) | GateLogicKind::Or(_, o) | GateLogicKind::Xor(_, o) | GateLogicKind::Not(_, o), OutputPort::Output) => Some(*o),
            (GateLogicKind::OneBitComparator(_, _), OutputPort::Output) => Some(LogicLevel::Undefined),
            (GateLogicKind::OneBitComparator(_, o), OutputPort::Greater) => Some(o.greater),
            (GateLogicKind::OneBitComparator(_, o), OutputPort::Equal) => Some(o.equal),
            (GateLogicKind::OneBitComparator(_, o), OutputPort::Less) => Some(o.less),
            _ => None,
        }
    }

    pub(crate) fn comparator_outputs(&self) -> Option<ComparatorOutputs> {
        match &self.0 {
            GateLogicKind::OneBitComparator(_, o) => Some(*o),
            _ => None,
        }
    }

    /// Sets one input and recomputes every output from the whole input vector.
    ///
    /// Returns `false` without touching anything if `index` is not below the arity.
    pub(crate) fn set_input(&mut self, index: usize, level: LogicLevel) -> bool {
        match self.inputs_mut().get_mut(index) {
            Some(slot) => *slot = level,
            None => return false,
        }
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        match &mut self.0 {
            GateLogicKind::And([a, b], o) => *o = (a.is_high() && b.is_high()).into(),
            GateLogicKind::Or([a, b], o) => *o = (a.is_high() || b.is_high()).into(),
            // plain inequality, so undefined counts as different from both low and high
            GateLogicKind::Xor([a, b], o) => *o = (*a != *b).into(),
            GateLogicKind::Not([a], o) => *o = (!a.is_high()).into(),
            GateLogicKind::OneBitComparator([a, b], o) => *o = compare(*a, *b),
        }
    }
}

fn compare(a: LogicLevel, b: LogicLevel) -> ComparatorOutputs {
    use LogicLevel::{High, Low};

    match (a, b) {
        (High, Low) => ComparatorOutputs { greater: High, equal: Low, less: Low },
        (Low, High) => ComparatorOutputs { greater: Low, equal: Low, less: High },
        (a, b) if a == b => ComparatorOutputs { greater: Low, equal: High, less: Low },
        _ => ComparatorOutputs::default(),
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::{ComparatorOutputs, GateKind, GateLogic, OutputPort};
    use crate::simulation::level::LogicLevel::{self, High, Low, Undefined};

    fn drive(mut logic: GateLogic, inputs: &[LogicLevel]) -> GateLogic {
        for (i, level) in inputs.iter().enumerate() {
            assert!(logic.set_input(i, *level));
        }
        logic
    }

    #[rstest]
    #[case(Low, Low, Low)]
    #[case(Low, High, Low)]
    #[case(High, Low, Low)]
    #[case(High, High, High)]
    #[case(Undefined, High, Low)]
    #[case(Undefined, Undefined, Low)]
    fn and(#[case] a: LogicLevel, #[case] b: LogicLevel, #[case] expected: LogicLevel) {
        assert_eq!(drive(GateLogic::new_and(), &[a, b]).output(OutputPort::Output), Some(expected));
    }

    #[rstest]
    #[case(Low, Low, Low)]
    #[case(Low, High, High)]
    #[case(High, Low, High)]
    #[case(High, High, High)]
    #[case(Undefined, High, High)]
    #[case(Undefined, Low, Low)]
    fn or(#[case] a: LogicLevel, #[case] b: LogicLevel, #[case] expected: LogicLevel) {
        assert_eq!(drive(GateLogic::new_or(), &[a, b]).output(OutputPort::Output), Some(expected));
    }

    #[rstest]
    #[case(Low, Low, Low)]
    #[case(Low, High, High)]
    #[case(High, Low, High)]
    #[case(High, High, Low)]
    #[case(Undefined, Low, High)]
    #[case(Undefined, High, High)]
    #[case(Undefined, Undefined, Low)]
    fn xor(#[case] a: LogicLevel, #[case] b: LogicLevel, #[case] expected: LogicLevel) {
        assert_eq!(drive(GateLogic::new_xor(), &[a, b]).output(OutputPort::Output), Some(expected));
    }

    #[rstest]
    #[case(High, Low)]
    #[case(Low, High)]
    #[case(Undefined, High)]
    fn not(#[case] a: LogicLevel, #[case] expected: LogicLevel) {
        assert_eq!(drive(GateLogic::new_not(), &[a]).output(OutputPort::Output), Some(expected));
    }

    #[rstest]
    #[case(High, Low, High, Low, Low)]
    #[case(Low, High, Low, Low, High)]
    #[case(High, High, Low, High, Low)]
    #[case(Low, Low, Low, High, Low)]
    #[case(Undefined, Undefined, Low, High, Low)]
    #[case(Undefined, High, Undefined, Undefined, Undefined)]
    #[case(Low, Undefined, Undefined, Undefined, Undefined)]
    fn comparator(#[case] a: LogicLevel, #[case] b: LogicLevel, #[case] greater: LogicLevel, #[case] equal: LogicLevel, #[case] less: LogicLevel) {
        let logic = drive(GateLogic::new_one_bit_comparator(), &[a, b]);
        assert_eq!(logic.comparator_outputs(), Some(ComparatorOutputs { greater, equal, less }));
        assert_eq!(logic.output(OutputPort::Greater), Some(greater));
        assert_eq!(logic.output(OutputPort::Equal), Some(equal));
        assert_eq!(logic.output(OutputPort::Less), Some(less));
        assert_eq!(logic.output(OutputPort::Output), Some(Undefined));
    }

    #[test]
    fn outputs_undefined_before_any_drive() {
        for logic in [GateLogic::new_and(), GateLogic::new_or(), GateLogic::new_xor(), GateLogic::new_not()] {
            assert_eq!(logic.output(OutputPort::Output), Some(Undefined));
        }
        assert_eq!(GateLogic::new_one_bit_comparator().comparator_outputs(), Some(ComparatorOutputs::default()));
    }

    #[test]
    fn recompute_uses_only_current_inputs() {
        let mut logic = drive(GateLogic::new_and(), &[High, High]);
        assert_eq!(logic.output(OutputPort::Output), Some(High));
        assert!(logic.set_input(1, Low));
        assert_eq!(logic.output(OutputPort::Output), Some(Low));
        assert!(logic.set_input(1, High));
        assert_eq!(logic.output(OutputPort::Output), Some(High));
        assert!(logic.set_input(1, High));
        assert_eq!(logic.output(OutputPort::Output), Some(High));
    }

    #[test]
    fn out_of_range_input_changes_nothing() {
        let mut logic = drive(GateLogic::new_not(), &[Low]);
        assert!(!logic.set_input(1, High));
        assert_eq!(logic.inputs(), &[Low]);
        assert_eq!(logic.output(OutputPort::Output), Some(High));
    }

    #[test]
    fn ports() {
        assert_eq!(GateKind::And.arity(), 2);
        assert_eq!(GateKind::Not.arity(), 1);
        assert!(GateKind::OneBitComparator.has_port(OutputPort::Less));
        assert!(!GateKind::Xor.has_port(OutputPort::Greater));
        assert_eq!(GateLogic::new_or().output(OutputPort::Equal), None);
        assert_eq!(GateLogic::new_one_bit_comparator().kind(), GateKind::OneBitComparator);
    }
}
