use crate::simulation::logic::GateKind;

/// Maps the kind names accepted by `AddGate` to the gate kind they construct.
///
/// A circuit is handed its table when it is created, so a front end can rename kinds or add aliases without touching any
/// global state. Lookups are case sensitive.
#[derive(Clone, Debug)]
pub struct GateKindTable {
    kinds: Vec<(String, GateKind)>,
}

impl GateKindTable {
    pub fn empty() -> GateKindTable {
        GateKindTable { kinds: Vec::new() }
    }

    /// `AND`, `OR`, `XOR`, `NOT` and `1BitComparator`.
    pub fn standard() -> GateKindTable {
        let mut table = GateKindTable::empty();
        for kind in [GateKind::And, GateKind::Or, GateKind::Xor, GateKind::Not, GateKind::OneBitComparator] {
            table.register(kind.name(), kind);
        }
        table
    }

    /// Registers `name`, replacing whatever kind it previously mapped to.
    pub fn register(&mut self, name: impl Into<String>, kind: GateKind) {
        let name = name.into();
        match self.kinds.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = kind,
            None => self.kinds.push((name, kind)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, kind: GateKind) -> GateKindTable {
        self.register(name, kind);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<GateKind> {
        self.kinds.iter().find(|(existing, _)| existing == name).map(|(_, kind)| *kind)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.kinds.iter().map(|(name, _)| name.as_str())
    }
}

impl Default for GateKindTable {
    fn default() -> Self {
        GateKindTable::standard()
    }
}
