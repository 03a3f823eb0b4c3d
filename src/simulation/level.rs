/// The state carried on a single line.
///
/// There is no meaningful ordering between levels, only exact equality. In particular `Undefined` is neither low nor high,
/// and each gate kind decides for itself how it treats an undefined input (see [`super::logic`]).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum LogicLevel {
    #[default]
    Undefined,
    Low,
    High,
}

impl LogicLevel {
    /// Numeric form used by the command protocol: `-1`, `0` or `1`.
    pub fn as_number(self) -> i8 {
        match self {
            LogicLevel::Undefined => -1,
            LogicLevel::Low => 0,
            LogicLevel::High => 1,
        }
    }

    pub fn from_number(n: i64) -> Option<LogicLevel> {
        match n {
            -1 => Some(LogicLevel::Undefined),
            0 => Some(LogicLevel::Low),
            1 => Some(LogicLevel::High),
            _ => None,
        }
    }

    pub fn is_high(self) -> bool {
        self == LogicLevel::High
    }
}

impl From<bool> for LogicLevel {
    fn from(b: bool) -> Self {
        if b {
            LogicLevel::High
        } else {
            LogicLevel::Low
        }
    }
}

impl std::fmt::Display for LogicLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_number())
    }
}
