use crate::{interpreter::error::CommandErrorKind, simulation::LogicLevel};

/// One line of the command protocol, borrowing its names from the line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command<'l> {
    Component { kind: &'l str, name: &'l str },
    Signal { name: &'l str },
    Wire { from: &'l str, to: &'l str, input: usize },
    Input { gate: &'l str, input: usize, level: LogicLevel },
    Drive { signal: &'l str, level: LogicLevel },
    Output { gate: &'l str },
    ComparatorOutput { gate: &'l str, which: &'l str },
    Watch { gate: &'l str },
    End,
}

struct Args<'l> {
    command: &'static str,
    tokens: std::str::SplitWhitespace<'l>,
}

impl<'l> Args<'l> {
    fn next(&mut self, argument: &'static str) -> Result<&'l str, CommandErrorKind> {
        self.tokens.next().ok_or(CommandErrorKind::MissingArgument { command: self.command, argument })
    }

    fn index(&mut self, argument: &'static str) -> Result<usize, CommandErrorKind> {
        let token = self.next(argument)?;
        token.parse().map_err(|_| CommandErrorKind::BadNumber { argument, token: token.to_string() })
    }

    fn level(&mut self) -> Result<LogicLevel, CommandErrorKind> {
        let token = self.next("level")?;
        token.parse().ok().and_then(LogicLevel::from_number).ok_or_else(|| CommandErrorKind::BadLevel(token.to_string()))
    }

    fn finish<T>(mut self, command: T) -> Result<T, CommandErrorKind> {
        match self.tokens.next() {
            Some(token) => Err(CommandErrorKind::UnexpectedArgument { command: self.command, token: token.to_string() }),
            None => Ok(command),
        }
    }
}

/// Parses one line. Blank lines and lines starting with `#` give `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command<'_>>, CommandErrorKind> {
    let mut tokens = line.split_whitespace();
    let Some(request) = tokens.next() else { return Ok(None) };
    if request.starts_with('#') {
        return Ok(None);
    }

    macro_rules! args {
        ($name:literal) => {
            Args { command: $name, tokens }
        };
    }

    let command = match request {
        "component" => {
            let mut a = args!("component");
            let kind = a.next("kind")?;
            let name = a.next("name")?;
            a.finish(Command::Component { kind, name })
        }
        "signal" => {
            let mut a = args!("signal");
            let name = a.next("name")?;
            a.finish(Command::Signal { name })
        }
        "wire" => {
            let mut a = args!("wire");
            let from = a.next("source")?;
            let to = a.next("target")?;
            let input = a.index("input index")?;
            a.finish(Command::Wire { from, to, input })
        }
        "input" => {
            let mut a = args!("input");
            let gate = a.next("gate")?;
            let input = a.index("input index")?;
            let level = a.level()?;
            a.finish(Command::Input { gate, input, level })
        }
        "drive" => {
            let mut a = args!("drive");
            let signal = a.next("signal")?;
            let level = a.level()?;
            a.finish(Command::Drive { signal, level })
        }
        "output" => {
            let mut a = args!("output");
            let gate = a.next("gate")?;
            a.finish(Command::Output { gate })
        }
        "comparator_output" => {
            let mut a = args!("comparator_output");
            let gate = a.next("gate")?;
            let which = a.next("output type")?;
            a.finish(Command::ComparatorOutput { gate, which })
        }
        "watch" => {
            let mut a = args!("watch");
            let gate = a.next("gate")?;
            a.finish(Command::Watch { gate })
        }
        "end" => args!("end").finish(Command::End),
        other => Err(CommandErrorKind::UnknownCommand(other.to_string())),
    }?;

    Ok(Some(command))
}
