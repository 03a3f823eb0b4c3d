//! Line-oriented command protocol on top of [`Circuit`].
//!
//! ```text
//! # half adder
//! component XOR sum
//! component AND carry
//! signal a
//! wire a sum 0
//! input sum 1 1
//! drive a 0
//! output sum
//! end
//! ```
//!
//! A bad line is reported and skipped; it never stops the commands after it.

mod command;
mod error;

use std::io::{self, BufRead, Write};

pub use command::{parse, Command};
pub use error::{CommandError, CommandErrorKind, Location};
use error::Report;

use crate::simulation::{Circuit, Gate, LogicLevel, OutputPort, SimulationError};

pub struct Interpreter<'c, W: Write> {
    circuit: &'c mut Circuit,
    out: W,
}

/// What happened during [`Interpreter::run`].
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Commands parsed successfully, whether or not they then failed.
    pub commands: usize,
    pub errors: Vec<CommandError>,
    /// Whether an `end` command stopped the run before the input ran out.
    pub ended: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    End,
}

impl<'c, W: Write> Interpreter<'c, W> {
    pub fn new(circuit: &'c mut Circuit, out: W) -> Self {
        Self { circuit, out }
    }

    pub fn circuit(&self) -> &Circuit {
        &*self.circuit
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Executes every line of `reader` until it runs out or an `end` command, then prints the watched gates.
    ///
    /// `source` only names the input in error locations. Failing to read the input or write the output is the only
    /// error returned; everything else is reported, collected in the summary, and skipped. That includes lines that are
    /// not valid UTF-8.
    pub fn run(&mut self, source: &str, reader: impl BufRead) -> io::Result<RunSummary> {
        let mut summary = RunSummary::default();

        for (line_index, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let location = Location::new(source, line_index + 1);
            let Ok(line) = std::str::from_utf8(&line) else {
                record(&mut summary, location, CommandErrorKind::BadEncoding);
                continue;
            };

            let command = match command::parse(line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(kind) => {
                    record(&mut summary, location, kind);
                    continue;
                }
            };

            summary.commands += 1;
            match self.execute(command)? {
                Ok(Flow::Continue) => {}
                Ok(Flow::End) => {
                    summary.ended = true;
                    break;
                }
                Err(e) => record(&mut summary, location, e.into()),
            }
        }

        self.print_outputs()?;
        for gate in self.circuit.gates() {
            tracing::debug!(gate = gate.name(), kind = %gate.kind(), inputs = ?gate.inputs(), output = %gate.output(), "final state");
        }
        tracing::info!(commands = summary.commands, errors = summary.errors.len(), "run finished");

        Ok(summary)
    }

    /// Executes one parsed command. The outer result is for failures writing the output.
    pub fn execute(&mut self, command: Command) -> io::Result<Result<Flow, SimulationError>> {
        let result = match command {
            Command::Component { kind, name } => self.circuit.add_gate(kind, name).map(|_| ()),
            Command::Signal { name } => self.circuit.add_signal(name).map(|_| ()),
            Command::Wire { from, to, input } => self.circuit.connect(from, to, input),
            Command::Input { gate, input, level } => self.circuit.drive_gate(gate, input, level),
            Command::Drive { signal, level } => self.circuit.drive_signal(signal, level),
            Command::Output { gate } => {
                let (level, result) = sentinel(self.circuit.gate_output(gate));
                writeln!(self.out, "Gate {gate} output: {level}")?;
                result
            }
            Command::ComparatorOutput { gate, which } => {
                let (level, result) = sentinel(self.circuit.comparator_output(gate, which));
                writeln!(self.out, "{gate} {which} output: {level}")?;
                result
            }
            Command::Watch { gate } => self.circuit.watch(gate),
            Command::End => return Ok(Ok(Flow::End)),
        };

        Ok(result.map(|()| Flow::Continue))
    }

    /// Prints every watched gate: the primary output of simple gates, and all three results of comparators.
    pub fn print_outputs(&mut self) -> io::Result<()> {
        for gate in self.circuit.watched() {
            print_gate(&mut self.out, gate)?;
        }
        Ok(())
    }
}

fn print_gate(out: &mut impl Write, gate: &Gate) -> io::Result<()> {
    match gate.comparator_outputs() {
        Some(_) => {
            for port in OutputPort::COMPARATOR {
                writeln!(out, "{} {} output: {}", gate.name(), port, gate.port(port).unwrap_or_default())?;
            }
        }
        None => writeln!(out, "Gate {} output: {}", gate.name(), gate.output())?,
    }
    Ok(())
}

// a failed query still prints, with an undefined level
fn sentinel(result: Result<LogicLevel, SimulationError>) -> (LogicLevel, Result<(), SimulationError>) {
    match result {
        Ok(level) => (level, Ok(())),
        Err(e) => (LogicLevel::Undefined, Err(e)),
    }
}

fn record(summary: &mut RunSummary, location: Location, kind: CommandErrorKind) {
    let e = CommandError { location, kind };
    e.report();
    summary.errors.push(e);
}
