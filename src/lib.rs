//! A zero-delay simulator for small networks of combinational logic gates.
//!
//! [`simulation::Circuit`] is the engine. [`interpreter`] drives it from the text command protocol, [`import`] loads it
//! from a JSON netlist and [`table`] prints the truth table of a single gate kind.

pub mod config;
pub mod import;
pub mod interpreter;
pub mod simulation;
pub mod table;
