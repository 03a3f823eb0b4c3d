//! Loads a circuit from a JSON netlist.
//!
//! ```json
//! {
//!     "signals": ["a", "b"],
//!     "gates": [{ "kind": "XOR", "name": "sum" }, { "kind": "AND", "name": "carry" }],
//!     "wires": [{ "from": "a", "to": "sum", "input": 0 }, { "from": "b", "to": "sum", "input": 1 }],
//!     "watch": ["sum"]
//! }
//! ```
//!
//! Only `gates` is required. Everything is added in the order above, so wires may refer to any gate or signal in the file.

use std::path::Path;

use json::JsonValue;
use thiserror::Error;

use crate::simulation::{Circuit, SimulationError};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read netlist: {0}")]
    Io(#[from] std::io::Error),

    #[error("netlist is not valid json: {0}")]
    Json(#[from] json::Error),

    #[error("malformed netlist: {0}")]
    Format(String),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

pub fn import(path: impl AsRef<Path>, circuit: &mut Circuit) -> Result<(), ImportError> {
    let netlist = std::fs::read_to_string(path)?;
    import_str(&netlist, circuit)
}

pub fn import_str(netlist: &str, circuit: &mut Circuit) -> Result<(), ImportError> {
    let JsonValue::Object(mut netlist) = json::parse(netlist)? else {
        return Err(format_error("toplevel json must be object"));
    };

    let signals = optional_array(&mut netlist, "signals")?;
    let gates = netlist.remove("gates").ok_or_else(|| format_error("toplevel object must contain key \"gates\""))?;
    let JsonValue::Array(gates) = gates else { return Err(format_error("gates must be array")) };
    let wires = optional_array(&mut netlist, "wires")?;
    let watch = optional_array(&mut netlist, "watch")?;

    for signal in signals {
        let name = signal.as_str().ok_or_else(|| format_error("signal must be string"))?;
        circuit.add_signal(name)?;
    }

    for gate in gates {
        let JsonValue::Object(mut gate) = gate else { return Err(format_error("gate must be object")) };
        let kind = string_field(&mut gate, "gate", "kind")?;
        let name = string_field(&mut gate, "gate", "name")?;
        circuit.add_gate(&kind, &name)?;
    }

    for wire in wires {
        let JsonValue::Object(mut wire) = wire else { return Err(format_error("wire must be object")) };
        let from = string_field(&mut wire, "wire", "from")?;
        let to = string_field(&mut wire, "wire", "to")?;
        let input = wire.remove("input").ok_or_else(|| format_error("wire must have field 'input'"))?;
        let input = input.as_usize().ok_or_else(|| format_error("wire input must be non-negative integer"))?;
        circuit.connect(&from, &to, input)?;
    }

    for name in watch {
        let name = name.as_str().ok_or_else(|| format_error("watched gate must be string"))?;
        circuit.watch(name)?;
    }

    tracing::info!(gates = circuit.gates().len(), links = circuit.num_links(), "netlist imported");
    Ok(())
}

fn format_error(message: &str) -> ImportError {
    ImportError::Format(message.to_string())
}

fn optional_array(object: &mut json::object::Object, key: &str) -> Result<Vec<JsonValue>, ImportError> {
    match object.remove(key) {
        None => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => Ok(items),
        Some(_) => Err(ImportError::Format(format!("{key} must be array"))),
    }
}

fn string_field(object: &mut json::object::Object, what: &str, key: &str) -> Result<String, ImportError> {
    let value = object.remove(key).ok_or_else(|| ImportError::Format(format!("{what} must have field '{key}'")))?;
    value.as_str().map(str::to_string).ok_or_else(|| ImportError::Format(format!("{what} {key} must be string")))
}
