//! JSON interface export for front-end integration.
//!
//! A flowsheet interface lists the variables a user interface may read or
//! write, with display names and unit strings. Blocks contribute their
//! variables; the assembled interface serialises to JSON.

use serde::{Deserialize, Serialize};
use wf_core::Real;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowsheetInterface {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub variables: Vec<ExportedVariable>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportedVariable {
    /// Dotted model path, e.g. `"asm_translator.inlet.S_ac"`.
    pub name: String,
    pub display_name: String,
    pub units: String,
    pub value: Real,
    /// Whether the variable is currently fixed in the model.
    pub fixed: bool,
    /// Outputs of a computation; a front end should not offer editing.
    #[serde(default)]
    pub read_only: bool,
}

impl FlowsheetInterface {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            description: None,
            variables: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn push(&mut self, variable: ExportedVariable) {
        self.variables.push(variable);
    }

    pub fn extend(&mut self, variables: impl IntoIterator<Item = ExportedVariable>) {
        self.variables.extend(variables);
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_round_trips_through_json() {
        let mut fi = FlowsheetInterface::new("Sludge train").with_description("digester to AS");
        fi.push(ExportedVariable {
            name: "asm_translator.inlet.S_ac".to_string(),
            display_name: "Acetate concentration".to_string(),
            units: "kg COD/m3".to_string(),
            value: 0.1976,
            fixed: true,
            read_only: false,
        });

        let json = fi.to_json_pretty().unwrap();
        let parsed = FlowsheetInterface::from_json(&json).unwrap();
        assert_eq!(parsed, fi);
    }

    #[test]
    fn read_only_defaults_to_false() {
        let json = r#"{
            "display_name": "x",
            "variables": [{
                "name": "a.b",
                "display_name": "B",
                "units": "-",
                "value": 1.0,
                "fixed": false
            }]
        }"#;
        let parsed = FlowsheetInterface::from_json(json).unwrap();
        assert!(!parsed.variables[0].read_only);
        assert!(parsed.description.is_none());
    }
}
