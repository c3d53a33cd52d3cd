use crate::model::Id;
use serde::{Deserialize, Serialize};

/// Default match group for extractions that do not specify one
fn default_match_number() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemAnnotation {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<Input>,
    #[serde(rename = "interface-annotations")]
    pub interface_annotations: Vec<InterfaceAnnotation>,
}

impl SystemAnnotation {
    pub fn get_input(&self, input_id: &str) -> Option<&Input> {
        self.inputs.iter().find(|i| i.id == input_id)
    }

    pub fn add_input(&mut self, input: Input) {
        self.inputs.push(input);
    }

    /// Find the annotation referencing the given interface
    pub fn annotation_for_interface(&self, interface_id: &str) -> Option<&InterfaceAnnotation> {
        self.interface_annotations
            .iter()
            .find(|a| a.interface_id == interface_id)
    }

    pub fn annotation_for_interface_mut(
        &mut self,
        interface_id: &str,
    ) -> Option<&mut InterfaceAnnotation> {
        self.interface_annotations
            .iter_mut()
            .find(|a| a.interface_id == interface_id)
    }

    /// Remove the annotation referencing the given interface, returning it
    pub fn remove_annotation_for_interface(
        &mut self,
        interface_id: &str,
    ) -> Option<InterfaceAnnotation> {
        let pos = self
            .interface_annotations
            .iter()
            .position(|a| a.interface_id == interface_id)?;
        Some(self.interface_annotations.remove(pos))
    }

    /// Whether any parameter annotation still references the given input
    pub fn input_is_used(&self, input_id: &str) -> bool {
        self.interface_annotations
            .iter()
            .flat_map(|a| a.parameter_annotations.iter())
            .any(|pa| pa.input_id == input_id)
    }

    /// Drop the input iff no parameter annotation references it anymore.
    /// Returns true if the input was removed.
    pub fn prune_input_if_unused(&mut self, input_id: &str) -> bool {
        if self.input_is_used(input_id) {
            return false;
        }

        let before = self.inputs.len();
        self.inputs.retain(|i| i.id != input_id);
        before != self.inputs.len()
    }

    /// Strip every extraction reading from the given interface, in all inputs
    pub fn remove_extractions_from(&mut self, interface_id: &str) {
        for input in &mut self.inputs {
            if let InputKind::Extracted { extractions, .. } = &mut input.kind {
                extractions.retain(|e| e.from != interface_id);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceAnnotation {
    pub id: Id,
    /// Weak reference, resolved against the system model
    #[serde(rename = "interface")]
    pub interface_id: Id,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<String>,
    #[serde(rename = "parameter-annotations", default)]
    pub parameter_annotations: Vec<ParameterAnnotation>,
}

impl InterfaceAnnotation {
    /// Find the child annotation referencing the given parameter
    pub fn annotation_for_parameter(&self, parameter_id: &str) -> Option<&ParameterAnnotation> {
        self.parameter_annotations
            .iter()
            .find(|pa| pa.parameter_id == parameter_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAnnotation {
    pub id: Id,
    /// Weak reference, resolved against the system model
    #[serde(rename = "parameter")]
    pub parameter_id: Id,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<String>,
    /// Weak reference; several annotations may share one input
    #[serde(rename = "input")]
    pub input_id: Id,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub id: Id,
    #[serde(flatten)]
    pub kind: InputKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InputKind {
    DirectData {
        data: Vec<String>,
    },
    Counter {
        start: i64,
        increment: i64,
        maximum: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
        scope: CounterScope,
    },
    Extracted {
        #[serde(rename = "initial-value", skip_serializing_if = "Option::is_none")]
        initial_value: Option<String>,
        extractions: Vec<RegExExtraction>,
    },
    /// Catch-all for input types this tool does not know how to handle
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterScope {
    User,
    Global,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegExExtraction {
    pub pattern: String,
    #[serde(rename = "match-number", default = "default_match_number")]
    pub match_number: u32,
    #[serde(rename = "response-key", skip_serializing_if = "Option::is_none")]
    pub response_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(rename = "fallback-value", skip_serializing_if = "Option::is_none")]
    pub fallback_value: Option<String>,
    /// Weak reference to the interface whose response is read
    pub from: Id,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct_input(id: &str) -> Input {
        Input {
            id: id.to_string(),
            kind: InputKind::DirectData {
                data: vec!["42".to_string()],
            },
        }
    }

    fn parameter_annotation(id: &str, parameter_id: &str, input_id: &str) -> ParameterAnnotation {
        ParameterAnnotation {
            id: id.to_string(),
            parameter_id: parameter_id.to_string(),
            overrides: Vec::new(),
            input_id: input_id.to_string(),
        }
    }

    fn annotation_with_shared_input() -> SystemAnnotation {
        SystemAnnotation {
            id: "ANN".to_string(),
            inputs: vec![direct_input("Input_shared")],
            interface_annotations: vec![InterfaceAnnotation {
                id: "ANN_a".to_string(),
                interface_id: "aGET".to_string(),
                overrides: Vec::new(),
                parameter_annotations: vec![
                    parameter_annotation("ANN_a_p1", "p1", "Input_shared"),
                    parameter_annotation("ANN_a_p2", "p2", "Input_shared"),
                ],
            }],
        }
    }

    #[test]
    fn prune_keeps_input_while_still_referenced() {
        let mut annotation = annotation_with_shared_input();

        annotation.interface_annotations[0].parameter_annotations.remove(1);
        assert!(!annotation.prune_input_if_unused("Input_shared"));
        assert!(annotation.get_input("Input_shared").is_some());

        annotation.interface_annotations[0].parameter_annotations.remove(0);
        assert!(annotation.prune_input_if_unused("Input_shared"));
        assert!(annotation.get_input("Input_shared").is_none());
    }

    #[test]
    fn remove_extractions_only_strips_matching_sources() {
        let extraction = |from: &str| RegExExtraction {
            pattern: "(.*)".to_string(),
            match_number: 1,
            response_key: None,
            template: None,
            fallback_value: None,
            from: from.to_string(),
        };

        let mut annotation = SystemAnnotation {
            id: "ANN".to_string(),
            inputs: vec![Input {
                id: "Input_extracted".to_string(),
                kind: InputKind::Extracted {
                    initial_value: None,
                    extractions: vec![extraction("aGET"), extraction("bGET")],
                },
            }],
            interface_annotations: Vec::new(),
        };

        annotation.remove_extractions_from("aGET");

        match &annotation.inputs[0].kind {
            InputKind::Extracted { extractions, .. } => {
                assert_eq!(extractions.len(), 1);
                assert_eq!(extractions[0].from, "bGET");
            }
            other => panic!("unexpected input kind: {:?}", other),
        }
    }

    #[test]
    fn unrecognized_input_type_deserializes_as_unknown() {
        let json = r#"{"id": "Input_x", "type": "neural-oracle"}"#;
        let input: Input = serde_json::from_str(json).expect("input should deserialize");
        assert_eq!(input.id, "Input_x");
        assert_eq!(input.kind, InputKind::Unknown);
    }
}
