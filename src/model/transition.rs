use crate::model::Id;
use thiserror::Error;

const HEADER: &str = "source,target";

/// Allowed interface-to-interface transitions, mutated in lockstep with
/// interface additions and removals in the system model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransitionModel {
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: Id,
    pub to: Id,
}

#[derive(Debug, Error)]
#[error("malformed transition row {line:?}")]
pub struct TransitionParseError {
    pub line: String,
}

impl TransitionModel {
    pub fn parse(text: &str) -> Result<Self, TransitionParseError> {
        let mut transitions = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line == HEADER {
                continue;
            }

            match line.split_once(',') {
                Some((from, to)) if !from.is_empty() && !to.is_empty() && !to.contains(',') => {
                    transitions.push(Transition {
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
                _ => {
                    return Err(TransitionParseError {
                        line: line.to_string(),
                    })
                }
            }
        }

        Ok(Self { transitions })
    }

    pub fn serialize(&self) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for t in &self.transitions {
            out.push_str(&t.from);
            out.push(',');
            out.push_str(&t.to);
            out.push('\n');
        }
        out
    }

    /// Duplicate every row mentioning `from_id`, substituting `to_id`, so the
    /// copy inherits the original's reachability. A self-loop on `from_id`
    /// also yields a self-loop on `to_id`.
    pub fn copy_transitions(&mut self, from_id: &str, to_id: &str) {
        let mut copied = Vec::new();

        for t in &self.transitions {
            let source_matches = t.from == from_id;
            let target_matches = t.to == from_id;

            if source_matches {
                copied.push(Transition {
                    from: to_id.to_string(),
                    to: t.to.clone(),
                });
            }
            if target_matches {
                copied.push(Transition {
                    from: t.from.clone(),
                    to: to_id.to_string(),
                });
            }
            if source_matches && target_matches {
                copied.push(Transition {
                    from: to_id.to_string(),
                    to: to_id.to_string(),
                });
            }
        }

        self.transitions.extend(copied);
    }

    /// Delete every row mentioning the given interface
    pub fn remove_interface(&mut self, interface_id: &str) {
        self.transitions
            .retain(|t| t.from != interface_id && t.to != interface_id);
    }
}
