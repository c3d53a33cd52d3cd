use std::fmt;

/// The closed set of edits the engine can apply, with their relative
/// probability weights. Weights sum to 1 and are consumed in declaration
/// order, so a draw in [0, 1) maps to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    AddInterface,
    AddParameter,
    ChangeInterfacePath,
    ChangeParameterName,
    RemoveInterface,
    RemoveParameter,
}

pub const WEIGHTED_KINDS: [(ChangeKind, f64); 6] = [
    (ChangeKind::AddInterface, 0.15),
    (ChangeKind::AddParameter, 0.25),
    (ChangeKind::ChangeInterfacePath, 0.20),
    (ChangeKind::ChangeParameterName, 0.20),
    (ChangeKind::RemoveInterface, 0.10),
    (ChangeKind::RemoveParameter, 0.10),
];

impl ChangeKind {
    /// Map a uniform draw in [0, 1) to a kind via cumulative weight ranges
    pub fn sample(u: f64) -> ChangeKind {
        debug_assert!((0.0..1.0).contains(&u), "draw out of range: {}", u);

        let mut cumulative = 0.0;
        for (kind, weight) in WEIGHTED_KINDS {
            cumulative += weight;
            if u < cumulative {
                return kind;
            }
        }

        // the table sums to 1, so this is only reachable through float drift
        WEIGHTED_KINDS[WEIGHTED_KINDS.len() - 1].0
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeKind::AddInterface => "ADD_INTERFACE",
            ChangeKind::AddParameter => "ADD_PARAMETER",
            ChangeKind::ChangeInterfacePath => "CHANGE_INTERFACE_PATH",
            ChangeKind::ChangeParameterName => "CHANGE_PARAMETER_NAME",
            ChangeKind::RemoveInterface => "REMOVE_INTERFACE",
            ChangeKind::RemoveParameter => "REMOVE_PARAMETER",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = WEIGHTED_KINDS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9, "weights sum to {}", total);
    }

    #[test]
    fn sample_maps_draws_in_declaration_order() {
        assert_eq!(ChangeKind::sample(0.0), ChangeKind::AddInterface);
        assert_eq!(ChangeKind::sample(0.14), ChangeKind::AddInterface);
        assert_eq!(ChangeKind::sample(0.16), ChangeKind::AddParameter);
        assert_eq!(ChangeKind::sample(0.39), ChangeKind::AddParameter);
        assert_eq!(ChangeKind::sample(0.41), ChangeKind::ChangeInterfacePath);
        assert_eq!(ChangeKind::sample(0.59), ChangeKind::ChangeInterfacePath);
        assert_eq!(ChangeKind::sample(0.61), ChangeKind::ChangeParameterName);
        assert_eq!(ChangeKind::sample(0.79), ChangeKind::ChangeParameterName);
        assert_eq!(ChangeKind::sample(0.81), ChangeKind::RemoveInterface);
        assert_eq!(ChangeKind::sample(0.89), ChangeKind::RemoveInterface);
        assert_eq!(ChangeKind::sample(0.91), ChangeKind::RemoveParameter);
        assert_eq!(ChangeKind::sample(0.999), ChangeKind::RemoveParameter);
    }
}
