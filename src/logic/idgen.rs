use crate::model::{Id, SystemAnnotation, SystemModel};
use std::collections::HashSet;

/// Allocate an identifier that collides with nothing currently present in
/// either graph. The seed itself is preferred; on collision a numeric
/// disambiguator is appended (`seed_2`, `seed_3`, ...).
///
/// The caller must insert the returned id before allocating against the same
/// graphs again: nothing is reserved here.
pub fn new_id(system: &SystemModel, annotation: &SystemAnnotation, seed: &str) -> Id {
    let used = used_ids(system, annotation);

    let mut candidate = seed.to_string();
    let mut idx = 1;
    while used.contains(candidate.as_str()) {
        idx += 1;
        candidate = format!("{}_{}", seed, idx);
    }

    candidate
}

/// Same strategy scoped to interface paths, with a bare numeric suffix
/// (`seed2`, `seed3`, ...)
pub fn new_path(system: &SystemModel, seed: &str) -> String {
    let used: HashSet<&str> = system.interfaces.iter().map(|i| i.path.as_str()).collect();

    let mut candidate = seed.to_string();
    let mut idx = 1;
    while used.contains(candidate.as_str()) {
        idx += 1;
        candidate = format!("{}{}", seed, idx);
    }

    candidate
}

/// Every identifier currently present across both graphs, re-scanned on each
/// allocation so ids added earlier in the run are visible
fn used_ids<'a>(system: &'a SystemModel, annotation: &'a SystemAnnotation) -> HashSet<&'a str> {
    let mut used = HashSet::new();

    used.insert(system.id.as_str());
    for interface in &system.interfaces {
        used.insert(interface.id.as_str());
        for parameter in &interface.parameters {
            used.insert(parameter.id.as_str());
        }
    }

    used.insert(annotation.id.as_str());
    for input in &annotation.inputs {
        used.insert(input.id.as_str());
    }
    for interface_annotation in &annotation.interface_annotations {
        used.insert(interface_annotation.id.as_str());
        for parameter_annotation in &interface_annotation.parameter_annotations {
            used.insert(parameter_annotation.id.as_str());
        }
    }

    used
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpInterface, HttpParameter, HttpParameterKind, Input, InputKind};

    fn interface(id: &str, path: &str) -> HttpInterface {
        HttpInterface {
            id: id.to_string(),
            domain: "localhost".to_string(),
            protocol: "http".to_string(),
            method: "GET".to_string(),
            port: "8080".to_string(),
            encoding: "UTF-8".to_string(),
            headers: Vec::new(),
            path: path.to_string(),
            parameters: vec![HttpParameter {
                id: format!("{}_id_REQ_PARAM", id),
                name: "id".to_string(),
                kind: HttpParameterKind::ReqParam,
            }],
        }
    }

    fn graphs() -> (SystemModel, SystemAnnotation) {
        let system = SystemModel {
            id: "system".to_string(),
            interfaces: vec![interface("aGET", "/a")],
        };
        let annotation = SystemAnnotation {
            id: "ANN".to_string(),
            inputs: vec![Input {
                id: "Input_a".to_string(),
                kind: InputKind::DirectData { data: Vec::new() },
            }],
            interface_annotations: Vec::new(),
        };
        (system, annotation)
    }

    #[test]
    fn unused_seed_is_returned_verbatim() {
        let (system, annotation) = graphs();
        assert_eq!(new_id(&system, &annotation, "fresh"), "fresh");
    }

    #[test]
    fn colliding_seed_gets_numeric_disambiguator() {
        let (mut system, annotation) = graphs();

        assert_eq!(new_id(&system, &annotation, "aGET"), "aGET_2");

        system.interfaces.push(interface("aGET_2", "/a2"));
        assert_eq!(new_id(&system, &annotation, "aGET"), "aGET_3");
    }

    #[test]
    fn ids_from_the_annotation_graph_count_as_used() {
        let (system, annotation) = graphs();
        assert_eq!(new_id(&system, &annotation, "Input_a"), "Input_a_2");
        assert_eq!(
            new_id(&system, &annotation, "aGET_id_REQ_PARAM"),
            "aGET_id_REQ_PARAM_2"
        );
    }

    #[test]
    fn paths_disambiguate_with_a_bare_suffix() {
        let (mut system, _) = graphs();

        assert_eq!(new_path(&system, "/a"), "/a2");

        system.interfaces.push(interface("a2GET", "/a2"));
        assert_eq!(new_path(&system, "/a"), "/a3");
    }
}
