use crate::logic::idgen;
use crate::model::{
    HttpInterface, HttpParameter, Input, InputKind, InterfaceAnnotation, ParameterAnnotation,
    RegExExtraction, SystemAnnotation, SystemModel,
};
use log::warn;
use regex_lite::Regex;

/// Whether an element id passes the configured exclusion patterns.
/// Patterns match the full id, so `login_REQ_PARAM` only matches itself.
pub fn is_included(excluded: &[Regex], id: &str) -> bool {
    !excluded.iter().any(|re| re.is_match(id))
}

/// Deep-clone an interface: fresh id and path, parameters cloned with ids
/// derived from the new interface id, every other field copied
pub fn clone_interface(
    system: &SystemModel,
    annotation: &SystemAnnotation,
    orig: &HttpInterface,
) -> HttpInterface {
    let id = idgen::new_id(system, annotation, &format!("{}_CLONE", orig.id));
    let path = idgen::new_path(system, &format!("{}/clone", orig.path));

    let parameters = orig
        .parameters
        .iter()
        .map(|p| HttpParameter {
            id: idgen::new_id(system, annotation, &format!("{}_{}", id, p.id)),
            name: p.name.clone(),
            kind: p.kind,
        })
        .collect();

    HttpInterface {
        id,
        domain: orig.domain.clone(),
        protocol: orig.protocol.clone(),
        method: orig.method.clone(),
        port: orig.port.clone(),
        encoding: orig.encoding.clone(),
        headers: orig.headers.clone(),
        path,
        parameters,
    }
}

/// Clone a parameter under a fresh id, keeping name and kind.
/// The caller renames if a name collision is undesired.
pub fn clone_parameter(
    system: &SystemModel,
    annotation: &SystemAnnotation,
    orig: &HttpParameter,
) -> HttpParameter {
    HttpParameter {
        id: idgen::new_id(system, annotation, &format!("{}_CLONE", orig.id)),
        name: orig.name.clone(),
        kind: orig.kind,
    }
}

/// Clone an interface annotation against a freshly cloned interface. Child
/// parameter annotations are re-resolved against the clone's parameters by
/// matching parameter name.
pub fn clone_interface_annotation(
    system: &SystemModel,
    annotation: &mut SystemAnnotation,
    excluded: &[Regex],
    orig_ann: &InterfaceAnnotation,
    orig_interface: &HttpInterface,
    new_interface: &HttpInterface,
) -> InterfaceAnnotation {
    let mut parameter_annotations = Vec::new();

    for new_parameter in &new_interface.parameters {
        let orig_parameter = orig_interface
            .parameters
            .iter()
            .find(|p| p.name == new_parameter.name);
        let orig_parameter = match orig_parameter {
            Some(p) => p,
            None => {
                warn!(
                    "No parameter named {} on interface {}!",
                    new_parameter.name, orig_interface.id
                );
                continue;
            }
        };

        let orig_parameter_ann = match orig_ann.annotation_for_parameter(&orig_parameter.id) {
            Some(pa) => pa.clone(),
            None => {
                warn!(
                    "No annotation for parameter {} of interface {}!",
                    orig_parameter.id, orig_interface.id
                );
                continue;
            }
        };

        parameter_annotations.push(clone_parameter_annotation(
            system,
            annotation,
            excluded,
            &orig_parameter_ann,
            new_parameter,
        ));
    }

    InterfaceAnnotation {
        id: idgen::new_id(system, annotation, &format!("{}_CLONE", orig_ann.id)),
        interface_id: new_interface.id.clone(),
        overrides: orig_ann.overrides.clone(),
        parameter_annotations,
    }
}

/// Clone a parameter annotation against a freshly cloned parameter.
///
/// The referenced input is deep-cloned and inserted into the annotation
/// graph, unless its id matches an exclusion pattern, in which case the
/// clone shares the original input.
pub fn clone_parameter_annotation(
    system: &SystemModel,
    annotation: &mut SystemAnnotation,
    excluded: &[Regex],
    orig_ann: &ParameterAnnotation,
    new_parameter: &HttpParameter,
) -> ParameterAnnotation {
    let input_id = match annotation.get_input(&orig_ann.input_id).cloned() {
        Some(orig_input) if is_included(excluded, &orig_input.id) => {
            match clone_input(system, annotation, &orig_input) {
                Some(new_input) => {
                    let id = new_input.id.clone();
                    annotation.add_input(new_input);
                    id
                }
                // unhandled input kind: fall back to sharing the original
                None => orig_ann.input_id.clone(),
            }
        }
        Some(orig_input) => orig_input.id,
        None => {
            warn!("There is no input {} in the annotation!", orig_ann.input_id);
            orig_ann.input_id.clone()
        }
    };

    ParameterAnnotation {
        id: idgen::new_id(system, annotation, &format!("{}_CLONE", orig_ann.id)),
        parameter_id: new_parameter.id.clone(),
        overrides: orig_ann.overrides.clone(),
        input_id,
    }
}

/// Deep-clone an input under a fresh id. Extractions keep their weak
/// reference to whichever interface they already pointed to. Returns None
/// for an input of an unrecognized kind.
pub fn clone_input(
    system: &SystemModel,
    annotation: &SystemAnnotation,
    orig: &Input,
) -> Option<Input> {
    if orig.kind == InputKind::Unknown {
        warn!("Cannot clone input {} of an unrecognized kind!", orig.id);
        return None;
    }

    Some(Input {
        id: idgen::new_id(system, annotation, &format!("{}_CLONE", orig.id)),
        kind: orig.kind.clone(),
    })
}

/// For every extraction reading from `orig_id`, append a parallel extraction
/// reading from `new_id`, so the cloned interface feeds the same extracted
/// inputs as its original
pub fn add_parallel_extractions(annotation: &mut SystemAnnotation, orig_id: &str, new_id: &str) {
    for input in &mut annotation.inputs {
        if let InputKind::Extracted { extractions, .. } = &mut input.kind {
            let copied: Vec<RegExExtraction> = extractions
                .iter()
                .filter(|e| e.from == orig_id)
                .map(|e| RegExExtraction {
                    from: new_id.to_string(),
                    ..e.clone()
                })
                .collect();
            extractions.extend(copied);
        }
    }
}
