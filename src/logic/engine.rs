use crate::config::RunConfig;
use crate::logic::{cloning, idgen, ChangeKind};
use crate::model::{
    HttpParameter, HttpParameterKind, Id, SystemAnnotation, SystemModel, TransitionModel,
};
use crate::store::SnapshotStore;
use anyhow::{anyhow, bail, Result};
use itertools::Itertools;
use log::{error, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use regex_lite::Regex;

/// Applies a randomized sequence of structural edits to a loaded system
/// model, its annotation graph and the companion transition table, writing
/// the cumulative state as a new version at each group boundary.
///
/// All randomness comes from one seeded generator, consumed in a fixed
/// order: every group size first, then every edit kind, then the uniform
/// candidate picks made while applying each edit. The seed therefore fully
/// determines the produced snapshot sequence.
pub struct ApiChanger {
    system: SystemModel,
    annotation: SystemAnnotation,
    transitions: TransitionModel,
    snapshots: SnapshotStore,
    rng: SmallRng,
    excluded: Vec<Regex>,
    base_version: u32,
    group_count: usize,
    changes_low: u32,
    changes_high: u32,
    /// Interfaces this run created, the only ones eligible for removal
    added_interfaces: Vec<Id>,
    /// (owning interface id, parameter id) pairs this run created
    added_parameters: Vec<(Id, Id)>,
}

impl ApiChanger {
    pub fn new(
        system: SystemModel,
        annotation: SystemAnnotation,
        transitions: TransitionModel,
        snapshots: SnapshotStore,
        run: &RunConfig,
        exclusions: &[String],
    ) -> Result<Self> {
        if run.group_count == 0 {
            bail!("group_count must be positive");
        }
        if run.changes_low >= run.changes_high {
            bail!(
                "invalid group size bounds: [{}, {})",
                run.changes_low,
                run.changes_high
            );
        }

        let excluded = exclusions
            .iter()
            .map(|p| {
                Regex::new(&format!("^(?:{})$", p))
                    .map_err(|e| anyhow!("invalid exclusion pattern {:?}: {}", p, e))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            system,
            annotation,
            transitions,
            snapshots,
            rng: SmallRng::seed_from_u64(run.seed),
            excluded,
            base_version: run.base_version,
            group_count: run.group_count,
            changes_low: run.changes_low,
            changes_high: run.changes_high,
            added_interfaces: Vec::new(),
            added_parameters: Vec::new(),
        })
    }

    /// Generate the edit plan, apply it and write a snapshot per group
    pub fn run(&mut self) -> Result<()> {
        let group_sizes: Vec<u32> = (0..self.group_count)
            .map(|_| self.rng.gen_range(self.changes_low..self.changes_high))
            .collect();
        let total: u32 = group_sizes.iter().sum();
        info!("Change sequence length is {}.", total);

        let plan: Vec<ChangeKind> = (0..total)
            .map(|_| ChangeKind::sample(self.rng.gen::<f64>()))
            .collect();
        info!("Change sequence: [{}]", plan.iter().join(", "));

        let mut group = 0usize;
        let mut inner = 0u32;

        info!("### v{} -> v{}:", self.base_version, self.base_version + 1);
        for kind in plan {
            if inner == group_sizes[group] {
                group += 1;
                inner = 0;

                self.snapshot(self.base_version + group as u32);
                info!(
                    "### v{} -> v{}:",
                    self.base_version + group as u32,
                    self.base_version + group as u32 + 1
                );
            }

            self.apply_change(kind)?;
            inner += 1;
        }

        self.snapshot(self.base_version + self.group_count as u32);

        Ok(())
    }

    /// Write the cumulative state as the given version. Per the error
    /// contract a failed write is reported and the run carries on.
    fn snapshot(&self, version: u32) {
        match self
            .snapshots
            .save_version(version, &self.system, &self.annotation, &self.transitions)
        {
            Ok(()) => info!(
                "Collected {} interfaces and {} inputs into v{}.",
                self.system.interfaces.len(),
                self.annotation.inputs.len(),
                version
            ),
            Err(e) => error!("Failed to write snapshot v{}: {}", version, e),
        }
    }

    fn apply_change(&mut self, kind: ChangeKind) -> Result<()> {
        match kind {
            ChangeKind::AddInterface => self.add_interface(),
            ChangeKind::AddParameter => self.add_parameter(),
            ChangeKind::ChangeInterfacePath => self.change_interface_path(),
            ChangeKind::ChangeParameterName => self.change_parameter_name(),
            ChangeKind::RemoveInterface => self.remove_interface(),
            ChangeKind::RemoveParameter => self.remove_parameter(),
        }
    }

    fn add_interface(&mut self) -> Result<()> {
        if self.system.interfaces.is_empty() {
            bail!("cannot clone an interface: the system model has none");
        }
        let idx = self.rng.gen_range(0..self.system.interfaces.len());
        let orig = self.system.interfaces[idx].clone();

        let new_interface = cloning::clone_interface(&self.system, &self.annotation, &orig);
        self.added_interfaces.push(new_interface.id.clone());
        self.system.interfaces.push(new_interface.clone());

        if let Some(orig_ann) = self.annotation.annotation_for_interface(&orig.id).cloned() {
            let new_ann = cloning::clone_interface_annotation(
                &self.system,
                &mut self.annotation,
                &self.excluded,
                &orig_ann,
                &orig,
                &new_interface,
            );
            self.annotation.interface_annotations.push(new_ann);
        }

        cloning::add_parallel_extractions(&mut self.annotation, &orig.id, &new_interface.id);
        self.transitions.copy_transitions(&orig.id, &new_interface.id);

        info!("Cloned interface {} to {}.", orig.id, new_interface.id);
        Ok(())
    }

    fn add_parameter(&mut self) -> Result<()> {
        let excluded = &self.excluded;
        let candidates: Vec<(Id, HttpParameter)> = self
            .system
            .interfaces
            .iter()
            .flat_map(|i| {
                i.parameters
                    .iter()
                    .filter(move |p| cloning::is_included(excluded, &p.id))
                    .map(move |p| (i.id.clone(), p.clone()))
            })
            .collect();
        if candidates.is_empty() {
            bail!("no parameter is eligible as a clone source");
        }

        let idx = self.rng.gen_range(0..candidates.len());
        let (interface_id, orig_parameter) = candidates[idx].clone();

        let mut new_parameter =
            cloning::clone_parameter(&self.system, &self.annotation, &orig_parameter);
        new_parameter.name.push_str("Clone");

        self.added_parameters
            .push((interface_id.clone(), new_parameter.id.clone()));
        self.system
            .get_interface_mut(&interface_id)
            .ok_or_else(|| anyhow!("interface {} vanished mid-edit", interface_id))?
            .parameters
            .push(new_parameter.clone());

        match self.annotation.annotation_for_interface(&interface_id).cloned() {
            None => warn!("No annotation for interface {}!", interface_id),
            Some(orig_ann) => match orig_ann.annotation_for_parameter(&orig_parameter.id) {
                None => warn!(
                    "No annotation for parameter {} of interface {}!",
                    orig_parameter.id, interface_id
                ),
                Some(orig_parameter_ann) => {
                    let orig_parameter_ann = orig_parameter_ann.clone();
                    let new_ann = cloning::clone_parameter_annotation(
                        &self.system,
                        &mut self.annotation,
                        &self.excluded,
                        &orig_parameter_ann,
                        &new_parameter,
                    );
                    if let Some(ann) = self.annotation.annotation_for_interface_mut(&interface_id) {
                        ann.parameter_annotations.push(new_ann);
                    }
                }
            },
        }

        info!(
            "Cloned parameter {} of interface {} to {}.",
            orig_parameter.id, interface_id, new_parameter.id
        );
        Ok(())
    }

    fn change_interface_path(&mut self) -> Result<()> {
        if self.system.interfaces.is_empty() {
            bail!("cannot change a path: the system model has no interfaces");
        }
        let idx = self.rng.gen_range(0..self.system.interfaces.len());

        let seed = format!("{}/changed", self.system.interfaces[idx].path);
        let new_path = idgen::new_path(&self.system, &seed);

        let interface = &mut self.system.interfaces[idx];
        interface.path = new_path.clone();

        info!("Changed path of {} to {}.", interface.id, new_path);
        Ok(())
    }

    fn change_parameter_name(&mut self) -> Result<()> {
        let excluded = &self.excluded;
        let candidates: Vec<(Id, Id)> = self
            .system
            .interfaces
            .iter()
            .flat_map(|i| {
                i.parameters
                    .iter()
                    .filter(|p| p.kind != HttpParameterKind::UrlPart)
                    .filter(move |p| cloning::is_included(excluded, &p.id))
                    .map(move |p| (i.id.clone(), p.id.clone()))
            })
            .collect();
        if candidates.is_empty() {
            bail!("no parameter is eligible for renaming");
        }

        let idx = self.rng.gen_range(0..candidates.len());
        let (interface_id, parameter_id) = candidates[idx].clone();

        let parameter = self
            .system
            .get_interface_mut(&interface_id)
            .and_then(|i| i.parameters.iter_mut().find(|p| p.id == parameter_id))
            .ok_or_else(|| anyhow!("parameter {} vanished mid-edit", parameter_id))?;
        parameter.name = format!("{}-changed", parameter.name);
        let new_name = parameter.name.clone();

        info!("Changed name of {} to {}.", parameter_id, new_name);
        Ok(())
    }

    fn remove_interface(&mut self) -> Result<()> {
        if self.added_interfaces.is_empty() {
            warn!("Asked to remove an interface, but none was added so far.");
            return Ok(());
        }
        let idx = self.rng.gen_range(0..self.added_interfaces.len());
        let interface_id = self.added_interfaces.remove(idx);

        if self.system.remove_interface(&interface_id).is_none() {
            warn!("There was no interface {} in the system model!", interface_id);
            return Ok(());
        }

        let removed_ann = self.annotation.remove_annotation_for_interface(&interface_id);
        self.annotation.remove_extractions_from(&interface_id);
        if let Some(ann) = removed_ann {
            for parameter_ann in &ann.parameter_annotations {
                self.annotation.prune_input_if_unused(&parameter_ann.input_id);
            }
        }

        self.transitions.remove_interface(&interface_id);

        info!("Removed interface {}.", interface_id);
        Ok(())
    }

    fn remove_parameter(&mut self) -> Result<()> {
        if self.added_parameters.is_empty() {
            warn!("Asked to remove a parameter, but none was added so far.");
            return Ok(());
        }
        let idx = self.rng.gen_range(0..self.added_parameters.len());
        let (interface_id, parameter_id) = self.added_parameters.remove(idx);

        let interface = match self.system.get_interface_mut(&interface_id) {
            Some(i) => i,
            None => {
                warn!("There was no interface {} in the system model!", interface_id);
                return Ok(());
            }
        };
        match interface.parameters.iter().position(|p| p.id == parameter_id) {
            Some(pos) => {
                interface.parameters.remove(pos);
            }
            None => {
                warn!(
                    "There was no parameter {} on interface {}!",
                    parameter_id, interface_id
                );
                return Ok(());
            }
        }

        let removed_ann = self
            .annotation
            .annotation_for_interface_mut(&interface_id)
            .and_then(|ann| {
                let pos = ann
                    .parameter_annotations
                    .iter()
                    .position(|pa| pa.parameter_id == parameter_id)?;
                Some(ann.parameter_annotations.remove(pos))
            });
        if let Some(parameter_ann) = removed_ann {
            self.annotation.prune_input_if_unused(&parameter_ann.input_id);
        }

        info!("Removed parameter {}.", parameter_id);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn graphs(&self) -> (&SystemModel, &SystemAnnotation, &TransitionModel) {
        (&self.system, &self.annotation, &self.transitions)
    }
}
