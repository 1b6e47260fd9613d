//! Resolution engine
//!
//! Validation walks every target in first-mention order and never stops at
//! the first violation. Assignment only runs on a clean store: every target
//! is staged first and the staged values are committed afterwards, so a
//! failure cannot leave some slots written and others not.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::check::{self, Incompatibility, Mismatch, Shape};
use crate::site::Site;
use crate::slot::{Staged, TargetRef};

use super::Registry;
use super::errors::{ResolveError, ResolveErrors};
use super::policy::UnusedScope;
use super::store::{EntryProvision, TargetRecord};

impl Registry {
    /// Validate every declaration, then populate every slot
    ///
    /// Returns all violations at once; when there are any, no slot is
    /// written and the declarations are kept so the caller may inspect them
    /// or [`Registry::reset`]. A successful resolution can only happen once
    /// per registration epoch.
    #[track_caller]
    pub fn resolve_all(&mut self) -> Result<(), ResolveErrors> {
        self.resolve_at(Site::caller())
    }

    pub(crate) fn resolve_at(&mut self, site: Site) -> Result<(), ResolveErrors> {
        if let Some(resolved_at) = &self.resolved_at {
            warn!(resolved_at = %resolved_at, site = %site, "registry already resolved");
            return Err(ResolveErrors::from(vec![ResolveError::AlreadyResolved {
                resolved_at: resolved_at.clone(),
            }]));
        }

        let stats = self.store.stats();
        debug!(
            targets = stats.targets,
            requirements = stats.requirements,
            provisions = stats.provisions,
            "resolving registry"
        );

        let errors = self.validate();
        if !errors.is_empty() {
            warn!(errors = errors.len(), site = %site, "resolution failed");
            return Err(errors);
        }

        let written = self.assign()?;
        info!(slots = written, site = %site, "registry resolved");
        self.resolved_at = Some(site);
        Ok(())
    }

    fn validate(&self) -> ResolveErrors {
        let mut errors = ResolveErrors::new();
        for record in self.store.records() {
            validate_record(record, &mut errors);
        }
        self.check_unused(&mut errors);
        errors
    }

    /// Whether an unrequired provision on this target counts as unused
    fn counts_as_unused(&self, record: &TargetRecord) -> bool {
        record.target.is_settable()
            && !record.is_required()
            && (self.policy.report_unused_containers || !record.target.shape().is_container())
    }

    fn check_unused(&self, errors: &mut ResolveErrors) {
        let records = self.store.records();
        match self.policy.unused_scope {
            UnusedScope::Symbol => {
                for record in records.iter().filter(|r| self.counts_as_unused(r)) {
                    for (_, site) in record.provision_sites() {
                        errors.push(ResolveError::ProvidedNotUsed {
                            provision: site.clone(),
                            type_name: record.target.type_name(),
                        });
                    }
                }
            }
            UnusedScope::Module => {
                let used: HashSet<&str> = records
                    .iter()
                    .filter(|r| r.is_required())
                    .flat_map(TargetRecord::provision_sites)
                    .map(|(_, site)| site.module())
                    .collect();

                let mut unused: Vec<(u64, &Site)> = records
                    .iter()
                    .filter(|r| self.counts_as_unused(r))
                    .flat_map(TargetRecord::provision_sites)
                    .filter(|(_, site)| !used.contains(site.module()))
                    .collect();
                unused.sort_by_key(|(seq, _)| *seq);

                let mut modules: Vec<(String, Vec<Site>)> = Vec::new();
                for (_, site) in unused {
                    match modules.iter_mut().find(|(module, _)| module.as_str() == site.module()) {
                        Some((_, sites)) => sites.push(site.clone()),
                        None => modules.push((site.module().to_string(), vec![site.clone()])),
                    }
                }
                for (module, provisions) in modules {
                    errors.push(ResolveError::ModuleNotUsed { module, provisions });
                }
            }
        }
    }

    /// Stage every write, then commit them all; returns how many slots were written
    ///
    /// Only required targets are written. Provisions nobody requires stay
    /// inert even when the unused policy lets them through.
    fn assign(&mut self) -> Result<usize, ResolveErrors> {
        let mut staged: Vec<Box<dyn Staged>> = Vec::new();
        let mut written: Vec<TargetRef> = Vec::new();
        let mut errors = ResolveErrors::new();

        for record in self.store.records() {
            let target = &record.target;
            if !target.is_settable()
                || !record.is_required()
                || (record.values.is_empty() && !record.has_parts())
            {
                continue;
            }
            let base = record.values.first().map(|p| &p.candidate);
            match target.stage(base, &record.parts()) {
                Some(pending) => {
                    staged.push(pending);
                    written.push(target.clone());
                }
                None => errors.push(ResolveError::Internal {
                    type_name: target.type_name(),
                }),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        for pending in staged {
            pending.commit();
        }
        let count = written.len();
        self.touched.extend(written);
        Ok(count)
    }
}

fn validate_record(record: &TargetRecord, errors: &mut ResolveErrors) {
    let target = &record.target;
    let type_name = target.type_name();

    if !target.is_settable() {
        for requirement in &record.requirements {
            errors.push(ResolveError::UnassignableRequirement {
                requirement: requirement.clone(),
                type_name,
            });
        }
        for provision in &record.rejected {
            errors.push(ResolveError::ProvisionForNonAssignable {
                provision: provision.clone(),
                type_name,
            });
        }
        return;
    }

    let shape = target.shape();
    let requirement = record.requirements.first();

    if !record.values.is_empty() && !target.is_unset() {
        for provision in &record.values {
            errors.push(ResolveError::ProvidedForNonNil {
                provision: provision.site.clone(),
                type_name,
            });
        }
    }

    if shape.is_container() {
        if record.values.len() > 1 {
            errors.push(ResolveError::MultipleStorageImplementations {
                provisions: record.values.iter().map(|p| p.site.clone()).collect(),
                type_name,
            });
        }
        if let Some(declared_at) = requirement
            && record.values.is_empty()
            && target.is_unset()
        {
            errors.push(ResolveError::NotProvided {
                declared_at: declared_at.clone(),
                type_name,
            });
        }
    } else {
        match (record.values.len(), requirement) {
            (0, Some(requirement)) => errors.push(ResolveError::NotProvided {
                declared_at: requirement.clone(),
                type_name,
            }),
            (0 | 1, _) => {}
            (_, requirement) => errors.push(ResolveError::MultipleImplementations {
                requirement: requirement.cloned(),
                provisions: record.values.iter().map(|p| p.site.clone()).collect(),
                type_name,
            }),
        }
    }

    check_types(record, &shape, errors);

    if let Shape::Map { item: None, .. } = shape {
        check_duplicate_keys(record, errors);
    }
}

fn check_types(record: &TargetRecord, shape: &Shape, errors: &mut ResolveErrors) {
    for provision in &record.values {
        if let Err(failure) = check::check_whole(shape, &provision.candidate) {
            errors.push(incompatible(&provision.site, failure));
        }
    }
    for provision in &record.entries {
        for failure in check::check_entry(shape, &provision.key, &provision.value) {
            errors.push(incompatible(&provision.site, failure));
        }
    }
    for provision in &record.elements {
        if let Err(failure) = check::check_element(shape, &provision.candidate) {
            errors.push(incompatible(&provision.site, failure));
        }
    }
}

fn check_duplicate_keys(record: &TargetRecord, errors: &mut ResolveErrors) {
    let target = &record.target;
    let mut groups: Vec<Vec<&EntryProvision>> = Vec::new();
    for entry in &record.entries {
        match groups
            .iter_mut()
            .find(|group| target.same_key(&group[0].key, &entry.key))
        {
            Some(group) => group.push(entry),
            None => groups.push(vec![entry]),
        }
    }
    for group in groups.into_iter().filter(|group| group.len() > 1) {
        errors.push(ResolveError::MultipleValues {
            key: target.render_key(&group[0].key),
            provisions: group.iter().map(|entry| entry.site.clone()).collect(),
        });
    }
}

fn incompatible(site: &Site, failure: Incompatibility) -> ResolveError {
    let Incompatibility {
        mismatch,
        required,
        offered,
    } = failure;
    let provision = site.clone();
    match mismatch {
        Mismatch::Func => ResolveError::IncompatibleFunc {
            provision,
            required,
            offered,
        },
        Mismatch::StorageImpl => ResolveError::IncompatibleStorageImpl {
            provision,
            required,
            offered,
        },
        Mismatch::StorageKey => ResolveError::IncompatibleStorageKey {
            provision,
            required,
            offered,
        },
        Mismatch::StorageValue => ResolveError::IncompatibleStorageValue {
            provision,
            required,
            offered,
        },
    }
}
