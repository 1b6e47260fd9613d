//! Registration store
//!
//! Requirements and provisions are grouped per target, and targets are kept
//! in the order they were first mentioned so that validation reports errors
//! in declaration order. Each provision also carries a store-wide sequence
//! number used to order provisions that live on different targets.

use std::collections::HashMap;

use crate::candidate::Candidate;
use crate::site::Site;
use crate::slot::{Part, SlotId, TargetRef};

/// Provision of a whole slot value
#[derive(Debug)]
pub(crate) struct ValueProvision {
    pub seq: u64,
    pub site: Site,
    pub candidate: Candidate,
}

/// Provision of one map entry (or one multimap item or batch)
#[derive(Debug)]
pub(crate) struct EntryProvision {
    pub seq: u64,
    pub site: Site,
    pub key: Candidate,
    pub value: Candidate,
}

/// Provision of one slice element or batch
#[derive(Debug)]
pub(crate) struct ElementProvision {
    pub seq: u64,
    pub site: Site,
    pub candidate: Candidate,
}

/// Everything recorded against one target
#[derive(Debug)]
pub(crate) struct TargetRecord {
    pub target: TargetRef,
    pub requirements: Vec<Site>,
    pub values: Vec<ValueProvision>,
    pub entries: Vec<EntryProvision>,
    pub elements: Vec<ElementProvision>,
    /// Provisions diverted because the target is not assignable
    pub rejected: Vec<Site>,
}

impl TargetRecord {
    fn new(target: TargetRef) -> Self {
        Self {
            target,
            requirements: Vec::new(),
            values: Vec::new(),
            entries: Vec::new(),
            elements: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn is_required(&self) -> bool {
        !self.requirements.is_empty()
    }

    pub fn has_parts(&self) -> bool {
        !self.entries.is_empty() || !self.elements.is_empty()
    }

    /// Every accepted provision as (sequence, site), in registration order
    pub fn provision_sites(&self) -> Vec<(u64, &Site)> {
        let mut sites: Vec<_> = self
            .values
            .iter()
            .map(|p| (p.seq, &p.site))
            .chain(self.entries.iter().map(|p| (p.seq, &p.site)))
            .chain(self.elements.iter().map(|p| (p.seq, &p.site)))
            .collect();
        sites.sort_by_key(|(seq, _)| *seq);
        sites
    }

    /// Contributions in the order they will be applied
    pub fn parts(&self) -> Vec<Part<'_>> {
        let entries = self.entries.iter().map(|e| {
            (
                e.seq,
                Part::Entry {
                    key: &e.key,
                    value: &e.value,
                },
            )
        });
        let elements = self
            .elements
            .iter()
            .map(|e| (e.seq, Part::Element(&e.candidate)));
        let mut parts: Vec<_> = entries.chain(elements).collect();
        parts.sort_by_key(|(seq, _)| *seq);
        parts.into_iter().map(|(_, part)| part).collect()
    }
}

/// Counts of what the store currently holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub targets: usize,
    pub requirements: usize,
    pub provisions: usize,
    pub rejected: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Store {
    records: Vec<TargetRecord>,
    index: HashMap<SlotId, usize>,
    next_seq: u64,
}

impl Store {
    fn record_mut(&mut self, target: TargetRef) -> &mut TargetRecord {
        let id = target.id();
        let position = match self.index.get(&id) {
            Some(&position) => position,
            None => {
                self.records.push(TargetRecord::new(target));
                let position = self.records.len() - 1;
                self.index.insert(id, position);
                position
            }
        };
        &mut self.records[position]
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    pub fn require(&mut self, target: TargetRef, site: Site) {
        self.record_mut(target).requirements.push(site);
    }

    /// Record against a fixed target goes to the rejected bucket
    fn divert(&mut self, target: &TargetRef, site: &Site) -> bool {
        if target.is_settable() {
            return false;
        }
        self.record_mut(target.clone()).rejected.push(site.clone());
        true
    }

    pub fn provide_value(&mut self, target: TargetRef, site: Site, candidate: Candidate) {
        if self.divert(&target, &site) {
            return;
        }
        let seq = self.next_seq();
        self.record_mut(target).values.push(ValueProvision {
            seq,
            site,
            candidate,
        });
    }

    pub fn provide_entry(
        &mut self,
        target: TargetRef,
        site: Site,
        key: Candidate,
        value: Candidate,
    ) {
        if self.divert(&target, &site) {
            return;
        }
        let seq = self.next_seq();
        self.record_mut(target).entries.push(EntryProvision {
            seq,
            site,
            key,
            value,
        });
    }

    pub fn provide_element(&mut self, target: TargetRef, site: Site, candidate: Candidate) {
        if self.divert(&target, &site) {
            return;
        }
        let seq = self.next_seq();
        self.record_mut(target).elements.push(ElementProvision {
            seq,
            site,
            candidate,
        });
    }

    pub fn records(&self) -> &[TargetRecord] {
        &self.records
    }

    pub fn stats(&self) -> StoreStats {
        self.records
            .iter()
            .fold(StoreStats::default(), |mut stats, record| {
                stats.targets += 1;
                stats.requirements += record.requirements.len();
                stats.provisions +=
                    record.values.len() + record.entries.len() + record.elements.len();
                stats.rejected += record.rejected.len();
                stats
            })
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
        self.next_seq = 0;
    }
}
