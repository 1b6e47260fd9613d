//! Resolution error taxonomy
//!
//! Every violation found by [`super::Registry::resolve_all`] is one
//! [`ResolveError`]; the whole pass returns them together as
//! [`ResolveErrors`], in the order the offending declarations were made.

use std::fmt;

use thiserror::Error;

use crate::check::TypeDesc;
use crate::site::Site;

/// Stable discriminant of a [`ResolveError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnassignableRequirement,
    ProvisionForNonAssignable,
    ImplementationNotProvided,
    MultipleImplementations,
    MultipleStorageImplementations,
    ImplementationProvidedForNonNil,
    IncompatibleFunc,
    IncompatibleStorageImpl,
    IncompatibleStorageKey,
    IncompatibleStorageValue,
    MultipleValues,
    ProvidedNotUsed,
    ModuleNotUsed,
    AlreadyResolved,
    Internal,
}

/// A single resolution violation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Requirement declared against a slot the registry may not write
    #[error("Non-assignable requirement {type_name} at {requirement}")]
    UnassignableRequirement {
        requirement: Site,
        type_name: &'static str,
    },

    /// Provision declared against a slot the registry may not write
    #[error("Provision for non-assignable {type_name} at {provision}")]
    ProvisionForNonAssignable {
        provision: Site,
        type_name: &'static str,
    },

    /// Required or extended slot without any implementation
    #[error("Requirement {type_name} at {declared_at} is not provided")]
    NotProvided {
        declared_at: Site,
        type_name: &'static str,
    },

    /// More than one implementation of a function slot
    #[error(
        "Requirement {} has multiple provisions at:{}",
        requirement_at(.requirement, .type_name),
        site_lines(.provisions)
    )]
    MultipleImplementations {
        requirement: Option<Site>,
        provisions: Vec<Site>,
        type_name: &'static str,
    },

    /// More than one whole-value provision of a map or slice slot
    #[error("Multiple provisions of one storage {type_name} at:{}", site_lines(.provisions))]
    MultipleStorageImplementations {
        provisions: Vec<Site>,
        type_name: &'static str,
    },

    /// Implementation provided for a slot that already holds a value
    #[error("Implementation provided for non-nil {type_name} at {provision}")]
    ProvidedForNonNil {
        provision: Site,
        type_name: &'static str,
    },

    #[error("Incompatible types: {required} required, {offered} provided at {provision}")]
    IncompatibleFunc {
        provision: Site,
        required: TypeDesc,
        offered: TypeDesc,
    },

    #[error("Incompatible types: storage {required} required but {offered} used at {provision}")]
    IncompatibleStorageImpl {
        provision: Site,
        required: TypeDesc,
        offered: TypeDesc,
    },

    #[error("Incompatible types: key {required} required but {offered} used at {provision}")]
    IncompatibleStorageKey {
        provision: Site,
        required: TypeDesc,
        offered: TypeDesc,
    },

    #[error("Incompatible types: value {required} required but {offered} used at {provision}")]
    IncompatibleStorageValue {
        provision: Site,
        required: TypeDesc,
        offered: TypeDesc,
    },

    /// Same key provided more than once for a plain map
    #[error("Extension point has multiple values for key {key} provided at:{}", site_lines(.provisions))]
    MultipleValues { key: String, provisions: Vec<Site> },

    /// Function provision nobody requires
    #[error("Provision {type_name} at {provision} is not used")]
    ProvidedNotUsed {
        provision: Site,
        type_name: &'static str,
    },

    /// Module provides things but nothing it provides is required
    #[error("Have provisions from module {module} but nothing is required from this module")]
    ModuleNotUsed { module: String, provisions: Vec<Site> },

    /// Resolution already succeeded in this registration epoch
    #[error("Already resolved at {resolved_at}")]
    AlreadyResolved { resolved_at: Site },

    /// A validated provision could not be assembled
    #[error("Internal error: cannot assemble {type_name}")]
    Internal { type_name: &'static str },
}

fn requirement_at(requirement: &Option<Site>, type_name: &str) -> String {
    match requirement {
        Some(site) => format!("{type_name} at {site}"),
        None => type_name.to_string(),
    }
}

fn site_lines(sites: &[Site]) -> String {
    sites.iter().map(|site| format!("\n\t{site}")).collect()
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnassignableRequirement { .. } => ErrorKind::UnassignableRequirement,
            Self::ProvisionForNonAssignable { .. } => ErrorKind::ProvisionForNonAssignable,
            Self::NotProvided { .. } => ErrorKind::ImplementationNotProvided,
            Self::MultipleImplementations { .. } => ErrorKind::MultipleImplementations,
            Self::MultipleStorageImplementations { .. } => {
                ErrorKind::MultipleStorageImplementations
            }
            Self::ProvidedForNonNil { .. } => ErrorKind::ImplementationProvidedForNonNil,
            Self::IncompatibleFunc { .. } => ErrorKind::IncompatibleFunc,
            Self::IncompatibleStorageImpl { .. } => ErrorKind::IncompatibleStorageImpl,
            Self::IncompatibleStorageKey { .. } => ErrorKind::IncompatibleStorageKey,
            Self::IncompatibleStorageValue { .. } => ErrorKind::IncompatibleStorageValue,
            Self::MultipleValues { .. } => ErrorKind::MultipleValues,
            Self::ProvidedNotUsed { .. } => ErrorKind::ProvidedNotUsed,
            Self::ModuleNotUsed { .. } => ErrorKind::ModuleNotUsed,
            Self::AlreadyResolved { .. } => ErrorKind::AlreadyResolved,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Declaration sites this error points at
    pub fn locations(&self) -> Vec<&Site> {
        match self {
            Self::UnassignableRequirement { requirement, .. } => vec![requirement],
            Self::ProvisionForNonAssignable { provision, .. }
            | Self::ProvidedForNonNil { provision, .. }
            | Self::IncompatibleFunc { provision, .. }
            | Self::IncompatibleStorageImpl { provision, .. }
            | Self::IncompatibleStorageKey { provision, .. }
            | Self::IncompatibleStorageValue { provision, .. }
            | Self::ProvidedNotUsed { provision, .. } => vec![provision],
            Self::NotProvided { declared_at, .. } => vec![declared_at],
            Self::MultipleImplementations {
                requirement,
                provisions,
                ..
            } => requirement.iter().chain(provisions).collect(),
            Self::MultipleStorageImplementations { provisions, .. }
            | Self::MultipleValues { provisions, .. }
            | Self::ModuleNotUsed { provisions, .. } => provisions.iter().collect(),
            Self::AlreadyResolved { resolved_at } => vec![resolved_at],
            Self::Internal { .. } => Vec::new(),
        }
    }
}

/// All violations found by one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveErrors(Vec<ResolveError>);

impl ResolveErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ResolveError) {
        self.0.push(error);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolveError> {
        self.0.iter()
    }

    /// Discriminants in report order
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.0.iter().map(ResolveError::kind).collect()
    }

    pub fn into_vec(self) -> Vec<ResolveError> {
        self.0
    }
}

impl fmt::Display for ResolveErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [single] = self.0.as_slice() {
            return write!(f, "{single}");
        }
        f.write_str("Multiple errors:")?;
        for error in &self.0 {
            write!(f, "\n{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ResolveErrors {}

impl std::ops::Deref for ResolveErrors {
    type Target = [ResolveError];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<ResolveError>> for ResolveErrors {
    fn from(errors: Vec<ResolveError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ResolveErrors {
    type Item = ResolveError;
    type IntoIter = std::vec::IntoIter<ResolveError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResolveErrors {
    type Item = &'a ResolveError;
    type IntoIter = std::slice::Iter<'a, ResolveError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
