//! Link-time declarations
//!
//! Modules submit a [`Declaration`] to [`DECLARATIONS`] and never reference
//! each other; whoever drives resolution collects them all with
//! [`Registry::declare_all`].
//!
//! ```ignore
//! use tether_domain::declare::{DECLARATIONS, Declaration};
//! use tether_domain::ModuleScope;
//!
//! #[linkme::distributed_slice(DECLARATIONS)]
//! static KVDB: Declaration = Declaration {
//!     module: "kvdb",
//!     description: "in-memory key-value store",
//!     declare: declare_kvdb,
//! };
//!
//! fn declare_kvdb(scope: &mut ModuleScope<'_>) {
//!     scope.provide(&PUT, Arc::new(put));
//! }
//! ```

use tracing::debug;

use crate::registry::{ModuleScope, Registry};

/// One module's declarations
pub struct Declaration {
    /// Owning module; stamped on every declared site
    pub module: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Records the module's requirements and provisions
    pub declare: fn(&mut ModuleScope<'_>),
}

// Auto-collection via linkme distributed slices - modules submit entries at compile time
#[linkme::distributed_slice]
pub static DECLARATIONS: [Declaration] = [..];

/// List all linked declarations as (module, description), ordered by module
pub fn list_declarations() -> Vec<(&'static str, &'static str)> {
    let mut entries: Vec<_> = DECLARATIONS
        .iter()
        .map(|d| (d.module, d.description))
        .collect();
    entries.sort_unstable();
    entries
}

impl Registry {
    /// Run every linked declaration, ordered by module name
    ///
    /// Returns how many declarations ran.
    pub fn declare_all(&mut self) -> usize {
        self.declare_from(&DECLARATIONS)
    }

    /// Run the given declarations, ordered by module name
    pub fn declare_from(&mut self, declarations: &[Declaration]) -> usize {
        let mut ordered: Vec<&Declaration> = declarations.iter().collect();
        ordered.sort_by_key(|d| d.module);
        for declaration in &ordered {
            debug!(module = declaration.module, "running declaration");
            (declaration.declare)(&mut self.module(declaration.module));
        }
        ordered.len()
    }
}
