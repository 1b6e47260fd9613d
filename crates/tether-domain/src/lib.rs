//! # Tether Domain
//!
//! Two-phase dependency wiring for independent modules.
//!
//! Modules declare *requirements* (slots that must be filled) and
//! *provisions* (implementations, map entries, slice elements) against
//! shared [`Slot`]s without referencing each other. A single
//! [`Registry::resolve_all`] pass then validates everything, reports every
//! violation with the source lines involved, and only when the store is
//! clean writes all slots at once.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`slot`] | Typed slots and their kinds (function, map, multimap, slice) |
//! | [`registry`] | Registration store, resolution engine, error taxonomy |
//! | [`check`] | Type compatibility between slots and provided values |
//! | [`candidate`] | Type-erased provided values |
//! | [`constants`] | Defaults shared with dependent crates |
//! | [`site`] | Declaration source locations |
//! | [`declare`] | Link-time module declarations |
//! | [`global`] | Process-wide registry |
//! | [`error`] | Crate error type |

pub mod candidate;
pub mod check;
pub mod constants;
pub mod declare;
pub mod error;
pub mod global;
pub mod registry;
pub mod site;
pub mod slot;

pub use candidate::Candidate;
pub use declare::{DECLARATIONS, Declaration};
pub use error::{Error, Result};
pub use registry::{
    ErrorKind, ModuleScope, Registry, ResolveError, ResolveErrors, ResolvePolicy, StoreStats,
    UnusedScope,
};
pub use site::Site;
pub use slot::{AsTarget, FnSlot, MapSlot, MultiMapSlot, SliceSlot, Slot, SlotId, TargetRef};

// Re-exported for `#[distributed_slice]` submissions in dependent crates
pub use linkme;
