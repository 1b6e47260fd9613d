//! Declaration sites
//!
//! Every requirement and provision remembers where it was declared so that
//! resolution errors can point at the offending lines. Sites are captured
//! with `#[track_caller]`, so the location is the caller's line, not a line
//! inside this crate.
//!
//! The owning module of a site is either given explicitly (see
//! [`crate::registry::ModuleScope`]) or derived from the source file path:
//! `src/kvdb.rs` and `src/kvdb/mod.rs` both belong to module `src/kvdb`.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Source location of a declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Site {
    file: &'static str,
    line: u32,
    column: u32,
    module: Cow<'static, str>,
}

impl Site {
    /// Capture the location of the caller
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller(), None)
    }

    /// Capture the location of the caller, stamped with an explicit module
    #[track_caller]
    pub fn caller_in(module: &'static str) -> Self {
        Self::from_location(Location::caller(), Some(module))
    }

    /// Build a site from a captured location
    pub fn from_location(
        location: &'static Location<'static>,
        module: Option<&'static str>,
    ) -> Self {
        let file = location.file();
        let module = match module {
            Some(module) => Cow::Borrowed(module),
            None => Cow::Owned(module_of(file)),
        };
        Self {
            file,
            line: location.line(),
            column: location.column(),
            module,
        }
    }

    /// Source file of the declaration
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Line of the declaration (1-based)
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Column of the declaration (1-based)
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Owning module identity
    pub fn module(&self) -> &str {
        &self.module
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Derive a module identity from a source file path
fn module_of(file: &str) -> String {
    let normalized = file.replace('\\', "/");
    let stem = normalized.strip_suffix(".rs").unwrap_or(&normalized);
    match stem.rsplit_once('/') {
        Some((parent, "mod" | "lib" | "main")) => parent.to_string(),
        _ => stem.to_string(),
    }
}
