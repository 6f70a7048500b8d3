//! Poncho environment packaging.
//!
//! Turns a poncho JSON spec into a conda environment archive: editable pip
//! packages are discovered in the current environment, the spec is merged into
//! a conda spec, git/http data is fetched next to it, and the whole prefix is
//! handed to conda-pack.

pub mod command;
pub mod error;
pub mod fetch;
pub mod installer;
pub mod local;
pub mod merge;
pub mod pack;
pub mod spec;

pub use command::{CommandRunner, ExternalCommand, SystemRunner};
pub use error::{PackError, Result};
pub use local::LocalPackages;
pub use merge::{CondaSpec, MergedSpec};
pub use pack::pack_env;
pub use spec::PonchoSpec;

#[cfg(test)]
pub(crate) mod testing;
