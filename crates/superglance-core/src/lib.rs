//! superglance core - environment selection and credential injection for glance
//!
//! Pipeline for one invocation:
//!
//! 1. [`ConfigStore::load`] reads `~/.superglance` and `./.superglance`
//! 2. [`runner::plan`] expands groups and validates environments
//! 3. [`resolver::resolve`] turns each section into credentials, consulting
//!    the credential store for `USE_KEYRING` values
//! 4. [`GlanceLauncher`] runs `glance` with those credentials in its environment

pub mod config;
pub mod error;
pub mod group;
pub mod keystone;
pub mod launcher;
pub mod resolver;
pub mod runner;

pub use config::{ConfigStore, Document, Section};
pub use error::{ConfigError, LaunchError, ResolveError, RunError};
pub use keystone::{rm_prefix, KeystoneCredentials};
pub use launcher::{ClientExit, GlanceLauncher, LaunchRequest, Launcher, ProcessEnvironment};
pub use resolver::ResolvedEntry;
pub use runner::{Outcome, RunPlan, RunSummary};
