//! File-backed descriptor sets and scan settings for cmdbind.
//!
//! [`DescriptorFile`] reads flags, parameters and others sinks from YAML or
//! JSON and turns them into a validated [`Registry`](cmdbind_core::Registry).
//! [`load_scan_config`] reads a standalone
//! [`ScanConfig`](cmdbind_core::ScanConfig).

mod error;
mod loader;

pub use error::{ConfigError, Result};
pub use loader::{DescriptorFile, FileFormat, load_scan_config};
