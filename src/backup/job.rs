use crate::backup::filter::{build_filters, FilterRule};
use crate::backup::paths::{ensure_destination_dir, ensure_source_dir, resolve_dir};
use crate::backup::result_error::result::Result;
use crate::backup::validate::{validate_include_paths, validate_not_blank};
use bon::Builder;
use getset::{CopyGetters, Getters};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// One entry of the config list: copy `source` into `destination`.
#[derive(Clone, Debug, Serialize, Deserialize, Validate, Builder, PartialEq, Eq, Getters, CopyGetters)]
#[serde(deny_unknown_fields)]
pub struct BackupJob {
    #[serde(default = "default_source")]
    #[builder(default = default_source(), into)]
    #[getset(get = "pub")]
    source: String,
    #[validate(custom(function = validate_not_blank))]
    #[builder(into)]
    #[getset(get = "pub")]
    destination: String,
    #[serde(default = "default_archive")]
    #[builder(default = default_archive())]
    #[getset(get_copy = "pub")]
    archive: bool,
    #[serde(default)]
    #[validate(custom(function = validate_include_paths))]
    #[builder(default, into)]
    #[getset(get = "pub")]
    include: IndexMap<String, bool>,
    #[serde(default)]
    #[builder(default)]
    #[getset(get_copy = "pub")]
    delete: bool,
}

fn default_source() -> String {
    ".".to_string()
}

fn default_archive() -> bool {
    true
}

/// A job whose directories have been checked against the filesystem.
#[derive(Clone, Debug, PartialEq, Eq, Getters, CopyGetters)]
pub struct ResolvedJob {
    #[getset(get = "pub")]
    source: PathBuf,
    #[getset(get = "pub")]
    destination: PathBuf,
    #[getset(get_copy = "pub")]
    archive: bool,
    #[getset(get_copy = "pub")]
    delete: bool,
    #[getset(get = "pub")]
    filters: Vec<FilterRule>,
}

impl BackupJob {
    /// Resolves both directories against `base_dir`. The source must exist.
    /// The destination is created unless this is a dry run, which never
    /// touches the filesystem.
    pub fn resolve<P: AsRef<Path>>(&self, base_dir: P, dry_run: bool) -> Result<ResolvedJob> {
        let base_dir = base_dir.as_ref();
        let source = resolve_dir(base_dir, &self.source)?;
        ensure_source_dir(&source)?;

        let destination = resolve_dir(base_dir, &self.destination)?;
        if !dry_run {
            ensure_destination_dir(&destination)?;
        }

        Ok(ResolvedJob {
            source,
            destination,
            archive: self.archive,
            delete: self.delete,
            filters: build_filters(&self.include),
        })
    }
}
