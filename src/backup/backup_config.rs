use crate::backup::executor::execute;
use crate::backup::job::BackupJob;
use crate::backup::options::RunOptions;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::{WithDebugObjectAndFnName, WithMsg};
use crate::backup::rsync::{RsyncCommand, RSYNC_PROGRAM};
use chrono::Local;
use derive_more::From;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use validator::Validate;

pub static DEFAULT_CONFIG_PATH: &str = ".rsbu.yaml";
static SEPARATOR: &str = "==================================================";

/// The whole config file: a YAML sequence of jobs, run in order.
#[derive(Clone, Debug, Default, From, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(transparent)]
pub struct BackupConfig {
    #[validate(nested)]
    jobs: Vec<BackupJob>,
}

impl BackupConfig {
    pub fn jobs(&self) -> &[BackupJob] {
        &self.jobs
    }

    /// Reads and validates the config file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = File::open(path)
            .map_err(Error::from)
            .with_msg(format!("Open config failed: {:?}", path))
            .and_then(|f| {
                serde_yml::from_reader::<_, BackupConfig>(f)
                    .map_err(Error::from)
                    .with_msg(format!("Parse YAML config failed: {:?}", path))
            })?;

        config
            .validate()
            .map_err(Error::from)
            .with_msg(format!("Config validation failed: {:?}", path))?;

        info!("Loaded {} backup jobs from {:?}", config.jobs.len(), path);
        Ok(config)
    }

    /// Runs every job in order against the rsync found on `PATH`.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        base_dir: P,
        options: &RunOptions,
        out: &mut W,
    ) -> Result<()> {
        if self.jobs.is_empty() {
            info!("No backup jobs configured");
            return Ok(());
        }

        let rsync = which::which(RSYNC_PROGRAM)?;
        debug!("Using rsync at {:?}", rsync);
        self.run_with(rsync, base_dir, options, out)
    }

    /// Runs every job in order with `rsync` as the transfer program. The first
    /// failing job stops the run.
    pub fn run_with<R: AsRef<Path>, P: AsRef<Path>, W: Write>(
        &self,
        rsync: R,
        base_dir: P,
        options: &RunOptions,
        out: &mut W,
    ) -> Result<()> {
        let base_dir = base_dir.as_ref();
        if options.dry_run() {
            info!("Dry run, pass --force to transfer files");
        }

        for (idx, job) in self.jobs.iter().enumerate() {
            let resolved = job
                .resolve(base_dir, options.dry_run())
                .with_debug_object_and_fn_name(job.clone(), "resolve")
                .with_msg(format!("Backup job #{idx} failed"))?;

            info!(
                "Backing up {:?} to {:?}",
                resolved.source(),
                resolved.destination()
            );
            let command = RsyncCommand::build(rsync.as_ref(), &resolved, options, Local::now());
            debug!("{}", command);

            execute(&command, base_dir, out).with_msg(format!("Backup job #{idx} failed"))?;

            if options.echo_command() {
                writeln!(out, "{command}")?;
                writeln!(out, "{SEPARATOR}")?;
            }
        }

        Ok(())
    }
}

/// Directory that relative job paths are anchored at: the one holding the
/// config file.
pub fn config_base_dir<P: AsRef<Path>>(config_path: P) -> Result<PathBuf> {
    let canonical = config_path
        .as_ref()
        .canonicalize()
        .map_err(Error::from)
        .with_msg(format!("Resolve config path failed: {:?}", config_path.as_ref()))?;
    Ok(canonical
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(canonical))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, yaml: &str) -> PathBuf {
        let path = dir.join(DEFAULT_CONFIG_PATH);
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            "- source: src\n  destination: dst\n  include:\n    docs: true\n- destination: other\n",
        );

        let config = BackupConfig::load(&path).unwrap();
        assert_eq!(config.jobs().len(), 2);
        assert_eq!(config.jobs()[0].source(), "src");
        assert_eq!(config.jobs()[1].source(), ".");
    }

    #[test]
    fn test_load_empty_list() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "[]\n");
        assert!(BackupConfig::load(&path).unwrap().jobs().is_empty());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "- destination: [unterminated\n");

        let err = BackupConfig::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("Parse YAML config failed"));
    }

    #[test]
    fn test_load_top_level_mapping_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "destination: /backup\n");
        assert!(BackupConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_blank_destination_fails_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "- destination: /ok\n- destination: \"\"\n");

        let err = BackupConfig::load(&path).unwrap_err();
        match err {
            Error::WithMsg { msg, error } => {
                assert!(msg.starts_with("Config validation failed"));
                assert!(matches!(*error, Error::ValidationError(_)));
            }
            other => panic!("Expected WithMsg, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = BackupConfig::load(temp_dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().starts_with("Open config failed"));
    }

    #[test]
    fn test_config_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "[]\n");
        assert_eq!(
            config_base_dir(&path).unwrap(),
            temp_dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_run_empty_config_does_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let options = RunOptions::builder().force(true).verbosity(1).build();

        let mut out = Vec::new();
        BackupConfig::default()
            .run(temp_dir.path(), &options, &mut out)
            .unwrap();
        assert!(out.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_with_echoes_command_when_verbose() {
        let temp_dir = TempDir::new().unwrap();
        let config = BackupConfig::from(vec![BackupJob::builder().destination("dst").build()]);
        let options = RunOptions::builder().verbosity(1).build();

        let mut out = Vec::new();
        config
            .run_with("echo", temp_dir.path(), &options, &mut out)
            .unwrap();

        let printed = String::from_utf8(out).unwrap();
        let lines: Vec<_> = printed.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("--dry-run -a "));
        assert!(lines[1].starts_with("echo --dry-run -a "));
        assert_eq!(lines[2], SEPARATOR);
        assert!(!temp_dir.path().join("dst").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_with_stops_at_first_failing_job() {
        let temp_dir = TempDir::new().unwrap();
        let config = BackupConfig::from(vec![
            BackupJob::builder().destination("first").build(),
            BackupJob::builder().source("missing").destination("second").build(),
            BackupJob::builder().destination("third").build(),
        ]);
        let options = RunOptions::builder().force(true).build();

        let mut out = Vec::new();
        let err = config
            .run_with("true", temp_dir.path(), &options, &mut out)
            .unwrap_err();

        assert!(err.to_string().contains("Backup job #1 failed"));
        assert!(temp_dir.path().join("first").is_dir());
        assert!(!temp_dir.path().join("second").exists());
        assert!(!temp_dir.path().join("third").exists());
    }
}
