//! # rsbackup
//!
//! Runs a list of rsync backup jobs described in a YAML file.
//!
//! ## Features
//!
//! - **Dry run by default**: nothing is transferred until `--force` is given
//! - **Include maps**: whitelist directories or exclude them with a `path: bool` map
//! - **Recycle bin**: with `delete: true`, removed files go to a timestamped
//!   `.recycled_*` directory inside the destination
//!
//! ## Config
//!
//! ```yaml
//! - source: ~/Documents
//!   destination: /mnt/backup/documents
//!   delete: true
//!   include:
//!     projects: true
//!     projects/target: false
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use rsbackup::backup::backup_config::{config_base_dir, BackupConfig};
//! use rsbackup::backup::options::RunOptions;
//!
//! let config = BackupConfig::load(".rsbu.yaml")?;
//! let options = RunOptions::builder().verbosity(1).build();
//! config.run(config_base_dir(".rsbu.yaml")?, &options, &mut std::io::stdout())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backup;
