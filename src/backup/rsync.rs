//! Assembling the rsync invocation for a resolved job.

use crate::backup::job::ResolvedJob;
use crate::backup::options::RunOptions;
use crate::backup::paths::with_trailing_slash;
use chrono::{DateTime, TimeZone};
use getset::Getters;
use itertools::Itertools;
use std::ffi::{OsStr, OsString};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub static RSYNC_PROGRAM: &str = "rsync";
static BACKUP_DIR_PREFIX: &str = ".recycled_";
static BACKUP_DIR_TIME_FORMAT: &str = "%d_%m_%Y__%H_%M_%S";

/// Program plus argument vector, handed to the OS without a shell. Paths stay
/// `OsString` so names that are not UTF-8 reach rsync unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct RsyncCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl RsyncCommand {
    pub fn build<P, T>(program: P, job: &ResolvedJob, options: &RunOptions, now: DateTime<T>) -> Self
    where
        P: AsRef<Path>,
        T: TimeZone,
        T::Offset: Display,
    {
        let mut args: Vec<OsString> = Vec::new();

        if options.dry_run() {
            args.push("--dry-run".into());
        }

        args.extend(job.filters().iter().map(|f| format!("--filter={f}").into()));

        if job.delete() {
            args.push("--delete".into());
            args.push("--backup".into());
            args.push(format!("--backup-dir={}", backup_dir_name(now)).into());
        }

        let mut short_options = String::new();
        if options.verbosity() >= 2 {
            short_options.push_str("vP");
        }
        if job.archive() {
            short_options.push('a');
        }
        if !short_options.is_empty() {
            args.push(format!("-{short_options}").into());
        }

        args.push(with_trailing_slash(job.source()));
        args.push(with_trailing_slash(job.destination()));

        Self {
            program: program.as_ref().to_path_buf(),
            args,
        }
    }
}

/// Name of the directory rsync moves replaced and deleted files into,
/// relative to the destination.
pub fn backup_dir_name<T>(now: DateTime<T>) -> String
where
    T: TimeZone,
    T::Offset: Display,
{
    format!("{BACKUP_DIR_PREFIX}{}", now.format(BACKUP_DIR_TIME_FORMAT))
}

/// Shell-style rendering, only used for echoing and logging.
impl Display for RsyncCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let program = self
            .program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy();
        write!(f, "{}", program)?;
        if !self.args.is_empty() {
            write!(f, " {}", self.args.iter().map(shell_quote).join(" "))?;
        }
        Ok(())
    }
}

fn shell_quote<S: AsRef<OsStr>>(arg: S) -> String {
    let arg = arg.as_ref().to_string_lossy();
    let is_plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@%+,".contains(c));
    if is_plain {
        return arg.into_owned();
    }

    match arg.split_once('=') {
        Some((flag, value)) if flag.starts_with("--") && !flag.contains('\'') => {
            format!("{flag}='{}'", value.replace('\'', r"'\''"))
        }
        _ => format!("'{}'", arg.replace('\'', r"'\''")),
    }
}
