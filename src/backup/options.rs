use bon::Builder;
use getset::CopyGetters;
use tracing::Level;

/// Command line switches that apply to every job of a run.
#[derive(Clone, Copy, Debug, Default, Builder, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct RunOptions {
    /// Actually transfer files instead of passing `--dry-run` to rsync.
    #[builder(default)]
    force: bool,
    /// Number of `-v` flags given.
    #[builder(default)]
    verbosity: u8,
}

impl RunOptions {
    pub fn dry_run(&self) -> bool {
        !self.force
    }

    /// Whether the rendered command is echoed after each job.
    pub fn echo_command(&self) -> bool {
        self.verbosity >= 1
    }

    pub fn log_level(&self) -> Level {
        match self.verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
