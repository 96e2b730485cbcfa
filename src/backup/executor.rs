//! Running rsync and forwarding what it prints.

use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;
use crate::backup::rsync::RsyncCommand;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};

/// Spawns `command` in `working_dir` and copies its stdout into `out` line by
/// line until the child closes the stream. stderr is inherited.
///
/// The exit status is returned for logging only; a failed transfer does not
/// stop the remaining jobs.
pub fn execute<P: AsRef<Path>, W: Write>(
    command: &RsyncCommand,
    working_dir: P,
    out: &mut W,
) -> Result<ExitStatus> {
    debug!("Spawning {}", command);
    let mut child = Command::new(command.program())
        .args(command.args())
        .current_dir(working_dir.as_ref())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(Error::from)
        .with_msg(format!("Failed to start {:?}", command.program()))?;

    let forwarded = match child.stdout.take() {
        Some(stdout) => forward_lines(stdout, out),
        None => Ok(()),
    };

    if let Err(e) = forwarded {
        // The child must not outlive a failed copy.
        if let Err(kill_err) = child.kill() {
            debug!("Killing {:?} failed: {kill_err}", command.program());
        }
        let status = child.wait()?;
        warn!(
            "{} stopped with {} after its output could not be forwarded",
            command.program().display(),
            status
        );
        return Err(e.with_msg(format!("Forwarding output of {:?} failed", command.program())));
    }

    let status = child.wait()?;
    if status.success() {
        info!("{} finished", command.program().display());
    } else {
        warn!("{} exited with {}", command.program().display(), status);
    }

    Ok(status)
}

fn forward_lines<R: Read, W: Write>(stdout: R, out: &mut W) -> Result<()> {
    let mut reader = BufReader::new(stdout);
    let mut line = Vec::new();
    while reader.read_until(b'\n', &mut line)? > 0 {
        out.write_all(&line)?;
        out.flush()?;
        line.clear();
    }
    Ok(())
}
