//! Pipeline execution.
//!
//! Stages start left to right. Builtins run inside the shell on the spot;
//! everything else is spawned and reaped once every stage has started and
//! the shell has let go of its pipe ends. While a builtin runs, its
//! redirected streams become the ones inherited by anything it evaluates.

pub mod status;
pub mod streams;

use std::io::Write;
use std::process::{Child, Command};

use log::{debug, warn};

use crate::builtins::{self, BuiltinFn};
use crate::error::ShellError;
use crate::parse::{CommandNode, Pipeline};
use crate::shell::Shell;
use crate::signals;
use crate::status::{FAILURE, SUCCESS, Status};
use streams::{Channels, Inherited, StageStreams};

impl Shell {
    /// Run every stage of `pipeline` and return the status of the last one.
    ///
    /// Resource exhaustion (pipes, process slots, memory) ends the process.
    pub fn execute(&mut self, pipeline: Pipeline) -> Status {
        let stages = pipeline.nodes.len();
        let mut channels = match Channels::open(pipeline.pipe_count()) {
            Ok(channels) => channels,
            Err(e) => self.fatal(e),
        };

        let mut children: Vec<(String, Child)> = Vec::new();
        let mut last_child = None;
        let mut last_status = SUCCESS;

        for (index, node) in pipeline.nodes.into_iter().enumerate() {
            let is_last = index + 1 == stages;
            let stdin_pipe = channels.take_stdin(index);
            let stdout_pipe = channels.take_stdout(index);
            let stage_status = match StageStreams::open(&node, stdin_pipe, stdout_pipe) {
                Err(e) => {
                    self.report(&e);
                    FAILURE
                }
                Ok(streams) => match builtins::lookup(node.program()) {
                    Some(builtin) => {
                        debug!("exec: builtin '{}' (stage {index})", node.program());
                        match self.run_builtin(builtin, node.args(), streams) {
                            Ok(code) => code,
                            Err(e) => self.fatal(e),
                        }
                    }
                    None => match spawn(&node, streams, &self.streams) {
                        Ok(child) => {
                            debug!("exec: spawned '{}' as pid {}", node.program(), child.id());
                            if is_last {
                                last_child = Some(children.len());
                            }
                            children.push((node.program().to_string(), child));
                            SUCCESS
                        }
                        Err(e) if e.is_fatal() => self.fatal(e),
                        Err(e) => {
                            self.report(&e);
                            FAILURE
                        }
                    },
                },
            };
            if is_last {
                last_status = stage_status;
            }
        }

        channels.release();
        if children.is_empty() {
            return last_status;
        }

        let _waiting = signals::waiting_for_children();
        for (index, (program, mut child)) in children.into_iter().enumerate() {
            match child.wait() {
                Ok(exit) => {
                    let code = status::decode(exit);
                    debug!("exec: '{program}' exited with status {code}");
                    if last_child == Some(index) {
                        last_status = code;
                    }
                }
                Err(e) => {
                    warn!("exec: waiting for '{program}' failed: {e}");
                    if last_child == Some(index) {
                        last_status = FAILURE;
                    }
                }
            }
        }
        last_status
    }

    /// Run `builtin` in-process with the stage's streams.
    ///
    /// For the duration of the call the stage's redirections replace the
    /// inherited streams, and the previous ones come back afterwards.
    /// Only descriptor exhaustion fails here.
    fn run_builtin(
        &mut self,
        builtin: BuiltinFn,
        args: &[String],
        streams: StageStreams,
    ) -> Result<Status, ShellError> {
        let nested = streams.nested(&self.streams)?;
        let mut io = streams.into_builtin_io(&self.streams)?;
        let outer = std::mem::replace(&mut self.streams, nested);
        let code = builtin(self, args, &mut io);
        self.streams = outer;
        let _ = io.stdout.flush();
        let _ = io.stderr.flush();
        Ok(code)
    }
}

/// Start an external program with its streams already resolved.
fn spawn(
    node: &CommandNode,
    streams: StageStreams,
    inherited: &Inherited,
) -> Result<Child, ShellError> {
    let (stdin, stdout, stderr) = streams.into_stdio(inherited)?;
    let mut command = Command::new(node.program());
    command.args(node.args()).stdin(stdin).stdout(stdout).stderr(stderr);
    if let Ok(dir) = std::env::current_dir() {
        command.env("PWD", dir);
    }
    command.spawn().map_err(|source| match source.raw_os_error() {
        Some(libc::EAGAIN | libc::ENOMEM) => ShellError::Resource {
            what: "couldn't fork",
            source,
        },
        _ => ShellError::Exec {
            program: node.program().to_string(),
            source,
        },
    })
}
