//! Pipe allocation and per-stage stream wiring.
//!
//! Every pipe end is owned exactly once. A stage takes its ends out of
//! [`Channels`] and hands them to the spawned [`Command`](std::process::Command)
//! or to the builtin's [`BuiltinIo`]; dropping them is what closes the
//! shell's copy. Pipes are close-on-exec, so children only ever hold the
//! ends installed as their own standard streams.
//!
//! A stream left alone by a stage resolves through [`Inherited`]: the
//! shell's own stream at top level, or the redirected stream of the builtin
//! that is evaluating commands on its behalf (`source f > out`).

use std::fs::{File, OpenOptions};
use std::io::{self, PipeReader, PipeWriter, Read, Write};
use std::os::fd::{AsFd, OwnedFd};
use std::path::Path;
use std::process::Stdio;

use crate::builtins::BuiltinIo;
use crate::error::ShellError;
use crate::parse::CommandNode;

/// The inter-stage pipes of one pipeline. Pipe `i` connects stage `i` to
/// stage `i + 1`.
pub struct Channels {
    readers: Vec<Option<PipeReader>>,
    writers: Vec<Option<PipeWriter>>,
}

impl Channels {
    /// Allocate `count` pipes up front.
    pub fn open(count: usize) -> Result<Self, ShellError> {
        let mut readers = Vec::with_capacity(count);
        let mut writers = Vec::with_capacity(count);
        for _ in 0..count {
            let (reader, writer) = io::pipe().map_err(|source| ShellError::Resource {
                what: "couldn't create pipe",
                source,
            })?;
            readers.push(Some(reader));
            writers.push(Some(writer));
        }
        Ok(Self { readers, writers })
    }

    /// The read end feeding `stage`, if it is not the first.
    pub fn take_stdin(&mut self, stage: usize) -> Option<PipeReader> {
        let pipe = stage.checked_sub(1)?;
        self.readers.get_mut(pipe)?.take()
    }

    /// The write end `stage` produces into, if it is not the last.
    pub fn take_stdout(&mut self, stage: usize) -> Option<PipeWriter> {
        self.writers.get_mut(stage)?.take()
    }

    /// Close every pipe end the shell still holds.
    ///
    /// Must run once all stages are started and before waiting on any
    /// child: a reader only sees end-of-file after every writer is gone.
    pub fn release(&mut self) {
        self.readers.clear();
        self.writers.clear();
    }
}

pub enum Input {
    Inherit,
    Pipe(PipeReader),
    File(File),
}

/// Where stdout or stderr goes. `Inherit` means the shell's own stream.
pub enum Output {
    Inherit,
    Pipe(PipeWriter),
    File(File),
}

/// Resolved standard streams of one stage.
pub struct StageStreams {
    pub stdin: Input,
    pub stdout: Output,
    pub stderr: Output,
}

impl StageStreams {
    /// Open the stage's redirect files, then let pipe ends override them.
    ///
    /// Files are opened (and created or truncated) even when a pipe wins,
    /// so `cmd > out | next` still leaves an empty `out` behind.
    pub fn open(
        node: &CommandNode,
        stdin_pipe: Option<PipeReader>,
        stdout_pipe: Option<PipeWriter>,
    ) -> Result<Self, ShellError> {
        let mut streams = StageStreams {
            stdin: Input::Inherit,
            stdout: Output::Inherit,
            stderr: Output::Inherit,
        };
        if let Some(path) = &node.input_file {
            streams.stdin = Input::File(open_input(path)?);
        }
        if let Some(path) = &node.output_file {
            streams.stdout = Output::File(open_output(path, node.output_append)?);
        }
        if let Some(path) = &node.error_file {
            streams.stderr = Output::File(open_output(path, false)?);
        }
        if let Some(reader) = stdin_pipe {
            streams.stdin = Input::Pipe(reader);
        }
        if let Some(writer) = stdout_pipe {
            streams.stdout = Output::Pipe(writer);
        }
        Ok(streams)
    }

    /// Streams for a spawned child: `(stdin, stdout, stderr)`.
    pub fn into_stdio(self, inherited: &Inherited) -> Result<(Stdio, Stdio, Stdio), ShellError> {
        Ok((
            self.stdin.into_stdio(&inherited.stdin).map_err(dup_error)?,
            self.stdout.into_stdio(&inherited.stdout).map_err(dup_error)?,
            self.stderr.into_stdio(&inherited.stderr).map_err(dup_error)?,
        ))
    }

    /// Streams for a builtin running inside the shell.
    pub fn into_builtin_io(self, inherited: &Inherited) -> Result<BuiltinIo, ShellError> {
        Ok(BuiltinIo {
            stdin: self.stdin.into_reader(&inherited.stdin).map_err(dup_error)?,
            stdout: self
                .stdout
                .into_writer(&inherited.stdout, || Box::new(io::stdout()))
                .map_err(dup_error)?,
            stderr: self
                .stderr
                .into_writer(&inherited.stderr, || Box::new(io::stderr()))
                .map_err(dup_error)?,
        })
    }

    /// What `Inherit` means for commands a builtin on this stage evaluates.
    ///
    /// Redirected streams are shared; untouched ones keep `outer`'s.
    pub fn nested(&self, outer: &Inherited) -> Result<Inherited, ShellError> {
        Ok(Inherited {
            stdin: self.stdin.share(&outer.stdin).map_err(dup_error)?,
            stdout: self.stdout.share(&outer.stdout).map_err(dup_error)?,
            stderr: self.stderr.share(&outer.stderr).map_err(dup_error)?,
        })
    }
}

/// Targets of the streams a stage does not redirect. `None` stands for the
/// process's own stream.
#[derive(Debug, Default)]
pub struct Inherited {
    stdin: Option<OwnedFd>,
    stdout: Option<OwnedFd>,
    stderr: Option<OwnedFd>,
}

impl Inherited {
    /// A handle on the redirected stderr, if there is one.
    pub fn stderr(&self) -> Option<File> {
        let fd = self.stderr.as_ref()?.try_clone().ok()?;
        Some(File::from(fd))
    }
}

impl Input {
    fn into_stdio(self, inherited: &Option<OwnedFd>) -> io::Result<Stdio> {
        Ok(match self {
            Input::Inherit => match inherited {
                Some(fd) => Stdio::from(fd.try_clone()?),
                None => Stdio::inherit(),
            },
            Input::Pipe(reader) => Stdio::from(reader),
            Input::File(file) => Stdio::from(file),
        })
    }

    fn into_reader(self, inherited: &Option<OwnedFd>) -> io::Result<Box<dyn Read>> {
        let reader: Box<dyn Read> = match self {
            Input::Inherit => match inherited {
                Some(fd) => Box::new(File::from(fd.try_clone()?)),
                None => Box::new(io::stdin()),
            },
            Input::Pipe(reader) => Box::new(reader),
            Input::File(file) => Box::new(file),
        };
        Ok(reader)
    }

    fn share(&self, inherited: &Option<OwnedFd>) -> io::Result<Option<OwnedFd>> {
        match self {
            Input::Inherit => inherited.as_ref().map(OwnedFd::try_clone).transpose(),
            Input::Pipe(reader) => reader.as_fd().try_clone_to_owned().map(Some),
            Input::File(file) => file.as_fd().try_clone_to_owned().map(Some),
        }
    }
}

impl Output {
    fn into_stdio(self, inherited: &Option<OwnedFd>) -> io::Result<Stdio> {
        Ok(match self {
            Output::Inherit => match inherited {
                Some(fd) => Stdio::from(fd.try_clone()?),
                None => Stdio::inherit(),
            },
            Output::Pipe(writer) => Stdio::from(writer),
            Output::File(file) => Stdio::from(file),
        })
    }

    fn into_writer(
        self,
        inherited: &Option<OwnedFd>,
        process: impl FnOnce() -> Box<dyn Write>,
    ) -> io::Result<Box<dyn Write>> {
        let writer: Box<dyn Write> = match self {
            Output::Inherit => match inherited {
                Some(fd) => Box::new(File::from(fd.try_clone()?)),
                None => process(),
            },
            Output::Pipe(writer) => Box::new(writer),
            Output::File(file) => Box::new(file),
        };
        Ok(writer)
    }

    fn share(&self, inherited: &Option<OwnedFd>) -> io::Result<Option<OwnedFd>> {
        match self {
            Output::Inherit => inherited.as_ref().map(OwnedFd::try_clone).transpose(),
            Output::Pipe(writer) => writer.as_fd().try_clone_to_owned().map(Some),
            Output::File(file) => file.as_fd().try_clone_to_owned().map(Some),
        }
    }
}

fn dup_error(source: io::Error) -> ShellError {
    ShellError::Resource {
        what: "couldn't duplicate file descriptor",
        source,
    }
}

fn open_input(path: &Path) -> Result<File, ShellError> {
    File::open(path).map_err(|source| ShellError::Redirect {
        path: path.to_path_buf(),
        source,
    })
}

fn open_output(path: &Path, append: bool) -> Result<File, ShellError> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path).map_err(|source| ShellError::Redirect {
        path: path.to_path_buf(),
        source,
    })
}
