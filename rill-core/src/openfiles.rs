//! Files and pipe ends open within a shell instance.

use std::process::Stdio;

use crate::error;

/// Represents a file open in a shell context. Dropping an `OpenFile` closes
/// the underlying descriptor; ownership is how the engine guarantees that
/// every pipe end opened for a pipeline is closed exactly once on every
/// return path.
pub enum OpenFile {
    /// The standard input this process was started with.
    Stdin,
    /// The standard output this process was started with.
    Stdout,
    /// The standard error this process was started with.
    Stderr,
    /// A file open for reading or writing.
    File(std::fs::File),
    /// A read end of a pipe.
    PipeReader(os_pipe::PipeReader),
    /// A write end of a pipe.
    PipeWriter(os_pipe::PipeWriter),
}

impl OpenFile {
    /// Tries to duplicate the open file. The duplicate refers to the same
    /// underlying descriptor but is independently owned.
    pub fn try_dup(&self) -> Result<Self, error::Error> {
        let result = match self {
            Self::Stdin => Self::Stdin,
            Self::Stdout => Self::Stdout,
            Self::Stderr => Self::Stderr,
            Self::File(f) => Self::File(f.try_clone()?),
            Self::PipeReader(r) => Self::PipeReader(r.try_clone()?),
            Self::PipeWriter(w) => Self::PipeWriter(w.try_clone()?),
        };

        Ok(result)
    }
}

/// Returns an open file that will discard all output and yield no input.
pub fn null() -> Result<OpenFile, error::Error> {
    let file = std::fs::File::open("/dev/null")?;
    Ok(OpenFile::File(file))
}

impl From<os_pipe::PipeReader> for OpenFile {
    fn from(reader: os_pipe::PipeReader) -> Self {
        Self::PipeReader(reader)
    }
}

impl From<os_pipe::PipeWriter> for OpenFile {
    fn from(writer: os_pipe::PipeWriter) -> Self {
        Self::PipeWriter(writer)
    }
}

impl From<OpenFile> for Stdio {
    fn from(open_file: OpenFile) -> Self {
        match open_file {
            OpenFile::Stdin | OpenFile::Stdout | OpenFile::Stderr => Self::inherit(),
            OpenFile::File(f) => f.into(),
            OpenFile::PipeReader(r) => r.into(),
            OpenFile::PipeWriter(w) => w.into(),
        }
    }
}

impl std::io::Read for OpenFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Stdin => std::io::stdin().read(buf),
            Self::File(f) => f.read(buf),
            Self::PipeReader(reader) => reader.read(buf),
            Self::Stdout | Self::Stderr | Self::PipeWriter(_) => {
                Err(std::io::Error::other("file is not open for reading"))
            }
        }
    }
}

impl std::io::Write for OpenFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Self::Stdout => std::io::stdout().write(buf),
            Self::Stderr => std::io::stderr().write(buf),
            Self::File(f) => f.write(buf),
            Self::PipeWriter(writer) => writer.write(buf),
            Self::Stdin | Self::PipeReader(_) => {
                Err(std::io::Error::other("file is not open for writing"))
            }
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout => std::io::stdout().flush(),
            Self::Stderr => std::io::stderr().flush(),
            Self::File(f) => f.flush(),
            Self::PipeWriter(writer) => writer.flush(),
            Self::Stdin | Self::PipeReader(_) => Ok(()),
        }
    }
}

/// The endpoints of one execution frame: where it reads, writes, and reports.
pub struct OpenFiles {
    /// The file backing standard input.
    pub stdin: OpenFile,
    /// The file backing standard output.
    pub stdout: OpenFile,
    /// The file backing standard error.
    pub stderr: OpenFile,
}

impl Default for OpenFiles {
    fn default() -> Self {
        Self {
            stdin: OpenFile::Stdin,
            stdout: OpenFile::Stdout,
            stderr: OpenFile::Stderr,
        }
    }
}

impl OpenFiles {
    /// Tries to clone the open files.
    pub fn try_clone(&self) -> Result<Self, error::Error> {
        Ok(Self {
            stdin: self.stdin.try_dup()?,
            stdout: self.stdout.try_dup()?,
            stderr: self.stderr.try_dup()?,
        })
    }
}

/// Creates a new anonymous pipe, returning its reader and writer ends.
pub fn pipe() -> Result<(os_pipe::PipeReader, os_pipe::PipeWriter), error::Error> {
    let (reader, writer) = os_pipe::pipe()?;
    Ok((reader, writer))
}
