//! Runs the user's editor on the review document.

use stash_review_doc::{Editor, EditorExit};
use std::io;
use std::path::Path;
use std::process::Command;

/// An editor command line such as `vim` or `code --wait`.
///
/// On Unix the command goes through `sh`, so quoting works as in a shell
/// (`"/opt/my editor/bin/edit" -w`). Elsewhere it is split on whitespace.
/// The document path is appended as the last argument. The editor inherits
/// the terminal and this process waits for it to exit.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    #[cfg(unix)]
    fn command(&self, path: &Path) -> io::Result<Command> {
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(format!("{} \"$@\"", self.command))
            .arg(&self.command)
            .arg(path);
        Ok(command)
    }

    #[cfg(not(unix))]
    fn command(&self, path: &Path) -> io::Result<Command> {
        let mut words = self.command.split_whitespace();
        let program = words.next().ok_or_else(empty_command)?;
        let mut command = Command::new(program);
        command.args(words).arg(path);
        Ok(command)
    }
}

/// `sh` exits with 127 when the command cannot be found.
#[cfg(unix)]
fn command_not_found(code: Option<i32>) -> bool {
    code == Some(127)
}

#[cfg(not(unix))]
fn command_not_found(_code: Option<i32>) -> bool {
    false
}

fn empty_command() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, "editor command is empty")
}

impl Editor for ExternalEditor {
    fn edit(&self, path: &Path) -> io::Result<EditorExit> {
        if self.command.trim().is_empty() {
            return Err(empty_command());
        }

        log::debug!("opening editor: {} {}", self.command, path.display());
        let status = self.command(path)?.status()?;

        if status.success() {
            return Ok(EditorExit::Success);
        }

        if command_not_found(status.code()) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("editor command not found: {}", self.command),
            ));
        }

        Ok(EditorExit::Failed(status.code()))
    }
}
