use std::future::Future;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::{BuilderCommand, FontOptions};
use crate::errors::{Error, Result};

/// Something which turns a directory of SVG icons into font files.
pub trait FontBuilder {
    fn build(&self, options: &FontOptions) -> impl Future<Output = Result<()>> + Send;
}

/// Runs an external program to build fonts.
///
/// The `FontOptions` are written to the program's stdin as a single JSON
/// object (`{"src": ..., "dist": ..., "fontName": ..., ...}`), after which
/// stdin is closed. A non-zero exit status is a build failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandFontBuilder {
    program: String,
    args: Vec<String>,
}

impl CommandFontBuilder {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl From<&BuilderCommand> for CommandFontBuilder {
    fn from(cmd: &BuilderCommand) -> Self {
        Self::new(cmd.program.clone(), cmd.args.clone())
    }
}

impl FontBuilder for CommandFontBuilder {
    async fn build(&self, options: &FontOptions) -> Result<()> {
        let request = serde_json::to_vec(options).map_err(|e| Error::Build(e.to_string()))?;
        let build_err = |e: std::io::Error| Error::Build(format!("{}: {e}", self.program));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(build_err)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&request).await.map_err(build_err)?;
            // dropping stdin closes it, ending the request
        }
        let status = child.wait().await.map_err(build_err)?;
        if !status.success() {
            return Err(Error::Build(format!("{} exited with {status}", self.program)));
        }
        Ok(())
    }
}
