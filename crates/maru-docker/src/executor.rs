use std::process::Stdio;

use tokio::process::Command;

use crate::CommandError;

/// Abstraction over external command execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor: Send + Sync {
    /// Execute a command and capture stdout.
    async fn exec(&self, program: &str, args: &[String]) -> Result<String, CommandError>;

    /// Execute a command, streaming stdout and stderr to the terminal.
    async fn exec_streaming(&self, program: &str, args: &[String]) -> Result<(), CommandError>;

    /// Execute a command attached to the terminal's stdin, stdout and stderr.
    async fn exec_interactive(&self, program: &str, args: &[String])
    -> Result<(), CommandError>;
}

/// Spawns real processes with `tokio::process`.
pub struct RealExecutor;

impl CommandExecutor for RealExecutor {
    async fn exec(&self, program: &str, args: &[String]) -> Result<String, CommandError> {
        tracing::debug!(program, ?args, "exec");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CommandError::spawn(program, e))?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| CommandError::InvalidUtf8 {
                program: program.to_owned(),
                source: e,
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            Err(CommandError::failed(program, args, stderr))
        }
    }

    async fn exec_streaming(&self, program: &str, args: &[String]) -> Result<(), CommandError> {
        tracing::debug!(program, ?args, "exec (streaming)");
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| CommandError::spawn(program, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::failed(program, args, status.to_string()))
        }
    }

    async fn exec_interactive(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<(), CommandError> {
        tracing::debug!(program, ?args, "exec (interactive)");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| CommandError::spawn(program, e))?;

        // The terminal delivers Ctrl-C to the child too; keep waiting for it
        // to exit instead of dying first.
        let mut watch_interrupts = true;
        let status = loop {
            tokio::select! {
                status = child.wait() => break status,
                signal = tokio::signal::ctrl_c(), if watch_interrupts => match signal {
                    Ok(()) => tracing::debug!(program, "interrupt received"),
                    Err(e) => {
                        tracing::warn!(error = %e, "cannot listen for interrupts");
                        watch_interrupts = false;
                    }
                },
            }
        }
        .map_err(|e| CommandError::Wait {
            program: program.to_owned(),
            source: e,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::failed(program, args, status.to_string()))
        }
    }
}
