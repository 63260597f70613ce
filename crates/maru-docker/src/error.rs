#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("`{program}` not found; is it installed and on PATH?")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("failed waiting for `{program}` to exit")]
    Wait {
        program: String,
        source: std::io::Error,
    },

    #[error("`{program} {cmd}` failed: {detail}", cmd = .args.join(" "))]
    Failed {
        program: String,
        args: Vec<String>,
        detail: String,
    },

    #[error("`{program}` output was not valid UTF-8")]
    InvalidUtf8 {
        program: String,
        source: std::string::FromUtf8Error,
    },
}

impl CommandError {
    pub(crate) fn spawn(program: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            CommandError::NotFound {
                program: program.to_owned(),
                source,
            }
        } else {
            CommandError::Spawn {
                program: program.to_owned(),
                source,
            }
        }
    }

    pub(crate) fn failed(program: &str, args: &[String], detail: impl Into<String>) -> Self {
        CommandError::Failed {
            program: program.to_owned(),
            args: args.to_vec(),
            detail: detail.into(),
        }
    }
}
