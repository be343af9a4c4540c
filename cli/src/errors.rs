use std::path::PathBuf;
use std::process::exit;

use log::error;
use thiserror::Error;

pub type Fallible<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Compile(#[from] graphqlgen::Error),

    #[error("could not read `{}`: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write `{}`: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Process exit codes: 0 on success, 1 on any parse, validation, or IO
/// error.
#[derive(Copy, Clone, Debug)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
}

impl ExitCode {
    pub fn exit(self) -> ! {
        exit(self as i32);
    }
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::Failure
    }
}

pub fn report(err: &CliError) {
    error!("{}", err);
}
