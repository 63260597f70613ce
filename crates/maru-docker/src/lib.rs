//! External command runner for maru.
//!
//! Every docker and singularity invocation goes through [`CommandExecutor`],
//! so argument vectors and call order can be asserted with mocks.

pub mod docker;
pub mod error;
pub mod executor;
pub mod singularity;

pub use docker::{DockerClient, PushFailure, PushReport, PushStep, RunOptions};
pub use error::CommandError;
pub use executor::{CommandExecutor, RealExecutor};
pub use singularity::SingularityClient;
