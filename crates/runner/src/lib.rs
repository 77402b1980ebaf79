//! `runner` crate — the `CommandRunner` trait and its implementations.
//!
//! Everything that touches an OS process lives here. The repository layer
//! only ever sees a [`CommandRunner`] trait object, so it can be exercised
//! against [`mock::MockRunner`] without a real SQL engine installed.

pub mod error;
pub mod traits;
pub mod shell;
pub mod mock;

pub use error::ExecutionError;
pub use shell::ShellRunner;
pub use traits::{CommandOutput, CommandRunner};
