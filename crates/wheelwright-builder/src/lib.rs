//! Invocation of the external build script and discovery of the wheels it produces.

pub mod artifacts;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod invoke;

pub use artifacts::ArtifactSet;
pub use environment::{AmbientEnv, BuildEnvironment};
pub use error::BuilderError;
pub use interpreter::resolve_interpreter;
pub use invoke::BuildScript;
