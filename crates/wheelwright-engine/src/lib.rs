//! PEP 517 build hooks: metadata synthesis, wheel selection, and source archives.

pub mod context;
pub mod error;
pub mod metadata;
pub mod sdist;
pub mod select;
pub mod wheel;

pub use context::BackendContext;
pub use error::EngineError;
pub use metadata::{synthesize, MetadataRecord};
pub use sdist::build_sdist;
pub use select::select_artifact;
pub use wheel::{build_wheel, prepare_metadata};
