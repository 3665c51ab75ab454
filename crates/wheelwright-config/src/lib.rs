//! Read `pyproject.toml` and frontend configuration settings.

pub mod descriptor;
pub mod settings;

pub use descriptor::{
    detect_reader, read_descriptor, read_descriptor_with, Author, DescriptorError,
    DescriptorReader, FlatReader, ProjectDescriptor, DESCRIPTOR_FILE,
};
#[cfg(feature = "structured")]
pub use descriptor::StructuredReader;
pub use settings::{ConfigSettings, Setting, SettingError};
