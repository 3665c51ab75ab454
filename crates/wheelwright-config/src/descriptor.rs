//! Tolerant reading of the `[project]` table of `pyproject.toml`.
//!
//! Two readers share the [`DescriptorReader`] interface: [`StructuredReader`]
//! performs a full TOML parse (cargo feature `structured`, on by default) and
//! [`FlatReader`] understands only `key = "value"` lines of the `[project]`
//! section. [`detect_reader`] picks the best one compiled in, and
//! [`read_descriptor`] never fails: it degrades to the flat reader on a parse
//! error and to an empty descriptor when the file cannot be read.

use std::path::Path;

/// File name of the packaging descriptor at the project root.
pub const DESCRIPTOR_FILE: &str = "pyproject.toml";

/// An entry of `project.authors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    /// `{ name = "...", email = "..." }`
    Table {
        name: Option<String>,
        email: Option<String>,
    },
    /// A bare string entry.
    Plain(String),
}

impl Author {
    /// The display name of this author, if one is present.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Table { name, .. } => name.as_deref(),
            Self::Plain(name) => Some(name),
        }
    }
}

/// The parsed view of the `[project]` table.
///
/// Every field is optional; interpretation and defaults belong to the
/// metadata synthesizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub requires_python: Option<String>,
    pub authors: Vec<Author>,
    pub classifiers: Vec<String>,
    /// `project.urls` in file order.
    pub urls: Vec<(String, String)>,
}

impl ProjectDescriptor {
    /// Look up a `project.urls` entry by its exact label.
    pub fn url(&self, label: &str) -> Option<&str> {
        self.urls
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, url)| url.as_str())
    }
}

/// Errors from a single reader. [`read_descriptor`] absorbs all of them.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid pyproject.toml: {message}")]
    Parse { message: String },
}

/// A strategy for turning descriptor text into a [`ProjectDescriptor`].
pub trait DescriptorReader {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Parse descriptor text.
    ///
    /// # Errors
    /// Returns [`DescriptorError::Parse`] if the text cannot be understood at all.
    fn parse(&self, content: &str) -> Result<ProjectDescriptor, DescriptorError>;
}

/// Return the most capable reader compiled into this build.
#[cfg(feature = "structured")]
pub fn detect_reader() -> Box<dyn DescriptorReader> {
    Box::new(StructuredReader)
}

/// Return the most capable reader compiled into this build.
#[cfg(not(feature = "structured"))]
pub fn detect_reader() -> Box<dyn DescriptorReader> {
    Box::new(FlatReader)
}

/// Read `<root>/pyproject.toml` with the detected reader.
///
/// Never fails: an unreadable file yields an empty descriptor.
pub fn read_descriptor(root: &Path) -> ProjectDescriptor {
    read_descriptor_with(root, detect_reader().as_ref())
}

/// Read `<root>/pyproject.toml` with a specific reader.
///
/// If `reader` rejects the file, the flat reader is tried on the same text.
pub fn read_descriptor_with(root: &Path, reader: &dyn DescriptorReader) -> ProjectDescriptor {
    let path = root.join(DESCRIPTOR_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(source) => {
            let err = DescriptorError::Read {
                path: path.display().to_string(),
                source,
            };
            tracing::debug!("{err}; using an empty descriptor");
            return ProjectDescriptor::default();
        }
    };

    match reader.parse(&content) {
        Ok(descriptor) => {
            tracing::debug!(reader = reader.name(), "read {}", path.display());
            descriptor
        }
        Err(err) => {
            tracing::warn!("{err}; falling back to the flat [project] reader");
            FlatReader.parse_lines(&content)
        }
    }
}

/// Full TOML reader.
#[cfg(feature = "structured")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredReader;

#[cfg(feature = "structured")]
mod structured {
    use serde::Deserialize;
    use toml::Value;

    use super::{Author, DescriptorError, DescriptorReader, ProjectDescriptor, StructuredReader};

    #[derive(Debug, Deserialize)]
    struct PyProjectToml {
        project: Option<RawProject>,
    }

    /// Every field is kept as a raw value so that a wrongly typed entry
    /// drops only that entry instead of the whole table.
    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    struct RawProject {
        name: Option<Value>,
        version: Option<Value>,
        description: Option<Value>,
        requires_python: Option<Value>,
        authors: Option<Value>,
        classifiers: Option<Value>,
        urls: Option<Value>,
    }

    fn string(value: Option<Value>) -> Option<String> {
        match value {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    fn author(value: Value) -> Option<Author> {
        match value {
            Value::String(name) => Some(Author::Plain(name)),
            Value::Table(mut table) => Some(Author::Table {
                name: string(table.remove("name")),
                email: string(table.remove("email")),
            }),
            _ => None,
        }
    }

    impl DescriptorReader for StructuredReader {
        fn name(&self) -> &'static str {
            "structured"
        }

        fn parse(&self, content: &str) -> Result<ProjectDescriptor, DescriptorError> {
            let parsed: PyProjectToml =
                toml::from_str(content).map_err(|e| DescriptorError::Parse {
                    message: e.to_string(),
                })?;
            let raw = parsed.project.unwrap_or_default();

            let authors = match raw.authors {
                Some(Value::Array(entries)) => entries.into_iter().filter_map(author).collect(),
                _ => Vec::new(),
            };
            let classifiers = match raw.classifiers {
                Some(Value::Array(entries)) => entries
                    .into_iter()
                    .filter_map(|v| string(Some(v)))
                    .collect(),
                _ => Vec::new(),
            };
            let urls = match raw.urls {
                Some(Value::Table(table)) => table
                    .into_iter()
                    .filter_map(|(label, v)| string(Some(v)).map(|url| (label, url)))
                    .collect(),
                _ => Vec::new(),
            };

            Ok(ProjectDescriptor {
                name: string(raw.name),
                version: string(raw.version),
                description: string(raw.description),
                requires_python: string(raw.requires_python),
                authors,
                classifiers,
                urls,
            })
        }
    }
}

/// Line-oriented reader for `key = "value"` pairs in `[project]`.
///
/// Arrays and tables are not understood, so `authors`, `classifiers` and
/// `urls` always come back empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatReader;

impl FlatReader {
    fn parse_lines(self, content: &str) -> ProjectDescriptor {
        let mut descriptor = ProjectDescriptor::default();
        let mut in_project = false;

        for line in content.lines() {
            if !in_project {
                in_project = line.trim() == "[project]";
                continue;
            }
            if line.starts_with('[') && line.contains(']') {
                break;
            }
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if !is_bare_key(key) {
                continue;
            }
            let value = Some(strip_value(value));
            match key {
                "name" => descriptor.name = value,
                "version" => descriptor.version = value,
                "description" => descriptor.description = value,
                "requires-python" => descriptor.requires_python = value,
                _ => {}
            }
        }

        descriptor
    }
}

impl DescriptorReader for FlatReader {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn parse(&self, content: &str) -> Result<ProjectDescriptor, DescriptorError> {
        Ok(self.parse_lines(content))
    }
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Strip whitespace, then quote characters. A quoted value followed by a
/// trailing comment keeps only the quoted part.
fn strip_value(raw: &str) -> String {
    let value = raw.trim();
    for quote in ['"', '\''] {
        if let Some(rest) = value.strip_prefix(quote) {
            if let Some((inner, _)) = rest.split_once(quote) {
                return inner.to_owned();
            }
        }
    }
    value.trim_matches('"').trim_matches('\'').to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const FULL: &str = r#"
[build-system]
requires = []
build-backend = "build_backend"
backend-path = ["."]

[project]
name = "islpy-barvinok"
version = "2024.2.1"
description = "Wrapper around isl and barvinok"
requires-python = ">=3.9"
authors = [{ name = "Andreas", email = "a@example.org" }, "Second Author"]
classifiers = [
    "Programming Language :: Python :: 3",
    "License :: OSI Approved :: MIT License",
]

[project.urls]
Source = "https://example.org/src"
Homepage = "https://example.org"

[tool.other]
name = "not-the-project"
"#;

    fn write_descriptor(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DESCRIPTOR_FILE), content).unwrap();
        dir
    }

    #[cfg(feature = "structured")]
    #[test]
    fn structured_reads_all_fields() {
        let d = StructuredReader.parse(FULL).unwrap();
        assert_eq!(d.name.as_deref(), Some("islpy-barvinok"));
        assert_eq!(d.version.as_deref(), Some("2024.2.1"));
        assert_eq!(
            d.description.as_deref(),
            Some("Wrapper around isl and barvinok")
        );
        assert_eq!(d.requires_python.as_deref(), Some(">=3.9"));
        assert_eq!(
            d.authors,
            vec![
                Author::Table {
                    name: Some("Andreas".to_owned()),
                    email: Some("a@example.org".to_owned()),
                },
                Author::Plain("Second Author".to_owned()),
            ]
        );
        assert_eq!(d.classifiers.len(), 2);
        assert_eq!(d.url("Homepage"), Some("https://example.org"));
    }

    #[cfg(feature = "structured")]
    #[test]
    fn structured_keeps_url_file_order() {
        let d = StructuredReader.parse(FULL).unwrap();
        let labels: Vec<_> = d.urls.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, ["Source", "Homepage"]);
    }

    #[cfg(feature = "structured")]
    #[test]
    fn structured_drops_wrongly_typed_entries() {
        let d = StructuredReader
            .parse(
                r#"
[project]
name = "demo"
version = 3
classifiers = ["A", 1, "B"]
authors = "nobody"
urls = { Homepage = "http://x", Broken = 5 }
"#,
            )
            .unwrap();
        assert_eq!(d.name.as_deref(), Some("demo"));
        assert_eq!(d.version, None);
        assert_eq!(d.classifiers, ["A", "B"]);
        assert!(d.authors.is_empty());
        assert_eq!(d.urls, vec![("Homepage".to_owned(), "http://x".to_owned())]);
    }

    #[cfg(feature = "structured")]
    #[test]
    fn structured_without_project_table_is_empty() {
        let d = StructuredReader.parse("[tool.x]\na = 1\n").unwrap();
        assert_eq!(d, ProjectDescriptor::default());
    }

    #[cfg(feature = "structured")]
    #[test]
    fn structured_rejects_invalid_toml() {
        let err = StructuredReader.parse("[project\nname = ").unwrap_err();
        assert!(err.to_string().contains("invalid pyproject.toml"), "error was: {err}");
    }

    #[test]
    fn flat_reads_string_fields_only() {
        let d = FlatReader.parse(FULL).unwrap();
        assert_eq!(d.name.as_deref(), Some("islpy-barvinok"));
        assert_eq!(d.version.as_deref(), Some("2024.2.1"));
        assert_eq!(d.requires_python.as_deref(), Some(">=3.9"));
        assert!(d.authors.is_empty());
        assert!(d.classifiers.is_empty());
        assert!(d.urls.is_empty());
    }

    #[test]
    fn flat_stops_at_next_section() {
        let d = FlatReader
            .parse("[project]\nname = \"a\"\n[tool.other]\nversion = \"9\"\n")
            .unwrap();
        assert_eq!(d.name.as_deref(), Some("a"));
        assert_eq!(d.version, None);
    }

    #[test]
    fn flat_ignores_keys_outside_project() {
        let d = FlatReader
            .parse("name = \"top\"\n[tool]\nname = \"tool\"\n")
            .unwrap();
        assert_eq!(d, ProjectDescriptor::default());
    }

    #[test]
    fn flat_strips_quotes_and_comments() {
        let d = FlatReader
            .parse(
                "[project]\n  name='single'\nversion = \"1.0\"  # pinned\n# description = \"no\"\n",
            )
            .unwrap();
        assert_eq!(d.name.as_deref(), Some("single"));
        assert_eq!(d.version.as_deref(), Some("1.0"));
        assert_eq!(d.description, None);
    }

    #[test]
    fn flat_splits_on_first_equals() {
        let d = FlatReader
            .parse("[project]\nrequires-python = \">=3.9,!=3.10.*\"\ndescription = a = b\n")
            .unwrap();
        assert_eq!(d.requires_python.as_deref(), Some(">=3.9,!=3.10.*"));
        assert_eq!(d.description.as_deref(), Some("a = b"));
    }

    #[test]
    fn read_descriptor_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_descriptor(dir.path()), ProjectDescriptor::default());
    }

    #[test]
    fn read_descriptor_falls_back_on_malformed_toml() {
        let dir = write_descriptor("[project]\nname = \"demo\"\nversion = \"0.3\"\nbroken = [\n");
        let d = read_descriptor(dir.path());
        assert_eq!(d.name.as_deref(), Some("demo"));
        assert_eq!(d.version.as_deref(), Some("0.3"));
    }

    #[test]
    fn read_descriptor_with_flat_reader() {
        let dir = write_descriptor(FULL);
        let d = read_descriptor_with(dir.path(), &FlatReader);
        assert_eq!(d.name.as_deref(), Some("islpy-barvinok"));
        assert!(d.classifiers.is_empty());
    }

    #[test]
    fn author_name() {
        assert_eq!(Author::Plain("A".to_owned()).name(), Some("A"));
        let table = Author::Table {
            name: None,
            email: Some("a@b".to_owned()),
        };
        assert_eq!(table.name(), None);
    }

    proptest! {
        #[test]
        fn flat_reader_never_panics(content in "\\PC*") {
            let _ = FlatReader.parse(&content);
        }

        #[test]
        fn flat_reader_recovers_plain_versions(version in "[0-9]{1,3}(\\.[0-9]{1,3}){0,3}") {
            let content = format!("[project]\nversion = \"{version}\"\n");
            let d = FlatReader.parse(&content).unwrap();
            prop_assert_eq!(d.version, Some(version));
        }
    }
}
