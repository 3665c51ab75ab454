//! Core-metadata synthesis: `pyproject.toml` + README → `PKG-INFO`.

use wheelwright_config::ProjectDescriptor;

/// Name used when the descriptor has none.
pub const DEFAULT_NAME: &str = "UNKNOWN";

/// Version used when the descriptor has none.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Core-metadata version written to the document.
pub const METADATA_VERSION: &str = "2.1";

/// License file declared by every document.
pub const LICENSE_FILE: &str = "LICENSE";

/// Long description source at the project root.
pub const README_FILE: &str = "README.md";

/// Name of the metadata document inside a source distribution.
pub const PKG_INFO: &str = "PKG-INFO";

/// Metadata derived from a project descriptor.
///
/// `name` and `version` are always populated; every optional field is either
/// `None` or non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub name: String,
    pub version: String,
    pub summary: Option<String>,
    pub home_page: Option<String>,
    pub author: Option<String>,
    pub requires_python: Option<String>,
    pub classifiers: Vec<String>,
    /// `(label, url)` pairs in descriptor order.
    pub project_urls: Vec<(String, String)>,
    /// Markdown long description.
    pub description: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_owned)
}

/// Derive a [`MetadataRecord`]. Never fails; missing data becomes a default
/// or an omitted field.
pub fn synthesize(descriptor: &ProjectDescriptor, readme: Option<&str>) -> MetadataRecord {
    let name = non_empty(descriptor.name.as_deref()).unwrap_or_else(|| DEFAULT_NAME.to_owned());
    let version =
        non_empty(descriptor.version.as_deref()).unwrap_or_else(|| DEFAULT_VERSION.to_owned());

    // Only the first author is reported.
    let author = descriptor
        .authors
        .first()
        .and_then(|author| non_empty(author.name()));

    let home_page = ["Homepage", "Home"]
        .into_iter()
        .find_map(|label| non_empty(descriptor.url(label)));

    MetadataRecord {
        name,
        version,
        summary: non_empty(descriptor.description.as_deref()),
        home_page,
        author,
        requires_python: non_empty(descriptor.requires_python.as_deref()),
        classifiers: descriptor.classifiers.clone(),
        project_urls: descriptor.urls.clone(),
        description: non_empty(readme),
    }
}

impl MetadataRecord {
    /// Render the record as a core-metadata document.
    ///
    /// ```text
    /// Metadata-Version: 2.1
    /// Name: foo
    /// Version: 1.2.3
    /// License-File: LICENSE
    /// ```
    ///
    /// Fields appear in a fixed order and empty ones are left out. The
    /// document always ends in exactly one newline.
    pub fn render(&self) -> String {
        let mut writer = String::new();
        write_field(&mut writer, "Metadata-Version", METADATA_VERSION);
        write_field(&mut writer, "Name", &self.name);
        write_field(&mut writer, "Version", &self.version);
        write_opt_field(&mut writer, "Summary", self.summary.as_deref());
        write_opt_field(&mut writer, "Home-page", self.home_page.as_deref());
        write_opt_field(&mut writer, "Author", self.author.as_deref());
        write_opt_field(&mut writer, "Requires-Python", self.requires_python.as_deref());
        write_field(&mut writer, "License-File", LICENSE_FILE);
        for classifier in &self.classifiers {
            write_field(&mut writer, "Classifier", classifier);
        }
        for (label, url) in &self.project_urls {
            write_field(&mut writer, "Project-URL", &format!("{label}, {url}"));
        }
        if let Some(description) = &self.description {
            write_field(&mut writer, "Description-Content-Type", "text/markdown");
            writer.push('\n');
            writer.push_str(description.trim_end_matches(['\n', '\r']));
            writer.push('\n');
        }
        writer
    }
}

/// Write `key: value`. Continuation lines of a multi-line value are indented
/// under the value so the header block stays parseable.
fn write_field(writer: &mut String, key: &str, value: &str) {
    let mut lines = value.lines();
    let first = lines.next().unwrap_or_default();
    writer.push_str(key);
    writer.push_str(": ");
    writer.push_str(first);
    writer.push('\n');
    for line in lines {
        writer.push_str(&" ".repeat(key.len() + 2));
        writer.push_str(line);
        writer.push('\n');
    }
}

fn write_opt_field(writer: &mut String, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        write_field(writer, key, value);
    }
}
