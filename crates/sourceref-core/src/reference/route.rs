use serde::{Deserialize, Serialize};

use super::normalize::{base_name, extension, normalize_ref, to_forward_slashes};

/// Prefix of canonical repository object URIs.
pub const OBJECT_URI_PREFIX: &str = "/sap/bc/adt/";

/// File suffix of serialized repository objects.
pub const OBJECT_FILE_SUFFIX: &str = ".abap";

pub const OBJECT_LANGUAGE: &str = "abap";
pub const PLAINTEXT_LANGUAGE: &str = "plaintext";

const LANGUAGE_BY_EXTENSION: &[(&str, &str)] = &[
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("cjs", "javascript"),
    ("mjs", "javascript"),
    ("json", "json"),
    ("css", "css"),
    ("scss", "scss"),
    ("less", "less"),
    ("html", "html"),
    ("md", "markdown"),
    ("yml", "yaml"),
    ("yaml", "yaml"),
    ("xml", "xml"),
    ("sh", "shell"),
    ("bash", "shell"),
    ("sql", "sql"),
    ("py", "python"),
    ("go", "go"),
    ("rs", "rust"),
    ("java", "java"),
    ("toml", "toml"),
];

const LANGUAGE_BY_FILE_NAME: &[(&str, &str)] = &[("Dockerfile", "dockerfile")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    StructuredObject,
    WorkspacePath,
}

impl RefKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StructuredObject => "structured_object",
            Self::WorkspacePath => "workspace_path",
        }
    }
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefRoute {
    pub kind: RefKind,
    pub normalized_ref: String,
    pub display_language: String,
}

pub fn is_object_uri(reference: &str) -> bool {
    reference.starts_with(OBJECT_URI_PREFIX)
}

pub fn is_structured_object_ref(reference: &str) -> bool {
    is_object_uri(reference) || reference.to_lowercase().ends_with(OBJECT_FILE_SUFFIX)
}

/// Language registered for a file extension, if any.
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.to_ascii_lowercase();
    LANGUAGE_BY_EXTENSION
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, language)| *language)
}

/// Display language for a workspace path. Exact file names win over the
/// extension table.
pub fn workspace_language(path: &str) -> &'static str {
    let normalized = to_forward_slashes(path);
    let name = base_name(&normalized);

    if let Some((_, language)) = LANGUAGE_BY_FILE_NAME.iter().find(|(file, _)| *file == name) {
        return *language;
    }

    extension(name)
        .and_then(|ext| language_for_extension(&ext))
        .unwrap_or(PLAINTEXT_LANGUAGE)
}

pub fn route_ref(raw: &str) -> RefRoute {
    let normalized = normalize_ref(raw);

    if is_structured_object_ref(&normalized) {
        return RefRoute {
            kind: RefKind::StructuredObject,
            normalized_ref: normalized,
            display_language: OBJECT_LANGUAGE.to_string(),
        };
    }

    let path = to_forward_slashes(&normalized);
    let display_language = workspace_language(&path).to_string();
    RefRoute {
        kind: RefKind::WorkspacePath,
        normalized_ref: path,
        display_language,
    }
}
