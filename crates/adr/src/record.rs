//! ADR record types and slug handling

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Closed vocabularies stored as plain strings in the index
pub trait Keyword: Sized + Copy {
    fn as_str(&self) -> &'static str;

    /// Case-insensitive lookup; `None` for unknown words
    fn parse(s: &str) -> Option<Self>;
}

/// ADR categories, one section of the index each
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Feature,
    Architecture,
    Docs,
    Process,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Architecture => "architecture",
            Self::Docs => "docs",
            Self::Process => "process",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "feature" | "feat" => Some(Self::Feature),
            "architecture" | "arch" => Some(Self::Architecture),
            "docs" | "doc" => Some(Self::Docs),
            "process" | "proc" => Some(Self::Process),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Feature, Self::Architecture, Self::Docs, Self::Process]
    }
}

impl Keyword for Category {
    fn as_str(&self) -> &'static str {
        Category::as_str(self)
    }

    fn parse(s: &str) -> Option<Self> {
        Category::from_str(s)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status written into an ADR.
///
/// The tool only seeds `Proposed`; later transitions are edited by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdrStatus {
    #[default]
    Proposed,
    Accepted,
    Rejected,
    Superseded,
}

impl AdrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Superseded => "superseded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "proposed" => Some(Self::Proposed),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "superseded" => Some(Self::Superseded),
            _ => None,
        }
    }

    /// Capitalized form used inside documents ("Status: Proposed")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Proposed => "Proposed",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::Superseded => "Superseded",
        }
    }
}

impl Keyword for AdrStatus {
    fn as_str(&self) -> &'static str {
        AdrStatus::as_str(self)
    }

    fn parse(s: &str) -> Option<Self> {
        AdrStatus::from_str(s)
    }
}

impl std::fmt::Display for AdrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A hand-edited index value: a known keyword, or the raw text as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lenient<T> {
    Known(T),
    Unknown(String),
}

impl<T: Keyword> Lenient<T> {
    pub fn known(&self) -> Option<T> {
        match self {
            Self::Known(value) => Some(*value),
            Self::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(value) => value.as_str(),
            Self::Unknown(raw) => raw,
        }
    }
}

impl<T: Keyword> Serialize for Lenient<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de, T: Keyword> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match T::parse(&raw) {
            Some(value) => Self::Known(value),
            None => Self::Unknown(raw),
        })
    }
}

/// Metadata for one ADR as stored under `[adr.<id>]` in the index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdrRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Lenient<Category>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Lenient<AdrStatus>>,

    /// Working file, relative to `branches/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// File name under `merged/` once merged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged: Option<String>,
}

impl AdrRecord {
    pub fn known_category(&self) -> Option<Category> {
        self.category.as_ref().and_then(Lenient::known)
    }

    pub fn known_status(&self) -> Option<AdrStatus> {
        self.status.as_ref().and_then(Lenient::known)
    }

    /// Values present in the record that are not recognized keywords
    pub fn unrecognized(&self) -> Vec<String> {
        let mut found = Vec::new();
        if let Some(Lenient::Unknown(raw)) = &self.category {
            found.push(format!("unrecognized category '{}'", raw));
        }
        if let Some(Lenient::Unknown(raw)) = &self.status {
            found.push(format!("unrecognized status '{}'", raw));
        }
        found
    }
}

/// Normalize a title into a filesystem-safe slug.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single hyphen and trims hyphens from both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("My Decision"), "my-decision");
        assert_eq!(slugify("  Use   TOML -- for the index!! "), "use-toml-for-the-index");
        assert_eq!(slugify("HTTP/2 over QUIC"), "http-2-over-quic");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_idempotent() {
        for title in [
            "My Decision",
            "Déjà vu: caching",
            "a__b..c",
            "-leading and trailing-",
            "already-a-slug",
            "",
        ] {
            let once = slugify(title);
            assert_eq!(slugify(&once), once, "title: {:?}", title);
        }
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Déjà vu"), "d-j-vu");
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!(Category::from_str("feat"), Some(Category::Feature));
        assert_eq!(Category::from_str("Architecture"), Some(Category::Architecture));
        assert_eq!(Category::from_str("misc"), None);
        assert_eq!(Category::all().len(), 4);
    }

    #[test]
    fn test_record_deserializes_aliases() {
        let record: AdrRecord = toml::from_str(
            r#"
title = "Queue"
category = "arch"
status = "superseded"
file = "architecture/queue.md"
"#,
        )
        .unwrap();
        assert_eq!(record.known_category(), Some(Category::Architecture));
        assert_eq!(record.known_status(), Some(AdrStatus::Superseded));
        assert!(record.merged.is_none());
        assert!(record.unrecognized().is_empty());
    }

    #[test]
    fn test_record_accepts_document_spelling_and_unknown_words() {
        let record: AdrRecord =
            toml::from_str("status = \"Accepted\"\ncategory = \"security\"\n").unwrap();

        assert_eq!(record.known_status(), Some(AdrStatus::Accepted));
        assert_eq!(record.category, Some(Lenient::Unknown("security".to_string())));
        assert!(record.known_category().is_none());
        assert_eq!(record.unrecognized(), vec!["unrecognized category 'security'"]);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "accepted");
        assert_eq!(json["category"], "security");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(AdrStatus::from_str("Proposed"), Some(AdrStatus::Proposed));
        assert_eq!(AdrStatus::from_str(" REJECTED "), Some(AdrStatus::Rejected));
        assert_eq!(AdrStatus::from_str("final"), None);
    }
}
