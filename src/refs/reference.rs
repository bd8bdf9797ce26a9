use std::collections::HashMap;

/// A model referenced by a building map, optionally qualified with the
/// publishing author.
///
/// A bare name and a qualified reference to the same model name are distinct
/// set members; the map author's intent is preserved until resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelReference {
    /// Plain model name, author unknown.
    Bare(String),
    /// `author/name` qualified reference.
    Qualified { author: String, name: String },
}

impl ModelReference {
    /// Parse a raw placement name.
    ///
    /// No `/` yields a bare reference. Otherwise the segment before the first
    /// `/` is the author and all remaining segments collapse into the model
    /// name.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('/') {
            None => Self::Bare(raw.to_string()),
            Some((author, rest)) => Self::Qualified {
                author: author.to_string(),
                name: rest.split('/').collect::<Vec<_>>().concat(),
            },
        }
    }

    /// The model name, without any author qualifier.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Bare(name) | Self::Qualified { name, .. } => name,
        }
    }

    /// The declared author, if the reference carries one.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::Qualified { author, .. } => Some(author),
        }
    }
}

/// Author declarations harvested from qualified references.
///
/// Keys and values are lowercased. When the same model name is declared with
/// two different authors, the later declaration wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorHints {
    by_name: HashMap<String, String>,
}

impl AuthorHints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an author declaration for a model name (last-write-wins).
    pub fn declare(&mut self, name: &str, author: &str) {
        self.by_name
            .insert(name.to_lowercase(), author.to_lowercase());
    }

    /// Look up the declared author for a model name.
    #[must_use]
    pub fn author_for(&self, name: &str) -> Option<&str> {
        self.by_name.get(&name.to_lowercase()).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Iterate declared (name, author) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_name.iter().map(|(n, a)| (n.as_str(), a.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare() {
        assert_eq!(
            ModelReference::parse("Lamp"),
            ModelReference::Bare("Lamp".to_string())
        );
    }

    #[test]
    fn test_parse_qualified() {
        assert_eq!(
            ModelReference::parse("alice/robot"),
            ModelReference::Qualified {
                author: "alice".to_string(),
                name: "robot".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_collapses_trailing_segments() {
        // Author is only ever the first segment.
        assert_eq!(
            ModelReference::parse("alice/robot/arm"),
            ModelReference::Qualified {
                author: "alice".to_string(),
                name: "robotarm".to_string(),
            }
        );
    }

    #[test]
    fn test_name_and_author_accessors() {
        let bare = ModelReference::parse("Lamp");
        assert_eq!(bare.name(), "Lamp");
        assert_eq!(bare.author(), None);

        let qualified = ModelReference::parse("alice/robot");
        assert_eq!(qualified.name(), "robot");
        assert_eq!(qualified.author(), Some("alice"));
    }

    #[test]
    fn test_bare_and_qualified_are_distinct() {
        let mut set = std::collections::HashSet::new();
        set.insert(ModelReference::parse("robot"));
        set.insert(ModelReference::parse("alice/robot"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_hints_lowercase_keys_and_values() {
        let mut hints = AuthorHints::new();
        hints.declare("Robot", "Alice");
        assert_eq!(hints.author_for("robot"), Some("alice"));
        assert_eq!(hints.author_for("ROBOT"), Some("alice"));
    }

    #[test]
    fn test_hints_last_write_wins() {
        let mut hints = AuthorHints::new();
        hints.declare("robot", "alice");
        hints.declare("Robot", "bob");
        assert_eq!(hints.author_for("robot"), Some("bob"));
        assert_eq!(hints.len(), 1);
    }

    #[test]
    fn test_hints_miss() {
        let hints = AuthorHints::new();
        assert!(hints.is_empty());
        assert_eq!(hints.author_for("robot"), None);
    }
}
