//! # Routing keys.
//!
//! A [`Topic`] identifies one fan-out group inside the hub. Topics are cheap
//! to clone and compare; named topics share their backing string.
//!
//! Commands that list no topics act on [`Topic::Default`], a distinguished
//! topic that always exists implicitly.

use std::fmt;
use std::sync::Arc;

/// Identifier for a fan-out group.
///
/// `Topic::Default` is used whenever a command omits topics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Topic {
    /// The implicit topic targeted by commands that list no topics.
    #[default]
    Default,
    /// A caller-chosen topic name.
    Named(Arc<str>),
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        Topic::Named(Arc::from(name))
    }
}

impl From<String> for Topic {
    fn from(name: String) -> Self {
        Topic::Named(Arc::from(name))
    }
}

impl From<Arc<str>> for Topic {
    fn from(name: Arc<str>) -> Self {
        Topic::Named(name)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Default => f.write_str("(default)"),
            Topic::Named(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_topics_compare_by_content() {
        assert_eq!(Topic::from("updates"), Topic::from(String::from("updates")));
        assert_ne!(Topic::from("updates"), Topic::from("metrics"));
        assert_ne!(Topic::from("updates"), Topic::Default);
    }

    #[test]
    fn default_is_the_default() {
        assert_eq!(Topic::default(), Topic::Default);
    }
}
