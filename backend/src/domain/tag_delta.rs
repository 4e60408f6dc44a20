//! Difference between a post's current tags and the names a caller wants.

use std::collections::HashSet;

use super::{TagName, TagSummary, partition};

/// Changes needed to move a post from its current tags to a desired set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDelta {
    /// Current tags whose name is no longer desired.
    pub removed: Vec<TagSummary>,
    /// Current tags that stay attached.
    pub retained: Vec<TagSummary>,
    /// Desired names the post does not carry yet.
    pub added: Vec<TagName>,
}

impl TagDelta {
    /// Compare by name; `desired` should already be free of duplicates.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::{TagDelta, TagId, TagName, TagSummary};
    ///
    /// let name = |raw: &str| TagName::new(raw).expect("valid");
    /// let current = vec![
    ///     TagSummary { id: TagId::random(), name: name("go") },
    ///     TagSummary { id: TagId::random(), name: name("infra") },
    /// ];
    /// let delta = TagDelta::between(&current, &[name("infra"), name("db")]);
    ///
    /// assert_eq!(delta.removed, vec![current[0].clone()]);
    /// assert_eq!(delta.retained, vec![current[1].clone()]);
    /// assert_eq!(delta.added, vec![name("db")]);
    /// ```
    pub fn between(current: &[TagSummary], desired: &[TagName]) -> Self {
        let removal = partition(current.iter().cloned(), desired, |tag, name| tag.name == *name);
        let addition = partition(desired.iter().cloned(), current, |name, tag| *name == tag.name);
        Self {
            removed: removal.unmatched,
            retained: addition.matched,
            added: addition.unmatched,
        }
    }

    /// `true` when the post already carries exactly the desired names.
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Drop repeated names, keeping the first occurrence of each.
pub fn unique_names(names: impl IntoIterator<Item = TagName>) -> Vec<TagName> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
