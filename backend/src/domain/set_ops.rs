//! Small list algorithms used by tag reconciliation.
//!
//! [`partition`] splits desired values against existing records and
//! [`dedupe_by_id`] flattens records gathered from several sources.

use std::collections::HashSet;
use std::hash::Hash;

use super::{Post, PostId, Tag, TagId};

/// Result of [`partition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitioned<T, U> {
    /// Candidates with no equivalent reference element.
    pub unmatched: Vec<T>,
    /// Reference elements that matched a candidate, in candidate order.
    pub matched: Vec<U>,
}

/// Split `candidates` by whether an equivalent element exists in `reference`.
///
/// For each candidate the first reference element satisfying `equal` is
/// pushed to `matched`; otherwise the candidate itself goes to `unmatched`.
/// Both outputs follow candidate order. Runs in O(|candidates| × |reference|),
/// which suits human-entered tag lists.
///
/// # Examples
/// ```
/// use blog_backend::domain::partition;
///
/// let split = partition(vec![1, 2, 3], &[3, 4, 5], |a, b| a == b);
/// assert_eq!(split.unmatched, vec![1, 2]);
/// assert_eq!(split.matched, vec![3]);
/// ```
pub fn partition<T, U, F>(
    candidates: impl IntoIterator<Item = T>,
    reference: &[U],
    mut equal: F,
) -> Partitioned<T, U>
where
    U: Clone,
    F: FnMut(&T, &U) -> bool,
{
    let mut unmatched = Vec::new();
    let mut matched = Vec::new();
    for candidate in candidates {
        match reference.iter().find(|item| equal(&candidate, *item)) {
            Some(existing) => matched.push(existing.clone()),
            None => unmatched.push(candidate),
        }
    }
    Partitioned { unmatched, matched }
}

/// Records carrying a stable identity.
pub trait Identified {
    /// Identity type compared when deduplicating.
    type Id: Eq + Hash + Clone;

    /// The record's identity.
    fn identity(&self) -> Self::Id;
}

impl Identified for Post {
    type Id = PostId;

    fn identity(&self) -> Self::Id {
        self.id
    }
}

impl Identified for Tag {
    type Id = TagId;

    fn identity(&self) -> Self::Id {
        self.id
    }
}

/// Keep one record per identity, in first-encountered order.
///
/// Later records sharing an identity with an earlier one are discarded.
/// Applying the function twice yields the same result as applying it once.
pub fn dedupe_by_id<T>(items: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Identified,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.identity()))
        .collect()
}
