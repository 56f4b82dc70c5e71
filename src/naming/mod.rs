//! Deterministic identifiers for partition nodes.

use std::collections::HashSet;

/// Identifier addressing a leaf or split in both emitter outputs.
pub type NodeId = String;

const LEAF_PREFIX: &str = "ax_";
const SPLIT_PREFIX: &str = "gs_";

/// Issues node ids during one compile.
///
/// Ids depend only on labels and traversal order, so identical art always
/// yields identical ids.
#[derive(Debug, Default)]
pub struct NameAllocator {
    issued: HashSet<NodeId>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(&mut self, label: char) -> NodeId {
        let id = format!("{LEAF_PREFIX}{label}");
        self.issued.insert(id.clone());
        id
    }

    /// Id for a split covering `labels`. A repeated label set gets `_2`, `_3`, ...
    pub fn split(&mut self, labels: impl IntoIterator<Item = char>) -> NodeId {
        let mut sorted: Vec<char> = labels.into_iter().collect();
        sorted.sort_unstable();
        let base: String = std::iter::once(SPLIT_PREFIX.to_string())
            .chain(sorted.iter().map(char::to_string))
            .collect();

        let mut candidate = base.clone();
        let mut attempt = 1;
        while self.issued.contains(&candidate) {
            attempt += 1;
            candidate = format!("{base}_{attempt}");
        }
        self.issued.insert(candidate.clone());
        candidate
    }

    /// Recover the label from a leaf id.
    pub fn label_of_leaf(id: &str) -> Option<char> {
        let mut chars = id.strip_prefix(LEAF_PREFIX)?.chars();
        let label = chars.next()?;
        chars.next().is_none().then_some(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_ids_sort_labels() {
        let mut names = NameAllocator::new();
        assert_eq!(names.split(['c', 'a', 'b']), "gs_abc");
        assert_eq!(names.leaf('a'), "ax_a");
    }

    #[test]
    fn repeated_label_sets_get_suffixes() {
        let mut names = NameAllocator::new();
        assert_eq!(names.split(['b', 'a']), "gs_ab");
        assert_eq!(names.split(['a', 'b']), "gs_ab_2");
        assert_eq!(names.split(['a', 'b']), "gs_ab_3");
    }

    #[test]
    fn leaf_label_round_trip() {
        assert_eq!(NameAllocator::label_of_leaf("ax_Z"), Some('Z'));
        assert_eq!(NameAllocator::label_of_leaf("gs_ab"), None);
        assert_eq!(NameAllocator::label_of_leaf("ax_ab"), None);
    }
}
