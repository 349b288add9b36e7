//! Canonical ordering of small keyword vocabularies and stable insertion into
//! lists that are already (mostly) in that order.
//!
//! The insertion routine is vocabulary-agnostic: it only needs a `rank`
//! function. [`Vocabulary`] provides one for fixed keyword tables such as
//! [`MODIFIERS`] and [`ACCESSORS`].

use std::cmp::Ordering;

/// Position of an element in a canonical order.
///
/// Every known rank sorts before [`Rank::Unknown`], so unrecognized elements
/// gather at the end while keeping their relative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Known(u32),
    Unknown,
}

/// Index at which `new` should be inserted into `existing`.
///
/// Scans from the front and returns the first position whose rank is strictly
/// greater than `rank(new)`, or `existing.len()` when there is none. Elements
/// of equal rank therefore stay in front of the new one, and no existing
/// element ever changes position relative to another.
pub fn insertion_index<T, R, F>(existing: &[T], new: &T, rank: F) -> usize
where
    R: Ord,
    F: Fn(&T) -> R,
{
    let new_rank = rank(new);
    existing
        .iter()
        .position(|item| rank(item) > new_rank)
        .unwrap_or(existing.len())
}

/// Insert `new` into `existing` at [`insertion_index`] and return that index.
pub fn insert_ordered<T, R, F>(existing: &mut Vec<T>, new: T, rank: F) -> usize
where
    R: Ord,
    F: Fn(&T) -> R,
{
    let index = insertion_index(existing, &new, rank);
    existing.insert(index, new);
    index
}

/// True when `items` never steps backwards in rank.
pub fn is_canonically_ordered<T, R, F>(items: &[T], rank: F) -> bool
where
    R: Ord,
    F: Fn(&T) -> R,
{
    items.windows(2).all(|w| rank(&w[0]) <= rank(&w[1]))
}

/// A finite keyword vocabulary with a total order given by table position.
#[derive(Debug, Clone, Copy)]
pub struct Vocabulary {
    pub name: &'static str,
    order: &'static [&'static str],
}

impl Vocabulary {
    pub const fn new(name: &'static str, order: &'static [&'static str]) -> Self {
        Self { name, order }
    }

    pub fn rank(&self, keyword: &str) -> Rank {
        self.order
            .iter()
            .position(|k| *k == keyword)
            .map_or(Rank::Unknown, |idx| Rank::Known(idx as u32))
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.order.contains(&keyword)
    }

    /// Compare two keywords by canonical position.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.rank(a).cmp(&self.rank(b))
    }

    /// [`insertion_index`] with this vocabulary's rank.
    pub fn insertion_index<S: AsRef<str>>(&self, existing: &[S], keyword: &str) -> usize {
        let keywords: Vec<&str> = existing.iter().map(AsRef::as_ref).collect();
        insertion_index(&keywords, &keyword, |k| self.rank(k))
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        self.order
    }
}

/// Declaration modifiers in the conventional C# order.
pub static MODIFIERS: Vocabulary = Vocabulary::new(
    "modifiers",
    &[
        "public", "private", "protected", "internal", "file", "static", "extern", "new",
        "virtual", "abstract", "sealed", "override", "readonly", "unsafe", "required",
        "volatile", "async", "partial",
    ],
);

/// Property and event accessors.
pub static ACCESSORS: Vocabulary =
    Vocabulary::new("accessors", &["get", "set", "init", "add", "remove"]);

#[cfg(test)]
mod tests {
    use super::*;

    fn example_rank(keyword: &&str) -> Rank {
        match *keyword {
            "public" => Rank::Known(0),
            "static" => Rank::Known(2),
            "override" => Rank::Known(3),
            "readonly" => Rank::Known(4),
            _ => Rank::Unknown,
        }
    }

    #[test]
    fn inserts_after_lower_ranks() {
        let mut list = vec!["public", "static"];
        assert_eq!(insert_ordered(&mut list, "override", example_rank), 2);
        assert_eq!(list, ["public", "static", "override"]);

        assert_eq!(insert_ordered(&mut list, "readonly", example_rank), 3);
        assert_eq!(list, ["public", "static", "override", "readonly"]);
    }

    #[test]
    fn inserts_in_the_middle() {
        let list = ["public", "readonly"];
        assert_eq!(insertion_index(&list, &"static", example_rank), 1);
    }

    #[test]
    fn inserts_into_empty_list() {
        let mut list: Vec<&str> = Vec::new();
        assert_eq!(insert_ordered(&mut list, "static", example_rank), 0);
        assert_eq!(list, ["static"]);
    }

    #[test]
    fn equal_rank_goes_after_existing() {
        let rank = |s: &(&str, u32)| s.1;
        let mut list = vec![("a", 1), ("b", 1), ("c", 2)];
        assert_eq!(insert_ordered(&mut list, ("d", 1), rank), 2);
        assert_eq!(list, [("a", 1), ("b", 1), ("d", 1), ("c", 2)]);
    }

    #[test]
    fn unknown_elements_keep_their_relative_order() {
        let mut list = vec!["public", "foo", "bar"];
        assert_eq!(insert_ordered(&mut list, "static", example_rank), 1);
        assert_eq!(list, ["public", "static", "foo", "bar"]);

        assert_eq!(insert_ordered(&mut list, "baz", example_rank), 4);
        assert_eq!(list, ["public", "static", "foo", "bar", "baz"]);
    }

    #[test]
    fn out_of_order_input_is_not_reshuffled() {
        let mut list = vec!["readonly", "public"];
        let index = insert_ordered(&mut list, "static", example_rank);
        assert_eq!(index, 0);
        assert_eq!(list, ["static", "readonly", "public"]);
    }

    #[test]
    fn removing_inserted_element_restores_input() {
        let existing = ["public", "static", "override", "readonly"];
        for new in ["public", "static", "override", "readonly", "other"] {
            let mut list = existing.to_vec();
            let index = insert_ordered(&mut list, new, example_rank);
            assert!(is_canonically_ordered(&list, example_rank));
            list.remove(index);
            assert_eq!(list, existing);
        }
    }

    #[test]
    fn modifier_vocabulary_follows_convention() {
        assert_eq!(MODIFIERS.compare("public", "static"), Ordering::Less);
        assert_eq!(MODIFIERS.compare("override", "new"), Ordering::Greater);
        assert_eq!(MODIFIERS.compare("whatever", "async"), Ordering::Greater);
        assert_eq!(MODIFIERS.rank("nope"), Rank::Unknown);

        assert_eq!(MODIFIERS.insertion_index(&["public"], "override"), 1);
        assert_eq!(MODIFIERS.insertion_index(&["public", "async"], "new"), 1);
        assert_eq!(MODIFIERS.insertion_index(&["static"], "public"), 0);
        assert_eq!(MODIFIERS.insertion_index::<&str>(&[], "new"), 0);
    }

    #[test]
    fn vocabulary_index_matches_generic_routine() {
        let existing = ["public", "static", "readonly", "mystery", "async"];
        for keyword in MODIFIERS.keywords().iter().chain(&["other"]) {
            assert_eq!(
                MODIFIERS.insertion_index(&existing, keyword),
                insertion_index(&existing, keyword, |k: &&str| MODIFIERS.rank(k)),
                "{keyword}"
            );
        }
    }

    #[test]
    fn accessor_vocabulary_reuses_algorithm() {
        let mut accessors = vec!["get", "init"];
        insert_ordered(&mut accessors, "set", |a: &&str| ACCESSORS.rank(a));
        assert_eq!(accessors, ["get", "set", "init"]);
        assert!(is_canonically_ordered(&accessors, |a: &&str| ACCESSORS.rank(a)));
        assert!(!is_canonically_ordered(&["set", "get"], |a: &&str| ACCESSORS.rank(a)));
    }
}
