use std::collections::HashSet;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// Stable identity of a list item. Two items with the same identity are the
/// same entity, whatever their other attributes say.
pub trait Identity {
    fn identity(&self) -> &str;
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Setters)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[setters(strip_option)]
    pub next_cursor: Option<String>,
}

/// One fetched page of items together with its continuation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub page_info: PageInfo,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }

    /// The base every listing starts from.
    pub fn empty() -> Self {
        Self { items: Vec::new(), page_info: PageInfo::default() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.page_info.has_next_page
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.page_info.next_cursor.as_deref()
    }
}

/// Folds `more` into `base`.
///
/// Items are `base` followed by `more`, keeping only the first occurrence of
/// every identity. The page info always comes from `more`.
pub fn combine<T: Identity + Clone>(base: &Page<T>, more: &Page<T>) -> Page<T> {
    let mut seen = HashSet::with_capacity(base.len() + more.len());
    let items = base
        .items
        .iter()
        .chain(more.items.iter())
        .filter(|item| seen.insert(item.identity()))
        .cloned()
        .collect();

    Page { items, page_info: more.page_info.clone() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Item {
        name: &'static str,
        score: i64,
    }

    impl Identity for Item {
        fn identity(&self) -> &str {
            self.name
        }
    }

    fn item(name: &'static str) -> Item {
        Item { name, score: 0 }
    }

    fn page(items: Vec<Item>, cursor: Option<&str>, has_next_page: bool) -> Page<Item> {
        Page::new(
            items,
            PageInfo { has_next_page, next_cursor: cursor.map(str::to_string) },
        )
    }

    #[test]
    fn test_duplicate_keeps_first_page_position() {
        let base = page(vec![item("a"), item("b")], Some("c1"), true);
        let more = page(vec![item("b"), item("c")], Some("c2"), false);

        let actual = combine(&base, &more);
        let expected = page(vec![item("a"), item("b"), item("c")], Some("c2"), false);
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_later_duplicate_is_dropped_not_merged() {
        let base = page(vec![Item { name: "a", score: 1 }], None, true);
        let more = page(vec![Item { name: "a", score: 99 }], None, false);

        let actual = combine(&base, &more);
        assert_eq!(actual.items, vec![Item { name: "a", score: 1 }]);
    }

    #[test]
    fn test_empty_base_passes_new_page_through_dedup() {
        let more = page(vec![item("x"), item("y"), item("x")], Some("c1"), true);

        let actual = combine(&Page::empty(), &more);
        let expected = page(vec![item("x"), item("y")], Some("c1"), true);
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_empty_new_page_dedups_base_and_advances_cursor() {
        let base = page(vec![item("a"), item("a"), item("b")], Some("c1"), true);
        let more = page(vec![], None, false);

        let actual = combine(&base, &more);
        let expected = page(vec![item("a"), item("b")], None, false);
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_cursor_comes_from_new_page() {
        let base = page(vec![item("a")], Some("c9"), true);
        let more = page(vec![item("b")], Some("c1"), true);

        assert_eq!(combine(&base, &more).next_cursor(), Some("c1"));
    }

    #[test]
    fn test_inputs_are_untouched() {
        let base = page(vec![item("a")], Some("c1"), true);
        let more = page(vec![item("a"), item("b")], Some("c2"), false);
        let (base_before, more_before) = (base.clone(), more.clone());

        let _ = combine(&base, &more);
        assert_eq!(base, base_before);
        assert_eq!(more, more_before);
    }

    #[test]
    fn test_page_info_wire_format() {
        let info = PageInfo::default().has_next_page(true).next_cursor("t3_abc".to_string());
        let actual = serde_json::to_value(&info).unwrap();

        assert_eq!(
            actual,
            serde_json::json!({"hasNextPage": true, "nextCursor": "t3_abc"})
        );
    }
}
