//! Sorting live listings by a user-curated order list

use serde::Serialize;
use std::collections::HashMap;

/// A live listing sorted by its profile, as handed to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing<P> {
    pub list: Vec<String>,
    pub profile: P,
}

/// Sort `names` by their position in `order`.
///
/// `order` is only a sort key: names missing from the listing are ignored,
/// and names absent from `order` keep their listing order after all the
/// ordered ones. The sort is stable.
pub fn sort_by_order(names: &mut [String], order: &[String]) {
    if order.is_empty() {
        return;
    }

    // First occurrence wins for duplicated entries
    let mut rank: HashMap<&str, usize> = HashMap::with_capacity(order.len());
    for (i, name) in order.iter().enumerate() {
        rank.entry(name.as_str()).or_insert(i);
    }

    names.sort_by_cached_key(|name| rank.get(name.as_str()).copied().unwrap_or(usize::MAX));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ordered_then_trailing() {
        let mut names = strings(&["a", "b", "c", "d", "e"]);
        sort_by_order(&mut names, &strings(&["d", "ghost", "b"]));
        assert_eq!(names, strings(&["d", "b", "a", "c", "e"]));
    }

    #[test]
    fn test_permuted_subset() {
        let mut names = strings(&["x.png", "y.png", "z.png", "w.png"]);
        sort_by_order(&mut names, &strings(&["z.png", "x.png"]));
        assert_eq!(names, strings(&["z.png", "x.png", "y.png", "w.png"]));
    }

    #[test]
    fn test_empty_order_keeps_listing() {
        let mut names = strings(&["c", "a", "b"]);
        sort_by_order(&mut names, &[]);
        assert_eq!(names, strings(&["c", "a", "b"]));
    }

    #[test]
    fn test_duplicate_order_entries() {
        let mut names = strings(&["a", "b"]);
        sort_by_order(&mut names, &strings(&["b", "a", "b"]));
        assert_eq!(names, strings(&["b", "a"]));
    }
}
