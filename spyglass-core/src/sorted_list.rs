// Ordered collection with a runtime sorting toggle. With sorting enabled,
// inserts binary-search for the position given by the element's
// case-insensitive name key; ties keep insertion order. With sorting
// disabled, the list behaves as a plain append-only vector.

use std::cmp::Ordering;

/// Sort key for [`SortedList`] elements. Keys compare case-insensitively.
pub trait SortKey {
    fn sort_key(&self) -> &str;
}

/// Case-insensitive key comparison, stable across Unicode lowercasing.
fn key_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

pub struct SortedList<T> {
    items: Vec<T>,
    sorting_enabled: bool,
}

impl<T: SortKey> SortedList<T> {
    pub fn new(sorting_enabled: bool) -> Self {
        SortedList {
            items: Vec::new(),
            sorting_enabled,
        }
    }

    /// Insert an item and return its resulting index. Sorted mode places it
    /// after any existing items with an equal key (stable tie-break).
    pub fn add(&mut self, item: T) -> usize {
        let index = if self.sorting_enabled {
            self.items
                .partition_point(|existing| key_cmp(existing.sort_key(), item.sort_key()) != Ordering::Greater)
        } else {
            self.items.len()
        };
        self.items.insert(index, item);
        index
    }

    /// Remove the item at `index`. Out-of-range indices are a silent no-op;
    /// callers check the returned value.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Remove the first item equal to `item`. Returns false when absent.
    pub fn remove(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        match self.index_of(item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Index of `item`: binary search over the key when sorted (scanning
    /// the equal-key run for an exact match), linear scan otherwise.
    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        if self.sorting_enabled {
            let start = self
                .items
                .partition_point(|existing| key_cmp(existing.sort_key(), item.sort_key()) == Ordering::Less);
            self.items[start..]
                .iter()
                .take_while(|existing| key_cmp(existing.sort_key(), item.sort_key()) == Ordering::Equal)
                .position(|existing| existing == item)
                .map(|offset| start + offset)
        } else {
            self.items.iter().position(|existing| existing == item)
        }
    }

    /// Toggle sorting. Enabling resorts the current content in place
    /// (stable); disabling keeps the current order as-is.
    pub fn set_sorting_enabled(&mut self, enabled: bool) {
        if enabled && !self.sorting_enabled {
            self.items
                .sort_by(|a, b| key_cmp(a.sort_key(), b.sort_key()));
        }
        self.sorting_enabled = enabled;
    }

    #[inline]
    pub fn is_sorting_enabled(&self) -> bool {
        self.sorting_enabled
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Named(&'static str);

    impl SortKey for Named {
        fn sort_key(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn sorted_insert_orders_by_name() {
        let mut list = SortedList::new(true);
        list.add(Named("Zebra"));
        list.add(Named("Apple"));
        list.add(Named("Mango"));
        let names: Vec<_> = list.iter().map(|n| n.0).collect();
        assert_eq!(names, vec!["Apple", "Mango", "Zebra"]);
    }

    #[test]
    fn sorting_is_case_insensitive() {
        let mut list = SortedList::new(true);
        list.add(Named("banana"));
        list.add(Named("Apple"));
        list.add(Named("CHERRY"));
        let names: Vec<_> = list.iter().map(|n| n.0).collect();
        assert_eq!(names, vec!["Apple", "banana", "CHERRY"]);
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        #[derive(Debug, PartialEq)]
        struct Pair(&'static str, u32);
        impl SortKey for Pair {
            fn sort_key(&self) -> &str {
                self.0
            }
        }
        let mut list = SortedList::new(true);
        list.add(Pair("same", 1));
        list.add(Pair("same", 2));
        list.add(Pair("same", 3));
        let order: Vec<_> = list.iter().map(|p| p.1).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn unsorted_appends_and_returns_index() {
        let mut list = SortedList::new(false);
        assert_eq!(list.add(Named("Zebra")), 0);
        assert_eq!(list.add(Named("Apple")), 1);
        let names: Vec<_> = list.iter().map(|n| n.0).collect();
        assert_eq!(names, vec!["Zebra", "Apple"]);
    }

    #[test]
    fn enabling_sort_resorts_existing_content() {
        let mut list = SortedList::new(false);
        list.add(Named("c"));
        list.add(Named("a"));
        list.add(Named("b"));
        list.set_sorting_enabled(true);
        let names: Vec<_> = list.iter().map(|n| n.0).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        // Subsequent inserts respect the order.
        assert_eq!(list.add(Named("ab")), 1);
    }

    #[test]
    fn remove_is_a_silent_noop_when_absent() {
        let mut list = SortedList::new(true);
        list.add(Named("a"));
        assert!(!list.remove(&Named("missing")));
        assert!(list.remove_at(5).is_none());
        assert_eq!(list.len(), 1);
        assert!(list.remove(&Named("a")));
        assert!(list.is_empty());
    }

    #[test]
    fn index_of_uses_binary_search_when_sorted() {
        let mut list = SortedList::new(true);
        for name in ["d", "b", "e", "a", "c"] {
            list.add(Named(name));
        }
        assert_eq!(list.index_of(&Named("c")), Some(2));
        assert_eq!(list.index_of(&Named("z")), None);
    }
}
