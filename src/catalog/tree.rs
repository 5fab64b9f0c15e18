//! Binary search tree keyed by book id
//!
//! - Exclusively owned boxed nodes (no parent pointers, no cycles)
//! - Iterative insert and lookup
//! - In-order iteration driven by an explicit stack
//! - Iterative teardown, so a tree built from sorted input (a linked list of
//!   depth N) cannot overflow the call stack on drop

use super::book::Book;
use crate::error::{CatalogError, Result};
use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::ops::Range;

/// Tree node: one record and its two subtrees
#[derive(Debug)]
struct Node {
    book: Book,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn leaf(book: Book) -> Box<Self> {
        Box::new(Node {
            book,
            left: None,
            right: None,
        })
    }
}

/// Binary search tree of books ordered by id
///
/// Every id in a node's left subtree is strictly smaller than the node's id and
/// every id in its right subtree strictly larger. Ids are unique.
#[derive(Debug, Default)]
pub struct BookTree {
    root: Option<Box<Node>>,
    len: usize,
}

impl BookTree {
    pub fn new() -> Self {
        BookTree { root: None, len: 0 }
    }

    /// Insert a book as a new leaf
    ///
    /// Fails with `DuplicateKey` if the id is already present; the stored
    /// record is left untouched.
    pub fn insert(&mut self, book: Book) -> Result<()> {
        let id = book.id;
        let mut slot = &mut self.root;

        while let Some(node) = slot {
            slot = match id.cmp(&node.book.id) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return Err(CatalogError::DuplicateKey(id)),
            };
        }

        *slot = Some(Node::leaf(book));
        self.len += 1;
        Ok(())
    }

    /// Look up a book by id
    pub fn get(&self, id: u32) -> Option<&Book> {
        let mut cursor = self.root.as_deref();

        while let Some(node) = cursor {
            cursor = match id.cmp(&node.book.id) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.book),
            };
        }

        None
    }

    /// Membership test, O(depth)
    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// In-order iterator (ascending id)
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Count stored ids falling inside `range`
    pub fn count_in_range(&self, range: Range<u32>) -> usize {
        self.iter()
            .skip_while(|book| book.id < range.start)
            .take_while(|book| book.id < range.end)
            .count()
    }

    /// Get tree height (for testing/debugging)
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 1));
        }

        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            if let Some(left) = node.left.as_deref() {
                stack.push((left, depth + 1));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, depth + 1));
            }
        }

        height
    }

    /// Release every node, returning how many were freed
    ///
    /// Terminal: the tree is consumed.
    pub fn destroy(mut self) -> usize {
        self.release()
    }

    /// Children are detached before their parent is freed
    fn release(&mut self) -> usize {
        let mut released = 0;
        let mut stack: Vec<Box<Node>> = Vec::new();
        stack.extend(self.root.take());

        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
            released += 1;
        }

        self.len = 0;
        released
    }
}

impl Drop for BookTree {
    fn drop(&mut self) {
        self.release();
    }
}

impl<'a> IntoIterator for &'a BookTree {
    type Item = &'a Book;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a [`BookTree`]
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a Node>, len: usize) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut cursor: Option<&'a Node>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            cursor = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Book;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.book)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::book::BookDraft;

    fn book(id: u32) -> Book {
        Book::from_draft(
            id,
            BookDraft::new(
                format!("Title {}", id),
                "Author",
                "Genre",
                "Publisher",
                2000,
                100 + id,
            ),
        )
    }

    #[test]
    fn test_empty_tree() {
        let tree = BookTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.iter().count(), 0);
        assert!(!tree.contains(1));
    }

    #[test]
    fn test_insert_many() {
        let mut tree = BookTree::new();

        for i in [50, 25, 75, 10, 30, 60, 90, 5, 99, 1] {
            tree.insert(book(i)).unwrap();
        }

        assert_eq!(tree.len(), 10);
        for i in [50, 25, 75, 10, 30, 60, 90, 5, 99, 1] {
            let found = tree.get(i).unwrap();
            assert_eq!(found.id, i);
            assert_eq!(found.pages, 100 + i);
        }
        assert!(!tree.contains(2));
        assert!(!tree.contains(100));
    }

    #[test]
    fn test_duplicate_rejected_first_write_wins() {
        let mut tree = BookTree::new();
        tree.insert(book(7)).unwrap();

        let mut impostor = book(7);
        impostor.title = "Impostor".to_string();

        match tree.insert(impostor) {
            Err(CatalogError::DuplicateKey(id)) => assert_eq!(id, 7),
            other => panic!("expected DuplicateKey, got {:?}", other),
        }

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(7).unwrap().title, "Title 7");
    }

    #[test]
    fn test_iter_sorted_order() {
        let mut tree = BookTree::new();

        // Insert in random order
        for i in [5, 2, 8, 1, 9, 3, 7, 4, 6, 0] {
            tree.insert(book(i)).unwrap();
        }

        let ids: Vec<u32> = tree.iter().map(|b| b.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
        assert_eq!(tree.iter().len(), 10);
    }

    #[test]
    fn test_height_balanced_and_degenerate() {
        let mut balanced = BookTree::new();
        for i in [4, 2, 6, 1, 3, 5, 7] {
            balanced.insert(book(i)).unwrap();
        }
        assert_eq!(balanced.height(), 3);

        let mut chain = BookTree::new();
        for i in 0..32 {
            chain.insert(book(i)).unwrap();
        }
        assert_eq!(chain.height(), 32);
    }

    #[test]
    fn test_count_in_range() {
        let mut tree = BookTree::new();
        for i in [1, 99, 100, 500, 999, 1000, 4000] {
            tree.insert(book(i)).unwrap();
        }
        assert_eq!(tree.count_in_range(100..1000), 3);
        assert_eq!(tree.count_in_range(0..u32::MAX), 7);
        assert_eq!(tree.count_in_range(2000..3000), 0);
    }

    #[test]
    fn test_destroy_counts_nodes() {
        let mut tree = BookTree::new();
        for i in [3, 1, 2, 5, 4] {
            tree.insert(book(i)).unwrap();
        }
        assert_eq!(tree.destroy(), 5);

        assert_eq!(BookTree::new().destroy(), 0);
    }

    #[test]
    fn test_degenerate_tree_teardown() {
        // Sorted input builds a right-leaning chain
        let mut tree = BookTree::new();
        for i in 0..10_000 {
            tree.insert(book(i)).unwrap();
        }
        assert_eq!(tree.height(), 10_000);
        assert!(tree.contains(9_999));
        assert_eq!(tree.iter().last().map(|b| b.id), Some(9_999));

        drop(tree);
    }
}
