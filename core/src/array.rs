//! Ordered element sequence with an optional per-element destructor.
//!
//! `DynamicArray` owns its elements. When a destructor is installed, every
//! element that leaves the array through `remove_index`, `remove`, `clear`
//! or by the array being dropped is handed to it; otherwise such elements are
//! simply dropped. `take_index` and `into_vec` give elements back to the
//! caller without running the destructor.

use std::cmp::Ordering;
use std::fmt;

/// Callback receiving ownership of an element leaving the array.
pub type FreeFunc<T> = Box<dyn FnMut(T)>;

pub struct DynamicArray<T> {
    items: Vec<T>,
    free_func: Option<FreeFunc<T>>,
}

impl<T> DynamicArray<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            free_func: None,
        }
    }

    /// Create an array that passes removed elements to `free_func`.
    pub fn with_free_func<F>(free_func: F) -> Self
    where
        F: FnMut(T) + 'static,
    {
        Self {
            items: Vec::new(),
            free_func: Some(Box::new(free_func)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an element.
    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    /// Element at `index`.
    pub fn index(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn index_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Remove the element at `index`, shifting the tail down, and run the
    /// destructor on it. Returns false if `index` is out of range.
    pub fn remove_index(&mut self, index: usize) -> bool {
        match self.take_index(index) {
            Some(item) => {
                self.dispose(item);
                true
            }
            None => false,
        }
    }

    /// Remove the element at `index` and return it without running the
    /// destructor.
    pub fn take_index(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Remove the first element equal to `needle` under `equal`.
    pub fn remove<F>(&mut self, needle: &T, equal: F) -> bool
    where
        F: Fn(&T, &T) -> bool,
    {
        match self.find(needle, equal) {
            Some(index) => self.remove_index(index),
            None => false,
        }
    }

    /// Index of the first element equal to `needle` under `equal`.
    pub fn find<F>(&self, needle: &T, equal: F) -> Option<usize>
    where
        F: Fn(&T, &T) -> bool,
    {
        self.items.iter().position(|item| equal(item, needle))
    }

    /// Sort in place with a three-way comparator.
    pub fn sort<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(compare);
    }

    /// Remove every element, running the destructor on each.
    pub fn clear(&mut self) {
        let items = std::mem::take(&mut self.items);
        for item in items {
            self.dispose(item);
        }
    }

    /// Release the array and return the remaining elements without running
    /// the destructor.
    pub fn into_vec(mut self) -> Vec<T> {
        std::mem::take(&mut self.items)
    }

    fn dispose(&mut self, item: T) {
        match self.free_func.as_mut() {
            Some(free) => free(item),
            None => drop(item),
        }
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        if self.free_func.is_some() {
            self.clear();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicArray")
            .field("items", &self.items)
            .field("free_func", &self.free_func.is_some())
            .finish()
    }
}

impl<T> From<Vec<T>> for DynamicArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            free_func: None,
        }
    }
}
