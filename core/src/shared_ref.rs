//! Manually reference-counted payload wrapper.
//!
//! Unlike `Rc`, the count is driven explicitly with [`SharedRef::inc`] and
//! [`SharedRef::dec`]. The payload is handed to its destructor the moment the
//! count drops to zero, after which the wrapper is empty and further calls
//! are no-ops.

use std::fmt;

pub type DestroyFunc<T> = Box<dyn FnOnce(T)>;

pub struct SharedRef<T> {
    data: Option<T>,
    count: usize,
    destroy: Option<DestroyFunc<T>>,
}

impl<T> SharedRef<T> {
    /// Wrap `data` with a count of one.
    pub fn new(data: T) -> Self {
        Self {
            data: Some(data),
            count: 1,
            destroy: None,
        }
    }

    /// Wrap `data` with a count of one and a destructor run on release.
    pub fn with_destroy<F>(data: T, destroy: F) -> Self
    where
        F: FnOnce(T) + 'static,
    {
        Self {
            data: Some(data),
            count: 1,
            destroy: Some(Box::new(destroy)),
        }
    }

    /// An already released wrapper.
    pub fn null() -> Self {
        Self {
            data: None,
            count: 0,
            destroy: None,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_null(&self) -> bool {
        self.data.is_none()
    }

    pub fn get(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    pub fn inc(&mut self) {
        if self.data.is_none() {
            return;
        }
        self.count += 1;
    }

    /// Decrement the count. Returns true if this call released the payload.
    pub fn dec(&mut self) -> bool {
        if self.data.is_none() {
            return false;
        }

        self.count -= 1;
        if self.count > 0 {
            return false;
        }

        if let Some(data) = self.data.take() {
            match self.destroy.take() {
                Some(destroy) => destroy(data),
                None => drop(data),
            }
        }
        true
    }
}

impl<T> Default for SharedRef<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRef")
            .field("data", &self.data)
            .field("count", &self.count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_destroy_runs_once_at_zero() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let mut r = SharedRef::with_destroy(vec![1u8, 2, 3], move |buf| {
            assert_eq!(buf, vec![1, 2, 3]);
            seen.set(seen.get() + 1);
        });

        r.inc();
        assert_eq!(r.count(), 2);
        assert!(!r.dec());
        assert_eq!(calls.get(), 0);
        assert!(r.dec());
        assert_eq!(calls.get(), 1);
        assert!(r.is_null());

        // released wrapper ignores further calls
        r.inc();
        assert!(!r.dec());
        assert_eq!(r.count(), 0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_null_is_noop() {
        let mut r: SharedRef<String> = SharedRef::null();
        r.inc();
        assert!(!r.dec());
        assert!(r.get().is_none());
    }

    #[test]
    fn test_access_payload() {
        let mut r = SharedRef::new(String::from("preedit"));
        r.get_mut().unwrap().push('!');
        assert_eq!(r.get().map(String::as_str), Some("preedit!"));
    }
}
