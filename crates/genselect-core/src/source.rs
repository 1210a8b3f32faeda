//! Source handles.
//!
//! A [`Source`] wraps a boxed iterator behind a shared handle. Identity is
//! a process-unique [`SourceId`] minted at construction, so two handles
//! compare equal only when they are clones of each other.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a registered source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    fn mint() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src-{}", self.0)
    }
}

/// A lazy, pull-based sequence registered with a selector.
///
/// Cloning a `Source` yields another handle to the same underlying
/// iterator: pulling through either advances both.
pub struct Source<T> {
    id: SourceId,
    name: Option<Rc<str>>,
    inner: Rc<RefCell<Box<dyn Iterator<Item = T>>>>,
}

impl<T> Source<T> {
    /// Wrap an iterator in a fresh source handle.
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = T> + 'static,
    {
        Self {
            id: SourceId::mint(),
            name: None,
            inner: Rc::new(RefCell::new(Box::new(iter))),
        }
    }

    /// Wrap an iterator and attach a human-readable name.
    pub fn named<I>(name: &str, iter: I) -> Self
    where
        I: Iterator<Item = T> + 'static,
    {
        Self {
            name: Some(Rc::from(name)),
            ..Self::new(iter)
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Pull the next value, or `None` once the underlying iterator is done.
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from inside the same source's
    /// iterator.
    pub fn pull(&self) -> Option<T> {
        self.inner.borrow_mut().next()
    }
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Source<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Source<T> {}

impl<T> Hash for Source<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Source");
        s.field("id", &self.id);
        if let Some(name) = &self.name {
            s.field("name", name);
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_sources_have_distinct_ids() {
        let a = Source::new(0..3);
        let b = Source::new(0..3);
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn clones_share_identity_and_state() {
        let a = Source::new(0..3);
        let b = a.clone();
        assert_eq!(a, b);

        assert_eq!(a.pull(), Some(0));
        assert_eq!(b.pull(), Some(1));
        assert_eq!(a.pull(), Some(2));
        assert_eq!(b.pull(), None);
    }

    #[test]
    fn named_source_keeps_name() {
        let s = Source::named("evens", (0..10).step_by(2));
        assert_eq!(s.name(), Some("evens"));
        assert!(format!("{s:?}").contains("evens"));
        assert_eq!(Source::new(0..1).name(), None);
    }

    #[test]
    fn id_display() {
        let s = Source::new(std::iter::empty::<u8>());
        assert_eq!(s.id().to_string(), format!("src-{}", s.id().get()));
    }
}
