//! Labeled selector — tags each value with the label of its source.
//!
//! Wraps a [`Selector`] and keeps a label set position-aligned with the
//! selector's sources: the label at position `i` names the source at
//! position `i`. Both sets change together on every add and removal.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;
use std::ops::Index;

use serde::Serialize;
use tracing::debug;

use crate::condition::Condition;
use crate::error::{SelectError, SelectResult};
use crate::selector::{RunState, Selector, Step};
use crate::source::{Source, SourceId};

/// A value paired with the label of the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labeled<L, T> {
    pub label: L,
    pub value: T,
}

impl<L, T> Labeled<L, T> {
    pub fn into_pair(self) -> (L, T) {
        (self.label, self.value)
    }
}

/// A [`Selector`] whose output records where each value came from.
pub struct LabeledSelector<L, T> {
    inner: Selector<T>,
    /// Aligned 1:1 with `inner.sources()`.
    labels: Vec<L>,
}

impl<L, T> LabeledSelector<L, T>
where
    L: Clone + Eq + Hash + fmt::Debug,
{
    /// Create an empty labeled selector with the given stop condition.
    pub fn new<C>(stop: C) -> Self
    where
        C: Condition<T> + 'static,
    {
        Self {
            inner: Selector::new(stop),
            labels: Vec::new(),
        }
    }

    /// Set the pause condition.
    pub fn pause_on<C>(mut self, pause: C) -> Self
    where
        C: Condition<T> + 'static,
    {
        self.inner = self.inner.pause_on(pause);
        self
    }

    /// Build a labeled selector from its conditions and `(label, source)`
    /// pairs, registered in the order given.
    pub fn from_parts(
        stop: Box<dyn Condition<T>>,
        pause: Option<Box<dyn Condition<T>>>,
        sources: Vec<(L, Source<T>)>,
    ) -> SelectResult<Self> {
        let mut selector = Self {
            inner: Selector::from_parts(stop, pause, Vec::new())?,
            labels: Vec::new(),
        };
        selector.add_sources(sources)?;
        Ok(selector)
    }

    /// Register a source under `label`.
    pub fn add_source(&mut self, source: Source<T>, label: L) -> SelectResult<()> {
        if self.labels.contains(&label) {
            return Err(SelectError::DuplicateLabel(format!("{label:?}")));
        }
        self.inner.add_source(source)?;
        self.labels.push(label);
        Ok(())
    }

    /// Register `(label, source)` pairs in the order given.
    ///
    /// The batch is checked up front; on any duplicate label or source
    /// nothing is added.
    pub fn add_sources<I>(&mut self, sources: I) -> SelectResult<()>
    where
        I: IntoIterator<Item = (L, Source<T>)>,
    {
        let batch: Vec<(L, Source<T>)> = sources.into_iter().collect();
        let mut seen_labels = HashSet::with_capacity(batch.len());
        let mut seen_sources = HashSet::with_capacity(batch.len());
        for (label, source) in &batch {
            if self.labels.contains(label) || !seen_labels.insert(label) {
                return Err(SelectError::DuplicateLabel(format!("{label:?}")));
            }
            if self.inner.contains(source) || !seen_sources.insert(source.id()) {
                return Err(SelectError::DuplicateSource(source.id()));
            }
        }
        for (label, source) in batch {
            self.add_source(source, label)?;
        }
        Ok(())
    }

    /// Register parallel lists of labels and sources.
    ///
    /// Fails with [`SelectError::LabelMismatch`] unless both lists have
    /// the same length.
    pub fn add_aligned(&mut self, labels: Vec<L>, sources: Vec<Source<T>>) -> SelectResult<()> {
        if labels.len() != sources.len() {
            return Err(SelectError::LabelMismatch {
                labels: labels.len(),
                sources: sources.len(),
            });
        }
        self.add_sources(labels.into_iter().zip(sources))
    }

    /// Register a fresh source built by `factory` under `label`, and hand
    /// the caller another, independent one built the same way.
    ///
    /// `factory` runs twice, and not at all if `label` is taken.
    pub fn select_on<F, I>(&mut self, label: L, factory: F) -> SelectResult<I>
    where
        F: Fn() -> I,
        I: Iterator<Item = T> + 'static,
    {
        if self.labels.contains(&label) {
            return Err(SelectError::DuplicateLabel(format!("{label:?}")));
        }
        self.add_source(Source::new(factory()), label)?;
        Ok(factory())
    }

    /// Like [`select_on`](Self::select_on), also naming the registered source.
    pub fn select_on_named<F, I>(&mut self, label: L, name: &str, factory: F) -> SelectResult<I>
    where
        F: Fn() -> I,
        I: Iterator<Item = T> + 'static,
    {
        if self.labels.contains(&label) {
            return Err(SelectError::DuplicateLabel(format!("{label:?}")));
        }
        self.add_source(Source::named(name, factory()), label)?;
        Ok(factory())
    }

    /// Start a labeled selection from the head of the source set.
    pub fn begin(&mut self) -> LabeledSelection<'_, L, T> {
        self.inner.start();
        LabeledSelection { selector: self }
    }

    /// Continue a labeled selection where it left off.
    pub fn resume(&mut self) -> LabeledSelection<'_, L, T> {
        if self.inner.state() == RunState::Unstarted {
            self.inner.start();
        }
        LabeledSelection { selector: self }
    }

    /// Drop every source, label and the rotation.
    pub fn reset(&mut self) {
        self.inner.reset();
        self.labels.clear();
    }

    pub fn state(&self) -> RunState {
        self.inner.state()
    }

    /// The wrapped selector.
    pub fn inner(&self) -> &Selector<T> {
        &self.inner
    }

    pub fn sources(&self) -> &[Source<T>] {
        self.inner.sources()
    }

    /// Labels, aligned with [`sources`](Self::sources).
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label of the source currently being pulled, with the source.
    pub fn current(&self) -> Option<(&L, &Source<T>)> {
        let index = self.inner.current_index()?;
        Some((self.labels.get(index)?, self.inner.get(index)?))
    }

    pub fn label_of(&self, source: &Source<T>) -> Option<&L> {
        self.inner.position(source).and_then(|i| self.labels.get(i))
    }

    pub fn source_for(&self, label: &L) -> Option<&Source<T>> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|i| self.inner.get(i))
    }

    /// Source identity → label, built from the current aligned sets.
    pub fn labels_by_source(&self) -> HashMap<SourceId, &L> {
        self.sources()
            .iter()
            .map(Source::id)
            .zip(self.labels.iter())
            .collect()
    }

    /// Label → source, built from the current aligned sets.
    pub fn sources_by_label(&self) -> HashMap<&L, &Source<T>> {
        self.labels.iter().zip(self.sources()).collect()
    }

    /// Remove a source and its label together, keyed by identity.
    ///
    /// Returns the removed label.
    pub(crate) fn remove_source(&mut self, source: &Source<T>) -> Option<L> {
        let position = self.inner.remove_source(source)?;
        let label = self.labels.remove(position);
        debug!(source = %source.id(), label = ?label, "label removed");
        debug_assert_eq!(self.labels.len(), self.inner.len());
        Some(label)
    }

    fn pull(&mut self) -> SelectResult<Option<Labeled<L, T>>> {
        loop {
            match self.inner.step()? {
                Step::Emit { value, position } => {
                    let label = self.labels.get(position).cloned().ok_or(
                        SelectError::LabelMismatch {
                            labels: self.labels.len(),
                            sources: self.inner.len(),
                        },
                    )?;
                    return Ok(Some(Labeled { label, value }));
                }
                Step::Remove(source) => {
                    self.remove_source(&source);
                }
                Step::Paused => {}
                Step::Terminal => return Ok(None),
            }
        }
    }
}

impl<L, T> Index<&L> for LabeledSelector<L, T>
where
    L: Clone + Eq + Hash + fmt::Debug,
{
    type Output = Source<T>;

    /// # Panics
    ///
    /// Panics if no source carries `label`.
    fn index(&self, label: &L) -> &Source<T> {
        match self.source_for(label) {
            Some(source) => source,
            None => panic!("no source labeled {label:?}"),
        }
    }
}

impl<L: fmt::Debug, T> fmt::Debug for LabeledSelector<L, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabeledSelector")
            .field("state", &self.inner.state())
            .field("labels", &self.labels)
            .field("inner", &self.inner)
            .finish()
    }
}

/// A labeled selection in progress.
pub struct LabeledSelection<'a, L, T> {
    selector: &'a mut LabeledSelector<L, T>,
}

impl<L, T> LabeledSelection<'_, L, T> {
    pub fn selector(&self) -> &LabeledSelector<L, T> {
        self.selector
    }
}

impl<L, T> Iterator for LabeledSelection<'_, L, T>
where
    L: Clone + Eq + Hash + fmt::Debug,
{
    type Item = SelectResult<Labeled<L, T>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.selector.pull().transpose()
    }
}

impl<L, T> FusedIterator for LabeledSelection<'_, L, T> where L: Clone + Eq + Hash + fmt::Debug {}
