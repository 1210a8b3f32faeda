//! Selector — round-robin multiplexing of lazy sources.
//!
//! The `Selector` pulls from one source at a time:
//! - An exhausted source is removed from the set
//! - A value matching the stop condition removes its source
//! - A value matching the pause condition moves the cursor to the next source
//! - Any other value is emitted, and the same source is pulled again next
//!
//! Every removal restarts the rotation at the head of the (shorter) set.
//! Conditions are evaluated stop-first, so stop wins when both match.

use std::collections::HashSet;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;

use tracing::{debug, trace};

use crate::condition::{Condition, ConditionKind, Never};
use crate::cursor::RotationCursor;
use crate::error::{SelectError, SelectResult};
use crate::source::Source;

/// Lifecycle of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Never started, or reset since.
    Unstarted,
    /// A selection is in progress.
    Running,
    /// Every source has been removed; the selection has ended.
    Terminal,
}

/// Outcome of a single scheduling step.
pub(crate) enum Step<T> {
    /// A value passed both conditions. `position` is the producing
    /// source's index in the set.
    Emit { value: T, position: usize },
    /// The source ran dry or hit the stop condition and must be removed.
    ///
    /// Removal is left to the driving layer so wrappers can keep parallel
    /// state aligned with the source set.
    Remove(Source<T>),
    /// The pause condition fired and the cursor moved on.
    Paused,
    /// No sources remain.
    Terminal,
}

/// Multiplexes several sources into one sequence of values.
pub struct Selector<T> {
    /// Ordered, unique by identity. Order defines rotation precedence.
    sources: Vec<Source<T>>,
    cursor: RotationCursor,
    state: RunState,
    stop: Box<dyn Condition<T>>,
    pause: Box<dyn Condition<T>>,
}

impl<T> Selector<T> {
    /// Create an empty selector with the given stop condition.
    ///
    /// The pause condition defaults to [`Never`], so sources are drained
    /// one after another.
    pub fn new<C>(stop: C) -> Self
    where
        C: Condition<T> + 'static,
    {
        Self {
            sources: Vec::new(),
            cursor: RotationCursor::new(),
            state: RunState::Unstarted,
            stop: Box::new(stop),
            pause: Box::new(Never),
        }
    }

    /// Set the pause condition.
    pub fn pause_on<C>(mut self, pause: C) -> Self
    where
        C: Condition<T> + 'static,
    {
        self.pause = Box::new(pause);
        self
    }

    /// Build a selector from its conditions and an initial source set.
    pub fn from_parts(
        stop: Box<dyn Condition<T>>,
        pause: Option<Box<dyn Condition<T>>>,
        sources: Vec<Source<T>>,
    ) -> SelectResult<Self> {
        let mut selector = Self {
            sources: Vec::new(),
            cursor: RotationCursor::new(),
            state: RunState::Unstarted,
            stop,
            pause: pause.unwrap_or_else(|| Box::new(Never)),
        };
        selector.add_sources(sources)?;
        Ok(selector)
    }

    /// Append a source to the set.
    ///
    /// A running selection only picks the new source up once a removal
    /// rebuilds the rotation, or when it is restarted with [`begin`](Self::begin).
    pub fn add_source(&mut self, source: Source<T>) -> SelectResult<()> {
        if self.contains(&source) {
            return Err(SelectError::DuplicateSource(source.id()));
        }
        debug!(source = %source.id(), position = self.sources.len(), "source added");
        self.sources.push(source);
        Ok(())
    }

    /// Append several sources, in order.
    ///
    /// The batch is checked up front: if any handle is already registered
    /// (or appears twice in the batch) nothing is added.
    pub fn add_sources<I>(&mut self, sources: I) -> SelectResult<()>
    where
        I: IntoIterator<Item = Source<T>>,
    {
        let batch: Vec<Source<T>> = sources.into_iter().collect();
        let mut seen = HashSet::with_capacity(batch.len());
        for source in &batch {
            if self.contains(source) || !seen.insert(source.id()) {
                return Err(SelectError::DuplicateSource(source.id()));
            }
        }
        for source in batch {
            self.add_source(source)?;
        }
        Ok(())
    }

    /// Register a fresh source built by `factory` and hand the caller
    /// another, independent one built the same way.
    ///
    /// `factory` runs twice. The returned iterator shares no state with
    /// the registered source, so consuming one never affects the other.
    pub fn select_on<F, I>(&mut self, factory: F) -> I
    where
        F: Fn() -> I,
        I: Iterator<Item = T> + 'static,
    {
        self.push_from_factory(Source::new(factory()));
        factory()
    }

    /// Like [`select_on`](Self::select_on), naming the registered source.
    pub fn select_on_named<F, I>(&mut self, name: &str, factory: F) -> I
    where
        F: Fn() -> I,
        I: Iterator<Item = T> + 'static,
    {
        self.push_from_factory(Source::named(name, factory()));
        factory()
    }

    fn push_from_factory(&mut self, source: Source<T>) {
        debug!(
            source = %source.id(),
            name = source.name(),
            position = self.sources.len(),
            "source added from factory"
        );
        self.sources.push(source);
    }

    /// Start a selection from the head of the source set.
    ///
    /// Any previous rotation position is discarded.
    pub fn begin(&mut self) -> Selection<'_, T> {
        self.start();
        Selection { selector: self }
    }

    /// Continue a selection where it left off.
    ///
    /// Starts a new one if the selector has not been started.
    pub fn resume(&mut self) -> Selection<'_, T> {
        if self.state == RunState::Unstarted {
            self.start();
        }
        Selection { selector: self }
    }

    /// Drop every source and the rotation, returning to the unstarted state.
    pub fn reset(&mut self) {
        self.sources.clear();
        self.cursor.clear();
        self.state = RunState::Unstarted;
        debug!("selector reset");
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Registered sources in rotation order.
    pub fn sources(&self) -> &[Source<T>] {
        &self.sources
    }

    pub fn get(&self, index: usize) -> Option<&Source<T>> {
        self.sources.get(index)
    }

    /// The source the selector is pulling from, if any.
    pub fn current(&self) -> Option<&Source<T>> {
        self.current_index().and_then(|i| self.sources.get(i))
    }

    pub fn contains(&self, source: &Source<T>) -> bool {
        self.position(source).is_some()
    }

    /// Position of `source` in the set, looked up by identity.
    pub fn position(&self, source: &Source<T>) -> Option<usize> {
        self.sources.iter().position(|s| s.id() == source.id())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub(crate) fn start(&mut self) {
        if self.cursor.rebuild(self.sources.len()).is_some() {
            self.state = RunState::Running;
            debug!(sources = self.sources.len(), "selection started");
        } else {
            // Nothing to rotate over: the selection ends before it starts.
            self.state = RunState::Terminal;
            debug!("selection started with no sources");
        }
    }

    pub(crate) fn current_index(&self) -> Option<usize> {
        match self.state {
            RunState::Running => self.cursor.current(),
            RunState::Unstarted | RunState::Terminal => None,
        }
    }

    /// Perform one scheduling decision against the current source.
    ///
    /// A failing condition leaves the set and cursor untouched.
    pub(crate) fn step(&mut self) -> SelectResult<Step<T>> {
        let current = self
            .current_index()
            .and_then(|i| self.sources.get(i).map(|s| (i, s.clone())));
        let Some((position, source)) = current else {
            if self.state == RunState::Running {
                self.state = RunState::Terminal;
                debug!("selection exhausted");
            }
            return Ok(Step::Terminal);
        };

        let Some(value) = source.pull() else {
            debug!(source = %source.id(), "source exhausted");
            return Ok(Step::Remove(source));
        };

        if self.check(ConditionKind::Stop, &value)? {
            debug!(source = %source.id(), "stop condition met");
            return Ok(Step::Remove(source));
        }

        if self.check(ConditionKind::Pause, &value)? {
            let next = self.cursor.advance();
            trace!(source = %source.id(), ?next, "pause condition met, rotating");
            return Ok(Step::Paused);
        }

        trace!(source = %source.id(), "emitting value");
        Ok(Step::Emit { value, position })
    }

    /// Remove a source by identity and restart the rotation at the head.
    ///
    /// Returns the position the source occupied.
    pub(crate) fn remove_source(&mut self, source: &Source<T>) -> Option<usize> {
        let position = self.position(source)?;
        self.sources.remove(position);
        let head = self.cursor.rebuild(self.sources.len());
        debug!(
            source = %source.id(),
            position,
            remaining = self.sources.len(),
            "source removed"
        );
        if head.is_none() && self.state == RunState::Running {
            self.state = RunState::Terminal;
            debug!("selection exhausted");
        }
        Some(position)
    }

    /// Drive steps until a value is emitted or the selection ends.
    pub(crate) fn pull(&mut self) -> SelectResult<Option<T>> {
        loop {
            match self.step()? {
                Step::Emit { value, .. } => return Ok(Some(value)),
                Step::Remove(source) => {
                    self.remove_source(&source);
                }
                Step::Paused => {}
                Step::Terminal => return Ok(None),
            }
        }
    }

    fn check(&self, kind: ConditionKind, value: &T) -> SelectResult<bool> {
        let condition = match kind {
            ConditionKind::Stop => &self.stop,
            ConditionKind::Pause => &self.pause,
        };
        condition
            .check(value)
            .map_err(|source| SelectError::Predicate { kind, source })
    }
}

impl<T> Index<usize> for Selector<T> {
    type Output = Source<T>;

    fn index(&self, index: usize) -> &Source<T> {
        &self.sources[index]
    }
}

impl<T> fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("state", &self.state)
            .field("current", &self.current().map(Source::id))
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

impl<'a, T> IntoIterator for &'a mut Selector<T> {
    type Item = SelectResult<T>;
    type IntoIter = Selection<'a, T>;

    fn into_iter(self) -> Selection<'a, T> {
        self.begin()
    }
}

/// A selection in progress.
///
/// Yields `Ok(value)` for every emitted value and ends with `None` once
/// all sources are gone. A failing condition yields `Err` for that pull
/// only; iteration may continue afterwards.
pub struct Selection<'a, T> {
    selector: &'a mut Selector<T>,
}

impl<T> Selection<'_, T> {
    /// The selector being driven.
    pub fn selector(&self) -> &Selector<T> {
        self.selector
    }
}

impl<T> Iterator for Selection<'_, T> {
    type Item = SelectResult<T>;

    fn next(&mut self) -> Option<SelectResult<T>> {
        self.selector.pull().transpose()
    }
}

impl<T> FusedIterator for Selection<'_, T> {}
