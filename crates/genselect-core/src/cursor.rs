//! Round-robin rotation cursor.
//!
//! An explicit index into the selector's ordered source set. The cursor
//! remembers the set length it was last rebuilt against (its span) and
//! wraps around that span when advancing.

/// Cyclic position over a snapshot of the source set.
///
/// Sources appended after the last rebuild sit beyond the span and are
/// not reached by [`advance`](Self::advance) until the cursor is rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationCursor {
    index: usize,
    span: usize,
}

impl RotationCursor {
    /// Create an empty cursor with no current position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the rotation at the head of a set of `len` sources.
    ///
    /// Returns the new current index, or `None` if the set is empty.
    pub fn rebuild(&mut self, len: usize) -> Option<usize> {
        self.index = 0;
        self.span = len;
        self.current()
    }

    /// Move to the next position, wrapping around the span.
    ///
    /// Returns `None` if the cursor has nothing to rotate over.
    pub fn advance(&mut self) -> Option<usize> {
        if self.span == 0 {
            return None;
        }
        self.index = (self.index + 1) % self.span;
        Some(self.index)
    }

    /// Current index, if the cursor spans any sources.
    pub fn current(&self) -> Option<usize> {
        (self.span > 0).then_some(self.index)
    }

    /// Number of sources the rotation covers.
    pub fn span(&self) -> usize {
        self.span
    }

    /// Drop the current position entirely.
    pub fn clear(&mut self) {
        self.index = 0;
        self.span = 0;
    }
}
