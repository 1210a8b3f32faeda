//! genselect-core — `select()` over lazy sources.
//!
//! Multiplexes several independent iterators ("sources") into one output
//! sequence, round-robin style. Per-value conditions decide whether the
//! current source is stopped (removed from rotation), paused (skipped in
//! favour of the next source) or allowed to keep producing.
//!
//! # Architecture
//!
//! ```text
//! LabeledSelector<L, T>
//!   ├── Vec<L> (position-aligned with the engine's sources)
//!   └── Selector<T>
//!       ├── Vec<Source<T>> (ordered, unique by SourceId)
//!       ├── RotationCursor (index + span, rebuilt on removal)
//!       └── stop / pause conditions
//! ```
//!
//! Everything is single-threaded and pull-based: a value is produced only
//! when the consumer asks for the next item.

pub mod condition;
pub mod config;
pub mod cursor;
pub mod error;
pub mod labeled;
pub mod selector;
pub mod source;

pub use condition::{Condition, ConditionKind, Fallible, Never};
pub use config::SelectPlan;
pub use cursor::RotationCursor;
pub use error::{SelectError, SelectResult};
pub use labeled::{Labeled, LabeledSelection, LabeledSelector};
pub use selector::{RunState, Selection, Selector};
pub use source::{Source, SourceId};
