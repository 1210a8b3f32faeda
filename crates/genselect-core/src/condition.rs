//! Stop and pause conditions.
//!
//! A condition is a pure predicate over a produced value. Plain closures
//! `Fn(&T) -> bool` are conditions out of the box; wrap a closure that
//! returns `anyhow::Result<bool>` in [`Fallible`] to let it fail.

use std::fmt;

/// A predicate evaluated against every value a source produces.
pub trait Condition<T> {
    fn check(&self, value: &T) -> anyhow::Result<bool>;
}

impl<T, F> Condition<T> for F
where
    F: Fn(&T) -> bool,
{
    fn check(&self, value: &T) -> anyhow::Result<bool> {
        Ok(self(value))
    }
}

/// Adapter for predicates that can fail.
///
/// The error is surfaced to the consumer as
/// [`SelectError::Predicate`](crate::SelectError::Predicate).
pub struct Fallible<F>(pub F);

impl<T, F> Condition<T> for Fallible<F>
where
    F: Fn(&T) -> anyhow::Result<bool>,
{
    fn check(&self, value: &T) -> anyhow::Result<bool> {
        (self.0)(value)
    }
}

/// A condition that never fires.
///
/// Used as the default pause condition: each source is then drained in
/// turn, like chaining the sources together.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl<T> Condition<T> for Never {
    fn check(&self, _value: &T) -> anyhow::Result<bool> {
        Ok(false)
    }
}

/// Which of the two selector conditions is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Stop,
    Pause,
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionKind::Stop => f.write_str("stop"),
            ConditionKind::Pause => f.write_str("pause"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_conditions() {
        let gt10 = |v: &i32| *v > 10;
        assert!(!gt10.check(&10).unwrap());
        assert!(gt10.check(&11).unwrap());
    }

    #[test]
    fn never_is_always_false() {
        assert!(!Condition::<bool>::check(&Never, &true).unwrap());
        assert!(!Condition::<i32>::check(&Never, &0).unwrap());
    }

    #[test]
    fn fallible_propagates_errors() {
        let cond = Fallible(|v: &i32| {
            if *v < 0 {
                anyhow::bail!("negative value {v}");
            }
            Ok(*v == 0)
        });
        assert!(cond.check(&0).unwrap());
        assert!(!cond.check(&3).unwrap());
        let err = cond.check(&-1).unwrap_err();
        assert_eq!(err.to_string(), "negative value -1");
    }
}
