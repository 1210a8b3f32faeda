//! select.toml plan parser.
//!
//! A plan describes a complete run over integer sources: the stop and
//! pause conditions plus an ordered list of labeled sources.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::labeled::LabeledSelector;
use crate::selector::Selector;
use crate::source::Source;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectPlan {
    pub stop: ConditionSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause: Option<ConditionSpec>,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// A condition over `i64` values, as written in a plan file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ConditionSpec {
    Never,
    Gt { value: i64 },
    Ge { value: i64 },
    Lt { value: i64 },
    Le { value: i64 },
    Eq { value: i64 },
    Even,
    Odd,
    MultipleOf { divisor: i64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<i64>>,
}

/// Half-open integer range `start..end`, advancing by `step`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeConfig {
    pub start: i64,
    pub end: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<i64>,
}

impl Condition<i64> for ConditionSpec {
    fn check(&self, value: &i64) -> anyhow::Result<bool> {
        let v = *value;
        Ok(match *self {
            ConditionSpec::Never => false,
            ConditionSpec::Gt { value } => v > value,
            ConditionSpec::Ge { value } => v >= value,
            ConditionSpec::Lt { value } => v < value,
            ConditionSpec::Le { value } => v <= value,
            ConditionSpec::Eq { value } => v == value,
            ConditionSpec::Even => v % 2 == 0,
            ConditionSpec::Odd => v % 2 != 0,
            ConditionSpec::MultipleOf { divisor } => {
                let rem = v
                    .checked_rem(divisor)
                    .ok_or_else(|| anyhow!("cannot test {v} against divisor {divisor}"))?;
                rem == 0
            }
        })
    }
}

impl RangeConfig {
    fn step(&self) -> i64 {
        self.step.unwrap_or(1)
    }
}

impl SourceConfig {
    /// Materialize this entry as a source named after its label.
    pub fn to_source(&self) -> anyhow::Result<Source<i64>> {
        match (&self.range, &self.values) {
            (Some(range), None) => {
                let step = usize::try_from(range.step())
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| {
                        anyhow!("source {:?}: step must be positive, got {}", self.label, range.step())
                    })?;
                Ok(Source::named(&self.label, (range.start..range.end).step_by(step)))
            }
            (None, Some(values)) => Ok(Source::named(&self.label, values.clone().into_iter())),
            (Some(_), Some(_)) => bail!("source {:?}: set either range or values, not both", self.label),
            (None, None) => bail!("source {:?}: missing range or values", self.label),
        }
    }
}

impl SelectPlan {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading plan {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing plan {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let plan: SelectPlan = toml::from_str(content)?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a plan with two overlapping ranges, stopping above 10 and
    /// pausing on even values.
    pub fn scaffold() -> Self {
        SelectPlan {
            stop: ConditionSpec::Gt { value: 10 },
            pause: Some(ConditionSpec::Even),
            sources: vec![
                SourceConfig {
                    label: "gen1".to_string(),
                    range: Some(RangeConfig { start: 0, end: 100, step: None }),
                    values: None,
                },
                SourceConfig {
                    label: "gen2".to_string(),
                    range: Some(RangeConfig { start: 5, end: 20, step: None }),
                    values: None,
                },
            ],
        }
    }

    /// Check labels, source shapes and condition parameters.
    pub fn validate(&self) -> anyhow::Result<()> {
        for spec in std::iter::once(&self.stop).chain(self.pause.iter()) {
            if let ConditionSpec::MultipleOf { divisor: 0 } = spec {
                bail!("multiple_of divisor must be non-zero");
            }
        }

        let mut labels = HashSet::new();
        for source in &self.sources {
            if source.label.trim().is_empty() {
                bail!("source label must not be empty");
            }
            if !labels.insert(source.label.as_str()) {
                bail!("duplicate source label {:?}", source.label);
            }
            source.to_source()?;
        }
        Ok(())
    }

    /// Build a labeled selector over the plan's sources, in file order.
    pub fn build_labeled(&self) -> anyhow::Result<LabeledSelector<String, i64>> {
        let mut selector = LabeledSelector::new(self.stop);
        if let Some(pause) = self.pause {
            selector = selector.pause_on(pause);
        }
        for source in &self.sources {
            selector.add_source(source.to_source()?, source.label.clone())?;
        }
        Ok(selector)
    }

    /// Build an unlabeled selector over the plan's sources, in file order.
    pub fn build_plain(&self) -> anyhow::Result<Selector<i64>> {
        let pause: Option<Box<dyn Condition<i64>>> = self
            .pause
            .map(|p| Box::new(p) as Box<dyn Condition<i64>>);
        let sources = self
            .sources
            .iter()
            .map(SourceConfig::to_source)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Selector::<i64>::from_parts(Box::new(self.stop), pause, sources)?)
    }
}
