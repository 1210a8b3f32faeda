//! `genselect run` — drive a plan and print what it emits.
//!
//! Values go to stdout, one per line. Diagnostics go to stderr through
//! `tracing`, so the output stays pipeable.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, bail};
use genselect_core::{Labeled, SelectPlan};
use tracing::info;

pub fn run(plan: Option<&Path>, format: &str, plain: bool, limit: Option<usize>) -> anyhow::Result<()> {
    let format = OutputFormat::parse(format)?;
    let plan = match plan {
        Some(path) => SelectPlan::from_file(path)?,
        None => SelectPlan::scaffold(),
    };
    let limit = limit.unwrap_or(usize::MAX);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut emitted = 0usize;

    if plain {
        let mut selector = plan.build_plain()?;
        for item in selector.begin().take(limit) {
            let value = item.context("selection failed")?;
            writeln!(out, "{}", render_plain(value, format)?)?;
            emitted += 1;
        }
    } else {
        let mut selector = plan.build_labeled()?;
        for item in selector.begin().take(limit) {
            let item = item.context("selection failed")?;
            writeln!(out, "{}", render_labeled(&item, format)?)?;
            emitted += 1;
        }
    }
    out.flush()?;

    info!(emitted, sources = plan.sources.len(), "selection finished");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(format: &str) -> anyhow::Result<Self> {
        match format {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown output format {other:?} (expected text or json)"),
        }
    }
}

fn render_plain(value: i64, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(value.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string(&value)?),
    }
}

fn render_labeled(item: &Labeled<String, i64>, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(format!("{}\t{}", item.label, item.value)),
        OutputFormat::Json => Ok(serde_json::to_string(item)?),
    }
}
