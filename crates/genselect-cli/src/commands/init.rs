//! `genselect init` — write a scaffold plan.

use std::path::Path;

use anyhow::{Context, bail};
use genselect_core::SelectPlan;
use tracing::info;

pub const PLAN_FILE: &str = "select.toml";

pub fn init(path: &Path) -> anyhow::Result<()> {
    let output = path.join(PLAN_FILE);
    if output.exists() {
        bail!("{} already exists", output.display());
    }

    let content = SelectPlan::scaffold().to_toml_string()?;
    std::fs::write(&output, content)
        .with_context(|| format!("writing {}", output.display()))?;

    info!(path = %output.display(), "plan scaffolded");
    println!("✓ Generated {}", output.display());
    Ok(())
}
