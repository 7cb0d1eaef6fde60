use anyhow::{Context, Result};
use crate::report::HashReport;
use std::{fs, path::Path};

pub fn export_json(report: &HashReport, out: &Path) -> Result<()> {
    let s = serde_json::to_string_pretty(report)?;
    fs::write(out, s).with_context(|| format!("Writing {}", out.display()))?;
    Ok(())
}
