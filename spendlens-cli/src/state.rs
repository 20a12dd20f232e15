use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

pub fn spendlens_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".spendlens"))
}

pub fn ensure_spendlens_home() -> Result<PathBuf> {
    let dir = spendlens_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Raw bytes of a statement file plus the name it is uploaded under.
pub fn read_statement(path: &Path) -> Result<(String, Vec<u8>)> {
    if !path.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", path.display());
    }
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok((upload_name(path), bytes))
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement.csv".to_string())
}
