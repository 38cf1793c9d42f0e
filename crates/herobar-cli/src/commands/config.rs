use std::path::Path;

use anyhow::{bail, Result};

use herobar_core::HeaderConfig;

pub fn path(override_path: Option<&Path>) -> Result<()> {
    match override_path {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", HeaderConfig::config_path().display()),
    }
    Ok(())
}

pub fn show(config: &HeaderConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write the default configuration to `override_path`, or the default
/// location when none is given. The existing file is never parsed.
pub fn init(override_path: Option<&Path>, force: bool) -> Result<()> {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => HeaderConfig::config_path(),
    };
    if path.exists() && !force {
        bail!(
            "{} already exists.\nUse --force to overwrite it with the defaults.",
            path.display()
        );
    }

    HeaderConfig::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
