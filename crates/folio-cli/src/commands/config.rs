use anyhow::Result;

use folio_core::AppConfig;

pub fn run(config: &AppConfig, save: bool) -> Result<()> {
    print!("{}", config.to_toml()?);

    if save {
        config.save()?;
        println!("\nSaved to {}", AppConfig::config_path().display());
    }

    Ok(())
}
