use anyhow::{bail, Result};
use std::env;
use tracing::info;

use crate::Config;

pub async fn run() -> Result<()> {
    let root = env::current_dir()?;

    if Config::is_initialized(&root) {
        bail!(
            "rubyseek is already initialized in {:?}",
            Config::rubyseek_dir(&root)
        );
    }

    let config = Config::default();
    config.save(&root)?;

    info!("Initialized rubyseek in {:?}", Config::rubyseek_dir(&root));
    println!(
        "✓ Created {} with default configuration",
        Config::rubyseek_dir(&root).display()
    );
    println!("\nNext steps:");
    println!("  1. Edit .rubyseek/config.toml to customize settings");
    println!("  2. Run 'rubyseek index' to index your project");
    println!("  3. Run 'rubyseek search <name>' to find symbols");

    Ok(())
}
