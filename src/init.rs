use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::Config;

/// Default config.toml content
pub const DEFAULT_CONFIG: &str = r#"# Directory for result CSV files (relative to the working directory).
output_dir = "output"

# Fixed RNG seed for reproducible left/right placement and ordering.
# Random per run when unset. `--seed` overrides this value.
# seed = 42

[output]
absolute = "graded_descriptions.csv"
blind = "blind_comparison.csv"
three_way = "pairwise_comparison.csv"

[keybindings]
# absolute grading
worse = '1'
same = '2'
better = '3'
# blind / three-way
option_1 = '1'
option_2 = '2'
# regenerate the worklist for the current dataset
reset = 'R'
# load another dataset
upload = 'u'
help = '?'
quit = 'q'
"#;

/// Run the init command
pub fn run_init(force: bool) -> Result<()> {
    let config_path = Config::config_path();
    init_config_at(&config_path, force)?;

    println!();
    println!("Initialization complete!");
    println!("Edit {} to customize keybindings and output paths.", config_path.display());
    Ok(())
}

/// Write the default config to `path`, creating its directory.
pub fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            println!("Creating configuration directory: {}", dir.display());
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }
    }
    write_file_if_needed(path, DEFAULT_CONFIG, force, "config.toml")
}

/// Write a file if it doesn't exist or force is true
fn write_file_if_needed(path: &Path, content: &str, force: bool, name: &str) -> Result<()> {
    if path.exists() && !force {
        println!(
            "Skipping {} (already exists, use --force to overwrite)",
            name
        );
        return Ok(());
    }

    println!("Writing {}...", name);
    fs::write(path, content).with_context(|| format!("Failed to write {}", name))?;
    Ok(())
}
