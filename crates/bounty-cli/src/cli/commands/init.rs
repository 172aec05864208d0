use crate::cli::args::InitArgs;
use crate::exit_codes;
use bounty_core::config::write_sample_config;
use std::path::Path;

pub fn run(config_path: &Path, args: InitArgs) -> anyhow::Result<i32> {
    if config_path.exists() && !args.force {
        eprintln!(
            "Skipped {} (exists, use --force to overwrite)",
            config_path.display()
        );
        return Ok(exit_codes::OK);
    }
    write_sample_config(config_path)?;
    eprintln!("Wrote {}", config_path.display());
    eprintln!("Set OPENAI_API_KEY, or use `oracle.provider: fake` for offline runs.");
    Ok(exit_codes::OK)
}
