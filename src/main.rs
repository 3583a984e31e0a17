use anyhow::Context;
use gpsynth::config::ConfigManager;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let output_path = args.next().map(PathBuf::from);

    let manager = ConfigManager::new();
    if let Some(path) = &config_path {
        manager
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    }
    let config = manager.get();

    let result = gpsynth::runner::run(&config)?;

    println!(
        "Termination: {} after {} generations, fitness {}",
        result.termination, result.generations, result.fitness
    );
    if let Some(function) = result.best_program.function(&config.program.function_to_evolve) {
        println!("{}", function);
    }

    if let Some(path) = output_path {
        let json = serde_json::to_string_pretty(&result.best_program)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Best program written to {}", path.display());
    }

    Ok(())
}
