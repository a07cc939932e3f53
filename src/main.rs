use anyhow::anyhow;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

use classmap::Settings;
use classmap::cli::commands::regenerate::RegenerateOptions;
use classmap::cli::commands::resolve::NamespaceSources;
use classmap::cli::commands::{init, regenerate, resolve};
use classmap::cli::{Cli, Commands};

fn load_settings(config: Option<&Path>) -> anyhow::Result<Settings> {
    let settings = match config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = settings.map_err(|e| anyhow!("Error loading configuration: {e}"))?;
    classmap::logging::init_with_config(&settings.logging);
    Ok(settings)
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => {
            classmap::logging::init();
            init::run_init(&std::env::current_dir()?, force)?;
        }
        Commands::Config => init::run_config(&load_settings(config)?)?,
        Commands::Regenerate {
            paths,
            output,
            blacklist,
            namespace,
            sequential,
        } => {
            let options = RegenerateOptions {
                paths,
                output,
                blacklist,
                namespace,
                sequential,
            };
            let settings = load_settings(config)?;
            let (cache, generated) = regenerate::run_regenerate(&settings, &options)?;
            println!(
                "Generated {} with {} symbol(s)",
                cache.path().display(),
                generated.map.len()
            );
            if !generated.ambiguities.is_empty() {
                println!("{} ambiguous symbol(s), see warnings", generated.ambiguities.len());
            }
        }
        Commands::Resolve {
            name,
            composer,
            namespaces,
            json,
        } => {
            let sources = NamespaceSources {
                composer,
                namespaces,
            };
            let settings = load_settings(config)?;
            if !resolve::run_resolve(&settings, &sources, &name, json)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Namespaces { composer } => {
            let sources = NamespaceSources {
                composer,
                namespaces: None,
            };
            resolve::run_namespaces(&load_settings(config)?, &sources)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
