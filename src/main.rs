mod cli;

use chaptercast::{config, manifest, server};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on the
    // verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "chaptercast=debug,tower_http=debug".to_string()
        } else {
            "chaptercast=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            config::apply_env_overrides(&mut config);
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(server::start(config))
        }
        Commands::Chapters { json } => print_chapters(cli.config.as_deref(), json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("chaptercast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn print_chapters(config_path: Option<&Path>, json: bool) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    config::apply_env_overrides(&mut config);

    let chapters = manifest::resolve(&config.library)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chapters)?);
    } else {
        println!("{} by {}", config.library.title, config.library.author);
        println!("{} chapter(s) in {}", chapters.len(), config.library.audio_dir.display());
        for (i, chapter) in chapters.iter().enumerate() {
            println!("  {:>3}. {}  [{}]", i + 1, chapter.title, chapter.file);
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Audio dir: {}", config.library.audio_dir.display());
            println!(
                "  Title: {} by {}",
                config.library.title, config.library.author
            );
            for warning in config.validate() {
                println!("  warning: {warning}");
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Audio dir: {}", config.library.audio_dir.display());
        }
    }

    Ok(())
}
