use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tubescribe::cli::{Cli, Commands, ModelsCommand};
use tubescribe::config::Config;
use tubescribe::pipeline::Pipeline;
use tubescribe::{models, utils};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tubescribe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load().await?;

    match cli.command {
        Commands::Transcribe {
            url,
            output,
            format,
            language,
            model,
        } => {
            // Check for required external tools up front (non-fatal)
            let missing_deps = utils::check_dependencies().await;
            if !missing_deps.is_empty() {
                eprintln!("⚠️  Dependency check warnings:");
                for dep in missing_deps {
                    eprintln!("   • {}", dep);
                }
                eprintln!("   (Continuing anyway - tools may be available)");
            }

            let mut config = config;
            if let Some(model) = model {
                config.model.name = model;
            }
            if let Some(language) = language {
                config.model.language = Some(language);
            }
            config.validate()?;

            let format = match format {
                Some(format) => format,
                None => config.app.default_output_format.parse()?,
            };

            let pipeline = Pipeline::new(&config)?;

            tracing::info!("Starting transcription for URL: {}", url);

            let state = pipeline.run(&url).await?;

            match output {
                Some(path) => {
                    tubescribe::output::save_to_file(&state, &path, &format).await?;
                    println!("Transcription saved to: {}", path.display());
                }
                None => {
                    tubescribe::output::print_to_console(&state, &format)?;
                }
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                config.save().await?;
                println!("Configuration written; edit it to change models or directories.");
            }
        }
        Commands::Models { command } => match command {
            ModelsCommand::List => {
                let model_dir = config.model_dir();
                println!("Available models:");
                for model in models::list_models() {
                    let status = if models::is_model_installed(model.name, &model_dir) {
                        "[installed]"
                    } else {
                        "[not installed]"
                    };
                    println!("  {:16} {:5} MB   {}", model.name, model.size_mb, status);
                }

                // Local files outside the catalog still work with --model.
                let extras: Vec<String> = models::list_installed_models(&model_dir)
                    .into_iter()
                    .filter(|name| models::get_model(name).is_none())
                    .collect();
                if !extras.is_empty() {
                    println!("Other installed models:");
                    for name in extras {
                        println!("  {:16} [installed]", name);
                    }
                }
            }
            ModelsCommand::Install { name } => {
                let path = models::ensure_model(&name, &config.model_dir(), true).await?;
                println!("Model installed to: {}", path.display());
            }
        },
    }

    Ok(())
}
