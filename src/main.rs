//! resume-match: score a resume against a job description

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_match::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_match::config::{EmbeddingProviderKind, OutputFormat};
use resume_match::input::InputManager;
use resume_match::output::formatter::{save_report_to_file, suggest_filename};
use resume_match::output::{AnalysisReport, ReportGenerator};
use resume_match::processing::ats_checks::StructureHints;
use resume_match::processing::model_manager::ModelManager;
use resume_match::{Config, MatchEngine, Result, ResumeMatchError};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if cli.no_color || !config.output.color_output {
        colored::control::set_override(false);
    }

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(
    command: Commands,
    mut config: Config,
    config_path: Option<PathBuf>,
) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            output,
            save,
            detailed,
            no_embeddings,
        } => {
            cli::validate_file_extension(&resume, &["pdf", "txt", "md", "markdown"])
                .map_err(|e| ResumeMatchError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, &["pdf", "txt", "md", "markdown"]).map_err(|e| {
                ResumeMatchError::InvalidInput(format!("Job description file: {}", e))
            })?;

            let output_format = match output {
                Some(format) => {
                    cli::parse_output_format(&format).map_err(ResumeMatchError::InvalidInput)?
                }
                None => config.output.format,
            };
            if no_embeddings {
                config.embedding.provider = EmbeddingProviderKind::Hashing;
            }

            let spinner =
                (output_format == OutputFormat::Console && save.is_none()).then(new_spinner);
            let set_message = |msg: &'static str| {
                if let Some(spinner) = &spinner {
                    spinner.set_message(msg);
                }
            };

            set_message("Extracting text...");
            let input_manager = InputManager::new();
            let resume_text = input_manager.extract_text(&resume).await?;
            let job_text = input_manager.extract_text(&job).await?;
            info!(
                "Extracted {} resume chars and {} job description chars",
                resume_text.len(),
                job_text.len()
            );

            set_message("Loading embeddings...");
            let engine = MatchEngine::from_config(&config);

            set_message("Scoring resume...");
            let analysis = engine
                .analyze_with_hints(&resume_text, &job_text, &StructureHints::default())
                .await?;

            if let Some(spinner) = &spinner {
                spinner.finish_and_clear();
            }

            let report = AnalysisReport::new(
                analysis,
                resume.to_string_lossy(),
                job.to_string_lossy(),
                engine.embedder().provider_name(),
            );

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                true,
                true,
            );
            let rendered = generator.generate_report(&report, &output_format)?;

            match save {
                Some(target) => {
                    let path = report_path(&target, &output_format, &resume);
                    save_report_to_file(&rendered, &path)?;
                    println!("✅ Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Models { action } => {
            let mut model_manager = ModelManager::new(config.models_dir().to_path_buf()).await?;

            match action {
                ModelAction::List => {
                    println!("📦 Embedding models ({})\n", config.models_dir().display());
                    for model in model_manager.list_models() {
                        let status = if model_manager.is_downloaded(&model.id) {
                            "✅ Downloaded"
                        } else {
                            "⬇️  Available"
                        };
                        let active = if model.id == config.embedding.model {
                            " (configured)"
                        } else {
                            ""
                        };
                        println!(
                            "  • {}{} - {} MB, {} dims [{}]",
                            model.id, active, model.size_mb, model.dimensions, status
                        );
                        println!("    {}", model.description);
                    }
                    if config.embedding.provider == EmbeddingProviderKind::Hashing {
                        println!(
                            "\n💡 Set embedding.provider = \"model2vec\" in the config to use a downloaded model"
                        );
                    }
                }

                ModelAction::Download { model, force } => {
                    let id = model_manager
                        .resolve_model_id(&model)
                        .ok_or_else(|| ResumeMatchError::ModelNotFound(model.clone()))?;
                    if !force && model_manager.is_downloaded(&id) {
                        println!("✅ Model '{}' is already downloaded!", id);
                        println!("💡 Use --force to re-download");
                        return Ok(());
                    }

                    let spinner = new_spinner();
                    spinner.set_message(format!("Downloading {}...", id));
                    let result = model_manager.download_model(&id, force).await;
                    spinner.finish_and_clear();

                    let model_path = result?;
                    println!("✅ Model '{}' downloaded successfully!", id);
                    println!("📁 Location: {}", model_path.display());
                }

                ModelAction::Info { model } => {
                    let info = model_manager
                        .model_info(&model)
                        .ok_or_else(|| ResumeMatchError::ModelNotFound(model.clone()))?;

                    println!("📋 Model Information for '{}'\n", info.id);
                    println!("Name: {}", info.name);
                    println!("Repository: {}", info.repo_id);
                    println!("Size: {} MB", info.size_mb);
                    println!("Dimensions: {}", info.dimensions);
                    println!("Description: {}", info.description);
                    match model_manager.model_path(&info.id) {
                        Some(path) => println!("Status: ✅ Downloaded ({})", path.display()),
                        None => {
                            println!("Status: ⬇️  Available for download");
                            println!("\n💡 To download this model, run:");
                            println!("   resume-match models download {}", info.id);
                        }
                    }
                }
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);

            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration ({})\n", path.display());
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        ResumeMatchError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset: {}", path.display());
                }

                Some(ConfigAction::Path) => println!("{}", path.display()),
            }
        }
    }

    Ok(())
}

fn new_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// A directory target gets a generated file name
fn report_path(target: &Path, format: &OutputFormat, resume: &Path) -> PathBuf {
    if target.is_dir() {
        target.join(suggest_filename(format, &resume.to_string_lossy(), true))
    } else {
        target.to_path_buf()
    }
}
