//! Prefs - settings resource resolver
//!
//! Usage:
//!   prefs resolve workspace          # Where workspace settings live
//!   prefs classify <uri>             # Which target a default settings URI shows
//!   prefs defaults user --full       # Print the default settings document
//!   prefs init folder --resource ./api
//!   prefs open user --language rust

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use prefs_core::commands::CommandService;
use prefs_core::config::{resource_from_location, to_toml};
use prefs_core::context::AppContext;
use prefs_core::error::PrefsResult;
use prefs_core::preferences::{
    EMPTY_SETTINGS_CONTENT, OpenSettingsOptions, OpenedSettings, PreferencesEditorModel,
    PreferencesService, default_settings_resource, default_settings_target,
};
use prefs_core::types::ConfigurationTarget;

#[derive(Parser)]
#[command(name = "prefs")]
#[command(about = "Settings resource resolver", long_about = None)]
struct Cli {
    /// Path to prefs.toml (defaults to ./prefs.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the editable settings file for a target
    Resolve {
        /// Target (user, remote, workspace, folder)
        target: ConfigurationTarget,
        /// File or folder the folder target is resolved for
        #[arg(long)]
        resource: Option<String>,
    },

    /// Report which target a default settings URI stands for
    Classify {
        uri: String,
    },

    /// Print the default settings document for a target
    Defaults {
        target: ConfigurationTarget,
        /// Print the raw default values as JSON
        #[arg(long)]
        raw: bool,
        /// Include the "Most Commonly Used" section
        #[arg(long)]
        full: bool,
    },

    /// Create the settings file for a target if it does not exist
    Init {
        target: ConfigurationTarget,
        /// File or folder the folder target is resolved for
        #[arg(long)]
        resource: Option<String>,
    },

    /// Create the keybindings file if it does not exist
    Keybindings,

    /// Open the settings of a target
    Open {
        target: ConfigurationTarget,
        /// Folder whose settings should open (folder target)
        #[arg(long)]
        folder: Option<String>,
        /// Search query for the settings editor
        #[arg(long, short)]
        query: Option<String>,
        /// Language whose settings should open (user target)
        #[arg(long, short)]
        language: Option<String>,
    },

    /// Describe the settings model behind a resource
    Show {
        /// Path or URI of a settings document
        resource: String,
    },

    /// Print the loaded configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

/// Reveal requests land in the log; the CLI has no file manager to drive.
struct LogReveal;

#[async_trait]
impl CommandService for LogReveal {
    async fn execute_command(&self, command: &str, resource: &Url) -> PrefsResult<()> {
        tracing::info!(command, uri = %resource, "reveal requested");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prefs=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut context = AppContext::new(std::env::current_dir()?);
    if let Some(path) = cli.config {
        context = context.with_config_path(path);
    }

    let config = context.load_config()?;
    let service = context.build_service(&config, Arc::new(LogReveal))?;
    let result = run_cli(&context, &service, cli.command, cli.format).await;
    service.dispose();
    result
}

async fn run_cli(
    context: &AppContext,
    service: &PreferencesService,
    command: Commands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        Commands::Resolve { target, resource } => {
            let resource = resource
                .map(|location| resource_from_location(&location, context.project_root()))
                .transpose()?;
            let uri = service
                .editable_settings_resource(target, resource.as_ref())
                .await?;
            print_resolved(target, uri.as_ref(), format)?;
        }
        Commands::Classify { uri } => {
            let uri = Url::parse(&uri)?;
            let target = default_settings_target(&uri);
            match format {
                OutputFormat::Table => match target {
                    Some(target) => println!("{}", target),
                    None => println!("Not a default settings resource."),
                },
                OutputFormat::Json => {
                    let output = serde_json::json!({ "uri": uri, "target": target });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
            }
        }
        Commands::Defaults { target, raw, full } => {
            let content = if raw {
                service.raw_default_settings_model().content()
            } else {
                let model = service
                    .create_default_settings_model(&default_settings_resource(target))
                    .await?;
                if full {
                    model.default_settings().content()
                } else {
                    model.content()
                }
            };
            println!("{}", content);
        }
        Commands::Init { target, resource } => {
            let resource = resource
                .map(|location| resource_from_location(&location, context.project_root()))
                .transpose()?;
            let Some(uri) = service
                .editable_settings_resource(target, resource.as_ref())
                .await?
            else {
                anyhow::bail!("No {} settings file in this environment", target);
            };
            service.ensure_exists(&uri, EMPTY_SETTINGS_CONTENT).await?;
            print_resolved(target, Some(&uri), format)?;
        }
        Commands::Keybindings => {
            let uri = service.prepare_keybindings_file().await?;
            match format {
                OutputFormat::Table => println!("✓ {}", service.resource_label(&uri)),
                OutputFormat::Json => {
                    let output = serde_json::json!({ "uri": uri });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
            }
        }
        Commands::Open {
            target,
            folder,
            query,
            language,
        } => {
            let mut options = OpenSettingsOptions::new();
            if let Some(query) = query {
                options = options.with_query(query);
            }
            let opened = match target {
                ConfigurationTarget::UserLocal => match language {
                    Some(language) => {
                        service
                            .open_language_specific_settings(&language, options)
                            .await?
                    }
                    None => service.open_user_settings(options).await?,
                },
                ConfigurationTarget::UserRemote => {
                    match service.open_remote_settings(options).await? {
                        Some(opened) => opened,
                        None => {
                            println!("No remote connected.");
                            return Ok(());
                        }
                    }
                }
                ConfigurationTarget::Workspace => service.open_workspace_settings(options).await?,
                ConfigurationTarget::WorkspaceFolder => {
                    if let Some(folder) = folder {
                        options = options
                            .with_folder(resource_from_location(&folder, context.project_root())?);
                    }
                    service.open_folder_settings(options).await?
                }
            };
            print_opened(service, &opened, format)?;
        }
        Commands::Show { resource } => {
            let uri = resource_from_location(&resource, context.project_root())?;
            let Some(model) = service.create_preferences_editor_model(&uri).await? else {
                anyhow::bail!("{} is not a settings document", uri);
            };
            print_model(&model, format)?;
        }
        Commands::Config => run_config(context, format)?,
    }
    Ok(())
}

fn run_config(context: &AppContext, format: OutputFormat) -> Result<()> {
    let path = context.config_store().config_path();
    let config = context.load_config()?;
    match format {
        OutputFormat::Table => {
            let state = if context.config_store().exists() {
                "loaded"
            } else {
                "not found, using defaults"
            };
            println!("# {} ({})", path.display(), state);
            print!("{}", to_toml(&config)?);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": path,
                "exists": context.config_store().exists(),
                "config": config,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_resolved(
    target: ConfigurationTarget,
    uri: Option<&Url>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => match uri {
            Some(uri) => println!("{:<10} {}", target.as_str(), uri),
            None => println!("{:<10} -", target.as_str()),
        },
        OutputFormat::Json => {
            let output = serde_json::json!({ "target": target, "uri": uri });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_opened(
    service: &PreferencesService,
    opened: &OpenedSettings,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("✓ Opened {}", service.resource_label(&opened.resource));
            if let Some(query) = &opened.options.query {
                println!("  Query: {}", query);
            }
            if let Some(reveal) = &opened.options.reveal_setting {
                println!("  Reveal: {}", reveal.key);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(opened)?),
    }
    Ok(())
}

fn print_model(model: &PreferencesEditorModel, format: OutputFormat) -> Result<()> {
    match model {
        PreferencesEditorModel::Default(model) => match format {
            OutputFormat::Table => {
                println!("default settings ({})", model.target());
                println!("{}", model.content());
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "uri": model.uri(),
                    "target": model.target(),
                    "default": true,
                    "settings": model.settings().len(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        },
        PreferencesEditorModel::Editable(model) => {
            let settings = model.settings()?;
            match format {
                OutputFormat::Table => {
                    println!("{} settings ({:?})", model.target(), model.kind());
                    for (key, value) in &settings {
                        println!("  {:<40} {}", key, value);
                    }
                }
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "uri": model.uri(),
                        "target": model.target(),
                        "workspaceConfiguration": model.is_workspace_configuration(),
                        "settings": settings,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
            }
        }
    }
    Ok(())
}
