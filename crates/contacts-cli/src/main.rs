// # contacts - interactive contact directory
//
// This binary is a thin presentation layer over contacts-core:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Creating the store through the registry
// 4. Running the controller loop and rendering its models
//
// All directory logic lives in contacts-core.
//
// ## Configuration
//
// - `CONTACTS_STORE_TYPE`: Type of store (file, memory). Default: file
// - `CONTACTS_STORE_PATH`: Path to the store file (for file store). Default: contacts.json
// - `CONTACTS_STORE_QUOTA_BYTES`: Size limit in bytes (for memory store)
// - `CONTACTS_STORAGE_KEY`: Key the directory is stored under. Default: contact-app-data
// - `CONTACTS_LOG_LEVEL`: trace, debug, info, warn, error. Default: warn
//
// Logs go to stderr so they never mix with the table on stdout.
//
// ## Example
//
// ```bash
// export CONTACTS_STORE_PATH=$HOME/.local/share/contacts/contacts.json
// contacts
// ```

mod commands;
mod render;

use anyhow::{Context, Result};
use commands::Command;
use contacts_core::config::DEFAULT_STORAGE_KEY;
use contacts_core::{
    ContactRepository, DirectoryConfig, DirectoryController, Intent, KvStore, RenderModel,
    StoreConfig, StoreRegistry,
};
use std::env;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::{LinesStream, ReceiverStream};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum ContactsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ContactsExitCode> for ExitCode {
    fn from(code: ContactsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    store_type: String,
    store_path: String,
    store_quota_bytes: Option<usize>,
    storage_key: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let store_quota_bytes = match env::var("CONTACTS_STORE_QUOTA_BYTES") {
            Ok(raw) => Some(raw.trim().parse::<usize>().with_context(|| {
                format!("CONTACTS_STORE_QUOTA_BYTES must be a byte count. Got: {}", raw)
            })?),
            Err(_) => None,
        };

        Ok(Self {
            store_type: env::var("CONTACTS_STORE_TYPE").unwrap_or_else(|_| "file".to_string()),
            store_path: env::var("CONTACTS_STORE_PATH")
                .unwrap_or_else(|_| "contacts.json".to_string()),
            store_quota_bytes,
            storage_key: env::var("CONTACTS_STORAGE_KEY")
                .unwrap_or_else(|_| DEFAULT_STORAGE_KEY.to_string()),
            log_level: env::var("CONTACTS_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.store_type.as_str() {
            "file" | "memory" => {}
            _ => anyhow::bail!(
                "CONTACTS_STORE_TYPE '{}' is not supported. \
                Supported types: file, memory",
                self.store_type
            ),
        }

        if self.store_type == "file" && self.store_quota_bytes.is_some() {
            anyhow::bail!("CONTACTS_STORE_QUOTA_BYTES only applies to CONTACTS_STORE_TYPE=memory");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "CONTACTS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        // Store, key and quota rules live with the library config
        self.directory_config()
            .validate()
            .context("invalid directory configuration")?;

        Ok(())
    }

    fn directory_config(&self) -> DirectoryConfig {
        let store = match self.store_type.as_str() {
            "memory" => StoreConfig::Memory {
                quota_bytes: self.store_quota_bytes,
            },
            _ => StoreConfig::File {
                path: self.store_path.clone(),
            },
        };

        DirectoryConfig::new()
            .with_store(store)
            .with_storage_key(self.storage_key.clone())
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ContactsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return ContactsExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ContactsExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ContactsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_app(config).await {
            error!("Application error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ContactsExitCode::RuntimeError
        } else {
            ContactsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Wire store, repository and controller, then drive the prompt
async fn run_app(config: Config) -> Result<()> {
    let directory_config = config.directory_config();

    let registry = StoreRegistry::with_builtin_stores();
    let store: Arc<dyn KvStore> = Arc::from(
        registry
            .create_store(&directory_config.store)
            .await
            .context("failed to open contact store")?,
    );
    info!(
        "Using {} store, key '{}'",
        store.store_name(),
        directory_config.storage_key
    );

    let repository = Arc::new(ContactRepository::with_key(
        store,
        directory_config.storage_key.clone(),
    ));
    let (mut controller, mut render_rx) =
        DirectoryController::new(repository, &directory_config.controller)?;

    let (intent_tx, intent_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let controller_handle = tokio::spawn(async move {
        controller
            .run(ReceiverStream::new(intent_rx), shutdown_rx)
            .await;
    });

    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());

    println!("Contact directory. Type 'help' for commands.");
    let mut model = next_model(&mut render_rx).await?;
    print!("{}", render::render(&model));

    loop {
        print!("{}", render::prompt(&model));
        std::io::stdout().flush()?;

        let Some(line) = lines.next().await else {
            println!();
            break;
        };

        let intent = match commands::parse(&line?) {
            Command::Intent(intent) => intent,
            Command::Delete(id) => {
                print!("Delete this contact? [y/N] ");
                std::io::stdout().flush()?;
                let answer = match lines.next().await {
                    Some(answer) => answer?,
                    None => String::new(),
                };
                Intent::Delete {
                    id,
                    confirmed: commands::is_confirmation(&answer),
                }
            }
            Command::Help => {
                println!("{}", commands::HELP);
                continue;
            }
            Command::Nothing => continue,
            Command::Invalid(hint) => {
                println!("{}", hint);
                continue;
            }
            Command::Quit => break,
        };

        intent_tx
            .send(intent)
            .await
            .context("controller loop stopped unexpectedly")?;
        model = next_model(&mut render_rx).await?;
        print!("{}", render::render(&model));
    }

    // Loop may already be gone if the channel closed; nothing left to stop then
    let _ = shutdown_tx.send(());
    controller_handle
        .await
        .context("controller loop panicked")?;

    Ok(())
}

async fn next_model(render_rx: &mut mpsc::Receiver<RenderModel>) -> Result<RenderModel> {
    render_rx
        .recv()
        .await
        .context("controller loop stopped unexpectedly")
}
