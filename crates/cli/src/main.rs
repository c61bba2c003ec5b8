//! Atende CLI - drive the agent console from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show or edit the signed-in agent's profile
//! atende profile show
//! atende profile edit --full-name "Ana Souza" --display-name ana
//!
//! # Notification settings
//! atende settings show
//! atende settings email-alerts off
//!
//! # Inbox rows, marking customers currently on the site
//! atende conversations list --online 0d7f3c9e-5a51-4b8e-9a1c-3f2e6d4b8a70
//! atende conversations show 0d7f3c9e-5a51-4b8e-9a1c-3f2e6d4b8a70 --online
//! ```
//!
//! Configuration comes from the environment (see `atende_console::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use atende_console::config::{ConsoleConfig, LogFormat};
use atende_core::{ConversationId, ConversationStatus, CustomerId};
use clap::{Parser, Subcommand, ValueEnum};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "atende")]
#[command(author, version, about = "Atende agent console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// View or change notification settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Browse conversations
    Conversations {
        #[command(subcommand)]
        action: ConversationsAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the current profile
    Show,
    /// Change one or more profile fields and save
    Edit {
        /// New full name
        #[arg(long)]
        full_name: Option<String>,

        /// New display name
        #[arg(long)]
        display_name: Option<String>,

        /// New profile photo URL
        #[arg(long)]
        photo_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings
    Show,
    /// Turn e-mail alerts for new messages on or off
    EmailAlerts {
        #[arg(value_enum)]
        state: Switch,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[derive(Subcommand)]
enum ConversationsAction {
    /// Print one summary row per conversation
    List {
        /// Customers currently on the site (repeatable)
        #[arg(long = "online", value_name = "CUSTOMER_ID")]
        online: Vec<CustomerId>,

        /// Only show conversations with this status (`open`, `closed`)
        #[arg(long)]
        status: Option<ConversationStatus>,
    },
    /// Print one conversation with its messages and customer details
    Show {
        /// Conversation ID
        id: ConversationId,

        /// The customer is currently on the site
        #[arg(long)]
        online: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ConsoleConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Map tracing levels to Sentry: errors and warnings become events, the rest
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(log_format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "atende_console=info,atende_cli=info".into());

    let is_json = log_format == LogFormat::Json;
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConsoleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    let result = run(cli, &config).await;
    if let Err(e) = &result {
        tracing::error!("Command failed: {e}");
    }

    // Flush pending events before exiting
    drop(sentry_guard);
    if result.is_err() {
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ConsoleConfig) -> Result<(), commands::CommandError> {
    let api = commands::connect(config)?;

    match cli.command {
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(api).await?,
            ProfileAction::Edit {
                full_name,
                display_name,
                photo_url,
            } => {
                let changes = commands::profile::ProfileChanges {
                    full_name,
                    display_name,
                    photo_url,
                };
                commands::profile::edit(api, changes).await?;
            }
        },
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(api).await?,
            SettingsAction::EmailAlerts { state } => {
                commands::settings::set_email_alerts(api, matches!(state, Switch::On)).await?;
            }
        },
        Commands::Conversations { action } => match action {
            ConversationsAction::List { online, status } => {
                commands::conversations::list(api.as_ref(), &online, status).await?;
            }
            ConversationsAction::Show { id, online } => {
                commands::conversations::show(api.as_ref(), id, online).await?;
            }
        },
    }
    Ok(())
}
