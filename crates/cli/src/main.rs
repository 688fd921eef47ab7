mod console;
mod fields;
mod resources;

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use console::ConsoleNotifier;
use deskhub_client::{HttpClient, UploadError, UploadFile};
use deskhub_core::compose::{compose_name, split_name, AddressParts};
use deskhub_core::config::{millis_from_env_value, sync_mode_from_env_value};
use deskhub_core::constants::{DEFAULT_API_URL, DEFAULT_TOKEN_FILE};
use deskhub_core::debounce::{AddressQuery, GeocodeController};
use deskhub_core::session::{AuthSession, CredentialStore, FileCredentialStore};
use deskhub_core::{ClientConfig, NonEmptyText, Notification, Notifier, RecordId};
use fields::{parse_assignment, Assignment};
use resources::{with_resource, Context, ResourceKind};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "deskhub")]
#[command(about = "deskhub clinic, property and supply records CLI")]
struct Cli {
    /// REST API base URL (overrides DESKHUB_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the bearer token
    Login {
        /// Email or username
        identifier: String,
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// Show the user the stored token belongs to
    Whoami,
    /// List records
    List {
        resource: ResourceKind,
        /// Query filter as key=value, repeatable
        #[arg(long = "filter", value_parser = parse_assignment)]
        filters: Vec<Assignment>,
    },
    /// Create a record
    Create {
        resource: ResourceKind,
        /// Field value as key=value, repeatable
        #[arg(long = "set", value_parser = parse_assignment)]
        fields: Vec<Assignment>,
    },
    /// Update a record
    Update {
        resource: ResourceKind,
        id: RecordId,
        /// Field value as key=value, repeatable
        #[arg(long = "set", value_parser = parse_assignment)]
        fields: Vec<Assignment>,
        /// Query filter used to find the record, repeatable
        #[arg(long = "filter", value_parser = parse_assignment)]
        filters: Vec<Assignment>,
    },
    /// Delete a record
    Delete {
        resource: ResourceKind,
        id: RecordId,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
        /// Query filter for the reload after deleting, repeatable
        #[arg(long = "filter", value_parser = parse_assignment)]
        filters: Vec<Assignment>,
    },
    /// Split a full name into first, middle and last
    SplitName { full_name: String },
    /// Join name parts into a display name
    ComposeName {
        first: String,
        #[arg(long)]
        middle: Option<String>,
        #[arg(long)]
        last: Option<String>,
    },
    /// Join address parts into one line
    ComposeAddress {
        /// Used verbatim when not blank
        #[arg(long)]
        full_address: Option<String>,
        #[arg(long, default_value = "")]
        unit: String,
        #[arg(long, default_value = "")]
        street: String,
        #[arg(long, default_value = "")]
        barangay: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        province: String,
        #[arg(long, default_value = "")]
        postal_code: String,
    },
    /// Look up the coordinates of an address
    Geocode {
        address: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        province: String,
    },
    /// Upload files to cloud storage
    Upload {
        files: Vec<PathBuf>,
        /// Owning user id
        #[arg(long)]
        owner: RecordId,
        /// Target folder (root when omitted)
        #[arg(long)]
        folder: Option<RecordId>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("deskhub=info".parse()?))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::SplitName { full_name }) => {
            println!("{}", serde_json::to_string_pretty(&split_name(&full_name))?);
        }
        Some(Commands::ComposeName {
            first,
            middle,
            last,
        }) => {
            println!("{}", compose_name(&first, middle.as_deref(), last.as_deref()));
        }
        Some(Commands::ComposeAddress {
            full_address,
            unit,
            street,
            barangay,
            city,
            province,
            postal_code,
        }) => {
            let parts = AddressParts {
                full_address,
                unit,
                street,
                barangay,
                city,
                province,
                postal_code,
            };
            println!("{}", parts.compose());
        }
        Some(command) => {
            let config = client_config(cli.api_url)?;
            run(command, config).await?;
        }
        None => {
            println!("Use 'deskhub --help' for commands");
        }
    }

    Ok(())
}

/// Resolve the client configuration from the environment, once.
fn client_config(api_url: Option<String>) -> anyhow::Result<ClientConfig> {
    let api_url = api_url
        .or_else(|| env::var("DESKHUB_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
    let token_file = env::var("DESKHUB_TOKEN_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE));

    let mut config = ClientConfig::new(api_url, token_file)?
        .with_sync_mode(sync_mode_from_env_value(env::var("DESKHUB_SYNC_MODE").ok())?);
    if let Some(timeout) = millis_from_env_value(
        "DESKHUB_REQUEST_TIMEOUT_MS",
        env::var("DESKHUB_REQUEST_TIMEOUT_MS").ok(),
    )? {
        config = config.with_request_timeout(timeout);
    }
    if let Some(window) = millis_from_env_value(
        "DESKHUB_GEOCODE_DEBOUNCE_MS",
        env::var("DESKHUB_GEOCODE_DEBOUNCE_MS").ok(),
    )? {
        config = config.with_geocode_debounce(window);
    }
    Ok(config)
}

async fn run(command: Commands, config: ClientConfig) -> anyhow::Result<()> {
    let credentials: Arc<dyn CredentialStore> =
        Arc::new(FileCredentialStore::new(config.token_file()));
    let client = Arc::new(HttpClient::new(&config, credentials.clone())?);
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    tracing::debug!(api_url = client.base_url(), "client ready");

    let mut session = AuthSession::new(client.clone(), credentials, notifier.clone());
    let ctx = Context {
        config,
        client,
        notifier,
    };

    match command {
        Commands::Login {
            identifier,
            password,
        } => {
            let identifier = NonEmptyText::new(&identifier)?;
            let password = match password {
                Some(password) => password,
                None => console::read_line("Password: ")?,
            };
            let user = session.login(&identifier, &password).await?;
            println!("Logged in as {}", user.display_name());
        }
        Commands::Logout => session.logout()?,
        Commands::Whoami => match session.restore().await? {
            Some(user) => println!(
                "{} ({})",
                user.display_name(),
                user.role.as_deref().unwrap_or("no role")
            ),
            None => println!("Not logged in."),
        },
        Commands::List { resource, filters } => {
            let query = resources::list_query(&filters);
            with_resource!(resource, R => resources::list::<R>(&ctx, query).await)?;
        }
        Commands::Create { resource, fields } => {
            with_resource!(resource, R => resources::create::<R>(&ctx, &fields).await)?;
        }
        Commands::Update {
            resource,
            id,
            fields,
            filters,
        } => {
            let query = resources::list_query(&filters);
            with_resource!(resource, R => resources::update::<R>(&ctx, &id, query, &fields).await)?;
        }
        Commands::Delete {
            resource,
            id,
            yes,
            filters,
        } => {
            let query = resources::list_query(&filters);
            with_resource!(resource, R => resources::delete::<R>(&ctx, &id, query, yes).await)?;
        }
        Commands::Geocode {
            address,
            city,
            province,
        } => {
            let mut controller =
                GeocodeController::for_new(ctx.client.clone(), ctx.config.geocode_debounce());
            match controller
                .lookup_now(&AddressQuery::new(address, city, province))
                .await
            {
                Ok(c) => println!("{:.6}, {:.6}", c.latitude, c.longitude),
                Err(e) => {
                    ctx.notifier.notify(Notification::error(e.to_string()));
                    bail!("geocoding failed");
                }
            }
        }
        Commands::Upload {
            files,
            owner,
            folder,
        } => {
            let mut uploads = Vec::with_capacity(files.len());
            for path in &files {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                uploads.push(UploadFile::new(name, bytes));
            }

            match ctx.client.upload_files(uploads, &owner, folder.as_ref()).await {
                Ok(report) => {
                    ctx.notifier.notify(report.notification());
                    for error in &report.errors {
                        eprintln!("  {error}");
                    }
                }
                Err(UploadError::Precondition(p)) => {
                    ctx.notifier.notify(Notification::warning(p.0));
                }
                Err(UploadError::Failed(e)) => {
                    ctx.notifier.notify(Notification::error(e.to_string()));
                    bail!("upload failed");
                }
            }
        }
        // Answered in `main` without a client.
        Commands::SplitName { .. }
        | Commands::ComposeName { .. }
        | Commands::ComposeAddress { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn delete_parses_resource_id_and_yes() {
        let cli =
            Cli::try_parse_from(["deskhub", "delete", "purchase-orders", "12", "--yes"]).unwrap();
        match cli.command {
            Some(Commands::Delete { resource, id, yes, .. }) => {
                assert_eq!(resource, ResourceKind::PurchaseOrders);
                assert_eq!(id.as_str(), "12");
                assert!(yes);
            }
            _ => panic!("expected delete"),
        }
    }

    #[test]
    fn create_collects_repeated_fields() {
        let cli = Cli::try_parse_from([
            "deskhub",
            "create",
            "patients",
            "--set",
            "first_name=Jane",
            "--set",
            "last_name=Doe",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Create { resource, fields }) => {
                assert_eq!(resource, ResourceKind::Patients);
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[1].value, "Doe");
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn malformed_assignment_is_a_usage_error() {
        assert!(
            Cli::try_parse_from(["deskhub", "create", "patients", "--set", "first_name"]).is_err()
        );
        assert!(Cli::try_parse_from(["deskhub", "delete", "patients", " "]).is_err());
    }
}
