//! afiliado CLI
//!
//! Local command-line client for the afiliado membership platform.

use std::path::PathBuf;
use std::time::Duration;

use afiliado::{
    device::{self, CameraCapture, GalleryFile, HelperCommand, LocationSource, ManualEntry, PhotoSource},
    error::{AppError, Result},
    models::{Config, ReportDraft, SessionContext},
    services::{DepartmentDirectory, FeedLoader, ReportWorkflow, SubmitOutcome},
    session,
    storage::{LocalSessionStore, SessionStore},
    utils::{http, validate},
};
use clap::{Parser, Subcommand};

/// afiliado - Membership Platform Client
#[derive(Parser, Debug)]
#[command(
    name = "afiliado",
    version,
    about = "Client for the afiliado membership platform"
)]
struct Cli {
    /// Path to storage directory containing config and session files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store the session token issued at sign-in
    Login {
        /// Bearer token
        token: String,
    },

    /// Show the identity decoded from the stored session
    Whoami,

    /// Remove the stored session
    Logout,

    /// Fetch a feed page for the session's organization
    Feed {
        /// Page to fetch (1-indexed)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Walk forward from the requested page to the last one
        #[arg(long)]
        follow: bool,
    },

    /// List the departments reports can be routed to
    Departments,

    /// List reports filed within the session's organization
    Reports,

    /// Compose and submit a citizen report
    Report {
        /// Report title
        #[arg(long)]
        title: String,

        /// Problem description
        #[arg(long)]
        description: String,

        /// Department id (see `departments`)
        #[arg(long)]
        department: String,

        /// Manually entered latitude (requires --lng)
        #[arg(long, requires = "lng", conflicts_with = "locate")]
        lat: Option<String>,

        /// Manually entered longitude (requires --lat)
        #[arg(long, requires = "lat", conflicts_with = "locate")]
        lng: Option<String>,

        /// Acquire coordinates through the configured location helper
        #[arg(long)]
        locate: bool,

        /// Attach an existing image file
        #[arg(long, conflicts_with = "capture")]
        photo: Option<PathBuf>,

        /// Capture a photo through the configured camera helper
        #[arg(long)]
        capture: bool,
    },

    /// Validate configuration and session files
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Load the stored session or refuse the command.
async fn require_session(store: &LocalSessionStore) -> Result<SessionContext> {
    let token = store
        .load_token()
        .await?
        .ok_or_else(|| AppError::session("no stored session; run 'afiliado login' first"))?;
    session::decode_token(&token)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);

    let client = http::create_async_client(&config.api)?;
    let store = LocalSessionStore::new(&cli.storage_dir);

    match cli.command {
        Command::Login { token } => {
            // Decode before storing so a bad token never becomes a session.
            let ctx = session::decode_token(&token)?;
            store.store_token(&token).await?;
            log::info!(
                "Session stored for {} (organization {})",
                ctx.full_name(),
                ctx.party_id
            );
        }

        Command::Whoami => {
            let ctx = require_session(&store).await?;
            log::info!("User #{}: {}", ctx.user_id, ctx.full_name());
            log::info!("Organization: {}", ctx.party_id);
            if !ctx.phone.is_empty() {
                log::info!("Phone: {}", ctx.phone);
            }
        }

        Command::Logout => {
            store.clear_token().await?;
            log::info!("Session removed.");
        }

        Command::Feed { page, follow } => {
            let ctx = require_session(&store).await?;
            let mut loader =
                FeedLoader::new(client, config.api.base_url.as_str(), config.feed.page_size);

            loader.set_context(ctx.party_id).await?;
            while loader.page() < page {
                if !loader.next_page().await? {
                    log::warn!("Feed ends at page {} of {}.", loader.page(), loader.total_pages());
                    break;
                }
            }

            loop {
                log::info!("Page {} of {}:", loader.page(), loader.total_pages());
                for post in loader.items() {
                    log::info!("  [{}] {}: {}", post.published_at, post.author, post.caption);
                    log::debug!("    image: {}", post.image_url);
                }
                if !follow || !loader.next_page().await? {
                    break;
                }
            }
        }

        Command::Departments => {
            let mut directory = DepartmentDirectory::new(client, config.api.base_url.as_str());
            let options = directory.refresh().await?;
            log::info!("{} departments available:", options.len());
            for option in options {
                log::info!("  {} - {}", option.value, option.label);
            }
        }

        Command::Reports => {
            let ctx = require_session(&store).await?;
            let workflow = ReportWorkflow::new(client, config.api.base_url.as_str());
            let reports = workflow.list_for_context(ctx.party_id).await?;

            if reports.is_empty() {
                log::info!("No reports filed yet.");
            }
            for report in reports {
                log::info!(
                    "  [{}] {} ({}) -> {}",
                    report.reported_at,
                    report.title,
                    report.status,
                    report.department
                );
            }
        }

        Command::Report {
            title,
            description,
            department,
            lat,
            lng,
            locate,
            photo,
            capture,
        } => {
            let ctx = require_session(&store).await?;
            let helper_timeout = Duration::from_secs(config.device.helper_timeout_secs);

            let location_source: Box<dyn LocationSource> = match (lat, lng, locate) {
                (Some(lat), Some(lng), false) => Box::new(ManualEntry::new(lat, lng)),
                (None, None, true) => {
                    let command = config.device.location_command.clone().ok_or_else(|| {
                        AppError::config("device.location_command is not configured")
                    })?;
                    Box::new(HelperCommand::new(command, helper_timeout))
                }
                _ => {
                    return Err(AppError::validation(
                        "either --lat/--lng or --locate is required",
                    ));
                }
            };

            let photo_source: Option<Box<dyn PhotoSource>> = match (photo, capture) {
                (Some(path), false) => Some(Box::new(GalleryFile::new(path))),
                (None, true) => {
                    let command = config.device.camera_command.clone().ok_or_else(|| {
                        AppError::config("device.camera_command is not configured")
                    })?;
                    let target = cli.storage_dir.join("capture.jpg");
                    Some(Box::new(CameraCapture::new(command, target, helper_timeout)))
                }
                _ => None,
            };

            let mut draft = ReportDraft {
                title,
                description,
                department_id: department,
                ..ReportDraft::default()
            };

            // The department list and the position fix are independent;
            // fetch them concurrently.
            let mut directory =
                DepartmentDirectory::new(client.clone(), config.api.base_url.as_str());
            let (options, ()) = futures::try_join!(
                directory.refresh(),
                device::acquire_location(&mut draft, location_source.as_ref())
            )?;

            if let Some(source) = photo_source.as_deref() {
                device::attach_photo(&mut draft, source).await?;
            }

            let workflow = ReportWorkflow::new(client, config.api.base_url.as_str());
            match workflow.submit(&ctx, &mut draft, options).await? {
                SubmitOutcome::Submitted { message } => {
                    log::info!(
                        "{}",
                        message.unwrap_or_else(|| "Report created.".to_string())
                    );
                }
                SubmitOutcome::AlreadyInFlight => {
                    log::warn!("A submission is already in progress.");
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!("Config OK ({})", config.api.base_url);

            match store.load_token().await? {
                Some(token) => {
                    let ctx = session::decode_token(&token)?;
                    log::info!("Session OK (user #{}, organization {})", ctx.user_id, ctx.party_id);
                    if let Err(e) = validate::validate_phone(&ctx.phone) {
                        log::warn!("Stored profile phone looks malformed: {e}");
                    }
                }
                None => log::info!("No stored session."),
            }

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
