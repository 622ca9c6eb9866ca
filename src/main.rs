use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use careerlens::analysis::{spawn_poller, AnalysisHandle, AnalysisPoller, AnalysisRequest, IntervalTicker, PollOutcome};
use careerlens::api::resume::ResumePayload;
use careerlens::api::ApiClient;
use careerlens::config::{AppConfig, DEFAULT_CONFIG_PATH};
use careerlens::presenter::{Presenter, ViewMode};
use careerlens::session::{AuthService, ProfileSummary, SessionStore};
use careerlens::storage::Database;
use careerlens::theme::{CardStyle, FontStyle, PreferencesPatch, PreferencesStore, PrimaryColor, ThemeMode};
use careerlens::utils::{logger, CareerLensError};

#[derive(Parser)]
#[command(name = "careerlens")]
#[command(about = "Resume and job description compatibility analysis", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration and create the local database
    Init,
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// Manage resumes
    #[command(subcommand)]
    Resumes(ResumeCommands),
    /// Start an analysis and wait for its result
    Analyze {
        /// Resume id to analyze
        #[arg(long)]
        resume: i64,
        /// Job title
        #[arg(long)]
        title: String,
        /// Job description
        #[arg(long)]
        description: String,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Wait for the result of an analysis that was already started
    #[command(name = "result")]
    Watch {
        /// Analysis id
        id: i64,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Show or change display preferences
    #[command(subcommand)]
    Prefs(PrefsCommands),
    /// Remove the stored session and preferences
    Clean,
}

#[derive(Args)]
struct WaitArgs {
    /// Result view: number, chart or bars
    #[arg(long, default_value_t = ViewMode::Number)]
    view: ViewMode,
    /// Give up after this many polls
    #[arg(long)]
    max_attempts: Option<u32>,
}

#[derive(Subcommand)]
enum ResumeCommands {
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum PrefsCommands {
    Show,
    Set(PrefsArgs),
}

#[derive(Args)]
struct PrefsArgs {
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,
    #[arg(long, value_enum)]
    color: Option<PrimaryColor>,
    #[arg(long, value_enum)]
    card: Option<CardStyle>,
    #[arg(long, value_enum)]
    font: Option<FontStyle>,
    #[arg(long)]
    animations: Option<bool>,
}

impl From<PrefsArgs> for PreferencesPatch {
    fn from(args: PrefsArgs) -> Self {
        Self {
            theme_mode: args.theme,
            primary_color: args.color,
            card_style: args.card,
            font_style: args.font,
            animations_enabled: args.animations,
        }
    }
}

/// Everything a command needs, opened from the layered configuration.
struct App {
    config: AppConfig,
    db: Arc<Database>,
    api: ApiClient,
}

impl App {
    async fn open() -> Result<Self> {
        let config = AppConfig::load()?;
        if let Some(dir) = Path::new(&config.storage.database_path).parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let db = Arc::new(Database::open(&config.database_url()).await?);
        let api = ApiClient::new(&config.api, SessionStore::new(db.clone()))?;
        info!("API: {}", api.base_url());

        Ok(Self { config, db, api })
    }

    fn preferences(&self) -> PreferencesStore {
        PreferencesStore::new(self.db.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    let app = App::open().await?;

    match cli.command {
        Commands::Init => init_command(&app).await?,
        Commands::Login { email, password } => login_command(&app, &email, &password).await?,
        Commands::Signup { name, email, password } => signup_command(&app, &name, &email, &password).await?,
        Commands::Logout => logout_command(&app).await?,
        Commands::Whoami => whoami_command(&app).await?,
        Commands::Resumes(cmd) => resumes_command(&app, cmd).await?,
        Commands::Analyze {
            resume,
            title,
            description,
            wait,
        } => analyze_command(&app, AnalysisRequest::new(title, description, resume), wait).await?,
        Commands::Watch { id, wait } => wait_for_result(&app, AnalysisHandle { id }, wait).await?,
        Commands::Prefs(cmd) => prefs_command(&app, cmd).await?,
        Commands::Clean => clean_command(&app).await?,
    }

    Ok(())
}

async fn init_command(app: &App) -> Result<()> {
    info!("Initializing careerlens...");

    if AppConfig::write_default(DEFAULT_CONFIG_PATH)? {
        info!("Configuration written: {}", DEFAULT_CONFIG_PATH);
    } else {
        info!("Keeping existing configuration: {}", DEFAULT_CONFIG_PATH);
    }

    app.db.init_schema().await?;
    info!("Database ready: {}", app.config.storage.database_path);

    info!("Next steps:");
    info!("  1. Point [api] base_url in {} at your server", DEFAULT_CONFIG_PATH);
    info!("  2. Run 'careerlens login --email <email> --password <password>'");
    Ok(())
}

async fn login_command(app: &App, email: &str, password: &str) -> Result<()> {
    let session = AuthService::new(app.api.clone()).sign_in(email, password).await?;
    println!("Signed in as {}", session.user.name);
    Ok(())
}

async fn signup_command(app: &App, name: &str, email: &str, password: &str) -> Result<()> {
    let session = AuthService::new(app.api.clone())
        .sign_up(name, email, password)
        .await?;
    println!("Account created. Signed in as {}", session.user.name);
    Ok(())
}

async fn logout_command(app: &App) -> Result<()> {
    AuthService::new(app.api.clone()).sign_out().await?;
    println!("Signed out");
    Ok(())
}

async fn whoami_command(app: &App) -> Result<()> {
    let profile = match ProfileSummary::load(&app.api).await {
        Ok(profile) => profile,
        Err(CareerLensError::NotAuthenticated) => {
            println!("Not signed in");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{} (#{})", profile.user.name, profile.user.id);
    if let Some(email) = &profile.user.email {
        println!("Email:    {}", email);
    }
    println!("Resumes:  {}", profile.resume_count);
    println!("Profile:  {}% complete", profile.completeness);
    Ok(())
}

async fn resumes_command(app: &App, command: ResumeCommands) -> Result<()> {
    let resumes = app.api.resumes();

    match command {
        ResumeCommands::List => {
            let list = resumes.try_list().await?;
            if list.is_empty() {
                println!("No resumes yet");
            }
            for resume in list {
                println!("#{:<5} {}", resume.id, resume.title);
            }
        }
        ResumeCommands::Create { title, description } => {
            let payload = ResumePayload::new(title, description);
            payload.validate()?;
            let created = resumes.create(&payload).await?;
            println!("Created resume #{}", created.id);
        }
        ResumeCommands::Update { id, title, description } => {
            let payload = ResumePayload::new(title, description);
            payload.validate()?;
            let updated = resumes.update(id, &payload).await?;
            println!("Updated resume #{}", updated.id);
        }
        ResumeCommands::Delete { id } => {
            if resumes.delete(id).await? {
                println!("Deleted resume #{}", id);
            } else {
                bail!("resume #{} was not deleted", id);
            }
        }
    }

    Ok(())
}

async fn analyze_command(app: &App, request: AnalysisRequest, wait: WaitArgs) -> Result<()> {
    request.validate()?;
    let handle = app.api.analysis().start_analysis(&request).await?;
    info!("Started {} for resume #{}", handle, request.resume_id);
    wait_for_result(app, handle, wait).await
}

async fn wait_for_result(app: &App, handle: AnalysisHandle, wait: WaitArgs) -> Result<()> {
    let max_attempts = wait.max_attempts.or(app.config.poller.max_attempts);
    let poller = AnalysisPoller::new(
        app.api.analysis(),
        IntervalTicker::new(app.config.poller.interval()),
        handle,
    )
    .with_max_attempts(max_attempts);

    let task = spawn_poller(poller);
    let cancel = task.cancel_handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    info!("Waiting for {} (Ctrl-C to stop)", handle);
    let outcome = task.outcome().await;
    ctrl_c.abort();

    match outcome {
        PollOutcome::Settled(settled) => {
            info!("{} settled after {} polls", handle, settled.attempts);
            println!("{}", Presenter::new(settled).with_mode(wait.view).render());
        }
        PollOutcome::Abandoned { attempts } => {
            warn!("Stopped waiting for {} after {} polls", handle, attempts);
        }
        PollOutcome::Exhausted { attempts } => {
            bail!("{} still pending after {} polls", handle, attempts);
        }
    }

    Ok(())
}

async fn prefs_command(app: &App, command: PrefsCommands) -> Result<()> {
    let store = app.preferences();

    let prefs = match command {
        PrefsCommands::Show => store.load().await,
        PrefsCommands::Set(args) => {
            let patch = PreferencesPatch::from(args);
            if patch.is_empty() {
                bail!("nothing to change; pass at least one of --theme, --color, --card, --font, --animations");
            }
            store.update(patch).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&prefs)?);
    println!("{}", serde_json::to_string_pretty(&prefs.theme())?);
    Ok(())
}

async fn clean_command(app: &App) -> Result<()> {
    app.db.clear_all().await?;
    info!("Session and preferences removed");
    Ok(())
}
