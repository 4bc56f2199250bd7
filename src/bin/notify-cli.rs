use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use notify_client::models::{format_number, format_time, Photo};
use notify_client::views::monitoring::{monitoring_error_message, TIME_RANGES};
use notify_client::{
    ClientConfig, LoginView, MonitoringView, NotifyApi, RegisterView, Route, SearchView,
    SessionStore,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "notify-cli")]
#[command(about = "CLI for Notify - album lookup and admin monitoring", long_about = None)]
struct Cli {
    /// Base URL of the versioned API
    #[arg(long, env = "NOTIFY_API_URL")]
    api_url: Option<String>,

    /// Login endpoint URL
    #[arg(long, env = "NOTIFY_LOGIN_URL")]
    login_url: Option<String>,

    /// Where the session token is stored
    #[arg(long, env = "NOTIFY_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "NOTIFY_TIMEOUT_SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search albums by name or artist
    Search {
        /// Search query
        query: String,
    },
    /// Show details for one album
    Info {
        artist: String,
        title: String,
    },
    /// Download an album cover image
    Cover {
        artist: String,
        title: String,

        /// Output file
        #[arg(short, long, default_value = "cover.jpg")]
        output: PathBuf,
    },
    /// Log in and store the session
    Login {
        username: String,

        /// Password (can also be set via NOTIFY_PASSWORD env var)
        #[arg(long, env = "NOTIFY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register(RegisterArgs),
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show the admin monitoring dashboard
    Monitor {
        /// Time window in hours
        #[arg(long, default_value_t = 24)]
        hours: u32,
    },
    /// Show recent backend log entries (admin only)
    Logs,
}

#[derive(Args)]
struct RegisterArgs {
    username: String,

    #[arg(long, env = "NOTIFY_PASSWORD", hide_env_values = true)]
    password: String,

    /// Repeat of the password; defaults to --password
    #[arg(long)]
    confirm_password: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    bio: Option<String>,

    /// Profile picture
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Turn off email notifications
    #[arg(long)]
    no_email_notifications: bool,

    /// Turn off recommendation notifications
    #[arg(long)]
    no_recommendations: bool,

    /// Turn off general notifications
    #[arg(long)]
    no_general_notifications: bool,

    /// Grant staff (only honored for admins)
    #[arg(long)]
    staff: bool,

    /// Grant superuser (only honored for admins)
    #[arg(long)]
    superuser: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<ClientConfig, notify_client::NotifyError> {
    let mut config = ClientConfig::default();
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(url) = &cli.login_url {
        config.login_url = url.clone();
    }
    if let Some(path) = &cli.session_file {
        config.session_file = path.clone();
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    let api = NotifyApi::new(&config)?;
    let mut session = SessionStore::load(&config.session_file)?;

    match cli.command {
        Commands::Search { query } => {
            let mut view = SearchView::new();
            println!("Searching for '{}'...", query.trim());
            view.search(&api, &query).await;

            if let Some(err) = view.error() {
                return Err(err.into());
            }
            if let Some(msg) = view.empty_state() {
                println!("{}", msg);
            }
            for (i, album) in view.results().iter().enumerate() {
                println!("{}. {} - {}", i + 1, album.artist, album.title);
            }
        }
        Commands::Info { artist, title } => {
            let mut view = SearchView::new();
            view.select(&api, &artist, &title).await;

            let Some(album) = view.selected() else {
                return Err(view.error().unwrap_or("Album not found").into());
            };
            println!("{}", album.title);
            println!("{}", album.artist);
            println!();
            println!("  Released:  {}", album.release_date);
            println!("  Tracks:    {}", album.track_count);
            println!("  Plays:     {}", album.play_count);
            println!("  Listeners: {}", album.listeners);
            if let Some(duration) = &album.duration {
                println!("  Length:    {}", duration);
            }
            if !album.tags.is_empty() {
                println!("  Tags:      {}", album.tags.join(", "));
            }
            if !album.cover_url.is_empty() {
                println!("  Cover:     {}", album.cover_url);
            }
            println!();
            println!("{}", album.description);
        }
        Commands::Cover {
            artist,
            title,
            output,
        } => {
            let album = api.get_album(&artist, &title).await?;
            if album.cover_url.is_empty() {
                return Err(format!("No cover available for {} - {}", artist, title).into());
            }
            let size = api.download_cover(&album.cover_url, &output).await?;
            println!("✅ Saved cover to {} ({} bytes)", output.display(), size);
        }
        Commands::Login { username, password } => {
            let mut view = LoginView::new();
            view.form.username = username;
            view.form.password = password;

            if view.submit(&api, &mut session).await.is_none() {
                if !view.field_errors().is_empty() {
                    return Err(view.field_errors().to_string().into());
                }
                return Err(view.error().unwrap_or("Login failed").into());
            }
            if let Some(user) = session.user() {
                let role = if user.is_admin() { " (admin)" } else { "" };
                println!("✅ Logged in as {}{}", user.username, role);
            }
        }
        Commands::Register(args) => register(&api, &mut session, args).await?,
        Commands::Logout => {
            session.logout()?;
            println!("Logged out.");
        }
        Commands::Whoami => match session.user() {
            Some(user) => {
                println!("{} (id {})", user.username, user.id);
                if user.is_admin() {
                    println!("  staff: {}, superuser: {}", user.is_staff, user.is_superuser);
                }
            }
            None => println!("Not logged in."),
        },
        Commands::Monitor { hours } => {
            if Route::Monitoring.resolve(&session) != Route::Monitoring {
                return Err("Administrator login required. Run `notify-cli login` first.".into());
            }
            if !TIME_RANGES.contains(&hours) {
                tracing::warn!("{}h is not one of the dashboard presets {:?}", hours, TIME_RANGES);
            }

            let mut view = MonitoringView::new();
            let redirect = view.change_time_range(&api, &mut session, hours).await;
            if let Some(err) = view.error() {
                if redirect == Some(Route::Login) {
                    eprintln!("Session cleared; log in again.");
                }
                return Err(err.into());
            }
            if let Some(metrics) = view.metrics() {
                print_metrics(metrics);
            }
        }
        Commands::Logs => {
            if Route::Monitoring.resolve(&session) != Route::Monitoring {
                return Err("Administrator login required. Run `notify-cli login` first.".into());
            }
            let mut view = MonitoringView::new();
            if let Err(e) = view.load_logs(&api, &session).await {
                if e.is_auth_failure() {
                    session.logout()?;
                    eprintln!("Session cleared; log in again.");
                }
                return Err(monitoring_error_message(&e).into());
            }
            if view.logs().is_empty() {
                println!("No log entries.");
            }
            for entry in view.logs() {
                println!("[{}] {} {}", entry.log_kind(), entry.timestamp, entry.body);
            }
        }
    }

    Ok(())
}

async fn register(
    api: &NotifyApi,
    session: &mut SessionStore,
    args: RegisterArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = RegisterView::new();
    let form = &mut view.form;
    form.confirm_password = args.confirm_password.unwrap_or_else(|| args.password.clone());
    form.username = args.username;
    form.password = args.password;
    form.email = args.email.unwrap_or_default();
    form.first_name = args.first_name.unwrap_or_default();
    form.last_name = args.last_name.unwrap_or_default();
    form.bio = args.bio.unwrap_or_default();
    form.notify_by_email = !args.no_email_notifications;
    form.notify_recommendations = !args.no_recommendations;
    form.notify_general = !args.no_general_notifications;
    form.is_staff = args.staff;
    form.is_superuser = args.superuser;

    if let Some(path) = args.photo {
        let photo = Photo::from_path(&path).await?;
        if !view.select_photo(photo) {
            return Err(view.error().unwrap_or("Invalid photo").into());
        }
    }

    if view.submit(api, session).await.is_none() {
        if !view.field_errors().is_empty() {
            return Err(view.field_errors().to_string().into());
        }
        return Err(view.error().unwrap_or("Registration failed").into());
    }
    if let Some(msg) = view.success() {
        println!("✅ {}", msg);
    }
    Ok(())
}

fn print_metrics(metrics: &notify_client::MonitoringMetrics) {
    println!("Last {}h", metrics.time_range_hours);
    println!("  Requests:      {}", format_number(metrics.total_requests));
    println!(
        "  Avg response:  {}",
        format_time(metrics.average_response_time_ms)
    );
    println!(
        "  Errors:        {} ({:.2}%)",
        format_number(metrics.error_count),
        metrics.error_rate_percent
    );

    if !metrics.status_distribution.is_empty() {
        println!();
        println!("Status codes:");
        for s in &metrics.status_distribution {
            println!("  {} {:>10}  {}", s.status_code, format_number(s.count), s.class().label());
        }
    }

    if !metrics.top_endpoints.is_empty() {
        println!();
        println!("Top endpoints:");
        for e in &metrics.top_endpoints {
            println!(
                "  {:<6} {:<40} {:>8} req  {:>10}  {} errors",
                e.method,
                e.endpoint,
                format_number(e.count),
                format_time(e.avg_response_time),
                e.error_count
            );
        }
    }

    if !metrics.recent_errors.is_empty() {
        println!();
        println!("Recent errors:");
        for e in &metrics.recent_errors {
            let when = if e.timestamp_formatted.is_empty() {
                &e.timestamp
            } else {
                &e.timestamp_formatted
            };
            println!(
                "  {} {} {} {} ({})",
                when,
                e.status_code,
                e.method,
                e.endpoint,
                e.user_username.as_deref().unwrap_or("anonymous")
            );
            if let Some(msg) = &e.error_message {
                println!("      {}", msg);
            }
        }
    }
}
