//! `freebusy` CLI — turn calendar free/busy data into shareable availability.
//!
//! ## Usage
//!
//! ```sh
//! # Try it without a calendar (synthetic busy times)
//! freebusy generate --demo
//!
//! # Query Google Calendar with an access token from your OAuth flow
//! FREEBUSY_ACCESS_TOKEN=ya29... freebusy generate --format markdown
//!
//! # Five weekdays, 45-minute meetings, written to a file
//! freebusy generate --days 5 --duration 45 --format html -o availability.html
//!
//! # Use a settings file and inspect the effective settings
//! freebusy generate --config ~/.config/freebusy.toml
//! freebusy settings show --config ~/.config/freebusy.toml
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, ensure, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use freebusy_engine::{
    AvailabilityGenerator, AvailabilityResult, BusyTimeSource, ClientProvider, DemoBusySource,
    DemoClientProvider, GenerationOptions, GoogleFreeBusySource, MeetingDuration, Settings,
    StaticTokenProvider, MAX_DATE_RANGE_DAYS,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a Google OAuth access token.
const ACCESS_TOKEN_VAR: &str = "FREEBUSY_ACCESS_TOKEN";

#[derive(Parser)]
#[command(
    name = "freebusy",
    version,
    about = "Generate shareable meeting availability from your calendar"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate availability for the upcoming days
    Generate(GenerateArgs),
    /// Inspect, validate or export settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the effective settings as TOML
    Show {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Check a settings file and report the first problem
    Validate { path: PathBuf },
    /// Print the effective settings as JSON for import elsewhere
    Export {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Settings file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Use synthetic busy times instead of querying a calendar
    #[arg(long)]
    demo: bool,
    /// Number of dates to offer
    #[arg(long)]
    days: Option<u32>,
    /// First bookable hour (0-23)
    #[arg(long)]
    start_hour: Option<u32>,
    /// Hour by which the last meeting must end (0-24)
    #[arg(long)]
    end_hour: Option<u32>,
    /// Meeting length in minutes (15, 30, 45 or 60)
    #[arg(long)]
    duration: Option<u32>,
    /// IANA timezone, e.g. America/New_York
    #[arg(long)]
    timezone: Option<String>,
    /// Offer Saturdays
    #[arg(long)]
    saturday: bool,
    /// Offer Sundays
    #[arg(long)]
    sunday: bool,
    /// Event title used in booking links
    #[arg(long)]
    title: Option<String>,
    /// Attendee email added to booking links
    #[arg(long)]
    email: Option<String>,
    /// Conferencing link placed in event details
    #[arg(long)]
    zoom_link: Option<String>,
    /// Calendar to query
    #[arg(long, default_value = "primary")]
    calendar: String,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Plain,
    Markdown,
    Html,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate(args).await?,
        Commands::Settings { action } => match action {
            SettingsAction::Show { config } => {
                let settings = load_settings(config.as_ref())?;
                print!("{}", settings.to_toml_string()?);
            }
            SettingsAction::Validate { path } => {
                Settings::load(&path)
                    .with_context(|| format!("Invalid settings file: {}", path.display()))?;
                println!("{}: ok", path.display());
            }
            SettingsAction::Export { config } => {
                let settings = load_settings(config.as_ref())?;
                println!("{}", settings.to_json_pretty()?);
            }
        },
    }

    Ok(())
}

async fn generate(args: GenerateArgs) -> Result<()> {
    let settings = load_settings(args.config.as_ref())?;
    let options = build_options(&settings, &args)?;
    let timeout = Duration::from_secs(settings.behavior.request_timeout_secs);
    debug!(
        demo = args.demo,
        days = options.days,
        timezone = %options.timezone,
        "starting generation"
    );

    let result = if args.demo {
        let generator = AvailabilityGenerator::new(
            DemoClientProvider,
            DemoBusySource::new(options.weekends),
        );
        run(&generator, &options, timeout).await?
    } else {
        let generator = AvailabilityGenerator::new(
            StaticTokenProvider::from_env(ACCESS_TOKEN_VAR),
            GoogleFreeBusySource::default().with_calendar(&args.calendar),
        );
        run(&generator, &options, timeout).await.with_context(|| {
            format!(
                "Set {} to a Google Calendar access token, or pass --demo",
                ACCESS_TOKEN_VAR
            )
        })?
    };

    let rendered = match args.format {
        OutputFormat::Plain => result.formats.plain,
        OutputFormat::Markdown => result.formats.markdown,
        OutputFormat::Html => result.formats.html,
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
    };

    write_output(args.output.as_ref(), &rendered)
}

async fn run<A, S>(
    generator: &AvailabilityGenerator<A, S>,
    options: &GenerationOptions,
    timeout: Duration,
) -> Result<AvailabilityResult>
where
    A: ClientProvider,
    S: BusyTimeSource,
{
    tokio::time::timeout(timeout, generator.generate(options))
        .await
        .map_err(|_| anyhow!("Generation timed out after {}s", timeout.as_secs()))?
        .context("Failed to generate availability")
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings: {}", path.display())),
        None => Ok(Settings::default()),
    }
}

/// Settings first, then any command-line overrides.
fn build_options(settings: &Settings, args: &GenerateArgs) -> Result<GenerationOptions> {
    let mut options = settings.generation_options()?;

    if let Some(days) = args.days {
        ensure!(
            (1..=MAX_DATE_RANGE_DAYS).contains(&days),
            "Date range must be between 1 and {} days (got {})",
            MAX_DATE_RANGE_DAYS,
            days
        );
        options.days = days;
    }
    if let Some(hour) = args.start_hour {
        options.business_hours_start = hour;
    }
    if let Some(hour) = args.end_hour {
        options.business_hours_end = hour;
    }
    if let Some(minutes) = args.duration {
        options.duration = MeetingDuration::try_from(minutes)?;
    }
    if let Some(tz) = &args.timezone {
        options.timezone = tz.clone();
    }
    options.weekends.saturday |= args.saturday;
    options.weekends.sunday |= args.sunday;
    if let Some(title) = &args.title {
        options.meeting.title = title.clone();
    }
    if let Some(email) = &args.email {
        options.meeting.attendee_email = Some(email.clone());
    }
    if let Some(link) = &args.zoom_link {
        options.meeting.conference_link = Some(link.clone());
    }

    Ok(options)
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}
