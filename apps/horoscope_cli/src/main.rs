mod input;
mod text;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use horoscope::aspects::AspectSettings;
use horoscope::ephemeris::HouseSystem;
use horoscope::report::ReportSettings;
use horoscope::{build_provider, Engine, EngineOptions, ProviderKind, ScoringPolicy};
use horoscope_config::HoroscopeSettings;
use input::{birth_moment, parse_now, BirthInput};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "horoscope", author, version, about)]
struct Cli {
    /// Settings file (default: configs/horoscope.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Indent the JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    /// Print a readable summary instead of JSON.
    #[arg(long, global = true, conflicts_with = "pretty")]
    text: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a natal chart and print it as JSON.
    Natal(BirthArgs),
    /// Compute the natal chart, then the daily transit report for it.
    Daily {
        #[command(flatten)]
        birth: BirthArgs,

        /// Report instant as RFC 3339 (default: now).
        #[arg(long)]
        now: Option<String>,
    },
}

#[derive(Args, Debug)]
struct BirthArgs {
    /// Birth date, YYYY-MM-DD.
    #[arg(long)]
    date: NaiveDate,

    /// Birth time HH:MM[:SS]; omit when unknown.
    #[arg(long)]
    time: Option<String>,

    /// Latitude in degrees, north positive.
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in degrees, east positive.
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// IANA timezone, e.g. Europe/Moscow.
    #[arg(long, conflicts_with = "offset")]
    tz: Option<String>,

    /// UTC offset, e.g. +03:00.
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<String>,

    /// placidus or whole_sign (default from config).
    #[arg(long)]
    house_system: Option<String>,
}

fn engine_from_settings(settings: &HoroscopeSettings) -> anyhow::Result<Engine> {
    let kind: ProviderKind = settings.ephemeris.provider.parse()?;
    let provider = build_provider(kind, settings.ephemeris.path.clone())
        .with_context(|| format!("Failed to start '{}' ephemeris", settings.ephemeris.provider))?;
    let aspects = AspectSettings::from_orb_map(&settings.orbs, settings.chart.include_quincunx)
        .context("Invalid [orbs] table")?;
    let options = EngineOptions {
        aspects,
        policy: ScoringPolicy::default(),
        report: ReportSettings {
            top_n: settings.report.top_n,
            max_items_per_section: settings.report.max_items_per_section,
        },
        timeout: Duration::from_millis(settings.ephemeris.timeout_ms),
    };
    Ok(Engine::with_options(provider, options))
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings = horoscope_config::load_settings(cli.config.as_deref())?;
    match &settings.source {
        Some(path) => log::debug!("settings from {}", path.display()),
        None => log::debug!("no config file found, using defaults"),
    }
    let engine = engine_from_settings(&settings)?;
    log::debug!("ephemeris provider: {}", engine.provider_name());

    let (birth, now) = match &cli.command {
        Command::Natal(birth) => (birth, None),
        Command::Daily { birth, now } => (birth, Some(parse_now(now.as_deref())?)),
    };
    let house_system: HouseSystem = birth
        .house_system
        .as_deref()
        .unwrap_or(&settings.chart.house_system)
        .parse()?;
    let moment = birth_moment(BirthInput {
        date: birth.date,
        time: birth.time.as_deref(),
        lat: birth.lat,
        lon: birth.lon,
        tz: birth.tz.as_deref(),
        offset: birth.offset.as_deref(),
        house_system,
    })?;

    let chart = engine
        .natal_chart(&moment)
        .await
        .context("Natal chart computation failed")?;

    match now {
        None if cli.text => {
            print!("{}", text::natal_text(&chart));
            Ok(())
        }
        None => print_json(&chart, cli.pretty),
        Some(now) => {
            let report = engine
                .daily_report(&chart, now)
                .await
                .context("Daily report computation failed")?;
            if cli.text {
                print!("{}", text::report_text(&report));
                Ok(())
            } else {
                print_json(&report, cli.pretty)
            }
        }
    }
}
