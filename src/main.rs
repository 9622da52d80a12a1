use std::process::ExitCode;

use wxdash_core::{AppError, Config, NetworkError, UnitSystem};
use wxdash_weather::{HistoryStore, Metric, Sample, WeatherError, WeatherProvider};

const USAGE: &str = "usage: wxdash [--metric|--imperial] [--hours N] [CITY]...";

/// Default replay window, in samples.
const DEFAULT_HOURS: usize = 24;

struct Cli {
    cities: Vec<String>,
    units: Option<UnitSystem>,
    hours: usize,
}

fn parse_args<I: Iterator<Item = String>>(args: I) -> Result<Cli, String> {
    let mut cli = Cli {
        cities: Vec::new(),
        units: None,
        hours: DEFAULT_HOURS,
    };

    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--metric" => cli.units = Some(UnitSystem::Metric),
            "--imperial" => cli.units = Some(UnitSystem::Imperial),
            "--hours" => {
                let value = args.next().ok_or("--hours requires a value")?;
                cli.hours = value
                    .parse()
                    .map_err(|_| format!("invalid --hours value: {}", value))?;
            }
            flag if flag.starts_with('-') => {
                return Err(format!("unknown flag: {}\n{}", flag, USAGE));
            }
            city => cli.cities.push(city.to_string()),
        }
    }

    Ok(cli)
}

#[tokio::main]
async fn main() -> ExitCode {
    if std::env::args().skip(1).any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        eprintln!("{}", e.user_message());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<(), AppError> {
    wxdash_core::init().map_err(|e| AppError::Service(e.to_string()))?;

    let cli = parse_args(std::env::args().skip(1)).map_err(AppError::Service)?;

    let (mut config, _validation) = Config::load_validated()?;
    if let Some(units) = cli.units {
        config.weather.units = units;
    }

    let mut store = HistoryStore::open(config.history_path(), config.history.max_samples);
    tracing::info!(
        "Loaded {} cached samples from {}",
        store.len(),
        store.path().display()
    );

    let provider = WeatherProvider::new(&config.weather).map_err(|e| match e {
        WeatherError::Network(re) => AppError::Network(NetworkError::from(&re)),
        other => AppError::Service(other.to_string()),
    })?;

    let cities = if cli.cities.is_empty() {
        config.city_list()
    } else {
        cli.cities.clone()
    };

    let fetched = provider.fetch_all(&cities).await;
    if fetched.is_empty() {
        eprintln!("warning: no cities could be fetched; showing cached history only");
    }
    store.extend(fetched);

    let units = provider.units();

    println!("Current conditions");
    print_samples(
        store.latest_by_city().into_iter().map(|s| s.in_units(units)),
        units,
    );

    println!();
    println!("History (last {} samples, {})", cli.hours, units);
    print_samples(store.recent(cli.hours).map(|s| s.in_units(units)), units);

    println!();
    print_summary(&store, units);

    Ok(())
}

fn print_samples(samples: impl Iterator<Item = Sample>, units: UnitSystem) {
    println!(
        "{:<16} {:<20} {:>17} {:>13} {:>16} {:>17}  {}",
        "City",
        "Time",
        Metric::Temperature.label(units),
        Metric::Humidity.label(units),
        Metric::Pressure.label(units),
        Metric::WindSpeed.label(units),
        "Conditions",
    );

    let mut rows = 0usize;
    for sample in samples {
        println!(
            "{:<16} {:<20} {:>17.2} {:>13.0} {:>16.2} {:>17.2}  {}",
            sample.city,
            sample.timestamp,
            sample.temperature,
            sample.humidity,
            sample.pressure,
            sample.wind_speed,
            sample.weather_condition,
        );
        rows += 1;
    }

    if rows == 0 {
        println!("  (no data)");
    }
}

fn print_summary(store: &HistoryStore, units: UnitSystem) {
    if store.is_empty() {
        return;
    }

    println!("Summary over {} samples ({})", store.len(), units);
    for metric in Metric::ALL {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for sample in store.in_units(units) {
            let value = metric.value(&sample);
            min = min.min(value);
            max = max.max(value);
            sum += value;
            count += 1;
        }

        println!(
            "  {:<18} min {:>10.2}   mean {:>10.2}   max {:>10.2}",
            metric.label(units),
            min,
            sum / count as f64,
            max,
        );
    }
}
