use clap::Parser;
use pollen_sim_core::core_types::{Degrees, MetersPerSecond};
use pollen_sim_core::phenology::{flowering_species, validate_month};
use pollen_sim_core::solver::severity_level;
use pollen_sim_core::{
    evaluate_contributions, BatchOptions, DispersionModel, GeoPoint, ModelParameters, Outcome,
    PollenSource, Species, TargetGrid, TargetPoint, TerrainType, WeatherObservation,
    WeatherRecord,
};
use tracing_subscriber::EnvFilter;

/// Pollen dispersion demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "pollen-sim-demo")]
#[command(about = "Gaussian plume pollen dispersion demo", long_about = None)]
struct Args {
    /// Source latitude in degrees
    #[arg(long, default_value_t = 55.01)]
    lat: f64,

    /// Source longitude in degrees
    #[arg(long, default_value_t = 82.92)]
    lon: f64,

    /// Species name (Russian or Latin, e.g. "берёза" or "Pinus sylvestris")
    #[arg(short, long, default_value = "Берёза повислая")]
    species: String,

    /// Source height in meters (species default when omitted)
    #[arg(long)]
    height: Option<f64>,

    /// Crown diameter in meters (species default when omitted)
    #[arg(long)]
    crown: Option<f64>,

    /// Wind speed at 10 m in m/s
    #[arg(short, long, default_value_t = 3.5)]
    wind_speed: f64,

    /// Wind speed at 10 m in km/h; overrides --wind-speed
    #[arg(long)]
    wind_kmh: Option<f64>,

    /// Direction the wind blows from (0=North, 90=East)
    #[arg(long, default_value_t = 270.0)]
    wind_direction: f64,

    /// Temperature in °C
    #[arg(short, long, default_value_t = 20.0)]
    temperature: f64,

    /// Relative humidity in %
    #[arg(long, default_value_t = 50.0)]
    humidity: f64,

    /// Precipitation rate in mm/h
    #[arg(long, default_value_t = 0.0)]
    precipitation: f64,

    /// Sky description as a weather provider reports it ("clear sky", "scattered clouds")
    #[arg(long, default_value = "scattered clouds")]
    sky: String,

    /// Local hour of the observation (0-23)
    #[arg(long, default_value_t = 14)]
    hour: u32,

    /// Terrain around the source (open, suburban, urban)
    #[arg(long, default_value = "urban")]
    terrain: String,

    /// Calendar month; sources out of season are skipped in the grid run
    #[arg(short, long)]
    month: Option<u32>,

    /// TOML file overriding the model parameters
    #[arg(short, long)]
    params: Option<String>,

    /// Grid half-extent in meters
    #[arg(long, default_value_t = 1500.0)]
    grid_extent: f64,

    /// Grid spacing in meters
    #[arg(long, default_value_t = 250.0)]
    grid_spacing: f64,
}

const TRANSECT_DISTANCES: [f64; 8] = [10.0, 100.0, 300.0, 600.0, 1000.0, 2000.0, 3000.0, 5000.0];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Pollen Dispersion Demo ===\n");

    let params = match &args.params {
        Some(path) => {
            println!("Loading parameters from {path}");
            ModelParameters::load(path)?
        }
        None => ModelParameters::default(),
    };
    println!("Parameter set: {}", params.version);
    let model = DispersionModel::new(params)?;

    let wind_speed = args
        .wind_kmh
        .map_or(args.wind_speed, |kmh| *MetersPerSecond::from_km_per_hour(kmh));
    let weather = WeatherObservation::try_from(WeatherRecord {
        wind_speed: Some(wind_speed),
        wind_direction: Some(args.wind_direction),
        temperature: Some(args.temperature),
        humidity: Some(args.humidity),
        precipitation: Some(args.precipitation),
        description: Some(args.sky.clone()),
        hour: Some(args.hour),
    })?;
    let terrain = TerrainType::from_name(&args.terrain);

    let mut source = PollenSource::new(
        Species::from_name(&args.species),
        GeoPoint::new(args.lat, args.lon),
    );
    source.height = args.height;
    source.crown_diameter = args.crown;
    source.validate()?;

    println!(
        "Source: {:?} at ({:.5}, {:.5}), terrain {:?}",
        source.species, source.location.latitude, source.location.longitude, terrain
    );
    println!(
        "Weather: {:.1} m/s from {:.0}°, {:.1}°C, {:.0}% RH, {:.1} mm/h, {:?} ({:?})\n",
        *weather.wind_speed,
        *weather.wind_direction,
        *weather.temperature,
        *weather.relative_humidity,
        weather.precipitation_rate,
        weather.insolation,
        weather.time_of_day
    );

    if let Some(month) = args.month {
        let month = validate_month(month)?;
        let names: Vec<String> = flowering_species(model.params(), month)
            .iter()
            .map(ToString::to_string)
            .collect();
        if names.is_empty() {
            println!("Nothing flowers in month {month}\n");
        } else {
            println!("Flowering in month {month}: {}\n", names.join(", "));
        }
    }

    match model.source_conditions(&source, &weather, terrain) {
        Ok(conditions) => {
            let regime = if conditions.stability.is_unstable() {
                "unstable"
            } else if conditions.stability.is_stable() {
                "stable"
            } else {
                "neutral"
            };
            println!("Stability class: {} ({regime})", conditions.stability);
            println!(
                "Wind at source: {:.2} m/s (exponent {:.2}, height {:.1} m)",
                conditions.wind_at_source, conditions.wind_exponent, conditions.geometry.height
            );
            println!("Emission rate: {:.3} units/s\n", conditions.emission_rate);
        }
        Err(reason) => {
            println!("No plume: {reason}");
            return Ok(());
        }
    }

    print_transect(&model, &source, &weather, terrain)?;
    print_grid(args, &model, &source, &weather, terrain)?;

    Ok(())
}

fn print_transect(
    model: &DispersionModel,
    source: &PollenSource,
    weather: &WeatherObservation,
    terrain: TerrainType,
) -> Result<(), Box<dyn std::error::Error>> {
    let downwind: Degrees = weather.downwind_bearing();
    println!("Downwind transect ({:.0}°):", *downwind);
    println!(
        "{:>9} {:>8} {:>9} {:>9} {:>14}  severity",
        "dist (m)", "outcome", "σy (m)", "σz (m)", "C (units/m³)"
    );

    for distance in TRANSECT_DISTANCES {
        let target = TargetPoint::new(source.location.destination(downwind, distance));
        let result = model.evaluate(source, &target, weather, terrain)?;
        let outcome = match result.outcome {
            Outcome::Plume => "plume".to_string(),
            Outcome::NearSource => "near".to_string(),
            Outcome::BelowDetectionThreshold(reason) => reason.to_string(),
        };
        let (sigma_y, sigma_z) = result
            .diagnostics
            .map_or((f64::NAN, f64::NAN), |d| (d.sigmas.sigma_y, d.sigmas.sigma_z));
        println!(
            "{distance:>9.0} {outcome:>8} {sigma_y:>9.1} {sigma_z:>9.1} {:>14.6e}  {}",
            result.value,
            severity_level(result.value)
        );
    }
    println!();
    Ok(())
}

fn print_grid(
    args: &Args,
    model: &DispersionModel,
    source: &PollenSource,
    weather: &WeatherObservation,
    terrain: TerrainType,
) -> Result<(), Box<dyn std::error::Error>> {
    let grid = TargetGrid::new(source.location, args.grid_extent, args.grid_spacing);
    let targets = grid.points()?;
    let options = BatchOptions {
        month: args.month,
        max_range: None,
    };
    let contributions = evaluate_contributions(
        model,
        std::slice::from_ref(source),
        &targets,
        weather,
        terrain,
        options,
    )?;

    let mut totals = vec![0.0_f64; targets.len()];
    for contribution in &contributions {
        totals[contribution.target_index] += contribution.concentration;
    }

    let side = grid.side();
    println!(
        "Severity grid ({side}x{side}, {:.0} m spacing, north up, source at centre):",
        args.grid_spacing
    );
    // Rows run south to north; print the northernmost first
    for row in totals.chunks(side).rev() {
        let line: String = row
            .iter()
            .map(|&c| {
                if c > 0.0 {
                    char::from(b'0' + severity_level(c))
                } else {
                    '.'
                }
            })
            .collect();
        println!("  {line}");
    }
    println!(
        "\n{} of {} targets above the detection threshold",
        contributions.len(),
        targets.len()
    );
    Ok(())
}
