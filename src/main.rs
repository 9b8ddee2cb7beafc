use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use std::process::ExitCode;

mod abi;
mod fixed_point;
mod geo;

use abi::Encoder;
use geo::Ellipsoid;

#[derive(Parser, Debug)]
#[command(name = "lld")]
#[command(about = "Geodesic distance between two points, scaled by 1e18 and ABI-encoded as an int256.", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Latitude of the first point, scaled by 1e18
    lat1: String,

    /// Longitude of the first point, scaled by 1e18
    lon1: String,

    /// Latitude of the second point, scaled by 1e18
    lat2: String,

    /// Longitude of the second point, scaled by 1e18
    lon2: String,

    #[arg(long, value_enum, default_value_t = Encoder::Cast)]
    encoder: Encoder,

    /// Binary used by the `cast` encoder
    #[arg(long, default_value_t = String::from("cast"))]
    cast_bin: String,

    /// Reference ellipsoid (clrk66, WGS84, GRS80)
    #[arg(long, default_value = "clrk66", value_parser = Ellipsoid::parse_arg)]
    ellps: Ellipsoid,

    /// Print intermediate values to stderr
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn descale_arg(name: &str, text: &str) -> Result<(Decimal, f64)> {
    let scaled = fixed_point::parse_scaled(text).with_context(|| format!("parsing {}", name))?;
    let degrees = fixed_point::descale(scaled).with_context(|| format!("descaling {}", name))?;
    let as_float = fixed_point::to_degrees(degrees).with_context(|| format!("converting {}", name))?;
    Ok((degrees, as_float))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Every argument is validated before anything is spawned.
    let (lat1_dec, lat1) = descale_arg("lat1", &cli.lat1)?;
    let (lon1_dec, lon1) = descale_arg("lon1", &cli.lon1)?;
    let (lat2_dec, lat2) = descale_arg("lat2", &cli.lat2)?;
    let (lon2_dec, lon2) = descale_arg("lon2", &cli.lon2)?;

    if cli.verbose {
        eprintln!(
            "Points ({}, {}) -> ({}, {}) on {}",
            lat1_dec, lon1_dec, lat2_dec, lon2_dec, cli.ellps.name
        );
    }

    let meters = geo::inverse_distance(&cli.ellps, lon1, lat1, lon2, lat2);
    let scaled = fixed_point::rescale_meters(meters).context("scaling distance")?;

    if cli.verbose {
        eprintln!("Distance (m): {}", meters);
        eprintln!("Scaled: {}", scaled);
    }

    let code = cli
        .encoder
        .encode(scaled, &cli.cast_bin, &mut std::io::stdout().lock())?;
    Ok(match code {
        0 => ExitCode::SUCCESS,
        c => ExitCode::from(u8::try_from(c).unwrap_or(1)),
    })
}
