//! Query the map-data provider from the command line.
//!
//! ```text
//! spot-search spots --bounds 40.70,-74.02,40.76,-73.95 --categories park,cafe
//! spot-search cities --region CA
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use pawscout::domain::explore::{
    CategorySet, Coordinates, RegionCode, SpotSearchService, Viewport, distance_km,
    format_distance,
};
use pawscout::domain::ports::{ExploreQuery, SpotSearchRequest};
use pawscout::outbound::overpass::{DEFAULT_OVERPASS_ENDPOINT, OverpassHttpSource};

/// `spot-search` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "spot-search",
    about = "Look up dog-friendly spots or US cities via Overpass",
    version
)]
struct CliArgs {
    /// Overpass interpreter URL.
    #[arg(long, value_name = "url", default_value = DEFAULT_OVERPASS_ENDPOINT)]
    endpoint: Url,
    /// Transport timeout in seconds.
    #[arg(long = "timeout-secs", value_name = "seconds", default_value_t = 30)]
    timeout_secs: u64,
    /// Print JSON instead of tab-separated lines.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Spots inside a bounding box.
    Spots {
        /// Bounds as `south,west,north,east`.
        #[arg(long, value_name = "south,west,north,east", value_parser = parse_bounds)]
        bounds: Viewport,
        /// Comma-separated categories; defaults to all.
        #[arg(long, value_name = "list")]
        categories: Option<String>,
        /// Case-insensitive name filter.
        #[arg(long, default_value = "")]
        query: String,
        /// Label distances from `lat,lng`.
        #[arg(long, value_name = "lat,lng", value_parser = parse_point)]
        from: Option<Coordinates>,
    },
    /// Cities and towns in a US state or DC.
    Cities {
        #[arg(long, value_name = "code")]
        region: RegionCode,
    },
}

fn parse_numbers<const N: usize>(raw: &str) -> Result<[f64; N], String> {
    let values = raw
        .split(',')
        .map(str::trim)
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| format!("failed to parse number: {error}"))?;
    values
        .try_into()
        .map_err(|_| format!("expected exactly {N} comma-separated numbers"))
}

fn parse_bounds(raw: &str) -> Result<Viewport, String> {
    let [south, west, north, east] = parse_numbers::<4>(raw)?;
    Viewport::new(south, west, north, east).map_err(|error| error.to_string())
}

fn parse_point(raw: &str) -> Result<Coordinates, String> {
    let [lat, lng] = parse_numbers::<2>(raw)?;
    let point = Coordinates::new(lat, lng);
    if point.is_valid() {
        Ok(point)
    } else {
        Err("coordinates out of range".to_owned())
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let source = OverpassHttpSource::new(args.endpoint, Duration::from_secs(args.timeout_secs))
        .wrap_err("build Overpass client")?;
    let service = SpotSearchService::new(Arc::new(source));

    match args.command {
        Command::Spots {
            bounds,
            categories,
            query,
            from,
        } => {
            let categories = match categories {
                Some(raw) => CategorySet::parse_list(&raw).map_err(|error| eyre!(error))?,
                None => CategorySet::all(),
            };
            let request = SpotSearchRequest {
                viewport: bounds,
                categories,
                text: query,
            };
            let spots = service
                .search_spots(&request)
                .await
                .map_err(|error| eyre!("spot search failed: {error}"))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&spots)?);
                return Ok(());
            }
            for spot in spots {
                let distance = from
                    .map(|origin| format_distance(distance_km(origin, spot.coordinates)))
                    .unwrap_or_default();
                println!(
                    "{}\t{}\t{}\t{:.5},{:.5}\t{}",
                    spot.id,
                    spot.category,
                    spot.name,
                    spot.coordinates.lat,
                    spot.coordinates.lng,
                    distance
                );
            }
        }
        Command::Cities { region } => {
            let cities = service
                .cities_for_region(region)
                .await
                .map_err(|error| eyre!("city lookup failed: {error}"))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&cities)?);
                return Ok(());
            }
            for city in cities {
                println!(
                    "{}\t{:.5},{:.5}",
                    city.name, city.coordinates.lat, city.coordinates.lng
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_bounds_in_any_corner_order() {
        let viewport = parse_bounds("2, 3, 1, 4").expect("bounds");
        assert_eq!(viewport.south(), 1.0);
        assert_eq!(viewport.north(), 2.0);
    }

    #[rstest]
    #[case("1,2,3")]
    #[case("a,b,c,d")]
    #[case("1,1,1,2")]
    fn rejects_bad_bounds(#[case] raw: &str) {
        assert!(parse_bounds(raw).is_err());
    }

    #[test]
    fn parses_cities_subcommand() {
        let args = CliArgs::try_parse_from(["spot-search", "cities", "--region", "ny"])
            .expect("args parse");
        assert!(matches!(args.command, Command::Cities { region } if region.as_str() == "NY"));
    }
}
