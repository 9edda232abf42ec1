use anyhow::{anyhow, Error};
use serde_json::Value;
use slog::{info, warn, Logger};
use sounding::{
    generate_report, get_config_info, load_api_token, required_vars, setup_logger, Cli,
    JsonFetcher, LatestQuery, Radius, ReportOutcome, StationCollection, SynopticGateway,
};
use sounding_core::DEFAULT_RADIUS_FILE;
use std::path::{Path, PathBuf};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    let cli = get_config_info();
    let logger = setup_logger(&cli);

    info!(logger, "Synoptic Sounding starting...");
    info!(logger, "  Y axis: {}, X axis: {}", cli.y_axis(), cli.x_axis());
    info!(logger, "  Display: {}x{}", cli.width(), cli.height());

    let options = cli.report_options(&logger);
    let document = load_stations(&cli, &logger).await?;
    let mut collection = StationCollection::from_document(&document, &logger)?;

    match generate_report(&mut collection, &options, &logger)? {
        ReportOutcome::NoData => println!("No data available to display."),
        ReportOutcome::Chart(report) => {
            if !cli.no_viz {
                println!("{}", report.render());
            }
            if let Some(output) = cli.output.as_deref() {
                report.write_json(Path::new(output))?;
                info!(logger, "wrote chart summary to {}", output);
            }
        }
    }
    Ok(())
}

async fn load_stations(cli: &Cli, logger: &Logger) -> Result<Value, Error> {
    let gateway = SynopticGateway::new(
        logger.clone(),
        JsonFetcher::new(logger.clone(), cli.user_agent()),
        cli.base_url(),
        PathBuf::from(cli.cache_file()),
    );

    if let Some(file) = cli.file.as_deref() {
        info!(logger, "Data source: saved data from file ({})", file);
        return gateway.load_file(Path::new(file));
    }

    info!(logger, "Data source: live data from Synoptic API");
    let token = load_api_token(Path::new(&cli.token_file()))?;
    let query = LatestQuery {
        radius: resolve_radius(cli, logger)?,
        vars: required_vars(cli.y_axis(), cli.x_axis()),
        need_all_vars: cli.all_params,
        enable_wind: cli.enable_wind,
        all_stations: !cli.slim,
        within_minutes: cli.within(),
    };
    gateway.fetch_latest(&query, &token).await
}

/// A malformed `--radius` falls back to the default radius file.
fn resolve_radius(cli: &Cli, logger: &Logger) -> Result<Radius, Error> {
    if let Some(raw) = cli.radius.as_deref() {
        match raw.parse::<Radius>() {
            Ok(radius) => return Ok(radius),
            Err(e) => warn!(logger, "ignoring radius {:?}: {}", raw, e),
        }
    }
    Radius::from_file(Path::new(DEFAULT_RADIUS_FILE)).map_err(|e| {
        anyhow!(
            "no usable search radius; pass --radius lat,lon,miles or create {}: {:#}",
            DEFAULT_RADIUS_FILE,
            e
        )
    })
}
