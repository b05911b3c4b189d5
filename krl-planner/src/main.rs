use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use krl_planner::config::AppConfig;
use krl_planner::occupancy::OccupancyModel;
use krl_planner::planner::InterchangeRules;
use krl_planner::timetable::load_path;
use krl_planner::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(path = %config.timetable_path.display(), "loading timetable");
    let timetable = match load_path(&config.timetable_path) {
        Ok(timetable) => timetable,
        Err(e) => {
            error!(path = %config.timetable_path.display(), "failed to load timetable: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        trains = timetable.len(),
        stations = timetable.all_stations().len(),
        "timetable loaded"
    );

    let occupancy = OccupancyModel::from_kind(config.estimator);
    info!(estimator = occupancy.name(), "occupancy model ready");

    let state = AppState::new(
        timetable,
        InterchangeRules::jabodetabek(),
        occupancy,
        config.search,
        &config.cache,
    );
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(addr = %config.bind, "KRL planner listening");
    info!("  GET  /health                   - Health check");
    info!("  GET  /stations                 - List stations");
    info!("  POST /journey/plan             - Plan a journey");
    info!("  GET  /trains/:id/occupancy     - Predict occupancy");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
