//! Headless scenario runner
//!
//! Loads a JSON scenario (simulation config plus the airline's opening
//! moves), runs it for a number of simulated hours and prints one summary
//! line per day.

use airline_simulator_core_rs::models::gate::{GateType, TimeWindow};
use airline_simulator_core_rs::{Orchestrator, OrchestratorConfig};
use clap::Parser;
use serde::Deserialize;
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Airline operations simulator
#[derive(Parser, Debug)]
#[command(name = "airline-sim")]
#[command(about = "Run an airline operations scenario and print daily summaries")]
struct Args {
    /// Scenario file (JSON)
    #[arg(long, short = 's')]
    scenario: PathBuf,

    /// Simulated hours to run
    #[arg(long, default_value_t = 168)]
    hours: usize,

    /// Override the scenario's RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write a checkpoint here after the run
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Resume from a checkpoint written by a previous run
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Print the final passenger statistics as JSON
    #[arg(long)]
    passenger_stats: bool,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    simulation: OrchestratorConfig,

    #[serde(default)]
    gate_purchases: Vec<GatePurchase>,

    #[serde(default)]
    routes: Vec<RouteSetup>,
}

#[derive(Debug, Deserialize)]
struct GatePurchase {
    location_id: String,
    gate_type: GateType,
}

#[derive(Debug, Deserialize)]
struct RouteSetup {
    origin: String,
    destination: String,
    price_per_passenger: i64,

    #[serde(default)]
    vehicles: Vec<VehicleSetup>,

    #[serde(default)]
    bookings: Vec<BookingSetup>,
}

#[derive(Debug, Deserialize)]
struct VehicleSetup {
    vehicle_id: String,
    daily_flights: u32,
}

#[derive(Debug, Deserialize)]
struct BookingSetup {
    vehicle_id: String,
    location_id: String,

    #[serde(default)]
    preferred_type: Option<GateType>,

    windows: Vec<TimeWindow>,
}

/// Apply the scenario's opening moves; failures are logged and skipped
fn set_up(orchestrator: &mut Orchestrator, scenario: &Scenario) {
    for purchase in &scenario.gate_purchases {
        if let Err(e) = orchestrator.purchase_gate(&purchase.location_id, purchase.gate_type) {
            warn!(location = %purchase.location_id, "gate purchase failed: {}", e);
        }
    }

    for setup in &scenario.routes {
        let route_id = match orchestrator.create_route(
            &setup.origin,
            &setup.destination,
            setup.price_per_passenger,
        ) {
            Ok(id) => id,
            Err(e) => {
                warn!(origin = %setup.origin, destination = %setup.destination, "route creation failed: {}", e);
                continue;
            }
        };

        for vehicle in &setup.vehicles {
            if let Err(e) = orchestrator.assign_vehicle_to_route(
                &route_id,
                &vehicle.vehicle_id,
                vehicle.daily_flights,
            ) {
                warn!(route = %route_id, vehicle = %vehicle.vehicle_id, "assignment failed: {}", e);
            }
        }

        for booking in &setup.bookings {
            if let Err(e) = orchestrator.book_gate_slot(
                &route_id,
                &booking.vehicle_id,
                &booking.location_id,
                booking.preferred_type,
                booking.windows.clone(),
            ) {
                warn!(route = %route_id, location = %booking.location_id, "booking failed: {}", e);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut scenario: Scenario = serde_json::from_str(&std::fs::read_to_string(&args.scenario)?)?;
    if let Some(seed) = args.seed {
        scenario.simulation.rng_seed = seed;
    }

    let mut orchestrator = match &args.resume {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Orchestrator::load_state(scenario.simulation.clone(), &json)?
        }
        None => {
            let mut orchestrator = Orchestrator::new(scenario.simulation.clone())?;
            set_up(&mut orchestrator, &scenario);
            orchestrator
        }
    };

    info!(
        start_tick = orchestrator.current_tick(),
        hours = args.hours,
        routes = orchestrator.get_all_routes().len(),
        "running scenario"
    );

    for _ in 0..args.hours {
        let result = orchestrator.tick()?;
        if let Some(day) = result.end_of_day {
            println!(
                "day {:>4} | revenue {:>10} | balance {:>12} | waiting {:>8} | pruned {:>4}",
                day.day, day.revenue_posted, day.balance, day.waiting_passengers, day.aggregates_pruned
            );
        }
        // The CLI reports through daily summaries and tracing only
        orchestrator.take_events();
    }

    for route in orchestrator.get_all_routes() {
        if let Some(stats) = orchestrator.get_route_statistics(route.id()) {
            println!(
                "{:<12} {:<10} flights {:>5} | revenue {:>10} | load factor {:.2} (recent {:.2})",
                stats.route_id,
                stats.code,
                stats.total_flights,
                stats.total_revenue,
                stats.average_load_factor,
                stats.recent_load_factor
            );
        }
    }

    if args.passenger_stats {
        let stats = orchestrator.get_passenger_statistics(10);
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    if let Some(path) = &args.checkpoint {
        std::fs::write(path, orchestrator.save_state()?)?;
        info!(path = %path.display(), tick = orchestrator.current_tick(), "checkpoint written");
    }

    Ok(())
}
