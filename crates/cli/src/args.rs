//! Command-line surface of the `rideline` binary.

use clap::{Args, Parser, Subcommand};
use rideline_core::roles::Role;
use rideline_core::route::Coordinate;

#[derive(Debug, Parser)]
#[command(name = "rideline", version, about = "Ride coordination client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and remember the role the auth service reports
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RIDELINE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "passenger")]
        role: Role,
    },
    /// Create an account
    Register(RegisterArgs),
    /// Create or inspect a trip request
    #[command(subcommand)]
    Trip(TripCommand),
    /// Vehicle catalogue
    #[command(subcommand)]
    Vehicles(VehicleCommand),
    /// Confirm a trip with a vehicle and remember the confirmation
    Confirm {
        trip_id: String,
        /// Vehicle id from `rideline vehicles list`; defaults to the last
        /// selected vehicle
        #[arg(long)]
        vehicle: Option<String>,
    },
    /// Wait until a driver is assigned to a confirmation
    Status {
        /// Defaults to the last confirmation created from this client
        #[arg(long)]
        confirmation_id: Option<String>,
    },
    /// Manage confirmations
    #[command(subcommand)]
    Confirmations(ConfirmationCommand),
    /// Driver and admin assignment actions
    #[command(subcommand)]
    Assign(AssignCommand),
    /// List all assignments of a driver
    Assignments { driver_id: String },
    /// Look up the driver assigned to a confirmation, once
    DriverId { confirmation_id: String },
    /// Share or follow a driver's position
    #[command(subcommand)]
    Location(LocationCommand),
    /// Trip dispatch records on the routing service
    #[command(subcommand)]
    Trips(TripsCommand),
    /// Driver route planning
    #[command(subcommand)]
    Route(RouteCommand),
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "RIDELINE_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long, default_value = "passenger")]
    pub role: Role,
    #[arg(long)]
    pub phone: String,
}

#[derive(Debug, Subcommand)]
pub enum TripCommand {
    Create {
        #[arg(long)]
        pickup: String,
        #[arg(long)]
        destination: String,
        /// Intermediate stop; repeat for several
        #[arg(long = "stop")]
        stops: Vec<String>,
        #[arg(long, default_value_t = 1)]
        persons: u32,
    },
    Show {
        trip_id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum VehicleCommand {
    /// List vehicles, with fare estimates when a trip is given
    List {
        #[arg(long)]
        trip: Option<String>,
    },
    Add {
        #[arg(long = "type")]
        vehicle_type: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfirmationCommand {
    List,
    Show { confirmation_id: String },
    Delete { confirmation_id: String },
}

#[derive(Debug, Subcommand)]
pub enum AssignCommand {
    /// Ask dispatch to assign a driver (admin)
    Request { confirmation_id: String },
    /// Accept a confirmation as a driver
    Confirm {
        confirmation_id: String,
        #[arg(long)]
        driver_id: String,
        #[arg(long)]
        vehicle_no: String,
        #[arg(long = "type")]
        vehicle_type: String,
        #[arg(long)]
        driver_name: String,
        #[arg(long)]
        phone: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum LocationCommand {
    Share {
        driver_id: String,
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Print the driver's position every few seconds until Ctrl-C
    Track { driver_id: String },
}

#[derive(Debug, Subcommand)]
pub enum TripsCommand {
    /// Send the last trip summary to the passenger and a family member
    Send {
        #[arg(long)]
        user_email: String,
        #[arg(long)]
        family_email: String,
    },
    List,
}

#[derive(Debug, Subcommand)]
pub enum RouteCommand {
    Plan(RoutePlanArgs),
    Show { trip_id: String },
}

#[derive(Debug, Args)]
pub struct RoutePlanArgs {
    #[arg(long)]
    pub pickup: String,
    /// `longitude,latitude`
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub pickup_coord: Coordinate,
    #[arg(long)]
    pub destination: String,
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub destination_coord: Coordinate,
    /// `name@longitude,latitude`; repeat for several
    #[arg(long = "stop", value_parser = parse_stop, allow_hyphen_values = true)]
    pub stops: Vec<(String, Coordinate)>,
    #[arg(long, default_value_t = 1)]
    pub persons: u32,
    #[arg(long = "type")]
    pub vehicle_type: String,
    #[arg(long, default_value_t = 0.0)]
    pub price: f64,
}

/// Parse `longitude,latitude`.
pub fn parse_coordinate(raw: &str) -> Result<Coordinate, String> {
    let (lng, lat) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected 'longitude,latitude', got '{raw}'"))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("invalid longitude '{lng}'"))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude '{lat}'"))?;
    if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
        return Err(format!("coordinate out of range: '{raw}'"));
    }
    Ok([lng, lat])
}

fn parse_stop(raw: &str) -> Result<(String, Coordinate), String> {
    let (name, coord) = raw
        .rsplit_once('@')
        .ok_or_else(|| format!("expected 'name@longitude,latitude', got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("stop name is empty".to_string());
    }
    Ok((name.to_string(), parse_coordinate(coord)?))
}
