//! Command handlers. Each writes its human-readable result to `out`.

mod account;
mod booking;
mod driver;
mod routing;
mod status;

use std::io::Write;
use std::sync::Arc;

use rideline_core::error::{CoreError, StoreError};
use rideline_core::session::{FileStore, Session};
use rideline_services::{ServiceError, Services};
use rideline_tracking::{PollError, RetryPolicy};

use crate::args::{AssignCommand, Command, ConfirmationCommand, LocationCommand, RouteCommand, TripCommand, TripsCommand, VehicleCommand};
use crate::config::ClientConfig;

/// Errors a command can end with. Rendered verbatim to the user.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("Vehicle '{0}' not found")]
    VehicleNotFound(String),

    #[error("No trip details to send. Confirm a trip first.")]
    NoTripSummary,

    #[error("Invalid location: latitude {latitude}, longitude {longitude}")]
    InvalidLocation { latitude: f64, longitude: f64 },

    #[error("Gave up waiting for a driver: {0}")]
    GaveUp(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Everything a command needs: the service clients, the persisted
/// session and the status poll policy.
pub struct App {
    pub services: Services,
    pub session: Session,
    pub poll_policy: RetryPolicy,
}

impl App {
    pub fn new(services: Services, session: Session, poll_policy: RetryPolicy) -> Self {
        Self {
            services,
            session,
            poll_policy,
        }
    }

    /// Wire the real clients and the file-backed session.
    pub fn from_config(config: &ClientConfig) -> Result<Self, CliError> {
        let services = Services::new(&config.endpoints, config.request_timeout)?;
        let session = Session::new(Arc::new(FileStore::new(&config.session_file)));
        Ok(Self::new(services, session, config.poll_policy.clone()))
    }

    pub async fn run(&self, command: Command, out: &mut (dyn Write + Send)) -> Result<(), CliError> {
        match command {
            Command::Login {
                email,
                password,
                role,
            } => account::login(self, email, password, role, out).await,
            Command::Register(args) => account::register(self, args, out).await,

            Command::Trip(TripCommand::Create {
                pickup,
                destination,
                stops,
                persons,
            }) => booking::create_trip(self, &pickup, &destination, &stops, persons, out).await,
            Command::Trip(TripCommand::Show { trip_id }) => booking::show_trip(self, &trip_id, out).await,

            Command::Vehicles(VehicleCommand::List { trip }) => {
                booking::list_vehicles(self, trip.as_deref(), out).await
            }
            Command::Vehicles(VehicleCommand::Add {
                vehicle_type,
                quantity,
            }) => booking::add_vehicles(self, &vehicle_type, quantity, out).await,

            Command::Confirm { trip_id, vehicle } => {
                booking::confirm(self, &trip_id, vehicle.as_deref(), out).await
            }
            Command::Confirmations(ConfirmationCommand::List) => booking::list_confirmations(self, out).await,
            Command::Confirmations(ConfirmationCommand::Show { confirmation_id }) => {
                booking::show_confirmation(self, &confirmation_id, out).await
            }
            Command::Confirmations(ConfirmationCommand::Delete { confirmation_id }) => {
                booking::delete_confirmation(self, &confirmation_id, out).await
            }

            Command::Status { confirmation_id } => status::watch(self, confirmation_id.as_deref(), out).await,
            Command::DriverId { confirmation_id } => status::driver_id(self, &confirmation_id, out).await,

            Command::Assign(AssignCommand::Request { confirmation_id }) => {
                driver::request_assignment(self, &confirmation_id, out).await
            }
            Command::Assign(AssignCommand::Confirm {
                confirmation_id,
                driver_id,
                vehicle_no,
                vehicle_type,
                driver_name,
                phone,
            }) => {
                let confirm = rideline_core::assignment::AssignmentConfirm {
                    confirmation_id,
                    driver_id,
                    vehicle_no,
                    vehicle_type,
                    driver_name,
                    ph_no: phone,
                };
                driver::confirm_assignment(self, &confirm, out).await
            }
            Command::Assignments { driver_id } => driver::assignments(self, &driver_id, out).await,
            Command::Location(LocationCommand::Share {
                driver_id,
                latitude,
                longitude,
            }) => driver::share_location(self, driver_id, latitude, longitude, out).await,
            Command::Location(LocationCommand::Track { driver_id }) => {
                driver::track_location(self, &driver_id, out).await
            }

            Command::Trips(TripsCommand::Send {
                user_email,
                family_email,
            }) => routing::send_trip(self, &user_email, &family_email, out).await,
            Command::Trips(TripsCommand::List) => routing::list_trips(self, out).await,
            Command::Route(RouteCommand::Plan(args)) => routing::plan(self, args, out).await,
            Command::Route(RouteCommand::Show { trip_id }) => routing::show(self, &trip_id, out).await,
        }
    }
}
