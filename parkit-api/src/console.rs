use std::io::{self, BufRead, BufReader, Stdin};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use parkit_core::{CoreError, CoreResult, InputReader};
use crate::state::AppState;

/// Operator input read line by line, from stdin in the shell binary
pub struct ConsoleInput<R> {
    reader: Mutex<R>,
}

impl ConsoleInput<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead + Send> ConsoleInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
        }
    }

    fn read_line(&self) -> CoreResult<String> {
        let mut reader = self
            .reader
            .lock()
            .map_err(|_| CoreError::InputError("console reader poisoned".to_string()))?;

        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .map_err(|e| CoreError::InputError(e.to_string()))?;
        if read == 0 {
            return Err(CoreError::InputError("end of input".to_string()));
        }
        Ok(line.trim().to_string())
    }

    pub fn read_number(&self) -> CoreResult<i32> {
        let line = self.read_line()?;
        line.parse()
            .map_err(|_| CoreError::ValidationError(format!("not a number: {:?}", line)))
    }
}

impl<R: BufRead + Send> InputReader for ConsoleInput<R> {
    fn read_selection(&self) -> CoreResult<i32> {
        println!("Please select vehicle type from menu");
        println!("1 CAR");
        println!("2 BIKE");
        self.read_number()
    }

    fn read_vehicle_registration(&self) -> CoreResult<String> {
        println!("Please type the vehicle registration number and press enter key");
        let registration = self.read_line()?;
        if registration.is_empty() {
            return Err(CoreError::ValidationError("Invalid input provided".to_string()));
        }
        Ok(registration)
    }
}

/// The operator menu loop. Returns on "Shutdown" or when input runs out.
pub async fn run<R>(state: &AppState, input: Arc<ConsoleInput<R>>)
where
    R: BufRead + Send + 'static,
{
    println!("Welcome to Parking System!");

    loop {
        println!("Please select an option. Simply enter the number to choose an action");
        println!("1 New Vehicle Entering - Allocate Parking Space");
        println!("2 Vehicle Exiting - Generate Ticket Price");
        println!("3 Shutdown System");

        let option = match input.read_number() {
            Ok(option) => option,
            Err(CoreError::InputError(msg)) => {
                info!("Console input closed: {}", msg);
                break;
            }
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match option {
            1 => process_incoming(state, input.clone()).await,
            2 => process_exiting(state, input.clone()).await,
            3 => {
                println!("Exiting from the system!");
                break;
            }
            _ => println!("Unsupported option. Please enter a number corresponding to the provided menu"),
        }
    }
}

async fn process_incoming(state: &AppState, input: Arc<dyn InputReader>) {
    match state.parking_service(input).process_incoming_vehicle().await {
        Ok(Some(ticket)) => {
            println!("Generated Ticket and saved in DB");
            println!("Please park your vehicle in spot number: {}", ticket.spot.id);
            println!(
                "Recorded in-time for vehicle number: {} is: {}",
                ticket.vehicle_registration_id, ticket.in_time
            );
        }
        Ok(None) => println!("No parking spot available for this vehicle type. Parking slots might be full"),
        Err(e) => {
            warn!("Unable to process incoming vehicle: {}", e);
            println!("Unable to process incoming vehicle: {}", e);
        }
    }
}

async fn process_exiting(state: &AppState, input: Arc<dyn InputReader>) {
    match state.parking_service(input).process_exiting_vehicle().await {
        Ok(ticket) => {
            println!("Please pay the parking fare: {:.2}", ticket.price);
            if let Some(out_time) = ticket.out_time {
                println!(
                    "Recorded out-time for vehicle number: {} is: {}",
                    ticket.vehicle_registration_id, out_time
                );
            }
        }
        Err(e) => {
            warn!("Unable to process exiting vehicle: {}", e);
            println!("Unable to process exiting vehicle: {}", e);
        }
    }
}
