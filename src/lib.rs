#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

use config::ConfigFairing;
use logging::LoggerFairing;
use model::Store;

/// Build the server, configuring the election from `Rocket.toml` and
/// `ROCKET_*` environment variables.
pub fn build() -> Rocket<Build> {
    mount(rocket::build().attach(ConfigFairing))
}

/// Build the server around an existing election store.
pub fn rocket_for_store(store: Store) -> Rocket<Build> {
    mount(rocket::build().manage(store))
}

fn mount(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .attach(LoggerFairing)
        .mount("/", api::routes())
        .register("/", api::catchers())
}
