pub mod errors;
pub mod extract;
pub mod routes;
pub mod startup;

pub use routes::AppState;
pub use startup::{build_app, run, serve};
