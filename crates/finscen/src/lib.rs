//! Command-line front end for finscen_core: loads analysis requests, runs
//! them and writes the report.

pub mod logging;
pub mod request;

pub use logging::init_logging;
pub use request::{Overrides, RequestError, RequestFormat, load_request, write_report};
