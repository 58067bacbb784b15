pub mod calendar;
pub mod error;
pub mod habits;
pub mod middleware;
pub mod router;
pub mod service;
pub mod state;
