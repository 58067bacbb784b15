pub mod api;
pub mod calendar;
pub mod emoji;
pub mod models;
