use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::service::HabitService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub habits: HabitService,
}

impl AppStateInner {
    pub fn new(habits: HabitService) -> AppState {
        Arc::new(Self { habits })
    }
}

/// "Today" in the server's reference time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
