use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod game;
pub mod health;
pub mod model;
pub mod navigation;
pub mod player;
pub mod session;
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
