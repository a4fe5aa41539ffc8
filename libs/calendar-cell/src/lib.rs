// Calendar cell: provider client, `{method, params}` proxy, delegated event
// endpoints and the priority-based rescheduler.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::CalendarError;
pub use models::*;
pub use router::calendar_routes;
pub use services::{
    client::CalendarClient,
    scheduler::{extract_priority, plan_reschedule, reschedule_by_priority, time_range},
};
