pub mod models;
pub mod handlers;
pub mod router;
pub mod services;

pub use models::*;
pub use router::patient_routes;
pub use services::{
    patient::PatientService,
    priority::score_priority,
    session::{InMemorySessionStore, SessionStore, SessionError, build_session_store, spawn_session_sweeper},
};
