pub mod patient;
pub mod priority;
pub mod redis_session;
pub mod session;
