pub mod assistant;
pub mod conversation;
pub mod heuristics;
pub mod reply;
pub mod triage;
