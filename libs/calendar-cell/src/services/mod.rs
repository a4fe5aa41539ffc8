pub mod client;
pub mod proxy;
pub mod scheduler;
pub mod tools;
