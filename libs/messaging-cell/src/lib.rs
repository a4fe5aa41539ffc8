// Messaging cell: the inbound SMS/WhatsApp webhook, the conversation engine
// behind it and the dashboard assistant chat.

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;

pub use router::{assistant_routes, webhook_routes};
pub use services::reply::render_twiml;
pub use state::MessagingState;
