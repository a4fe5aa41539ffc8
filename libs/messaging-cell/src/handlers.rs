use std::sync::Arc;

use axum::{
    extract::State,
    response::Response,
    Extension, Form, Json,
};
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::{auth::User, error::AppError};

use crate::models::{AssistantRequest, AssistantResponse, InboundMessage};
use crate::services::{
    assistant::AssistantAgent,
    conversation::ConversationService,
    reply::{twiml_response, APOLOGY},
};
use crate::state::MessagingState;

/// Always answers 200 with a reply envelope so the provider does not retry.
pub async fn inbound_webhook(
    State(state): State<MessagingState>,
    Form(inbound): Form<InboundMessage>,
) -> Response {
    let conversation = ConversationService::new(&state);

    let reply = match conversation.handle(&inbound.body, &inbound.from).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Failed to handle inbound message: {:#}", e);
            APOLOGY.to_string()
        }
    };

    twiml_response(&reply)
}

pub async fn assistant_chat(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<AssistantRequest>,
) -> Result<Json<AssistantResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message is required".to_string()));
    }
    debug!("Assistant chat from {}", user.id);

    let agent = AssistantAgent::new(&config);
    let response = agent.process(&request.message, request.conversation_history).await;
    Ok(Json(response))
}
