use axum::{
    http::header,
    response::{IntoResponse, Response},
};

pub const APOLOGY: &str = "Sorry, something went wrong. Please try again later.";
pub const NOT_UNDERSTOOD: &str = "Sorry, I didn't understand your message. Please try again.";

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Messaging-provider reply envelope carrying one text message.
pub fn render_twiml(message: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        escape_xml(message)
    )
}

pub fn twiml_response(message: &str) -> Response {
    ([(header::CONTENT_TYPE, "text/xml")], render_twiml(message)).into_response()
}
