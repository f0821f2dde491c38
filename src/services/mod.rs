pub mod chat_relay;
pub mod gemini;
pub mod premium;
