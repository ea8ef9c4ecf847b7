pub mod health;
pub mod keyword_embedding;
pub mod root;
pub mod user_history;
