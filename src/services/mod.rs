pub mod prompt;
pub mod providers;
pub mod recommendations;

pub use providers::{gemini::GeminiProvider, GenerativeProvider};
