pub mod backend;
pub mod openai;
pub mod prompt;

pub use backend::{GenerationBackend, TokenStream};
pub use openai::OpenAiBackend;
pub use prompt::PromptRequest;
