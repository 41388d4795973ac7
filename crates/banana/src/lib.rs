pub mod codec;
pub mod consumer;
pub mod errors;
pub mod intent;
pub mod models;
pub mod prompt_template;
pub mod providers;
pub mod relay;
pub mod search;
pub mod use_case;
