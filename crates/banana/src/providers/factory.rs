use super::{base::Provider, configs::ProviderConfig, openai::OpenAiProvider};
use crate::errors::RelayError;

pub fn get_provider(config: ProviderConfig) -> Result<Box<dyn Provider + Send + Sync>, RelayError> {
    match config {
        ProviderConfig::OpenAi(openai_config) => Ok(Box::new(OpenAiProvider::new(openai_config)?)),
    }
}
