use anyhow::{anyhow, Result};
use banana::consumer::RelayClient;
use banana::models::message::Message;
use banana::use_case::UseCase;

use super::{report_error, stream_to_terminal};

pub async fn execute(endpoint: &str, use_case: Option<UseCase>, input: &str) -> Result<()> {
    if input.trim().is_empty() {
        return Err(anyhow!("Nothing to send, the input is empty"));
    }

    let prompt = match use_case {
        Some(use_case) => use_case.prompt(input),
        None => input.to_string(),
    };

    let client = RelayClient::new(endpoint);
    let messages = [Message::user().with_text(prompt)];
    match stream_to_terminal(&client, &messages).await {
        Ok(_) => Ok(()),
        Err(e) => {
            report_error(&e);
            std::process::exit(1);
        }
    }
}
