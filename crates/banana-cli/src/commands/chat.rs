use anyhow::Result;
use banana::consumer::RelayClient;
use banana::errors::StreamError;
use banana::models::message::Message;
use banana::use_case::UseCase;
use console::style;
use strum::IntoEnumIterator;

use super::{report_error, stream_to_terminal};

/// The turns of one interactive chat, resent in full on every request
#[derive(Debug, Default)]
pub struct Conversation {
    use_case: Option<UseCase>,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(use_case: Option<UseCase>) -> Self {
        Self {
            use_case,
            messages: Vec::new(),
        }
    }

    /// Add the user's next turn; the use case template only wraps the opening turn
    pub fn push_user(&mut self, input: &str) -> &[Message] {
        let text = match (self.use_case, self.messages.is_empty()) {
            (Some(use_case), true) => use_case.prompt(input),
            _ => input.trim().to_string(),
        };
        self.messages.push(Message::user().with_text(text));
        &self.messages
    }

    /// Keep whatever the assistant produced, including the visible part of an
    /// interrupted answer
    pub fn record_reply(&mut self, result: &Result<String, StreamError>) {
        let text = match result {
            Ok(text) => text.as_str(),
            Err(StreamError::Interrupted { partial, .. }) => partial.trim(),
            Err(_) => return,
        };
        if !text.is_empty() {
            self.messages.push(Message::assistant().with_text(text));
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

pub async fn execute(endpoint: &str) -> Result<()> {
    cliclack::intro(style(" banana ").on_yellow().black())?;

    let mut select = cliclack::select("Which use case do you want to work on?");
    for use_case in UseCase::iter() {
        select = select.item(Some(use_case), use_case.title(), use_case.description());
    }
    let use_case: Option<UseCase> = select
        .item(None, "Free prompt", "Send your input as is")
        .interact()?;

    let client = RelayClient::new(endpoint);
    println!(
        "{}",
        style(format!("Streaming from {}. Type exit to quit.", client.endpoint())).dim()
    );

    let mut conversation = Conversation::new(use_case);
    loop {
        let input: String = cliclack::input("Input:")
            .placeholder("Describe your brand, a tweet, a product...")
            .interact()?;

        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("exit") {
            break;
        }

        println!();
        let messages = conversation.push_user(trimmed).to_vec();
        let result = stream_to_terminal(&client, &messages).await;
        if let Err(e) = &result {
            report_error(e);
        }
        conversation.record_reply(&result);
        println!();
    }

    cliclack::outro("Done")?;
    Ok(())
}
