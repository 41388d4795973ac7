pub mod chat;
pub mod run;
pub mod use_cases;
pub mod version;

use std::io::Write;

use banana::consumer::RelayClient;
use banana::errors::StreamError;
use banana::models::message::Message;
use console::style;

/// Writes the growing text of a stream without repeating what is already on screen
#[derive(Default)]
pub struct StreamPrinter {
    printed: String,
}

impl StreamPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the part of `accumulated` that has not been printed yet.
    ///
    /// The final update is trimmed, so it may not extend what was printed; in that
    /// case nothing new is emitted.
    pub fn advance(&mut self, accumulated: &str) -> Option<String> {
        let suffix = accumulated.strip_prefix(self.printed.as_str())?;
        if suffix.is_empty() {
            return None;
        }
        let suffix = suffix.to_string();
        self.printed.push_str(&suffix);
        Some(suffix)
    }

    pub fn printed(&self) -> &str {
        &self.printed
    }
}

/// Stream the next turn of `messages` through the relay straight onto stdout
pub async fn stream_to_terminal(
    client: &RelayClient,
    messages: &[Message],
) -> Result<String, StreamError> {
    let mut printer = StreamPrinter::new();
    let mut stdout = std::io::stdout();

    let result = client
        .reply(messages, |accumulated| {
            if let Some(suffix) = printer.advance(accumulated) {
                let _ = write!(stdout, "{}", suffix);
                let _ = stdout.flush();
            }
        })
        .await;

    if !printer.printed().is_empty() {
        println!();
    }
    result
}

pub fn report_error(error: &StreamError) {
    match error {
        StreamError::Interrupted { reason, .. } => {
            eprintln!(
                "{} {}",
                style("The response above is incomplete:").yellow().bold(),
                reason
            );
        }
        StreamError::EmptyResult => {
            eprintln!("{}", style(error.to_string()).yellow());
        }
        _ => {
            eprintln!("{} {}", style("Error:").red().bold(), error);
            eprintln!(
                "{}",
                style("Please check your API key configuration, your available credits and your connection, then try again.")
                    .dim()
            );
        }
    }
}
