//! These models represent the objects passed between the browser, the relay and the upstream
//!
//! There are several related formats we need to interact with:
//! - ui messages with ordered text parts, sent from the interface to the relay
//! - line-delimited stream events, sent from the relay back to the interface
//! - openai chat messages, sent from the relay to the completion service
//!
//! Incoming JSON is converted into these structs right away; the upstream format is
//! produced on demand by the provider helpers.
pub mod event;
pub mod message;
pub mod role;
pub mod search;
