//! The WanderBot assistant: persona texts, reply generation and the scripted
//! local provider.

pub mod prompts;
pub mod reply_generator;
pub mod scripted;

pub use reply_generator::ReplyGenerator;
pub use scripted::ScriptedGateway;
