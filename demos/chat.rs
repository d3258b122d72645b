//! Interactive WanderBot chat in the terminal
//!
//! Reads provider settings from the environment (or a `.env` file). Without
//! `OPENROUTER_API_KEY` the bot answers with offline guidance; pass
//! `--scripted` to use the built-in keyword replies instead.
//!
//! Type `/clear` to wipe the conversation, or an empty line to exit.
//!
//! Run with: cargo run --example chat -- [--scripted]

use anyhow::Context;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wanderbot::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let scripted = std::env::args().any(|arg| arg == "--scripted");

    let generator = if scripted {
        let gateway = Arc::new(ScriptedGateway::default());
        ReplyGenerator::new(vec![LlmBroker::new("scripted", gateway, None)])
    } else {
        let config = WanderbotConfig::from_env().context("reading configuration")?;
        ReplyGenerator::from_config(&config).context("building reply generator")?
    };

    let store = Arc::new(InMemoryMessageStore::new());
    let session = ChatSession::new(Identity::User(UserId::new()), store, Arc::new(generator));

    println!("WanderBot");
    println!("=========");
    println!("Type your messages and press Enter. /clear resets, empty line exits.\n");

    for message in session.open().await? {
        print_message(&message);
    }

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let line = line.trim();

        if line.is_empty() {
            break;
        }

        if line == "/clear" {
            session.clear_session().await?;
            println!("(conversation cleared)\n");
            for message in session.open().await? {
                print_message(&message);
            }
            continue;
        }

        match session.submit_message(line).await {
            Ok(turn) => print_message(&turn.assistant),
            Err(e) if e.is_transient() => eprintln!("{} Please try again.\n", e),
            Err(e) => eprintln!("Error: {}\n", e),
        }
    }

    Ok(())
}

fn print_message(message: &ChatMessage) {
    let speaker = match message.role {
        ChatRole::User => "You",
        ChatRole::Assistant => "WanderBot",
    };
    println!("{}: {}\n", speaker, message.text);
}
