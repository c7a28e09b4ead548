//! Interactive driver for the causette conversation engine.
//!
//! A minimal line-oriented consumer standing in for the real presentation
//! layer: type a message to send it, use `/`-commands to manage
//! conversations. Deferred replies land after their simulated delay; use
//! `/show` to display the active thread.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use causette::chat::{ChatEngine, ConversationId, EngineConfig};

const HELP: &str = "\
Commandes : /new, /list, /select <n>, /delete <n>, /show, /help, /quit
Tout autre texte est envoyé comme message.";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let engine = ChatEngine::from_config(EngineConfig::default())?;
    println!("{HELP}");
    print_messages(&engine).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {}
            "/quit" => break,
            "/help" => println!("{HELP}"),
            "/new" => {
                let conversation = engine.new_conversation().await;
                println!("créée : {}", conversation.id);
            }
            "/list" => print_list(&engine).await,
            "/show" => print_messages(&engine).await,
            _ if line.starts_with("/select ") => match parse_index(line, &engine).await {
                Some(id) => engine.select_conversation(id).await,
                None => println!("index inconnu"),
            },
            _ if line.starts_with("/delete ") => match parse_index(line, &engine).await {
                Some(id) => engine.delete_conversation(id).await,
                None => println!("index inconnu"),
            },
            text => {
                engine.send_message(text, None).await?;
                print_messages(&engine).await;
            }
        }
    }

    Ok(())
}

/// Resolve a `/select <n>` or `/delete <n>` list index to a conversation id.
async fn parse_index(line: &str, engine: &ChatEngine) -> Option<ConversationId> {
    let index: usize = line.split_whitespace().nth(1)?.parse().ok()?;
    let conversations = engine.conversations().await;
    conversations.get(index).map(|conversation| conversation.id)
}

async fn print_list(engine: &ChatEngine) {
    let active = engine.active_conversation().await;
    for (index, conversation) in engine.conversations().await.iter().enumerate() {
        let marker = if active == Some(conversation.id) {
            '*'
        } else {
            ' '
        };
        println!(
            "{marker} {index}: {} · {}",
            conversation.title, conversation.last_message
        );
    }
}

async fn print_messages(engine: &ChatEngine) {
    for message in engine.current_messages().await {
        println!("[{}] {}", message.sender, message.text);
    }
}
