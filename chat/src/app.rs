use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use std::io::{self, Write};
use tracing::{debug, info};

use crate::api_client::ClaraClient;
use crate::output::TerminalView;
use crate::render::render;
use crate::session::{ChatSession, Key};

/// Sends a question that the session accepted and records the outcome.
pub async fn exchange(session: &mut ChatSession, client: &ClaraClient, question: &str) {
    debug!("Sending question to Clara: {}", question);
    let outcome = client.ask(question).await;
    session.complete(outcome, Local::now());
}

/// Runs a single query, printing the question and Clara's answer
pub async fn run_single_query(question: String, client: &ClaraClient) -> Result<()> {
    info!("Running single query: {}", question);

    let mut session = ChatSession::new();
    let mut view = TerminalView::new();
    session.set_input(question);
    let Some(question) = session.key_press(Key::Enter, false, Local::now()) else {
        println!("{}", "Nothing to ask: the question is empty.".yellow());
        return Ok(());
    };
    view.draw(&render(&session));

    exchange(&mut session, client, &question).await;
    view.draw(&render(&session));

    Ok(())
}

/// Runs an interactive chat session against the Query Service
pub async fn run_interactive_chat(client: &ClaraClient) -> Result<()> {
    println!("Chatting with Clara at {}.", client.endpoint());
    println!("Type 'exit' or 'quit' to end the session.");
    println!();

    let mut session = ChatSession::new();
    let mut view = TerminalView::new();

    loop {
        print!("{}: ", "You".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = io::stdin()
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            println!("Exiting chat session.");
            break;
        }

        session.set_input(line.trim_end_matches(['\r', '\n']));
        let Some(question) = session.key_press(Key::Enter, false, Local::now()) else {
            continue;
        };
        view.draw(&render(&session));

        exchange(&mut session, client, &question).await;
        view.draw(&render(&session));
    }

    Ok(())
}
