//! Oracle application binary: terminal chat client.
//!
//! 1. Load configuration from TOML and apply CLI/env overrides
//! 2. Build a chat session against the configured backend
//! 3. Answer a one-shot query, or read queries from stdin until EOF
//!
//! Assistant text is printed as it streams. Ctrl-C during a response
//! cancels the stream; Ctrl-C at the prompt exits.

mod cli;
mod render;

use std::io::Write;

use clap::Parser;
use oracle_chat::{ChatSession, Role, SessionSnapshot, StreamStatus};
use oracle_core::config::OracleConfig;
use tokio::io::{AsyncBufReadExt, BufReader};

use cli::CliArgs;
use render::{card_line, TurnRenderer};

/// Content of the trailing assistant turn and whether it is still growing.
fn assistant_view(snapshot: &SessionSnapshot) -> (&str, bool) {
    let content = snapshot
        .turns
        .last()
        .filter(|turn| turn.role() == Role::Assistant)
        .map(|turn| turn.content())
        .unwrap_or_default();
    (content, snapshot.is_streaming)
}

/// Submit one query and render the answer as it arrives.
async fn ask(session: &mut ChatSession, query: &str) -> std::io::Result<()> {
    let mut updates = session.subscribe();
    let cancel = session.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling stream");
            cancel.cancel();
        }
    });

    let mut stdout = std::io::stdout();
    let mut renderer = TurnRenderer::new();

    let outcome = {
        let submit = session.submit(query);
        tokio::pin!(submit);
        loop {
            tokio::select! {
                outcome = &mut submit => break outcome,
                Ok(()) = updates.changed() => {
                    let snapshot = updates.borrow_and_update().clone();
                    let (content, streaming) = assistant_view(&snapshot);
                    renderer.update(&mut stdout, content, streaming)?;
                }
            }
        }
    };
    interrupt.abort();

    // Flush whatever the last coalesced update did not show.
    let snapshot = session.snapshot();
    let (content, streaming) = assistant_view(&snapshot);
    renderer.update(&mut stdout, content, streaming)?;
    renderer.finish(&mut stdout)?;

    if let Some(turn) = snapshot
        .turns
        .last()
        .filter(|turn| turn.role() == Role::Assistant)
    {
        for card in turn.cards() {
            writeln!(stdout, "{}", card_line(card))?;
        }
    }

    match outcome {
        Ok(StreamStatus::Cancelled) => writeln!(stdout, "(cancelled)")?,
        Ok(status) => tracing::debug!(status = ?status, "Response finished"),
        Err(e) => eprintln!("error: {}", e),
    }
    stdout.flush()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = OracleConfig::load_or_default(&config_file);
    if let Some(base_url) = args.resolve_base_url() {
        config.api.base_url = base_url;
    }
    let log_level = args.resolve_log_level(&config.general.log_level);

    // Tracing. Stdout belongs to the conversation.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting oracle v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    config.validate()?;
    let mut session = ChatSession::from_config(&config.api)?;
    tracing::info!(base_url = %config.api.base_url(), "Chat session ready");

    if let Some(query) = args.one_shot_query() {
        ask(&mut session, &query).await?;
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        ask(&mut session, query).await?;
    }

    println!();
    tracing::info!("Goodbye");
    Ok(())
}
