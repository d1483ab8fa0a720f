//! `codebridge query`: one-shot or interactive retrieval.

use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::output::TableFormatter;
use crate::domain::models::config::Config;
use crate::services::RagService;

use super::{open_service, EMPTY_STORE_HINT};

/// Handle the query command
///
/// With `text`, answers once. Without it, reads one question per line from
/// stdin until `exit`, `quit` or end of input.
pub async fn execute(
    config: &Config,
    text: Option<String>,
    k: Option<usize>,
    json: bool,
) -> Result<()> {
    let service = open_service(config).await?;

    if service.count().await.context("Failed to count stored chunks")? == 0 {
        eprintln!("{EMPTY_STORE_HINT}");
    }

    let result = match text {
        Some(text) => answer(&service, &text, k, json).await,
        None => interactive(&service, k, json).await,
    };

    service.close().await;
    result
}

async fn answer(service: &RagService, text: &str, k: Option<usize>, json: bool) -> Result<()> {
    let results = service
        .query(text, k)
        .await
        .context("Failed to query collection")?;

    if json {
        let body = serde_json::json!({
            "query": text,
            "results": results,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else if results.is_empty() {
        println!("No matching chunks found.");
    } else {
        println!("{}", TableFormatter::new().format_results(&results));
    }

    Ok(())
}

async fn interactive(service: &RagService, k: Option<usize>, json: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !json {
        println!("Ask about the indexed documentation. Type 'exit' or 'quit' to stop.");
    }

    loop {
        if !json {
            print!("\n> ");
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_exit_command(question) {
            break;
        }

        // A bad question should not end the session
        if let Err(err) = answer(service, question, k, json).await {
            eprintln!("Error: {err:#}");
        }
    }

    Ok(())
}

fn is_exit_command(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("how do I exit vim"));
    }
}
