//! CLI adapter - interactive and single-message command line interface.

use std::io::{self, BufRead, Write};

use colored::*;
use tracing::debug;

use crate::agent::Agent;
use crate::Result;

/// CLI channel wrapping one agent for the whole session.
pub struct CliChannel {
    agent: Agent,
}

impl CliChannel {
    /// Create a new CLI channel.
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// Run a single message and return the reply.
    pub async fn run_once(&mut self, message: &str) -> String {
        self.agent.ask(message).await
    }

    /// Run the interactive REPL on stdin/stdout.
    pub async fn run_interactive(&mut self) -> Result<()> {
        let stdin = io::stdin();
        self.run_with(stdin.lock(), io::stdout()).await
    }

    /// REPL over arbitrary streams. Ends on EOF or `exit`/`quit`/`q`.
    pub async fn run_with<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        loop {
            write!(output, "{}: ", "You".blue().bold())?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // EOF
                break;
            }

            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            if matches!(text.to_lowercase().as_str(), "exit" | "quit" | "q") {
                writeln!(output, "👋 Bye!")?;
                break;
            }

            let reply = self.run_once(text).await;
            debug!("Transcript now has {} turns", self.agent.transcript().len());
            writeln!(output, "\n{}: {}\n", "Hearth".green().bold(), reply)?;
        }

        Ok(())
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}
