//! Terminal output helpers: header, status line and step markers.

use colored::*;
use terminal_size::{Width, Height, terminal_size};

use crate::agent::BackendStatus;

fn rule() -> String {
    let (width, _) = terminal_size().unwrap_or((Width(80), Height(24)));
    "─".repeat(width.0 as usize)
}

pub fn print_header(model: &str, base_url: &str) {
    let line = rule();
    println!("{}", line.black().bold());

    let name = "Hearth".yellow().bold();
    let version = format!("v{}", env!("CARGO_PKG_VERSION")).black().bold();
    println!("  🔥 {} {}", name, version);

    let info = format!("  {}  •  {}", model, base_url).cyan();
    println!("{}", info);

    if let Ok(path) = std::env::current_dir() {
        let path_str = path.to_string_lossy().black().bold();
        println!("  {}", path_str);
    }

    println!("{}", line.black().bold());
}

pub fn print_header_with_subtitle(subtitle: &str) {
    let line = rule();
    println!("{}", line.black().bold());
    println!("  🔥 {}  {}", "Hearth".yellow().bold(), subtitle.cyan());
    println!("{}", line.black().bold());
}

/// One-line summary of a backend health check.
pub fn format_status(status: &BackendStatus) -> String {
    if status.ok {
        let models = if status.models.is_empty() {
            "No models found".to_string()
        } else {
            status.models.join(", ")
        };
        format!("Ollama: connected • Models: {}", models)
    } else {
        format!(
            "Ollama: unavailable • {}",
            status.error.as_deref().unwrap_or("unknown error")
        )
    }
}

pub fn print_status(status: &BackendStatus) {
    let line = format_status(status);
    if status.ok {
        print_success(&line);
    } else {
        print_error(&line);
    }
}

pub fn print_step(msg: &str) {
    println!("  {} {}", "•".green(), msg);
}

pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green().bold(), msg.green());
}

pub fn print_warning(msg: &str) {
    println!("  {} {}", "⚠️ ".yellow().bold(), msg.yellow());
}

pub fn print_error(msg: &str) {
    println!("  {} {}", "❌".red().bold(), msg.red());
}

pub fn print_thinking(msg: &str) {
    println!("  {} {}...", "∴".magenta(), msg);
}
