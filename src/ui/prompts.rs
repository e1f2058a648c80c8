// Console messages and confirmations

use colored::Colorize;
use std::io::{self, Write};

/// Ask user for yes/no confirmation
pub fn confirm(message: &str) -> io::Result<bool> {
    print!("{} ", message.white().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Display a success message
pub fn success(message: &str) {
    println!("{}", message.green().bold());
}

/// Display an error message
pub fn error(message: &str) {
    println!("{}", message.red().bold());
}

/// Display a dimmed/secondary message
pub fn dimmed(message: &str) {
    println!("{}", message.dimmed());
}

/// Print a list of configuration problems with a hint on how to fix them
pub fn config_problems(problems: &[String]) {
    error("Configuration is incomplete:");
    for problem in problems {
        println!("  {} {}", "•".red(), problem);
    }
    println!();
    dimmed("Run 'glucmon config show' to review the current settings.");
}
