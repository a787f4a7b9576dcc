//! # Keynav Console
//!
//! Feeds key notation to the engine under the simulated host.

use cli_console::commands::CommandHandler;
use cli_console::interactive::InteractiveConsole;
use std::env;
use std::fs;
use std::io::{self, BufReader};
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    let script = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    let handler = CommandHandler::new(cli_console::bootstrap());
    let stdout = io::stdout();
    let result = match script {
        Some(path) => fs::File::open(&path).and_then(|file| {
            InteractiveConsole::new(handler)
                .with_echo(true)
                .run(BufReader::new(file), stdout.lock())
        }),
        None => InteractiveConsole::new(handler).run(io::stdin().lock(), stdout.lock()),
    };

    if let Err(e) = result {
        eprintln!("Console error: {}", e);
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Option<String>, String> {
    let mut script = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--script" | "-s" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --script".to_string());
                }
                script = Some(args[i].clone());
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(script)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Reads key notation (or .commands) line by line from stdin.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --script <FILE>      Read lines from FILE and echo them");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  echo ':b alpha<CR>' | {}", program);
    eprintln!("  {} --script demos/buffer.keys", program);
}
