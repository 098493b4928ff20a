// src/cli/shell.rs — Interactive session
//
// One session for the whole REPL: lookups feed `contact` and `log`, and the
// messaging tab is reused across stores.

use std::path::PathBuf;

use super::render;
use crate::outreach::{upload, Notice, OutreachSession};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Upload {
        rollout: Option<PathBuf>,
        stores: Option<PathBuf>,
    },
    Lookup(String),
    Contact,
    Log,
    Report(Option<PathBuf>),
    Status,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  upload <rollout|-> <lojas|->   upload spreadsheets (- skips one)
  lookup <number>                look a store up
  contact                        open the messaging tab on the prepared message
  log                            register the send for the last lookup
  report [file]                  download the send-log report
  status                         show the last lookup
  quit";

fn optional_path(arg: Option<&str>) -> Option<PathBuf> {
    arg.filter(|a| *a != "-").map(PathBuf::from)
}

fn parse(line: &str) -> Result<ShellCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Err(String::new());
    };
    let cmd = cmd.trim_start_matches('/');
    match cmd {
        "upload" => Ok(ShellCommand::Upload {
            rollout: optional_path(parts.next()),
            stores: optional_path(parts.next()),
        }),
        "lookup" | "buscar" => Ok(ShellCommand::Lookup(parts.collect::<Vec<_>>().join(" "))),
        "contact" | "send" => Ok(ShellCommand::Contact),
        "log" => Ok(ShellCommand::Log),
        "report" => Ok(ShellCommand::Report(parts.next().map(PathBuf::from))),
        "status" => Ok(ShellCommand::Status),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    eprint!("> ");
    io::stderr().flush().ok();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(_) => None,
    }
}

/// Run the REPL until `quit` or EOF.
pub async fn run_shell(mut session: OutreachSession) -> anyhow::Result<()> {
    eprintln!(
        "rollout-outreach v{} | messaging tab '{}' | type 'help'\n",
        env!("CARGO_PKG_VERSION"),
        session.tabs().name(),
    );

    while let Some(input) = read_input() {
        let command = match parse(&input) {
            Ok(c) => c,
            Err(e) if e.is_empty() => continue,
            Err(e) => {
                render::notice(&Notice::warning(e));
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => eprintln!("{HELP}"),
            ShellCommand::Status => render::view(session.view()),
            ShellCommand::Upload { rollout, stores } => {
                match upload::upload_request(rollout.as_deref(), stores.as_deref()).await {
                    Ok(request) => render::notice(&session.upload(request).await),
                    Err(e) => render::notice(&Notice::from_error(&e)),
                }
            }
            ShellCommand::Lookup(raw) => match session.lookup(&raw).await {
                Ok(_) => render::view(session.view()),
                Err(e) => render::notice(&Notice::from_error(&e)),
            },
            ShellCommand::Contact => match session.contact() {
                Ok(nav) => render::navigation(nav),
                Err(e) => render::notice(&Notice::from_error(&e)),
            },
            ShellCommand::Log => match session.log_send().await {
                Ok(n) => render::notice(&n),
                Err(e) => render::notice(&Notice::from_error(&e)),
            },
            ShellCommand::Report(dest) => match session.download_report(dest.as_deref()).await {
                Ok(path) => render::notice(&Notice::info(format!(
                    "Report saved to {}",
                    path.display()
                ))),
                Err(e) => render::notice(&Notice::from_error(&e)),
            },
        }
    }

    // Let a just-opened tab receive its deep link before exiting.
    session.tabs_mut().settle().await;
    Ok(())
}
