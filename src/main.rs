// src/main.rs — rollout-outreach entry point

use std::sync::Arc;

use clap::Parser;

use rollout_outreach::backend::HttpBackend;
use rollout_outreach::cli::{render, shell, Cli, Commands};
use rollout_outreach::infra::config::Config;
use rollout_outreach::infra::logger;
use rollout_outreach::outreach::{upload, Notice, OutreachSession};
use rollout_outreach::tab::{SystemBrowser, TabSession};

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };
    if let Some(url) = cli.backend {
        config.backend.base_url = url;
    }
    tracing::debug!(backend = %config.backend.base_url, "config loaded");

    let backend = Arc::new(HttpBackend::new(&config.backend)?);
    let tabs = TabSession::new(Arc::new(SystemBrowser::new()), &config.messaging);
    let mut session = OutreachSession::new(backend, tabs);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => shell::run_shell(session).await,
        Commands::Upload { rollout, lojas } => {
            let request = upload::upload_request(rollout.as_deref(), lojas.as_deref()).await?;
            let notice = session.upload(request).await;
            render::notice(&notice);
            if !notice.is_success() {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Lookup {
            number,
            contact,
            log,
        } => {
            session.lookup(&number).await?;
            render::view(session.view());

            if contact && session.view().action.is_enabled() {
                match session.contact() {
                    Ok(nav) => render::navigation(nav),
                    Err(e) => render::notice(&Notice::from_error(&e)),
                }
                session.tabs_mut().settle().await;
            }
            if log {
                render::notice(&session.log_send().await?);
            }
            Ok(())
        }
        Commands::Report { output } => {
            let path = session.download_report(output.as_deref()).await?;
            render::notice(&Notice::info(format!("Report saved to {}", path.display())));
            Ok(())
        }
    }
}
