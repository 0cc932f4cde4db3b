mod app;
mod client;
mod config;
mod error;
mod headless;
mod ui;
mod view_model;

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::{
    config::{AppConfig, Mode},
    error::{AppError, Result},
    view_model::{AccountsViewModel, Credential},
};

#[tokio::main]
async fn main() -> Result<()> {
    let launch = config::load()?;
    init_tracing(&launch.config, &launch.mode)?;

    let vm = view_model(&launch.config)?;
    match launch.mode {
        Mode::Interactive => {
            let mut app = app::App::new(vm, &launch.config);
            app.run().await
        }
        Mode::Summary => {
            let mut vm = vm;
            headless::summary(&mut vm).await
        }
        Mode::Export {
            kind,
            format,
            query,
        } => {
            let mut vm = vm;
            headless::export(&mut vm, kind, format, &query).await
        }
    }
}

fn view_model(config: &AppConfig) -> Result<AccountsViewModel> {
    if config.token.trim().is_empty() {
        return Err(AppError::Setting(
            "missing admin token (set GIGFUSION_DASHBOARD_TOKEN or `token` in the config file)"
                .to_string(),
        ));
    }
    let client = client::Client::new(&config.base_url, &config.accounts_path, config.timeout())?;
    tracing::info!(url = %client.accounts_url(), "account listing endpoint");
    Ok(AccountsViewModel::new(
        client,
        Credential::bearer(config.token.trim()),
        config.tz()?,
        PathBuf::from(&config.export_dir),
    ))
}

/// The interactive dashboard owns the terminal, so it logs to a file.
fn init_tracing(config: &AppConfig, mode: &Mode) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref(), &config.log_level);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match mode {
        Mode::Interactive => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_file)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        Mode::Summary | Mode::Export { .. } => {
            builder.with_writer(std::io::stderr).init();
        }
    }
    Ok(())
}

/// `RUST_LOG` wins when it parses; otherwise the configured level applies to
/// the dashboard and reporting crates.
fn log_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| {
            EnvFilter::new(format!(
                "gigfusion_dashboard={level},reporting={level}"
            ))
        })
}
