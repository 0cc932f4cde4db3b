use std::time::Duration;

use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use reporting::{ExportFormat, ReportKind};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Path of the account listing endpoint, relative to `base_url`.
    pub accounts_path: String,
    /// Admin bearer token. Only read from the config file or environment.
    pub token: String,
    /// IANA timezone used to render join dates.
    pub timezone: String,
    pub export_dir: String,
    pub timeout_secs: u64,
    pub log_level: String,
    /// Log destination while the interactive dashboard owns the terminal.
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            accounts_path: "api/admin/users".to_string(),
            token: String::new(),
            timezone: "UTC".to_string(),
            export_dir: ".".to_string(),
            timeout_secs: 15,
            log_level: "info".to_string(),
            log_file: "gigfusion_dashboard.log".to_string(),
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| AppError::Setting(format!("timezone \"{}\": {err}", self.timezone)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Users,
    Providers,
}

impl From<KindArg> for ReportKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Users => ReportKind::Users,
            KindArg::Providers => ReportKind::Providers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Xlsx,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Xlsx => ExportFormat::Xlsx,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "gigfusion_dashboard", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:5000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override the directory reports are written to.
    #[arg(long)]
    export_dir: Option<String>,
    /// Print the summary counts as JSON and exit.
    #[arg(long, conflicts_with = "export")]
    summary: bool,
    /// Export a partition and exit.
    #[arg(long, value_enum)]
    export: Option<KindArg>,
    /// Report file format.
    #[arg(long, value_enum, default_value = "xlsx")]
    format: FormatArg,
    /// Only export records whose name or email contains this text.
    #[arg(long, default_value = "")]
    query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Summary,
    Export {
        kind: ReportKind,
        format: ExportFormat,
        query: String,
    },
}

#[derive(Debug, Clone)]
pub struct Launch {
    pub config: AppConfig,
    pub mode: Mode,
}

pub fn load() -> Result<Launch> {
    launch_from(Args::parse())
}

fn launch_from(args: Args) -> Result<Launch> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("GIGFUSION_DASHBOARD"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(export_dir) = args.export_dir {
        settings.export_dir = export_dir;
    }

    let mode = match (args.summary, args.export) {
        (true, _) => Mode::Summary,
        (false, Some(kind)) => Mode::Export {
            kind: kind.into(),
            format: args.format.into(),
            query: args.query,
        },
        (false, None) => Mode::Interactive,
    };

    Ok(Launch {
        config: settings,
        mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Launch {
        let mut argv = vec!["gigfusion_dashboard", "--config", "does/not/exist"];
        argv.extend_from_slice(args);
        launch_from(Args::try_parse_from(argv).unwrap()).unwrap()
    }

    #[test]
    fn defaults_to_interactive() {
        let launch = parse(&[]);
        assert_eq!(launch.mode, Mode::Interactive);
        assert_eq!(launch.config.accounts_path, "api/admin/users");
        assert_eq!(launch.config.tz().unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn cli_overrides_config() {
        let launch = parse(&["--base-url", "http://admin.local", "--timezone", "Europe/Rome"]);
        assert_eq!(launch.config.base_url, "http://admin.local");
        assert_eq!(launch.config.tz().unwrap(), chrono_tz::Europe::Rome);
    }

    #[test]
    fn export_mode() {
        let launch = parse(&["--export", "providers", "--format", "csv", "--query", "bob"]);
        assert_eq!(
            launch.mode,
            Mode::Export {
                kind: ReportKind::Providers,
                format: ExportFormat::Csv,
                query: "bob".to_string(),
            }
        );
    }

    #[test]
    fn summary_conflicts_with_export() {
        let res = Args::try_parse_from(["gigfusion_dashboard", "--summary", "--export", "users"]);
        assert!(res.is_err());
    }

    #[test]
    fn token_is_not_a_flag() {
        let res = Args::try_parse_from(["gigfusion_dashboard", "--token", "secret"]);
        assert!(res.is_err());
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let config = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.tz(), Err(AppError::Setting(_))));
    }
}
