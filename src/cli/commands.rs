//! CLI command implementations
//!
//! Every command follows the same boot sequence: load config, apply the log
//! level, open the snapshot-backed store, build the catalog service and seed
//! the default admin. Every command stops the audit worker before returning
//! so queued entries reach the snapshot.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::api::ApiHandler;
use crate::config::Config;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::service::{CatalogService, SearchScope};
use crate::storage::RecordStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_error, write_json, write_response};

/// A booted catalog
struct Runtime {
    config: Config,
    service: Arc<CatalogService>,
    admin_created: bool,
}

impl Runtime {
    /// Stop the audit worker, returning (recorded, dropped)
    fn shutdown(&self) -> (usize, usize) {
        let stats = self.service.shutdown();
        (stats.recorded, stats.dropped)
    }
}

/// Load config and open the store
fn boot(config_path: &Path) -> CliResult<Runtime> {
    log_event_with_fields(
        Event::BootStart,
        &[("config", config_path.display().to_string().as_str())],
    );

    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_severity()?);

    let store = RecordStore::open_file(config.storage_path(), config.storage.on_corrupt)?;
    let service = Arc::new(CatalogService::new(
        Arc::new(store),
        config.features.clone(),
    ));

    let admin_created = match service.ensure_default_admin(&config.admin) {
        Ok(created) => created.is_some(),
        Err(e) => {
            service.shutdown();
            return Err(CliError::boot_failed(format!(
                "Failed to seed admin account: {}",
                e
            )));
        }
    };

    Ok(Runtime {
        config,
        service,
        admin_created,
    })
}

/// Run a command against a booted catalog, stopping the audit worker afterwards
fn with_runtime<F>(config_path: &Path, f: F) -> CliResult<()>
where
    F: FnOnce(&Runtime) -> CliResult<()>,
{
    let runtime = boot(config_path)?;
    let result = f(&runtime);
    runtime.shutdown();
    result
}

/// Parse arguments and run
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { config } => init(&config),
        Command::Start { config } => start(&config),
        Command::Analytics { config, refresh } => analytics(&config, refresh),
        Command::Audit { config, limit } => audit(&config, limit),
        Command::Search {
            config,
            query,
            scope,
        } => search(&config, &query, scope),
    }
}

/// Write a default config if none exists, then create the snapshot and seed the admin
pub fn init(config_path: &Path) -> CliResult<()> {
    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(config_path, Config::default().to_pretty_json()?)?;
    }

    let config = Config::load(config_path)?;
    let snapshot_path = config.storage_path();
    if snapshot_path.exists() {
        return Err(CliError::already_initialized(
            &snapshot_path.display().to_string(),
        ));
    }

    with_runtime(config_path, |runtime| {
        write_response(json!({
            "config": config_path.display().to_string(),
            "snapshot": snapshot_path.display().to_string(),
            "admin": runtime.config.admin.username,
            "admin_created": runtime.admin_created,
        }))
    })
}

/// Serve JSON requests from stdin until EOF
pub fn start(config_path: &Path) -> CliResult<()> {
    let runtime = boot(config_path)?;
    let handler = ApiHandler::new(runtime.service.clone(), runtime.config.app_name.as_str());

    log_event_with_fields(
        Event::Serving,
        &[("store", runtime.service.store().describe().as_str())],
    );

    let mut outcome = Ok(());
    for line in read_requests() {
        let written = match line {
            Ok(request) => write_json(&handler.handle(&request).to_json()),
            Err(e) => {
                // Input is gone; report once and stop
                let _ = write_error(e.code_str(), e.message());
                outcome = Err(e);
                break;
            }
        };
        if let Err(e) = written {
            outcome = Err(e);
            break;
        }
    }

    let (recorded, dropped) = runtime.shutdown();
    log_event_with_fields(
        Event::ShutdownComplete,
        &[
            ("audit_recorded", recorded.to_string().as_str()),
            ("audit_dropped", dropped.to_string().as_str()),
        ],
    );
    outcome
}

/// Print analytics, optionally recomputing them first
pub fn analytics(config_path: &Path, refresh: bool) -> CliResult<()> {
    with_runtime(config_path, |runtime| {
        let analytics = if refresh {
            runtime.service.refresh_analytics()?
        } else {
            runtime.service.analytics()?
        };
        write_response(to_value(&analytics)?)
    })
}

/// Print the newest audit entries
pub fn audit(config_path: &Path, limit: Option<i64>) -> CliResult<()> {
    with_runtime(config_path, |runtime| {
        // Let queued boot entries (admin seeding) land first
        runtime.service.flush_audit();
        let logs = runtime.service.audit_logs(limit)?;
        write_response(to_value(&logs)?)
    })
}

/// Print search results
pub fn search(config_path: &Path, query: &str, scope: SearchScope) -> CliResult<()> {
    with_runtime(config_path, |runtime| {
        let results = runtime.service.search(query, scope)?;
        write_response(to_value(&results)?)
    })
}

fn to_value<T: serde::Serialize>(value: &T) -> CliResult<Value> {
    Ok(serde_json::to_value(value)?)
}
