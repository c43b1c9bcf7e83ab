//! reveilled - The reveille background service
//!
//! This is the main entry point for the reveille service.
//! It wires together all the components:
//! - Configuration loading
//! - Store initialization
//! - Alarm engine and its tick loop
//! - Notification bridge (Linux desktop)
//! - Console protocol on stdin/stdout

mod console;
mod handler;

use anyhow::{Context, Result};
use clap::Parser;
use reveille_api::{Event, EventPayload};
use reveille_config::{Settings, load_or_default};
use reveille_core::{AlarmEngine, CoreEvent, DispatchQueue, Dispatcher};
use reveille_host_api::NotificationBridge;
use reveille_host_linux::LinuxBridge;
use reveille_store::{AuditEvent, AuditEventType, SqliteStore, Store};
use reveille_util::{DATABASE_FILENAME, default_config_path};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Stdout};
use tokio::signal::unix::{SignalKind, signal};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::console::{ConsoleWriter, parse_request};
use crate::handler::{HandlerContext, event_payload, handle_command};

const BRIDGE_DRAIN_TIMEOUT: Duration = Duration::from_secs(3);

/// reveilled - Alarm clock service
#[derive(Parser, Debug)]
#[command(name = "reveilled")]
#[command(about = "Alarm clock service: rings alarms on time and keeps host wakes armed", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/reveille/config.toml)
    #[arg(short, long, env = "REVEILLE_CONFIG", default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set REVEILLE_DATA_DIR env var)
    #[arg(short, long, env = "REVEILLE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Main service state
struct Service {
    engine: AlarmEngine,
    bridge: Arc<dyn NotificationBridge>,
    dispatch: DispatchQueue,
    dispatch_worker: JoinHandle<()>,
    store: Arc<dyn Store>,
    settings: Settings,
    console: ConsoleWriter<Stdout>,
}

impl Service {
    fn new(args: &Args) -> Result<Self> {
        let mut settings = load_or_default(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;
        if let Some(data_dir) = &args.data_dir {
            settings = settings.with_data_dir(data_dir.clone());
        }

        info!(
            config_path = %args.config.display(),
            tick_ms = settings.service.tick_interval.as_millis() as u64,
            "Configuration loaded"
        );

        let data_dir = &settings.service.data_dir;
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        let db_path = data_dir.join(DATABASE_FILENAME);
        let store: Arc<dyn Store> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );

        info!(db_path = %db_path.display(), "Store initialized");

        let bridge: Arc<dyn NotificationBridge> = Arc::new(LinuxBridge::new());
        info!(capabilities = ?bridge.capabilities(), "Notification bridge initialized");

        let engine = AlarmEngine::new(store.clone(), settings.alerts.clone());
        let (dispatch, dispatch_worker) = DispatchQueue::spawn(Dispatcher::new(
            bridge.clone(),
            settings.alerts.banner_duration,
        ));

        if let Err(e) = store.append_audit(AuditEvent::new(AuditEventType::ServiceStarted {
            alarm_count: engine.alarm_count(),
        })) {
            warn!(error = %e, "Failed to log service start");
        }

        Ok(Self {
            engine,
            bridge,
            dispatch,
            dispatch_worker,
            store,
            settings,
            console: ConsoleWriter::new(tokio::io::stdout()),
        })
    }

    async fn run(mut self) -> Result<()> {
        // Host wakes do not survive a reboot on every platform; arm them all
        let rearm = self.engine.rearm_all(reveille_util::now());
        self.emit(rearm).await;

        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;
        let mut sighup =
            signal(SignalKind::hangup()).context("Failed to create SIGHUP handler")?;

        let mut tick_timer = tokio::time::interval(self.settings.service.tick_interval);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut stdin = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;

        info!("Service running");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully");
                    break;
                }
                _ = sighup.recv() => {
                    info!("Received SIGHUP, shutting down gracefully");
                    break;
                }

                _ = tick_timer.tick() => {
                    let events = self.engine.tick(reveille_util::now());
                    self.emit(events).await;
                }

                line = stdin.next_line(), if stdin_open => {
                    match line {
                        Ok(Some(line)) => {
                            if self.handle_line(&line).await {
                                break;
                            }
                        }
                        Ok(None) => {
                            info!("Console closed, continuing without a client");
                            stdin_open = false;
                        }
                        Err(e) => {
                            error!(error = %e, "Failed to read console input");
                            stdin_open = false;
                        }
                    }
                }
            }
        }

        info!("Shutting down reveilled");

        // Let queued cancels reach the host before exiting
        drop(self.dispatch);
        if tokio::time::timeout(BRIDGE_DRAIN_TIMEOUT, self.dispatch_worker)
            .await
            .is_err()
        {
            warn!("Bridge worker did not drain in time");
        }

        if let Err(e) = self.console.event(&Event::new(EventPayload::Shutdown)).await {
            debug!(error = %e, "Could not announce shutdown");
        }

        if let Err(e) = self
            .store
            .append_audit(AuditEvent::new(AuditEventType::ServiceStopped))
        {
            warn!(error = %e, "Failed to log service shutdown");
        }

        info!("Shutdown complete");
        Ok(())
    }

    /// Handle one console line; returns true when the client asked to stop
    async fn handle_line(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return false;
        }

        let request = match parse_request(line) {
            Ok(request) => request,
            Err(response) => {
                warn!(request_id = response.request_id, "Rejected console request");
                if let Err(e) = self.console.response(&response).await {
                    warn!(error = %e, "Failed to write response");
                }
                return false;
            }
        };

        let ctx = HandlerContext {
            export_dir: &self.settings.service.export_dir,
            bridge_ok: self.bridge.is_healthy(),
        };
        let handled = handle_command(
            &mut self.engine,
            &ctx,
            request.request_id,
            request.command,
            reveille_util::now(),
        );

        if let Err(e) = self.console.response(&handled.response).await {
            warn!(error = %e, "Failed to write response");
        }
        self.emit(handled.events).await;

        handled.shutdown
    }

    /// Publish events to the client and queue bridge work in order
    async fn emit(&mut self, events: Vec<CoreEvent>) {
        for event in events {
            if let Err(e) = self.console.event(&Event::new(event_payload(&event))).await {
                warn!(error = %e, "Failed to write event");
            }
            self.dispatch.push(event);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the console protocol, so logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        mock_time = reveille_util::is_mock_time_active(),
        "reveilled starting"
    );

    let service = Service::new(&args)?;
    service.run().await
}
