//! `todo-server` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`   — start the HTTP API (and the static client, if present).
//! - `init-db` — create the schema, or apply a SQL script.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{ApiConfig, AppState};
use db::{DbConfig, TodoRepository};
use runner::ShellRunner;

#[derive(Parser)]
#[command(
    name = "todo-server",
    about = "Todo list HTTP service backed by the sqlite3 engine",
    version
)]
struct Cli {
    #[command(flatten)]
    db: DbArgs,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct DbArgs {
    /// Path to the SQLite datastore file.
    #[arg(long = "db", env = "PATH_TO_DB", default_value = "todos.db", global = true)]
    path: PathBuf,

    /// The sqlite3 binary to invoke.
    #[arg(long, env = "SQLITE_BIN", default_value = db::config::DEFAULT_SQLITE_BIN, global = true)]
    sqlite_bin: String,

    /// Seconds a single engine invocation may run before it is killed.
    #[arg(long, env = "COMMAND_TIMEOUT_SECS", default_value_t = 10, global = true)]
    timeout_secs: u64,

    /// Milliseconds an engine invocation waits on a locked datastore.
    #[arg(long, env = "BUSY_TIMEOUT_MS", default_value_t = 5000, global = true)]
    busy_timeout_ms: u64,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server.
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8080")]
        bind: String,

        /// Directory with the browser client; skipped when it does not exist.
        #[arg(long, env = "STATIC_DIR", default_value = "static")]
        static_dir: PathBuf,

        /// Allow cross-origin requests from any origin.
        #[arg(long)]
        cors: bool,

        /// Do not create the schema at start-up.
        #[arg(long)]
        skip_init: bool,
    },
    /// Initialise the datastore.
    InitDb {
        /// Apply this SQL script instead of the built-in schema.
        #[arg(long)]
        sql_file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn repository(args: &DbArgs) -> TodoRepository {
    let config = DbConfig::new(&args.path)
        .with_sqlite_bin(&args.sqlite_bin)
        .with_busy_timeout(Duration::from_millis(args.busy_timeout_ms));
    let runner = ShellRunner::new(Duration::from_secs(args.timeout_secs));
    TodoRepository::new(config, Arc::new(runner))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let repo = repository(&cli.db);

    match cli.command {
        Command::Serve {
            bind,
            static_dir,
            cors,
            skip_init,
        } => {
            if !skip_init {
                repo.init_schema()
                    .await
                    .with_context(|| format!("failed to initialise {}", cli.db.path.display()))?;
            }

            info!(db = %cli.db.path.display(), "starting API server on {bind}");
            let config = ApiConfig {
                static_dir: Some(static_dir),
                cors,
            };
            api::serve(&bind, AppState::new(repo), config)
                .await
                .with_context(|| format!("server on {bind} failed"))?;
        }
        Command::InitDb { sql_file } => {
            match sql_file {
                Some(path) => repo
                    .apply_sql_file(&path)
                    .await
                    .with_context(|| format!("failed to apply {}", path.display()))?,
                None => repo
                    .init_schema()
                    .await
                    .with_context(|| format!("failed to initialise {}", cli.db.path.display()))?,
            }
            info!(db = %cli.db.path.display(), "database initialised");
        }
    }

    Ok(())
}
