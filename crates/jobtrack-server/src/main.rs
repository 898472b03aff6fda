//! jobtrack server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `JOBTRACK_*` environment variables, opens the configured backend, and
//! serves the JSON API over HTTP.
//!
//! # Backends
//!
//! - `backend = "sqlite"` (default): a local SQLite file at `store_path` and a
//!   single account from `local_email` / `local_password_hash`.
//! - `backend = "supabase"`: the hosted table and auth APIs at `supabase_url`
//!   using `supabase_anon_key`. Bad settings do not stop the server; every
//!   request answers 503 until they are fixed.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `local_password_hash`:
//!
//! ```
//! cargo run -p jobtrack-server --bin jobtrack -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use jobtrack_core::gateway::Gateway;
use jobtrack_server::{
  AppState, Backend, ServerConfig,
  auth::{LocalAccount, LocalSessions, hash_password},
};
use jobtrack_store_sqlite::SqliteStore;
use jobtrack_supabase::SupabaseClient;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Personal job-application tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("JOBTRACK"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  let config = Arc::new(server_cfg.clone());

  let app: Router = match server_cfg.backend {
    Backend::Sqlite => {
      let store_path = expand_tilde(&server_cfg.store_path);
      if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
          .with_context(|| format!("failed to create {parent:?}"))?;
      }
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?;

      let account = match (&server_cfg.local_email, &server_cfg.local_password_hash) {
        (Some(email), Some(hash)) => Some(LocalAccount {
          email:         email.clone(),
          password_hash: hash.clone(),
        }),
        _ => {
          tracing::warn!("local_email or local_password_hash is not set; sign-in is disabled");
          None
        }
      };

      tracing::info!("using SQLite store at {store_path:?}");
      jobtrack_server::router(AppState {
        gateway: Gateway::new(Arc::new(store), Arc::new(LocalSessions::new(account))),
        config,
      })
    }
    Backend::Supabase => {
      let client = Arc::new(
        SupabaseClient::new(&server_cfg.backend_config())
          .context("failed to build HTTP client")?,
      );
      tracing::info!(configured = client.is_configured(), "using hosted backend");
      jobtrack_server::router(AppState {
        gateway: Gateway::new(Arc::clone(&client), client),
        config,
      })
    }
  };

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_owned())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
