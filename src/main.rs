//! hexd server binary.
//!
//! ```text
//! HEXD_STORAGE_DIR=/var/lib/hexd RUST_LOG=info hexd --addr 0.0.0.0:8080
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hexd::{FileStorage, InMemoryStorage, Server, Storage, repository};

/// Serve Hex packages and tarballs from storage.
#[derive(Debug, Parser)]
#[command(name = "hexd", version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "HEXD_ADDR", default_value = "0.0.0.0:8080")]
    addr: SocketAddr,

    /// Directory holding the repository. Without it artifacts live in memory
    /// and vanish on exit.
    #[arg(long, env = "HEXD_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, env = "HEXD_LOG_JSON")]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        fmt.json().init();
    } else {
        fmt.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_validated_by_the_parser() {
        let args = Args::try_parse_from(["hexd", "--addr", "127.0.0.1:9000"]).unwrap();
        assert_eq!(args.addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert!(Args::try_parse_from(["hexd", "--addr", "not-an-addr"]).is_err());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let storage: Arc<dyn Storage> = match &args.storage_dir {
        Some(dir) => {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating storage dir {}", dir.display()))?;
            info!(dir = %dir.display(), "using file storage");
            Arc::new(FileStorage::new(dir))
        }
        None => {
            info!("using in-memory storage");
            Arc::new(InMemoryStorage::new())
        }
    };

    Server::bind_addr(args.addr)
        .serve(repository(storage))
        .await
        .context("server failed")?;
    Ok(())
}
