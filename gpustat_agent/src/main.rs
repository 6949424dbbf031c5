//! gpustat_agent: serves gpustat readings over HTTP for the dashboard.

mod http;
mod state;

use axum::{routing::get, Router};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

const DEFAULT_PORT: u16 = 3000;
const PORT_ENV: &str = "GPUSTAT_AGENT_PORT";
const USAGE: &str = "[--port PORT|-p PORT] [--config FILE|-c FILE]";

#[derive(Debug, Default, PartialEq)]
struct AgentArgs {
    port: Option<u16>,
    config: Option<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<AgentArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "gpustat_agent".into());
    let mut long: Option<String> = None;
    let mut short: Option<String> = None;
    let mut config: Option<PathBuf> = None;
    while let Some(a) = it.next() {
        match a.as_str() {
            "-h" | "--help" => return Err(format!("Usage: {prog} {USAGE}")),
            "--port" => long = it.next(),
            "-p" => short = it.next(),
            "--config" | "-c" => config = it.next().map(PathBuf::from),
            _ if a.starts_with("--port=") => {
                if let Some((_, v)) = a.split_once('=') {
                    long = Some(v.to_string());
                }
            }
            _ if a.starts_with("--config=") => {
                if let Some((_, v)) = a.split_once('=') {
                    config = Some(PathBuf::from(v));
                }
            }
            _ => return Err(format!("Unexpected argument {a}. Usage: {prog} {USAGE}")),
        }
    }
    let port = match long.or(short) {
        Some(p) => Some(p.parse::<u16>().map_err(|_| format!("invalid port {p:?}"))?),
        None => None,
    };
    Ok(AgentArgs { port, config })
}

fn resolve_port(arg: Option<u16>) -> u16 {
    arg.or_else(|| env::var(PORT_ENV).ok().and_then(|v| v.parse().ok()))
        .unwrap_or(DEFAULT_PORT)
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/gpustatus", get(http::gpustatus))
        .route("/gpustatus/multi", get(http::gpustatus_multi))
        .route("/inventory", get(http::inventory))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args(env::args()) {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let port = resolve_port(args.port);
    let app = router(AppState::new(args.config));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("gpustat agent listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
