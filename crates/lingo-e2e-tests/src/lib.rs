pub mod rest;

use std::{fmt::Display, path::Path, time::Duration};

use anyhow::{Result, anyhow};
use lingo_app::state::AppState;
use lingo_server::{
    build_state,
    config::{Parser, ServerConfig},
    run::run_graceful_with_state,
};
use lingo_types::claim::ApiClaim;
use rand::Rng as _;
use reqwest::{Url, header};
use tempfile::TempDir;
use tokio::sync::oneshot;
use tracing::{debug, error};

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

/// Keeps temporary data directory and running server alive
pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

pub fn test_config(test_name: &str, base_dir: &Path) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix_in(format!("{}_", test_name), base_dir)?;
    let data_dir = tmp_data_dir.path().to_string_lossy().to_string();
    let port = random_port()?;
    let port = port.to_string();
    let base_url = format!("http://localhost:{}", port);
    let args = &[
        "lingo-e2e-tests",
        "--data-dir",
        &data_dir,
        "--port",
        &port,
        "--oidc-config",
        "../../test-data/oidc-config.toml",
        "--base-url",
        &base_url,
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
            shutdown: None,
        },
    ))
}

/// Config in a fresh temporary directory with migrated database, tests can insert data directly
pub async fn prepare_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    let (args, guard) = test_config(test_name, &std::env::temp_dir())?;
    let pool = lingo_dal::new_pool(&args.backend.database_url()).await?;
    lingo_dal::migrate(&pool).await?;
    pool.close().await;
    Ok((args, guard))
}

pub fn extend_url(url: &Url, segment: impl Display) -> Url {
    let mut url = url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&segment.to_string());
    }
    url
}

async fn wait_for_server(base_url: &Url) -> Result<()> {
    let client = reqwest::Client::new();
    let url = base_url.join("control/status")?;
    for _ in 0..50 {
        if let Ok(response) = client.get(url.clone()).send().await {
            if response.status().is_success() {
                return Ok(());
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    Err(anyhow!("Server did not start"))
}

/// Starts server in background, it stops when the guard is dropped
pub async fn spawn_server(args: ServerConfig, guard: &mut ConfigGuard) -> Result<AppState> {
    let state = build_state(&args).await?;
    let base_url = args.base_url.clone();
    let (tx, rx) = oneshot::channel::<()>();
    guard.shutdown = Some(tx);
    let server_state = state.clone();
    tokio::spawn(async move {
        let shutdown = async move {
            let _ = rx.await;
        };
        if let Err(e) = run_graceful_with_state(args, server_state, shutdown).await {
            error!("Server failed: {e}");
        }
    });
    wait_for_server(&base_url).await?;
    debug!("Test server running at {base_url}");
    Ok(state)
}

/// Starts server and returns client sending a valid API token with each request
pub async fn launch_env(args: ServerConfig, guard: &mut ConfigGuard) -> Result<reqwest::Client> {
    let state = spawn_server(args, guard).await?;
    let token = state.tokens().issue(ApiClaim::new_expired("1"))?;
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {token}"))?,
    );
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()?;
    Ok(client)
}
