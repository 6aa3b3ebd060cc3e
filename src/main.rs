use flexcache::group::GroupRegistry;
use flexcache::group::single_flight::SingleFlight;
use flexcache::transport::HttpPool;
use flexcache::transport::handlers::{api_router, peer_router};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_CACHE_BYTES: usize = 2 << 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} --bind <addr:port> [--peer <addr:port>]... [--api] [--cache-bytes <n>]",
            args[0]
        );
        eprintln!("Example: {} --bind 127.0.0.1:8001 --api", args[0]);
        eprintln!(
            "Example: {} --bind 127.0.0.1:8002 --peer 127.0.0.1:8001 --peer 127.0.0.1:8002",
            args[0]
        );

        std::process::exit(1);
    }

    let mut bind_addr: Option<SocketAddr> = None;
    let mut peer_addrs: Vec<SocketAddr> = vec![];
    let mut serve_api = false;
    let mut cache_bytes = DEFAULT_CACHE_BYTES;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" if i + 1 < args.len() => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--peer" if i + 1 < args.len() => {
                peer_addrs.push(args[i + 1].parse()?);
                i += 2;
            }
            "--cache-bytes" if i + 1 < args.len() => {
                cache_bytes = args[i + 1].parse()?;
                i += 2;
            }
            "--api" => {
                serve_api = true;
                i += 1;
            }
            _ => {
                i += 1;
            }
        }
    }

    let bind_addr = bind_addr.ok_or_else(|| anyhow::anyhow!("--bind is required"))?;
    let self_url = format!("http://{}", bind_addr);

    let mut peers: Vec<String> = peer_addrs
        .iter()
        .map(|addr| format!("http://{}", addr))
        .collect();
    if !peers.contains(&self_url) {
        peers.push(self_url.clone());
    }

    tracing::info!("Starting node on {}", bind_addr);
    tracing::info!("Peers: {:?}", peers);

    // 1. Groups:
    let registry = GroupRegistry::new();
    let db = slow_db();
    let flight = SingleFlight::new();

    let group = registry.new_group("scores", cache_bytes, move |key: String| {
        let db = db.clone();
        let flight = flight.clone();
        async move {
            flight
                .run(&key, || async {
                    tracing::info!("[SlowDB] search key {}", key);
                    db.get(&key)
                        .map(|v| v.as_bytes().to_vec())
                        .ok_or_else(|| anyhow::anyhow!("{} not exist", key))
                })
                .await
        }
    });

    // 2. Peers:
    let pool = HttpPool::new(&self_url);
    pool.set_peers(&peers);
    group.register_peers(pool.clone());

    // 3. HTTP Router:
    let mut app = peer_router(pool.base_path(), registry.clone());
    if serve_api {
        app = app.merge(api_router(group.clone(), registry.clone()));
        tracing::info!("Frontend API enabled at http://{}/api/<key>", bind_addr);
    }

    // 4. Spawn stats reporter:
    let stats_registry = registry.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30));

        loop {
            interval.tick().await;
            for stats in stats_registry.stats() {
                tracing::info!(
                    "Group {}: gets={} hits={} peer_loads={} peer_errors={} local_loads={} entries={} bytes={}",
                    stats.name,
                    stats.gets,
                    stats.hits,
                    stats.peer_loads,
                    stats.peer_errors,
                    stats.local_loads,
                    stats.cached_entries,
                    stats.cached_bytes
                );
            }
        }
    });

    // 5. Start HTTP server:
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn slow_db() -> Arc<HashMap<String, String>> {
    Arc::new(HashMap::from([
        ("Tom".to_string(), "630".to_string()),
        ("Jack".to_string(), "589".to_string()),
        ("Sam".to_string(), "567".to_string()),
    ]))
}
