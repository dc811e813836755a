//! Trivy Report Cache
//!
//! Serves Trivy security reports from the current cluster through a cached
//! REST API.

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trivy_report_cache::cache::storage;
use trivy_report_cache::kubernetes::in_cluster;
use trivy_report_cache::reports::NAMESPACED_REPORT_PLURALS;
use trivy_report_cache::{
    resolve_cluster_name, ApiServer, ApiServerConfig, AppState, CacheBackend, CacheConfig,
    CacheWarmer, CrdDiscoveryService, Error, KubeClusterApi, ReportCache, ReportService,
    ReportsConfig, Result, WarmConfig,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Trivy Report Cache - cached security report aggregation for dashboards
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// REST API bind address
    #[arg(long, env = "API_ADDR", default_value = "0.0.0.0:8090")]
    api_addr: String,

    /// Cache backend (redis, memory)
    #[arg(long, env = "CACHE_BACKEND", default_value = "redis")]
    cache_backend: CacheBackend,

    /// Redis connection URL, credentials included
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    /// Cache time-to-live in seconds
    #[arg(long, env = "CACHE_TTL", default_value = "1800")]
    cache_ttl_secs: u64,

    /// Pre-load reports into the cache at start-up
    #[arg(long, env = "WARM_CACHE")]
    warm_cache: bool,

    /// Maximum concurrent report loads during warm-up
    #[arg(long, env = "WARM_CONCURRENCY", default_value = "4")]
    warm_concurrency: usize,

    /// Namespaced report plurals to warm (defaults to the Trivy report kinds)
    #[arg(long = "warm-plural", env = "WARM_PLURALS", value_delimiter = ',')]
    warm_plurals: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    info!("Starting Trivy Report Cache");
    info!("  Version: {}", trivy_report_cache::VERSION);
    info!("  REST API: {}", args.api_addr);
    info!("  Cache backend: {}", args.cache_backend);
    info!("  Cache TTL: {}s", args.cache_ttl_secs);

    let rest_addr: SocketAddr = args
        .api_addr
        .parse()
        .map_err(|e| Error::Configuration(format!("Invalid REST API address: {}", e)))?;

    // One cluster client and one cluster name for the process lifetime,
    // both chosen by the same in-cluster decision
    let api = Arc::new(KubeClusterApi::connect(in_cluster()).await?);
    let cluster_name = resolve_cluster_name();
    info!("  Cluster: {}", cluster_name);

    let store = storage::connect(args.cache_backend, &args.redis_url).await;
    let cache = ReportCache::with_config(
        store,
        CacheConfig {
            ttl: Duration::from_secs(args.cache_ttl_secs),
        },
    );
    if !cache.health_check().await {
        warn!("Cache store is not reachable; every request will hit the cluster");
    }

    let config = ReportsConfig::default();
    let discovery = Arc::new(CrdDiscoveryService::new(api.clone(), cache.clone(), config.clone()));
    let reports = Arc::new(ReportService::new(api, cache.clone(), config, cluster_name));

    if args.warm_cache {
        let extra_plurals = if args.warm_plurals.is_empty() {
            NAMESPACED_REPORT_PLURALS.iter().map(|p| p.to_string()).collect()
        } else {
            args.warm_plurals.clone()
        };
        let warmer = CacheWarmer::new(
            discovery.clone(),
            reports.clone(),
            WarmConfig {
                max_concurrent: args.warm_concurrency,
                extra_plurals,
            },
        );
        tokio::spawn(async move {
            warmer.warm().await;
        });
    }

    let server = Arc::new(ApiServer::new(
        ApiServerConfig { rest_addr },
        AppState {
            discovery,
            reports,
            cache: cache.clone(),
        },
    ));

    let mut server_task = {
        let server = server.clone();
        tokio::spawn(async move { server.run().await })
    };

    let joined = tokio::select! {
        joined = &mut server_task => joined,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
            server.shutdown();
            server_task.await
        }
    };

    // In-flight cache operations are not drained
    cache.close().await;

    let result = joined.map_err(|e| Error::Internal(format!("REST server task failed: {}", e)))?;
    if let Err(e) = &result {
        error!("REST server error: {}", e);
    }
    result?;

    info!("Shutdown complete");
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG directives come last so they win over the defaults
    let mut directives = vec![
        level.to_string().to_lowercase(),
        "hyper=warn".to_string(),
        "kube=info".to_string(),
        "tower=warn".to_string(),
        "axum=info".to_string(),
    ];
    if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV) {
        directives.push(env);
    }
    let filter = EnvFilter::new(directives.join(","));

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}
