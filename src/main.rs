use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;

use barberia_web::gateway::cache::QueryCache;
use barberia_web::gateway::http::HttpGateway;
use barberia_web::models::config::load_server_config;

fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match load_server_config() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Failed to load server config: {err}");
            std::process::exit(1);
        }
    };

    let cache = if server_config.cache_ttl_secs == 0 {
        QueryCache::disabled()
    } else {
        QueryCache::new(Duration::from_secs(server_config.cache_ttl_secs))
    };

    // The blocking client owns its own runtime and must be built outside actix's.
    let gateway = HttpGateway::new(
        &server_config.api_base_url,
        server_config.request_timeout_secs,
        Arc::new(cache),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;

    actix_web::rt::System::new().block_on(barberia_web::run(server_config, gateway))
}
