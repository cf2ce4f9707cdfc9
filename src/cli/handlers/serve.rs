//! API server handlers

use crate::AppConfig;
use crate::Result;

pub async fn handle_serve_api(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    no_cors: bool,
    no_warm_up: bool,
) -> Result<()> {
    use crate::api::serve_api;

    let mut config = config.clone();
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if no_cors {
        config.server.enable_cors = false;
    }
    if no_warm_up {
        config.analysis.warm_up_on_start = false;
    }

    println!("🚀 Starting Feedback Analytics API Server");
    println!("=========================================\n");
    println!("📍 Host: {}", config.server.host);
    println!("🔌 Port: {}", config.server.port);
    println!(
        "🌐 CORS: {}",
        if config.server.enable_cors {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!(
        "🔥 Warm-up on start: {}",
        if config.analysis.warm_up_on_start {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!();

    serve_api(&config).await
}
