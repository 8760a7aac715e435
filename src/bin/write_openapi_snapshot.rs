// src/bin/write_openapi_snapshot.rs
use anyhow::{Context, Result};
use pantry_link::{config::AppConfig, presentation::http::openapi::write_openapi_snapshot};
use std::path::PathBuf;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let path = PathBuf::from(
        std::env::var("OPENAPI_SNAPSHOT_PATH").unwrap_or_else(|_| "spec/openapi.json".into()),
    );

    write_openapi_snapshot(&path, config.public_base_url())
        .with_context(|| format!("writing {}", path.display()))?;
    println!("OpenAPI snapshot written to {}", path.display());
    Ok(())
}
