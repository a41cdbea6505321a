//! CLI command implementations

use anyhow::Result;
use std::fs;

use crate::api;
use crate::auth::{self, Profile, Role};
use crate::cli::{info, route_row, success, warn, OutputFormat, Viewer};
use crate::config;

/// Initialize a new backoffice.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("backoffice.toml");

    if config_path.exists() {
        warn("backoffice.toml already exists");
        return Ok(());
    }

    let content = config::default_config_content();
    fs::write(config_path, content)?;

    success("Created backoffice.toml");
    info("Edit the configuration file and run 'backoffice serve' to start the API");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(host: &str, port: u16) -> Result<()> {
    let config = config::load_config()?;
    api::run_server(config, host, port).await?;
    Ok(())
}

/// Print the route table as a given viewer would see it
pub async fn routes(viewer: Viewer, format: OutputFormat) -> Result<()> {
    let profile = match viewer {
        Viewer::Anonymous => None,
        Viewer::User => Some(Profile::new("viewer@example.com".to_string(), Role::User)),
        Viewer::Admin => Some(Profile::new("viewer@example.com".to_string(), Role::Admin)),
    };

    let rows: Vec<_> = auth::ROUTES
        .iter()
        .map(|route| {
            let visible = matches!(
                auth::resolve(profile.as_ref(), route.path),
                auth::RouteDecision::Resolved(_)
            );
            route_row(route, visible)
        })
        .collect();

    match format {
        OutputFormat::Table => {
            crate::cli::print_route_table(&rows);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows)?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&rows)?;
            println!("{}", yaml);
        }
    }

    Ok(())
}
