//! PostgreSQL-backed stores

use crate::auth::{Profile, Role};
use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::store::{ProfileStore, SupportRecord, SupportStore};
use async_trait::async_trait;
use tokio_postgres::Client;
use uuid::Uuid;

/// Connect and spawn the connection driver
async fn connect(config: &DatabaseConfig) -> Result<Client> {
    let (client, connection) =
        tokio_postgres::connect(&config.connection_string(), tokio_postgres::NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("PostgreSQL connection error: {}", e);
        }
    });

    Ok(client)
}

/// Profiles table reader
pub struct PgProfiles {
    config: DatabaseConfig,
}

impl PgProfiles {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProfileStore for PgProfiles {
    async fn fetch_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        let client = connect(&self.config).await?;

        let row = client
            .query_opt(
                "SELECT id, email, role, active, created_at FROM profiles WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.map(|row| {
            let role: String = row.get("role");
            Profile {
                id: row.get("id"),
                email: row.get("email"),
                role: Role::from_db(&role),
                active: row.get("active"),
                created_at: row.get("created_at"),
            }
        }))
    }
}

/// Support credentials reader
pub struct PgSupport {
    config: DatabaseConfig,
}

impl PgSupport {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SupportStore for PgSupport {
    async fn lookup(&self, support_id: &str) -> Result<Option<SupportRecord>> {
        let client = connect(&self.config).await?;

        let row = client
            .query_opt(
                "SELECT support_id, client_name, company_name, document \
                 FROM support_api_credentials WHERE support_id = $1",
                &[&support_id],
            )
            .await?;

        Ok(row.map(|row| SupportRecord {
            support_id: row.get("support_id"),
            client_name: row.get("client_name"),
            company_name: row.get("company_name"),
            document: row.get("document"),
        }))
    }
}
