use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlConnection;
use sqlx::FromRow;

/// Projects that carry a license key
pub const LICENSED_PROJECTS_QUERY: &str = "SELECT ProjectCode, Name, ProductType, ApiToken, Platform, LicenseKey FROM ApmProject WHERE LicenseKey != ''";

/// One row of `ApmProject`, serialized under its column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct ProjectRecord {
    pub project_code: String,
    pub name: Option<String>,
    pub product_type: Option<String>,
    pub api_token: Option<String>,
    pub platform: Option<String>,
    pub license_key: String,
}

/// A live connection that can produce project records
#[async_trait]
pub trait ProjectSource: Send {
    async fn fetch_licensed_projects(&mut self) -> Result<Vec<ProjectRecord>, sqlx::Error>;

    async fn close(self) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl ProjectSource for MySqlConnection {
    async fn fetch_licensed_projects(&mut self) -> Result<Vec<ProjectRecord>, sqlx::Error> {
        sqlx::query_as::<_, ProjectRecord>(LICENSED_PROJECTS_QUERY)
            .fetch_all(&mut *self)
            .await
    }

    async fn close(self) -> Result<(), sqlx::Error> {
        sqlx::Connection::close(self).await
    }
}
