use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::model::{Block, RichText};

const API_BASE: &str = "https://api.notion.com/v1";

/// API version pinned for every request.
const NOTION_VERSION: &str = "2022-06-28";

const USER_AGENT: &str = concat!("notedown/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// Transport-level failure (connection, TLS, serialization).
    #[error("notion transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("notion api error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// The interesting parts of a successful page-create response.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPage {
    pub id: String,
    pub url: String,
}

/// Error payload shape returned by the Notion API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Minimal Notion API client. One method: create a page under a parent page.
pub struct Client {
    http: reqwest::Client,
    token: String,
}

impl Client {
    pub fn new(token: impl Into<String>) -> Result<Self, NotionError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Client {
            http,
            token: token.into(),
        })
    }

    /// Create a page under `parent_page_id` with the given title runs and
    /// child blocks, returning the created page's id and URL.
    pub async fn create_page(
        &self,
        parent_page_id: &str,
        title: &[RichText],
        children: &[Block],
    ) -> Result<CreatedPage, NotionError> {
        let body = json!({
            "parent": { "type": "page_id", "page_id": parent_page_id },
            "properties": {
                "title": { "title": title },
            },
            "children": children,
        });

        debug!(parent = parent_page_id, blocks = children.len(), "creating notion page");

        let response = self
            .http
            .post(format!("{API_BASE}/pages"))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|b| b.message)
                .unwrap_or_default();
            return Err(NotionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<CreatedPage>().await?)
    }
}
