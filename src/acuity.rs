use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{error, info, info_span, instrument, warn};

use crate::config::Config;
use crate::error::{Result, SyncError};
use crate::football_data::http_agent;
use crate::model::block::{CreatedBlock, NewBlock};
use crate::model::id_to_string;

/// Calendar that accepts time blocks. There is no in-place update: replacing a
/// block means deleting it and creating a new one, which gets a new id.
pub trait BlockStore {
    /// Create a block and return the id the store assigned.
    fn create(&self, block: &NewBlock) -> Result<String>;

    /// Delete a block. `true` only for a 2xx answer; never errors.
    fn delete(&self, block_id: &str) -> bool;
}

/// Acuity Scheduling `/blocks` client using HTTP basic auth.
#[derive(Clone)]
pub struct Acuity {
    base_url: String,
    authorization: String,
    agent: ureq::Agent,
}

impl Acuity {
    pub fn new(base_url: &str, user: &str, api_key: &str) -> Self {
        let credentials = BASE64.encode(format!("{}:{}", user, api_key));
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: format!("Basic {}", credentials),
            agent: http_agent(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.acuity_api_url, &config.acuity_user, &config.acuity_key)
    }

    /// Pull the block id out of a create response body (no network).
    pub fn parse_created(body: &str) -> Result<String> {
        let created: CreatedBlock = serde_json::from_str(body)
            .map_err(|e| SyncError::Store(format!("unreadable create response: {}", e)))?;
        created
            .id
            .as_ref()
            .and_then(id_to_string)
            .ok_or_else(|| SyncError::Store("create response has no block id".to_string()))
    }
}

impl BlockStore for Acuity {
    #[instrument(level = "info", skip(self, block), fields(start = %block.start, notes = %block.notes))]
    fn create(&self, block: &NewBlock) -> Result<String> {
        let url = format!("{}/blocks", self.base_url);
        let response = {
            let _span = info_span!("acuity_create_block", url = %url).entered();
            self.agent
                .post(&url)
                .header("Authorization", self.authorization.as_str())
                .header("Accept", "application/json")
                .send_json(block)
        };
        let response = response.map_err(|e| {
            error!(error = %e, "Create block request failed");
            SyncError::Store(format!("request failed: {}", e))
        })?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();
        let body = body_reader
            .read_to_string()
            .map_err(|e| SyncError::Store(format!("failed to read response body: {}", e)))?;
        if !(200..300).contains(&status) {
            error!(status, body = %body, "Block store rejected create");
            return Err(SyncError::Store(format!("status {}: {}", status, body)));
        }

        let block_id = Self::parse_created(&body)?;
        info!(block_id = %block_id, "Created block");
        Ok(block_id)
    }

    #[instrument(level = "info", skip(self))]
    fn delete(&self, block_id: &str) -> bool {
        let url = format!("{}/blocks/{}", self.base_url, block_id);
        let response = {
            let _span = info_span!("acuity_delete_block", url = %url).entered();
            self.agent
                .delete(&url)
                .header("Authorization", self.authorization.as_str())
                .header("Accept", "application/json")
                .call()
        };
        match response {
            Ok(resp) => {
                let status = resp.status().as_u16();
                let ok = (200..300).contains(&status);
                if ok {
                    info!(status, "Deleted block");
                } else {
                    warn!(status, "Block store refused delete");
                }
                ok
            }
            Err(e) => {
                error!(error = %e, "Delete block request failed");
                false
            }
        }
    }
}
