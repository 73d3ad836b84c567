//! # Client Commands
//!
//! The client cache is keyed by RTN. Invoicing fills it automatically;
//! these commands let the front desk look clients up or register them
//! ahead of time.

use carwash_core::validation::{validate_client_name, validate_rtn};
use carwash_core::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::StoreState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub rtn: String,
    pub name: String,
}

/// Answer to an RTN format check, shown inline on the invoice form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtnCheck {
    pub valid: bool,
    pub message: String,
}

/// Lists every cached client, sorted by name.
pub async fn list_clients(store: &StoreState) -> Result<Vec<Client>, ApiError> {
    debug!("list_clients command");
    Ok(store.inner().clients().list().await?)
}

pub async fn get_client_by_rtn(store: &StoreState, rtn: &str) -> Result<Client, ApiError> {
    debug!(rtn = %rtn, "get_client_by_rtn command");
    store
        .inner()
        .clients()
        .get_by_rtn(rtn.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Client", rtn))
}

/// Registers a client. An RTN that is already cached is a `DUPLICATE`.
pub async fn create_client(
    store: &StoreState,
    request: CreateClientRequest,
) -> Result<Client, ApiError> {
    debug!(rtn = %request.rtn, "create_client command");

    let rtn = request.rtn.trim();
    let name = request.name.trim();
    validate_rtn(rtn)?;
    validate_client_name(name)?;

    let client = store.inner().clients().create(rtn, name).await?;
    info!(id = %client.id, rtn = %client.rtn, "Client created");
    Ok(client)
}

/// Checks the RTN format without touching the cache.
pub fn validate_rtn_format(rtn: &str) -> RtnCheck {
    match validate_rtn(rtn) {
        Ok(()) => RtnCheck {
            valid: true,
            message: "RTN válido".to_string(),
        },
        Err(_) => RtnCheck {
            valid: false,
            message: "RTN debe tener exactamente 14 dígitos".to_string(),
        },
    }
}
