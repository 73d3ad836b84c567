//! # JSON-Lines Dispatcher
//!
//! Routes one request per line to the matching command.
//!
//! ## Wire Format
//! ```text
//! stdin  ► {"id": 7, "command": "get_invoice", "args": {"id": "5f1c..."}}
//! stdout ◄ {"id": 7, "ok": {...}}
//! stdout ◄ {"id": 7, "error": {"code": "NOT_FOUND", "message": "..."}}
//! ```
//!
//! `id` is echoed back untouched so the caller can match responses to
//! requests. `args` may be omitted for commands that take none.
//!
//! ## Commands
//! | Command                  | Args                                  |
//! |--------------------------|---------------------------------------|
//! | `list_services`          | -                                     |
//! | `get_service`            | `{id}`                                |
//! | `create_service`         | `{code, description, price, ...}`     |
//! | `update_service`         | `{id, ...patch}`                      |
//! | `delete_service`         | `{id}`                                |
//! | `list_clients`           | -                                     |
//! | `get_client_by_rtn`      | `{rtn}`                               |
//! | `create_client`          | `{rtn, name}`                         |
//! | `validate_rtn`           | `{rtn}`                               |
//! | `create_invoice`         | `{clientRtn, clientName, items}`      |
//! | `quote_invoice`          | `{items}`                             |
//! | `list_invoices`          | -                                     |
//! | `get_invoice`            | `{id}`                                |
//! | `next_invoice_number`    | -                                     |
//! | `render_receipt`         | `{id}`                                |
//! | `sales_summary`          | `{from?, to?}` (`YYYY-MM-DD`)         |
//! | `export_invoices_csv`    | `{from?, to?}`                        |
//! | `get_config`             | -                                     |

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use crate::commands::{catalog, client, config, invoice, report};
use crate::error::ApiError;
use crate::state::AppState;

/// One line read from the front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub command: String,
    #[serde(default)]
    pub args: Value,
}

/// One line written back. Exactly one of `ok` / `error` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    fn from_result(id: Value, result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(value) => Response {
                id,
                ok: Some(value),
                error: None,
            },
            Err(err) => Response {
                id,
                ok: None,
                error: Some(err),
            },
        }
    }
}

#[derive(Deserialize)]
struct IdArgs {
    id: String,
}

#[derive(Deserialize)]
struct RtnArgs {
    rtn: String,
}

fn args<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    // Missing args behave like an empty object
    let value = match value {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    Ok(serde_json::from_value(value)?)
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::internal(format!("Failed to serialize response: {}", e)))
}

/// Runs one request against the state.
pub async fn dispatch(state: &AppState, request: Request) -> Response {
    debug!(command = %request.command, "Dispatching");
    let result = route(state, &request.command, request.args).await;

    if let Err(err) = &result {
        debug!(command = %request.command, code = ?err.code, "Command failed");
    }

    Response::from_result(request.id, result)
}

async fn route(state: &AppState, command: &str, raw: Value) -> Result<Value, ApiError> {
    let store = &state.store;
    let cfg = &state.config;

    match command {
        // Catalog
        "list_services" => to_value(catalog::list_services(store).await?),
        "get_service" => {
            let IdArgs { id } = args(raw)?;
            to_value(catalog::get_service(store, &id).await?)
        }
        "create_service" => to_value(catalog::create_service(store, args(raw)?).await?),
        "update_service" => to_value(catalog::update_service(store, args(raw)?).await?),
        "delete_service" => {
            let IdArgs { id } = args(raw)?;
            catalog::delete_service(store, &id).await?;
            Ok(json!({ "deleted": id }))
        }

        // Clients
        "list_clients" => to_value(client::list_clients(store).await?),
        "get_client_by_rtn" => {
            let RtnArgs { rtn } = args(raw)?;
            to_value(client::get_client_by_rtn(store, &rtn).await?)
        }
        "create_client" => to_value(client::create_client(store, args(raw)?).await?),
        "validate_rtn" => {
            let RtnArgs { rtn } = args(raw)?;
            to_value(client::validate_rtn_format(&rtn))
        }

        // Invoices
        "create_invoice" => to_value(invoice::create_invoice(store, cfg, args(raw)?).await?),
        "quote_invoice" => to_value(invoice::quote_invoice(store, cfg, args(raw)?).await?),
        "list_invoices" => to_value(invoice::list_invoices(store).await?),
        "get_invoice" => {
            let IdArgs { id } = args(raw)?;
            to_value(invoice::get_invoice(store, &id).await?)
        }
        "next_invoice_number" => {
            let number = invoice::next_invoice_number_preview(store).await?;
            Ok(json!({ "invoiceNumber": number }))
        }

        // Reports
        "render_receipt" => {
            let IdArgs { id } = args(raw)?;
            to_value(report::render_receipt(store, cfg, &id).await?)
        }
        "sales_summary" => to_value(report::sales_summary(store, cfg, args(raw)?).await?),
        "export_invoices_csv" => {
            to_value(report::export_invoices_csv(store, cfg, args(raw)?).await?)
        }

        // Config
        "get_config" => to_value(config::get_config(cfg)),

        other => Err(ApiError::validation(format!("Unknown command: {}", other))),
    }
}

/// Parses and dispatches one raw line.
///
/// A line that is not a valid request still gets an answer; its `id` is
/// echoed when it can be recovered.
pub async fn handle_line(state: &AppState, line: &str) -> Response {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Malformed request line");
            return Response::from_result(
                Value::Null,
                Err(ApiError::validation(format!("Malformed request: {}", e))),
            );
        }
    };

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    match serde_json::from_value::<Request>(value) {
        Ok(request) => dispatch(state, request).await,
        Err(e) => {
            warn!(error = %e, "Invalid request");
            Response::from_result(id, Err(ApiError::validation(format!("Invalid request: {}", e))))
        }
    }
}

/// Serves requests from `input` until it is closed, one response per line.
///
/// A line that is not UTF-8 is answered with a validation error and the
/// loop keeps going; only I/O failures end it.
pub async fn serve<R, W>(state: &AppState, input: R, mut output: W) -> std::io::Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(input);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(state, line).await,
            Err(e) => {
                warn!(error = %e, "Request line is not UTF-8");
                Response::from_result(
                    Value::Null,
                    Err(ApiError::validation("Malformed request: invalid UTF-8")),
                )
            }
        };

        let mut encoded = serde_json::to_string(&response)?;
        encoded.push('\n');

        output.write_all(encoded.as_bytes()).await?;
        output.flush().await?;
    }

    Ok(())
}
