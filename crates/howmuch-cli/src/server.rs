//! JSON-RPC 2.0 server mode for howmuch-cli
//!
//! Lets editors and scripts use howmuch as a conversion backend.
//! Reads one request per line on stdin, writes one response per line to stdout.

use howmuch_core::{Engine, Query, UnitDefinition};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

/// JSON-RPC 2.0 request
#[derive(Deserialize)]
struct Request {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Option<serde_json::Value>,
    id: serde_json::Value,
}

/// JSON-RPC 2.0 response
#[derive(Serialize)]
struct Response {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: serde_json::Value,
}

/// JSON-RPC error object
#[derive(Serialize)]
struct RpcError {
    code: i32,
    message: String,
}

/// Params for the query and lookup methods
#[derive(Deserialize)]
struct TextParams {
    text: String,
    #[serde(default)]
    figures: Option<usize>,
}

/// One entry of the units listing
#[derive(Serialize)]
struct UnitInfo<'a> {
    name: &'a str,
    symbol: &'a str,
    aliases: &'a [String],
    dimension: &'a str,
    fundamental_quantity: f64,
}

impl<'a> From<&'a UnitDefinition> for UnitInfo<'a> {
    fn from(unit: &'a UnitDefinition) -> Self {
        Self {
            name: &unit.name,
            symbol: &unit.symbol,
            aliases: &unit.aliases,
            dimension: &unit.fundamental_unit,
            fundamental_quantity: unit.fundamental_quantity,
        }
    }
}

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

impl Response {
    fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            result: Some(result),
            error: None,
            id,
        }
    }

    fn error(id: serde_json::Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }

    fn serialized(id: serde_json::Value, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self::success(id, value),
            Err(e) => Self::error(id, INTERNAL_ERROR, format!("Internal error: {e}")),
        }
    }
}

/// Handle a single JSON-RPC request
fn handle_request(engine: &Engine, input: &str) -> Response {
    let request: Request = match serde_json::from_str(input) {
        Ok(r) => r,
        Err(e) => {
            return Response::error(
                serde_json::Value::Null,
                PARSE_ERROR,
                format!("Parse error: {e}"),
            );
        }
    };

    if request.jsonrpc != "2.0" {
        return Response::error(request.id, INVALID_REQUEST, "Invalid JSON-RPC version");
    }

    match request.method.as_str() {
        "query" => handle_query(engine, request.id, request.params),
        "lookup" => handle_lookup(engine, request.id, request.params),
        "units" => handle_units(engine, request.id),
        _ => Response::error(
            request.id,
            METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    }
}

fn text_params(params: Option<serde_json::Value>) -> Result<TextParams, String> {
    match params {
        Some(p) => serde_json::from_value(p).map_err(|e| format!("Invalid params: {e}")),
        None => Err("Missing params".to_string()),
    }
}

/// Handle query method - the full answer for one line of input
fn handle_query(
    engine: &Engine,
    id: serde_json::Value,
    params: Option<serde_json::Value>,
) -> Response {
    let params = match text_params(params) {
        Ok(p) => p,
        Err(message) => return Response::error(id, INVALID_PARAMS, message),
    };

    let query: Query<'_> = engine.query_with_figures(&params.text, params.figures);
    Response::serialized(id, query)
}

/// Handle lookup method - which unit a piece of text names, or null
fn handle_lookup(
    engine: &Engine,
    id: serde_json::Value,
    params: Option<serde_json::Value>,
) -> Response {
    let params = match text_params(params) {
        Ok(p) => p,
        Err(message) => return Response::error(id, INVALID_PARAMS, message),
    };

    let unit = engine.catalog().lookup(&params.text).map(UnitInfo::from);
    Response::serialized(id, unit)
}

/// Handle units method - every unit in the catalog
fn handle_units(engine: &Engine, id: serde_json::Value) -> Response {
    let units: Vec<UnitInfo<'_>> = engine.catalog().units().iter().map(UnitInfo::from).collect();
    Response::serialized(id, units)
}

/// Run the JSON-RPC server loop
pub fn run_server(engine: &Engine) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let response = handle_request(engine, &line);
        let json = serde_json::to_string(&response)?;
        writeln!(stdout, "{json}")?;
        stdout.flush()?;
    }

    Ok(())
}
