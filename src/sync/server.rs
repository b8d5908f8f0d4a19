//! HTTP server side of the sync protocol
//!
//! Endpoints:
//!   GET  /info/refs      - ref advertisement, one `<id>\t<refname>` line per branch
//!   POST /objects/fetch  - negotiated object download as a binary stream
//!   POST /objects/push   - object upload, applied through the idempotent store
//!   POST /refs/update    - compare-and-swap ref update, `409` on conflict
//!
//! Each connection is served on its own task; handlers return `anyhow`
//! errors and the dispatcher maps [`OrbError`] kinds to statuses
//! (`NotFound` to 404, malformed input to 400, the rest to 500). With
//! `--auth` every endpoint demands HTTP basic auth first.

use crate::areas::database::Database;
use crate::areas::refs::{CasResult, Refs};
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::core::error::OrbError;
use crate::artifacts::objects::closure::ObjectClosure;
use crate::artifacts::objects::object_id::ObjectId;
use crate::sync::protocol::{
    self, FetchRequest, PushResponse, RefUpdateRequest, RefUpdateResponse,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{self, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the tracing subscriber used by `orb serve`
///
/// Logs go to stderr so stdout stays reserved for the listening line.
/// `RUST_LOG` overrides the default `orb=info` filter.
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("orb=info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

struct ServerState {
    database: Database,
    refs: Refs,
    auth: Option<(String, String)>,
}

/// Serves one repository over the sync protocol
pub struct SyncServer {
    state: Arc<ServerState>,
}

impl SyncServer {
    /// `orb_path` is the repository's `.orb` directory
    pub fn new(orb_path: &Path, auth: Option<(String, String)>) -> Self {
        let state = ServerState {
            database: Database::new(orb_path.join("objects").into()),
            refs: Refs::new(orb_path.into()),
            auth,
        };

        Self {
            state: Arc::new(state),
        }
    }

    /// Accept connections until the process is stopped
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (stream, peer) = listener.accept().await?;
            let state = self.state.clone();
            let io = TokioIo::new(stream);

            tokio::spawn(async move {
                let service =
                    service_fn(move |request| handle_request(request, state.clone()));

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    error!("error serving connection from {peer}: {e:?}");
                }
            });
        }
    }
}

async fn handle_request(
    request: Request<Incoming>,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = request.method().as_str().to_string();
    let path = request.uri().path().to_string();

    if !authorized(&request, &state) {
        info!("401 {method} {path}");
        return Ok(unauthorized_response());
    }

    let body = request.into_body().collect().await?.to_bytes();
    let response =
        route(&state, &method, &path, &body).unwrap_or_else(|error| error_response(&error));

    info!("{} {method} {path}", response.status().as_u16());
    Ok(response)
}

fn authorized(request: &Request<Incoming>, state: &ServerState) -> bool {
    let Some((username, password)) = &state.auth else {
        return true;
    };
    let expected = format!("Basic {}", STANDARD.encode(format!("{username}:{password}")));

    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected)
}

fn route(
    state: &ServerState,
    method: &str,
    path: &str,
    body: &Bytes,
) -> anyhow::Result<Response<Full<Bytes>>> {
    match (method, path) {
        ("GET", "/info/refs") => info_refs(state),
        ("POST", "/objects/fetch") => fetch_objects(state, body),
        ("POST", "/objects/push") => push_objects(state, body),
        ("POST", "/refs/update") => update_ref(state, body),
        _ => Ok(json_error(
            StatusCode::NOT_FOUND,
            &format!("unknown endpoint: {method} {path}"),
        )),
    }
}

fn info_refs(state: &ServerState) -> anyhow::Result<Response<Full<Bytes>>> {
    let refs = state.refs.list_refs_with_oids()?;

    Ok(text_response(protocol::render_ref_advertisement(&refs)))
}

fn fetch_objects(state: &ServerState, body: &Bytes) -> anyhow::Result<Response<Full<Bytes>>> {
    let text = std::str::from_utf8(body)
        .map_err(|_| OrbError::ProtocolError("fetch request is not UTF-8".to_string()))?;
    let request = FetchRequest::parse(text)?;

    for want in &request.wants {
        if !state.database.contains(want) {
            return Err(OrbError::NotFound(want.to_string()).into());
        }
    }

    let frontier =
        ObjectClosure::new(&state.database).difference(&request.wants, &request.haves)?;
    let frames = frontier
        .iter()
        .map(|oid| state.database.load_raw(oid))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(stream_response(protocol::encode_object_stream(&frames)?))
}

fn push_objects(state: &ServerState, body: &Bytes) -> anyhow::Result<Response<Full<Bytes>>> {
    let frames = protocol::decode_object_stream(body)?;

    let mut applied = 0usize;
    for frame in frames {
        state.database.store_raw(frame)?;
        applied += 1;
    }

    Ok(json_response(
        StatusCode::OK,
        serde_json::to_vec(&PushResponse { applied })?,
    ))
}

fn update_ref(state: &ServerState, body: &Bytes) -> anyhow::Result<Response<Full<Bytes>>> {
    let request: RefUpdateRequest = serde_json::from_slice(body)
        .map_err(|e| OrbError::ProtocolError(format!("malformed ref update request: {e}")))?;

    let ref_name = SymRefName::new(request.ref_name.clone());
    let branch = BranchName::try_parse_sym_ref_name(&ref_name)
        .map_err(|e| OrbError::ProtocolError(format!("malformed ref update request: {e}")))?;
    let old = request
        .old
        .map(ObjectId::try_parse)
        .transpose()
        .map_err(|e| OrbError::ProtocolError(format!("malformed ref update request: {e}")))?;
    let new = ObjectId::try_parse(request.new)
        .map_err(|e| OrbError::ProtocolError(format!("malformed ref update request: {e}")))?;

    if !state.database.contains(&new) {
        return Err(OrbError::ProtocolError(format!(
            "refusing ref update to unknown object {new}"
        ))
        .into());
    }

    match state.refs.compare_and_swap(&branch, old.as_ref(), &new)? {
        CasResult::Updated => Ok(json_response(
            StatusCode::OK,
            serde_json::to_vec(&RefUpdateResponse {
                ok: true,
                error: None,
            })?,
        )),
        CasResult::Conflict { actual } => {
            let message = match (&actual, &old) {
                (Some(actual), Some(old)) => {
                    format!("ref {} moved: expected {old}, found {actual}", request.ref_name)
                }
                (Some(actual), None) => {
                    format!("ref {} already exists at {actual}", request.ref_name)
                }
                (None, _) => format!("ref {} does not exist", request.ref_name),
            };
            debug!("ref update conflict: {message}");

            Ok(json_response(
                StatusCode::CONFLICT,
                serde_json::to_vec(&RefUpdateResponse {
                    ok: false,
                    error: Some(message),
                })?,
            ))
        }
    }
}

fn error_response(error: &anyhow::Error) -> Response<Full<Bytes>> {
    let status = match error.downcast_ref::<OrbError>() {
        Some(OrbError::NotFound(_)) => StatusCode::NOT_FOUND,
        Some(
            OrbError::ProtocolError(_) | OrbError::CorruptObject(_) | OrbError::ValidationError(_),
        ) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("request failed: {error:#}");
    } else {
        debug!("request rejected: {error:#}");
    }

    json_error(status, &format!("{error:#}"))
}

fn unauthorized_response() -> Response<Full<Bytes>> {
    let mut response = json_error(StatusCode::UNAUTHORIZED, "authentication required");
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"orb\""),
    );

    response
}

fn text_response(body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );

    response
}

fn stream_response(body: Vec<u8>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );

    response
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    response
}

fn json_error(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    #[derive(serde::Serialize)]
    struct ErrorBody<'m> {
        error: &'m str,
    }

    let body = serde_json::to_vec(&ErrorBody { error: message }).unwrap_or_default();
    json_response(status, body)
}
