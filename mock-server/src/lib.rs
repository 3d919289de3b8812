use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the server saw, returned by `/echo` and at the end of a redirect chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Lowercased names; repeated headers joined with `", "`.
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Deserialize)]
pub struct RedirectTo {
    pub url: String,
}

#[derive(Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/redirect/{hops}", any(redirect))
        .route("/redirect-to", any(redirect_to))
        .route("/login", post(login))
        .route("/basic-auth/{user}/{password}", get(basic_auth))
        .route("/status/{code}", any(status))
        .route("/bytes/{len}", get(bytes))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn echo_of(method: &Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) -> Echo {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: collected,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    Json(echo_of(&method, &uri, &headers, &body))
}

/// Redirect `hops` more times, relative `Location`, then echo.
async fn redirect(
    Path(hops): Path<u32>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if hops == 0 {
        return Json(echo_of(&method, &uri, &headers, &body)).into_response();
    }
    let location = format!("/redirect/{}", hops - 1);
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

async fn redirect_to(Query(target): Query<RedirectTo>) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, target.url)]).into_response()
}

async fn login(Form(login): Form<Login>) -> Response {
    if login.password.is_empty() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let cookie = format!("session={}; Path=/", login.username);
    (StatusCode::OK, [(header::SET_COOKIE, cookie)]).into_response()
}

async fn basic_auth(Path((user, password)): Path<(String, String)>, headers: HeaderMap) -> StatusCode {
    let expected = format!("{user}:{password}");
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Basic "))
        .and_then(|token| STANDARD.decode(token).ok())
        .is_some_and(|decoded| decoded == expected.as_bytes());
    if authorized {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

/// `len` bytes of `x`, for exercising large response bodies.
async fn bytes(Path(len): Path<usize>) -> Vec<u8> {
    vec![b'x'; len]
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}
