use std::io::{Cursor, Read};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use polybot::dispatch::Update;

use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub fn text_response(status: u16, body: &str) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.as_bytes().to_vec();
    let len = bytes.len();
    Response::new(
        StatusCode(status),
        vec![Header::from_bytes(b"Content-Type", b"text/plain; charset=utf-8").unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn ok() -> Response<Cursor<Vec<u8>>> {
    text_response(200, "Ok")
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    text_response(404, "404 Not Found")
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum Route {
    Health,
    Webhook,
    NotFound,
}

/// Maps a request line to a route. The webhook path is matched with or
/// without its trailing slash.
pub fn classify(method: &Method, path: &str, webhook_path: &str) -> Route {
    let webhook_bare = webhook_path.trim_end_matches('/');
    match (method, path) {
        (Method::Get, "/") => Route::Health,
        (Method::Post, p) if p == webhook_path || p == webhook_bare => Route::Webhook,
        _ => Route::NotFound,
    }
}

/// Dispatches one HTTP request.
///
/// Webhook calls are always acknowledged with `200 Ok`, even when the payload
/// is unusable, so the platform does not redeliver it.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();
    let path   = url.split('?').next().unwrap_or("").to_owned();

    let response = match classify(&method, &path, &state.webhook_path) {
        Route::Health   => ok(),
        Route::Webhook  => {
            handle_webhook(&mut request, &state);
            ok()
        }
        Route::NotFound => {
            log::debug!("404 for {} {}", method, path);
            not_found()
        }
    };

    if let Err(e) = request.respond(response) {
        log::warn!("Failed to write response: {}", e);
    }
}

fn handle_webhook(request: &mut Request, state: &SharedState) {
    let mut body = String::new();
    if let Err(e) = request.as_reader().read_to_string(&mut body) {
        log::warn!("Failed to read webhook body: {}", e);
        return;
    }

    let update: Update = match serde_json::from_str(&body) {
        Ok(update) => update,
        Err(e) => {
            log::warn!("Ignoring malformed update: {}", e);
            return;
        }
    };

    match update.message {
        Some(message) => {
            let outcome = state.dispatcher.handle_message(&message);
            log::debug!("Message {} handled: {:?}", message.message_id, outcome);
        }
        None => log::debug!("Ignoring update {:?} without a message", update.update_id),
    }
}
