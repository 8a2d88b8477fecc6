//! HTTP surface: the `/api` switch endpoint and the browser UI files.
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::assets;
use crate::serial::Transport;
use crate::switch::{SwitchController, SwitchError, SwitchOutcome};

/// Body sent for anything other than an applied command.
pub const ERROR_BODY: &str = "Error";

const MAX_FORM_BYTES: u64 = 4 * 1024;

/// Form field carrying the command.
pub const SWITCH_FIELD: &str = "switch";

/// Every route the bridge serves.
///
/// The UI comes from `static_dir` when given, otherwise from the copy built
/// into the binary.
pub fn routes<T>(
    controller: Arc<SwitchController<T>>,
    static_dir: Option<PathBuf>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone
where
    T: Transport + 'static,
{
    switch_route(controller)
        .or(ui_route(static_dir))
        .with(warp::log("relay_bridge::http"))
}

fn ui_route(static_dir: Option<PathBuf>) -> BoxedFilter<(warp::reply::Response,)> {
    match static_dir {
        Some(dir) => warp::get()
            .and(warp::fs::dir(dir))
            .map(|file: warp::fs::File| file.into_response())
            .boxed(),
        None => assets::route().boxed(),
    }
}

/// First `switch` value in the form, empty when absent. Later duplicates are ignored.
pub fn switch_value(form: Vec<(String, String)>) -> String {
    form.into_iter()
        .find(|(key, _)| key == SWITCH_FIELD)
        .map(|(_, value)| value)
        .unwrap_or_default()
}

/// `POST /api` with a `switch=On|Off` form body.
pub fn switch_route<T>(
    controller: Arc<SwitchController<T>>,
) -> impl Filter<Extract = (warp::reply::Response,), Error = Rejection> + Clone
where
    T: Transport + 'static,
{
    warp::path("api")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_FORM_BYTES))
        .and(warp::body::form::<Vec<(String, String)>>())
        .map(switch_value)
        .and(with_controller(controller))
        .and_then(handle_switch::<T>)
}

fn with_controller<T>(
    controller: Arc<SwitchController<T>>,
) -> impl Filter<Extract = (Arc<SwitchController<T>>,), Error = Infallible> + Clone
where
    T: Transport + 'static,
{
    warp::any().map(move || controller.clone())
}

async fn handle_switch<T>(
    input: String,
    controller: Arc<SwitchController<T>>,
) -> Result<warp::reply::Response, Infallible>
where
    T: Transport + 'static,
{
    log::info!("Switch request: {:?}", input);

    // The transaction blocks until the device answers; keep it off the reactor.
    let (status, body) =
        match tokio::task::spawn_blocking(move || controller.apply_input(&input)).await {
            Ok(result) => render(result),
            Err(e) => {
                log::error!("Switch worker did not complete: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, ERROR_BODY)
            }
        };

    Ok(warp::reply::with_status(body, status).into_response())
}

/// Map a switch result onto the status and body the UI expects.
pub fn render(result: Result<SwitchOutcome, SwitchError>) -> (StatusCode, &'static str) {
    match result {
        Ok(outcome) => (StatusCode::OK, outcome.label()),
        Err(SwitchError::InvalidCommand(input)) => {
            log::warn!("Rejected unrecognized switch command {:?}", input);
            (StatusCode::BAD_REQUEST, ERROR_BODY)
        }
        Err(e @ SwitchError::Serial(_)) => {
            log::error!("{}", e);
            (StatusCode::BAD_GATEWAY, ERROR_BODY)
        }
    }
}
