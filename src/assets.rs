//! Browser UI built into the binary, served when no `--static-dir` is given.
use warp::path::Tail;
use warp::{Filter, Rejection, Reply};

#[derive(Debug)]
pub struct Asset {
    pub path: &'static str,
    pub content_type: &'static str,
    pub body: &'static str,
}

pub const ASSETS: &[Asset] = &[
    Asset {
        path: "index.html",
        content_type: "text/html; charset=utf-8",
        body: include_str!("../static/index.html"),
    },
    Asset {
        path: "css/style.css",
        content_type: "text/css; charset=utf-8",
        body: include_str!("../static/css/style.css"),
    },
    Asset {
        path: "js/index.js",
        content_type: "application/javascript; charset=utf-8",
        body: include_str!("../static/js/index.js"),
    },
];

/// Look up an asset by request path; the root maps to `index.html`.
pub fn find(path: &str) -> Option<&'static Asset> {
    let path = path.trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };
    ASSETS.iter().find(|asset| asset.path == path)
}

/// `GET /<asset>` from the built-in set.
pub fn route() -> impl Filter<Extract = (warp::reply::Response,), Error = Rejection> + Clone {
    warp::get().and(warp::path::tail()).and_then(|tail: Tail| async move {
        match find(tail.as_str()) {
            Some(asset) => Ok(warp::reply::with_header(
                asset.body,
                "content-type",
                asset.content_type,
            )
            .into_response()),
            None => Err(warp::reject::not_found()),
        }
    })
}
