//! Route wiring
//!
//! Path-form filename routes rely on warp leaving path segments
//! undecoded, so a percent-escaped filename reaches the handler exactly
//! as it appeared on the wire.

use crate::handlers::{self, FilenameQuery};
use docgate_transport::Transport;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

/// Upload bodies above this size are rejected before buffering.
const MAX_UPLOAD_BYTES: u64 = 64 * 1024 * 1024;

fn with_transport(
    transport: Arc<dyn Transport>,
) -> impl Filter<Extract = (Arc<dyn Transport>,), Error = Infallible> + Clone {
    warp::any().map(move || transport.clone())
}

/// The full gateway route set.
pub fn routes(
    transport: Arc<dyn Transport>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let upload = warp::path!("api" / "spreadsheet" / "upload")
        .and(warp::post())
        .and(warp::header::optional::<String>("content-type"))
        .and(warp::body::content_length_limit(MAX_UPLOAD_BYTES))
        .and(warp::body::bytes())
        .and(with_transport(transport.clone()))
        .and_then(handlers::upload_spreadsheet);

    let status = warp::path!("api" / "spreadsheet" / "status")
        .and(warp::get())
        .and(with_transport(transport.clone()))
        .and_then(handlers::spreadsheet_status);

    let clear = warp::path!("api" / "spreadsheet" / "clear")
        .and(warp::delete())
        .and(with_transport(transport.clone()))
        .and_then(handlers::clear_spreadsheet);

    let list = warp::path!("api" / "artifacts")
        .and(warp::get())
        .and(with_transport(transport.clone()))
        .and_then(handlers::list_artifacts);

    let download_by_path = warp::path!("api" / "artifacts" / "download" / String)
        .and(warp::get())
        .and(with_transport(transport.clone()))
        .and_then(handlers::download_by_path);

    let download_by_query = warp::path!("api" / "artifacts" / "download")
        .and(warp::get())
        .and(warp::query::<FilenameQuery>())
        .and(with_transport(transport.clone()))
        .and_then(handlers::download_by_query);

    let delete_by_path = warp::path!("api" / "artifacts" / "delete" / String)
        .and(warp::delete())
        .and(with_transport(transport.clone()))
        .and_then(handlers::delete_by_path);

    let delete_by_query = warp::path!("api" / "artifacts" / "delete")
        .and(warp::delete())
        .and(warp::query::<FilenameQuery>())
        .and(with_transport(transport.clone()))
        .and_then(handlers::delete_by_query);

    let delete_all = warp::path!("api" / "artifacts")
        .and(warp::delete())
        .and(with_transport(transport))
        .and_then(handlers::delete_all_artifacts);

    upload
        .or(status)
        .or(clear)
        .or(list)
        .or(download_by_path)
        .or(download_by_query)
        .or(delete_by_path)
        .or(delete_by_query)
        .or(delete_all)
}
