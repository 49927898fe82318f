/**
 * Failure Middleware
 *
 * This module installs the failure dispatcher as the terminal failure
 * handler of a router. Every response is inspected once on its way out: if
 * it carries a parked `Failure`, the dispatcher replaces it with the final
 * error envelope.
 *
 * Handler panics are caught by `CatchPanicLayer` inside this middleware and
 * parked as unclassified failures, so they follow the same path.
 */

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::backend::error::{Defect, Failure, FailureDispatcher, RequestContext};

/// Dispatch the failure parked in a response, if any
///
/// The failure is removed from the response before dispatching, so it can
/// never be handled twice.
pub async fn dispatch_failures(
    State(dispatcher): State<Arc<FailureDispatcher>>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::from_request(&request);
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<Failure>() {
        Some(failure) => dispatcher.dispatch(failure, &ctx),
        None => response,
    }
}

/// Turn a caught panic into a parked unclassified failure
pub fn panic_to_failure(payload: Box<dyn Any + Send + 'static>) -> Response {
    Failure::Unclassified(Defect::from_panic(payload.as_ref())).into_response()
}

/// Install failure handling on a router
///
/// Must be applied after every route and the fallback have been added, so that
/// the layers wrap all of them.
pub fn with_failure_handling<S>(router: Router<S>, dispatcher: Arc<FailureDispatcher>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(panic_to_failure))
        .layer(middleware::from_fn_with_state(dispatcher, dispatch_failures))
}
