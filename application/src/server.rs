//! HTTP surface of the [`api::Schema`].

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{MatchedPath, WebSocketUpgrade},
    response::{IntoResponse, Response},
    routing::{get, on, MethodFilter},
    Extension, Json, Router,
};
use axum_client_ip::InsecureClientIp;
use derive_more::Debug;
use juniper::{http::GraphQLBatchResponse, DefaultScalarValue, ScalarValue};
use juniper_axum::{extract::JuniperRequest, subscriptions};
use juniper_graphql_ws::ConnectionConfig;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing as log;

use crate::{api, Context, Service};

/// [`juniper`] GraphQL response along with the HTTP status to reply with
/// when it carries errors.
#[derive(Debug)]
pub struct JuniperResponse<S = DefaultScalarValue>
where
    S: ScalarValue,
{
    /// Status code of the response, if it's not a successful one.
    pub status_code: http::StatusCode,

    /// Underlying GraphQL response.
    #[debug(skip)]
    pub response: GraphQLBatchResponse<S>,
}

impl<S: ScalarValue> IntoResponse for JuniperResponse<S> {
    fn into_response(self) -> Response {
        let status = if self.response.is_ok() {
            http::StatusCode::OK
        } else {
            self.status_code
        };
        (status, Json(self.response)).into_response()
    }
}

/// Builds the [`Router`] serving the [`api::Schema`] on top of the
/// provided [`Service`].
///
/// Routes:
/// - `GET|POST /graphql` for queries and mutations;
/// - `GET /subscriptions` for subscriptions over WebSocket.
pub fn router(service: Service, cors: CorsLayer) -> Router {
    let schema = api::Schema::new(api::Query, api::Mutation, api::Subscription);

    Router::new()
        .route(
            "/graphql",
            on(MethodFilter::GET.or(MethodFilter::POST), graphql),
        )
        .route("/subscriptions", get(subscriptions))
        .layer(Extension(Arc::new(schema)))
        .layer(Extension(service))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(record_response),
        )
}

/// Builds the [`CorsLayer`] allowing the provided `origins`.
///
/// `*` among them allows any origin.
///
/// # Errors
///
/// If any of the `origins` is not a valid header value.
pub fn cors<'o>(
    origins: impl IntoIterator<Item = &'o str>,
) -> Result<CorsLayer, http::header::InvalidHeaderValue> {
    let origins = origins
        .into_iter()
        .map(str::parse::<http::HeaderValue>)
        .collect::<Result<Vec<_>, _>>()?;
    let origins = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::OPTIONS,
            http::Method::POST,
        ])
        .allow_headers([
            http::header::AUTHORIZATION,
            http::header::CONTENT_TYPE,
        ])
        .allow_origin(origins))
}

/// GraphQL API handler.
pub async fn graphql(
    Extension(schema): Extension<Arc<api::Schema>>,
    context: Context,
    JuniperRequest(request): JuniperRequest,
) -> JuniperResponse {
    let response = request.execute(&*schema, &context).await;
    JuniperResponse {
        status_code: context.error_status_code(),
        response,
    }
}

/// GraphQL subscriptions handler.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
pub async fn subscriptions(
    Extension(schema): Extension<Arc<api::Schema>>,
    mut context: Context,
    ws: WebSocketUpgrade,
) -> Response {
    ws.protocols(["graphql-transport-ws", "graphql-ws"])
        .max_frame_size(1024)
        .max_message_size(1024)
        .on_upgrade(move |socket| {
            subscriptions::serve_ws(socket, schema, move |vars| async move {
                context.apply_subscription_variables(&vars).map(|()| {
                    ConnectionConfig::new(context)
                        .with_max_in_flight_operations(10)
                })
            })
        })
}

/// Opens the [`tracing::Span`] of an incoming HTTP request.
fn request_span<B>(req: &http::Request<B>) -> tracing::Span {
    let headers = req.headers();
    log::info_span!(
        "HTTP request",
        http.client_ip = InsecureClientIp::from(headers, req.extensions())
            .map(|ip| ip.0.to_string())
            .ok(),
        http.method = req.method().as_str(),
        http.route = req
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str),
        http.target = req
            .uri()
            .path_and_query()
            .map(http::uri::PathAndQuery::as_str),
        http.user_agent = headers
            .get(http::header::USER_AGENT)
            .and_then(|h| h.to_str().ok()),
        http.status_code = tracing::field::Empty,
    )
}

/// Records the status of an outgoing HTTP response into its `span`.
fn record_response<B>(
    res: &http::Response<B>,
    took: Duration,
    span: &tracing::Span,
) {
    let status = res.status();
    _ = span.record("http.status_code", status.as_u16());

    let took = format!("{}ms", took.as_millis());
    if status.is_server_error() {
        log::error!(duration = took);
    } else if status.is_client_error() {
        log::warn!(duration = took);
    } else {
        log::info!(duration = took);
    }
}
