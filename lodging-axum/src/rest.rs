use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::MethodRouter,
    Json, Router,
};
use lodging_core::errors::LodgingError;
use lodging_core::{CallContext, LodgingApp, ServiceCapabilities, ServiceMethodKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::{
    params::{FromRestParams, RestParams},
    LodgingAxumError, LodgingAxumState,
};

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

fn map_json_rejection(rejection: JsonRejection) -> LodgingAxumError {
    LodgingError::bad_request("Failed to parse the request body as JSON")
        .with_errors(json!({"_schema": [rejection.body_text()]}))
        .into()
}

fn call_context(headers: &HeaderMap) -> CallContext {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    CallContext::new("rest").with_request_id(request_id)
}

fn rest_params<P: FromRestParams>(headers: &HeaderMap, query: HashMap<String, String>) -> P {
    P::from_rest_params(RestParams::from_parts("rest", headers, query))
}

pub(crate) async fn method_not_allowed() -> LodgingAxumError {
    LodgingError::method_not_allowed("Method not allowed on this resource").into()
}

pub(crate) async fn route_not_found() -> LodgingAxumError {
    LodgingError::not_found("Route not found").into()
}

/// `/` (find, create) and `/{id}` (get, patch, remove) for one service,
/// limited to what `capabilities` allows.
pub fn service_router<R, P>(
    service_name: Arc<String>,
    app: Arc<LodgingApp<R, P>>,
    capabilities: &ServiceCapabilities,
) -> Router<()>
where
    R: Serialize + DeserializeOwned + Send + Sync + 'static,
    P: FromRestParams + Send + Sync + Clone + 'static,
{
    let state = LodgingAxumState { app };

    let mut collection: MethodRouter<LodgingAxumState<R, P>> = MethodRouter::new();
    let mut member: MethodRouter<LodgingAxumState<R, P>> = MethodRouter::new();

    if capabilities.allows(ServiceMethodKind::Find) {
        let service_name = Arc::clone(&service_name);
        collection = collection.get(
            move |State(state): State<LodgingAxumState<R, P>>,
                  headers: HeaderMap,
                  Query(query): Query<HashMap<String, String>>| async move {
                let params = rest_params::<P>(&headers, query);

                let svc = state.app.service(&service_name)?;
                let res = svc.find(call_context(&headers), params).await?;
                Ok::<_, LodgingAxumError>(Json(res))
            },
        );
    }

    if capabilities.allows(ServiceMethodKind::Create) {
        let service_name = Arc::clone(&service_name);
        collection = collection.post(
            move |State(state): State<LodgingAxumState<R, P>>,
                  headers: HeaderMap,
                  Query(query): Query<HashMap<String, String>>,
                  data: Result<Json<R>, JsonRejection>| async move {
                let Json(data) = data.map_err(map_json_rejection)?;
                let params = rest_params::<P>(&headers, query);

                let svc = state.app.service(&service_name)?;
                let res = svc.create(call_context(&headers), data, params).await?;
                Ok::<_, LodgingAxumError>(Json(res))
            },
        );
    }

    if capabilities.allows(ServiceMethodKind::Get) {
        let service_name = Arc::clone(&service_name);
        member = member.get(
            move |State(state): State<LodgingAxumState<R, P>>,
                  headers: HeaderMap,
                  Query(query): Query<HashMap<String, String>>,
                  Path(id): Path<String>| async move {
                let params = rest_params::<P>(&headers, query);

                let svc = state.app.service(&service_name)?;
                let res = svc.get(call_context(&headers), &id, params).await?;
                Ok::<_, LodgingAxumError>(Json(res))
            },
        );
    }

    if capabilities.allows(ServiceMethodKind::Patch) {
        let service_name = Arc::clone(&service_name);
        member = member.patch(
            move |State(state): State<LodgingAxumState<R, P>>,
                  headers: HeaderMap,
                  Query(query): Query<HashMap<String, String>>,
                  Path(id): Path<String>,
                  data: Result<Json<R>, JsonRejection>| async move {
                let Json(data) = data.map_err(map_json_rejection)?;
                let params = rest_params::<P>(&headers, query);

                let svc = state.app.service(&service_name)?;
                let res = svc
                    .patch(call_context(&headers), Some(&id), data, params)
                    .await?;
                Ok::<_, LodgingAxumError>(Json(res))
            },
        );
    }

    if capabilities.allows(ServiceMethodKind::Remove) {
        let service_name = Arc::clone(&service_name);
        member = member.delete(
            move |State(state): State<LodgingAxumState<R, P>>,
                  headers: HeaderMap,
                  Query(query): Query<HashMap<String, String>>,
                  Path(id): Path<String>| async move {
                let params = rest_params::<P>(&headers, query);

                let svc = state.app.service(&service_name)?;
                let res = svc.remove(call_context(&headers), Some(&id), params).await?;
                Ok::<_, LodgingAxumError>(Json(res))
            },
        );
    }

    let has_collection = capabilities.allows(ServiceMethodKind::Find)
        || capabilities.allows(ServiceMethodKind::Create);
    let has_member = [
        ServiceMethodKind::Get,
        ServiceMethodKind::Patch,
        ServiceMethodKind::Remove,
    ]
    .into_iter()
    .any(|m| capabilities.allows(m));

    let mut router = Router::new();
    if has_collection {
        router = router.route("/", collection.fallback(method_not_allowed));
    }
    if has_member {
        router = router.route("/{id}", member.fallback(method_not_allowed));
    }

    router.with_state(state)
}
