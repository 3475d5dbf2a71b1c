use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use crate::categories::CATEGORIES_MIME;
use crate::expense::{DateRange, NewExpense};
use crate::server::AppState;
use crate::service::{Payload, SummarizeRequest};
use crate::Error;
use std::sync::Arc;

type ApiResponse = (StatusCode, Json<serde_json::Value>);

/// Map an operation result onto a status code and its payload body
fn respond<T: Serialize>(result: crate::Result<T>) -> ApiResponse {
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(Payload::from(result).into_value()))
}

fn rejected(message: String) -> ApiResponse {
    tracing::debug!(%message, "rejected request");
    respond::<()>(Err(Error::InvalidInput(message)))
}

pub async fn health(State(state): State<Arc<AppState>>) -> ApiResponse {
    respond(state.service.store().stats())
}

pub async fn add_expense(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewExpense>, JsonRejection>,
) -> ApiResponse {
    match body {
        Ok(Json(expense)) => respond(state.service.add_expense(&expense)),
        Err(rejection) => rejected(rejection.body_text()),
    }
}

pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DateRange>, QueryRejection>,
) -> ApiResponse {
    match query {
        Ok(Query(range)) => respond(state.service.list_expenses(&range)),
        Err(rejection) => rejected(rejection.body_text()),
    }
}

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SummarizeRequest>, QueryRejection>,
) -> ApiResponse {
    match query {
        Ok(Query(params)) => respond(state.service.summarize(&params.range(), params.category.as_deref())),
        Err(rejection) => rejected(rejection.body_text()),
    }
}

pub async fn categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CATEGORIES_MIME)], state.categories.read())
}
