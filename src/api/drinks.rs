// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drinks endpoints.
//!
//! Every handler takes the verified caller as its first argument through
//! [`Authorized`], so it only runs once the route's permission is granted.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use crate::{
    auth::{
        Authorized, Claims, DeleteDrinks, GetDrinks, GetDrinksDetail, PatchDrinks, PostDrinks,
    },
    error::{ApiError, ErrorBody},
    models::{
        CreateDrinkRequest, DeletedDrink, Drink, DrinkDetailList, DrinkSummaryList,
        UpdateDrinkRequest,
    },
    state::AppState,
};

fn subject(claims: &Claims) -> &str {
    claims.subject().unwrap_or("unknown")
}

fn rejected_body(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    ApiError::unprocessable("unprocessable")
}

fn drink_id(path: Result<Path<u64>, PathRejection>) -> Result<u64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::not_found("resource not found"))
}

#[utoipa::path(
    get,
    path = "/drinks",
    tag = "Drinks",
    responses(
        (status = 200, description = "Drinks in short form", body = DrinkSummaryList),
        (status = 400, description = "Permission missing", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn list_drinks(
    auth: Authorized<GetDrinks>,
    State(state): State<AppState>,
) -> Json<DrinkSummaryList> {
    tracing::debug!(subject = subject(&auth.claims), "listing drinks");
    let store = state.store.read().await;
    Json(DrinkSummaryList {
        success: true,
        drinks: store.list().iter().map(Drink::short).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = "Drinks",
    responses(
        (status = 200, description = "Drinks in long form", body = DrinkDetailList),
        (status = 400, description = "Permission missing", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn list_drink_details(
    auth: Authorized<GetDrinksDetail>,
    State(state): State<AppState>,
) -> Json<DrinkDetailList> {
    tracing::debug!(subject = subject(&auth.claims), "listing drink details");
    let store = state.store.read().await;
    Json(DrinkDetailList {
        success: true,
        drinks: store.list(),
    })
}

#[utoipa::path(
    post,
    path = "/drinks",
    request_body = CreateDrinkRequest,
    tag = "Drinks",
    responses(
        (status = 200, description = "The created drink", body = DrinkDetailList),
        (status = 400, description = "Invalid drink or permission missing", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 422, description = "Malformed body or duplicate title", body = ErrorBody)
    )
)]
pub async fn create_drink(
    auth: Authorized<PostDrinks>,
    State(state): State<AppState>,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinkDetailList>, ApiError> {
    let Json(request) = payload.map_err(rejected_body)?;
    let drink = state.store.write().await.create(request)?;

    tracing::info!(
        drink_id = drink.id,
        title = %drink.title,
        subject = subject(&auth.claims),
        "drink created"
    );
    Ok(Json(DrinkDetailList {
        success: true,
        drinks: vec![drink],
    }))
}

#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    params(("id" = u64, Path, description = "Drink id")),
    request_body = UpdateDrinkRequest,
    tag = "Drinks",
    responses(
        (status = 200, description = "The updated drink", body = DrinkDetailList),
        (status = 400, description = "Nothing to update or permission missing", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such drink", body = ErrorBody),
        (status = 422, description = "Malformed body or duplicate title", body = ErrorBody)
    )
)]
pub async fn update_drink(
    auth: Authorized<PatchDrinks>,
    path: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinkDetailList>, ApiError> {
    let id = drink_id(path)?;
    let Json(request) = payload.map_err(rejected_body)?;
    let drink = state.store.write().await.update(id, request)?;

    tracing::info!(drink_id = id, subject = subject(&auth.claims), "drink updated");
    Ok(Json(DrinkDetailList {
        success: true,
        drinks: vec![drink],
    }))
}

#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    params(("id" = u64, Path, description = "Drink id")),
    tag = "Drinks",
    responses(
        (status = 200, description = "Id of the deleted drink", body = DeletedDrink),
        (status = 400, description = "Permission missing", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such drink", body = ErrorBody)
    )
)]
pub async fn delete_drink(
    auth: Authorized<DeleteDrinks>,
    path: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<DeletedDrink>, ApiError> {
    let id = drink_id(path)?;
    state.store.write().await.delete(id)?;

    tracing::info!(drink_id = id, subject = subject(&auth.claims), "drink deleted");
    Ok(Json(DeletedDrink {
        success: true,
        delete: id,
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("resource not found")
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
