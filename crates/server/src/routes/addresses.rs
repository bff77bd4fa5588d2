//! Address book route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use suya_core::{AddressId, AddressKind};

use crate::db::AddressRepository;
use crate::db::addresses::{AddressPatch, NewAddress};
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Address;
use crate::state::AppState;

/// Create-address request body.
#[derive(Debug, Deserialize)]
pub struct CreateAddressRequest {
    #[serde(default)]
    pub kind: AddressKind,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// Update-address request body; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateAddressRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub is_default: Option<bool>,
}

/// List the user's addresses, defaults first.
#[instrument(skip(state, user))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Address>>> {
    let addresses = AddressRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(addresses))
}

/// Create an address.
#[instrument(skip(state, user, request))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateAddressRequest>,
) -> Result<impl IntoResponse> {
    let line1 = request.address_line1.unwrap_or_default();
    let city = request.city.unwrap_or_default();
    let region = request.state.unwrap_or_default();

    if line1.is_empty() || city.is_empty() || region.is_empty() {
        return Err(AppError::BadRequest(
            "address_line1, city and state are required".to_string(),
        ));
    }

    let address = AddressRepository::new(state.pool())
        .create(
            user.id,
            NewAddress {
                kind: request.kind,
                first_name: request.first_name.unwrap_or_default(),
                last_name: request.last_name.unwrap_or_default(),
                address_line1: line1,
                address_line2: request.address_line2.unwrap_or_default(),
                city,
                state: region,
                postal_code: request.postal_code.unwrap_or_default(),
                country: request.country.unwrap_or_else(|| "Nigeria".to_string()),
                phone: request.phone.unwrap_or_default(),
                is_default: request.is_default,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(address)))
}

/// Update an address the user owns.
#[instrument(skip(state, user, request))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
    Json(request): Json<UpdateAddressRequest>,
) -> Result<Json<Address>> {
    let address = AddressRepository::new(state.pool())
        .update(
            user.id,
            id,
            AddressPatch {
                first_name: request.first_name,
                last_name: request.last_name,
                address_line1: request.address_line1,
                address_line2: request.address_line2,
                city: request.city,
                state: request.state,
                postal_code: request.postal_code,
                country: request.country,
                phone: request.phone,
                is_default: request.is_default,
            },
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Not found".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Json(address))
}

/// Delete an address the user owns.
#[instrument(skip(state, user))]
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> Result<Json<serde_json::Value>> {
    AddressRepository::new(state.pool())
        .delete(user.id, id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Not found".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({ "success": true })))
}
