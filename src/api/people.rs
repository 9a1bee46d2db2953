//! Member and librarian endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        debt::Debt,
        person::{CreatePerson, PersonDebtsQuery, PersonResponse, Role},
    },
};

/// Person registration response
#[derive(Serialize, ToSchema)]
pub struct PersonResult {
    pub result: PersonResponse,
}

/// Register a new member (socio)
#[utoipa::path(
    post,
    path = "/person/socio",
    tag = "people",
    request_body = CreatePerson,
    responses(
        (status = 201, description = "Member registered", body = PersonResult),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "DNI already registered")
    )
)]
pub async fn register_member(
    State(state): State<crate::AppState>,
    Json(request): Json<CreatePerson>,
) -> AppResult<(StatusCode, Json<PersonResult>)> {
    let person = state.services.people.register(Role::Member, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(PersonResult {
            result: person.into(),
        }),
    ))
}

/// Register a new librarian (bibliotecario)
#[utoipa::path(
    post,
    path = "/person/bibliotecario",
    tag = "people",
    request_body = CreatePerson,
    responses(
        (status = 201, description = "Librarian registered", body = PersonResult),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "DNI already registered")
    )
)]
pub async fn register_librarian(
    State(state): State<crate::AppState>,
    Json(request): Json<CreatePerson>,
) -> AppResult<(StatusCode, Json<PersonResult>)> {
    let person = state
        .services
        .people
        .register(Role::Librarian, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PersonResult {
            result: person.into(),
        }),
    ))
}

/// List all members
#[utoipa::path(
    get,
    path = "/person/socios",
    tag = "people",
    responses(
        (status = 200, description = "All members", body = Vec<PersonResponse>)
    )
)]
pub async fn list_members(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<PersonResponse>>> {
    let people = state.services.people.list_by_role(Role::Member).await?;
    Ok(Json(people.into_iter().map(Into::into).collect()))
}

/// List all librarians
#[utoipa::path(
    get,
    path = "/person/bibliotecarios",
    tag = "people",
    responses(
        (status = 200, description = "All librarians", body = Vec<PersonResponse>)
    )
)]
pub async fn list_librarians(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<PersonResponse>>> {
    let people = state.services.people.list_by_role(Role::Librarian).await?;
    Ok(Json(people.into_iter().map(Into::into).collect()))
}

/// Get debts for a person
#[utoipa::path(
    get,
    path = "/person/{id}/deudas",
    tag = "people",
    params(
        ("id" = i32, Path, description = "Person ID"),
        PersonDebtsQuery
    ),
    responses(
        (status = 200, description = "Person's debts", body = Vec<Debt>),
        (status = 404, description = "Person not found")
    )
)]
pub async fn person_debts(
    State(state): State<crate::AppState>,
    Path(person_id): Path<i32>,
    Query(query): Query<PersonDebtsQuery>,
) -> AppResult<Json<Vec<Debt>>> {
    let debts = state
        .services
        .people
        .debts_for_person(person_id, query.only_unpaid.unwrap_or(true))
        .await?;
    Ok(Json(debts))
}
