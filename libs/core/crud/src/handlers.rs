//! Handler factory: the same four handlers for every [`Entity`].
//!
//! Each function is generic over the entity and its repository, so
//! `get_one::<SubCategory, MongoRepository<SubCategory>>` is a ready-made
//! axum handler with state `Arc<R>`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use axum_helpers::{RawQuery, UuidPath, ValidatedJson};
use mongodb::bson::Document;
use query_features::{QueryFeatures, QueryParams};
use tracing::instrument;

use crate::entity::Entity;
use crate::error::{CrudError, CrudResult};
use crate::repository::CrudRepository;
use crate::responses::{DataResponse, PaginatedResponse};

/// Router with list, create, get, update and delete for `E`.
///
/// ```ignore
/// let repository = Arc::new(MongoRepository::<SubCategory>::new(&db));
/// let app = Router::new().nest("/subCategory", crud::router::<SubCategory, _>(repository));
/// ```
pub fn router<E, R>(repository: Arc<R>) -> Router
where
    E: Entity,
    R: CrudRepository<E> + 'static,
{
    Router::new()
        .route("/", get(get_all::<E, R>).post(create_one::<E, R>))
        .route(
            "/{id}",
            get(get_one::<E, R>)
                .put(update_one::<E, R>)
                .delete(delete_one::<E, R>),
        )
        .with_state(repository)
}

/// Validated payload → new entity → 201 `{ data }`.
pub async fn create_one<E, R>(
    State(repository): State<Arc<R>>,
    ValidatedJson(input): ValidatedJson<E::Create>,
) -> CrudResult<(StatusCode, Json<DataResponse<E>>)>
where
    E: Entity,
    R: CrudRepository<E> + 'static,
{
    let entity = repository.create(E::new(input)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(entity))))
}

/// 200 `{ data }`, or 404 when no entity has this id.
pub async fn get_one<E, R>(
    State(repository): State<Arc<R>>,
    UuidPath(id): UuidPath,
) -> CrudResult<Json<DataResponse<E>>>
where
    E: Entity,
    R: CrudRepository<E> + 'static,
{
    let entity = repository
        .find_by_id(id)
        .await?
        .ok_or(CrudError::not_found(E::DISPLAY_NAME, id))?;

    Ok(Json(DataResponse::new(entity)))
}

/// Partial update; 200 `{ data }` with the updated entity, or 404.
pub async fn update_one<E, R>(
    State(repository): State<Arc<R>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<E::Update>,
) -> CrudResult<Json<DataResponse<E>>>
where
    E: Entity,
    R: CrudRepository<E> + 'static,
{
    let set = E::prepare_update(&input)?;
    let entity = repository
        .find_and_update(id, set)
        .await?
        .ok_or(CrudError::not_found(E::DISPLAY_NAME, id))?;

    Ok(Json(DataResponse::new(entity)))
}

/// 204 with no body, or 404 when there was nothing to delete.
pub async fn delete_one<E, R>(
    State(repository): State<Arc<R>>,
    UuidPath(id): UuidPath,
) -> CrudResult<StatusCode>
where
    E: Entity,
    R: CrudRepository<E> + 'static,
{
    repository
        .find_and_delete(id)
        .await?
        .ok_or(CrudError::not_found(E::DISPLAY_NAME, id))?;

    Ok(StatusCode::NO_CONTENT)
}

/// 200 `{ results, paginationResult, data }` over the whole collection.
pub async fn get_all<E, R>(
    State(repository): State<Arc<R>>,
    RawQuery(params): RawQuery,
) -> CrudResult<Json<PaginatedResponse>>
where
    E: Entity,
    R: CrudRepository<E> + 'static,
{
    let page = find_page::<E, R>(repository.as_ref(), &params, Document::new()).await?;
    Ok(Json(page))
}

/// Runs the query pipeline for `E` and fetches one page.
///
/// `base_filter` scopes the listing (e.g. to a parent category) and takes
/// precedence over filters from the query string.
#[instrument(skip(repository, params), fields(collection = E::COLLECTION))]
pub async fn find_page<E, R>(
    repository: &R,
    params: &QueryParams,
    base_filter: Document,
) -> CrudResult<PaginatedResponse>
where
    E: Entity,
    R: CrudRepository<E> + ?Sized,
{
    let features = QueryFeatures::new(params, &E::QUERY_SCHEMA)
        .with_base_filter(base_filter)
        .filter()?
        .search()
        .limit_fields()?
        .sort()?;

    let total = repository.count().await?;
    let (query, pagination_result) = features.pagination(total).build();

    let data = repository.find_many(query).await?;
    Ok(PaginatedResponse::new(data, pagination_result))
}
