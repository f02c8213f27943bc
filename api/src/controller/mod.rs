//! Generic document controller.
//!
//! One set of handlers reusable for any [`Document`] type: list with
//! filter/sort/projection/pagination, fetch, create, merge-update and
//! delete, all answering with the uniform envelope. Entity routes do
//! their DTO work first and delegate here.

pub mod options;

use std::collections::HashMap;

use actix_web::HttpResponse;
use serde_json::{Map, Value};
use uuid::Uuid;

use cl_core::errors::DomainError;
use cl_core::repositories::{Document, Repository};
use cl_shared::{Envelope, PageInfo, PagedDocs};

use crate::handlers::ApiResult;

/// List documents with the full query surface
pub async fn list<D: Document>(
    repo: &dyn Repository<D>,
    params: &HashMap<String, String>,
) -> ApiResult<HttpResponse> {
    let query = options::resolve(params);

    let docs = repo.get_all(&query).await?;
    // The descriptor counts every match, not just this page.
    let total_count = repo.count(&query.filter).await?;
    let paging = PageInfo::new(&query.page, total_count);

    Ok(HttpResponse::Ok().json(Envelope::success("fetched", PagedDocs::new(docs, paging))))
}

/// Fetch one document by id, optionally populating relations
pub async fn get_one<D: Document>(
    repo: &dyn Repository<D>,
    id: Uuid,
    params: &HashMap<String, String>,
) -> ApiResult<HttpResponse> {
    let populate = options::resolve_populate(params.get("populate"));

    let doc = repo
        .get_one_by_id(id, &populate)
        .await?
        .ok_or_else(|| DomainError::not_found(D::RESOURCE))?;

    Ok(HttpResponse::Ok().json(Envelope::success("fetched", doc)))
}

/// Validate and persist a new document
pub async fn create_one<D: Document>(repo: &dyn Repository<D>, doc: D) -> ApiResult<HttpResponse> {
    let created = repo.create_one(doc).await?;
    Ok(HttpResponse::Created().json(Envelope::success("created", created)))
}

/// Merge fields into an existing document
///
/// A miss on the pre-check is a 404; a miss on the write after the
/// pre-check passed means someone else deleted the record, reported as
/// a conflict.
pub async fn update_one<D: Document>(
    repo: &dyn Repository<D>,
    id: Uuid,
    fields: Map<String, Value>,
) -> ApiResult<HttpResponse> {
    if !repo.is_exist(id).await? {
        return Err(DomainError::not_found(D::RESOURCE).into());
    }

    let updated = repo
        .update_one_by_id(id, fields)
        .await?
        .ok_or_else(|| DomainError::Conflict {
            resource: D::RESOURCE.to_string(),
        })?;

    Ok(HttpResponse::Ok().json(Envelope::success("updated", updated)))
}

/// Delete a document by id
///
/// The store's delete is silent about misses, so existence is checked
/// first to report a 404.
pub async fn delete_one<D: Document>(repo: &dyn Repository<D>, id: Uuid) -> ApiResult<HttpResponse> {
    if !repo.is_exist(id).await? {
        return Err(DomainError::not_found(D::RESOURCE).into());
    }

    repo.delete_one_by_id(id).await?;
    Ok(HttpResponse::Ok().json(Envelope::<()>::success_empty("deleted")))
}
