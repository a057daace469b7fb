use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::api::error::{lock, ApiError};
use crate::api::middleware::AdminAuth;
use crate::api::models::{
    ContributionRequest, ContributionUpdateRequest, GlossaryResponse, PaginationQuery, StatusQuery,
};
use crate::db::{
    service::{DbService, ReviewOutcome},
    ContributionStatus, DbPool,
};
use crate::knowledge::glossary;

type ApiResult = Result<HttpResponse, ApiError>;

const MAX_PAGE: usize = 500;

// --- Public ---

#[get("/glossary")]
pub async fn get_glossary(pool: web::Data<DbPool>) -> ApiResult {
    let conn = lock(&pool)?;
    let community =
        DbService::list_contributions(&conn, Some(ContributionStatus::Approved), MAX_PAGE, 0)?;
    Ok(HttpResponse::Ok().json(GlossaryResponse {
        builtin: glossary(),
        community,
    }))
}

#[post("/contributions")]
pub async fn submit_contribution(
    pool: web::Data<DbPool>,
    req: web::Json<ContributionRequest>,
) -> ApiResult {
    let req = req.into_inner();
    let layer = req.validate()?;
    let contributor = req
        .contributor
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("anonymous");

    let conn = lock(&pool)?;
    let contribution = DbService::insert_contribution(
        &conn,
        req.term.trim(),
        req.definition.trim(),
        layer,
        contributor,
    )?;
    Ok(HttpResponse::Created().json(contribution))
}

#[get("/contributions")]
pub async fn list_approved(
    pool: web::Data<DbPool>,
    query: web::Query<PaginationQuery>,
) -> ApiResult {
    let conn = lock(&pool)?;
    let contributions = DbService::list_contributions(
        &conn,
        Some(ContributionStatus::Approved),
        query.limit.min(MAX_PAGE),
        query.offset,
    )?;
    Ok(HttpResponse::Ok().json(contributions))
}

// --- Moderation (admin) ---

#[get("/contributions")]
pub async fn list_for_review(pool: web::Data<DbPool>, query: web::Query<StatusQuery>) -> ApiResult {
    let status = match query.status.as_deref() {
        Some(s) => Some(s.parse::<ContributionStatus>().map_err(ApiError::Validation)?),
        None => None,
    };

    let conn = lock(&pool)?;
    let contributions =
        DbService::list_contributions(&conn, status, query.limit.min(MAX_PAGE), query.offset)?;
    Ok(HttpResponse::Ok().json(contributions))
}

#[put("/contributions/{id}")]
pub async fn update_contribution(
    pool: web::Data<DbPool>,
    id: web::Path<Uuid>,
    req: web::Json<ContributionUpdateRequest>,
) -> ApiResult {
    let req = req.into_inner();
    let layer = req.validate()?;

    let conn = lock(&pool)?;
    let updated = DbService::update_contribution(
        &conn,
        id.into_inner(),
        req.term.trim(),
        req.definition.trim(),
        layer,
    )?;
    match updated {
        Some(contribution) => Ok(HttpResponse::Ok().json(contribution)),
        None => Err(ApiError::NotFound("Contribution")),
    }
}

fn review(pool: &DbPool, id: Uuid, decision: ContributionStatus) -> ApiResult {
    let conn = lock(pool)?;
    match DbService::review_contribution(&conn, id, decision)? {
        ReviewOutcome::Reviewed(contribution) => Ok(HttpResponse::Ok().json(contribution)),
        ReviewOutcome::NotFound => Err(ApiError::NotFound("Contribution")),
        ReviewOutcome::NotPending(current) => Err(ApiError::Conflict(format!(
            "Contribution is already {}; only pending contributions can be reviewed",
            current.as_str()
        ))),
    }
}

#[post("/contributions/{id}/approve")]
pub async fn approve_contribution(pool: web::Data<DbPool>, id: web::Path<Uuid>) -> ApiResult {
    review(&pool, id.into_inner(), ContributionStatus::Approved)
}

#[post("/contributions/{id}/reject")]
pub async fn reject_contribution(pool: web::Data<DbPool>, id: web::Path<Uuid>) -> ApiResult {
    review(&pool, id.into_inner(), ContributionStatus::Rejected)
}

#[delete("/contributions/{id}")]
pub async fn delete_contribution(pool: web::Data<DbPool>, id: web::Path<Uuid>) -> ApiResult {
    let conn = lock(&pool)?;
    if DbService::delete_contribution(&conn, id.into_inner())? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ApiError::NotFound("Contribution"))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/library")
            .service(get_glossary)
            .service(submit_contribution)
            .service(list_approved)
            .service(
                web::scope("/admin")
                    .wrap(AdminAuth)
                    .service(list_for_review)
                    .service(update_contribution)
                    .service(approve_contribution)
                    .service(reject_contribution)
                    .service(delete_contribution),
            ),
    );
}
