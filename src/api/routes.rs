use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::analysis::{
    analyze_account, analyze_text, analyze_video, benchmarks_for, AnalysisMode, AnalysisResult,
};
use crate::api::error::{lock, ApiError};
use crate::api::models::{
    AnalysesQuery, AnalyzeAccountRequest, AnalyzeTextRequest, AnalyzeVideoRequest, ChatReply,
    ChatRequest, PaginationQuery,
};
use crate::config::AppConfig;
use crate::db::{service::DbService, AnalysisKind, DbPool, NewAnalysis};
use crate::knowledge::{router::enhancement_prompt, route, Topic};
use crate::llm::{
    cascade::{AiCascade, CascadeOutcome, LOCAL_SOURCE},
    models::{ChatOptions, Message},
};

const MAX_PAGE: usize = 500;

type ApiResult = Result<HttpResponse, ApiError>;

/// Replaces the summary with an LLM narrative when asked; returns the source.
async fn narrate(
    cascade: &AiCascade,
    enhance: bool,
    result: &mut AnalysisResult,
    subject: &str,
) -> String {
    if !enhance {
        return LOCAL_SOURCE.to_string();
    }
    let outcome = cascade.narrate(result, subject).await;
    result.summary = outcome.content;
    outcome.source
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
}

// --- Analysis ---

#[post("")]
pub async fn analyze_text_content(
    pool: web::Data<DbPool>,
    cascade: web::Data<AiCascade>,
    req: web::Json<AnalyzeTextRequest>,
) -> ApiResult {
    let req = req.into_inner();
    req.validate()?;
    let mode = match req.mode.as_deref() {
        Some(m) => m.parse::<AnalysisMode>().map_err(ApiError::Validation)?,
        None => AnalysisMode::default(),
    };

    let mut result = analyze_text(&req.content, mode);
    let source = narrate(&cascade, req.enhance, &mut result, "text").await;

    let conn = lock(&pool)?;
    let stored = DbService::insert_analysis(
        &conn,
        &NewAnalysis {
            session_id: req.session_id.trim(),
            kind: AnalysisKind::Text,
            mode: mode.as_str(),
            input_type: "text",
            content: &req.content,
            result: to_json(&result)?,
            overall_score: result.overall_score,
            narrative_source: &source,
        },
    )?;

    Ok(HttpResponse::Created().json(stored))
}

#[post("/video")]
pub async fn analyze_video_metrics(
    pool: web::Data<DbPool>,
    cascade: web::Data<AiCascade>,
    config: web::Data<AppConfig>,
    req: web::Json<AnalyzeVideoRequest>,
) -> ApiResult {
    let req = req.into_inner();
    req.validate()?;
    let (platform, niche) = req
        .benchmark
        .resolve(&config.analysis.default_platform, &config.analysis.default_niche)?;

    let mut analysis = analyze_video(&req.metrics, &benchmarks_for(platform, niche));
    let source = narrate(&cascade, req.enhance, &mut analysis.result, "video").await;
    let content = to_json(&req.metrics)?.to_string();

    let conn = lock(&pool)?;
    let stored = DbService::insert_analysis(
        &conn,
        &NewAnalysis {
            session_id: req.session_id.trim(),
            kind: AnalysisKind::Video,
            mode: AnalysisMode::Creator.as_str(),
            input_type: "metrics",
            content: &content,
            result: to_json(&analysis)?,
            overall_score: analysis.result.overall_score,
            narrative_source: &source,
        },
    )?;

    Ok(HttpResponse::Created().json(stored))
}

#[post("/account")]
pub async fn analyze_account_metrics(
    pool: web::Data<DbPool>,
    cascade: web::Data<AiCascade>,
    config: web::Data<AppConfig>,
    req: web::Json<AnalyzeAccountRequest>,
) -> ApiResult {
    let req = req.into_inner();
    req.validate()?;
    let (platform, niche) = req
        .benchmark
        .resolve(&config.analysis.default_platform, &config.analysis.default_niche)?;

    let mut analysis = analyze_account(&req.metrics, &benchmarks_for(platform, niche));
    let subject = format!("account @{}", req.metrics.username.trim_start_matches('@'));
    let source = narrate(&cascade, req.enhance, &mut analysis.result, &subject).await;
    let content = to_json(&req.metrics)?.to_string();

    let conn = lock(&pool)?;
    let stored = DbService::insert_analysis(
        &conn,
        &NewAnalysis {
            session_id: req.session_id.trim(),
            kind: AnalysisKind::Account,
            mode: AnalysisMode::Creator.as_str(),
            input_type: "metrics",
            content: &content,
            result: to_json(&analysis)?,
            overall_score: analysis.result.overall_score,
            narrative_source: &source,
        },
    )?;

    Ok(HttpResponse::Created().json(stored))
}

#[get("")]
pub async fn list_analyses(pool: web::Data<DbPool>, query: web::Query<AnalysesQuery>) -> ApiResult {
    let query = query.into_inner();
    let kind = match query.kind.as_deref() {
        Some(k) => Some(k.parse::<AnalysisKind>().map_err(ApiError::Validation)?),
        None => None,
    };

    let conn = lock(&pool)?;
    let analyses = DbService::list_analyses(
        &conn,
        query.session_id.as_deref(),
        kind,
        query.limit.min(MAX_PAGE),
        query.offset,
    )?;
    Ok(HttpResponse::Ok().json(analyses))
}

#[get("/{id}")]
pub async fn get_analysis(pool: web::Data<DbPool>, id: web::Path<Uuid>) -> ApiResult {
    let conn = lock(&pool)?;
    match DbService::get_analysis(&conn, id.into_inner())? {
        Some(analysis) => Ok(HttpResponse::Ok().json(analysis)),
        None => Err(ApiError::NotFound("Analysis")),
    }
}

// --- Knowledge chat ---

#[post("")]
pub async fn ask_question(
    pool: web::Data<DbPool>,
    cascade: web::Data<AiCascade>,
    req: web::Json<ChatRequest>,
) -> ApiResult {
    let req = req.into_inner();
    req.validate()?;
    let session_id = req.session_id.trim();

    let routed = route(&req.question);
    let outcome = if req.enhance && routed.topic != Topic::OutOfScope {
        let options = ChatOptions {
            system_prompt: Some(enhancement_prompt(&routed)),
            ..Default::default()
        };
        cascade
            .complete(&[Message::user(req.question.clone())], options, || routed.answer.clone())
            .await
    } else {
        CascadeOutcome {
            content: routed.answer.clone(),
            source: LOCAL_SOURCE.to_string(),
        }
    };

    let conn = lock(&pool)?;
    let topic = routed.topic.as_str();
    DbService::insert_chat_message(&conn, session_id, "user", &req.question, Some(topic), None)?;
    let message = DbService::insert_chat_message(
        &conn,
        session_id,
        "assistant",
        &outcome.content,
        Some(topic),
        Some(&outcome.source),
    )?;

    Ok(HttpResponse::Created().json(ChatReply { message, routing: routed }))
}

#[get("/{session_id}")]
pub async fn chat_history(
    pool: web::Data<DbPool>,
    session_id: web::Path<String>,
    query: web::Query<PaginationQuery>,
) -> ApiResult {
    let conn = lock(&pool)?;
    let messages = DbService::get_chat_messages(
        &conn,
        session_id.as_str(),
        query.limit.min(MAX_PAGE),
        query.offset,
    )?;
    Ok(HttpResponse::Ok().json(messages))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/analyze")
            .service(analyze_text_content)
            .service(analyze_video_metrics)
            .service(analyze_account_metrics),
    )
    .service(
        web::scope("/api/analyses")
            .service(list_analyses)
            .service(get_analysis),
    )
    .service(
        web::scope("/api/chat")
            .service(ask_question)
            .service(chat_history),
    );
}
