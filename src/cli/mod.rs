pub mod commands;

use thiserror::Error;

use crate::analysis::{
    analyze_account, analyze_text, analyze_video, benchmarks_for, AccountMetrics, AnalysisMode,
    AnalysisResult, Niche, Platform, VideoMetrics,
};
use crate::cli::commands::{BenchmarkArgs, Commands, LibraryAction};
use crate::config::AppConfig;
use crate::db::{
    get_connection,
    service::{DbService, ReviewOutcome},
    AnalysisKind, ContributionStatus, DbPool, NewAnalysis,
};
use crate::knowledge::{route, router::enhancement_prompt, Topic};
use crate::llm::{
    models::{ChatOptions, Message},
    ProviderFactory,
};

const CLI_SESSION: &str = "cli";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Db(#[from] duckdb::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
    #[error("Database lock poisoned")]
    Lock,
}

pub async fn run_cli(command: Commands, config_path: String) -> Result<(), CliError> {
    let config = AppConfig::load(&config_path)?;

    match command {
        Commands::Serve => Err(CliError::Invalid(
            "serve is handled by the server entrypoint".to_string(),
        )),
        Commands::Account {
            username,
            followers,
            following,
            likes,
            videos,
            avg_views,
            avg_comments,
            avg_shares,
            bio,
            benchmark,
        } => {
            let (platform, niche) = resolve_benchmark(&benchmark, &config)?;
            let metrics = AccountMetrics {
                username,
                followers,
                following,
                total_likes: likes,
                video_count: videos,
                avg_views,
                avg_comments,
                avg_shares,
                bio,
            };
            let analysis = analyze_account(&metrics, &benchmarks_for(platform, niche));

            println!(
                "@{}: engagement {:.2}% | likes/follower {:.2} | bot score {} ({:?})",
                analysis.username.trim_start_matches('@'),
                analysis.engagement_rate,
                analysis.follower_like_ratio,
                analysis.bot.score,
                analysis.bot.risk
            );
            for flag in &analysis.bot.flags {
                println!("  ! {}", flag.describe());
            }
            print_result(&analysis.result);

            let content = serde_json::to_string(&metrics)?;
            store(
                &config,
                AnalysisKind::Account,
                "creator",
                "metrics",
                &content,
                serde_json::to_value(&analysis)?,
                &analysis.result,
            )
        }
        Commands::Video {
            views,
            likes,
            comments,
            shares,
            saves,
            duration,
            description,
            benchmark,
        } => {
            let (platform, niche) = resolve_benchmark(&benchmark, &config)?;
            let metrics = VideoMetrics {
                views,
                likes,
                comments,
                shares,
                saves,
                duration_secs: duration,
                description,
            };
            let analysis = analyze_video(&metrics, &benchmarks_for(platform, niche));

            println!(
                "Video: engagement {:.2}% | shares {:.2}% | saves {:.2}% | comments {:.2}%",
                analysis.engagement_rate,
                analysis.share_rate,
                analysis.save_rate,
                analysis.comment_rate
            );
            print_result(&analysis.result);

            let content = serde_json::to_string(&metrics)?;
            store(
                &config,
                AnalysisKind::Video,
                "creator",
                "metrics",
                &content,
                serde_json::to_value(&analysis)?,
                &analysis.result,
            )
        }
        Commands::Text { content, mode } => {
            if content.trim().is_empty() {
                return Err(CliError::Invalid("content is required".to_string()));
            }
            let mode: AnalysisMode = mode.parse().map_err(CliError::Invalid)?;
            let result = analyze_text(&content, mode);
            print_result(&result);

            store(
                &config,
                AnalysisKind::Text,
                mode.as_str(),
                "text",
                &content,
                serde_json::to_value(&result)?,
                &result,
            )
        }
        Commands::Ask { question, enhance } => {
            let routed = route(&question);
            println!("[{} | {}]", routed.topic.as_str(), routed.confidence);

            if enhance && routed.topic != Topic::OutOfScope {
                let cascade = ProviderFactory::create_cascade(&config);
                let options = ChatOptions {
                    system_prompt: Some(enhancement_prompt(&routed)),
                    ..Default::default()
                };
                let outcome = cascade
                    .complete(&[Message::user(question)], options, || routed.answer.clone())
                    .await;
                println!("{}\n\n(source: {})", outcome.content, outcome.source);
            } else {
                println!("{}", routed.answer);
            }
            Ok(())
        }
        Commands::History { session, kind, limit } => {
            let kind = kind
                .as_deref()
                .map(|k| k.parse::<AnalysisKind>().map_err(CliError::Invalid))
                .transpose()?;
            let pool = get_connection(&config.database)?;
            let conn = pool.lock().map_err(|_| CliError::Lock)?;
            let analyses = DbService::list_analyses(&conn, session.as_deref(), kind, limit, 0)?;

            if analyses.is_empty() {
                println!("No analyses found.");
            } else {
                println!(
                    "{:<38} | {:<8} | {:<5} | {:<12} | {}",
                    "ID", "Kind", "Score", "Session", "Created At"
                );
                println!("{:-<38}-+-{:-<8}-+-{:-<5}-+-{:-<12}-+-{:-<20}", "", "", "", "", "");
                for a in analyses {
                    println!(
                        "{:<38} | {:<8} | {:<5} | {:<12} | {}",
                        a.id.to_string(),
                        a.kind.as_str(),
                        a.overall_score,
                        a.session_id,
                        a.created_at
                    );
                }
            }
            Ok(())
        }
        Commands::Library { action } => {
            let pool = get_connection(&config.database)?;
            run_library(&pool, action)
        }
    }
}

fn run_library(pool: &DbPool, action: LibraryAction) -> Result<(), CliError> {
    let conn = pool.lock().map_err(|_| CliError::Lock)?;

    match action {
        LibraryAction::List { status } => {
            let status = status
                .as_deref()
                .map(|s| s.parse::<ContributionStatus>().map_err(CliError::Invalid))
                .transpose()?;
            let contributions = DbService::list_contributions(&conn, status, 100, 0)?;
            if contributions.is_empty() {
                println!("No contributions found.");
            }
            for c in contributions {
                println!("{} [{}] {}: {}", c.id, c.status.as_str(), c.term, c.definition);
            }
        }
        LibraryAction::Approve { id } => review(&conn, id, ContributionStatus::Approved)?,
        LibraryAction::Reject { id } => review(&conn, id, ContributionStatus::Rejected)?,
        LibraryAction::Delete { id } => {
            if DbService::delete_contribution(&conn, id)? {
                println!("Deleted contribution {}", id);
            } else {
                println!("Contribution {} not found.", id);
            }
        }
    }
    Ok(())
}

fn review(
    conn: &duckdb::Connection,
    id: uuid::Uuid,
    decision: ContributionStatus,
) -> Result<(), CliError> {
    match DbService::review_contribution(conn, id, decision)? {
        ReviewOutcome::Reviewed(c) => println!("{} is now {}", c.term, c.status.as_str()),
        ReviewOutcome::NotFound => println!("Contribution {} not found.", id),
        ReviewOutcome::NotPending(current) => {
            println!("Contribution {} is already {}.", id, current.as_str())
        }
    }
    Ok(())
}

fn resolve_benchmark(
    args: &BenchmarkArgs,
    config: &AppConfig,
) -> Result<(Platform, Niche), CliError> {
    let platform = args
        .platform
        .as_deref()
        .unwrap_or(&config.analysis.default_platform)
        .parse::<Platform>()
        .map_err(|e| CliError::Invalid(e.to_string()))?;
    let niche = args
        .niche
        .as_deref()
        .unwrap_or(&config.analysis.default_niche)
        .parse::<Niche>()
        .map_err(|e| CliError::Invalid(e.to_string()))?;
    Ok((platform, niche))
}

fn print_result(result: &AnalysisResult) {
    println!("{:<6} | {:<5} | {}", "Layer", "Score", "Finding");
    println!("{:-<6}-+-{:-<5}-+-{:-<30}", "", "", "");
    for layer in &result.layers {
        println!("{:<6} | {:<5} | {}", layer.layer.code(), layer.score, layer.finding);
    }
    println!("\nOverall: {}/100", result.overall_score);
    println!("{}", result.summary);
    if !result.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &result.recommendations {
            println!("  - {}", rec);
        }
    }
}

fn store(
    config: &AppConfig,
    kind: AnalysisKind,
    mode: &str,
    input_type: &str,
    content: &str,
    result_json: serde_json::Value,
    result: &AnalysisResult,
) -> Result<(), CliError> {
    let pool = get_connection(&config.database)?;
    let conn = pool.lock().map_err(|_| CliError::Lock)?;
    let stored = DbService::insert_analysis(
        &conn,
        &NewAnalysis {
            session_id: CLI_SESSION,
            kind,
            mode,
            input_type,
            content,
            result: result_json,
            overall_score: result.overall_score,
            narrative_source: "local",
        },
    )?;
    println!("\nSaved analysis {}", stored.id);
    Ok(())
}
