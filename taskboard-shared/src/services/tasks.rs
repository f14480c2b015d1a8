/// Task workflows: creation, listing, updates, and cascading deletion
///
/// Input validation (due-time parsing, link formats) happens here, before
/// any repository call. Visibility is scoped to the caller's teams; task
/// mutation belongs to the owning team's admin.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::authorization::{authorize, Actor, TeamAction};
use crate::models::{
    Comment, CreateTask, SubBoard, Task, TaskPage, Team, TeamMember, UpdateTask, User,
};

/// Largest accepted page size for task listings
const MAX_PAGE_SIZE: i64 = 100;

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTaskInput {
    /// Task title (required)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Due time as an RFC 3339 string; parsed and rejected here before any
    /// write happens
    pub due_time: String,

    /// Optional document link (validated as an HTTP(S) URL)
    pub document_link: Option<String>,

    /// Optional GitHub repository link (validated as github.com/owner/repo)
    pub github_repo: Option<String>,

    /// The creating user (must be a member of `team_id`)
    pub creator_id: Uuid,

    /// The owning team
    pub team_id: Uuid,
}

/// Input for updating a task
///
/// Merge semantics; nullable fields clear with `Some(None)`.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskInput {
    /// New title
    pub title: Option<String>,

    /// New description (Some(None) clears it)
    pub description: Option<Option<String>>,

    /// New due time as an RFC 3339 string
    pub due_time: Option<String>,

    /// New document link (Some(None) clears it)
    pub document_link: Option<Option<String>>,

    /// New GitHub repository link (Some(None) clears it)
    pub github_repo: Option<Option<String>>,
}

/// Parses an RFC 3339 due time, rejecting anything unparseable
fn parse_due_time(value: &str) -> ServiceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            ServiceError::Validation(format!("'{}' is not a valid due time", value))
        })
}

/// Validates an HTTP(S) document link
///
/// A missing scheme is tolerated; an `https://` prefix is assumed before
/// parsing.
fn validate_document_link(link: &str) -> ServiceResult<()> {
    let candidate = if link.contains("://") {
        link.to_string()
    } else {
        format!("https://{}", link)
    };

    let parsed = url::Url::parse(&candidate)
        .map_err(|_| ServiceError::Validation(format!("'{}' is not a valid URL", link)))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ServiceError::Validation(format!(
            "'{}' is not a valid URL",
            link
        )));
    }

    Ok(())
}

/// Validates a GitHub repository link of the form github.com/owner/repo
fn validate_github_repo(link: &str) -> ServiceResult<()> {
    let invalid =
        || ServiceError::Validation(format!("'{}' is not a valid GitHub repository URL", link));

    let candidate = if link.contains("://") {
        link.to_string()
    } else {
        format!("https://{}", link)
    };

    let parsed = url::Url::parse(&candidate).map_err(|_| invalid())?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }

    match parsed.host_str() {
        Some("github.com") | Some("www.github.com") => {}
        _ => return Err(invalid()),
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    if segments.len() != 2 {
        return Err(invalid());
    }

    Ok(())
}

/// Validates offset/limit pagination inputs
fn validate_pagination(page: i64, limit: i64) -> ServiceResult<()> {
    if page < 1 || limit < 1 || limit > MAX_PAGE_SIZE {
        return Err(ServiceError::Validation(
            "Invalid pagination parameters".to_string(),
        ));
    }
    Ok(())
}

/// Creates a task
///
/// # Errors
///
/// - `Validation` for a missing title, unparseable due time, or malformed
///   link — all checked before any write
/// - `NotFound` if the creator or team doesn't resolve
/// - `NotAuthorized` if the creator is not a member of the team
pub async fn create_task(pool: &PgPool, input: CreateTaskInput) -> ServiceResult<Task> {
    if input.title.trim().is_empty() {
        return Err(ServiceError::Validation("Task title is required".to_string()));
    }

    let due_time = parse_due_time(&input.due_time)?;

    if let Some(ref link) = input.document_link {
        validate_document_link(link)?;
    }
    if let Some(ref link) = input.github_repo {
        validate_github_repo(link)?;
    }

    if User::find_by_id(pool, input.creator_id).await?.is_none() {
        return Err(ServiceError::NotFound("Creator not found".to_string()));
    }

    let team = Team::find_by_id(pool, input.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found".to_string()))?;

    if !TeamMember::has_member(pool, team.id, input.creator_id).await? {
        return Err(ServiceError::NotAuthorized(
            "Creator is not a member of the team".to_string(),
        ));
    }

    let task = Task::create(
        pool,
        CreateTask {
            title: input.title,
            description: input.description,
            due_time: Some(due_time),
            document_link: input.document_link,
            github_repo: input.github_repo,
            creator_id: input.creator_id,
            team_id: input.team_id,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, team_id = %task.team_id, "Task created");

    Ok(task)
}

/// Lists tasks visible to the caller with pagination
///
/// The caller sees only tasks belonging to teams they are a member of. An
/// explicit `team_filter` is honored only when the caller belongs to that
/// team.
///
/// # Errors
///
/// - `Validation` for bad pagination parameters
/// - `NotFound` if the caller has no teams, or the filtered team is not
///   among the caller's teams
pub async fn list_tasks(
    pool: &PgPool,
    caller_id: Uuid,
    page: i64,
    limit: i64,
    team_filter: Option<Uuid>,
) -> ServiceResult<TaskPage> {
    validate_pagination(page, limit)?;

    let team_ids = TeamMember::list_team_ids_by_user(pool, caller_id).await?;
    if team_ids.is_empty() {
        return Err(ServiceError::NotFound(
            "No teams found for the user".to_string(),
        ));
    }

    let scope: Vec<Uuid> = match team_filter {
        Some(team_id) => {
            if !team_ids.contains(&team_id) {
                return Err(ServiceError::NotFound(
                    "Team not found for the user".to_string(),
                ));
            }
            vec![team_id]
        }
        None => team_ids,
    };

    let offset = (page - 1) * limit;
    let tasks = Task::list_by_teams(pool, &scope, limit, offset).await?;
    let total_count = Task::count_by_teams(pool, &scope).await?;

    Ok(TaskPage {
        tasks,
        total_count,
        page,
        limit,
    })
}

/// Fetches a task visible to the caller
///
/// # Errors
///
/// - `NotFound` if the task or its team doesn't resolve
/// - `NotAuthorized` if the caller is not a member of the owning team
pub async fn get_task(pool: &PgPool, task_id: Uuid, caller: &Actor) -> ServiceResult<Task> {
    let task = Task::find_by_id(pool, task_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

    let team = Team::find_by_id(pool, task.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found for this task".to_string()))?;

    authorize(pool, caller, &team, TeamAction::ViewTasks).await?;

    Ok(task)
}

/// Updates a task
///
/// Only the owning team's admin may do this. Provided fields are validated
/// the same way as at creation.
pub async fn update_task(
    pool: &PgPool,
    task_id: Uuid,
    input: UpdateTaskInput,
    caller: &Actor,
) -> ServiceResult<Task> {
    let task = Task::find_by_id(pool, task_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

    let team = Team::find_by_id(pool, task.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found for this task".to_string()))?;

    authorize(pool, caller, &team, TeamAction::ManageTasks).await?;

    let due_time = match input.due_time {
        Some(ref value) => Some(Some(parse_due_time(value)?)),
        None => None,
    };

    if let Some(Some(ref link)) = input.document_link {
        validate_document_link(link)?;
    }
    if let Some(Some(ref link)) = input.github_repo {
        validate_github_repo(link)?;
    }

    let updated = Task::update(
        pool,
        task_id,
        UpdateTask {
            title: input.title,
            description: input.description,
            due_time,
            document_link: input.document_link,
            github_repo: input.github_repo,
        },
    )
    .await?
    .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

    Ok(updated)
}

/// Deletes a task and everything it owns
///
/// Only the owning team's admin may do this. Comments and sub-boards are
/// deleted with the task inside a single transaction, so a failed cascade
/// leaves nothing half-deleted.
pub async fn delete_task(pool: &PgPool, task_id: Uuid, caller: &Actor) -> ServiceResult<()> {
    let task = Task::find_by_id(pool, task_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

    let team = Team::find_by_id(pool, task.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found for this task".to_string()))?;

    authorize(pool, caller, &team, TeamAction::ManageTasks).await?;

    let mut tx = pool.begin().await?;

    let comments_removed = Comment::delete_by_task(&mut *tx, task_id).await?;
    let boards_removed = SubBoard::delete_by_task(&mut *tx, task_id).await?;
    Task::delete(&mut *tx, task_id).await?;

    tx.commit().await?;

    tracing::info!(
        task_id = %task_id,
        comments_removed,
        boards_removed,
        "Task deleted with cascade"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_due_time_valid() {
        let parsed = parse_due_time("2026-09-01T12:00:00Z").unwrap();
        assert_eq!(parsed.timestamp(), 1788264000);

        assert!(parse_due_time("2026-09-01T12:00:00+02:00").is_ok());
    }

    #[test]
    fn test_parse_due_time_invalid() {
        let result = parse_due_time("not-a-date");
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        assert!(parse_due_time("").is_err());
        assert!(parse_due_time("2026-13-40").is_err());
    }

    #[test]
    fn test_validate_document_link() {
        assert!(validate_document_link("https://docs.example.com/spec").is_ok());
        assert!(validate_document_link("http://example.com").is_ok());
        // Scheme-less links get https assumed
        assert!(validate_document_link("docs.example.com/page").is_ok());

        assert!(validate_document_link("ftp://example.com/file").is_err());
        assert!(validate_document_link("http://").is_err());
    }

    #[test]
    fn test_validate_github_repo() {
        assert!(validate_github_repo("https://github.com/rust-lang/rust").is_ok());
        assert!(validate_github_repo("github.com/serde-rs/serde").is_ok());
        assert!(validate_github_repo("https://www.github.com/tokio-rs/tokio").is_ok());

        // Wrong host
        assert!(validate_github_repo("https://gitlab.com/owner/repo").is_err());
        // Missing repo segment
        assert!(validate_github_repo("https://github.com/owner").is_err());
        // Too many segments
        assert!(validate_github_repo("https://github.com/owner/repo/tree/main").is_err());
    }

    #[test]
    fn test_validate_pagination() {
        assert!(validate_pagination(1, 10).is_ok());
        assert!(validate_pagination(5, 100).is_ok());

        assert!(validate_pagination(0, 10).is_err());
        assert!(validate_pagination(1, 0).is_err());
        assert!(validate_pagination(-1, 10).is_err());
        assert!(validate_pagination(1, 101).is_err());
    }
}
