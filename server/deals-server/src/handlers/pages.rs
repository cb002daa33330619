//! Page handlers for the Deals site.
//!
//! Four pages: the creation form (which also receives the form POST),
//! the post-creation confirmation, the task list and the slug-addressed
//! task detail.

use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use deals_storage::{NewTask, StorageError, Task};

use crate::{
    error::ApiError,
    forms::{self, TaskSubmission},
    routes::paths,
    server::DealsServer,
    templates,
    validation::FieldErrors,
};

#[derive(Debug, Serialize)]
struct HomeContext {
    form: Vec<forms::FormField>,
}

#[derive(Debug, Serialize)]
struct ListContext {
    object_list: Vec<Task>,
}

#[derive(Debug, Serialize)]
struct DetailContext {
    task: Task,
}

/// Home page: the task creation form.
pub async fn home(State(server): State<DealsServer>) -> Result<Response, ApiError> {
    server.templates.render(
        templates::HOME,
        &HomeContext {
            form: forms::task_form(),
        },
    )
}

/// Receive the creation form.
///
/// Invalid submissions re-render the form with the submitted values
/// bound and errors shown inline; valid ones persist the task and
/// redirect to the confirmation page.
pub async fn create_task(
    State(server): State<DealsServer>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let submission = TaskSubmission::from_multipart(multipart).await?;

    let mut errors = submission.field_errors();
    if errors.is_clean("slug") && server.tasks.slug_exists(&submission.slug).await? {
        errors.push("slug", forms::DUPLICATE_SLUG_MESSAGE);
    }
    if !errors.is_empty() {
        return render_bound_form(&server, &submission, &errors);
    }

    let image = match submission.image.as_ref() {
        Some(upload) => Some(server.media.save_task_image(&submission.slug, upload).await?),
        None => None,
    };

    let new_task = NewTask {
        title: submission.title.trim().to_owned(),
        text: submission.text.trim().to_owned(),
        slug: submission.slug.clone(),
        image,
    };

    match server.tasks.create(&new_task).await {
        Ok(task) => {
            tracing::info!(task_id = task.id, slug = %task.slug, "Task created");
            Ok(Redirect::to(paths::deals::TASK_ADDED).into_response())
        }
        // The uniqueness check above races with concurrent submissions;
        // the constraint is authoritative.
        Err(StorageError::DuplicateSlug(_)) => {
            let mut errors = FieldErrors::default();
            errors.push("slug", forms::DUPLICATE_SLUG_MESSAGE);
            render_bound_form(&server, &submission, &errors)
        }
        Err(e) => Err(e.into()),
    }
}

/// Confirmation page shown after a successful creation.
pub async fn task_added(State(server): State<DealsServer>) -> Result<Response, ApiError> {
    server
        .templates
        .render(templates::TASK_ADDED, &serde_json::json!({}))
}

/// Task list page.
pub async fn task_list(State(server): State<DealsServer>) -> Result<Response, ApiError> {
    let object_list = server.tasks.list_all().await?;
    server
        .templates
        .render(templates::TASK_LIST, &ListContext { object_list })
}

/// Task detail page, addressed by slug.
pub async fn task_detail(
    Path(slug): Path<String>,
    State(server): State<DealsServer>,
) -> Result<Response, ApiError> {
    match server.tasks.find_by_slug(&slug).await? {
        Some(task) => server
            .templates
            .render(templates::TASK_DETAIL, &DetailContext { task }),
        None => Err(ApiError::not_found("task")),
    }
}

fn render_bound_form(
    server: &DealsServer,
    submission: &TaskSubmission,
    errors: &FieldErrors,
) -> Result<Response, ApiError> {
    server.templates.render(
        templates::HOME,
        &HomeContext {
            form: forms::task_form_bound(submission, errors),
        },
    )
}
