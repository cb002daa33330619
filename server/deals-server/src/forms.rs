//! The task creation form.
//!
//! The form is described as typed data (a list of [`FormField`]s) and
//! rendered by the home template, so the set of fields and their widget
//! kinds stay observable instead of living only in markup. Submissions
//! arrive as `multipart/form-data` because of the file field.

use axum::body::Bytes;
use axum::extract::Multipart;
use serde::Serialize;

use crate::error::ApiError;
use crate::validation::FieldErrors;
use crate::{check_field, require_field};

pub const TITLE_MAX_LEN: usize = 200;
pub const SLUG_MAX_LEN: usize = 50;

/// File extensions accepted for the image upload.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

pub const DUPLICATE_SLUG_MESSAGE: &str = "A task with this slug already exists";

/// Widget kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    TextArea,
    Slug,
    File,
}

/// A single renderable form field: definition plus bound state.
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
    pub errors: Vec<String>,
}

/// An image file received with the submission.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub data: Bytes,
}

/// Raw task form submission, before validation.
#[derive(Debug, Clone, Default)]
pub struct TaskSubmission {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub image: Option<UploadedImage>,
}

impl TaskSubmission {
    /// Read a submission out of a multipart request body.
    ///
    /// Unknown parts are drained and ignored. An image part with no
    /// file name or no content counts as "no upload".
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut submission = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Malformed form data: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "title" => submission.title = read_text(field, &name).await?,
                "text" => submission.text = read_text(field, &name).await?,
                "slug" => submission.slug = read_text(field, &name).await?,
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_owned();
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Invalid upload: {e}")))?;
                    if !file_name.is_empty() && !data.is_empty() {
                        submission.image = Some(UploadedImage { file_name, data });
                    }
                }
                _ => {
                    // Drain so the multipart stream stays in sync.
                    let _ = field.bytes().await.map_err(|e| {
                        ApiError::bad_request(format!("Malformed form data: {e}"))
                    })?;
                }
            }
        }

        Ok(submission)
    }

    /// Validate all field-local rules, accumulating every failure.
    ///
    /// Slug uniqueness is a repository concern and is checked by the
    /// handler on top of this.
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        require_field!(errors, "title", self.title, "Title is required");
        check_field!(
            errors,
            "title",
            self.title.chars().count() <= TITLE_MAX_LEN,
            "Title must be at most 200 characters"
        );

        require_field!(errors, "text", self.text, "Text is required");

        require_field!(errors, "slug", self.slug, "Slug is required");
        if !self.slug.trim().is_empty() {
            check_field!(
                errors,
                "slug",
                self.slug.len() <= SLUG_MAX_LEN,
                "Slug must be at most 50 characters"
            );
            check_field!(
                errors,
                "slug",
                is_valid_slug(&self.slug),
                "Slug may contain only letters, digits, hyphens and underscores"
            );
        }

        if let Some(upload) = &self.image {
            check_field!(
                errors,
                "image",
                image_extension(&upload.file_name).is_some(),
                "Upload a valid image file (png, jpg, jpeg, gif or webp)"
            );
        }

        errors
    }
}

async fn read_text(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid form field '{name}': {e}")))
}

/// A slug is ASCII letters, digits, hyphens and underscores only.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Lower-cased extension of an accepted image file name, `None` when
/// the name carries no accepted extension.
pub fn image_extension(file_name: &str) -> Option<String> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// The empty creation form.
pub fn task_form() -> Vec<FormField> {
    task_form_bound(&TaskSubmission::default(), &FieldErrors::default())
}

/// The creation form with submitted values and errors bound to fields.
///
/// File inputs cannot be pre-filled, so the image field always renders
/// empty.
pub fn task_form_bound(submission: &TaskSubmission, errors: &FieldErrors) -> Vec<FormField> {
    vec![
        FormField {
            name: "title",
            label: "Title",
            kind: FieldKind::Text,
            required: true,
            value: submission.title.clone(),
            errors: errors.for_field("title"),
        },
        FormField {
            name: "text",
            label: "Text",
            kind: FieldKind::TextArea,
            required: true,
            value: submission.text.clone(),
            errors: errors.for_field("text"),
        },
        FormField {
            name: "slug",
            label: "Slug",
            kind: FieldKind::Slug,
            required: true,
            value: submission.slug.clone(),
            errors: errors.for_field("slug"),
        },
        FormField {
            name: "image",
            label: "Image",
            kind: FieldKind::File,
            required: false,
            value: String::new(),
            errors: errors.for_field("image"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> TaskSubmission {
        TaskSubmission {
            title: "Launch checklist".to_string(),
            text: "Write down everything left before launch".to_string(),
            slug: "launch-checklist".to_string(),
            image: None,
        }
    }

    #[test]
    fn valid_submission_has_no_errors() {
        assert!(valid_submission().field_errors().is_empty());
    }

    #[test]
    fn blank_required_fields_are_reported_together() {
        let submission = TaskSubmission::default();
        let errors = submission.field_errors();

        assert!(!errors.is_clean("title"));
        assert!(!errors.is_clean("text"));
        assert!(!errors.is_clean("slug"));
        assert!(errors.is_clean("image"));
    }

    #[test]
    fn slug_charset_is_enforced() {
        let mut submission = valid_submission();
        submission.slug = "not a slug!".to_string();

        let errors = submission.field_errors();
        assert_eq!(
            errors.for_field("slug"),
            vec!["Slug may contain only letters, digits, hyphens and underscores"]
        );
    }

    #[test]
    fn overlong_slug_is_rejected() {
        let mut submission = valid_submission();
        submission.slug = "x".repeat(SLUG_MAX_LEN + 1);

        let errors = submission.field_errors();
        assert!(!errors.is_clean("slug"));
    }

    #[test]
    fn overlong_title_is_rejected() {
        let mut submission = valid_submission();
        submission.title = "x".repeat(TITLE_MAX_LEN + 1);

        let errors = submission.field_errors();
        assert!(!errors.is_clean("title"));
    }

    #[test]
    fn image_extension_allow_list() {
        assert_eq!(image_extension("photo.PNG").as_deref(), Some("png"));
        assert_eq!(image_extension("photo.jpeg").as_deref(), Some("jpeg"));
        assert!(image_extension("notes.txt").is_none());
        assert!(image_extension("no-extension").is_none());
    }

    #[test]
    fn bad_image_extension_is_a_field_error() {
        let mut submission = valid_submission();
        submission.image = Some(UploadedImage {
            file_name: "malware.exe".to_string(),
            data: Bytes::from_static(b"MZ"),
        });

        let errors = submission.field_errors();
        assert!(!errors.is_clean("image"));
    }

    #[test]
    fn is_valid_slug_accepts_url_safe_names() {
        assert!(is_valid_slug("test-slug"));
        assert!(is_valid_slug("slug_2024"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("has space"));
        assert!(!is_valid_slug("ümlaut"));
    }

    #[test]
    fn bound_form_carries_values_and_errors() {
        let mut submission = valid_submission();
        submission.title = String::new();
        let errors = submission.field_errors();

        let form = task_form_bound(&submission, &errors);
        let title = form.iter().find(|f| f.name == "title").unwrap();
        assert_eq!(title.errors, vec!["Title is required"]);

        let slug = form.iter().find(|f| f.name == "slug").unwrap();
        assert_eq!(slug.value, "launch-checklist");
        assert!(slug.errors.is_empty());
    }

    #[test]
    fn empty_form_field_kinds() {
        let form = task_form();
        let kinds: Vec<(&str, FieldKind)> = form.iter().map(|f| (f.name, f.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("title", FieldKind::Text),
                ("text", FieldKind::TextArea),
                ("slug", FieldKind::Slug),
                ("image", FieldKind::File),
            ]
        );
    }
}
