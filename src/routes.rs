use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppError::{self, MalformedPayload},
    pages,
    state::AppState,
};

/// Cap on note text after form decoding.
pub const MAX_NOTE_BYTES: usize = 16 * 1024;

const MAX_LIST_ID_LEN: usize = 128;

/// A single endpoint handles all mutations; the `intent` field picks the
/// operation, the other fields belong to one intent each. Every field is
/// optional at the extractor level so that missing fields reach our own
/// validation and come back as 400 rather than the extractor's 422.
#[derive(Deserialize)]
pub struct NoteForm {
    pub intent: Option<String>,
    pub text: Option<String>,
    pub id: Option<String>,
}

pub enum Action {
    Create { text: String },
    Delete { id: String },
}

impl Action {
    pub fn from_form(form: NoteForm) -> Result<Self, AppError> {
        match form.intent.as_deref() {
            Some("create") => {
                let text = form.text.unwrap_or_default().trim().to_string();

                if text.is_empty() || text.len() > MAX_NOTE_BYTES {
                    return Err(MalformedPayload);
                }

                Ok(Action::Create { text })
            }
            Some("delete") => {
                let id = form.id.unwrap_or_default();

                if id.is_empty() {
                    return Err(MalformedPayload);
                }

                Ok(Action::Delete { id })
            }
            _ => Err(MalformedPayload),
        }
    }
}

fn check_list_id(list_id: &str) -> Result<(), AppError> {
    let valid = !list_id.is_empty()
        && list_id.len() <= MAX_LIST_ID_LEN
        && list_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));

    if valid {
        Ok(())
    } else {
        Err(MalformedPayload)
    }
}

pub async fn index_handler() -> Redirect {
    Redirect::to(&format!("/{}", Uuid::new_v4()))
}

pub async fn list_page_handler(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<String>,
) -> Result<Html<String>, AppError> {
    render_page(state, &list_id, false).await
}

pub async fn secure_page_handler(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<String>,
) -> Result<Html<String>, AppError> {
    render_page(state, &list_id, true).await
}

pub async fn mutate_handler(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Redirect, AppError> {
    apply_action(state, &list_id, form).await?;

    Ok(Redirect::to(&format!("/{list_id}")))
}

pub async fn secure_mutate_handler(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Redirect, AppError> {
    apply_action(state, &list_id, form).await?;

    Ok(Redirect::to(&format!("/secure/{list_id}")))
}

async fn render_page(
    state: Arc<AppState>,
    list_id: &str,
    secure: bool,
) -> Result<Html<String>, AppError> {
    check_list_id(list_id)?;

    let mut notes = state.store.list(list_id).await?;
    // HGETALL order is unspecified; sort so reloads render the same page.
    notes.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(Html(pages::render_list_page(list_id, &notes, secure)))
}

async fn apply_action(
    state: Arc<AppState>,
    list_id: &str,
    form: NoteForm,
) -> Result<(), AppError> {
    check_list_id(list_id)?;

    match Action::from_form(form)? {
        Action::Create { text } => {
            state.store.create(list_id, &text).await?;
        }
        Action::Delete { id } => {
            state.store.delete(list_id, &id).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(intent: Option<&str>, text: Option<&str>, id: Option<&str>) -> NoteForm {
        NoteForm {
            intent: intent.map(str::to_string),
            text: text.map(str::to_string),
            id: id.map(str::to_string),
        }
    }

    #[test]
    fn create_trims_and_keeps_text() {
        let action = Action::from_form(form(Some("create"), Some("  milk \n"), None)).unwrap();
        assert!(matches!(action, Action::Create { text } if text == "milk"));
    }

    #[test]
    fn create_rejects_missing_empty_and_oversized_text() {
        assert!(Action::from_form(form(Some("create"), None, None)).is_err());
        assert!(Action::from_form(form(Some("create"), Some("   "), None)).is_err());

        let oversized = "x".repeat(MAX_NOTE_BYTES + 1);
        assert!(Action::from_form(form(Some("create"), Some(&oversized), None)).is_err());
    }

    #[test]
    fn delete_requires_an_id() {
        let action = Action::from_form(form(Some("delete"), None, Some("abc"))).unwrap();
        assert!(matches!(action, Action::Delete { id } if id == "abc"));

        assert!(Action::from_form(form(Some("delete"), None, None)).is_err());
        assert!(Action::from_form(form(Some("delete"), None, Some(""))).is_err());
    }

    #[test]
    fn unknown_intent_is_rejected() {
        assert!(Action::from_form(form(Some("update"), Some("milk"), None)).is_err());
        assert!(Action::from_form(form(Some(""), None, None)).is_err());
        assert!(Action::from_form(form(None, Some("milk"), None)).is_err());
    }

    #[test]
    fn list_ids_are_validated() {
        assert!(check_list_id("groceries").is_ok());
        assert!(check_list_id("my-list_2.0").is_ok());

        assert!(check_list_id("").is_err());
        assert!(check_list_id("has spaces").is_err());
        assert!(check_list_id("notes:injection").is_err());
        assert!(check_list_id(&"a".repeat(MAX_LIST_ID_LEN + 1)).is_err());
    }
}
