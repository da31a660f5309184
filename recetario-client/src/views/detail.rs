use anyhow::Result;
use recetario::basic_models::{Recipe, RecipeId};
use recetario::display;
use recetario::form::{RecipeDraft, SelectedImage};

use super::form::RecipeFormView;
use super::{RequestSequence, Ticket};
use crate::api::RecipeApi;
use crate::errors::ApiResult;
use crate::share::{share_or_fallback, ShareOutcome, ShareTarget};

pub const LOAD_ERROR: &str = "No se pudo cargar la receta";
pub const DELETE_PROMPT: &str = "¿Seguro que querés eliminar esta receta?";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Recipe),
    Failed(String),
}

/// Asks the user to confirm a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    /// Deleted; the caller goes back to the list with this message.
    NavigateToList(String),
    /// Stay on the page and show the message.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoOutcome {
    Updated,
    /// The file was not an acceptable image; nothing was sent.
    Rejected(String),
    Failed(String),
    Busy,
}

/// A single recipe page, loaded by id.
#[derive(Debug)]
pub struct RecipeDetailView {
    id: RecipeId,
    state: DetailState,
    requests: RequestSequence,
    updating: bool,
    deleting: bool,
    action_error: Option<String>,
}

impl RecipeDetailView {
    pub fn new(id: RecipeId) -> Self {
        Self {
            id,
            state: DetailState::Loading,
            requests: RequestSequence::default(),
            updating: false,
            deleting: false,
            action_error: None,
        }
    }

    pub fn id(&self) -> &RecipeId {
        &self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        match &self.state {
            DetailState::Loaded(recipe) => Some(recipe),
            _ => None,
        }
    }

    /// The last error from delete or photo update, if any.
    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.state = DetailState::Loading;
        self.requests.next()
    }

    /// Apply a response. Returns false when a newer load superseded it.
    pub fn finish_load(&mut self, ticket: Ticket, result: ApiResult<Recipe>) -> bool {
        if !self.requests.is_latest(ticket) {
            tracing::debug!("Dropping stale recipe response {:?}", ticket);
            return false;
        }
        self.state = match result {
            Ok(recipe) => DetailState::Loaded(recipe),
            Err(e) => {
                tracing::error!("Error loading recipe {}: {}", self.id, e);
                DetailState::Failed(LOAD_ERROR.to_string())
            }
        };
        true
    }

    pub async fn load(&mut self, api: &dyn RecipeApi) {
        let ticket = self.begin_load();
        let result = api.get_recipe(&self.id).await;
        self.finish_load(ticket, result);
    }

    /// Instruction lines for display, one per numbered step.
    pub fn instruction_lines(&self) -> Vec<String> {
        self.recipe()
            .map(|r| display::format_instructions(&r.instructions))
            .unwrap_or_default()
    }

    /// Open the edit form pre-filled with the loaded recipe.
    pub fn edit_form(&self) -> Option<RecipeFormView> {
        self.recipe().map(RecipeFormView::for_edit)
    }

    /// Show the recipe returned by a successful edit.
    pub fn apply_saved(&mut self, recipe: Recipe) {
        self.id = recipe.id.clone();
        self.state = DetailState::Loaded(recipe);
    }

    pub async fn delete(&mut self, api: &dyn RecipeApi, confirm: &dyn Confirm) -> DeleteOutcome {
        if self.deleting || !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Cancelled;
        }
        self.deleting = true;
        let result = api.delete_recipe(&self.id).await;
        self.deleting = false;
        match result {
            Ok(message) => {
                self.action_error = None;
                DeleteOutcome::NavigateToList(message)
            }
            Err(e) => {
                let message = e.user_message();
                self.action_error = Some(message.clone());
                DeleteOutcome::Failed(message)
            }
        }
    }

    /// Share the recipe as plain text. `None` if nothing is loaded.
    pub async fn share(&self, target: &dyn ShareTarget) -> Result<Option<ShareOutcome>> {
        let Some(recipe) = self.recipe() else {
            return Ok(None);
        };
        let text = display::share_message(recipe);
        Ok(Some(share_or_fallback(target, &recipe.title, text).await?))
    }

    /// Replace the photo by re-sending the whole recipe with the new image.
    pub async fn update_photo(
        &mut self,
        api: &dyn RecipeApi,
        image: SelectedImage,
    ) -> PhotoOutcome {
        if self.updating {
            return PhotoOutcome::Busy;
        }
        let Some(recipe) = self.recipe() else {
            return PhotoOutcome::Failed(LOAD_ERROR.to_string());
        };
        let mut draft = RecipeDraft::from_recipe(recipe);
        if let Err(e) = draft.select_image(image) {
            return PhotoOutcome::Rejected(e.to_string());
        }

        self.updating = true;
        let result = api.update_recipe(&draft, &self.id).await;
        self.updating = false;
        match result {
            Ok(updated) => {
                self.action_error = None;
                self.state = DetailState::Loaded(updated);
                PhotoOutcome::Updated
            }
            Err(e) => {
                let message = e.user_message();
                self.action_error = Some(message.clone());
                PhotoOutcome::Failed(message)
            }
        }
    }
}
