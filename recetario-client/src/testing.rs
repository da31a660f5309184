//! In-memory `RecipeApi` for view tests.

use std::sync::Mutex;

use async_trait::async_trait;
use recetario::basic_models::{Category, Recipe, RecipeId, RecipePage};
use recetario::filters::ListQuery;
use recetario::form::{ImageSlot, RecipeDraft};
use reqwest::StatusCode;

use crate::api::{RecipeApi, DELETED_MESSAGE};
use crate::errors::{ApiError, ApiResult, Operation};

pub fn recipe(id: i64, title: &str) -> Recipe {
    Recipe {
        id: RecipeId::Number(id),
        title: title.to_string(),
        categories: vec![Category::Almuerzo],
        fit: true,
        ingredients: vec!["sal".into(), "aceite".into()],
        instructions: "1) Preparar 2) Cocinar".into(),
        image_url: Some(format!("https://img.example/{id}.webp")),
    }
}

#[derive(Default)]
struct FakeState {
    recipes: Vec<Recipe>,
    next_id: i64,
    fail_next: Option<(StatusCode, String)>,
    list_calls: Vec<ListQuery>,
    creates: Vec<RecipeDraft>,
    updates: Vec<(RecipeId, RecipeDraft)>,
    deletes: Vec<RecipeId>,
}

#[derive(Default)]
pub struct FakeApi {
    page: Option<RecipePage>,
    fail_always: Option<(StatusCode, String)>,
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every list call answers with `page`.
    pub fn with_page(page: RecipePage) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::failing_with(StatusCode::INTERNAL_SERVER_ERROR, "boom")
    }

    pub fn failing_with(status: StatusCode, body: &str) -> Self {
        Self {
            fail_always: Some((status, body.to_string())),
            ..Self::default()
        }
    }

    pub fn with_recipe(self, recipe: Recipe) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            if let RecipeId::Number(n) = recipe.id {
                state.next_id = state.next_id.max(n);
            }
            state.recipes.push(recipe);
        }
        self
    }

    pub fn fail_next_with(&self, status: StatusCode, body: &str) {
        self.state.lock().unwrap().fail_next = Some((status, body.to_string()));
    }

    pub fn list_calls(&self) -> Vec<ListQuery> {
        self.state.lock().unwrap().list_calls.clone()
    }

    pub fn creates(&self) -> Vec<RecipeDraft> {
        self.state.lock().unwrap().creates.clone()
    }

    pub fn updates(&self) -> Vec<(RecipeId, RecipeDraft)> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn deletes(&self) -> Vec<RecipeId> {
        self.state.lock().unwrap().deletes.clone()
    }

    /// Number of create, update and delete calls received.
    pub fn mutation_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.creates.len() + state.updates.len() + state.deletes.len()
    }

    fn check_failure(&self, state: &mut FakeState, operation: Operation) -> ApiResult<()> {
        if let Some((status, body)) = state.fail_next.take().or_else(|| self.fail_always.clone()) {
            return Err(ApiError::from_response(operation, status, &body));
        }
        Ok(())
    }
}

fn not_found(operation: Operation) -> ApiError {
    ApiError::from_response(operation, StatusCode::NOT_FOUND, "")
}

fn image_url(draft: &RecipeDraft, previous: Option<String>) -> Option<String> {
    match &draft.image {
        ImageSlot::Pending(image) => Some(format!("https://img.example/{}", image.file_name)),
        _ => previous,
    }
}

#[async_trait]
impl RecipeApi for FakeApi {
    async fn list_recipes(&self, query: &ListQuery) -> ApiResult<RecipePage> {
        let mut state = self.state.lock().unwrap();
        state.list_calls.push(query.clone());
        self.check_failure(&mut state, Operation::List)?;
        Ok(self.page.clone().unwrap_or_else(|| RecipePage {
            content: state.recipes.clone(),
            total_pages: 1,
        }))
    }

    async fn get_recipe(&self, id: &RecipeId) -> ApiResult<Recipe> {
        let mut state = self.state.lock().unwrap();
        self.check_failure(&mut state, Operation::Get)?;
        state
            .recipes
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| not_found(Operation::Get))
    }

    async fn create_recipe(&self, draft: &RecipeDraft) -> ApiResult<Recipe> {
        let mut state = self.state.lock().unwrap();
        state.creates.push(draft.clone());
        self.check_failure(&mut state, Operation::Create)?;
        state.next_id += 1;
        let payload = draft.to_payload(None);
        let recipe = Recipe {
            id: RecipeId::Number(state.next_id),
            title: payload.title,
            categories: payload.categories,
            fit: payload.fit,
            ingredients: payload.ingredients,
            instructions: payload.instructions,
            image_url: image_url(draft, None),
        };
        state.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn update_recipe(&self, draft: &RecipeDraft, id: &RecipeId) -> ApiResult<Recipe> {
        let mut state = self.state.lock().unwrap();
        state.updates.push((id.clone(), draft.clone()));
        self.check_failure(&mut state, Operation::Update)?;
        let existing = state
            .recipes
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| not_found(Operation::Update))?;
        let payload = draft.to_payload(Some(id.clone()));
        existing.title = payload.title;
        existing.categories = payload.categories;
        existing.fit = payload.fit;
        existing.ingredients = payload.ingredients;
        existing.instructions = payload.instructions;
        existing.image_url = image_url(draft, existing.image_url.take());
        Ok(existing.clone())
    }

    async fn delete_recipe(&self, id: &RecipeId) -> ApiResult<String> {
        let mut state = self.state.lock().unwrap();
        state.deletes.push(id.clone());
        self.check_failure(&mut state, Operation::Delete)?;
        let before = state.recipes.len();
        state.recipes.retain(|r| &r.id != id);
        if state.recipes.len() == before {
            return Err(not_found(Operation::Delete));
        }
        Ok(DELETED_MESSAGE.to_string())
    }
}
