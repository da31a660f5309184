use recetario::basic_models::{Category, Recipe};
use recetario::form::{Field, FieldErrors, FormMode, RecipeDraft, SelectedImage};

use crate::api::RecipeApi;
use crate::errors::ApiResult;

#[derive(Debug)]
pub enum SubmitOutcome {
    /// The backend accepted the recipe. The form is closed.
    Saved(Recipe),
    /// Validation failed; nothing was sent.
    Invalid,
    /// The backend rejected the request; the draft is kept for a retry.
    Failed,
    /// A submission is already in flight.
    Busy,
}

/// A submission that passed validation, ready to be sent.
#[derive(Debug, Clone)]
pub struct PendingSubmit {
    mode: FormMode,
    draft: RecipeDraft,
}

impl PendingSubmit {
    /// Issue exactly one create or update, depending on the form mode.
    pub async fn send(&self, api: &dyn RecipeApi) -> ApiResult<Recipe> {
        match &self.mode {
            FormMode::Create => api.create_recipe(&self.draft).await,
            FormMode::Edit(id) => api.update_recipe(&self.draft, id).await,
        }
    }
}

/// The add/edit recipe modal.
#[derive(Debug)]
pub struct RecipeFormView {
    mode: FormMode,
    draft: RecipeDraft,
    errors: FieldErrors,
    general_error: Option<String>,
    saving: bool,
    open: bool,
}

impl RecipeFormView {
    pub fn for_create() -> Self {
        Self::with_draft(FormMode::Create, RecipeDraft::default())
    }

    pub fn for_edit(recipe: &Recipe) -> Self {
        Self::with_draft(
            FormMode::Edit(recipe.id.clone()),
            RecipeDraft::from_recipe(recipe),
        )
    }

    fn with_draft(mode: FormMode, draft: RecipeDraft) -> Self {
        Self {
            mode,
            draft,
            errors: FieldErrors::default(),
            general_error: None,
            saving: false,
            open: true,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Close without saving. The draft is discarded.
    pub fn close(&mut self) {
        self.open = false;
        self.draft = RecipeDraft::default();
        self.errors = FieldErrors::default();
        self.general_error = None;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
        self.errors.clear(Field::Title);
    }

    pub fn set_category(&mut self, category: Category, selected: bool) {
        self.draft.set_category(category, selected);
        self.errors.clear(Field::Categories);
    }

    pub fn set_fit(&mut self, fit: bool) {
        self.draft.fit = fit;
    }

    pub fn set_ingredients(&mut self, ingredients: impl Into<String>) {
        self.draft.ingredients = ingredients.into();
        self.errors.clear(Field::Ingredients);
    }

    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.draft.instructions = instructions.into();
        self.errors.clear(Field::Instructions);
    }

    /// Validate and take a newly picked image. Returns whether it was accepted.
    pub fn select_image(&mut self, image: SelectedImage) -> bool {
        self.errors.clear(Field::Image);
        match self.draft.select_image(image) {
            Ok(()) => true,
            Err(e) => {
                self.errors.set(Field::Image, e.to_string());
                false
            }
        }
    }

    /// Validate and mark the form as saving.
    ///
    /// Returns `Err` with the outcome when nothing should be sent.
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, SubmitOutcome> {
        if self.saving {
            return Err(SubmitOutcome::Busy);
        }
        let errors = self.draft.validate();
        if !errors.is_empty() {
            self.errors = errors;
            return Err(SubmitOutcome::Invalid);
        }
        self.saving = true;
        self.general_error = None;
        Ok(PendingSubmit {
            mode: self.mode.clone(),
            draft: self.draft.clone(),
        })
    }

    pub fn finish_submit(&mut self, result: ApiResult<Recipe>) -> SubmitOutcome {
        self.saving = false;
        match result {
            Ok(recipe) => {
                self.close();
                SubmitOutcome::Saved(recipe)
            }
            Err(e) => {
                let message = e.user_message();
                tracing::warn!("Saving recipe failed: {}", message);
                if is_image_error(&message) {
                    self.errors.set(Field::Image, message);
                } else {
                    self.general_error = Some(message);
                }
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn submit(&mut self, api: &dyn RecipeApi) -> SubmitOutcome {
        match self.begin_submit() {
            Ok(pending) => {
                let result = pending.send(api).await;
                self.finish_submit(result)
            }
            Err(outcome) => outcome,
        }
    }
}

/// Backend messages about the uploaded file belong next to the image input.
fn is_image_error(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("20mb") || message.contains("archivo")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{recipe, FakeApi};
    use recetario::basic_models::RecipeId;
    use recetario::form::ImageSlot;
    use reqwest::StatusCode;

    fn fill(form: &mut RecipeFormView) {
        form.set_title("Tortilla");
        form.set_category(Category::Cena, true);
        form.set_ingredients("papas, huevos ,  cebolla");
        form.set_instructions("1) Freír 2) Mezclar 3) Dorar");
        form.set_fit(false);
    }

    fn png() -> SelectedImage {
        SelectedImage {
            file_name: "tortilla.png".into(),
            mime_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_network() {
        let api = FakeApi::new();
        let mut form = RecipeFormView::for_create();
        form.set_title("Solo título");
        assert!(matches!(form.submit(&api).await, SubmitOutcome::Invalid));
        assert!(form.errors().get(Field::Ingredients).is_some());
        assert!(form.errors().get(Field::Instructions).is_some());
        assert!(form.errors().get(Field::Categories).is_some());
        assert!(form.errors().get(Field::Title).is_none());
        assert_eq!(api.mutation_count(), 0);
        assert!(form.is_open());
    }

    #[tokio::test]
    async fn each_missing_field_blocks_submission() {
        type Clear = fn(&mut RecipeFormView);
        let cases: [(Clear, Field); 4] = [
            (|f| f.set_title(""), Field::Title),
            (|f| f.set_ingredients(" "), Field::Ingredients),
            (|f| f.set_instructions(""), Field::Instructions),
            (|f| f.set_category(Category::Cena, false), Field::Categories),
        ];
        for (clear, field) in cases {
            let api = FakeApi::new();
            let mut form = RecipeFormView::for_create();
            fill(&mut form);
            clear(&mut form);
            assert!(matches!(form.submit(&api).await, SubmitOutcome::Invalid));
            assert!(form.errors().get(field).is_some(), "{field} should error");
            assert_eq!(form.errors().len(), 1);
            assert_eq!(api.mutation_count(), 0);
        }
    }

    #[tokio::test]
    async fn editing_a_field_clears_its_error() {
        let api = FakeApi::new();
        let mut form = RecipeFormView::for_create();
        form.submit(&api).await;
        assert!(form.errors().get(Field::Title).is_some());
        form.set_title("Flan");
        assert!(form.errors().get(Field::Title).is_none());
        assert!(form.errors().get(Field::Ingredients).is_some());
    }

    #[tokio::test]
    async fn create_then_get_returns_the_draft() {
        let api = FakeApi::new();
        let mut form = RecipeFormView::for_create();
        fill(&mut form);
        assert!(form.select_image(png()));

        let saved = match form.submit(&api).await {
            SubmitOutcome::Saved(recipe) => recipe,
            other => panic!("expected saved, got {other:?}"),
        };
        assert!(!form.is_open());
        assert_eq!(form.draft(), &RecipeDraft::default());

        let fetched = api.get_recipe(&saved.id).await.unwrap();
        assert_eq!(fetched.title, "Tortilla");
        assert_eq!(fetched.categories, vec![Category::Cena]);
        assert!(!fetched.fit);
        assert_eq!(fetched.ingredients, vec!["papas", "huevos", "cebolla"]);
        assert_eq!(fetched.instructions, "1) Freír 2) Mezclar 3) Dorar");
        assert!(fetched.image_url.is_some());
        assert_eq!(api.creates().len(), 1);
        assert!(api.updates().is_empty());
    }

    #[tokio::test]
    async fn edit_mode_issues_only_an_update() {
        let existing = recipe(9, "Milanesa");
        let api = FakeApi::new().with_recipe(existing.clone());
        let mut form = RecipeFormView::for_edit(&existing);
        form.set_title("Milanesa napolitana");

        let saved = match form.submit(&api).await {
            SubmitOutcome::Saved(recipe) => recipe,
            other => panic!("expected saved, got {other:?}"),
        };
        assert_eq!(saved.title, "Milanesa napolitana");
        assert!(api.creates().is_empty());
        let updates = api.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, RecipeId::Number(9));
        // The existing image URL is kept, not re-uploaded
        assert!(matches!(updates[0].1.image, ImageSlot::Existing(_)));
    }

    #[test]
    fn second_submit_while_saving_is_busy() {
        let mut form = RecipeFormView::for_create();
        fill(&mut form);
        assert!(form.begin_submit().is_ok());
        assert!(form.is_saving());
        assert!(matches!(form.begin_submit(), Err(SubmitOutcome::Busy)));
    }

    #[tokio::test]
    async fn image_errors_from_backend_go_to_the_image_field() {
        let api = FakeApi::failing_with(
            StatusCode::PAYLOAD_TOO_LARGE,
            r#"{"message": "El archivo supera los 20MB"}"#,
        );
        let mut form = RecipeFormView::for_create();
        fill(&mut form);
        assert!(matches!(form.submit(&api).await, SubmitOutcome::Failed));
        assert_eq!(
            form.errors().get(Field::Image),
            Some("El archivo supera los 20MB")
        );
        assert_eq!(form.general_error(), None);
        assert!(!form.is_saving());
    }

    #[tokio::test]
    async fn other_backend_errors_keep_the_draft() {
        let api = FakeApi::failing_with(StatusCode::BAD_REQUEST, "not json");
        let mut form = RecipeFormView::for_create();
        fill(&mut form);
        let before = form.draft().clone();
        assert!(matches!(form.submit(&api).await, SubmitOutcome::Failed));
        assert_eq!(form.general_error(), Some("Datos inválidos o incompletos"));
        assert_eq!(form.draft(), &before);
        assert!(form.is_open());
    }

    #[test]
    fn rejected_image_sets_field_error_and_keeps_previous() {
        let mut form = RecipeFormView::for_create();
        assert!(form.select_image(png()));
        let bmp = SelectedImage {
            file_name: "x.bmp".into(),
            mime_type: "image/bmp".into(),
            bytes: vec![0],
        };
        assert!(!form.select_image(bmp));
        assert_eq!(
            form.errors().get(Field::Image),
            Some("Formato de imagen no válido. Permitidos: JPG, PNG o WEBP.")
        );
        assert_eq!(form.draft().image.pending().unwrap().file_name, "tortilla.png");

        assert!(form.select_image(png()));
        assert!(form.errors().get(Field::Image).is_none());
    }
}
