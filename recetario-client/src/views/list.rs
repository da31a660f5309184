use recetario::basic_models::{Category, Recipe, RecipePage};
use recetario::filters::{FitFilter, ListQuery, RecipeFilters};

use super::{RequestSequence, Ticket};
use crate::api::RecipeApi;
use crate::errors::ApiResult;

pub const LOAD_ERROR: &str = "No se pudieron cargar las recetas";

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Idle,
    Loading,
    Loaded(Vec<Recipe>),
    Failed(String),
}

/// The paginated, filterable recipe list.
///
/// Category and fit changes reload immediately from the first page. Search
/// text is only applied by an explicit [`RecipeListView::search`].
#[derive(Debug)]
pub struct RecipeListView {
    filters: RecipeFilters,
    page: u32,
    page_size: u32,
    total_pages: u32,
    state: ListState,
    requests: RequestSequence,
}

impl RecipeListView {
    pub fn new(page_size: u32) -> Self {
        Self {
            filters: RecipeFilters::default(),
            page: 0,
            page_size,
            total_pages: 0,
            state: ListState::Idle,
            requests: RequestSequence::default(),
        }
    }

    /// Start with a filter selection already applied, without loading.
    pub fn with_filters(page_size: u32, filters: RecipeFilters) -> Self {
        Self {
            filters,
            ..Self::new(page_size)
        }
    }

    pub fn filters(&self) -> &RecipeFilters {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn recipes(&self) -> &[Recipe] {
        match &self.state {
            ListState::Loaded(recipes) => recipes.as_slice(),
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ListState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Mark the view as loading and return the request to issue.
    pub fn begin_load(&mut self) -> (Ticket, ListQuery) {
        self.state = ListState::Loading;
        let query = ListQuery::from_filters(&self.filters, self.page, self.page_size);
        (self.requests.next(), query)
    }

    /// Apply a response. Returns false when a newer load superseded it.
    pub fn finish_load(&mut self, ticket: Ticket, result: ApiResult<RecipePage>) -> bool {
        if !self.requests.is_latest(ticket) {
            tracing::debug!("Dropping stale list response {:?}", ticket);
            return false;
        }
        match result {
            Ok(page) => {
                self.total_pages = page.total_pages;
                self.state = ListState::Loaded(page.content);
            }
            Err(e) => {
                tracing::error!("Error loading recipes: {}", e);
                self.total_pages = 0;
                self.state = ListState::Failed(LOAD_ERROR.to_string());
            }
        }
        true
    }

    /// Load the current page with the current filters.
    pub async fn reload(&mut self, api: &dyn RecipeApi) {
        let (ticket, query) = self.begin_load();
        let result = api.list_recipes(&query).await;
        self.finish_load(ticket, result);
    }

    /// Replace the filters. Returns whether a reload was issued.
    pub async fn set_filters(&mut self, api: &dyn RecipeApi, filters: RecipeFilters) -> bool {
        let changed = self.filters.selection_changed(&filters);
        self.filters = filters;
        if changed {
            self.page = 0;
            self.reload(api).await;
        }
        changed
    }

    pub async fn set_category(&mut self, api: &dyn RecipeApi, category: Option<Category>) -> bool {
        let filters = RecipeFilters {
            category,
            ..self.filters.clone()
        };
        self.set_filters(api, filters).await
    }

    pub async fn set_fit(&mut self, api: &dyn RecipeApi, fit: FitFilter) -> bool {
        let filters = RecipeFilters {
            fit,
            ..self.filters.clone()
        };
        self.set_filters(api, filters).await
    }

    /// Update the search box. Nothing is fetched until [`Self::search`].
    pub fn set_search_text(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
    }

    /// Apply the search text, starting again from the first page.
    pub async fn search(&mut self, api: &dyn RecipeApi) {
        self.page = 0;
        self.reload(api).await;
    }

    pub fn can_go_previous(&self) -> bool {
        self.page > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn shows_pagination(&self) -> bool {
        self.total_pages > 1
    }

    /// Jump to a page and load it. Used when starting from a given page.
    pub async fn go_to_page(&mut self, api: &dyn RecipeApi, page: u32) {
        self.page = page;
        self.reload(api).await;
    }

    pub async fn next_page(&mut self, api: &dyn RecipeApi) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.go_to_page(api, self.page + 1).await;
        true
    }

    pub async fn previous_page(&mut self, api: &dyn RecipeApi) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.go_to_page(api, self.page - 1).await;
        true
    }

    /// Text shown instead of cards when a load returned nothing.
    pub fn empty_message(&self) -> Option<String> {
        match &self.state {
            ListState::Loaded(recipes) if recipes.is_empty() => {
                let mut message = "No se encontraron recetas".to_string();
                if self.filters.is_active() {
                    message.push_str(" con esos filtros");
                }
                Some(message)
            }
            _ => None,
        }
    }
}
