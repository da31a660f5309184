use std::time::Duration;

use async_trait::async_trait;
use recetario::basic_models::{Recipe, RecipeId, RecipePage};
use recetario::filters::ListQuery;
use recetario::form::RecipeDraft;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::errors::{ApiError, ApiResult, Operation};

pub const DELETED_MESSAGE: &str = "Receta eliminada exitosamente";

/// The recipe backend, as seen by the views.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    async fn list_recipes(&self, query: &ListQuery) -> ApiResult<RecipePage>;
    async fn get_recipe(&self, id: &RecipeId) -> ApiResult<Recipe>;
    async fn create_recipe(&self, draft: &RecipeDraft) -> ApiResult<Recipe>;
    /// Update an existing recipe. The image is only uploaded when the draft
    /// holds a newly selected file.
    async fn update_recipe(&self, draft: &RecipeDraft, id: &RecipeId) -> ApiResult<Recipe>;
    /// Delete a recipe, returning the backend's confirmation message.
    async fn delete_recipe(&self, id: &RecipeId) -> ApiResult<String>;
}

/// `RecipeApi` over HTTP.
#[derive(Clone)]
pub struct HttpRecipeApi {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    list_path: &'static str,
}

impl HttpRecipeApi {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ApiError::Request)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            list_path: config.list_path(),
        })
    }

    fn recipe_url(&self, id: &RecipeId) -> String {
        format!(
            "{}/recipes/{}",
            self.base_url,
            url_escape::encode_component(&id.to_string())
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request, turning transport failures and non-success statuses into `ApiError`.
    async fn send(&self, operation: Operation, builder: RequestBuilder) -> ApiResult<Response> {
        let resp = builder.send().await.map_err(ApiError::from_transport)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let err = ApiError::from_response(operation, status, &body);
        tracing::warn!("{:?} failed with {}: {}", operation, status, err);
        Err(err)
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
        let body = resp.text().await.map_err(ApiError::from_transport)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// The multipart body shared by create and update.
    fn recipe_form(draft: &RecipeDraft, id: Option<RecipeId>) -> ApiResult<Form> {
        let payload = serde_json::to_string(&draft.to_payload(id))?;
        let mut form = Form::new().part(
            "recipe",
            Part::text(payload)
                .mime_str("application/json")
                .map_err(ApiError::Request)?,
        );
        if let Some(image) = draft.image.pending() {
            form = form.part(
                "image",
                Part::bytes(image.bytes.clone())
                    .file_name(image.file_name.clone())
                    .mime_str(&image.mime_type)
                    .map_err(ApiError::Request)?,
            );
        }
        Ok(form)
    }
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn list_recipes(&self, query: &ListQuery) -> ApiResult<RecipePage> {
        let url = format!("{}{}", self.base_url, self.list_path);
        let builder = self
            .request(Method::GET, &url)
            .query(&query.to_query_pairs());
        let resp = self.send(Operation::List, builder).await?;
        Self::read_json(resp).await
    }

    async fn get_recipe(&self, id: &RecipeId) -> ApiResult<Recipe> {
        let builder = self.request(Method::GET, &self.recipe_url(id));
        let resp = self.send(Operation::Get, builder).await?;
        Self::read_json(resp).await
    }

    async fn create_recipe(&self, draft: &RecipeDraft) -> ApiResult<Recipe> {
        let form = Self::recipe_form(draft, None)?;
        let url = format!("{}/recipes", self.base_url);
        let builder = self.request(Method::POST, &url).multipart(form);
        let resp = self.send(Operation::Create, builder).await?;
        let recipe: Recipe = Self::read_json(resp).await?;
        tracing::info!("Created recipe {} ({})", recipe.id, recipe.title);
        Ok(recipe)
    }

    async fn update_recipe(&self, draft: &RecipeDraft, id: &RecipeId) -> ApiResult<Recipe> {
        let form = Self::recipe_form(draft, Some(id.clone()))?;
        let url = format!("{}/recipes", self.base_url);
        let builder = self.request(Method::PATCH, &url).multipart(form);
        let resp = self.send(Operation::Update, builder).await?;
        let recipe: Recipe = Self::read_json(resp).await?;
        tracing::info!("Updated recipe {}", recipe.id);
        Ok(recipe)
    }

    async fn delete_recipe(&self, id: &RecipeId) -> ApiResult<String> {
        let builder = self.request(Method::DELETE, &self.recipe_url(id));
        let resp = self.send(Operation::Delete, builder).await?;
        // The body is optional, and may not be JSON at all
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(String::from))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DELETED_MESSAGE.to_string());
        tracing::info!("Deleted recipe {}", id);
        Ok(message)
    }
}
