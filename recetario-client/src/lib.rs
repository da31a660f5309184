pub mod api;
pub mod config;
pub mod errors;
pub mod image_file;
pub mod render;
pub mod share;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{HttpRecipeApi, RecipeApi};
pub use config::ClientConfig;
pub use errors::{ApiError, ApiResult};
