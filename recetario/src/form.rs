use std::collections::BTreeMap;

use crate::basic_models::{Category, Recipe, RecipeId, RecipePayload};
use itertools::Itertools;
use strum::{Display, IntoStaticStr};

/// Largest image accepted at selection time.
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Whether a form submission creates a new recipe or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecipeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Title,
    Categories,
    Ingredients,
    Instructions,
    Image,
}

/// At most one message per form field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// A file picked by the user, held in memory until upload.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedImage")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageSlot {
    #[default]
    Empty,
    /// The image the recipe already has. Never re-uploaded.
    Existing(String),
    /// A newly selected file pending upload.
    Pending(SelectedImage),
}

impl ImageSlot {
    pub fn pending(&self) -> Option<&SelectedImage> {
        match self {
            ImageSlot::Pending(image) => Some(image),
            _ => None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageSelectionError {
    #[error("Formato de imagen no válido. Permitidos: JPG, PNG o WEBP.")]
    UnsupportedType(String),
    #[error("El archivo supera el tamaño máximo permitido (20MB).")]
    TooLarge(usize),
}

/// Check an image against the allowed types and the size limit.
pub fn check_image(image: &SelectedImage) -> Result<(), ImageSelectionError> {
    if !ALLOWED_IMAGE_TYPES.contains(&image.mime_type.as_str()) {
        return Err(ImageSelectionError::UnsupportedType(image.mime_type.clone()));
    }
    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(ImageSelectionError::TooLarge(image.bytes.len()));
    }
    Ok(())
}

/// Split comma separated ingredients, trimming and dropping empty entries.
pub fn split_ingredients(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// The editable state of the recipe form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    /// Selection order is kept, no duplicates.
    pub categories: Vec<Category>,
    pub fit: bool,
    /// Raw comma separated text as typed.
    pub ingredients: String,
    pub instructions: String,
    pub image: ImageSlot,
    /// Ingredients as stored, kept while `ingredients` still shows them unedited.
    loaded_ingredients: Vec<String>,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            categories: vec![],
            fit: true,
            ingredients: String::new(),
            instructions: String::new(),
            image: ImageSlot::Empty,
            loaded_ingredients: vec![],
        }
    }
}

impl RecipeDraft {
    /// Pre-populate the form from a loaded recipe, for editing.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            categories: recipe.categories.iter().copied().unique().collect(),
            fit: recipe.fit,
            ingredients: recipe.ingredients.join(", "),
            instructions: recipe.instructions.clone(),
            image: recipe
                .image_url
                .clone()
                .map(ImageSlot::Existing)
                .unwrap_or_default(),
            loaded_ingredients: recipe.ingredients.clone(),
        }
    }

    pub fn set_category(&mut self, category: Category, selected: bool) {
        if selected {
            if !self.categories.contains(&category) {
                self.categories.push(category);
            }
        } else {
            self.categories.retain(|c| *c != category);
        }
    }

    /// Required field checks, one message per invalid field.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.title.trim().is_empty() {
            errors.set(Field::Title, "El título es obligatorio");
        }
        if self.ingredients.trim().is_empty() {
            errors.set(Field::Ingredients, "Los ingredientes son obligatorios");
        }
        if self.instructions.trim().is_empty() {
            errors.set(Field::Instructions, "Las instrucciones son obligatorias");
        }
        if self.categories.is_empty() {
            errors.set(Field::Categories, "Seleccioná al menos una categoría");
        }
        errors
    }

    /// Replace the draft's image. A rejected file leaves the current image alone.
    pub fn select_image(&mut self, image: SelectedImage) -> Result<(), ImageSelectionError> {
        check_image(&image)?;
        // Dropping the previous pending buffer releases it
        self.image = ImageSlot::Pending(image);
        Ok(())
    }

    /// The ingredients to send. Untouched text from a loaded recipe yields the stored
    /// list as is, so entries containing commas survive.
    pub fn ingredient_list(&self) -> Vec<String> {
        if !self.loaded_ingredients.is_empty()
            && self.ingredients == self.loaded_ingredients.join(", ")
        {
            return self.loaded_ingredients.clone();
        }
        split_ingredients(&self.ingredients)
    }

    pub fn to_payload(&self, id: Option<RecipeId>) -> RecipePayload {
        RecipePayload {
            id,
            title: self.title.trim().to_string(),
            categories: self.categories.clone(),
            fit: self.fit,
            ingredients: self.ingredient_list(),
            instructions: self.instructions.clone(),
        }
    }
}
