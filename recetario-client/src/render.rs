//! Plain text rendering of the views, for the terminal.

use std::fmt::Write;

use itertools::Itertools;

use recetario::basic_models::Recipe;
use recetario::display;
use recetario::form::{Field, FieldErrors};

use crate::views::detail::{DetailState, RecipeDetailView};
use crate::views::list::{ListState, RecipeListView};

const NO_IMAGE: &str = "(sin foto)";

pub fn recipe_card(recipe: &Recipe) -> String {
    format!(
        "[{}] {}\n    {} · {} · {}",
        recipe.id,
        recipe.title,
        recipe.category_labels(),
        if recipe.fit { "Fit" } else { "No fit" },
        recipe.image_url.as_deref().unwrap_or(NO_IMAGE),
    )
}

pub fn list_view(view: &RecipeListView) -> String {
    let mut out = String::from("Todas las recetas\n\n");
    match view.state() {
        ListState::Idle | ListState::Loading => out.push_str("Cargando Recetas...\n"),
        ListState::Failed(message) => {
            let _ = writeln!(out, "Error: {message}");
        }
        ListState::Loaded(recipes) => {
            if let Some(empty) = view.empty_message() {
                let _ = writeln!(out, "{empty}");
            }
            for recipe in recipes {
                let _ = writeln!(out, "{}", recipe_card(recipe));
            }
        }
    }
    if view.shows_pagination() {
        let _ = writeln!(
            out,
            "\n{} Página {} de {} {}",
            if view.can_go_previous() { "< Anterior" } else { "          " },
            view.page() + 1,
            view.total_pages(),
            if view.can_go_next() { "Siguiente >" } else { "" },
        );
    }
    out
}

pub fn detail_view(view: &RecipeDetailView) -> String {
    let recipe = match view.state() {
        DetailState::Loading => return "Cargando receta...\n".to_string(),
        DetailState::Failed(message) => return format!("{message}\n"),
        DetailState::Loaded(recipe) => recipe,
    };
    let mut out = String::new();
    let _ = writeln!(out, "{}", recipe.title);
    let _ = writeln!(out, "Categorías: {}", recipe.category_labels());
    let _ = writeln!(out, "Fit: {}", display::fit_label(recipe.fit));
    let _ = writeln!(out, "Foto: {}", recipe.image_url.as_deref().unwrap_or(NO_IMAGE));
    out.push_str("\nIngredientes\n");
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "  - {ingredient}");
    }
    out.push_str("\nInstrucciones\n");
    for line in view.instruction_lines() {
        let _ = writeln!(out, "  {line}");
    }
    if let Some(error) = view.action_error() {
        let _ = writeln!(out, "\nError: {error}");
    }
    out
}

pub fn field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {message}", field_label(field)))
        .join("\n")
}

fn field_label(field: Field) -> &'static str {
    match field {
        Field::Title => "Título",
        Field::Categories => "Categoría",
        Field::Ingredients => "Ingredientes",
        Field::Instructions => "Instrucciones",
        Field::Image => "Imagen",
    }
}
