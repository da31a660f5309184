//! Text transforms used when rendering recipes. Nothing here is persisted.

use crate::basic_models::Recipe;
use regex::Regex;

lazy_static::lazy_static! {
    // A numbered step marker: digits followed by `)` or `.`
    static ref STEP_MARKER: Regex = Regex::new(r"(\d+\)|\d+\.)").expect("valid step regex");
}

/// Break instructions into display lines, one per numbered step.
///
/// A line break is inserted before every step marker, then the text is split
/// into trimmed, non-empty lines.
pub fn format_instructions(instructions: &str) -> Vec<String> {
    STEP_MARKER
        .replace_all(instructions, "\n$1")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn fit_label(fit: bool) -> &'static str {
    if fit {
        "Sí"
    } else {
        "No"
    }
}

/// Plain text message used when sharing a recipe.
pub fn share_message(recipe: &Recipe) -> String {
    let mut text = format!("{}\n\nIngredientes:\n", recipe.title);
    for ingredient in &recipe.ingredients {
        text.push_str("- ");
        text.push_str(ingredient);
        text.push('\n');
    }
    text.push_str("\nInstrucciones:\n");
    text.push_str(&format_instructions(&recipe.instructions).join("\n"));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_models::{Category, RecipeId};

    #[test]
    fn splits_on_numbered_steps() {
        assert_eq!(
            format_instructions("1) Batir los huevos 2) Agregar harina 3. Hornear 20 min"),
            vec![
                "1) Batir los huevos",
                "2) Agregar harina",
                "3. Hornear 20 min"
            ]
        );
    }

    #[test]
    fn keeps_existing_lines_and_drops_blank_ones() {
        assert_eq!(
            format_instructions("Precalentar el horno\n\n   \nServir frío"),
            vec!["Precalentar el horno", "Servir frío"]
        );
    }

    #[test]
    fn empty_instructions_have_no_lines() {
        assert!(format_instructions("").is_empty());
    }

    #[test]
    fn share_message_lists_everything() {
        let recipe = Recipe {
            id: RecipeId::Number(1),
            title: "Licuado".into(),
            categories: vec![Category::Desayuno],
            fit: true,
            ingredients: vec!["banana".into(), "leche".into()],
            instructions: "1) Licuar 2) Servir".into(),
            image_url: None,
        };
        assert_eq!(
            share_message(&recipe),
            "Licuado\n\nIngredientes:\n- banana\n- leche\n\nInstrucciones:\n1) Licuar\n2) Servir"
        );
    }
}
