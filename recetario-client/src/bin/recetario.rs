use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use recetario::basic_models::{Category, RecipeId};
use recetario::filters::{FitFilter, RecipeFilters};
use recetario_client::image_file::load_image;
use recetario_client::render;
use recetario_client::share::{CommandShare, NoShare, ShareOutcome, ShareTarget};
use recetario_client::views::detail::{Confirm, DeleteOutcome, PhotoOutcome, RecipeDetailView};
use recetario_client::views::form::{RecipeFormView, SubmitOutcome};
use recetario_client::views::list::RecipeListView;
use recetario_client::{ClientConfig, HttpRecipeApi, RecipeApi};
use strum::IntoEnumIterator;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Browse and edit the recipe catalog
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// URL of the recipes API. Overrides the config file and RECETARIO_API_URL.
    #[arg(long)]
    server: Option<String>,
    /// YAML configuration file
    #[arg(long)]
    config: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List one page of recipes
    List {
        #[arg(short, long)]
        category: Option<Category>,
        /// 'true' or 'false'. Both when omitted.
        #[arg(short, long)]
        fit: Option<FitFilter>,
        /// Free text search
        #[arg(short, long)]
        search: Option<String>,
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Browse the list interactively
    Browse,
    /// Show one recipe
    Show { id: RecipeId },
    /// Add a new recipe
    Add(RecipeFields),
    /// Edit an existing recipe. Only the given fields change.
    Edit {
        id: RecipeId,
        #[command(flatten)]
        fields: RecipeFields,
    },
    /// Delete a recipe
    Delete {
        id: RecipeId,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Share a recipe as plain text
    Share { id: RecipeId },
    /// Replace the photo of a recipe
    Photo { id: RecipeId, image: PathBuf },
}

#[derive(clap::Args, Debug)]
struct RecipeFields {
    #[arg(short, long)]
    title: Option<String>,
    /// Category of the recipe. Repeat for several.
    #[arg(short, long = "category")]
    categories: Vec<Category>,
    #[arg(long, action = ArgAction::Set)]
    fit: Option<bool>,
    /// Comma separated ingredients
    #[arg(short, long)]
    ingredients: Option<String>,
    #[arg(long)]
    instructions: Option<String>,
    /// JPG, PNG or WEBP image, up to 20MB
    #[arg(long)]
    image: Option<PathBuf>,
}

struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [s/N] ");
        let _ = std::io::stdout().flush();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(
            answer.trim().to_lowercase().as_str(),
            "s" | "si" | "sí" | "y" | "yes"
        )
    }
}

struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let mut config = ClientConfig::resolve(args.config.as_deref())?;
    if let Some(server) = args.server {
        config.base_url = server.trim_end_matches('/').to_string();
    }
    tracing::debug!("Using {:?}", config);
    let api = HttpRecipeApi::new(&config)?;

    match args.command {
        Command::List {
            category,
            fit,
            search,
            page,
        } => {
            let filters = RecipeFilters {
                category,
                fit: fit.unwrap_or_default(),
                search: search.unwrap_or_default(),
            };
            let mut view = RecipeListView::with_filters(config.page_size, filters);
            view.go_to_page(&api, page.saturating_sub(1)).await;
            print!("{}", render::list_view(&view));
            if let Some(error) = view.error() {
                bail!("{error}");
            }
        }
        Command::Browse => browse(&api, config.page_size).await?,
        Command::Show { id } => {
            let view = load_detail(&api, id).await?;
            print!("{}", render::detail_view(&view));
        }
        Command::Add(fields) => {
            let mut form = RecipeFormView::for_create();
            apply_fields(&mut form, fields).await?;
            let recipe = submit(&mut form, &api).await?;
            println!("Receta creada: {}", render::recipe_card(&recipe));
        }
        Command::Edit { id, fields } => {
            let mut view = load_detail(&api, id).await?;
            let mut form = view
                .edit_form()
                .ok_or_else(|| anyhow!("No recipe loaded"))?;
            apply_fields(&mut form, fields).await?;
            let recipe = submit(&mut form, &api).await?;
            view.apply_saved(recipe);
            print!("{}", render::detail_view(&view));
        }
        Command::Delete { id, yes } => {
            let mut view = load_detail(&api, id).await?;
            let confirm: &dyn Confirm = if yes { &AlwaysConfirm } else { &StdinConfirm };
            match view.delete(&api, confirm).await {
                DeleteOutcome::Cancelled => println!("Cancelado"),
                DeleteOutcome::NavigateToList(message) => {
                    println!("{message}");
                    let mut list = RecipeListView::new(config.page_size);
                    list.reload(&api).await;
                    print!("\n{}", render::list_view(&list));
                }
                DeleteOutcome::Failed(message) => bail!("{message}"),
            }
        }
        Command::Share { id } => {
            let view = load_detail(&api, id).await?;
            let target: Box<dyn ShareTarget> = match config
                .share_command
                .as_deref()
                .and_then(CommandShare::new)
            {
                Some(command) => Box::new(command),
                None => Box::new(NoShare),
            };
            match view.share(target.as_ref()).await? {
                Some(ShareOutcome::Shared) => println!("Receta compartida"),
                Some(ShareOutcome::Fallback { notice, text }) => {
                    eprintln!("{notice}");
                    println!("{text}");
                }
                None => bail!("No recipe loaded"),
            }
        }
        Command::Photo { id, image } => {
            let mut view = load_detail(&api, id).await?;
            let image = load_image(&image).await?;
            match view.update_photo(&api, image).await {
                PhotoOutcome::Updated => print!("{}", render::detail_view(&view)),
                PhotoOutcome::Rejected(message) | PhotoOutcome::Failed(message) => {
                    bail!("{message}")
                }
                PhotoOutcome::Busy => bail!("A photo update is already running"),
            }
        }
    }
    Ok(())
}

async fn load_detail(api: &dyn RecipeApi, id: RecipeId) -> Result<RecipeDetailView> {
    let mut view = RecipeDetailView::new(id);
    view.load(api).await;
    if view.recipe().is_none() {
        bail!("{}", render::detail_view(&view).trim_end());
    }
    Ok(view)
}

async fn apply_fields(form: &mut RecipeFormView, fields: RecipeFields) -> Result<()> {
    if let Some(title) = fields.title {
        form.set_title(title);
    }
    if !fields.categories.is_empty() {
        for category in Category::iter() {
            form.set_category(category, fields.categories.contains(&category));
        }
    }
    if let Some(fit) = fields.fit {
        form.set_fit(fit);
    }
    if let Some(ingredients) = fields.ingredients {
        form.set_ingredients(ingredients);
    }
    if let Some(instructions) = fields.instructions {
        form.set_instructions(instructions);
    }
    if let Some(path) = fields.image {
        let image = load_image(&path).await?;
        if !form.select_image(image) {
            bail!("{}", render::field_errors(form.errors()));
        }
    }
    Ok(())
}

async fn submit(
    form: &mut RecipeFormView,
    api: &dyn RecipeApi,
) -> Result<recetario::basic_models::Recipe> {
    match form.submit(api).await {
        SubmitOutcome::Saved(recipe) => Ok(recipe),
        SubmitOutcome::Invalid => bail!("{}", render::field_errors(form.errors())),
        SubmitOutcome::Failed => Err(anyhow!(
            "{}",
            form.general_error()
                .map(String::from)
                .unwrap_or_else(|| render::field_errors(form.errors()))
        )),
        SubmitOutcome::Busy => bail!("A save is already running"),
    }
}

/// Interactive list: one command per line.
async fn browse(api: &dyn RecipeApi, page_size: u32) -> Result<()> {
    const HELP: &str = "n: siguiente · p: anterior · c CATEGORIA|-: categoría · \
        f true|false|-: fit · s TEXTO: buscar · v ID: ver receta · q: salir";

    let mut view = RecipeListView::new(page_size);
    view.reload(api).await;
    print!("{}", render::list_view(&view));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Reading stdin")? {
        let line = line.trim();
        let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();
        match cmd {
            "" => continue,
            "q" => break,
            "n" => {
                if !view.next_page(api).await {
                    println!("Ya estás en la última página");
                    continue;
                }
            }
            "p" => {
                if !view.previous_page(api).await {
                    println!("Ya estás en la primera página");
                    continue;
                }
            }
            "c" => {
                let category = match arg {
                    "" | "-" => None,
                    code => match code.parse::<Category>() {
                        Ok(category) => Some(category),
                        Err(_) => {
                            println!("Categoría desconocida: {code}");
                            continue;
                        }
                    },
                };
                view.set_category(api, category).await;
            }
            "f" => {
                let fit = match arg {
                    "-" => Ok(FitFilter::Any),
                    other => other.parse::<FitFilter>(),
                };
                match fit {
                    Ok(fit) => {
                        view.set_fit(api, fit).await;
                    }
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                }
            }
            "s" => {
                view.set_search_text(arg);
                view.search(api).await;
            }
            "v" => {
                let id: RecipeId = arg.parse()?;
                let mut detail = RecipeDetailView::new(id);
                detail.load(api).await;
                print!("{}", render::detail_view(&detail));
                continue;
            }
            _ => {
                println!("{HELP}");
                continue;
            }
        }
        print!("{}", render::list_view(&view));
    }
    Ok(())
}
