use clap::{Parser, Subcommand};
use log::{debug, error};
use std::process::ExitCode;

use mealdb_search::format::{
    difficulty, image_url_or_placeholder, instruction_steps, truncate_text, DEFAULT_TRUNCATE_LEN,
};
use mealdb_search::{
    MealDbClient, QueryState, RecipeDetail, RecipeGateway, RecipeListSession, RecipeSearch,
    RecipeSummary, SearchConfig, SearchContext, SearchError,
};

#[derive(Parser)]
#[command(
    name = "mealdb-search",
    version,
    about = "Find recipes on TheMealDB by the ingredients you have"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API base URL override
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Search by up to five comma separated ingredients
    Search {
        /// e.g. "chicken, tomato, basil"
        ingredients: String,
    },
    /// Show one recipe in full
    Show { id: String },
    /// Show a random recipe
    Random,
    /// List recipe categories
    Categories,
    /// List recipes in a category
    Category { name: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, SearchError> {
    let config = SearchConfig::load()?;
    let placeholder = config.placeholder_image.clone();

    let mut builder = RecipeSearch::builder().config(config);
    if let Some(url) = cli.base_url {
        builder = builder.base_url(url);
    }
    let gateway = builder.build()?;
    debug!("Using {}", gateway.source().base_url());

    match cli.command {
        Command::Search { ingredients } => search(&gateway, &ingredients, &placeholder).await,
        Command::Show { id } => {
            let recipe = gateway.get_by_id(&id).await?;
            print_detail(&recipe, &placeholder);
            Ok(ExitCode::SUCCESS)
        }
        Command::Random => {
            let recipe = gateway.get_random().await?;
            print_detail(&recipe, &placeholder);
            Ok(ExitCode::SUCCESS)
        }
        Command::Categories => {
            for category in gateway.categories().await? {
                println!(
                    "{:<16} {}",
                    category.name,
                    truncate_text(category.description.trim(), DEFAULT_TRUNCATE_LEN)
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Category { name } => {
            let recipes = gateway.recipes_by_category(&name).await?;
            println!("{} recipes in {}", recipes.len(), name);
            print_summaries(&recipes, &placeholder);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn search(
    gateway: &RecipeGateway<MealDbClient>,
    raw: &str,
    placeholder: &str,
) -> Result<ExitCode, SearchError> {
    let context = SearchContext::new(raw);
    let session = RecipeListSession::new();

    session.run(gateway.search(&context)).await;

    match session.state() {
        QueryState::Success(recipes) => {
            println!(
                "{} recipes with {}",
                recipes.len(),
                context.display_term()
            );
            print_summaries(&recipes, placeholder);
            Ok(ExitCode::SUCCESS)
        }
        QueryState::Error(message) => {
            eprintln!("{}", message);
            Ok(ExitCode::FAILURE)
        }
        QueryState::Idle | QueryState::Loading => Ok(ExitCode::FAILURE),
    }
}

fn print_summaries(recipes: &[RecipeSummary], placeholder: &str) {
    for recipe in recipes {
        println!(
            "{:>6}  {:<48} {}",
            recipe.id,
            truncate_text(&recipe.name, 48),
            image_url_or_placeholder(recipe.thumbnail_url.as_deref(), placeholder)
        );
    }
}

fn print_detail(recipe: &RecipeDetail, placeholder: &str) {
    println!("{} (#{})", recipe.name, recipe.id);

    let origin: Vec<&str> = [recipe.category.as_deref(), recipe.area.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !origin.is_empty() {
        println!("{}", origin.join(" / "));
    }
    println!("Difficulty: {}", difficulty(recipe).label());
    println!(
        "Image: {}",
        image_url_or_placeholder(recipe.thumbnail_url.as_deref(), placeholder)
    );
    if let Some(video) = &recipe.video_url {
        println!("Video: {}", video);
    }
    if !recipe.tags.is_empty() {
        println!("Tags: {}", recipe.tags.join(", "));
    }

    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        if ingredient.measure.is_empty() {
            println!("  - {}", ingredient.name);
        } else {
            println!("  - {} {}", ingredient.measure, ingredient.name);
        }
    }

    println!("\nInstructions:");
    for step in instruction_steps(&recipe.instructions) {
        println!("  {}. {}", step.number, step.text);
    }

    if let Some(source) = &recipe.source_url {
        println!("\nSource: {}", source);
    }
}
