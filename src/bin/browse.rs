//! Browse the question API from a terminal
//!
//! Without a category, prints the catalog with availability and counts.
//! With one, fetches it through the gateway and prints the questions that
//! pass the given filters.

use clap::Parser;
use std::sync::Arc;

use question_hub::{
    client::{GatewayConfig, QuestionGateway},
    filter::{CategoryCatalog, CategoryView},
    logging,
};

#[derive(Parser, Debug)]
#[command(name = "question-hub-browse")]
#[command(about = "Browse interview questions served by a question hub")]
struct BrowseArgs {
    /// Base URL of the question hub API
    #[arg(long, env = "API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    /// Category slug (e.g. `frontend`) or store name; omit to list categories
    category: Option<String>,

    /// Case-insensitive text to look for in questions and answers
    #[arg(long)]
    search: Option<String>,

    /// Keep questions carrying any of these tags
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Keep questions with any of these difficulties
    #[arg(long = "difficulty")]
    difficulties: Vec<String>,

    /// Print answers as well as questions
    #[arg(long)]
    answers: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = BrowseArgs::parse();

    logging::init(&args.log_level, false);

    let gateway = QuestionGateway::new(GatewayConfig::new(args.api_url.clone()))?;
    let catalog = CategoryCatalog::default();

    let Some(category) = args.category.as_deref() else {
        for entry in gateway.category_overview(&catalog).await? {
            let status = if entry.is_available() {
                format!("{} questions", entry.question_count)
            } else {
                "unavailable".to_string()
            };
            println!("{:<16} {:<24} {}", entry.slug, entry.display_name, status);
        }
        return Ok(());
    };

    let info = catalog.resolve(category);
    let mut view = CategoryView::new(info.clone());
    let questions: Arc<_> = gateway.questions(&info.store_name, false).await?;
    view.replace_questions(questions);

    if let Some(query) = &args.search {
        view.set_search_query(query.clone());
    }
    for tag in &args.tags {
        view.toggle_tag(tag);
    }
    for difficulty in &args.difficulties {
        view.toggle_difficulty(difficulty);
    }

    println!(
        "{} ({} of {} questions, {} filters)",
        info.display_name,
        view.filtered_len(),
        view.questions().len(),
        view.active_filter_count()
    );
    if !view.available_tags().is_empty() {
        println!("Tags: {}", view.available_tags().join(", "));
    }
    println!();

    for (question, _) in view.filtered() {
        println!("[{}] {}", question.difficulty, question.question);
        if !question.tags.is_empty() {
            println!("    tags: {}", question.tags.join(", "));
        }
        if args.answers {
            println!("    {}", question.answer);
        }
    }

    Ok(())
}
