use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::DataIndex;
use factor_model::{RatingPredictor, SvdModel};
use neighbors::{DEFAULT_NEIGHBORS_PER_ITEM, UserUniverse};
use recommender::config::DEFAULT_TOP_N;
use recommender::{RecommendationList, Recommender, RecommenderConfig, SelectionPolicy};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// Movie recommendations from three favourite titles
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Collaborative-filtering movie recommender", long_about = None)]
struct Cli {
    /// Directory holding movies.csv and ratings.csv
    #[arg(short, long, default_value = "resources/data")]
    data_dir: PathBuf,

    /// Trained SVD model (JSON)
    #[arg(short, long, default_value = "resources/models/svd.json")]
    model: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies from up to three favourites
    Recommend {
        /// Exact catalog title; repeat for each favourite
        #[arg(long = "favorite", required = true)]
        favorites: Vec<String>,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,

        /// Neighbor users kept per favourite
        #[arg(long, default_value_t = DEFAULT_NEIGHBORS_PER_ITEM)]
        neighbors: usize,

        /// Only consider users from the first N rating records
        #[arg(long, conflicts_with = "full_universe")]
        universe_prefix: Option<usize>,

        /// Consider every user in the rating store
        #[arg(long)]
        full_universe: bool,

        /// Truncate before removing duplicate titles (may return fewer)
        #[arg(long)]
        legacy_truncation: bool,

        /// Show predicted ratings and catalog statistics
        #[arg(long)]
        explain: bool,
    },

    /// Search for exact catalog titles
    Search {
        /// Case-insensitive substring
        #[arg(long)]
        title: String,
    },

    /// Show what the loaded model knows
    Model,

    /// Measure recommendation latency with random favourites
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "50")]
        requests: usize,

        /// Requests in flight at once
        #[arg(long, default_value = "4")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_files(&cli.data_dir).context("Failed to load MovieLens dataset")?,
    );
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    match cli.command {
        Commands::Search { title } => handle_search(&data_index, &title),
        Commands::Recommend {
            favorites,
            top_n,
            neighbors,
            universe_prefix,
            full_universe,
            legacy_truncation,
            explain,
        } => {
            let model = load_model(&cli.model)?;
            let universe = match (full_universe, universe_prefix) {
                (true, _) => UserUniverse::Full,
                (false, Some(n)) => UserUniverse::Prefix(n),
                (false, None) => UserUniverse::default(),
            };
            let selection = if legacy_truncation {
                SelectionPolicy::TruncateThenDedup
            } else {
                SelectionPolicy::DedupThenTruncate
            };
            let config = RecommenderConfig::default()
                .with_universe(universe)
                .with_neighbors_per_item(neighbors)
                .with_selection(selection);
            let recommender = Recommender::new(data_index, model, config);
            handle_recommend(&recommender, &favorites, top_n, explain)
        }
        Commands::Model => {
            let model = load_model(&cli.model)?;
            handle_model(&data_index, &model)
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => {
            let model = load_model(&cli.model)?;
            let recommender = Recommender::new(data_index, model, RecommenderConfig::default());
            handle_benchmark(Arc::new(recommender), requests, concurrent).await
        }
    }
}

fn load_model(path: &Path) -> Result<Arc<SvdModel>> {
    let start = Instant::now();
    let model = SvdModel::load(path)
        .with_context(|| format!("Failed to load model from {}", path.display()))?;
    println!("{} Loaded model in {:?}", "✓".green(), start.elapsed());
    Ok(Arc::new(model))
}

/// Handle the 'recommend' command
fn handle_recommend(
    recommender: &Recommender,
    favorites: &[String],
    top_n: usize,
    explain: bool,
) -> Result<()> {
    let list = match recommender.recommend(favorites, top_n) {
        Ok(list) => list,
        Err(e) => {
            eprintln!(
                "{}",
                "Oops! Looks like this algorithm doesn't work. We'll need to fix it!".red()
            );
            return Err(e).context("Recommendation failed");
        }
    };

    for title in &list.unresolved {
        println!("{} {:?} is not in the catalog, skipped", "!".yellow(), title);
    }

    if list.is_empty() {
        if list.resolved.is_empty() {
            println!("None of your favourites matched a catalog title. Try the 'search' command.");
        } else {
            println!("No recommendations qualified for these favourites.");
        }
        return Ok(());
    }

    print_recommendations(recommender.data_index(), &list, explain);
    Ok(())
}

fn print_recommendations(data_index: &DataIndex, list: &RecommendationList, explain: bool) {
    println!("{}", "We think you'll like:".bold().blue());
    for (i, rec) in list.recommendations.iter().enumerate() {
        println!("{}. {}", (i + 1).to_string().green(), rec.title);
        if explain {
            let stats = data_index.get_movie_stats(rec.movie_id);
            println!(
                "   predicted {:.2} | movie {} | avg {:.2} over {} ratings",
                rec.predicted_rating,
                rec.movie_id,
                stats.map(|s| s.avg_rating).unwrap_or(0.0),
                stats.map(|s| s.rating_count).unwrap_or(0)
            );
        }
    }
    if explain {
        println!(
            "   ({} neighbor picks for movies {:?})",
            list.neighbor_count, list.resolved
        );
    }
}

/// Handle the 'search' command
fn handle_search(data_index: &DataIndex, title: &str) -> Result<()> {
    let matches = data_index.search_titles(title);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("No titles found.");
    }
    for movie in matches.iter().take(20) {
        let stats = data_index.get_movie_stats(movie.id);
        println!(
            "{}: {} [{}] avg {:.2} ({} ratings)",
            movie.id,
            movie.title,
            movie.genres.join(", "),
            stats.map(|s| s.avg_rating).unwrap_or(0.0),
            stats.map(|s| s.rating_count).unwrap_or(0)
        );
    }
    if matches.len() > 20 {
        println!("... and {} more", matches.len() - 20);
    }
    Ok(())
}

/// Handle the 'model' command
fn handle_model(data_index: &DataIndex, model: &SvdModel) -> Result<()> {
    let params = model.parameters();
    let catalog_known = data_index
        .movies()
        .iter()
        .filter(|m| model.knows_item(m.id))
        .count();
    let universe = UserUniverse::default().users(data_index);
    let universe_known = universe.iter().filter(|&&u| model.knows_user(u)).count();

    println!("{}", "SVD model".bold().blue());
    println!("{}Factors: {}", "• ".green(), model.n_factors());
    println!("{}Global mean: {:.3}", "• ".green(), params.global_mean);
    println!(
        "{}Rating scale: {} - {}",
        "• ".green(),
        params.rating_scale.min,
        params.rating_scale.max
    );
    println!("{}Known users: {}", "• ".cyan(), model.known_users().len());
    println!(
        "{}Known items: {} ({} of {} catalog movies)",
        "• ".cyan(),
        model.item_count(),
        catalog_known,
        data_index.movies().len()
    );
    println!(
        "{}Default neighbor universe: {} users ({} known to the model)",
        "• ".cyan(),
        universe.len(),
        universe_known
    );
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    recommender: Arc<Recommender>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("requests and concurrent must both be positive");
    }
    let titles: Vec<String> = recommender
        .data_index()
        .unique_titles()
        .map(|(title, _)| title.to_string())
        .collect();
    if titles.is_empty() {
        bail!("Catalog is empty");
    }

    let semaphore = Arc::new(Semaphore::new(concurrent));
    let mut handles = Vec::with_capacity(requests);
    let wall_clock = Instant::now();

    for _ in 0..requests {
        let favorites: Vec<String> = (0..3)
            .map(|_| titles[rand::random_range(0..titles.len())].clone())
            .collect();
        let recommender = recommender.clone();
        let permit = semaphore.clone().acquire_owned().await?;

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let start = Instant::now();
            recommender.recommend(&favorites, DEFAULT_TOP_N)?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await.context("Benchmark task panicked")??);
    }
    let total_time = wall_clock.elapsed();
    info!("Completed {} benchmark requests", timings.len());

    timings.sort();
    let busy: Duration = timings.iter().sum();
    let avg_latency = busy / timings.len() as u32;
    let percentile = |p: f32| timings[((timings.len() - 1) as f32 * p) as usize];

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} requests/second",
        requests as f64 / total_time.as_secs_f64()
    );
    Ok(())
}
