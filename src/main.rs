use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

use movie_ratings::clean::clean;
use movie_ratings::genre::{GenreMatch, GenreMembership};
use movie_ratings::join::FactTable;
use movie_ratings::load::{load_movies, load_ratings};
use movie_ratings::models::PipelineStats;
use movie_ratings::progress::{create_spinner, format_duration, set_log_only};
use movie_ratings::report::{AnalysisReport, ReportOptions, DEFAULT_MIN_RATINGS};
use movie_ratings::safety::validate_output_paths;
use movie_ratings::year::ReleaseYears;

#[derive(Parser)]
#[command(name = "movie-ratings")]
#[command(about = "Descriptive statistics over a movies table and its ratings")]
struct Args {
    /// movies.csv (movieId,title,genres)
    movies: PathBuf,

    /// ratings.csv (userId,movieId,rating,timestamp)
    ratings: PathBuf,

    /// Minimum number of ratings a title needs to enter the highest-rated list
    #[arg(long, default_value_t = DEFAULT_MIN_RATINGS, allow_negative_numbers = true)]
    min_ratings: i64,

    /// Genre membership test: "token" (exact genre) or "substring" (raw field contains)
    #[arg(long, default_value = "token")]
    genre_match: GenreMatch,

    /// Write the full report as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write pipeline stats as JSON to this path
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Hide progress bars and print plain phase lines to stderr
    #[arg(long)]
    log_only: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    set_log_only(args.log_only);

    let outputs: Vec<&Path> = args
        .output
        .iter()
        .chain(args.stats.iter())
        .map(|p| p.as_path())
        .collect();
    validate_output_paths(&outputs, &[args.movies.as_path(), args.ratings.as_path()])?;

    let start = Instant::now();
    let mut stats = PipelineStats::default();

    let movies = load_movies(&args.movies)
        .with_context(|| format!("Failed to load movies from {:?}", args.movies))?;
    let ratings = load_ratings(&args.ratings)
        .with_context(|| format!("Failed to load ratings from {:?}", args.ratings))?;

    stats.movies_read = movies.rows.len();
    stats.ratings_read = ratings.rows.len();
    stats.malformed_lines_skipped = movies.malformed_lines + ratings.malformed_lines;

    let movies = clean(movies.rows);
    let ratings = clean(ratings.rows);
    stats.movies_dropped = stats.movies_read - movies.len();
    stats.ratings_dropped = stats.ratings_read - ratings.len();
    stats.log_phase("clean");

    let spinner = create_spinner("Phase 2: Joining ratings onto movies");
    let (table, summary) = FactTable::join_with_summary(&movies, &ratings);
    drop(ratings);
    stats.fact_rows = table.len();
    stats.movies_without_ratings = summary.movies_without_ratings;
    stats.orphan_ratings = summary.orphan_ratings;
    spinner.finish_with_message(format!("Phase 2: {} fact rows", table.len()));
    stats.log_phase("join");

    let spinner = create_spinner("Phase 3: Aggregating");
    let membership = GenreMembership::from_movies(&movies);
    let years = ReleaseYears::from_fact_table(&table);
    let options = ReportOptions {
        min_rating_num: args.min_ratings,
        genre_match: args.genre_match,
    };
    let mut report = AnalysisReport::build(&table, &membership, &years, &options, stats);
    report.stats.elapsed_seconds = start.elapsed().as_secs_f64();
    spinner.finish_with_message("Phase 3: Views computed");
    report.stats.log_phase("aggregate");

    print!("{}", report.render_summary());

    if let Some(ref output) = args.output {
        report
            .write_json(output)
            .with_context(|| format!("Failed to write report to {:?}", output))?;
        println!("\nReport written to {:?}", output);
    }
    if let Some(ref path) = args.stats {
        report
            .stats
            .write_to_file(path)
            .with_context(|| format!("Failed to write stats to {:?}", path))?;
    }

    println!("\n{:=<60}", "");
    println!("Analysis complete!");
    println!("  Fact rows: {}", report.stats.fact_rows);
    println!("  Titles: {}", report.stats.distinct_titles);
    println!("  Genres: {}", report.stats.distinct_genres);
    println!("  Rows with release year: {:.1}%", report.stats.year_coverage());
    println!("  Elapsed: {}", format_duration(start.elapsed()));
    println!("{:=<60}", "");

    Ok(())
}
