mod db;
mod error;
mod extract;
mod models;
mod pipeline;
mod settings;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use error::IngestError;
use models::{Analysis, StoredAnalysis};
use pipeline::Pipeline;
use settings::Settings;

#[derive(Parser)]
#[command(name = "lecture_digest", about = "Turn lecture documents into summaries, keywords and exam notes")]
struct Cli {
    /// Settings file (default: ./lecture_digest.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze documents and store the results
    Ingest {
        /// .pdf or .txt files (pages separated by form feeds)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Analyze one document and print the result as JSON without storing it
    Analyze {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Show a stored analysis
    Show {
        id: String,
        /// Print the raw JSON record
        #[arg(long)]
        json: bool,
    },
    /// List stored analyses
    List,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    info!(db = %settings.db_path, keywords = settings.keyword_count, "settings loaded");
    let pipeline = Pipeline::new(&settings)?;

    let result = match cli.command {
        Commands::Ingest { files } => {
            let conn = db::connect(Path::new(&settings.db_path))?;
            db::init_schema(&conn)?;
            ingest_files(&conn, &pipeline, &files)
        }
        Commands::Analyze { file, pretty } => {
            let analysis = analyze_file(&pipeline, &file)?;
            let json = if pretty {
                serde_json::to_string_pretty(&analysis)?
            } else {
                serde_json::to_string(&analysis)?
            };
            println!("{}", json);
            Ok(())
        }
        Commands::Show { id, json } => {
            let conn = db::connect(Path::new(&settings.db_path))?;
            db::init_schema(&conn)?;
            let stored = db::get_analysis(&conn, &id)?
                .with_context(|| format!("Lecture not found: {}", id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stored)?);
            } else {
                print_analysis(&stored);
            }
            Ok(())
        }
        Commands::List => {
            let conn = db::connect(Path::new(&settings.db_path))?;
            db::init_schema(&conn)?;
            let rows = db::list_analyses(&conn)?;
            if rows.is_empty() {
                println!("No lectures stored. Run 'ingest' first.");
                return Ok(());
            }
            for r in &rows {
                println!("{}  {}", r.id, r.title);
            }
            println!("\n{} lectures", rows.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("Done in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn analyze_file(pipeline: &Pipeline, path: &Path) -> Result<Analysis, IngestError> {
    let pages = extract::extract_pages(path)?;
    let source_name = path.to_string_lossy();
    Ok(pipeline.analyze(&source_name, &pages))
}

/// Analyze files in parallel, then store each result in input order. One
/// failing file does not stop the others.
fn ingest_files(
    conn: &rusqlite::Connection,
    pipeline: &Pipeline,
    files: &[PathBuf],
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let results: Vec<_> = files
        .par_iter()
        .map(|path| (path, analyze_file(pipeline, path)))
        .collect();

    let mut failed = 0usize;
    for (path, result) in results {
        pb.set_message(path.display().to_string());
        let stored = result
            .map_err(anyhow::Error::from)
            .and_then(|analysis| {
                let id = db::save_analysis(conn, &analysis)
                    .with_context(|| format!("failed to store {}", path.display()))?;
                Ok((id, analysis.title))
            });
        match stored {
            Ok((id, title)) => {
                info!(%id, %title, "stored analysis");
                pb.println(format!("{}  {}", id, title));
            }
            Err(err) => {
                failed += 1;
                warn!(file = %path.display(), error = ?err, "ingest failed");
                pb.println(format!("error: {:#}", err));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if failed > 0 {
        anyhow::bail!("{} of {} documents failed to ingest", failed, files.len());
    }
    Ok(())
}

fn print_analysis(stored: &StoredAnalysis) {
    let a = &stored.analysis;
    println!("{}", a.title);
    println!("{}", "=".repeat(a.title.chars().count().max(3)));
    println!("id: {}  ingested: {}\n", stored.id, stored.ingested_at.format("%Y-%m-%d %H:%M"));
    println!("{}", a.summary.trim_end());

    if !a.keywords.is_empty() {
        println!("\nKeywords: {}", a.keywords.join(", "));
    }

    for page in &a.notes {
        println!("\n--- Page {} ---", page.page_number);
        let mut current: Option<&str> = None;
        for point in &page.points {
            if current != Some(point.heading.as_str()) {
                println!("  [{}]", point.heading);
                current = Some(point.heading.as_str());
            }
            println!("    {}", point.point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(
            &path,
            "Gradient Descent\nGradient descent updates the weights using gradients.\n- learning rate controls step size",
        )
        .unwrap();
        path
    }

    #[test]
    fn failed_file_does_not_stop_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![dir.path().join("missing.txt"), lecture(dir.path(), "good.txt")];
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        let pipeline = Pipeline::new(&Settings::default()).unwrap();

        let err = ingest_files(&conn, &pipeline, &files).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 documents failed to ingest");
        assert_eq!(db::list_analyses(&conn).unwrap().len(), 1);
    }

    #[test]
    fn store_errors_count_as_failed_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![lecture(dir.path(), "a.txt"), lecture(dir.path(), "b.txt")];
        // No schema, so every insert fails.
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let pipeline = Pipeline::new(&Settings::default()).unwrap();

        let err = ingest_files(&conn, &pipeline, &files).unwrap_err();
        assert_eq!(err.to_string(), "2 of 2 documents failed to ingest");
    }
}
