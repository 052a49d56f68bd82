use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wikifts::{Config, FileCorpus, MatchMode, SearchEngine, SearchError, Shell, Tokenizer};

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Full-text search over Wikipedia abstracts", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stopword file, one word per line
    #[arg(short, long)]
    stopwords: Option<PathBuf>,

    /// Extra dataset, as name=path (repeatable)
    #[arg(short, long = "dataset", value_parser = parse_dataset)]
    datasets: Vec<(String, PathBuf)>,

    /// Run a single query against this dataset and exit instead of starting the shell
    #[arg(short, long)]
    query: Option<String>,

    /// Dataset used with --query
    #[arg(short, long, default_value = wikifts::config::DEFAULT_DATASET)]
    load: String,

    /// Query terms missing from the index match nothing instead of being skipped
    #[arg(long)]
    strict: bool,
}

fn parse_dataset(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected name=path, got '{}'", value)),
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(stopwords) = &args.stopwords {
        config.stopwords = Some(stopwords.clone());
    }
    config.datasets.extend(args.datasets.iter().cloned());
    Ok(config)
}

fn run_query(config: &Config, mut engine: SearchEngine, dataset: &str, query: &str) -> Result<()> {
    let path = config
        .dataset(dataset)
        .ok_or_else(|| anyhow!("Unknown dataset '{}'", dataset))?;

    let corpus = FileCorpus::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let report = engine
        .try_index_documents(corpus)
        .with_context(|| format!("Failed to index {}", path.display()))?;
    println!("Indexed {} documents in {:?}", report.documents, report.elapsed);

    println!();
    println!("Searching for: \"{}\"", query);
    println!();

    match engine.search(query) {
        Ok(documents) => {
            println!("====== Found {} documents ======", documents.len());
            for doc in documents {
                println!("{}\t{}", doc.id, doc.text());
            }
        }
        Err(SearchError::EmptyQuery { reason }) => {
            println!("====== Found 0 documents ({}) ======", reason);
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let stopwords = config.load_stopwords()?;
    tracing::debug!("Using {} stopwords", stopwords.len());

    let mode = if args.strict {
        MatchMode::Strict
    } else {
        MatchMode::Lenient
    };
    let engine = SearchEngine::new(Tokenizer::new(stopwords)).with_mode(mode);

    if let Some(query) = &args.query {
        return run_query(&config, engine, &args.load, query);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(config, engine);
    shell.run(stdin.lock(), stdout.lock())?;
    io::stdout().flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset() {
        assert_eq!(
            parse_dataset("small=data/small.xml").unwrap(),
            ("small".to_string(), PathBuf::from("data/small.xml"))
        );

        for bad in ["=x", "x=", "x", ""] {
            assert!(parse_dataset(bad).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "wikifts",
            "--stopwords",
            "my-stopwords.txt",
            "--dataset",
            "small=small.xml",
            "-d",
            "wikipedia=local.xml.gz",
        ]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.stopwords, Some(PathBuf::from("my-stopwords.txt")));
        assert_eq!(config.dataset("small"), Some(std::path::Path::new("small.xml")));
        assert_eq!(
            config.dataset("wikipedia"),
            Some(std::path::Path::new("local.xml.gz"))
        );
    }
}
