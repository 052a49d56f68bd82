use crate::error::Result;
use crate::stopwords::StopWords;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATASET: &str = "wikipedia";
pub const DEFAULT_DATASET_PATH: &str = "enwiki-latest-abstract1.xml.gz";
pub const DEFAULT_STOPWORDS_PATH: &str = "stopwords.txt";

/// File-based configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// One-word-per-line stopword file. When unset, `stopwords.txt` in the
    /// working directory is used if present, else the built-in English list.
    pub stopwords: Option<PathBuf>,
    /// Dataset name -> corpus dump path
    pub datasets: BTreeMap<String, PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stopwords: None,
            datasets: BTreeMap::from([(
                DEFAULT_DATASET.to_string(),
                PathBuf::from(DEFAULT_DATASET_PATH),
            )]),
        }
    }
}

impl Config {
    /// Load a JSON configuration file. Fields it leaves out keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn dataset(&self, name: &str) -> Option<&Path> {
        self.datasets.get(name).map(PathBuf::as_path)
    }

    pub fn load_stopwords(&self) -> Result<StopWords> {
        self.load_stopwords_or(Path::new(DEFAULT_STOPWORDS_PATH))
    }

    fn load_stopwords_or(&self, fallback: &Path) -> Result<StopWords> {
        match &self.stopwords {
            Some(path) => StopWords::from_file(path),
            None if fallback.is_file() => StopWords::from_file(fallback),
            None => Ok(StopWords::english()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_dataset() {
        let config = Config::default();
        assert_eq!(
            config.dataset("wikipedia"),
            Some(Path::new(DEFAULT_DATASET_PATH))
        );
        assert!(config.load_stopwords().unwrap().contains("the"));
    }

    #[test]
    fn test_stopwords_fallback_file() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join(DEFAULT_STOPWORDS_PATH);
        let config = Config::default();

        let builtin = config.load_stopwords_or(&fallback).unwrap();
        assert_eq!(builtin.len(), StopWords::english().len());

        std::fs::write(&fallback, "zebra\n").unwrap();
        let stopwords = config.load_stopwords_or(&fallback).unwrap();
        assert_eq!(stopwords.len(), 1);
        assert!(stopwords.contains("zebra"));
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(r#"{"stopwords": "stop.txt"}"#).unwrap();
        assert_eq!(config.stopwords, Some(PathBuf::from("stop.txt")));
        assert!(config.dataset("wikipedia").is_some());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let stopwords = dir.path().join("stopwords.txt");
        std::fs::write(&stopwords, "the\nof\n").unwrap();

        let path = dir.path().join("wikifts.json");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"{{"stopwords": {:?}, "datasets": {{"small": "small.xml"}}}}"#,
            stopwords.to_str().unwrap()
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.dataset("small"), Some(Path::new("small.xml")));
        assert!(config.dataset("wikipedia").is_none());
        assert_eq!(config.load_stopwords().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_json() {
        assert!(Config::from_json("{not json").is_err());
    }
}
