use crate::config::Config;
use crate::corpus::FileCorpus;
use crate::engine::SearchEngine;
use crate::error::SearchError;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub const INTRO: &str = "Full text search. Type help or ? to list commands.";
pub const PROMPT: &str = ">> ";

const COMMANDS: &[(&str, &str)] = &[
    ("data", "Show all text data"),
    ("load", "Load data for search: load <name>"),
    ("index", "Index loaded data"),
    ("search", "Search for keywords: search <text>"),
    ("stats", "Show index statistics: stats [--json]"),
    ("help", "List commands, or describe one: help <command>"),
    ("EOF", "Return from this shell"),
];

enum State {
    Empty,
    Loaded { name: String, path: PathBuf },
    Indexed { name: String },
}

/// Line-oriented command shell over one [`SearchEngine`] session
pub struct Shell {
    config: Config,
    engine: SearchEngine,
    state: State,
}

impl Shell {
    pub fn new(config: Config, engine: SearchEngine) -> Self {
        Self {
            config,
            engine,
            state: State::Empty,
        }
    }

    /// Read commands until `EOF`/`quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        writeln!(output, "wikifts {}. {}", crate::VERSION, INTRO)?;

        let mut lines = input.lines();
        loop {
            write!(output, "{}", PROMPT)?;
            output.flush()?;

            let line = match lines.next() {
                Some(line) => line.context("Failed to read command")?,
                None => {
                    writeln!(output, "\nGood bye!")?;
                    return Ok(());
                }
            };

            if !self.execute(line.trim(), &mut output)? {
                return Ok(());
            }
        }
    }

    /// Run one command line. Returns `false` when the shell should exit.
    pub fn execute<W: Write>(&mut self, line: &str, output: &mut W) -> Result<bool> {
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "data" => self.do_data(output)?,
            "load" => self.do_load(arg, output)?,
            "index" => self.do_index(output)?,
            "search" => self.do_search(arg, output)?,
            "stats" => self.do_stats(arg, output)?,
            "help" | "?" => self.do_help(arg, output)?,
            "EOF" | "quit" | "exit" => {
                writeln!(output, "\nGood bye!")?;
                return Ok(false);
            }
            _ => writeln!(output, "*** Unknown syntax: {}", line)?,
        }
        Ok(true)
    }

    fn print_datasets<W: Write>(&self, output: &mut W) -> Result<()> {
        for (name, path) in &self.config.datasets {
            writeln!(output, "{}\t{}", name, path.display())?;
        }
        Ok(())
    }

    fn do_data<W: Write>(&self, output: &mut W) -> Result<()> {
        self.print_datasets(output)
    }

    fn do_load<W: Write>(&mut self, name: &str, output: &mut W) -> Result<()> {
        let Some(path) = self.config.dataset(name) else {
            writeln!(output, "Data does not exist! Please choose below dataset")?;
            return self.print_datasets(output);
        };

        writeln!(output, "Loading data [{}] ...", path.display())?;
        self.state = State::Loaded {
            name: name.to_string(),
            path: path.to_path_buf(),
        };
        Ok(())
    }

    fn do_index<W: Write>(&mut self, output: &mut W) -> Result<()> {
        let (name, path) = match &self.state {
            State::Loaded { name, path } => (name.clone(), path.clone()),
            State::Indexed { name } => match self.config.dataset(name) {
                Some(path) => (name.clone(), path.to_path_buf()),
                None => return Ok(()),
            },
            State::Empty => {
                writeln!(
                    output,
                    "Data needed to be loaded before indexing. [help load] for more detail"
                )?;
                return Ok(());
            }
        };

        let indexed = FileCorpus::open(&path)
            .and_then(|corpus| self.engine.try_index_documents(corpus))
            .with_context(|| format!("Failed to index {}", path.display()));

        match indexed {
            Ok(report) => {
                writeln!(
                    output,
                    "Indexed {} documents in {:?}",
                    report.documents, report.elapsed
                )?;
                self.state = State::Indexed { name };
            }
            Err(err) => writeln!(output, "{:#}", err)?,
        }
        Ok(())
    }

    fn do_search<W: Write>(&self, text: &str, output: &mut W) -> Result<()> {
        let State::Indexed { name } = &self.state else {
            writeln!(
                output,
                "Data needed to be loaded and indexed before searching. [help load] for more detail"
            )?;
            return Ok(());
        };

        writeln!(output, "Searching for: {} in {}", text, name)?;
        match self.engine.search(text) {
            Ok(documents) => {
                writeln!(output, "====== Found {} documents ======", documents.len())?;
                for doc in documents {
                    writeln!(output, "{}", doc)?;
                }
            }
            Err(SearchError::EmptyQuery { reason }) => {
                writeln!(output, "====== Found 0 documents ({}) ======", reason)?;
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }

    fn do_stats<W: Write>(&self, arg: &str, output: &mut W) -> Result<()> {
        let stats = self.engine.stats();
        if arg == "--json" {
            let json = serde_json::to_string(&stats).context("Failed to encode stats")?;
            writeln!(output, "{}", json)?;
            return Ok(());
        }

        writeln!(output, "documents: {}", self.engine.document_count())?;
        writeln!(output, "tokens: {}", stats.total_tokens)?;
        writeln!(output, "postings: {}", stats.total_postings)?;
        writeln!(output, "avg docs per token: {:.2}", stats.avg_docs_per_token)?;
        Ok(())
    }

    fn do_help<W: Write>(&self, topic: &str, output: &mut W) -> Result<()> {
        if topic.is_empty() {
            writeln!(output, "Documented commands (type help <topic>):")?;
            for (command, _) in COMMANDS {
                write!(output, "{} ", command)?;
            }
            writeln!(output)?;
            return Ok(());
        }

        match COMMANDS.iter().find(|(command, _)| *command == topic) {
            Some((_, doc)) => writeln!(output, "{}", doc)?,
            None => writeln!(output, "*** No help on {}", topic)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    const DUMP: &str = "<feed>\
        <doc><title>Wikipedia: Cat</title><url>u1</url><abstract>The small wild cat</abstract></doc>\
        <doc><title>Wikipedia: Dog</title><url>u2</url><abstract>A loyal dog</abstract></doc>\
        </feed>";

    fn shell_with_dump() -> (Shell, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("animals.xml");
        std::fs::write(&path, DUMP).unwrap();

        let mut config = Config::default();
        config.datasets.insert("animals".to_string(), path);
        (Shell::new(config, SearchEngine::new(Tokenizer::default())), dir)
    }

    fn run(shell: &mut Shell, script: &str) -> String {
        let mut output = Vec::new();
        shell.run(script.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_full_session() {
        let (mut shell, _dir) = shell_with_dump();
        let output = run(&mut shell, "load animals\nindex\nsearch wild cats\nEOF\n");

        assert!(output.contains("Indexed 2 documents"));
        assert!(output.contains("====== Found 1 documents ======"));
        assert!(output.contains("Wikipedia: Cat"));
        assert!(!output.contains("Wikipedia: Dog"));
        assert!(output.ends_with("Good bye!\n"));
    }

    #[test]
    fn test_intro_and_stats() {
        let (mut shell, _dir) = shell_with_dump();
        let output = run(&mut shell, "load animals\nindex\nstats\nstats --json\n");

        assert!(output.starts_with(&format!("wikifts {}.", crate::VERSION)));
        assert!(output.contains("documents: 2"));

        let json = output
            .lines()
            .find_map(|line| line.strip_prefix(PROMPT).filter(|l| l.starts_with('{')))
            .unwrap();
        let stats: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(stats["total_tokens"], 5);
        assert_eq!(stats["total_postings"], 5);
    }

    #[test]
    fn test_search_before_index() {
        let (mut shell, _dir) = shell_with_dump();
        let output = run(&mut shell, "search cat\n");
        assert!(output.contains("Data needed to be loaded and indexed before searching"));
    }

    #[test]
    fn test_unknown_dataset() {
        let (mut shell, _dir) = shell_with_dump();
        let output = run(&mut shell, "load nothing\n");
        assert!(output.contains("Data does not exist!"));
        assert!(output.contains("wikipedia"));
    }

    #[test]
    fn test_empty_query_message() {
        let (mut shell, _dir) = shell_with_dump();
        let output = run(&mut shell, "load animals\nindex\nsearch the\nsearch elephant\n");
        assert!(output.contains("query contains no searchable terms"));
        assert!(output.contains("no query term is present in the index"));
    }

    #[test]
    fn test_missing_corpus_file_is_reported() {
        let mut config = Config::default();
        config
            .datasets
            .insert("gone".to_string(), PathBuf::from("/nonexistent/gone.xml.gz"));
        let mut shell = Shell::new(config, SearchEngine::new(Tokenizer::default()));

        let output = run(&mut shell, "load gone\nindex\n");
        assert!(output.contains("Failed to index /nonexistent/gone.xml.gz"));
    }

    #[test]
    fn test_help_and_empty_line() {
        let (mut shell, _dir) = shell_with_dump();
        let output = run(&mut shell, "\nhelp\nhelp load\nfrobnicate\n");
        assert!(output.contains("Documented commands"));
        assert!(output.contains("Load data for search"));
        assert!(output.contains("*** Unknown syntax: frobnicate"));
    }
}
