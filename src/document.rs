/// Document identifier, assigned sequentially from 1 in ingestion order
pub type DocId = u64;

/// Document represents one record of the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub url: String,
    pub body: Option<String>,
}

impl Document {
    pub fn new(id: DocId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Body text, absent bodies read as empty
    pub fn text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Document id = \"{}\", title = \"{}\", url = \"{}\", abstract = \"{}\">",
            self.id,
            self.title,
            self.url,
            self.text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_body_reads_empty() {
        let doc = Document::new(7, "Cat", "https://en.wikipedia.org/wiki/Cat");
        assert_eq!(doc.text(), "");

        let doc = doc.with_body("The cat is a small carnivorous mammal.");
        assert!(doc.to_string().contains("small carnivorous"));
    }
}
