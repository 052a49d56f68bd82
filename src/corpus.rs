use crate::document::{DocId, Document};
use crate::error::Result;
use flate2::read::GzDecoder;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Corpus backed by a (possibly gzipped) file
pub type FileCorpus = Corpus<BufReader<Box<dyn Read>>>;

#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Url,
    Abstract,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"title" => Some(Self::Title),
            b"url" => Some(Self::Url),
            b"abstract" => Some(Self::Abstract),
            _ => None,
        }
    }

    fn append(self, doc: &mut Document, text: &str) {
        match self {
            Self::Title => doc.title.push_str(text),
            Self::Url => doc.url.push_str(text),
            Self::Abstract => doc.body.get_or_insert_with(String::new).push_str(text),
        }
    }
}

/// Lazy reader over a Wikipedia abstract dump.
///
/// Yields one [`Document`] per `<doc>` element, numbering them 1, 2, 3...
/// in file order. `<title>`, `<url>` and `<abstract>` fill the record; a
/// missing or empty abstract leaves `body` as `None`.
pub struct Corpus<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    last_id: DocId,
    done: bool,
}

impl FileCorpus {
    /// Open a `.xml.gz` or plain `.xml` dump
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let input: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        tracing::info!("Loading documents from {}", path.display());
        Ok(Self::from_reader(BufReader::new(input)))
    }
}

impl<R: BufRead> Corpus<R> {
    pub fn from_reader(input: R) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            last_id: 0,
            done: false,
        }
    }

    fn read_document(&mut self) -> Result<Option<Document>> {
        let mut current: Option<Document> = None;
        let mut field: Option<Field> = None;

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"doc" => {
                        self.last_id += 1;
                        current = Some(Document::new(self.last_id, "", ""));
                    }
                    tag => field = Field::from_tag(tag),
                },
                Event::Text(t) => {
                    if let (Some(doc), Some(field)) = (current.as_mut(), field) {
                        field.append(doc, &t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let (Some(doc), Some(field)) = (current.as_mut(), field) {
                        field.append(doc, &String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::End(e) => {
                    if e.name().as_ref() == b"doc" {
                        if let Some(doc) = current.take() {
                            return Ok(Some(doc));
                        }
                    }
                    field = None;
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for Corpus<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_document() {
            Ok(Some(doc)) => Some(Ok(doc)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
