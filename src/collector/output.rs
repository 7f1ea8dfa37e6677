//! Destinations for serialized documents.

use log::info;
use std::borrow::Cow;
use std::io::Write;

use crate::utils::error::CollectError;

/// What a document describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Aggregate,
    Trace,
    GaugeValues,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Aggregate => "aggregate",
            DocumentKind::Trace => "trace",
            DocumentKind::GaugeValues => "gauge values",
        }
    }
}

/// One serialized JSON document
#[derive(Debug, Clone)]
pub struct Document {
    pub kind: DocumentKind,
    pub body: Vec<u8>,
}

impl Document {
    /// The body as text. Bodies come out of the JSON sink and are valid
    /// UTF-8.
    pub fn body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Receives each document the collector produces.
pub trait DocumentOutput {
    fn document(&mut self, document: Document) -> Result<(), CollectError>;
}

/// Writes every document to the log, useful as a diagnostic destination.
#[derive(Debug, Default)]
pub struct LogOutput;

impl DocumentOutput for LogOutput {
    fn document(&mut self, document: Document) -> Result<(), CollectError> {
        info!("{}: {}", document.kind.as_str(), document.body_str());
        Ok(())
    }
}

/// Writes one compact document per line.
pub struct NdjsonOutput<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DocumentOutput for NdjsonOutput<W> {
    fn document(&mut self, document: Document) -> Result<(), CollectError> {
        self.writer
            .write_all(&document.body)
            .map_err(CollectError::Output)?;
        self.writer.write_all(b"\n").map_err(CollectError::Output)?;
        Ok(())
    }
}

/// Keeps documents in memory, for the JSON array export mode and for tests.
#[derive(Debug, Default)]
pub struct BufferedOutput {
    documents: Vec<Document>,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }
}

impl DocumentOutput for BufferedOutput {
    fn document(&mut self, document: Document) -> Result<(), CollectError> {
        self.documents.push(document);
        Ok(())
    }
}
