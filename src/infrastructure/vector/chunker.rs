//! Paragraph-aligned text chunking
//!
//! Splits text on blank lines and packs whole paragraphs into chunks of
//! roughly `target_size` characters. Paragraphs are never split: a paragraph
//! longer than the target becomes its own oversized chunk.

use std::str::Split;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Chunk, ChunkingConfig, Document};

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Lazy iterator over the chunks of one text
///
/// Cloning the iterator restarts nothing; it forks the current position.
/// Build a new one with [`ParagraphChunks::new`] to start over.
#[derive(Debug, Clone)]
pub struct ParagraphChunks<'a> {
    paragraphs: Split<'a, &'static str>,
    target_size: usize,
    overlap: bool,
    buffer: Vec<&'a str>,
    buffer_size: usize,
}

impl<'a> ParagraphChunks<'a> {
    /// Iterate the chunks of `text` for the given size and overlap
    pub fn new(text: &'a str, target_size: usize, overlap: usize) -> Self {
        Self {
            paragraphs: text.split(PARAGRAPH_SEPARATOR),
            target_size,
            overlap: overlap > 0,
            buffer: Vec::new(),
            buffer_size: 0,
        }
    }

    /// Next non-blank paragraph, with surrounding line breaks removed
    fn next_paragraph(&mut self) -> Option<&'a str> {
        self.paragraphs
            .by_ref()
            .map(|p| p.trim_matches(|c| c == '\n' || c == '\r'))
            .find(|p| !p.trim().is_empty())
    }

    fn push(&mut self, paragraph: &'a str) {
        self.buffer_size += paragraph.chars().count();
        self.buffer.push(paragraph);
    }

    /// Close the buffered chunk and reseed the buffer per the overlap policy
    fn close(&mut self) -> String {
        let chunk = self.buffer.join(PARAGRAPH_SEPARATOR);
        let carried = if self.overlap { self.buffer.last().copied() } else { None };

        self.buffer.clear();
        self.buffer_size = 0;
        if let Some(paragraph) = carried {
            self.push(paragraph);
        }
        chunk
    }
}

impl Iterator for ParagraphChunks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(paragraph) = self.next_paragraph() {
            let size = paragraph.chars().count();

            if !self.buffer.is_empty() && self.buffer_size + size > self.target_size {
                let chunk = self.close();
                self.push(paragraph);
                return Some(chunk);
            }

            self.push(paragraph);
        }

        if self.buffer.is_empty() {
            return None;
        }

        // Final flush; nothing is carried past the end of the text.
        let chunk = self.buffer.join(PARAGRAPH_SEPARATOR);
        self.buffer.clear();
        self.buffer_size = 0;
        Some(chunk)
    }
}

/// Split `text` into paragraph-aligned chunks
///
/// Pure and deterministic. Empty or whitespace-only input yields no chunks.
pub fn chunk_text(text: &str, target_size: usize, overlap: usize) -> Vec<String> {
    ParagraphChunks::new(text, target_size, overlap).collect()
}

/// Chunker bound to a validated configuration
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a chunker with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chunker with a custom configuration
    pub fn with_config(config: ChunkingConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Lazily split raw text
    pub fn split<'a>(&self, text: &'a str) -> ParagraphChunks<'a> {
        ParagraphChunks::new(text, self.config.target_size, self.config.overlap)
    }

    /// Chunk a document, assigning ids `{document_id}_{index}`
    pub fn chunk_document(&self, document: &Document) -> Vec<Chunk> {
        self.split(&document.text)
            .enumerate()
            .map(|(index, text)| Chunk::new(&document.id, &document.source, text, index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::Stage;

    fn paragraphs_of(chunk: &str) -> Vec<&str> {
        chunk.split(PARAGRAPH_SEPARATOR).collect()
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk_text("", 500, 50).is_empty());
        assert!(chunk_text("\n\n\n\n  \n\n", 500, 50).is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_text("Hello world.", 500, 50);
        assert_eq!(chunks, vec!["Hello world.".to_string()]);
    }

    #[test]
    fn test_paragraphs_packed_until_target() {
        // 5 + 5 = 10 fits in 12; the third paragraph closes the chunk.
        let chunks = chunk_text("Para1\n\nPara2\n\nPara3", 12, 0);
        assert_eq!(chunks, vec!["Para1\n\nPara2", "Para3"]);
    }

    #[test]
    fn test_overlap_carries_last_paragraph() {
        let chunks = chunk_text("Para1\n\nPara2\n\nPara3", 6, 1);
        assert_eq!(chunks, vec!["Para1", "Para1\n\nPara2", "Para2\n\nPara3"]);
    }

    #[test]
    fn test_zero_overlap_starts_empty() {
        let chunks = chunk_text("Para1\n\nPara2\n\nPara3", 6, 0);
        assert_eq!(chunks, vec!["Para1", "Para2", "Para3"]);
    }

    #[test]
    fn test_oversized_paragraph_is_its_own_chunk() {
        let long = "x".repeat(40);
        let text = format!("short\n\n{long}\n\ntail");
        let chunks = chunk_text(&text, 10, 0);

        assert_eq!(chunks, vec!["short".to_string(), long, "tail".to_string()]);
    }

    #[test]
    fn test_leading_oversized_paragraph_emits_no_empty_chunk() {
        let long = "y".repeat(30);
        let chunks = chunk_text(&long, 10, 5);
        assert_eq!(chunks, vec![long]);
    }

    #[test]
    fn test_extra_blank_lines_are_normalized() {
        let chunks = chunk_text("alpha\n\n\n\nbeta\n\n\ngamma\n", 100, 0);
        assert_eq!(chunks, vec!["alpha\n\nbeta\n\ngamma"]);
    }

    #[test]
    fn test_size_counts_characters_not_bytes() {
        // Four 3-byte characters per paragraph: 8 chars fit in 8.
        let chunks = chunk_text("ああああ\n\nいいいい", 8, 0);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_iterator_is_lazy_and_resumable() {
        let mut chunks = ParagraphChunks::new("a\n\nb\n\nc", 1, 0);
        assert_eq!(chunks.next().as_deref(), Some("a"));

        let fork = chunks.clone();
        assert_eq!(chunks.collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(fork.collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_chunker_rejects_zero_target() {
        let err = Chunker::with_config(ChunkingConfig {
            target_size: 0,
            overlap: 0,
        })
        .unwrap_err();
        assert_eq!(err.stage(), Stage::Chunk);
    }

    #[test]
    fn test_chunk_document_assigns_sequential_ids() {
        let chunker = Chunker::with_config(ChunkingConfig {
            target_size: 6,
            overlap: 1,
        })
        .unwrap();
        let doc = Document::new("A", "Para1\n\nPara2\n\nPara3");
        let chunks = chunker.chunk_document(&doc);

        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A_0", "A_1", "A_2"]);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence_index, i);
            assert_eq!(chunk.source_document_id, "A");
        }
    }

    #[test]
    fn test_overlap_boundaries_match() {
        let text = (0..12)
            .map(|i| format!("Paragraph number {i} with some words."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = chunk_text(&text, 80, 10);

        assert!(chunks.len() >= 2);
        for pair in chunks.windows(2) {
            let prev = paragraphs_of(&pair[0]);
            let next = paragraphs_of(&pair[1]);
            assert_eq!(prev.last(), next.first());
        }
    }
}
