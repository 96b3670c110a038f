//! Text chunking for the processor module
//!
//! Splits each text record into UTF-8-safe character windows of at most
//! `chunk_size` characters, with `chunk_overlap` characters shared between
//! consecutive windows of the same record. Splitting never drops content:
//! concatenating a record's windows with the overlaps removed reproduces
//! the record text exactly.

use tracing::{debug, instrument};

use crate::crawler::PageText;
use crate::processor::config::ChunkOptions;
use crate::processor::{Chunk, ChunkMetadata};

/// Text of the synthetic record that points readers at the external links
pub const FURTHER_READING_TEXT: &str = "If you'd like to explore more about this topic or learn further details about our company, you can visit the following links. They provide additional insights and trusted resources that may help answer your query more comprehensively.";

/// Chunk the crawler's text records
///
/// Appends one synthetic record whose url is the semicolon-joined external
/// link list, then windows every record. An empty record list, or one where
/// every record's text is empty, yields an empty chunk list; the caller
/// treats that as an ingestion failure.
#[instrument(skip(pages, external_links), fields(pages = pages.len()))]
pub fn chunk_records(
    pages: Vec<PageText>,
    external_links: &[String],
    options: &ChunkOptions,
) -> Vec<Chunk> {
    if pages.iter().all(|page| page.text.is_empty()) {
        return Vec::new();
    }

    let mut records = pages;
    records.push(PageText {
        text: FURTHER_READING_TEXT.to_string(),
        url: external_links.join("; "),
    });

    let mut chunks = Vec::new();
    for record in records {
        for content in split_text(&record.text, options) {
            chunks.push(Chunk {
                content,
                metadata: ChunkMetadata {
                    url: record.url.clone(),
                },
            });
        }
    }

    debug!(chunks = chunks.len(), "chunked records");
    chunks
}

/// Split text into overlapping character windows
///
/// Every window except possibly the last holds exactly `chunk_size`
/// characters; each window after the first starts `chunk_overlap`
/// characters before the previous window's end. Empty text yields no
/// windows.
pub fn split_text(text: &str, options: &ChunkOptions) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let char_count = boundaries.len();
    let byte_at = |position: usize| {
        if position >= char_count {
            text.len()
        } else {
            boundaries[position]
        }
    };

    let mut windows = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + options.chunk_size).min(char_count);
        windows.push(text[byte_at(start)..byte_at(end)].to_string());
        if end == char_count {
            break;
        }
        start = end - options.chunk_overlap;
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(size: usize, overlap: usize) -> ChunkOptions {
        ChunkOptions::new(size, overlap).unwrap()
    }

    fn reassemble(windows: &[String], overlap: usize) -> String {
        let mut text = String::new();
        for (i, window) in windows.iter().enumerate() {
            if i == 0 {
                text.push_str(window);
            } else {
                text.extend(window.chars().skip(overlap));
            }
        }
        text
    }

    #[test]
    fn test_short_text_is_a_single_window() {
        let windows = split_text("short", &options(450, 20));

        assert_eq!(windows, vec!["short".to_string()]);
    }

    #[test]
    fn test_windows_respect_size_and_overlap() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let windows = split_text(text, &options(10, 3));

        for window in &windows {
            assert!(window.chars().count() <= 10);
        }
        for pair in windows.windows(2) {
            let tail: String = pair[0]
                .chars()
                .skip(pair[0].chars().count() - 3)
                .collect();
            let head: String = pair[1].chars().take(3).collect();
            assert_eq!(tail, head, "consecutive windows share the overlap");
        }
    }

    #[test]
    fn test_round_trip_law() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(30);
        let overlap = 20;
        let windows = split_text(&text, &options(450, overlap));

        assert!(windows.len() > 1);
        assert_eq!(reassemble(&windows, overlap), text);
    }

    #[test]
    fn test_round_trip_law_with_multibyte_text() {
        let text = "Grüße aus der Straße überall — müßig geprüft. ".repeat(25);
        let overlap = 7;
        let windows = split_text(&text, &options(50, overlap));

        assert!(windows.len() > 1);
        assert_eq!(reassemble(&windows, overlap), text);
        for window in &windows {
            assert!(window.chars().count() <= 50);
        }
    }

    fn page(text: &str, url: &str) -> PageText {
        PageText {
            text: text.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_chunks_inherit_record_url() {
        let pages = vec![
            page("First page text.", "https://www.acme.com/"),
            page("Second page text.", "https://www.acme.com/about"),
        ];

        let chunks = chunk_records(pages, &[], &ChunkOptions::default());

        assert!(chunks
            .iter()
            .any(|c| c.metadata.url == "https://www.acme.com/"));
        assert!(chunks
            .iter()
            .any(|c| c.metadata.url == "https://www.acme.com/about"));
    }

    #[test]
    fn test_appends_synthetic_external_links_record() {
        let pages = vec![page("Page text.", "https://www.acme.com/")];
        let external = vec![
            "https://partner.example/".to_string(),
            "https://docs.example/guide".to_string(),
        ];

        let chunks = chunk_records(pages, &external, &ChunkOptions::default());

        let synthetic: Vec<_> = chunks
            .iter()
            .filter(|c| c.metadata.url == "https://partner.example/; https://docs.example/guide")
            .collect();
        assert_eq!(synthetic.len(), 1);
        assert_eq!(synthetic[0].content, FURTHER_READING_TEXT);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let external = vec!["https://partner.example/".to_string()];

        assert!(chunk_records(Vec::new(), &external, &ChunkOptions::default()).is_empty());
        assert!(
            chunk_records(
                vec![page("", "https://www.acme.com/")],
                &external,
                &ChunkOptions::default()
            )
            .is_empty()
        );
    }
}
