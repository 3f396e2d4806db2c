use regex::Regex;

use crate::artifact::FileArtifact;

/// Extracts tagged file blocks from generated response text.
///
/// Blocks have the shape `<file name="PATH">CONTENT</file>`. Matching is
/// left-to-right and non-overlapping; nesting is not part of the protocol.
/// Malformed blocks are skipped rather than failing the whole response.
pub struct ArtifactParser {
    block_pattern: Regex,
}

impl ArtifactParser {
    pub fn new() -> Self {
        // (?s) lets the body span newlines; .*? keeps each block minimal so
        // consecutive blocks do not merge.
        let block_pattern = Regex::new(r#"(?s)<file name="([^"]*)">(.*?)</file>"#)
            .expect("artifact block pattern is valid");
        Self { block_pattern }
    }

    /// Collects every well-formed file block in `text`.
    ///
    /// Paths and bodies are trimmed. Blocks whose name attribute is empty
    /// after trimming are dropped. Zero blocks is a valid outcome and yields
    /// an empty vector.
    pub fn parse(&self, text: &str) -> Vec<FileArtifact> {
        self.block_pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let name = caps[1].trim();
                if name.is_empty() {
                    return None;
                }
                let content = caps[2].trim();
                Some(FileArtifact::new(name, content))
            })
            .collect()
    }
}

impl Default for ArtifactParser {
    fn default() -> Self {
        Self::new()
    }
}
