//! Frame assembly from an arbitrarily chunked byte stream.

/// Splits incoming bytes into blank-line-delimited frames.
///
/// Chunk boundaries carry no meaning: a frame, a line, or a multi-byte UTF-8
/// character may be split across any number of [`push`](Self::push) calls.
/// Text is decoded only once a frame is complete.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already searched for a separator
    scanned: usize,
    /// Last byte seen was `\r`, so a following `\n` belongs to it
    after_cr: bool,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every frame it completed, in order.
    ///
    /// `\r\n` and a lone `\r` both end a line, so all three line endings
    /// separate frames the same way.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.reserve(chunk.len());
        for &byte in chunk {
            match byte {
                b'\r' => {
                    self.buffer.push(b'\n');
                    self.after_cr = true;
                }
                b'\n' if self.after_cr => self.after_cr = false,
                _ => {
                    self.buffer.push(byte);
                    self.after_cr = false;
                }
            }
        }

        let mut frames = Vec::new();
        let mut start = 0;
        // Back up one byte: the separator may straddle the previous chunk
        let mut from = self.scanned.saturating_sub(1);
        while let Some(pos) = find_separator(&self.buffer[from..]) {
            let end = from + pos;
            frames.push(String::from_utf8_lossy(&self.buffer[start..end]).into_owned());
            start = end + 2;
            from = start;
        }
        self.buffer.drain(..start);
        self.scanned = self.buffer.len();
        frames
    }

    /// Flush the trailing frame at end of stream, if it holds anything.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        self.scanned = 0;
        self.after_cr = false;
        let text = String::from_utf8_lossy(&rest);
        if text.trim().is_empty() {
            None
        } else {
            Some(text.into_owned())
        }
    }
}

fn find_separator(bytes: &[u8]) -> Option<usize> {
    bytes.windows(2).position(|w| w == b"\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &str = concat!(
        "data: {\"type\":\"status\",\"message\":\"Thinking\"}\n\n",
        "data: {\"type\":\"tool_start\",\"tool\":\"search_tracks\",\"message\":\"Searching\"}\n\n",
        ": keep-alive\n\n",
        "data: {\"type\":\"tool_end\",\"message\":\"\"}\n\n",
        "data: {\"type\":\"complete\",\n",
        "data: \"message\":\"Voil\u{e0} \u{5e9}\u{5dc}\u{5d5}\u{5dd}\"}\n\n",
    );

    fn assemble(chunks: &[&[u8]]) -> Vec<String> {
        let mut assembler = FrameAssembler::new();
        let mut frames = Vec::new();
        for chunk in chunks {
            frames.extend(assembler.push(chunk));
        }
        frames.extend(assembler.finish());
        frames
    }

    #[test]
    fn test_single_chunk() {
        let frames = assemble(&[STREAM.as_bytes()]);
        assert_eq!(frames.len(), 5);
        assert!(frames[0].contains("Thinking"));
        assert_eq!(frames[2], ": keep-alive");
    }

    #[test]
    fn test_chunk_boundary_invariance() {
        let bytes = STREAM.as_bytes();
        let expected = assemble(&[bytes]);

        for size in 1..=bytes.len() {
            let chunks: Vec<&[u8]> = bytes.chunks(size).collect();
            assert_eq!(assemble(&chunks), expected, "chunk size {}", size);
        }

        // Every two-way split, including inside multi-byte characters
        for split in 0..=bytes.len() {
            let (a, b) = bytes.split_at(split);
            assert_eq!(assemble(&[a, b]), expected, "split at {}", split);
        }
    }

    #[test]
    fn test_trailing_frame_emitted_on_finish() {
        let mut assembler = FrameAssembler::new();
        let frames = assembler.push(b"data: {\"type\":\"status\",\"message\":\"a\"}\n\ndata: {\"type\":\"complete\"");
        assert_eq!(frames.len(), 1);

        let frames = assembler.push(b",\"message\":\"done\"}");
        assert!(frames.is_empty());

        let last = assembler.finish().unwrap();
        assert_eq!(last, "data: {\"type\":\"complete\",\"message\":\"done\"}");
        assert!(assembler.finish().is_none());
    }

    #[test]
    fn test_finish_ignores_whitespace_remainder() {
        let mut assembler = FrameAssembler::new();
        assembler.push(b"data: {}\n\n\n");
        assert!(assembler.finish().is_none());
    }

    #[test]
    fn test_crlf_separators() {
        let frames = assemble(&[b"data: a\r\n\r", b"\ndata: b\r\n\r\n"]);
        assert_eq!(frames, vec!["data: a".to_string(), "data: b".to_string()]);
    }

    #[test]
    fn test_lone_cr_line_endings() {
        let frames = assemble(&[b"data: a\rdata: b\r", b"\rdata: c\r\r"]);
        assert_eq!(
            frames,
            vec!["data: a\ndata: b".to_string(), "data: c".to_string()]
        );
        assert_eq!(
            crate::sse::parse_frame(&frames[0]),
            Some("a\nb".to_string())
        );
    }

    #[test]
    fn test_separator_split_across_pushes() {
        let mut assembler = FrameAssembler::new();
        assert!(assembler.push(b"data: a\n").is_empty());
        assert_eq!(assembler.push(b"\ndata: b\n"), vec!["data: a".to_string()]);
        assert_eq!(assembler.push(b"\n"), vec!["data: b".to_string()]);
    }

    #[test]
    fn test_large_frame_in_small_chunks() {
        let payload = "x".repeat(64 * 1024);
        let body = format!("data: {}\n\n", payload);
        let mut assembler = FrameAssembler::new();
        let mut frames = Vec::new();
        for chunk in body.as_bytes().chunks(7) {
            frames.extend(assembler.push(chunk));
        }
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), payload.len() + "data: ".len());
        assert!(assembler.finish().is_none());
    }
}
