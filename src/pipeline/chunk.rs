//! Chunker: split a document into token-bounded, ordered pieces.
//!
//! Splitting prefers paragraph boundaries (`"\n\n"`) and falls back to
//! sentence boundaries (`". "`) only for a paragraph that is too large on its
//! own. Sentence pieces keep their terminator, so joining the chunks with
//! `"\n\n"` gives back the input with whitespace differences at split points
//! only. A single sentence above the ceiling becomes its own chunk unsplit.
//!
//! Size is a cheap estimate (`chars / 4`), not a real token count. The remote
//! service's limits are generous, so a conservative proxy is enough to keep
//! requests from being oversized.

/// Separator between paragraphs, and between chunks when reassembling.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

const SENTENCE_TERMINATOR: &str = ". ";

const CHARS_PER_TOKEN: usize = 4;

/// Estimated token count of `text`.
pub fn estimate_tokens(text: &str) -> usize {
    estimate_chars(text.chars().count())
}

fn estimate_chars(chars: usize) -> usize {
    chars / CHARS_PER_TOKEN
}

/// Split `text` into chunks whose estimated size is at most `max_tokens`.
///
/// Text that already fits is returned unchanged as a single chunk; the empty
/// string yields one empty chunk. The result is never empty.
pub fn split(text: &str, max_tokens: usize) -> Vec<String> {
    if estimate_tokens(text) <= max_tokens {
        return vec![text.to_string()];
    }

    let mut acc = Accumulator::new(max_tokens);
    for paragraph in text.split(PARAGRAPH_SEPARATOR) {
        if estimate_tokens(paragraph) > max_tokens {
            acc.flush();
            let mut sentences = paragraph.split_inclusive(SENTENCE_TERMINATOR);
            if let Some(first) = sentences.next() {
                acc.push(first, PARAGRAPH_SEPARATOR);
            }
            for sentence in sentences {
                acc.push(sentence, "");
            }
        } else {
            acc.push(paragraph, PARAGRAPH_SEPARATOR);
        }
    }
    acc.finish()
}

/// Running chunk under construction.
///
/// Sizes are tracked on the accumulated text itself (separators included)
/// rather than summed per piece, so a closed chunk never exceeds the ceiling
/// unless it holds a single oversized piece.
struct Accumulator {
    max_tokens: usize,
    chunks: Vec<String>,
    current: String,
    current_chars: usize,
    pieces: usize,
}

impl Accumulator {
    fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            chunks: Vec::new(),
            current: String::new(),
            current_chars: 0,
            pieces: 0,
        }
    }

    /// Append `piece`, preceded by `separator` unless it opens the chunk.
    fn push(&mut self, piece: &str, separator: &str) {
        let piece_chars = piece.chars().count();
        if self.pieces > 0 {
            let joined = self.current_chars + separator.chars().count() + piece_chars;
            if estimate_chars(joined) > self.max_tokens {
                self.flush();
            } else {
                self.current.push_str(separator);
                self.current.push_str(piece);
                self.current_chars = joined;
                self.pieces += 1;
                return;
            }
        }
        self.current.push_str(piece);
        self.current_chars = piece_chars;
        self.pieces = 1;
    }

    /// Close the running chunk. Trailing whitespace at the split point is
    /// trimmed; whitespace-only chunks are dropped.
    fn flush(&mut self) {
        if self.pieces == 0 {
            return;
        }
        let trimmed = self.current.trim_end();
        if !trimmed.is_empty() {
            self.chunks.push(trimmed.to_string());
        }
        self.current.clear();
        self.current_chars = 0;
        self.pieces = 0;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        if self.chunks.is_empty() {
            self.chunks.push(String::new());
        }
        self.chunks
    }
}

/// Reassemble chunk outputs in order.
pub fn join<I, S>(chunks: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, chunk) in chunks.into_iter().enumerate() {
        if i > 0 {
            out.push_str(PARAGRAPH_SEPARATOR);
        }
        out.push_str(chunk.as_ref());
    }
    out
}
