// src/parser.rs - Single-pass record parser over a line stream

use crate::error::ProcessingError;
use crate::pipeline::record::Record;
use std::collections::HashSet;
use std::io::BufRead;
use std::iter::FusedIterator;

/// Simple Unicode case folding, so that `ſ` matches `s` and the Kelvin sign matches `k`.
///
/// Each char is mapped through its single-char uppercase form (when it has one)
/// and then lowercased.
pub fn fold_case(s: &str) -> String {
    s.chars()
        .flat_map(|c| {
            let mut upper = c.to_uppercase();
            let base = match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            };
            base.to_lowercase()
        })
        .collect()
}

/// Reserved field names and the record-start sentinel, prepared for lookup
#[derive(Debug, Clone)]
pub struct Vocabulary {
    reserved: HashSet<String>,
    max_key_len: usize,
    record_start: String,
}

impl Vocabulary {
    pub fn new<S: AsRef<str>>(reserved_words: &[S], record_start: &str) -> Self {
        let reserved: HashSet<String> = reserved_words
            .iter()
            .map(|w| fold_case(w.as_ref()))
            .collect();
        let max_key_len = reserved.iter().map(|w| w.len()).max().unwrap_or(0);
        Vocabulary {
            reserved,
            max_key_len,
            record_start: record_start.trim().to_string(),
        }
    }

    /// Case-insensitive membership test, comparing [`fold_case`] forms
    pub fn is_reserved(&self, key: &str) -> bool {
        // A folded char keeps at least a third of its UTF-8 length.
        if key.len() > self.max_key_len.saturating_mul(4) {
            return false;
        }
        self.reserved.contains(&fold_case(key))
    }

    pub fn is_record_start(&self, line: &str) -> bool {
        line.trim() == self.record_start
    }
}

/// How a single input line contributes to the current record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Sentinel,
    Field { key: &'a str, value: &'a str },
    Body,
}

pub fn classify_line<'a>(line: &'a str, vocab: &Vocabulary) -> LineKind<'a> {
    if vocab.is_record_start(line) {
        return LineKind::Sentinel;
    }
    match line.split_once(':') {
        Some((key, rest)) if vocab.is_reserved(key) => LineKind::Field {
            key,
            value: rest.trim(),
        },
        _ => LineKind::Body,
    }
}

/// Lazily yields one [`Record`] per sentinel, plus a final record at end of input.
///
/// The final record is always produced, even when empty. A read fault is yielded
/// once as [`ProcessingError::Input`], the in-flight record is dropped and the
/// iterator is exhausted afterwards.
pub struct RecordReader<R> {
    reader: R,
    vocab: Vocabulary,
    current: Record,
    buf: Vec<u8>,
    lines_read: usize,
    records_emitted: usize,
    done: bool,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R, vocab: Vocabulary) -> Self {
        RecordReader {
            reader,
            vocab,
            current: Record::new(),
            buf: Vec::new(),
            lines_read: 0,
            records_emitted: 0,
            done: false,
        }
    }

    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    pub fn records_emitted(&self) -> usize {
        self.records_emitted
    }

    fn emit(&mut self) -> Record {
        self.records_emitted += 1;
        std::mem::take(&mut self.current)
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record, ProcessingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return Some(Ok(self.emit()));
                }
                Ok(_) => {
                    self.lines_read += 1;
                    let at_boundary = {
                        let line = String::from_utf8_lossy(&self.buf);
                        match classify_line(&line, &self.vocab) {
                            LineKind::Sentinel => true,
                            LineKind::Field { key, value } => {
                                self.current.set_field(key, value);
                                false
                            }
                            LineKind::Body => {
                                self.current.append_body(&line);
                                false
                            }
                        }
                    };
                    if at_boundary {
                        return Some(Ok(self.emit()));
                    }
                }
                Err(e) => {
                    self.done = true;
                    self.current = Record::new();
                    return Some(Err(ProcessingError::Input(e)));
                }
            }
        }
    }
}

impl<R: BufRead> FusedIterator for RecordReader<R> {}

pub fn parse_stream<R: BufRead>(reader: R, vocab: Vocabulary) -> RecordReader<R> {
    RecordReader::new(reader, vocab)
}
