//! Naive string search: slide the pattern over every alignment and compare
//! character by character.

use super::scene::{Checkpoint, Highlight, TextScene};
use crate::producer::{Flow, Machine, Outbox, ProducerError};

pub const DEFAULT_TEXT: &str = "ABABDABACDABABCABAB";
pub const DEFAULT_PATTERN: &str = "ABABCABAB";

pub struct NaiveSearch {
    text: Vec<char>,
    pattern: Vec<char>,
    /// Current alignment
    offset: usize,
    /// Characters of the pattern already compared at this alignment
    compared: usize,
    matches: Vec<usize>,
    started: bool,
}

impl NaiveSearch {
    pub fn new(text: &str, pattern: &str) -> Self {
        NaiveSearch {
            text: text.chars().collect(),
            pattern: pattern.chars().collect(),
            offset: 0,
            compared: 0,
            matches: Vec::new(),
            started: false,
        }
    }

    fn scene(&self) -> TextScene {
        let mut scene = TextScene::new(&self.text, &self.pattern);
        scene.offset = Some(self.offset);
        scene.matches = self.matches.clone();
        for &m in &self.matches {
            for i in m..m + self.pattern.len() {
                scene.text_marks.insert(i, Highlight::Found);
            }
        }
        for j in 0..self.compared {
            scene.text_marks.insert(self.offset + j, Highlight::Range);
            scene.pattern_marks.insert(j, Highlight::Range);
        }
        scene
    }

    fn last_offset(&self) -> usize {
        self.text.len() - self.pattern.len()
    }

    fn summary(&self) -> String {
        if self.matches.is_empty() {
            "Pattern not found in text.".to_string()
        } else {
            let at: Vec<String> = self.matches.iter().map(|m| m.to_string()).collect();
            format!("Search complete. Pattern found at index(es): {}", at.join(", "))
        }
    }
}

impl Machine for NaiveSearch {
    type Checkpoint = Checkpoint;

    fn resume(&mut self, out: &mut Outbox<Checkpoint>) -> Result<Flow, ProducerError> {
        if !self.started {
            self.started = true;
            let (n, m) = (self.text.len(), self.pattern.len());
            if m == 0 || m > n {
                let reason = if m == 0 {
                    "Pattern is empty.".to_string()
                } else {
                    format!("Pattern (length {}) is longer than text (length {}).", m, n)
                };
                out.emit(Checkpoint::new(reason, TextScene::new(&self.text, &self.pattern)));
                return Ok(Flow::Complete);
            }
            out.emit(Checkpoint::new(
                format!("Checking window at index 0 (text length {}, pattern length {}).", n, m),
                self.scene(),
            ));
            return Ok(Flow::Continue);
        }

        if self.offset > self.last_offset() {
            out.emit(Checkpoint::new(self.summary(), {
                let mut s = self.scene();
                s.offset = None;
                s
            }));
            return Ok(Flow::Complete);
        }

        let j = self.compared;
        let i = self.offset + j;
        let (t, p) = (self.text[i], self.pattern[j]);
        if t == p {
            self.compared += 1;
            let mut scene = self.scene();
            scene.text_marks.insert(i, Highlight::Compare);
            scene.pattern_marks.insert(j, Highlight::Compare);
            out.emit(Checkpoint::new(
                format!("Text[{}] = '{}' matches pattern[{}] = '{}'", i, t, j, p),
                scene,
            ));
            if self.compared == self.pattern.len() {
                self.matches.push(self.offset);
                out.emit(Checkpoint::new(
                    format!("Pattern found at index {}!", self.offset),
                    self.scene(),
                ));
                self.advance(out);
            }
        } else {
            let mut scene = self.scene();
            scene.text_marks.insert(i, Highlight::Mismatch);
            scene.pattern_marks.insert(j, Highlight::Mismatch);
            out.emit(Checkpoint::new(
                format!("Mismatch: text[{}] = '{}' vs pattern[{}] = '{}'", i, t, j, p),
                scene,
            ));
            self.advance(out);
        }
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        "naive string search"
    }
}

impl NaiveSearch {
    fn advance(&mut self, out: &mut Outbox<Checkpoint>) {
        self.offset += 1;
        self.compared = 0;
        if self.offset <= self.last_offset() {
            out.emit(Checkpoint::new(
                format!("Sliding window to index {}.", self.offset),
                self.scene(),
            ));
        }
    }
}
