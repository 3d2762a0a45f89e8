//! Typed parsing of `HOTRUN_*` environment overrides
//!
//! An override that does not parse is reported and leaves the layered value
//! in place. Each kind carries its own hint, and near misses get a
//! suggestion (`ture` -> `true`, `250ms` -> `250`, `all` -> `-1`).

use std::io::Write;

const TRUE_WORDS: &[&str] = &["true", "1", "yes", "on"];
const FALSE_WORDS: &[&str] = &["false", "0", "no", "off"];

/// Value kind of a `HOTRUN_*` variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKind {
    /// Boolean switch
    Flag,
    /// Dependency depth: `-1` for unlimited, otherwise `>= 0`
    Depth,
    /// Duration in whole milliseconds
    Millis { allow_zero: bool },
}

impl EnvKind {
    fn hint(self) -> &'static str {
        match self {
            EnvKind::Flag => "true, false, 1, 0, yes, no, on, off",
            EnvKind::Depth => "-1 (unlimited), 0 (entry script only) or a positive depth",
            EnvKind::Millis { allow_zero: true } => "a whole number of milliseconds",
            EnvKind::Millis { allow_zero: false } => {
                "a whole number of milliseconds greater than zero"
            }
        }
    }

    /// Closest valid spelling of a rejected value, if there is an obvious one
    fn suggest(self, raw: &str) -> Option<String> {
        let value = raw.trim().to_lowercase();
        match self {
            EnvKind::Flag => TRUE_WORDS
                .iter()
                .chain(FALSE_WORDS)
                .map(|word| (levenshtein(&value, word), *word))
                .filter(|(dist, _)| *dist > 0 && *dist <= 2)
                .min_by_key(|(dist, _)| *dist)
                .map(|(_, word)| word.to_string()),
            EnvKind::Depth => match value.as_str() {
                "all" | "unlimited" | "infinite" => Some("-1".to_string()),
                "none" | "off" => Some("0".to_string()),
                _ => None,
            },
            EnvKind::Millis { allow_zero } => {
                let number = value.strip_suffix("ms")?.trim();
                number
                    .parse::<u64>()
                    .ok()
                    .filter(|ms| allow_zero || *ms > 0)
                    .map(|ms| ms.to_string())
            }
        }
    }
}

/// Applies `HOTRUN_*` overrides, reporting rejected values to `writer`
pub struct EnvOverrides<'w, W: Write> {
    writer: &'w mut W,
}

impl<'w, W: Write> EnvOverrides<'w, W> {
    pub fn new(writer: &'w mut W) -> Self {
        Self { writer }
    }

    pub fn flag(&mut self, var: &str, raw: &str, current: bool) -> bool {
        let value = raw.trim().to_lowercase();
        if TRUE_WORDS.contains(&value.as_str()) {
            true
        } else if FALSE_WORDS.contains(&value.as_str()) {
            false
        } else {
            self.reject(var, raw, EnvKind::Flag);
            current
        }
    }

    pub fn depth(&mut self, var: &str, raw: &str, current: i64) -> i64 {
        match raw.trim().parse::<i64>() {
            Ok(depth) if depth >= -1 => depth,
            _ => {
                self.reject(var, raw, EnvKind::Depth);
                current
            }
        }
    }

    pub fn millis(&mut self, var: &str, raw: &str, current: u64, allow_zero: bool) -> u64 {
        match raw.trim().parse::<u64>() {
            Ok(ms) if allow_zero || ms > 0 => ms,
            _ => {
                self.reject(var, raw, EnvKind::Millis { allow_zero });
                current
            }
        }
    }

    fn reject(&mut self, var: &str, raw: &str, kind: EnvKind) {
        let suggestion = kind
            .suggest(raw)
            .map(|s| format!(". Did you mean '{}'?", s))
            .unwrap_or_default();
        let _ = writeln!(
            self.writer,
            "Warning: Ignoring {}='{}'{}",
            var, raw, suggestion
        );
        let _ = writeln!(self.writer, "Expected {}", kind.hint());
    }
}

/// Edit distance used for typo suggestions
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}
