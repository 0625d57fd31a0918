//! String similarity backends.
//!
//! Call sites go through [`backend`] and never name a concrete
//! implementation. With the `rapidfuzz` feature the native backend is
//! installed; otherwise the pure backend built on `strsim` is used. The
//! choice is made once per process.

use std::sync::OnceLock;

/// Distance and similarity capability used by every fuzzy comparison.
pub trait SimilarityBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Levenshtein edit distance in characters.
    fn distance(&self, a: &str, b: &str) -> usize;

    /// Similarity in `[0, 1]`.
    fn ratio(&self, a: &str, b: &str) -> f64;

    /// Whether this is the native fast-path backend.
    fn is_native(&self) -> bool;
}

/// Backend using the `rapidfuzz` crate.
#[cfg(feature = "rapidfuzz")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RapidFuzzBackend;

#[cfg(feature = "rapidfuzz")]
impl SimilarityBackend for RapidFuzzBackend {
    fn name(&self) -> &'static str {
        "rapidfuzz"
    }

    fn distance(&self, a: &str, b: &str) -> usize {
        rapidfuzz::distance::levenshtein::distance(a.chars(), b.chars())
    }

    fn ratio(&self, a: &str, b: &str) -> f64 {
        if a.is_empty() && b.is_empty() {
            return 1.0;
        }
        rapidfuzz::distance::levenshtein::normalized_similarity(a.chars(), b.chars())
    }

    fn is_native(&self) -> bool {
        true
    }
}

/// Backend without native acceleration.
///
/// Distance comes from `strsim`; the ratio is a sequence-matching ratio,
/// `2 * LCS / (len(a) + len(b))`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PureBackend;

impl SimilarityBackend for PureBackend {
    fn name(&self) -> &'static str {
        "pure"
    }

    fn distance(&self, a: &str, b: &str) -> usize {
        strsim::levenshtein(a, b)
    }

    fn ratio(&self, a: &str, b: &str) -> f64 {
        sequence_ratio(a, b)
    }

    fn is_native(&self) -> bool {
        false
    }
}

fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    // Longest common subsequence, two rolling rows.
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    2.0 * prev[b.len()] as f64 / total as f64
}

static BACKEND: OnceLock<Box<dyn SimilarityBackend>> = OnceLock::new();

fn default_backend() -> Box<dyn SimilarityBackend> {
    #[cfg(feature = "rapidfuzz")]
    {
        Box::new(RapidFuzzBackend)
    }
    #[cfg(not(feature = "rapidfuzz"))]
    {
        Box::new(PureBackend)
    }
}

/// The process-wide backend, selected on first use.
pub fn backend() -> &'static dyn SimilarityBackend {
    BACKEND
        .get_or_init(|| {
            let selected = default_backend();
            tracing::debug!(backend = selected.name(), "Selected similarity backend");
            selected
        })
        .as_ref()
}

/// Similarity in `[0, 1]` using the active backend.
pub fn ratio(a: &str, b: &str) -> f64 {
    backend().ratio(a, b)
}

/// Best similarity of the shorter string against any same-length window of
/// the longer one, scaled to `[0, 100]`.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    partial_ratio_with(backend(), a, b)
}

pub fn partial_ratio_with(backend: &dyn SimilarityBackend, a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = short.chars().count();
    if short_len == 0 {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }
    if long.contains(short) {
        return 100.0;
    }

    let long_chars: Vec<char> = long.chars().collect();
    long_chars
        .windows(short_len)
        .map(|window| {
            let window: String = window.iter().collect();
            backend.ratio(short, &window)
        })
        .fold(0.0, f64::max)
        * 100.0
}

/// Cheap pre-filter for fuzzy session lookups.
///
/// Requires at least 4 characters each, lengths within one, and the same
/// first character. Then accepts a single transposition, an edit distance
/// of at most 1, or a high similarity (0.92 native, 0.90 pure).
///
/// # Examples
///
/// ```
/// use sportforged_matcher::similarity::tokens_close;
///
/// assert!(tokens_close("qualifying", "qualifyng"));
/// assert!(!tokens_close("race", "qualifying"));
/// ```
pub fn tokens_close(a: &str, b: &str) -> bool {
    tokens_close_with(backend(), a, b)
}

pub fn tokens_close_with(backend: &dyn SimilarityBackend, a: &str, b: &str) -> bool {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.len() < 4 || b_chars.len() < 4 {
        return false;
    }
    if a_chars.len().abs_diff(b_chars.len()) > 1 {
        return false;
    }
    if a_chars[0] != b_chars[0] {
        return false;
    }

    if a_chars.len() == b_chars.len() {
        let diffs: Vec<usize> = (0..a_chars.len())
            .filter(|&i| a_chars[i] != b_chars[i])
            .collect();
        if let [i, j] = diffs[..] {
            if a_chars[i] == b_chars[j] && a_chars[j] == b_chars[i] {
                return true;
            }
        }
    }

    if backend.distance(a, b) <= 1 {
        return true;
    }
    let threshold = if backend.is_native() { 0.92 } else { 0.90 };
    backend.ratio(a, b) >= threshold
}
