//! Numeric ordering of discovered snapshot paths.
//!
//! Snapshot names carry their sequence index between the last path separator and the last
//! delimiter, e.g. `captures/42_cam0.jpg` has index `42`. Plain lexical sorting puts `10_x.jpg`
//! before `2_x.jpg`; ordering by the extracted integer does not.
//!
//! Names without a parseable index are never fatal. They are placed after every well-formed
//! entry and arranged according to [`MalformedPolicy`], or dropped under
//! [`MalformedPolicy::Exclude`].

use std::{
    cmp::Ordering,
    path::{Path, PathBuf},
};

/// Delimiter that ends the numeric token (`<N>_suffix.ext`).
pub const DEFAULT_DELIMITER: char = '_';

/// Sort key extracted from a candidate path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum OrderKey {
    /// The name carries this sequence index.
    Valid(i64),
    /// No parseable index between the last separator and the last delimiter.
    Invalid,
}

impl OrderKey {
    /// Tokenize `path` and parse its sequence index.
    ///
    /// The token is the text strictly between the last path separator (or the start of the
    /// string) and the last `delimiter`. The delimiter must come after the separator and the
    /// token must parse as a whole signed integer; anything else is [`OrderKey::Invalid`].
    pub fn extract(path: &str, delimiter: char) -> Self {
        // Separators are ASCII, one byte wide.
        let start = path.rfind(std::path::is_separator).map_or(0, |i| i + 1);
        let Some(end) = path.rfind(delimiter) else {
            return Self::Invalid;
        };
        if end < start {
            return Self::Invalid;
        }

        match path[start..end].parse::<i64>() {
            Ok(n) => Self::Valid(n),
            Err(_) => Self::Invalid,
        }
    }

    /// [`OrderKey::extract`] over a filesystem path.
    pub fn from_path(path: &Path, delimiter: char) -> Self {
        Self::extract(&path.to_string_lossy(), delimiter)
    }

    /// The index, when valid.
    pub fn index(self) -> Option<i64> {
        match self {
            Self::Valid(n) => Some(n),
            Self::Invalid => None,
        }
    }

    /// Whether the name carried a parseable index.
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// How entries without a valid [`OrderKey`] are arranged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// After all valid entries, sorted lexically by full path.
    #[default]
    Lexical,
    /// After all valid entries, in the order they were discovered.
    Discovery,
    /// Dropped from the sequence.
    Exclude,
}

/// One candidate together with its key and discovery position.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SequencedEntry {
    /// Full path to the image.
    pub path: PathBuf,
    /// Extracted sort key.
    pub key: OrderKey,
    /// Position in the discovery listing.
    pub discovery_index: usize,
}

/// Candidates in final frame order.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct OrderedSequence {
    /// Entries in frame order.
    pub entries: Vec<SequencedEntry>,
    /// Malformed entries dropped under [`MalformedPolicy::Exclude`], in discovery order.
    pub excluded: Vec<PathBuf>,
}

impl OrderedSequence {
    /// Number of frames in the sequence.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to encode.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of candidates that went into ordering, including excluded ones.
    pub fn candidates(&self) -> usize {
        self.entries.len() + self.excluded.len()
    }

    /// Number of entries in the sequence with an invalid key.
    pub fn malformed(&self) -> usize {
        self.entries.iter().filter(|e| !e.key.is_valid()).count()
    }

    /// Iterate entries in frame order.
    pub fn iter(&self) -> std::slice::Iter<'_, SequencedEntry> {
        self.entries.iter()
    }

    /// Paths in frame order.
    pub fn paths(&self) -> Vec<&Path> {
        self.entries.iter().map(|e| e.path.as_path()).collect()
    }
}

impl<'a> IntoIterator for &'a OrderedSequence {
    type Item = &'a SequencedEntry;
    type IntoIter = std::slice::Iter<'a, SequencedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Total order over sequenced entries.
///
/// Valid keys ascend numerically and precede every invalid key. Equal valid keys fall back to
/// the lexical path order. Invalid keys are arranged per `policy`. The discovery index is the
/// final tie-break, so no two distinct entries compare equal.
pub fn compare_entries(
    a: &SequencedEntry,
    b: &SequencedEntry,
    policy: MalformedPolicy,
) -> Ordering {
    let lexical = || a.path.as_os_str().cmp(b.path.as_os_str());
    let discovery = || a.discovery_index.cmp(&b.discovery_index);

    match (a.key, b.key) {
        (OrderKey::Valid(x), OrderKey::Valid(y)) => {
            x.cmp(&y).then_with(lexical).then_with(discovery)
        }
        (OrderKey::Valid(_), OrderKey::Invalid) => Ordering::Less,
        (OrderKey::Invalid, OrderKey::Valid(_)) => Ordering::Greater,
        (OrderKey::Invalid, OrderKey::Invalid) => match policy {
            MalformedPolicy::Lexical => lexical().then_with(discovery),
            MalformedPolicy::Discovery | MalformedPolicy::Exclude => discovery(),
        },
    }
}

/// Order discovered paths into frame order.
///
/// `candidates` is taken in discovery order. Pure apart from logging.
pub fn order_candidates(
    candidates: Vec<PathBuf>,
    delimiter: char,
    policy: MalformedPolicy,
) -> OrderedSequence {
    let mut entries = Vec::with_capacity(candidates.len());
    let mut excluded = Vec::new();

    for (discovery_index, path) in candidates.into_iter().enumerate() {
        let key = OrderKey::from_path(&path, delimiter);
        if !key.is_valid() {
            if policy == MalformedPolicy::Exclude {
                tracing::warn!(path = %path.display(), "excluding entry without a sequence index");
                excluded.push(path);
                continue;
            }
            tracing::warn!(path = %path.display(), "entry has no sequence index; ordering it last");
        }
        entries.push(SequencedEntry {
            path,
            key,
            discovery_index,
        });
    }

    entries.sort_by(|a, b| compare_entries(a, b, policy));

    tracing::debug!(
        frames = entries.len(),
        excluded = excluded.len(),
        "ordered candidates"
    );
    OrderedSequence { entries, excluded }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/order.rs"]
mod tests;
