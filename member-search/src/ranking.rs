use crate::model::RosterEntry;
use nucleo_matcher::{Config, Matcher, Utf32Str};
use std::borrow::Cow;
use tracing::trace;

/// Anything that can hand the ranker one search text per index.
pub trait SearchableRoster {
    fn len(&self) -> usize;

    fn search_text(&self, index: usize) -> Cow<'_, str>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SearchableRoster for [RosterEntry] {
    fn len(&self) -> usize {
        <[RosterEntry]>::len(self)
    }

    fn search_text(&self, index: usize) -> Cow<'_, str> {
        Cow::Owned(self[index].search_text())
    }
}

impl SearchableRoster for [String] {
    fn len(&self) -> usize {
        <[String]>::len(self)
    }

    fn search_text(&self, index: usize) -> Cow<'_, str> {
        Cow::Borrowed(&self[index])
    }
}

/// Index into the ranked roster with its matcher score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedMatch {
    pub index: usize,
    pub score: u16,
}

/// Fuzzy ranker using nucleo-matcher.
///
/// Keeps the matcher and its scratch buffers between calls. Every call clears
/// the match buffer before filling it.
pub struct FuzzyRanker {
    matcher: Matcher,
    needle_buf: Vec<char>,
    haystack_buf: Vec<char>,
    matches: Vec<RankedMatch>,
}

impl Default for FuzzyRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyRanker {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            needle_buf: Vec::new(),
            haystack_buf: Vec::new(),
            matches: Vec::new(),
        }
    }

    /// Score every entry of `roster` against `query`, drop non-matches, and
    /// return at most `limit` matches by descending score. Equal scores keep
    /// roster order.
    pub fn rank<R>(&mut self, roster: &R, query: &str, limit: usize) -> &[RankedMatch]
    where
        R: SearchableRoster + ?Sized,
    {
        self.matches.clear();
        if query.is_empty() || limit == 0 || roster.is_empty() {
            return &self.matches;
        }

        // The matcher folds haystack case only.
        let lowered = query.to_lowercase();
        let needle = Utf32Str::new(&lowered, &mut self.needle_buf);

        for index in 0..roster.len() {
            let text = roster.search_text(index);
            let haystack = Utf32Str::new(&text, &mut self.haystack_buf);
            if let Some(score) = self.matcher.fuzzy_match(haystack, needle) {
                self.matches.push(RankedMatch { index, score });
            }
        }

        self.matches
            .sort_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));
        trace!(
            "ranked {} of {} roster entries for {query:?}",
            self.matches.len(),
            roster.len()
        );
        self.matches.truncate(limit);
        &self.matches
    }
}
