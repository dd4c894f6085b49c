//! Font-size profiling.
//!
//! The most frequent block font size is taken as body text. Every larger
//! size is a candidate heading size; the two largest become H1 and H2 and
//! everything below them collapses into H3.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::model::{HeadingLevel, TextBlock};

/// Occurrence count per rounded font size, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontHistogram {
    counts: IndexMap<i32, usize>,
}

impl FontHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a histogram from blocks, in traversal order.
    pub fn from_blocks<'a, I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = &'a TextBlock>,
    {
        let mut histogram = Self::new();
        for block in blocks {
            histogram.record(block.font_size);
        }
        histogram
    }

    /// Add one observation of a size.
    pub fn record(&mut self, size: i32) {
        *self.counts.entry(size).or_insert(0) += 1;
    }

    /// Number of observations of a size.
    pub fn count(&self, size: i32) -> usize {
        self.counts.get(&size).copied().unwrap_or(0)
    }

    /// Most frequent size; the first-seen size wins ties.
    pub fn mode(&self) -> Option<i32> {
        let mut best: Option<(i32, usize)> = None;
        for (&size, &count) in &self.counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((size, count));
            }
        }
        best.map(|(size, _)| size)
    }

    /// Distinct sizes in first-seen order.
    pub fn sizes(&self) -> impl Iterator<Item = i32> + '_ {
        self.counts.keys().copied()
    }

    /// Number of distinct sizes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Font size to heading level assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelMap {
    levels: BTreeMap<i32, HeadingLevel>,
}

impl LevelMap {
    /// Derive levels from heading sizes sorted largest first.
    pub fn from_ranking(heading_sizes: &[i32]) -> Self {
        let levels = heading_sizes
            .iter()
            .enumerate()
            .map(|(rank, &size)| {
                let level = match rank {
                    0 => HeadingLevel::H1,
                    1 => HeadingLevel::H2,
                    _ => HeadingLevel::H3,
                };
                (size, level)
            })
            .collect();
        Self { levels }
    }

    /// Level assigned to a size, if it is a ranked heading size.
    pub fn get(&self, size: i32) -> Option<HeadingLevel> {
        self.levels.get(&size).copied()
    }

    /// Iterate `(size, level)` pairs, smallest size first.
    pub fn iter(&self) -> impl Iterator<Item = (i32, HeadingLevel)> + '_ {
        self.levels.iter().map(|(&size, &level)| (size, level))
    }

    /// Number of ranked sizes.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if no size is ranked.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Per-document font statistics used for heading classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontProfile {
    /// Presumed paragraph text size
    pub body_size: i32,
    /// Distinct sizes larger than body, largest first
    pub heading_sizes: Vec<i32>,
    /// Level per heading size
    pub levels: LevelMap,
}

impl FontProfile {
    /// Derive the profile from a histogram. `None` if it is empty.
    pub fn from_histogram(histogram: &FontHistogram) -> Option<Self> {
        let body_size = histogram.mode()?;

        let mut heading_sizes: Vec<i32> = histogram.sizes().filter(|&s| s > body_size).collect();
        heading_sizes.sort_unstable_by(|a, b| b.cmp(a));

        let levels = LevelMap::from_ranking(&heading_sizes);

        log::debug!(
            "Font profile: body={} headings={:?}",
            body_size,
            heading_sizes
        );

        Some(Self {
            body_size,
            heading_sizes,
            levels,
        })
    }

    /// Level for a font size, if it is a ranked heading size.
    pub fn level_for(&self, size: i32) -> Option<HeadingLevel> {
        self.levels.get(size)
    }
}

/// Profile a document's blocks. `None` when there are no blocks.
pub fn profile(blocks: &[TextBlock]) -> Option<FontProfile> {
    FontProfile::from_histogram(&FontHistogram::from_blocks(blocks))
}
