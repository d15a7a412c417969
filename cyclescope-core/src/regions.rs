//! Threshold breach run detection for shaded chart bands.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ScorePoint;

/// Which threshold a region breaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
    Oversold,
    Overbought,
}

/// A maximal contiguous date interval where the score breaches a threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub kind: RegionKind,
}

/// Detect breach runs of `score_key` against the two bounds.
///
/// Two independent trackers walk the series once: one for scores below
/// `lower` (Oversold), one for scores above `upper` (Overbought). A point
/// with no score for `score_key` is skipped and does not close an open run;
/// only an explicit non-breaching value does. A run that ends mid-series
/// closes at the first non-breaching date (one sample past the last
/// breaching one — the boundary the chart bands render with). A run still
/// open at the end of the series closes at the final series date.
///
/// Output is grouped: all Oversold regions first, then all Overbought
/// regions, each in open order. Callers needing one timeline use
/// [`merged_by_start`]. With `lower >= upper` the two kinds may overlap in
/// time; that degenerate input is accepted.
pub fn detect_regions(
    series: &[ScorePoint],
    score_key: &str,
    lower: f64,
    upper: f64,
) -> Vec<Region> {
    let mut below = RunTracker::new(RegionKind::Oversold);
    let mut above = RunTracker::new(RegionKind::Overbought);

    for point in series {
        let Some(score) = point.score(score_key) else {
            continue;
        };
        below.step(point.date, score < lower);
        above.step(point.date, score > upper);
    }
    if let Some(last) = series.last() {
        below.finish(last.date);
        above.finish(last.date);
    }

    let mut regions = below.regions;
    regions.extend(above.regions);
    regions
}

/// Regions of both kinds merged into a single timeline ordered by start
/// date. The sort is stable, so same-date ties keep Oversold before
/// Overbought (the grouped order out of [`detect_regions`]).
pub fn merged_by_start(mut regions: Vec<Region>) -> Vec<Region> {
    regions.sort_by_key(|r| r.start);
    regions
}

struct RunTracker {
    kind: RegionKind,
    open: Option<NaiveDate>,
    regions: Vec<Region>,
}

impl RunTracker {
    fn new(kind: RegionKind) -> Self {
        Self {
            kind,
            open: None,
            regions: Vec::new(),
        }
    }

    fn step(&mut self, date: NaiveDate, breaching: bool) {
        match (self.open, breaching) {
            (None, true) => self.open = Some(date),
            (Some(start), false) => {
                self.regions.push(Region {
                    start,
                    end: date,
                    kind: self.kind,
                });
                self.open = None;
            }
            _ => {}
        }
    }

    fn finish(&mut self, last: NaiveDate) {
        if let Some(start) = self.open.take() {
            self.regions.push(Region {
                start,
                end: last,
                kind: self.kind,
            });
        }
    }
}
