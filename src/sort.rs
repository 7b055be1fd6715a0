//! Pluggable post-clip sort strategies, independent of the hatch strategy
//! that generated the segments.

use std::str::FromStr;

use crate::errors::ConfigError;
use crate::geometry::Point2;

/// Operates on the already tag-sorted, flattened (p0, p1) pairs of a hatch
/// pass.
pub trait SortStrategy: Send + Sync {
    fn sort(&self, segments: Vec<(Point2, Point2)>) -> Vec<(Point2, Point2)>;
}

/// No-op: preserves generation/tag order.
pub struct IdentitySort;

impl SortStrategy for IdentitySort {
    fn sort(&self, segments: Vec<(Point2, Point2)>) -> Vec<(Point2, Point2)> {
        segments
    }
}

/// Flips every other vector so that consecutive segments share an endpoint
/// where possible, without reordering them.
pub struct AlternateSort;

impl SortStrategy for AlternateSort {
    fn sort(&self, segments: Vec<(Point2, Point2)>) -> Vec<(Point2, Point2)> {
        segments
            .into_iter()
            .enumerate()
            .map(|(i, (p0, p1))| if i % 2 == 1 { (p1, p0) } else { (p0, p1) })
            .collect()
    }
}

/// Greedy nearest-neighbour travel reordering, in the style of the
/// optimizer's `Greedy` strategy: repeatedly picks the remaining segment
/// whose nearer endpoint is closest to the current cursor.
pub struct LinearSort;

impl SortStrategy for LinearSort {
    fn sort(&self, mut segments: Vec<(Point2, Point2)>) -> Vec<(Point2, Point2)> {
        if segments.is_empty() {
            return segments;
        }
        let mut ordered = Vec::with_capacity(segments.len());
        let first = segments.remove(0);
        let mut cursor = first.1;
        ordered.push(first);

        while !segments.is_empty() {
            let (idx, flip) = segments
                .iter()
                .enumerate()
                .map(|(i, (p0, p1))| {
                    let d0 = distance(cursor, *p0);
                    let d1 = distance(cursor, *p1);
                    if d0 <= d1 {
                        (i, false, d0)
                    } else {
                        (i, true, d1)
                    }
                })
                .min_by(|a, b| a.2.partial_cmp(&b.2).unwrap())
                .map(|(i, flip, _)| (i, flip))
                .expect("segments is non-empty");

            let (p0, p1) = segments.remove(idx);
            let next = if flip { (p1, p0) } else { (p0, p1) };
            cursor = next.1;
            ordered.push(next);
        }
        ordered
    }
}

fn distance(a: Point2, b: Point2) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// The pluggable sort strategy a recipe may be configured with, named the
/// way the original hatcher's `hatchSortMethod` parameter was: a string
/// selecting one of a closed set of strategies.
pub enum SortMethod {
    Identity,
    Alternate,
    Linear,
}

impl SortMethod {
    pub fn to_strategy(&self) -> Box<dyn SortStrategy> {
        match self {
            SortMethod::Identity => Box::new(IdentitySort),
            SortMethod::Alternate => Box::new(AlternateSort),
            SortMethod::Linear => Box::new(LinearSort),
        }
    }
}

impl FromStr for SortMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(SortMethod::Identity),
            "alternate" => Ok(SortMethod::Alternate),
            "linear" => Ok(SortMethod::Linear),
            other => Err(ConfigError::UnknownSortStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::coord;

    #[test]
    fn alternate_flips_odd_indices_only() {
        let segments = vec![
            (coord! {x: 0.0, y: 0.0}, coord! {x: 1.0, y: 0.0}),
            (coord! {x: 2.0, y: 0.0}, coord! {x: 3.0, y: 0.0}),
        ];
        let sorted = AlternateSort.sort(segments);
        assert_eq!(sorted[0], (coord! {x: 0.0, y: 0.0}, coord! {x: 1.0, y: 0.0}));
        assert_eq!(sorted[1], (coord! {x: 3.0, y: 0.0}, coord! {x: 2.0, y: 0.0}));
    }

    #[test]
    fn linear_sort_minimizes_consecutive_jumps() {
        let segments = vec![
            (coord! {x: 0.0, y: 0.0}, coord! {x: 1.0, y: 0.0}),
            (coord! {x: 10.0, y: 0.0}, coord! {x: 11.0, y: 0.0}),
            (coord! {x: 2.0, y: 0.0}, coord! {x: 3.0, y: 0.0}),
        ];
        let sorted = LinearSort.sort(segments);
        assert_eq!(sorted.len(), 3);
        assert_eq!(sorted[0], (coord! {x: 0.0, y: 0.0}, coord! {x: 1.0, y: 0.0}));
        assert_eq!(sorted[1], (coord! {x: 2.0, y: 0.0}, coord! {x: 3.0, y: 0.0}));
    }

    #[test]
    fn unknown_sort_method_fails_fast() {
        assert!(matches!(
            "bogus".parse::<SortMethod>(),
            Err(ConfigError::UnknownSortStrategy(_))
        ));
    }
}
