use std::collections::BTreeMap;
use std::fmt::Display;

use libisa::Word;
use thiserror::Error;

/// The four segment kinds, in the order trace records list them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SegmentKind {
    Cs,
    Ds,
    Ss,
    Es,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 4] = [Self::Cs, Self::Ds, Self::Ss, Self::Es];
}

impl Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Cs => "Code Segment",
            Self::Ds => "Data Segment",
            Self::Ss => "Stack Segment",
            Self::Es => "Extra Segment",
        })
    }
}

/// An inclusive range of memory word indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRange {
    pub start: Word,
    pub end: Word,
}

impl SegmentRange {
    pub fn new(start: Word, end: Word) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, addr: Word) -> bool {
        addr >= self.start && addr <= self.end
    }

    /// Number of words covered; inclusive bounds make this at least one.
    pub fn size(&self) -> usize {
        (self.end - self.start) as usize + 1
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    #[error("missing {0}")]
    Missing(SegmentKind),

    #[error("{kind} start 0x{start:08x} is above its end 0x{end:08x}")]
    Reversed {
        kind: SegmentKind,
        start: Word,
        end: Word,
    },

    #[error("{kind} end 0x{end:08x} is outside a {size}-word memory")]
    OutOfBounds {
        kind: SegmentKind,
        end: Word,
        size: usize,
    },

    #[error("{first} and {second} overlap")]
    Overlap {
        first: SegmentKind,
        second: SegmentKind,
    },

    #[error("segments cover {total} words but the memory holds {size}")]
    TooLarge { total: usize, size: usize },
}

/// The validated segment layout. All four kinds are present, every range is
/// in bounds and forward, and no two ranges share an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentMap(BTreeMap<SegmentKind, SegmentRange>);

impl SegmentMap {
    pub fn new(
        ranges: BTreeMap<SegmentKind, SegmentRange>,
        memory_size: usize,
    ) -> Result<Self, SegmentError> {
        for kind in SegmentKind::ALL {
            if !ranges.contains_key(&kind) {
                return Err(SegmentError::Missing(kind));
            }
        }

        for (&kind, range) in &ranges {
            if range.start > range.end {
                return Err(SegmentError::Reversed {
                    kind,
                    start: range.start,
                    end: range.end,
                });
            }

            if range.end as usize >= memory_size {
                return Err(SegmentError::OutOfBounds {
                    kind,
                    end: range.end,
                    size: memory_size,
                });
            }
        }

        let mut by_start: Vec<_> = ranges.iter().map(|(&kind, &range)| (kind, range)).collect();
        by_start.sort_by_key(|(_, range)| range.start);

        for pair in by_start.windows(2) {
            let ((first, below), (second, above)) = (pair[0], pair[1]);

            if above.start <= below.end {
                return Err(SegmentError::Overlap { first, second });
            }
        }

        let total: usize = ranges.values().map(SegmentRange::size).sum();
        if total > memory_size {
            return Err(SegmentError::TooLarge {
                total,
                size: memory_size,
            });
        }

        Ok(Self(ranges))
    }

    pub fn get(&self, kind: SegmentKind) -> SegmentRange {
        *self
            .0
            .get(&kind)
            .expect("All segment kinds are present after validation")
    }

    pub fn contains(&self, kind: SegmentKind, addr: Word) -> bool {
        self.get(kind).contains(addr)
    }

    /// Segments in kind order, for trace emission.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentKind, SegmentRange)> + '_ {
        self.0.iter().map(|(&kind, &range)| (kind, range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BTreeMap<SegmentKind, SegmentRange> {
        BTreeMap::from([
            (SegmentKind::Cs, SegmentRange::new(0, 10)),
            (SegmentKind::Ds, SegmentRange::new(11, 20)),
            (SegmentKind::Ss, SegmentRange::new(21, 30)),
            (SegmentKind::Es, SegmentRange::new(31, 31)),
        ])
    }

    #[test]
    fn a_disjoint_covering_layout_validates() {
        let map = SegmentMap::new(config(), 50).expect("Valid layout");

        assert_eq!(map.get(SegmentKind::Ds), SegmentRange::new(11, 20));
        assert!(map.contains(SegmentKind::Ss, 21));
        assert!(map.contains(SegmentKind::Ss, 30));
        assert!(!map.contains(SegmentKind::Ss, 31));
    }

    #[test]
    fn every_kind_must_be_present() {
        let mut ranges = config();
        ranges.remove(&SegmentKind::Es);

        assert_eq!(
            SegmentMap::new(ranges, 50),
            Err(SegmentError::Missing(SegmentKind::Es))
        );
    }

    #[test]
    fn reversed_ranges_are_rejected() {
        let mut ranges = config();
        ranges.insert(SegmentKind::Es, SegmentRange::new(32, 31));

        assert_eq!(
            SegmentMap::new(ranges, 50),
            Err(SegmentError::Reversed {
                kind: SegmentKind::Es,
                start: 32,
                end: 31,
            })
        );
    }

    #[test]
    fn ranges_must_fit_the_memory() {
        let mut ranges = config();
        ranges.insert(SegmentKind::Es, SegmentRange::new(31, 50));

        assert_eq!(
            SegmentMap::new(ranges, 50),
            Err(SegmentError::OutOfBounds {
                kind: SegmentKind::Es,
                end: 50,
                size: 50,
            })
        );
    }

    #[test]
    fn overlapping_ranges_are_rejected() {
        let mut ranges = config();
        ranges.insert(SegmentKind::Es, SegmentRange::new(30, 31));

        assert_eq!(
            SegmentMap::new(ranges, 50),
            Err(SegmentError::Overlap {
                first: SegmentKind::Ss,
                second: SegmentKind::Es,
            })
        );
    }

    #[test]
    fn iteration_is_in_kind_order() {
        let map = SegmentMap::new(config(), 50).unwrap();
        let kinds: Vec<_> = map.iter().map(|(kind, _)| kind).collect();

        assert_eq!(kinds, SegmentKind::ALL);
    }
}
