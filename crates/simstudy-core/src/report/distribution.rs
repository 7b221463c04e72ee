//! Category × similarity-level count matrix.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::types::CandidateRow;

/// Levels shown in every distribution, whether observed or not.
pub const REPORT_LEVELS: [u8; 5] = [0, 1, 2, 3, 4];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionTable {
    pub levels: Vec<u8>,
    /// Observed categories, ascending, each with one count per entry of `levels`
    pub counts: BTreeMap<u8, Vec<usize>>,
    /// Rows whose level is not one of `levels`
    pub outside: usize,
}

impl DistributionTable {
    pub fn from_rows(rows: &[CandidateRow], levels: &[u8]) -> Self {
        let mut counts: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
        let mut outside = 0;
        for row in rows {
            let cells = counts
                .entry(row.category)
                .or_insert_with(|| vec![0; levels.len()]);
            match levels.iter().position(|&l| l == row.similarity_level) {
                Some(col) => cells[col] += 1,
                None => outside += 1,
            }
        }
        Self {
            levels: levels.to_vec(),
            counts,
            outside,
        }
    }

    pub fn count(&self, category: u8, level: u8) -> usize {
        let Some(col) = self.levels.iter().position(|&l| l == level) else {
            return 0;
        };
        self.counts.get(&category).map_or(0, |cells| cells[col])
    }

    pub fn category_total(&self, category: u8) -> usize {
        self.counts.get(&category).map_or(0, |cells| cells.iter().sum())
    }

    pub fn level_total(&self, level: u8) -> usize {
        self.counts.keys().map(|&c| self.count(c, level)).sum()
    }

    pub fn total(&self) -> usize {
        self.counts.values().flatten().sum()
    }

    /// Plain-text table with row and column totals.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "{:<10}", "category");
        for level in &self.levels {
            let _ = write!(out, "{:>8}", format!("sim {level}"));
        }
        let _ = writeln!(out, "{:>8}", "total");

        for (category, cells) in &self.counts {
            let _ = write!(out, "{:<10}", category);
            for count in cells {
                let _ = write!(out, "{:>8}", count);
            }
            let _ = writeln!(out, "{:>8}", self.category_total(*category));
        }

        let _ = write!(out, "{:<10}", "total");
        for level in &self.levels {
            let _ = write!(out, "{:>8}", self.level_total(*level));
        }
        let _ = writeln!(out, "{:>8}", self.total());

        if self.outside > 0 {
            let _ = writeln!(out, "({} rows at other similarity levels)", self.outside);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::row_in_bin;

    fn rows() -> Vec<CandidateRow> {
        vec![
            row_in_bin("a", 1, 0),
            row_in_bin("b", 1, 2),
            row_in_bin("c", 1, 2),
            row_in_bin("d", 3, 4),
            row_in_bin("e", 3, 7),
        ]
    }

    #[test]
    fn missing_levels_are_zero() {
        let table = DistributionTable::from_rows(&rows(), &REPORT_LEVELS);
        assert_eq!(table.count(1, 2), 2);
        assert_eq!(table.count(1, 3), 0);
        assert_eq!(table.counts[&3], vec![0, 0, 0, 0, 1]);
        assert_eq!(table.count(2, 1), 0);
    }

    #[test]
    fn marginals_and_outside() {
        let table = DistributionTable::from_rows(&rows(), &REPORT_LEVELS);
        assert_eq!(table.category_total(1), 3);
        assert_eq!(table.category_total(3), 1);
        assert_eq!(table.level_total(2), 2);
        assert_eq!(table.total(), 4);
        assert_eq!(table.outside, 1);
    }

    #[test]
    fn render_lists_every_level_and_category() {
        let text = DistributionTable::from_rows(&rows(), &REPORT_LEVELS).render();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("sim 0") && lines[0].contains("sim 4"));
        assert!(lines[1].starts_with('1'));
        assert!(lines[2].starts_with('3'));
        assert!(lines[3].starts_with("total"));
        assert!(lines[3].trim_end().ends_with('4'));
        assert!(text.contains("1 rows at other similarity levels"));
    }
}
