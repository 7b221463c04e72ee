//! Candidate pool: typed prediction-vs-ground-truth rows.
//!
//! The nine comparison columns are parsed into [`CandidateRow`] fields;
//! every other column is carried through untouched and written back in its
//! original position.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::DatasetResult;
use crate::types::CandidateRow;

use super::table::{write_rows, Table};

/// The comparison columns every candidate table must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ImageId,
    Category,
    SimilarityLevel,
    GtVerb,
    GtObject,
    GtVerbSynset,
    GtObjectSynset,
    PredVerbSynset,
    PredObjectSynset,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::ImageId,
        Field::Category,
        Field::SimilarityLevel,
        Field::GtVerb,
        Field::GtObject,
        Field::GtVerbSynset,
        Field::GtObjectSynset,
        Field::PredVerbSynset,
        Field::PredObjectSynset,
    ];

    /// Column header for this field.
    pub fn column(self) -> &'static str {
        match self {
            Field::ImageId => "image_id",
            Field::Category => "category",
            Field::SimilarityLevel => "similarity_level",
            Field::GtVerb => "gt_verb",
            Field::GtObject => "gt_object",
            Field::GtVerbSynset => "gt_verb_synset",
            Field::GtObjectSynset => "gt_object_synset",
            Field::PredVerbSynset => "pred_verb_synset",
            Field::PredObjectSynset => "pred_object_synset",
        }
    }
}

/// Where an output column's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Field(Field),
    Passthrough(usize),
}

/// A loaded candidate table.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    headers: Vec<String>,
    layout: Vec<Slot>,
    rows: Vec<CandidateRow>,
}

impl CandidatePool {
    /// Load and validate a candidate CSV.
    ///
    /// Fails on the first missing comparison column or unparseable
    /// category / similarity level.
    pub fn load(path: &Path) -> DatasetResult<Self> {
        let table = Table::read(path)?;
        let pool = Self::from_table(&table)?;
        tracing::info!("Loaded {} candidate rows from {:?}", pool.len(), path);
        Ok(pool)
    }

    /// Build a pool from an already-read table.
    pub fn from_table(table: &Table) -> DatasetResult<Self> {
        let mut positions = [0usize; 9];
        for (slot, field) in positions.iter_mut().zip(Field::ALL) {
            *slot = table.require_column(field.column())?;
        }

        let mut layout = Vec::with_capacity(table.headers().len());
        let mut passthrough = 0;
        for idx in 0..table.headers().len() {
            match Field::ALL.iter().zip(positions).find(|(_, pos)| *pos == idx) {
                Some((field, _)) => layout.push(Slot::Field(*field)),
                None => {
                    layout.push(Slot::Passthrough(passthrough));
                    passthrough += 1;
                }
            }
        }

        let mut rows = Vec::with_capacity(table.len());
        for (i, record) in table.records().iter().enumerate() {
            let cell = |field: Field| record[positions[field as usize]].as_str();

            let category = parse_small_int(cell(Field::Category))
                .ok_or_else(|| table.invalid_value(i, "category", cell(Field::Category)))?;
            let similarity_level = parse_small_int(cell(Field::SimilarityLevel)).ok_or_else(|| {
                table.invalid_value(i, "similarity_level", cell(Field::SimilarityLevel))
            })?;

            let extra = layout
                .iter()
                .zip(record)
                .filter(|(slot, _)| matches!(slot, Slot::Passthrough(_)))
                .map(|(_, value)| value.clone())
                .collect();

            rows.push(CandidateRow {
                image_id: cell(Field::ImageId).to_string(),
                category,
                similarity_level,
                gt_verb: cell(Field::GtVerb).to_string(),
                gt_object: cell(Field::GtObject).to_string(),
                gt_verb_synset: cell(Field::GtVerbSynset).to_string(),
                gt_object_synset: cell(Field::GtObjectSynset).to_string(),
                pred_verb_synset: cell(Field::PredVerbSynset).to_string(),
                pred_object_synset: cell(Field::PredObjectSynset).to_string(),
                extra,
            });
        }

        Ok(Self {
            headers: table.headers().to_vec(),
            layout,
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[CandidateRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [CandidateRow] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// How often image ids repeat across the pool.
    pub fn image_id_stats(&self, top: usize) -> ImageIdSummary {
        ImageIdSummary::from_rows(&self.rows, top)
    }

    /// Render one row as cells in this pool's column order.
    pub fn render(&self, row: &CandidateRow) -> Vec<String> {
        self.layout
            .iter()
            .map(|slot| match slot {
                Slot::Field(field) => row.field(*field),
                Slot::Passthrough(i) => row.extra.get(*i).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Write the given rows (which must share this pool's columns) to a CSV file.
    pub fn write_rows(&self, path: &Path, rows: &[CandidateRow]) -> DatasetResult<()> {
        let rendered: Vec<Vec<String>> = rows.iter().map(|row| self.render(row)).collect();
        write_rows(path, &self.headers, rendered.iter().map(|r| r.as_slice()))?;
        tracing::info!("Wrote {} rows to {:?}", rows.len(), path);
        Ok(())
    }

    /// Write every row of the pool.
    pub fn write(&self, path: &Path) -> DatasetResult<()> {
        self.write_rows(path, &self.rows)
    }
}

/// Number of most-repeated image ids kept in an [`ImageIdSummary`].
pub const TOP_REPEATED_IDS: usize = 10;

/// Repetition of `image_id` values across a set of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageIdSummary {
    pub rows: usize,
    pub unique_ids: usize,
    /// Ids that appear on more than one row
    pub repeated_ids: usize,
    /// Repeated ids with their row counts, most frequent first
    pub most_repeated: Vec<(String, usize)>,
}

impl ImageIdSummary {
    /// Count ids over `rows`, keeping at most `top` repeated ids.
    /// Ties are ordered by id.
    pub fn from_rows(rows: &[CandidateRow], top: usize) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for row in rows {
            *counts.entry(row.image_id.as_str()).or_insert(0) += 1;
        }

        let mut repeated: Vec<(String, usize)> = counts
            .iter()
            .filter(|(_, n)| **n > 1)
            .map(|(id, n)| (id.to_string(), *n))
            .collect();
        repeated.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let repeated_ids = repeated.len();
        repeated.truncate(top);

        Self {
            rows: rows.len(),
            unique_ids: counts.len(),
            repeated_ids,
            most_repeated: repeated,
        }
    }

    pub fn log(&self) {
        tracing::info!(
            "{} unique image ids across {} rows; {} appear more than once",
            self.unique_ids,
            self.rows,
            self.repeated_ids
        );
        for (id, count) in &self.most_repeated {
            tracing::debug!("  {}: {} rows", id, count);
        }
    }
}

/// Parse a small non-negative integer, accepting float spellings such as
/// `"2.0"` written by spreadsheet tools.
fn parse_small_int(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u8>() {
        return Some(value);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&value) {
        Some(value as u8)
    } else {
        None
    }
}
