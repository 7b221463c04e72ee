//! Annotation question rendering.
//!
//! Each comparison row becomes one question: the ground-truth label next to
//! the predicted label, followed by the definitions of all four synsets and
//! a fixed set of answer choices.

use std::collections::HashMap;
use std::path::Path;

use crate::dataset::Table;
use crate::error::DatasetResult;
use crate::types::{CandidateRow, Question};

/// Rendered in place of a definition the gloss table does not have.
pub const MISSING_DEFINITION: &str = "[Definition not found]";

/// Synset definitions keyed by synset name.
#[derive(Debug, Clone, Default)]
pub struct GlossTable {
    definitions: HashMap<String, String>,
}

impl GlossTable {
    /// Load a `synset,definition` CSV file.
    pub fn load(path: &Path) -> DatasetResult<Self> {
        let table = Table::read(path)?;
        let glosses = Self::from_table(&table)?;
        tracing::info!("Loaded {} definitions from {:?}", glosses.len(), path);
        Ok(glosses)
    }

    pub fn from_table(table: &Table) -> DatasetResult<Self> {
        let synset = table.require_column("synset")?;
        let definition = table.require_column("definition")?;
        let definitions = table
            .records()
            .iter()
            .map(|r| (r[synset].trim().to_string(), r[definition].trim().to_string()))
            .filter(|(_, d)| !d.is_empty())
            .collect();
        Ok(Self { definitions })
    }

    pub fn insert(&mut self, synset: &str, definition: &str) {
        self.definitions
            .insert(synset.to_string(), definition.to_string());
    }

    pub fn definition(&self, synset: &str) -> &str {
        self.definitions
            .get(synset)
            .map(String::as_str)
            .unwrap_or(MISSING_DEFINITION)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Lemma part of a synset name: `ride.v.01` → `ride`.
pub fn lemma(synset: &str) -> &str {
    synset.split('.').next().unwrap_or(synset)
}

pub struct QuestionBuilder<'a> {
    glosses: &'a GlossTable,
    choices: &'a [String],
}

impl<'a> QuestionBuilder<'a> {
    pub fn new(glosses: &'a GlossTable, choices: &'a [String]) -> Self {
        Self { glosses, choices }
    }

    /// Question text for one comparison row.
    pub fn render(&self, row: &CandidateRow) -> String {
        let definition = |synset: &str| {
            format!("→ Definition {}: {}", synset, self.glosses.definition(synset))
        };
        format!(
            "Please compare the following labels:<br><br>\
             <span style='font-weight:bold; color:#D6455C;'>  {} {} (ground truth) ↔ \
             {} {} (prediction)</span><br><br>\
             {}<br>{}<br>{}<br>{}<br><br>\
             How similar is the prediction to the ground truth?<br>\
             The prediction describes ...",
            row.gt_verb,
            row.gt_object,
            lemma(&row.pred_verb_synset),
            lemma(&row.pred_object_synset),
            definition(&row.gt_object_synset),
            definition(&row.gt_verb_synset),
            definition(&row.pred_object_synset),
            definition(&row.pred_verb_synset),
        )
    }

    /// Question `id` for `row`.
    pub fn question(&self, id: usize, row: &CandidateRow) -> Question {
        Question {
            id,
            question: self.render(row),
            choices: self.choices.to_vec(),
        }
    }

    /// One question per row, numbered from 1 in row order.
    pub fn build(&self, rows: &[CandidateRow]) -> Vec<Question> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| self.question(i + 1, row))
            .collect()
    }
}
