//! Attach WordNet synsets to ground-truth verb and object labels.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Serialize;

use crate::dataset::Table;
use crate::error::DatasetResult;

/// Labels that could not be mapped cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingReport {
    pub rows: usize,
    /// Labels with no mapping; their synset cell is left empty
    pub missing_verbs: BTreeSet<String>,
    pub missing_objects: BTreeSet<String>,
    /// Labels with several mappings; the smallest synset name was used
    pub ambiguous_verbs: BTreeSet<String>,
    pub ambiguous_objects: BTreeSet<String>,
}

impl MappingReport {
    pub fn is_complete(&self) -> bool {
        self.missing_verbs.is_empty() && self.missing_objects.is_empty()
    }

    pub fn log(&self) {
        tracing::info!("Attached synsets to {} rows", self.rows);
        let joined = |set: &BTreeSet<String>| set.iter().cloned().collect::<Vec<_>>().join(", ");
        if !self.missing_verbs.is_empty() {
            tracing::warn!("Missing verb mappings: {}", joined(&self.missing_verbs));
        }
        if !self.missing_objects.is_empty() {
            tracing::warn!("Missing object mappings: {}", joined(&self.missing_objects));
        }
        if !self.ambiguous_verbs.is_empty() {
            tracing::warn!("Multiple synsets for verbs: {}", joined(&self.ambiguous_verbs));
        }
        if !self.ambiguous_objects.is_empty() {
            tracing::warn!("Multiple synsets for objects: {}", joined(&self.ambiguous_objects));
        }
    }
}

type LabelMap = HashMap<String, BTreeSet<String>>;

/// Label → synset mappings for verbs and objects.
#[derive(Debug, Clone, Default)]
pub struct SynsetMapper {
    verbs: LabelMap,
    objects: LabelMap,
}

enum Resolved<'a> {
    Missing,
    Unique(&'a str),
    Ambiguous(&'a str),
}

fn label_map(table: &Table, label: &str, synset: &str) -> DatasetResult<LabelMap> {
    let label_col = table.require_column(label)?;
    let synset_col = table.require_column(synset)?;
    let mut map = LabelMap::new();
    for record in table.records() {
        let synset = record[synset_col].trim();
        if synset.is_empty() {
            continue;
        }
        map.entry(record[label_col].trim().to_string())
            .or_default()
            .insert(synset.to_string());
    }
    Ok(map)
}

fn resolve<'a>(map: &'a LabelMap, label: &str) -> Resolved<'a> {
    let Some(synsets) = map.get(label) else {
        return Resolved::Missing;
    };
    let mut iter = synsets.iter();
    match (iter.next(), iter.next()) {
        (None, _) => Resolved::Missing,
        (Some(only), None) => Resolved::Unique(only),
        (Some(first), Some(_)) => Resolved::Ambiguous(first),
    }
}

impl SynsetMapper {
    /// Load the verb (`original_verb,synset`) and object (`Object,Synset`) maps.
    pub fn load(verb_map: &Path, object_map: &Path) -> DatasetResult<Self> {
        let mapper = Self::from_tables(&Table::read(verb_map)?, &Table::read(object_map)?)?;
        tracing::info!(
            "Loaded {} verb and {} object mappings",
            mapper.verbs.len(),
            mapper.objects.len()
        );
        Ok(mapper)
    }

    pub fn from_tables(verb_table: &Table, object_table: &Table) -> DatasetResult<Self> {
        Ok(Self {
            verbs: label_map(verb_table, "original_verb", "synset")?,
            objects: label_map(object_table, "Object", "Synset")?,
        })
    }

    /// Copy of `table` with `verb_synset` and `object_synset` columns set
    /// from its `verb` and `object` columns.
    pub fn attach(&self, table: &Table) -> DatasetResult<(Table, MappingReport)> {
        let verb_col = table.require_column("verb")?;
        let object_col = table.require_column("object")?;

        let mut report = MappingReport {
            rows: table.len(),
            ..MappingReport::default()
        };
        let mut verb_synsets = Vec::with_capacity(table.len());
        let mut object_synsets = Vec::with_capacity(table.len());

        for record in table.records() {
            let verb = record[verb_col].trim();
            let object = record[object_col].trim();
            verb_synsets.push(pick(
                resolve(&self.verbs, verb),
                verb,
                &mut report.missing_verbs,
                &mut report.ambiguous_verbs,
            ));
            object_synsets.push(pick(
                resolve(&self.objects, object),
                object,
                &mut report.missing_objects,
                &mut report.ambiguous_objects,
            ));
        }

        let mut out = table.clone();
        out.set_column("verb_synset", verb_synsets);
        out.set_column("object_synset", object_synsets);
        Ok((out, report))
    }
}

fn pick(
    resolved: Resolved<'_>,
    label: &str,
    missing: &mut BTreeSet<String>,
    ambiguous: &mut BTreeSet<String>,
) -> String {
    match resolved {
        Resolved::Missing => {
            missing.insert(label.to_string());
            String::new()
        }
        Resolved::Unique(synset) => synset.to_string(),
        Resolved::Ambiguous(synset) => {
            ambiguous.insert(label.to_string());
            synset.to_string()
        }
    }
}
