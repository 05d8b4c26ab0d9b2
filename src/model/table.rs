//! Coordinate-indexed annotation table.
//!
//! One row per coordinate of the leading dimensions of an image stack, keyed
//! by the tuple of per-dimension indices. Rows keep their insertion order so a
//! table is persisted exactly as it was built or loaded.

use std::collections::HashMap;

use crate::constants::{CLASS_COLUMN, GENERIC_LEVEL_PREFIX};

/// Errors raised by table construction and lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A coordinate has a different number of indices than the table has levels
    #[error("Coordinate {coord:?} has {found} indices, expected {expected}")]
    Arity {
        coord: Vec<usize>,
        expected: usize,
        found: usize,
    },

    /// The same coordinate appears twice
    #[error("Duplicate coordinate {0:?}")]
    DuplicateCoordinate(Vec<usize>),

    /// Coordinate has no row in the table
    #[error("No row for coordinate {0:?}")]
    UnknownCoordinate(Vec<usize>),

    /// Loaded key columns differ from the configured levels
    #[error("Key columns {found:?} do not match levels {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Loaded rows do not cover the image shape exactly
    #[error("Table does not cover shape {shape:?}: {reason}")]
    Coverage { shape: Vec<usize>, reason: String },
}

/// A single annotation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    /// Per-level indices, in level order
    pub coords: Vec<usize>,
    /// Assigned class, None until annotated
    pub annotated_class: Option<String>,
}

impl AnnotationRow {
    /// Create an unannotated row.
    pub fn new(coords: Vec<usize>) -> Self {
        Self {
            coords,
            annotated_class: None,
        }
    }

    /// Set the class of this row.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.annotated_class = Some(class.into());
        self
    }
}

/// Why configured level names were replaced by generic ones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelMismatch {
    /// Wrong number of names for the leading dimensions
    #[error("{configured} level names configured for {dims} leading dimensions")]
    Count { configured: usize, dims: usize },

    /// A blank name cannot label a key column
    #[error("level names must not be empty")]
    EmptyName,

    /// The same name is used for two dimensions
    #[error("level name '{0}' is used more than once")]
    Duplicate(String),

    /// The name collides with the class column
    #[error("level name '{0}' is reserved for the class column")]
    Reserved(String),
}

/// Result of matching configured level names against an image shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLevels {
    /// Level names to use, one per leading dimension
    pub names: Vec<String>,
    /// Set when a non-empty configured list could not be used
    pub mismatch: Option<LevelMismatch>,
}

/// Generated level names for `count` dimensions.
pub fn generic_levels(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{}{}", GENERIC_LEVEL_PREFIX, i))
        .collect()
}

/// Check that every name can be written as its own key column.
fn check_level_names(levels: &[String]) -> Result<(), LevelMismatch> {
    for (i, name) in levels.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(LevelMismatch::EmptyName);
        }
        if name == CLASS_COLUMN {
            return Err(LevelMismatch::Reserved(name.clone()));
        }
        if levels[..i].contains(name) {
            return Err(LevelMismatch::Duplicate(name.clone()));
        }
    }
    Ok(())
}

/// Match configured level names to the leading shape.
///
/// Falls back to [`generic_levels`] when the list is empty, its length does
/// not match the number of leading dimensions, or a name is blank, repeated
/// or equal to the class column.
pub fn resolve_levels(levels: &[String], shape: &[usize]) -> ResolvedLevels {
    if levels.is_empty() {
        return ResolvedLevels {
            names: generic_levels(shape.len()),
            mismatch: None,
        };
    }

    let checked = if levels.len() == shape.len() {
        check_level_names(levels)
    } else {
        Err(LevelMismatch::Count {
            configured: levels.len(),
            dims: shape.len(),
        })
    };

    match checked {
        Ok(()) => ResolvedLevels {
            names: levels.to_vec(),
            mismatch: None,
        },
        Err(mismatch) => ResolvedLevels {
            names: generic_levels(shape.len()),
            mismatch: Some(mismatch),
        },
    }
}

/// Annotation table keyed by coordinate tuples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationTable {
    levels: Vec<String>,
    rows: Vec<AnnotationRow>,
    index: HashMap<Vec<usize>, usize>,
}

impl AnnotationTable {
    /// Build the full Cartesian product of `0..shape[i]` for every level.
    ///
    /// `levels` must already be resolved against `shape` (see
    /// [`resolve_levels`]). Rows are generated in lexicographic order.
    pub fn build(levels: Vec<String>, shape: &[usize]) -> Self {
        let total: usize = shape.iter().product();
        let mut rows = Vec::with_capacity(total);

        if total > 0 {
            let mut coord = vec![0usize; shape.len()];
            loop {
                rows.push(AnnotationRow::new(coord.clone()));
                if !crate::walker::increment(&mut coord, shape) {
                    break;
                }
            }
        }

        log::debug!(
            "Built annotation table: levels={:?}, shape={:?}, rows={}",
            levels,
            shape,
            rows.len()
        );

        let index = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.coords.clone(), i))
            .collect();

        Self {
            levels,
            rows,
            index,
        }
    }

    /// Assemble a table from existing rows, rejecting duplicate or malformed keys.
    pub fn from_rows(levels: Vec<String>, rows: Vec<AnnotationRow>) -> Result<Self, TableError> {
        let mut index = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.coords.len() != levels.len() {
                return Err(TableError::Arity {
                    coord: row.coords.clone(),
                    expected: levels.len(),
                    found: row.coords.len(),
                });
            }
            if index.insert(row.coords.clone(), i).is_some() {
                return Err(TableError::DuplicateCoordinate(row.coords.clone()));
            }
        }

        Ok(Self {
            levels,
            rows,
            index,
        })
    }

    /// Reorder key columns to `levels`, matching by name.
    ///
    /// Fails when the set of key column names differs from `levels`.
    pub fn rekey(self, levels: &[String]) -> Result<Self, TableError> {
        if self.levels == levels {
            return Ok(self);
        }

        let mut sorted_found = self.levels.clone();
        let mut sorted_expected = levels.to_vec();
        sorted_found.sort();
        sorted_expected.sort();
        if sorted_found != sorted_expected {
            return Err(TableError::SchemaMismatch {
                expected: levels.to_vec(),
                found: self.levels,
            });
        }

        // position of each target level in the current column order
        let order: Vec<usize> = levels
            .iter()
            .filter_map(|name| self.levels.iter().position(|l| l == name))
            .collect();

        log::info!("Re-keying table columns {:?} -> {:?}", self.levels, levels);

        let rows = self
            .rows
            .into_iter()
            .map(|row| AnnotationRow {
                coords: order.iter().map(|&i| row.coords[i]).collect(),
                annotated_class: row.annotated_class,
            })
            .collect();

        Self::from_rows(levels.to_vec(), rows)
    }

    /// Check that every coordinate inside `shape` has exactly one row.
    pub fn validate_coverage(&self, shape: &[usize]) -> Result<(), TableError> {
        if shape.len() != self.levels.len() {
            return Err(TableError::Coverage {
                shape: shape.to_vec(),
                reason: format!(
                    "table has {} levels, image has {} leading dimensions",
                    self.levels.len(),
                    shape.len()
                ),
            });
        }

        let expected: usize = shape.iter().product();
        if self.rows.len() != expected {
            return Err(TableError::Coverage {
                shape: shape.to_vec(),
                reason: format!("{} rows, expected {}", self.rows.len(), expected),
            });
        }

        // keys are unique, so count + bounds imply full coverage
        if let Some(row) = self
            .rows
            .iter()
            .find(|row| row.coords.iter().zip(shape).any(|(&c, &s)| c >= s))
        {
            return Err(TableError::Coverage {
                shape: shape.to_vec(),
                reason: format!("coordinate {:?} is out of bounds", row.coords),
            });
        }

        Ok(())
    }

    /// Level (key column) names.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Rows in table order.
    pub fn rows(&self) -> &[AnnotationRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a coordinate.
    pub fn get(&self, coord: &[usize]) -> Option<&AnnotationRow> {
        self.index.get(coord).map(|&i| &self.rows[i])
    }

    /// Class assigned at a coordinate (None if unannotated or unknown).
    pub fn class_at(&self, coord: &[usize]) -> Option<&str> {
        self.get(coord)?.annotated_class.as_deref()
    }

    /// Write a class at a coordinate, returning the previous class.
    pub fn set_class(
        &mut self,
        coord: &[usize],
        class: impl Into<String>,
    ) -> Result<Option<String>, TableError> {
        let &i = self
            .index
            .get(coord)
            .ok_or_else(|| TableError::UnknownCoordinate(coord.to_vec()))?;
        Ok(self.rows[i].annotated_class.replace(class.into()))
    }

    /// Number of rows carrying a class.
    pub fn annotated_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.annotated_class.is_some())
            .count()
    }

    /// Per-class row counts, in order of first appearance.
    pub fn class_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for class in self.rows.iter().filter_map(|r| r.annotated_class.as_deref()) {
            match counts.iter_mut().find(|(name, _)| name == class) {
                Some((_, count)) => *count += 1,
                None => counts.push((class.to_string(), 1)),
            }
        }
        counts
    }
}
