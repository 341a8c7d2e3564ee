//! Header resolution against the fixed input column set.

use std::collections::BTreeMap;
use std::path::Path;

use esm_model::Column;

use crate::error::{IngestError, Result};

/// Unprefixed country header. Two of them are read by position: the first is
/// the customer's country, the second the store's.
const POSITIONAL_COUNTRY: &str = "country";

/// Positions of the known columns in one input file's header.
///
/// Resolved once from the header row; records are then read by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSchema {
    positions: BTreeMap<Column, usize>,
    ignored: Vec<String>,
    width: usize,
}

impl InputSchema {
    /// Resolve header cells against [`Column::ALL`].
    ///
    /// Plain `country` headers must come in a pair (customer, then store).
    /// Fails on a lone or extra `country`, on duplicated headers and on
    /// missing required columns. Unknown headers are kept aside and ignored.
    pub fn resolve<'a>(headers: impl IntoIterator<Item = &'a str>, path: &Path) -> Result<Self> {
        let mut positions = BTreeMap::new();
        let mut ignored = Vec::new();
        let mut countries = Vec::new();
        let mut width = 0;

        for (index, header) in headers.into_iter().enumerate() {
            width = index + 1;
            let cleaned = clean_header(header);

            if cleaned.eq_ignore_ascii_case(POSITIONAL_COUNTRY) {
                countries.push(index);
                continue;
            }
            match Column::from_header(cleaned) {
                Some(column) => insert_position(&mut positions, column, index, path)?,
                None => ignored.push(cleaned.to_string()),
            }
        }

        match countries.as_slice() {
            [] => {}
            [customer, store] => {
                insert_position(&mut positions, Column::CustomerCountry, *customer, path)?;
                insert_position(&mut positions, Column::StoreCountry, *store, path)?;
            }
            _ => {
                return Err(IngestError::AmbiguousColumn {
                    column: POSITIONAL_COUNTRY.to_string(),
                    hint: "two country columns (customer, then store) or customer_country and store_country",
                    path: path.to_path_buf(),
                });
            }
        }

        let missing: Vec<String> = Column::required()
            .filter(|column| !positions.contains_key(column))
            .map(|column| column.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns {
                path: path.to_path_buf(),
                columns: missing,
            });
        }

        Ok(Self {
            positions,
            ignored,
            width,
        })
    }

    /// Position of a column in the header, if present.
    pub fn position(&self, column: Column) -> Option<usize> {
        self.positions.get(&column).copied()
    }

    pub fn contains(&self, column: Column) -> bool {
        self.positions.contains_key(&column)
    }

    /// Known columns present in the header, in canonical order.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.positions.keys().copied()
    }

    /// Optional columns absent from the header.
    pub fn absent_optional(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| !column.is_required() && !self.contains(*column))
            .collect()
    }

    /// Header cells that matched no known column.
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    /// Number of header cells.
    pub fn width(&self) -> usize {
        self.width
    }
}

fn insert_position(
    positions: &mut BTreeMap<Column, usize>,
    column: Column,
    index: usize,
    path: &Path,
) -> Result<()> {
    if positions.insert(column, index).is_some() {
        return Err(IngestError::DuplicateColumn {
            column: column.name().to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn clean_header(header: &str) -> &str {
    header.trim().trim_start_matches('\u{feff}').trim()
}
