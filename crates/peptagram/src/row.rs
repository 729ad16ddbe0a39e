use fnv::FnvHashMap;

use crate::Error;

/// A single record from a tab-separated table, addressed by column name.
///
/// Column names are normalized (trimmed, lowercased) on insertion so that
/// lookups match regardless of header casing. Values are stored verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: FnvHashMap<String, String>,
}

impl Row {
    pub fn insert<C, V>(&mut self, column: C, value: V)
    where
        C: AsRef<str>,
        V: Into<String>,
    {
        self.fields
            .insert(column.as_ref().trim().to_lowercase(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(|s| s.as_str())
    }

    /// The value of the first candidate column present in this row.
    ///
    /// Upstream tools disagree on some column names between versions
    /// (e.g. `scan number` vs `spectrum index`), so logical attributes
    /// are resolved through an ordered candidate list.
    pub fn get_first(&self, columns: &[&str]) -> Option<&str> {
        columns.iter().find_map(|c| self.get(c))
    }

    pub fn require(&self, column: &str) -> Result<&str, Error> {
        self.get(column)
            .ok_or_else(|| Error::MissingColumn(column.to_string()))
    }

    /// Parse a required column as a float. Malformed numerics are fatal.
    pub fn f64(&self, column: &str) -> Result<f64, Error> {
        parse_f64(column, self.require(column)?)
    }

    /// Parse the first present candidate column as a float, or `None`
    /// when no candidate is present.
    pub fn f64_first(&self, columns: &[&str]) -> Result<Option<f64>, Error> {
        for column in columns {
            if let Some(value) = self.get(column) {
                return parse_f64(column, value).map(Some);
            }
        }
        Ok(None)
    }
}

fn parse_f64(column: &str, value: &str) -> Result<f64, Error> {
    value.trim().parse::<f64>().map_err(|_| Error::InvalidNumber {
        column: column.to_string(),
        value: value.to_string(),
    })
}

impl<C, V> FromIterator<(C, V)> for Row
where
    C: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut row = Row::default();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}
