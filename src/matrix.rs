//! Labeled square distance matrices.
//!
//! Distances come either from a CSV file (a `Label` column, an optional
//! `Region` column, then one distance column per label) or are derived from
//! circuit coordinates. Labels are trimmed and must be unique; every label
//! pair must have an entry. Lookups for `(a, b)` and `(b, a)` are always
//! independent so asymmetric data would be honored as-is; only the diagonal
//! is forced to 0.

use std::collections::HashMap;
use std::path::Path;

use crate::circuit::{haversine_km, Circuit};
use crate::error::{Error, Result};

/// A square matrix of non-negative reals keyed by circuit label.
#[derive(Debug, Clone)]
pub struct LabeledMatrix {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<Vec<f64>>,
    regions: HashMap<String, String>,
}

impl LabeledMatrix {
    /// Build a matrix from ordered labels and row-major values.
    ///
    /// Labels are trimmed; duplicates, non-square data and negative entries
    /// are rejected. Diagonal entries are ignored and stored as exactly 0.
    pub fn new(labels: Vec<String>, values: Vec<Vec<f64>>) -> Result<Self> {
        Self::with_regions(labels, values, HashMap::new())
    }

    /// Same as [`LabeledMatrix::new`] with a per-label region tag map.
    pub fn with_regions(
        labels: Vec<String>,
        mut values: Vec<Vec<f64>>,
        regions: HashMap<String, String>,
    ) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(|l| l.trim().to_string()).collect();

        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), i).is_some() {
                return Err(Error::DuplicateLabel(label.clone()));
            }
        }

        if values.len() != labels.len() {
            return Err(Error::NotSquare {
                rows: values.len(),
                cols: labels.len(),
            });
        }
        for row in &values {
            if row.len() != labels.len() {
                return Err(Error::NotSquare {
                    rows: values.len(),
                    cols: row.len(),
                });
            }
        }

        for (i, row) in values.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                if i == j {
                    *value = 0.0;
                } else if *value < 0.0 {
                    return Err(Error::NegativeDistance {
                        from: labels[i].clone(),
                        to: labels[j].clone(),
                        distance: *value,
                    });
                }
            }
        }

        let regions = regions
            .into_iter()
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();

        Ok(LabeledMatrix {
            labels,
            index,
            values,
            regions,
        })
    }

    /// Load a matrix from a CSV file.
    ///
    /// Expected header: `Label[,Region],<label 1>,<label 2>,...` with one row
    /// per label. Surrounding whitespace in labels is stripped on both axes.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let mut columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        if columns.is_empty() || columns[0] != "Label" {
            return Err(Error::invalid_matrix(
                "matrix file must start with a 'Label' column",
            ));
        }
        columns.remove(0);
        let has_region = columns.first().map(String::as_str) == Some("Region");
        if has_region {
            columns.remove(0);
        }

        let mut labels = Vec::new();
        let mut values = Vec::new();
        let mut regions = HashMap::new();

        for record in reader.records() {
            let record = record?;
            let mut fields = record.iter();
            let label = fields
                .next()
                .ok_or_else(|| Error::invalid_matrix("empty matrix row"))?
                .trim()
                .to_string();
            if has_region {
                if let Some(region) = fields.next() {
                    regions.insert(label.clone(), region.trim().to_string());
                }
            }
            let mut row = Vec::with_capacity(columns.len());
            for (col, field) in columns.iter().zip(fields) {
                let value: f64 = field.parse().map_err(|_| Error::MissingEntry {
                    from: label.clone(),
                    to: col.clone(),
                })?;
                row.push(value);
            }
            if row.len() != columns.len() {
                return Err(Error::MissingEntry {
                    from: label.clone(),
                    to: columns.get(row.len()).cloned().unwrap_or_default(),
                });
            }
            labels.push(label);
            values.push(row);
        }

        // Row labels must match the distance columns one-to-one
        if labels != columns {
            return Err(Error::NotSquare {
                rows: labels.len(),
                cols: columns.len(),
            });
        }

        Self::with_regions(labels, values, regions)
    }

    /// Derive a geographic matrix from circuit coordinates.
    ///
    /// Regions are taken from the circuits' continents.
    pub fn from_circuits(circuits: &[Circuit]) -> Result<Self> {
        let labels: Vec<String> = circuits.iter().map(|c| c.name.clone()).collect();
        let n = circuits.len();
        let mut values = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    values[i][j] = haversine_km(
                        circuits[i].lat,
                        circuits[i].lon,
                        circuits[j].lat,
                        circuits[j].lon,
                    );
                }
            }
        }
        let regions = circuits
            .iter()
            .map(|c| (c.name.clone(), c.continent.clone()))
            .collect();
        Self::with_regions(labels, values, regions)
    }

    /// Ordered labels, matching row/column order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Region tag for a label, when the source supplied one.
    pub fn region(&self, label: &str) -> Option<&str> {
        self.regions.get(label).map(String::as_str)
    }

    pub fn regions(&self) -> &HashMap<String, String> {
        &self.regions
    }

    /// Distance from `a` to `b`. Unknown labels are a fatal input error.
    pub fn get(&self, a: &str, b: &str) -> Result<f64> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        Ok(self.values[i][j])
    }

    fn position(&self, label: &str) -> Result<usize> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| Error::UnknownLabel(label.to_string()))
    }

    /// Restrict the matrix to an ordered subset of labels.
    pub fn submatrix(&self, nodes: &[String]) -> Result<LabeledMatrix> {
        let positions: Vec<usize> = nodes
            .iter()
            .map(|n| self.position(n))
            .collect::<Result<_>>()?;

        let values = positions
            .iter()
            .map(|&i| positions.iter().map(|&j| self.values[i][j]).collect())
            .collect();
        let regions = nodes
            .iter()
            .filter_map(|n| self.regions.get(n).map(|r| (n.clone(), r.clone())))
            .collect();
        Self::with_regions(nodes.to_vec(), values, regions)
    }

    /// Elementwise transform of every off-diagonal entry; the diagonal stays
    /// exactly 0 regardless of what the transform would produce.
    pub fn map_edges<F>(&self, mut f: F) -> Result<LabeledMatrix>
    where
        F: FnMut(&str, &str, f64) -> Result<f64>,
    {
        let n = self.len();
        let mut values = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    values[i][j] = f(&self.labels[i], &self.labels[j], self.values[i][j])?;
                }
            }
        }
        Self::with_regions(self.labels.clone(), values, self.regions.clone())
    }
}
