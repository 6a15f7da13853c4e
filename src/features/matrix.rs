// Feature matrix type
// Dense row-major 2-D f32 matrix shared by extractors and the CSV writers

/// A 2-D feature matrix, row-major
///
/// Built-in extractors produce feature channels as rows and analysis frames as
/// columns. All rows have equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<Vec<f32>>,
}

impl FeatureMatrix {
    /// A matrix with no rows at all
    pub fn empty() -> Self {
        FeatureMatrix { rows: Vec::new() }
    }

    pub fn from_rows(rows: Vec<Vec<f32>>) -> Self {
        FeatureMatrix { rows }
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Return the transpose: element (i, j) becomes element (j, i)
    pub fn transposed(&self) -> FeatureMatrix {
        let cols = self.num_cols();
        let mut transposed = Vec::with_capacity(cols);

        for j in 0..cols {
            let mut row = Vec::with_capacity(self.rows.len());
            for source_row in &self.rows {
                row.push(source_row[j]);
            }
            transposed.push(row);
        }

        FeatureMatrix { rows: transposed }
    }
}
