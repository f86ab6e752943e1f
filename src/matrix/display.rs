//! Console preview of formula results

use super::Matrix;
use std::fmt;

/// `Display` adaptor that prints the top-left `limit × limit` block of a
/// matrix under a title.
///
/// ```
/// # use parmat::matrix::{Matrix, MatrixPreview};
/// let m = Matrix::identity(3)?;
/// let text = MatrixPreview::new(&m, 2, "I").to_string();
/// assert!(text.starts_with("I (3x3)"));
/// # Ok::<(), parmat::error::Error>(())
/// ```
pub struct MatrixPreview<'a> {
    matrix: &'a Matrix,
    limit: usize,
    title: &'a str,
}

impl<'a> MatrixPreview<'a> {
    /// Preview at most `limit` rows and columns of `matrix`.
    pub fn new(matrix: &'a Matrix, limit: usize, title: &'a str) -> Self {
        Self {
            matrix,
            limit,
            title,
        }
    }
}

impl fmt::Display for MatrixPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [rows, cols] = self.matrix.shape();
        writeln!(f, "{} ({rows}x{cols})", self.title)?;

        let shown_cols = cols.min(self.limit);
        for row in self.matrix.iter_rows().take(self.limit) {
            for (j, value) in row[..shown_cols].iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{value:>12.3}")?;
            }
            if shown_cols < cols {
                f.write_str(" ...")?;
            }
            writeln!(f)?;
        }
        if self.limit < rows {
            writeln!(f, "... {} more rows", rows - self.limit)?;
        }
        Ok(())
    }
}
