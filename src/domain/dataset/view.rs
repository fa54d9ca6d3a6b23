//! Borrowed, read-only views over a dataset's rows.

/// An ordered selection of rows borrowed from an immutable table.
///
/// Filtering produces a new view; the underlying rows are never copied or
/// mutated.
#[derive(Debug, PartialEq)]
pub struct DatasetView<'a, R> {
    rows: Vec<&'a R>,
}

// Derived Clone would require `R: Clone`; only the references are copied.
impl<R> Clone for DatasetView<'_, R> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
        }
    }
}

impl<'a, R> DatasetView<'a, R> {
    /// View over the given rows, in order.
    pub fn new(rows: Vec<&'a R>) -> Self {
        Self { rows }
    }

    /// View with no rows (used when a dataset is absent).
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// View over every row of a table.
    pub fn from_slice(rows: &'a [R]) -> Self {
        Self {
            rows: rows.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates the rows in view order.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, &'a R>> {
        self.rows.iter().copied()
    }
}

impl<'a, R> FromIterator<&'a R> for DatasetView<'a, R> {
    fn from_iter<I: IntoIterator<Item = &'a R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
