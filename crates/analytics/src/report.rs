//! Common surface of reporting views.

/// A derived, read-only view over catalog data.
pub trait Report: Send + Sync {
    /// Returns the name of this report.
    fn name(&self) -> &'static str;

    /// Returns the number of rows in this report.
    fn len(&self) -> usize;

    /// Returns true if the report has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
