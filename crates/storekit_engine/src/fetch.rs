//! Predicate-based fetch requests.

use crate::model::Model;
use std::cmp::Ordering;
use std::sync::Arc;

/// Predicate closure over a decoded record.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Sort comparator over two decoded records.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// A typed fetch request.
///
/// There is no query DSL; filtering and ordering use host-language
/// closures over the decoded record. An empty request matches every
/// record of the model, in engine insertion order.
///
/// # Example
///
/// ```rust,ignore
/// let request = FetchRequest::<Credential>::new()
///     .filter(|c| c.user_name == "John")
///     .limit(1);
/// let matches = context.fetch(&request)?;
/// ```
pub struct FetchRequest<T: Model> {
    predicate: Option<Predicate<T>>,
    comparator: Option<Comparator<T>>,
    fetch_limit: Option<usize>,
}

impl<T: Model> FetchRequest<T> {
    /// Creates a request matching all records of the model.
    #[must_use]
    pub fn new() -> Self {
        Self {
            predicate: None,
            comparator: None,
            fetch_limit: None,
        }
    }

    /// Restricts the request to records matching the predicate.
    #[must_use]
    pub fn filter(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Orders the results with the given comparator.
    ///
    /// Sorting is applied before the fetch limit.
    #[must_use]
    pub fn sort_by(mut self, comparator: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    /// Caps the number of fetched records.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.fetch_limit = Some(limit);
        self
    }

    /// Returns the configured fetch limit, if any.
    #[must_use]
    pub fn fetch_limit(&self) -> Option<usize> {
        self.fetch_limit
    }

    /// Evaluates the predicate against a record.
    pub(crate) fn matches(&self, record: &T) -> bool {
        self.predicate.as_ref().map_or(true, |p| p(record))
    }

    /// Returns the comparator, if one is configured.
    pub(crate) fn comparator(&self) -> Option<&Comparator<T>> {
        self.comparator.as_ref()
    }
}

impl<T: Model> Default for FetchRequest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Model> Clone for FetchRequest<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            comparator: self.comparator.clone(),
            fetch_limit: self.fetch_limit,
        }
    }
}
