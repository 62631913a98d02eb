//! Units of warming work.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{Catalog, CatalogSource};
use crate::reservation::{ReservationError, ReservationResolver};

/// One (laboratory, language) pair to pre-resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmTask {
    pub laboratory_id: String,
    pub language: String,
}

impl WarmTask {
    pub fn new(laboratory_id: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            laboratory_id: laboratory_id.into(),
            language: language.into(),
        }
    }
}

impl fmt::Display for WarmTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.laboratory_id, self.language)
    }
}

/// Executes one warming task.
pub trait TaskRunner: Send + Sync + 'static {
    type Error: fmt::Display + Send;

    fn run(&self, task: &WarmTask) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Runs tasks through the reservation resolver against a pinned catalog.
pub struct ReservationRunner<S> {
    resolver: Arc<ReservationResolver<S>>,
    catalog: Arc<Catalog>,
    min_freshness: Option<Duration>,
}

impl<S> ReservationRunner<S> {
    pub fn new(
        resolver: Arc<ReservationResolver<S>>,
        catalog: Arc<Catalog>,
        min_freshness: Option<Duration>,
    ) -> Self {
        Self {
            resolver,
            catalog,
            min_freshness,
        }
    }
}

impl<S: CatalogSource + 'static> TaskRunner for ReservationRunner<S> {
    type Error = ReservationError;

    async fn run(&self, task: &WarmTask) -> Result<(), ReservationError> {
        self.resolver
            .reserve_with_freshness(
                &task.laboratory_id,
                &task.language,
                Some(&self.catalog),
                self.min_freshness,
            )
            .await
            .map(|_| ())
    }
}
