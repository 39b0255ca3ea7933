//! Short code allocation.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;

/// Default number of draws before giving up.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 10;

/// Draws random codes until one is unused in the durable store.
///
/// The existence check only makes a collision unlikely at insert time; two
/// concurrent allocations can still pick the same free code. The store's
/// unique constraint on insert decides the winner (see
/// [`crate::application::services::LinkService::create`]).
pub struct CodeAllocator<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    max_attempts: usize,
    generate: fn() -> String,
}

impl<L: LinkRepository + ?Sized> CodeAllocator<L> {
    /// Creates an allocator with [`MAX_ALLOCATION_ATTEMPTS`].
    pub fn new(repository: Arc<L>) -> Self {
        Self::with_generator(repository, MAX_ALLOCATION_ATTEMPTS, generate_code)
    }

    /// Creates an allocator with a custom attempt cap and code source.
    pub fn with_generator(repository: Arc<L>, max_attempts: usize, generate: fn() -> String) -> Self {
        Self {
            repository,
            max_attempts,
            generate,
        }
    }

    /// Returns a code that had no link at the time of the check.
    ///
    /// Nothing is reserved; the code only becomes taken once a link carrying
    /// it is inserted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AllocationExhausted`] after `max_attempts` collisions.
    /// Returns [`AppError::StoreUnavailable`] if a lookup fails; store errors
    /// are not retried here.
    pub async fn allocate(&self) -> Result<String, AppError> {
        for attempt in 1..=self.max_attempts {
            let code = (self.generate)();

            if self.repository.find_by_code(&code).await?.is_none() {
                debug!(attempt, "Allocated short code");
                return Ok(code);
            }

            metrics::counter!("shortlink_code_collisions_total").increment(1);
            debug!(attempt, "Short code collision, drawing again");
        }

        warn!(
            attempts = self.max_attempts,
            "Short code allocation exhausted"
        );
        Err(AppError::allocation_exhausted(
            "Could not generate a unique short code",
            json!({ "attempts": self.max_attempts }),
        ))
    }
}
