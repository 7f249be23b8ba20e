//! Content source trait, implemented by scrapers.

use crate::errors::CollaboratorError;
use crate::types::ContentItem;

/// Produces raw items for a set of communities and search terms.
pub trait ContentSource: Send + Sync {
    fn fetch(
        &self,
        communities: &[String],
        terms: &[String],
    ) -> Result<Vec<ContentItem>, CollaboratorError>;
}
