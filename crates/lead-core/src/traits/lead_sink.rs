//! Lead sink trait, implemented by CRMs.

use crate::errors::CollaboratorError;
use crate::types::SavedLead;

/// Persists leads the user chose to keep.
pub trait LeadSink: Send + Sync {
    fn save_lead(&self, lead: SavedLead) -> Result<(), CollaboratorError>;
}
