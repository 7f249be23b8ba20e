//! `InMemoryCrm`: saved leads plus their exclusion list behind one lock.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use lead_core::errors::CollaboratorError;
use lead_core::traits::{ExclusionList, LeadSink};
use lead_core::types::{FxHashSet, LeadStatus, SavedLead};

#[derive(Debug, Default)]
struct CrmState {
    leads: BTreeMap<String, SavedLead>,
    /// Ids that must not be scored again. A superset of `leads` keys when
    /// loaded from a snapshot.
    exclusions: FxHashSet<String>,
}

/// Counts over the saved leads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrmStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    /// Mean lead score, 0 when empty.
    pub average_score: f64,
    pub excluded_ids: usize,
}

#[derive(Debug, Default)]
pub struct InMemoryCrm {
    state: RwLock<CrmState>,
}

impl InMemoryCrm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item_id: &str) -> Option<SavedLead> {
        self.read().leads.get(item_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every lead, best score first.
    pub fn leads(&self) -> Vec<SavedLead> {
        let mut leads: Vec<_> = self.read().leads.values().cloned().collect();
        leads.sort_by(|a, b| b.score.total_cmp(&a.score));
        leads
    }

    pub fn update_status(&self, item_id: &str, status: LeadStatus) -> Result<(), CollaboratorError> {
        let mut state = self.write();
        let lead = state
            .leads
            .get_mut(item_id)
            .ok_or_else(|| CollaboratorError::NotFound(item_id.to_string()))?;
        tracing::debug!(item_id, from = %lead.status, to = %status, "lead status updated");
        lead.status = status;
        Ok(())
    }

    pub fn update_notes(&self, item_id: &str, notes: &str) -> Result<(), CollaboratorError> {
        let mut state = self.write();
        let lead = state
            .leads
            .get_mut(item_id)
            .ok_or_else(|| CollaboratorError::NotFound(item_id.to_string()))?;
        lead.notes = notes.to_string();
        Ok(())
    }

    /// Remove a lead. Its id leaves the exclusion list too, so the item can
    /// be scored again.
    pub fn delete(&self, item_id: &str) -> Result<SavedLead, CollaboratorError> {
        let mut state = self.write();
        let lead = state
            .leads
            .remove(item_id)
            .ok_or_else(|| CollaboratorError::NotFound(item_id.to_string()))?;
        state.exclusions.remove(item_id);
        Ok(lead)
    }

    /// Leads whose title, preview, author, or notes contain `query`
    /// (case-insensitive), optionally restricted to one status. Best first.
    pub fn search(&self, query: Option<&str>, status: Option<LeadStatus>) -> Vec<SavedLead> {
        let needle = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());
        let mut found: Vec<_> = self
            .read()
            .leads
            .values()
            .filter(|lead| status.map_or(true, |s| lead.status == s))
            .filter(|lead| {
                needle.as_deref().map_or(true, |n| {
                    [&lead.title, &lead.preview, &lead.author, &lead.notes]
                        .iter()
                        .any(|field| field.to_lowercase().contains(n))
                })
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.score.total_cmp(&a.score));
        found
    }

    pub fn stats(&self) -> CrmStats {
        let state = self.read();
        let mut stats = CrmStats {
            total: state.leads.len(),
            excluded_ids: state.exclusions.len(),
            ..Default::default()
        };
        for lead in state.leads.values() {
            *stats.by_status.entry(lead.status.to_string()).or_default() += 1;
        }
        if stats.total > 0 {
            stats.average_score =
                state.leads.values().map(|l| l.score).sum::<f64>() / stats.total as f64;
        }
        stats
    }

    /// Excluded ids, sorted.
    pub fn exclusion_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.read().exclusions.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// The exclusion list as a JSON array of id strings.
    pub fn exclusions_to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.exclusion_ids())
    }

    /// Merge ids from a JSON array snapshot. Returns how many were new.
    pub fn load_exclusions_json(&self, json: &str) -> Result<usize, serde_json::Error> {
        let ids: Vec<String> = serde_json::from_str(json)?;
        let mut state = self.write();
        let before = state.exclusions.len();
        state.exclusions.extend(ids);
        Ok(state.exclusions.len() - before)
    }

    // Leads and exclusions are updated together under the write lock, so a
    // poisoned lock still holds consistent state.
    fn read(&self) -> RwLockReadGuard<'_, CrmState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CrmState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LeadSink for InMemoryCrm {
    fn save_lead(&self, lead: SavedLead) -> Result<(), CollaboratorError> {
        let mut state = self.write();
        if state.leads.contains_key(&lead.item_id) {
            return Err(CollaboratorError::AlreadySaved(lead.item_id));
        }
        tracing::debug!(item_id = %lead.item_id, score = lead.score, "lead saved");
        state.exclusions.insert(lead.item_id.clone());
        state.leads.insert(lead.item_id.clone(), lead);
        Ok(())
    }
}

impl ExclusionList for InMemoryCrm {
    fn is_excluded(&self, item_id: &str) -> bool {
        self.read().exclusions.contains(item_id)
    }
}
