use std::collections::HashSet;

use tracing::debug;

use crate::library::TrackId;

use super::random::RandomSource;

/// The ids eligible for the next draw plus the ones already drawn this cycle.
#[derive(Debug, Default, Clone)]
pub struct SelectionPool {
    active: Vec<TrackId>,
    used: HashSet<TrackId>,
}

impl SelectionPool {
    pub fn new(ids: Vec<TrackId>) -> Self {
        Self {
            active: ids,
            used: HashSet::new(),
        }
    }

    /// Replace the scope. Progress through the previous scope is discarded.
    pub fn set_scope(&mut self, ids: Vec<TrackId>) {
        self.active = ids;
        self.used.clear();
    }

    /// Pick a random id not drawn since the last wraparound. When every id
    /// has been used the history is cleared and the whole scope is eligible
    /// again. `None` only for an empty scope.
    pub fn draw(&mut self, random: &mut impl RandomSource) -> Option<TrackId> {
        if self.active.is_empty() {
            return None;
        }

        let unused: Vec<usize> = (0..self.active.len())
            .filter(|&i| !self.used.contains(&self.active[i]))
            .collect();
        let candidates = if unused.is_empty() {
            debug!(size = self.active.len(), "pool exhausted, starting a new cycle");
            self.used.clear();
            (0..self.active.len()).collect()
        } else {
            unused
        };

        let pick = random.index(candidates.len()).min(candidates.len() - 1);
        Some(self.active[candidates[pick]].clone())
    }

    /// Record `id` as drawn, whether or not it turned out playable.
    pub fn mark_consumed(&mut self, id: &TrackId) {
        self.used.insert(id.clone());
    }

    pub fn clear_used(&mut self) {
        self.used.clear();
    }

    pub fn active_ids(&self) -> &[TrackId] {
        &self.active
    }

    pub fn used_ids(&self) -> &HashSet<TrackId> {
        &self.used
    }

    #[cfg(test)]
    pub fn is_used(&self, id: &TrackId) -> bool {
        self.used.contains(id)
    }
}
