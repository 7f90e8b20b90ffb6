//! Dashboard page state: summary cards plus the marketplace list.

use crate::common::types::{Skill, Summary};

#[derive(Default)]
pub struct DashboardState {
    pub summary: Option<Summary>,
    pub market: Vec<Skill>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DashboardState {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Summary and market are fetched concurrently by the network task; the
    /// page renders once both have resolved, whichever finished first.
    pub fn loaded(&mut self, summary: Summary, market: Vec<Skill>) {
        self.summary = Some(summary);
        self.market = market;
        self.loading = false;
    }

    pub fn failed(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }

    pub fn is_ready(&self) -> bool {
        !self.loading && self.summary.is_some()
    }

    /// A `new_skill` broadcast: prepend to the market unless the current
    /// user owns it (their own additions show under My Skills instead).
    pub fn apply_new_skill(&mut self, skill: Skill, current_user: &str) {
        if skill.owner == current_user {
            return;
        }
        self.market.insert(0, skill);
    }

    pub fn clear(&mut self) {
        *self = DashboardState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::SummaryTotals;

    fn summary() -> Summary {
        Summary {
            username: "alice".to_string(),
            totals: SummaryTotals {
                all: 3,
                completed: 1,
                in_progress: 2,
            },
            last_active_skill: Some("Guitar".to_string()),
            ai_suggestion: "Try public speaking".to_string(),
        }
    }

    fn skill(id: &str, owner: &str) -> Skill {
        Skill {
            id: id.to_string(),
            title: "Sourdough".to_string(),
            description: "Baking basics".to_string(),
            category: "Food".to_string(),
            availability: "Weekends".to_string(),
            owner: owner.to_string(),
            owner_email: String::new(),
        }
    }

    #[test]
    fn page_is_ready_only_after_both_sources_resolve() {
        let mut state = DashboardState::default();
        state.begin_load();
        assert!(!state.is_ready());

        state.loaded(summary(), vec![skill("1", "bob")]);
        assert!(state.is_ready());
        assert_eq!(state.market.len(), 1);
    }

    #[test]
    fn foreign_new_skill_is_prepended_own_skill_is_not() {
        let mut state = DashboardState::default();
        state.loaded(summary(), vec![skill("1", "bob")]);

        state.apply_new_skill(skill("9", "Bob"), "Alice");
        assert_eq!(state.market[0].id, "9");

        state.apply_new_skill(skill("10", "Alice"), "Alice");
        assert_eq!(state.market.len(), 2);
        assert!(state.market.iter().all(|s| s.id != "10"));
    }

    #[test]
    fn load_failure_clears_the_spinner_and_surfaces_the_error() {
        let mut state = DashboardState::default();
        state.begin_load();
        state.failed("could not reach backend".to_string());

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("could not reach backend"));
    }
}
