//! FilterSession: owns the dataset and the live FilterState, and publishes
//! debounced Filter Engine results on a watch channel.
//!
//! Every state change bumps a generation counter and reschedules evaluation
//! against a snapshot of the state at that moment. When the timer fires the
//! result is published only if no newer generation has been published, so a
//! stale evaluation can never overwrite a fresher one.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::filter::debounce::Debouncer;
use crate::filter::engine::apply_filters;
use crate::filter::options::{derive_options, FilterOptions};
use crate::filter::state::{FilterDimension, FilterError, FilterState, FilterUpdate};
use crate::models::ResumeRecord;

/// Quiescence window after the last filter change before evaluation runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// One published evaluation of the engine.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilteredView {
    /// Generation of the state this view was computed from.
    pub generation: u64,
    /// Number of evaluations published so far, this one included.
    pub evaluations: u64,
    pub active_filters: usize,
    /// Size of the full dataset.
    pub total: usize,
    pub records: Vec<ResumeRecord>,
}

pub struct FilterSession {
    dataset: Arc<[ResumeRecord]>,
    options: FilterOptions,
    state: FilterState,
    generation: u64,
    debouncer: Debouncer,
    view: Arc<watch::Sender<FilteredView>>,
}

impl FilterSession {
    /// Loads `records` and evaluates the default state immediately.
    pub fn new(records: Vec<ResumeRecord>, debounce: Duration) -> Self {
        let (tx, _rx) = watch::channel(FilteredView::default());
        let mut session = Self {
            dataset: Arc::from(Vec::new()),
            options: FilterOptions::default(),
            state: FilterState::default(),
            generation: 0,
            debouncer: Debouncer::new(debounce),
            view: Arc::new(tx),
        };
        session.replace_dataset(records);
        session
    }

    /// Swaps in a new dataset. Options are re-derived once and the current
    /// state is evaluated right away; this path is not debounced.
    pub fn replace_dataset(&mut self, records: Vec<ResumeRecord>) {
        self.debouncer.cancel();
        self.dataset = Arc::from(records);
        self.options = derive_options(&self.dataset);
        info!(
            records = self.dataset.len(),
            experience_levels = self.options.experience_levels.len(),
            technical_skills = self.options.technical_skills.len(),
            soft_skills = self.options.soft_skills.len(),
            domain_skills = self.options.domain_skills.len(),
            "Dataset loaded"
        );
        self.generation += 1;
        evaluate_and_publish(&self.view, self.generation, &self.dataset, &self.state);
    }

    pub fn apply(&mut self, update: FilterUpdate) {
        debug!(dimension = %update.dimension(), "Filter updated");
        self.state.apply(update);
        self.schedule_evaluation();
    }

    /// Deselects one value of a multi-valued dimension.
    pub fn remove_value(
        &mut self,
        dimension: FilterDimension,
        value: &str,
    ) -> Result<(), FilterError> {
        self.state.remove_value(dimension, value)?;
        self.schedule_evaluation();
        Ok(())
    }

    pub fn clear(&mut self, dimension: FilterDimension) {
        self.state.clear(dimension);
        self.schedule_evaluation();
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.schedule_evaluation();
    }

    fn schedule_evaluation(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let dataset = Arc::clone(&self.dataset);
        let state = self.state.clone();
        let view = Arc::clone(&self.view);
        self.debouncer
            .schedule(move || evaluate_and_publish(&view, generation, &dataset, &state));
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn dataset(&self) -> &[ResumeRecord] {
        &self.dataset
    }

    pub fn find(&self, analysis_id: &str) -> Option<&ResumeRecord> {
        self.dataset.iter().find(|r| r.analysis_id == analysis_id)
    }

    pub fn active_filter_count(&self) -> usize {
        self.state.active_count()
    }

    pub fn is_evaluation_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// The latest published view.
    pub fn view(&self) -> FilteredView {
        self.view.borrow().clone()
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<FilteredView> {
        self.view.subscribe()
    }
}

fn evaluate_and_publish(
    view: &watch::Sender<FilteredView>,
    generation: u64,
    dataset: &[ResumeRecord],
    state: &FilterState,
) {
    let records = apply_filters(dataset, state);
    debug!(
        generation,
        kept = records.len(),
        total = dataset.len(),
        "Filters evaluated"
    );
    let active_filters = state.active_count();
    let total = dataset.len();
    view.send_if_modified(move |current| {
        if generation < current.generation {
            return false;
        }
        *current = FilteredView {
            generation,
            evaluations: current.evaluations + 1,
            active_filters,
            total,
            records,
        };
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::state::{ScoreRange, SearchScope, Selection, TextQuery};
    use crate::fixtures::{ids, record, skills};
    use crate::models::AnalysisStatus;

    fn strings(items: &[&str]) -> Selection<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn settle() -> tokio::time::Sleep {
        tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(1))
    }

    /// Twelve records; r0..r2 are the only senior Rust developers.
    fn twelve() -> Vec<ResumeRecord> {
        (0..12)
            .map(|i| {
                let mut r = record(&format!("r{i}"));
                if i < 3 {
                    r.experience_level = Some("Senior".to_string());
                    r.technical_skills = skills(&["Rust", "Python"]);
                    r.filename = format!("r{i}_resume.pdf");
                }
                r
            })
            .collect()
    }

    #[test]
    fn test_new_session_publishes_full_dataset() {
        let session = FilterSession::new(twelve(), DEFAULT_DEBOUNCE);
        let view = session.view();
        assert_eq!(view.records.len(), 12);
        assert_eq!(view.total, 12);
        assert_eq!(view.evaluations, 1);
        assert_eq!(view.active_filters, 0);
        assert_eq!(session.options().technical_skills, ["Python", "Rust"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_rapid_changes_produce_one_evaluation() {
        let mut session = FilterSession::new(twelve(), DEFAULT_DEBOUNCE);

        session.apply(FilterUpdate::Filename(TextQuery::new("r", SearchScope::Filename)));
        session.apply(FilterUpdate::Filename(TextQuery::new("r1", SearchScope::Filename)));
        session.apply(FilterUpdate::Filename(TextQuery::new("r10", SearchScope::Filename)));
        assert!(session.is_evaluation_pending());

        tokio::time::sleep(DEFAULT_DEBOUNCE - Duration::from_millis(1)).await;
        assert_eq!(session.view().evaluations, 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        let view = session.view();
        assert_eq!(view.evaluations, 2);
        assert_eq!(ids(&view.records), ["r10"]);
        assert_eq!(view.active_filters, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restores_full_collection() {
        let mut session = FilterSession::new(twelve(), DEFAULT_DEBOUNCE);

        session.apply(FilterUpdate::Status([AnalysisStatus::Completed].into_iter().collect()));
        session.apply(FilterUpdate::ExperienceLevel(strings(&["Senior"])));
        session.apply(FilterUpdate::TechnicalSkills(strings(&["Rust"])));
        session.apply(FilterUpdate::AtsScore(ScoreRange::new(50.0, 100.0).unwrap()));
        session.apply(FilterUpdate::Filename(TextQuery::new("resume", SearchScope::Filename)));
        settle().await;

        let view = session.view();
        assert_eq!(ids(&view.records), ["r0", "r1", "r2"]);
        assert_eq!(view.active_filters, 5);
        assert_eq!(session.active_filter_count(), 5);

        session.reset();
        assert_eq!(session.active_filter_count(), 0);
        settle().await;

        let view = session.view();
        assert_eq!(view.records, twelve());
        assert_eq!(view.active_filters, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_value_touches_only_that_dimension() {
        let mut session = FilterSession::new(twelve(), DEFAULT_DEBOUNCE);
        session.apply(FilterUpdate::TechnicalSkills(strings(&["Rust", "Python"])));
        session.apply(FilterUpdate::ExperienceLevel(strings(&["Senior"])));
        settle().await;
        let before = session.view().evaluations;

        session
            .remove_value(FilterDimension::TechnicalSkills, "Rust")
            .unwrap();
        settle().await;

        assert_eq!(session.state().technical_skills, strings(&["Python"]));
        assert_eq!(session.state().experience_level, strings(&["Senior"]));
        let view = session.view();
        assert_eq!(view.evaluations, before + 1);
        assert_eq!(ids(&view.records), ["r0", "r1", "r2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_value_error_schedules_nothing() {
        let mut session = FilterSession::new(twelve(), DEFAULT_DEBOUNCE);
        let err = session.remove_value(FilterDimension::JobMatch, "5");
        assert!(err.is_err());
        assert!(!session.is_evaluation_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dataset_replacement_is_immediate_and_cancels_pending() {
        let mut session = FilterSession::new(twelve(), DEFAULT_DEBOUNCE);
        session.apply(FilterUpdate::ExperienceLevel(strings(&["Senior"])));

        session.replace_dataset(twelve().into_iter().take(2).collect());
        assert!(!session.is_evaluation_pending());
        let view = session.view();
        assert_eq!(ids(&view.records), ["r0", "r1"]);
        assert_eq!(view.total, 2);
        assert_eq!(view.evaluations, 2);

        settle().await;
        assert_eq!(session.view().evaluations, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_debounced_result() {
        let mut session = FilterSession::new(twelve(), DEFAULT_DEBOUNCE);
        let mut rx = session.subscribe();

        session.clear(FilterDimension::Status);
        session.apply(FilterUpdate::ExperienceLevel(strings(&["Senior"])));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().records.len(), 3);
    }

    #[test]
    fn test_stale_generation_is_not_published() {
        let session = FilterSession::new(twelve(), DEFAULT_DEBOUNCE);
        let state = FilterState::default();
        evaluate_and_publish(&session.view, 0, &[], &state);
        assert_eq!(session.view().records.len(), 12);
    }

    #[test]
    fn test_find_by_analysis_id() {
        let session = FilterSession::new(twelve(), DEFAULT_DEBOUNCE);
        assert!(session.find("r7").is_some());
        assert!(session.find("r70").is_none());
    }
}
