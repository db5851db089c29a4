//! Scoreboard state holder
//!
//! Holds the enriched record list, the last fetch error and the view state.
//! Data arrives through [`Scoreboard::on_data_received`]; every getter derives
//! its answer from the current state at call time.

use crate::error::FetchError;
use crate::opportunity::{DisplayOpportunity, RawOpportunity, enrich};
use crate::view::{self, CATEGORY_OPTIONS, CategoryFilter, CategoryOption, SortField, ViewState};

#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    opportunities: Vec<DisplayOpportunity>,
    error: Option<FetchError>,
    view: ViewState,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Inbound data
    // =========================================================================

    /// Replace the record list wholesale, or clear it and keep the error
    pub fn on_data_received(&mut self, result: Result<Vec<RawOpportunity>, FetchError>) {
        match result {
            Ok(data) => {
                self.opportunities = data.into_iter().map(enrich).collect();
                self.error = None;
            }
            Err(error) => {
                self.opportunities = Vec::new();
                self.error = Some(error);
            }
        }
    }

    // =========================================================================
    // User actions
    // =========================================================================

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.view.set_category(category);
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.view.toggle_sort(field);
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Every enriched record, unfiltered, in arrival order
    pub fn opportunities(&self) -> &[DisplayOpportunity] {
        &self.opportunities
    }

    pub fn filtered_and_sorted_opportunities(&self) -> Vec<&DisplayOpportunity> {
        view::filter_and_sort(&self.opportunities, &self.view)
    }

    pub fn has_opportunities(&self) -> bool {
        !self.filtered_and_sorted_opportunities().is_empty()
    }

    pub fn total_open_opps(&self) -> usize {
        self.filtered_and_sorted_opportunities().len()
    }

    pub fn average_score(&self) -> String {
        view::average_score(&self.filtered_and_sorted_opportunities())
    }

    // Category counts ignore the active filter
    pub fn hot_count(&self) -> usize {
        view::count_category(&self.opportunities, CategoryFilter::Hot.label())
    }

    pub fn warm_count(&self) -> usize {
        view::count_category(&self.opportunities, CategoryFilter::Warm.label())
    }

    pub fn cold_count(&self) -> usize {
        view::count_category(&self.opportunities, CategoryFilter::Cold.label())
    }

    pub fn sort_direction_indicator(&self) -> &'static str {
        self.view.sort_direction.indicator()
    }

    pub fn is_sorted_by(&self, field: SortField) -> bool {
        self.view.sort_field == field
    }

    pub fn sort_by_name(&self) -> bool {
        self.is_sorted_by(SortField::Name)
    }

    pub fn sort_by_stage(&self) -> bool {
        self.is_sorted_by(SortField::StageName)
    }

    pub fn sort_by_amount(&self) -> bool {
        self.is_sorted_by(SortField::Amount)
    }

    pub fn sort_by_score(&self) -> bool {
        self.is_sorted_by(SortField::Score)
    }

    pub fn sort_by_close_date(&self) -> bool {
        self.is_sorted_by(SortField::CloseDate)
    }

    pub fn category_options(&self) -> &'static [CategoryOption] {
        &CATEGORY_OPTIONS
    }
}
