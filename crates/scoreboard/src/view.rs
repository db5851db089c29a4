//! View state and the derived views computed from it
//!
//! Everything here is a pure function of the record list and the view state.
//! Nothing is cached: callers recompute on every read.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::constants;
use crate::error::{ParseCategoryError, ParseSortFieldError};
use crate::format::{format_number, to_fixed};
use crate::opportunity::{DisplayOpportunity, RawOpportunity};

// =============================================================================
// Category Filter
// =============================================================================

/// Category filter selected by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Hot,
    Warm,
    Cold,
}

/// Entry in the category picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryOption {
    pub label: &'static str,
    pub value: CategoryFilter,
}

/// Fixed picker options, in display order
pub const CATEGORY_OPTIONS: [CategoryOption; 4] = [
    CategoryOption { label: "All", value: CategoryFilter::All },
    CategoryOption { label: "Hot", value: CategoryFilter::Hot },
    CategoryOption { label: "Warm", value: CategoryFilter::Warm },
    CategoryOption { label: "Cold", value: CategoryFilter::Cold },
];

impl CategoryFilter {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Hot => "Hot",
            CategoryFilter::Warm => "Warm",
            CategoryFilter::Cold => "Cold",
        }
    }

    /// Exact, case-sensitive match; `All` keeps everything
    pub fn matches(&self, opp: &RawOpportunity) -> bool {
        match self {
            CategoryFilter::All => true,
            category => opp.is_category(category.label()),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATEGORY_OPTIONS
            .iter()
            .find(|option| option.label == s)
            .map(|option| option.value)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

// =============================================================================
// Sort Field / Direction
// =============================================================================

/// Sortable column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SortField {
    Name,
    StageName,
    Amount,
    #[default]
    #[serde(rename = "Opportunity_Score__c")]
    Score,
    CloseDate,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Name,
        SortField::StageName,
        SortField::Amount,
        SortField::Score,
        SortField::CloseDate,
    ];

    /// Record field name the column sorts on
    pub fn api_name(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::StageName => "StageName",
            SortField::Amount => "Amount",
            SortField::Score => "Opportunity_Score__c",
            SortField::CloseDate => "CloseDate",
        }
    }

    /// Column heading
    pub fn title(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::StageName => "Stage",
            SortField::Amount => "Amount",
            SortField::Score => "Score",
            SortField::CloseDate => "Close Date",
        }
    }

    /// Sort key for a record; only Amount defaults a missing value to a number
    fn key<'a>(&self, opp: &'a RawOpportunity) -> SortKey<'a> {
        let text = |value: Option<&'a String>| SortKey::Text(Cow::Borrowed(value.map_or("", |s| s.as_str())));
        match self {
            SortField::Name => text(opp.name.as_ref()),
            SortField::StageName => text(opp.stage_name.as_ref()),
            SortField::Amount => SortKey::Number(opp.amount.unwrap_or(0.0)),
            SortField::Score => match opp.score {
                Some(score) => SortKey::Number(score),
                None => SortKey::Text(Cow::Borrowed("")),
            },
            SortField::CloseDate => match opp.close_date {
                Some(date) => SortKey::Text(Cow::Owned(date.format("%Y-%m-%d").to_string())),
                None => SortKey::Text(Cow::Borrowed("")),
            },
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for SortField {
    type Err = ParseSortFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.api_name() == s)
            .ok_or_else(|| ParseSortFieldError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Asc => constants::SORT_ASC_GLYPH,
            SortDirection::Desc => constants::SORT_DESC_GLYPH,
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

// =============================================================================
// View State
// =============================================================================

/// User-controlled display parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub selected_category: CategoryFilter,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl ViewState {
    pub fn set_category(&mut self, category: CategoryFilter) {
        self.selected_category = category;
    }

    /// Column click: flip direction on the active column, otherwise switch
    /// columns and start descending
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Desc;
        }
    }
}

// =============================================================================
// Comparison
// =============================================================================

enum SortKey<'a> {
    Number(f64),
    Text(Cow<'a, str>),
}

impl SortKey<'_> {
    fn as_text(&self) -> Cow<'_, str> {
        match self {
            SortKey::Number(n) => Cow::Owned(format_number(*n)),
            SortKey::Text(s) => Cow::Borrowed(&**s),
        }
    }
}

fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Number(x), SortKey::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        _ => locale_compare(&a.as_text(), &b.as_text()),
    }
}

/// Primary collation weight: whitespace, then punctuation and symbols, then
/// digits, then letters; case folded
fn collation_weight(c: char) -> (u8, char) {
    let class = if c.is_whitespace() {
        0
    } else if c.is_numeric() {
        2
    } else if c.is_alphabetic() {
        3
    } else {
        1
    };
    (class, c.to_lowercase().next().unwrap_or(c))
}

/// Base characters of `s` with the accents decomposed from each
fn collation_elements(s: &str) -> Vec<(char, Vec<char>)> {
    let mut elements: Vec<(char, Vec<char>)> = Vec::new();
    for c in s.nfd() {
        match elements.last_mut() {
            Some((_, marks)) if is_combining_mark(c) => marks.push(c),
            _ => elements.push((c, Vec::new())),
        }
    }
    elements
}

/// Locale-aware string ordering
///
/// Compares base letters first (accents and case ignored), then accents
/// (unaccented first), then case (lowercase first), then code points.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let a_elements = collation_elements(a);
    let b_elements = collation_elements(b);

    a_elements
        .iter()
        .map(|(base, _)| collation_weight(*base))
        .cmp(b_elements.iter().map(|(base, _)| collation_weight(*base)))
        .then_with(|| a_elements.iter().map(|(_, marks)| marks).cmp(b_elements.iter().map(|(_, marks)| marks)))
        .then_with(|| {
            a_elements
                .iter()
                .map(|(base, _)| base.is_uppercase())
                .cmp(b_elements.iter().map(|(base, _)| base.is_uppercase()))
        })
        .then_with(|| a.cmp(b))
}

// =============================================================================
// Derived Views
// =============================================================================

/// Filter by category and sort by the active column
///
/// The sort is stable, so records with equal keys keep their input order in
/// both directions.
pub fn filter_and_sort<'a>(opportunities: &'a [DisplayOpportunity], view: &ViewState) -> Vec<&'a DisplayOpportunity> {
    let mut result: Vec<&DisplayOpportunity> = opportunities
        .iter()
        .filter(|opp| view.selected_category.matches(&opp.raw))
        .collect();

    result.sort_by(|a, b| {
        let a_key = view.sort_field.key(&a.raw);
        let b_key = view.sort_field.key(&b.raw);
        view.sort_direction.apply(compare_keys(&a_key, &b_key))
    });

    result
}

/// Mean of the raw scores (null as zero), one decimal; "0.0" when empty
pub fn average_score(opportunities: &[&DisplayOpportunity]) -> String {
    if opportunities.is_empty() {
        return "0.0".to_string();
    }
    let sum: f64 = opportunities.iter().map(|opp| opp.raw.score_or_zero()).sum();
    to_fixed(sum / opportunities.len() as f64, 1)
}

/// Number of records whose category equals `label` exactly
pub fn count_category(opportunities: &[DisplayOpportunity], label: &str) -> usize {
    opportunities.iter().filter(|opp| opp.raw.is_category(label)).count()
}
