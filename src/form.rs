//! Search-form state: one explicit value per endpoint field plus the shared
//! trip parameters.
//!
//! Each endpoint (origin, destination) is a [`FieldState`] updated through
//! discrete transitions. Free typing only changes the query text and the
//! suggestion list; the resolved identifiers move only when the user picks a
//! suggestion. A monotonic per-field sequence number guards suggestion
//! commits, so a slow lookup that was superseded can never overwrite the
//! newer field state.

use crate::{AirportOption, CabinClass, SearchParameters, TripType};
use chrono::NaiveDate;

/// The two endpoint fields of the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Origin,
    Destination,
}

/// Outcome of a query-text change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTransition {
    /// Input became empty: suggestions were cleared, pending lookups are
    /// stale, no new lookup is wanted.
    Cleared,
    /// Input is non-empty: the caller should schedule a (debounced) lookup.
    Lookup,
}

/// State of one endpoint field: free text, current suggestions and the
/// resolved upstream identifiers.
#[derive(Debug, Clone, Default)]
pub struct FieldState {
    query: String,
    options: Vec<AirportOption>,
    entity_id: String,
    sky_id: String,
    lookup_seq: u64,
}

impl FieldState {
    /// Record a query-text change. Emptying the text clears the suggestion
    /// list immediately and invalidates any lookup still in flight.
    pub fn on_query_change(&mut self, text: &str) -> QueryTransition {
        self.query = text.to_string();
        if text.is_empty() {
            self.options.clear();
            self.lookup_seq += 1;
            QueryTransition::Cleared
        } else {
            QueryTransition::Lookup
        }
    }

    /// Mark the start of a lookup for the current query; returns the sequence
    /// number the eventual response must present to commit.
    pub fn begin_lookup(&mut self) -> u64 {
        self.lookup_seq += 1;
        self.lookup_seq
    }

    /// Commit a resolved suggestion list, replacing the previous one.
    /// Returns false (and discards the list) when a newer lookup has been
    /// started or the field was cleared since `seq` was taken.
    pub fn on_suggestions_resolved(&mut self, seq: u64, options: Vec<AirportOption>) -> bool {
        if seq != self.lookup_seq {
            return false;
        }
        self.options = options;
        true
    }

    /// Resolve the field to one of the suggested airports.
    pub fn on_option_selected(&mut self, option: &AirportOption) {
        self.entity_id = option.id.clone();
        self.sky_id = option.sky_id.clone();
        self.query = option.name.clone();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> &[AirportOption] {
        &self.options
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn sky_id(&self) -> &str {
        &self.sky_id
    }

    /// True once the user has selected a suggestion for this field.
    pub fn is_resolved(&self) -> bool {
        !self.entity_id.is_empty() && !self.sky_id.is_empty()
    }
}

/// All user-selected search parameters plus the two endpoint fields.
#[derive(Debug, Clone)]
pub struct SearchForm {
    pub trip_type: TripType,
    pub passenger_count: u32,
    pub cabin_class: CabinClass,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    origin: FieldState,
    destination: FieldState,
    in_progress: bool,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            trip_type: TripType::RoundTrip,
            passenger_count: 1,
            cabin_class: CabinClass::Economy,
            departure_date: None,
            return_date: None,
            origin: FieldState::default(),
            destination: FieldState::default(),
            in_progress: false,
        }
    }
}

impl SearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: Field) -> &FieldState {
        match field {
            Field::Origin => &self.origin,
            Field::Destination => &self.destination,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut FieldState {
        match field {
            Field::Origin => &mut self.origin,
            Field::Destination => &mut self.destination,
        }
    }

    /// True when both endpoints are resolved and a departure date is set,
    /// the precondition for a meaningful search.
    pub fn can_search(&self) -> bool {
        self.origin.is_resolved() && self.destination.is_resolved() && self.departure_date.is_some()
    }

    /// Whether a search request is currently outstanding.
    pub fn is_searching(&self) -> bool {
        self.in_progress
    }

    pub(crate) fn set_searching(&mut self, searching: bool) {
        self.in_progress = searching;
    }

    /// Snapshot the current selections into an immutable parameter set.
    pub fn parameters(&self) -> SearchParameters {
        SearchParameters {
            trip_type: self.trip_type,
            passenger_count: self.passenger_count,
            cabin_class: self.cabin_class,
            origin_entity_id: self.origin.entity_id.clone(),
            origin_sky_id: self.origin.sky_id.clone(),
            destination_entity_id: self.destination.entity_id.clone(),
            destination_sky_id: self.destination.sky_id.clone(),
            departure_date: self.departure_date,
            return_date: self.return_date,
        }
    }
}
