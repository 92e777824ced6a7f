//! Search orchestration: the glue between the form state, the debounced
//! airport lookups and the flight-search call.
//!
//! A [`SearchSession`] owns the form, one debouncer per endpoint field and a
//! shared API client. UI-facing output (suggestion-list updates, the result
//! list, transient error notices) is pushed through an event channel; the
//! consumer renders, this module never does.

use crate::client::SkyClient;
use crate::debounce::{Debouncer, LOOKUP_QUIET_MS};
use crate::form::{Field, QueryTransition, SearchForm};
use crate::{AirportOption, CabinClass, Itinerary, SearchError, SearchParameters, TripType};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Events pushed to the UI surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The suggestion list for `field` changed (resolved or cleared).
    SuggestionsUpdated { field: Field },
    /// A flight search went out; the in-progress indicator should show.
    SearchStarted,
    /// A flight search succeeded; this list replaces any previous results.
    SearchFinished { itineraries: Vec<Itinerary> },
    /// A transient, user-facing error notification.
    Notice { message: String },
}

/// Orchestrates one search form: debounced type-ahead lookups for both
/// endpoint fields, suggestion staleness protection, and the single-shot
/// flight search with a guaranteed-cleared in-progress flag.
pub struct SearchSession {
    form: Arc<Mutex<SearchForm>>,
    events: UnboundedSender<SessionEvent>,
    origin_lookup: Debouncer<String>,
    destination_lookup: Debouncer<String>,
    client: Arc<SkyClient>,
}

// A poisoned form lock only means a panic elsewhere mid-update; the state
// itself stays usable.
fn lock_form(form: &Arc<Mutex<SearchForm>>) -> MutexGuard<'_, SearchForm> {
    form.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SearchSession {
    /// Create a session around `client`. Returns the session and the
    /// receiving end of its event stream.
    pub fn new(client: SkyClient) -> (Self, UnboundedReceiver<SessionEvent>) {
        let client = Arc::new(client);
        let form = Arc::new(Mutex::new(SearchForm::new()));
        let (events, receiver) = mpsc::unbounded_channel();

        let origin_lookup = lookup_debouncer(
            Field::Origin,
            Arc::clone(&form),
            Arc::clone(&client),
            events.clone(),
        );
        let destination_lookup = lookup_debouncer(
            Field::Destination,
            Arc::clone(&form),
            Arc::clone(&client),
            events.clone(),
        );

        (
            Self {
                form,
                events,
                origin_lookup,
                destination_lookup,
                client,
            },
            receiver,
        )
    }

    /// Record a keystroke in one of the endpoint fields.
    ///
    /// Empty (after trimming) input clears that field's suggestions at once,
    /// cancels any pending lookup and never touches the network. Non-empty
    /// input schedules a debounced lookup; only the last keystroke of a burst
    /// actually triggers one.
    pub fn set_query(&mut self, field: Field, text: &str) {
        let text = text.trim();
        let transition = lock_form(&self.form).field_mut(field).on_query_change(text);

        match transition {
            QueryTransition::Cleared => {
                self.debouncer_mut(field).cancel();
                let _ = self.events.send(SessionEvent::SuggestionsUpdated { field });
            }
            QueryTransition::Lookup => {
                self.debouncer_mut(field).call(text.to_string());
            }
        }
    }

    /// Resolve a field to one of its suggested airports. This is the only
    /// path that changes the resolved identifiers.
    pub fn select_option(&mut self, field: Field, option: &AirportOption) {
        lock_form(&self.form).field_mut(field).on_option_selected(option);
    }

    pub fn set_trip_type(&mut self, trip_type: TripType) {
        lock_form(&self.form).trip_type = trip_type;
    }

    /// Passenger count is clamped to at least one.
    pub fn set_passenger_count(&mut self, count: u32) {
        lock_form(&self.form).passenger_count = count.max(1);
    }

    pub fn set_cabin_class(&mut self, cabin_class: CabinClass) {
        lock_form(&self.form).cabin_class = cabin_class;
    }

    pub fn set_departure_date(&mut self, date: Option<NaiveDate>) {
        lock_form(&self.form).departure_date = date;
    }

    pub fn set_return_date(&mut self, date: Option<NaiveDate>) {
        lock_form(&self.form).return_date = date;
    }

    /// Current suggestion list for a field.
    pub fn suggestions(&self, field: Field) -> Vec<AirportOption> {
        lock_form(&self.form).field(field).options().to_vec()
    }

    /// Whether a search request is currently outstanding.
    pub fn is_searching(&self) -> bool {
        lock_form(&self.form).is_searching()
    }

    pub fn can_search(&self) -> bool {
        lock_form(&self.form).can_search()
    }

    /// Snapshot of the current form selections.
    pub fn parameters(&self) -> SearchParameters {
        lock_form(&self.form).parameters()
    }

    /// Execute one flight search from the current form state.
    ///
    /// The in-progress flag is set before the request goes out and cleared on
    /// both the success and the failure path. On failure a notice is raised
    /// and any previously rendered results are left alone.
    pub async fn search(&self) -> Result<Vec<Itinerary>, SearchError> {
        let params = {
            let mut form = lock_form(&self.form);
            if !form.can_search() {
                warn!("search triggered with unresolved endpoints or no departure date");
            }
            form.set_searching(true);
            form.parameters()
        };
        let _ = self.events.send(SessionEvent::SearchStarted);

        let result = self.client.search_flights(&params).await;

        lock_form(&self.form).set_searching(false);

        match result {
            Ok(itineraries) => {
                let _ = self.events.send(SessionEvent::SearchFinished {
                    itineraries: itineraries.clone(),
                });
                Ok(itineraries)
            }
            Err(err) => {
                warn!(error = %err, "flight search failed");
                let _ = self.events.send(SessionEvent::Notice {
                    message: "Error fetching flight data.".to_string(),
                });
                Err(err)
            }
        }
    }

    fn debouncer_mut(&mut self, field: Field) -> &mut Debouncer<String> {
        match field {
            Field::Origin => &mut self.origin_lookup,
            Field::Destination => &mut self.destination_lookup,
        }
    }
}

/// Debounced lookup task for one endpoint field.
///
/// A superseding keystroke aborts the previous task outright; the sequence
/// number closes the remaining window where an aborted task has already
/// finished its network call but not yet committed.
fn lookup_debouncer(
    field: Field,
    form: Arc<Mutex<SearchForm>>,
    client: Arc<SkyClient>,
    events: UnboundedSender<SessionEvent>,
) -> Debouncer<String> {
    Debouncer::new(
        Duration::from_millis(LOOKUP_QUIET_MS),
        move |query: String| {
            let form = Arc::clone(&form);
            let client = Arc::clone(&client);
            let events = events.clone();
            async move {
                let seq = lock_form(&form).field_mut(field).begin_lookup();
                match client.search_airports(&query).await {
                    Ok(options) => {
                        let fresh = lock_form(&form)
                            .field_mut(field)
                            .on_suggestions_resolved(seq, options);
                        if fresh {
                            let _ = events.send(SessionEvent::SuggestionsUpdated { field });
                        } else {
                            debug!(?field, "discarded stale lookup response");
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, ?field, "airport lookup failed");
                        let _ = lock_form(&form)
                            .field_mut(field)
                            .on_suggestions_resolved(seq, Vec::new());
                        let _ = events.send(SessionEvent::Notice {
                            message: "Error fetching airport data.".to_string(),
                        });
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn offline_session() -> (SearchSession, UnboundedReceiver<SessionEvent>) {
        let client = SkyClient::new(ApiConfig::new("test-key")).unwrap();
        SearchSession::new(client)
    }

    fn london() -> AirportOption {
        AirportOption {
            id: "27544008".to_string(),
            name: "London".to_string(),
            iata_code: "LON".to_string(),
            sky_id: "LOND".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_input_empties_suggestions_immediately() {
        let (mut session, mut events) = offline_session();

        // A lookup is pending for "LON" (never fires: time is paused).
        session.set_query(Field::Origin, "LON");

        session.set_query(Field::Origin, "");
        assert!(session.suggestions(Field::Origin).is_empty());
        assert_eq!(
            events.try_recv().ok(),
            Some(SessionEvent::SuggestionsUpdated { field: Field::Origin })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_only_input_counts_as_empty() {
        let (mut session, mut events) = offline_session();

        session.set_query(Field::Destination, "   ");
        assert!(session.suggestions(Field::Destination).is_empty());
        assert_eq!(
            events.try_recv().ok(),
            Some(SessionEvent::SuggestionsUpdated {
                field: Field::Destination
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_resolves_parameters() {
        let (mut session, _events) = offline_session();

        session.select_option(Field::Origin, &london());
        session.set_trip_type(TripType::OneWay);
        session.set_departure_date(NaiveDate::from_ymd_opt(2025, 6, 1));

        let params = session.parameters();
        assert_eq!(params.origin_entity_id, "27544008");
        assert_eq!(params.origin_sky_id, "LOND");
        assert!(matches!(params.trip_type, TripType::OneWay));
        // Destination still unresolved.
        assert!(!session.can_search());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_after_selection_keeps_resolved_ids() {
        let (mut session, _events) = offline_session();

        session.select_option(Field::Origin, &london());
        session.set_query(Field::Origin, "Par");

        let params = session.parameters();
        assert_eq!(params.origin_entity_id, "27544008");
        assert_eq!(params.origin_sky_id, "LOND");
    }

    #[tokio::test(start_paused = true)]
    async fn test_passenger_count_clamps_to_one() {
        let (mut session, _events) = offline_session();
        session.set_passenger_count(0);
        assert_eq!(session.parameters().passenger_count, 1);
        session.set_passenger_count(4);
        assert_eq!(session.parameters().passenger_count, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_search_in_progress_initially() {
        let (session, _events) = offline_session();
        assert!(!session.is_searching());
    }
}
