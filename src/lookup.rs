use log::{debug, info};
use crate::error::LookupError;
use crate::postal::model::{Pincode, PostOfficeRecord, PINCODE_LEN};
use crate::postal::PostalApi;

/// State of the current lookup. Exactly one holds at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LookupResult {
    #[default]
    Idle,
    Loading,
    Success(Vec<PostOfficeRecord>),
    /// user-visible reason
    Failure(String),
}

/// Handed out when a request is issued, needed to apply its outcome.
#[derive(Debug)]
#[must_use]
pub struct LookupTicket {
    generation: u64,
    pincode: Pincode,
}

impl LookupTicket {
    pub fn pincode(&self) -> &Pincode {
        &self.pincode
    }
}

/// Keep the records whose name contains `term`, ignoring case and
/// surrounding whitespace. A blank term keeps everything.
pub fn filter_by_name<'a>(records: &'a [PostOfficeRecord], term: &str) -> Vec<&'a PostOfficeRecord> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records.iter()
        .filter(|record| record.name_contains(&needle))
        .collect()
}

/// Owns the pincode input, the filter term and the lookup state
pub struct LookupController<A> {
    api: A,
    pincode_input: String,
    filter_input: String,
    result: LookupResult,
    /// bumped on every submission, stale responses are dropped
    generation: u64,
}

impl<A: PostalApi + Sync> LookupController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            pincode_input: String::new(),
            filter_input: String::new(),
            result: LookupResult::Idle,
            generation: 0,
        }
    }

    /// Store the raw input, keeping at most six characters.
    ///
    /// Returns `true` if the input had to be cut.
    pub fn set_pincode_input(&mut self, text: &str) -> bool {
        let capped: String = text.chars().take(PINCODE_LEN).collect();
        let truncated = capped.len() < text.len();
        self.pincode_input = capped;
        truncated
    }

    pub fn pincode_input(&self) -> &str {
        &self.pincode_input
    }

    pub fn set_filter_input(&mut self, text: &str) {
        self.filter_input = text.to_owned();
    }

    pub fn filter_input(&self) -> &str {
        &self.filter_input
    }

    pub fn result(&self) -> &LookupResult {
        &self.result
    }

    pub fn is_loading(&self) -> bool {
        self.result == LookupResult::Loading
    }

    /// the filter field only makes sense once there is something to filter
    pub fn filter_visible(&self) -> bool {
        matches!(self.result, LookupResult::Success(_))
    }

    /// Records to display: the filtered success payload, empty otherwise.
    pub fn filtered_records(&self) -> Vec<&PostOfficeRecord> {
        match &self.result {
            LookupResult::Success(records) => filter_by_name(records, &self.filter_input),
            _ => Vec::new(),
        }
    }

    /// Validate the input and move to `Loading`.
    ///
    /// Invalid input goes straight to `Failure` and no ticket is issued. Either
    /// way any response still in flight is now stale.
    pub fn begin_lookup(&mut self) -> Option<LookupTicket> {
        self.generation += 1;
        match Pincode::parse(&self.pincode_input) {
            Ok(pincode) => {
                self.result = LookupResult::Loading;
                Some(LookupTicket { generation: self.generation, pincode })
            }
            Err(err) => {
                debug!("rejected pincode input {:?}", self.pincode_input);
                self.result = LookupResult::Failure(err.to_string());
                None
            }
        }
    }

    /// Apply the outcome of a request. Returns `false` if the ticket was stale
    /// and the outcome got dropped.
    pub fn complete_lookup(
        &mut self,
        ticket: LookupTicket,
        outcome: Result<Vec<PostOfficeRecord>, LookupError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!("dropping stale response for [{}]", ticket.pincode);
            return false;
        }
        self.result = match outcome {
            Ok(records) => {
                info!("[{}] resolved to {} post office(s)", ticket.pincode, records.len());
                LookupResult::Success(records)
            }
            Err(err) => {
                info!("[{}] lookup failed: {}", ticket.pincode, err);
                LookupResult::Failure(err.to_string())
            }
        };
        true
    }

    /// Run the request behind `ticket` and apply its outcome
    #[tracing::instrument(skip_all, fields(pincode = %ticket.pincode))]
    pub async fn finish_lookup(&mut self, ticket: LookupTicket) -> bool {
        let outcome = self.api.lookup(ticket.pincode()).await;
        self.complete_lookup(ticket, outcome)
    }

    /// Validate, fetch and store the outcome of one lookup
    pub async fn submit_lookup(&mut self) {
        if let Some(ticket) = self.begin_lookup() {
            self.finish_lookup(ticket).await;
        }
    }
}
