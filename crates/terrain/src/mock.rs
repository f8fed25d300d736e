//! In-memory services for tests.

use std::{
    collections::{HashMap, HashSet},
    error, fmt,
    sync::Mutex,
};

use async_trait::async_trait;
use model::{
    ElevationSample, GeoPoint, GeocodeCandidate, ResolutionKey, SuggestionCandidate,
};
use tokio::{
    sync::{mpsc, oneshot},
    time::Instant,
};

use crate::{ElevationService, GeocodingService};

#[derive(Debug)]
pub(crate) struct MockError(pub String);

impl error::Error for MockError {}

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "mock failure: {}", self.0)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ElevationCall {
    pub points: Vec<GeoPoint>,
    pub at: Instant,
}

/// Answers every point with a deterministic elevation; selected calls fail.
#[derive(Default)]
pub(crate) struct MockElevation {
    calls: Mutex<Vec<ElevationCall>>,
    failing_calls: HashSet<usize>,
}

impl MockElevation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the call with the given (zero based) number fail.
    pub fn failing_call(mut self, call: usize) -> Self {
        self.failing_calls.insert(call);
        self
    }

    pub fn calls(&self) -> Vec<ElevationCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn elevation_of(point: GeoPoint) -> f64 {
        point.latitude * 100.0 + point.longitude + 0.123_456
    }
}

#[async_trait]
impl ElevationService for MockElevation {
    type Error = MockError;

    async fn elevations(
        &self,
        points: &[GeoPoint],
    ) -> Result<Vec<ElevationSample>, Self::Error> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(ElevationCall {
                points: points.to_vec(),
                at: Instant::now(),
            });
            calls.len() - 1
        };
        if self.failing_calls.contains(&call) {
            return Err(MockError(format!("call {}", call)));
        }
        Ok(points
            .iter()
            .map(|point| ElevationSample {
                point: *point,
                z: Self::elevation_of(*point),
            })
            .collect())
    }
}

pub(crate) fn key_of(display_text: &str) -> String {
    format!("key-{}", display_text)
}

/// Suggests fixed candidates per query text. Requests can be held back until a
/// gate is released, to control the order in which responses arrive.
#[derive(Default)]
pub(crate) struct MockGeocoder {
    suggestions: HashMap<String, Vec<String>>,
    failing_queries: HashSet<String>,
    locations: HashMap<String, GeocodeCandidate>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    started: Mutex<Option<mpsc::UnboundedSender<String>>>,
    redeemed: Mutex<Vec<String>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suggestions(mut self, text: &str, display_texts: &[&str]) -> Self {
        self.suggestions.insert(
            text.to_owned(),
            display_texts.iter().map(|text| text.to_string()).collect(),
        );
        self
    }

    pub fn failing_query(mut self, text: &str) -> Self {
        self.failing_queries.insert(text.to_owned());
        self
    }

    pub fn with_location(mut self, display_text: &str, address: &str, location: GeoPoint) -> Self {
        self.locations.insert(
            key_of(display_text),
            GeocodeCandidate {
                address: address.to_owned(),
                location,
                score: 100.0,
            },
        );
        self
    }

    /// Holds back the next suggest request for `text` until the sender fires.
    pub fn gate(&self, text: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(text.to_owned(), rx);
        tx
    }

    /// Reports the text of every suggest request once it was issued.
    pub fn started(&self) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.started.lock().unwrap() = Some(tx);
        rx
    }

    pub fn redeemed(&self) -> Vec<String> {
        self.redeemed.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeocodingService for MockGeocoder {
    type Error = MockError;

    async fn suggest(
        &self,
        text: &str,
        _location: GeoPoint,
        max_suggestions: usize,
    ) -> Result<Vec<SuggestionCandidate>, Self::Error> {
        let started = self.started.lock().unwrap().clone();
        if let Some(started) = started {
            let _ = started.send(text.to_owned());
        }
        let gate = self.gates.lock().unwrap().remove(text);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.failing_queries.contains(text) {
            return Err(MockError(format!("suggest '{}'", text)));
        }
        Ok(self
            .suggestions
            .get(text)
            .map(|display_texts| {
                display_texts
                    .iter()
                    .take(max_suggestions)
                    .map(|display_text| {
                        SuggestionCandidate::new(
                            display_text.clone(),
                            ResolutionKey::new(key_of(display_text)),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn geocode(
        &self,
        key: ResolutionKey,
    ) -> Result<Vec<GeocodeCandidate>, Self::Error> {
        let key = key.into_inner();
        self.redeemed.lock().unwrap().push(key.clone());
        Ok(self.locations.get(&key).cloned().into_iter().collect())
    }
}
