//! Per-connection explore session.
//!
//! One Tokio task owns every piece of session state and processes events
//! strictly in order: client commands, the debounce deadline, and fetch
//! completions. Fetches run as detached tasks that only report
//! `(generation, result)` back; a result is applied only when its generation
//! is still live, so late answers for outdated viewports are dropped.

use std::future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use super::orchestrator::{DEFAULT_DEBOUNCE, FetchOrchestrator, Generation, Resolution};
use super::{
    CategorySet, City, Coordinates, FocusController, RawElement, RegionCode, Spot, Viewport,
    build_city_query, build_spot_query, collect_cities, distance_km, filter_spots,
    format_distance, normalize_elements,
};
use crate::domain::ports::{GeoFeatureSource, GeoFeatureSourceError};

/// How long a transient notice stays visible.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_millis(2_500);
/// Notice shown when the client cannot geolocate at all.
pub const GEOLOCATION_UNSUPPORTED_MESSAGE: &str = "Geolocation not supported";
/// Notice shown when a geolocation attempt fails without its own message.
pub const GEOLOCATION_DENIED_MESSAGE: &str = "Location permission denied";

const COMMAND_BUFFER: usize = 32;
const UPDATE_BUFFER: usize = 64;

/// Tunables for one session.
#[derive(Debug, Clone)]
pub struct ExploreSessionConfig {
    /// Quiet period before a change triggers a fetch.
    pub debounce: Duration,
    pub notice_ttl: Duration,
    /// Categories selected before the client sends any.
    pub initial_categories: CategorySet,
}

impl Default for ExploreSessionConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            notice_ttl: DEFAULT_NOTICE_TTL,
            initial_categories: CategorySet::all(),
        }
    }
}

/// Result of the client's single-shot position request.
#[derive(Debug, Clone, PartialEq)]
pub enum GeolocationOutcome {
    Fix(Coordinates),
    /// Permission denied or lookup error, with the client's message if any.
    Failed { message: Option<String> },
    /// The client has no geolocation support.
    Unsupported,
}

/// Events sent by the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ExploreCommand {
    /// The map settled on a new viewport.
    ViewportChanged(Viewport),
    CategoriesChanged(CategorySet),
    SearchChanged(String),
    GeolocationResolved(GeolocationOutcome),
    /// `None` clears the region and its city list.
    RegionSelected(Option<RegionCode>),
    /// Pick a city from the current region list by name.
    CitySelected(String),
}

/// Spot paired with its distance from the user, when known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotView {
    pub spot: Spot,
    /// Great-circle distance from the user's last fix.
    pub distance_km: Option<f64>,
}

impl SpotView {
    /// Formatted distance label.
    #[must_use]
    pub fn distance_label(&self) -> Option<String> {
        self.distance_km.map(format_distance)
    }
}

/// Transient message for the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// How long the client should show it.
    pub ttl: Duration,
}

/// State changes pushed to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ExploreUpdate {
    Loading(bool),
    /// Filtered spot list; replaces the previous one.
    Spots(Vec<SpotView>),
    /// Ask the client to move its map.
    Focus(Viewport),
    Notice(Notice),
    Cities(Vec<City>),
}

/// Raised when the session task has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("explore session has ended")]
pub struct SessionEnded;

/// Sending half of a running session. Dropping every handle ends it.
#[derive(Debug, Clone)]
pub struct ExploreHandle {
    commands: mpsc::Sender<ExploreCommand>,
}

impl ExploreHandle {
    /// Queue a client event.
    ///
    /// # Errors
    ///
    /// Returns [`SessionEnded`] once the session task has stopped.
    pub async fn send(&self, command: ExploreCommand) -> Result<(), SessionEnded> {
        self.commands.send(command).await.map_err(|_| SessionEnded)
    }

    /// Wait for room in the command queue without committing a command.
    ///
    /// # Errors
    ///
    /// Returns [`SessionEnded`] once the session task has stopped.
    pub async fn reserve(&self) -> Result<CommandSlot<'_>, SessionEnded> {
        self.commands
            .reserve()
            .await
            .map(CommandSlot)
            .map_err(|_| SessionEnded)
    }
}

/// Reserved place in a session's command queue.
#[derive(Debug)]
pub struct CommandSlot<'a>(mpsc::Permit<'a, ExploreCommand>);

impl CommandSlot<'_> {
    /// Queue the command in the reserved place.
    pub fn send(self, command: ExploreCommand) {
        self.0.send(command);
    }
}

enum Completion {
    Spots {
        generation: Generation,
        result: Result<Vec<RawElement>, GeoFeatureSourceError>,
    },
    Cities {
        ticket: u64,
        region: RegionCode,
        result: Result<Vec<RawElement>, GeoFeatureSourceError>,
    },
}

/// Session state owned by the session task.
pub struct ExploreSession {
    source: Arc<dyn GeoFeatureSource>,
    notice_ttl: Duration,
    focus: FocusController,
    orchestrator: FetchOrchestrator,
    categories: CategorySet,
    search: String,
    spots: Vec<Spot>,
    cities: Vec<City>,
    region_ticket: u64,
    reported_loading: bool,
    updates: mpsc::Sender<ExploreUpdate>,
    completions_tx: mpsc::Sender<Completion>,
}

impl ExploreSession {
    /// Start a session task on the current runtime.
    pub fn spawn(
        source: Arc<dyn GeoFeatureSource>,
        config: ExploreSessionConfig,
    ) -> (ExploreHandle, mpsc::Receiver<ExploreUpdate>) {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (updates_tx, updates_rx) = mpsc::channel(UPDATE_BUFFER);
        let (completions_tx, completions_rx) = mpsc::channel(COMMAND_BUFFER);
        let session = Self {
            source,
            notice_ttl: config.notice_ttl,
            focus: FocusController::new(),
            orchestrator: FetchOrchestrator::new(config.debounce),
            categories: config.initial_categories,
            search: String::new(),
            spots: Vec::new(),
            cities: Vec::new(),
            region_ticket: 0,
            reported_loading: false,
            updates: updates_tx,
            completions_tx,
        };
        tokio::spawn(session.run(commands_rx, completions_rx));
        (
            ExploreHandle {
                commands: commands_tx,
            },
            updates_rx,
        )
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<ExploreCommand>,
        mut completions: mpsc::Receiver<Completion>,
    ) {
        info!("explore session started");
        loop {
            let deadline = self.orchestrator.deadline();
            let outcome = tokio::select! {
                biased;
                Some(completion) = completions.recv() => self.on_completion(completion).await,
                () = wait_until(deadline) => self.on_deadline().await,
                command = commands.recv() => match command {
                    Some(command) => self.on_command(command).await,
                    None => break,
                },
            };
            if outcome.is_err() {
                break;
            }
        }
        info!("explore session finished");
    }

    async fn on_command(&mut self, command: ExploreCommand) -> Result<(), SessionEnded> {
        match command {
            ExploreCommand::ViewportChanged(viewport) => {
                if self.focus.viewport_changed(viewport) {
                    self.record_change().await?;
                }
                Ok(())
            }
            ExploreCommand::CategoriesChanged(categories) => {
                if categories == self.categories {
                    return Ok(());
                }
                self.categories = categories;
                self.record_change().await?;
                self.publish_spots().await
            }
            ExploreCommand::SearchChanged(text) => {
                self.search = text;
                self.publish_spots().await
            }
            ExploreCommand::GeolocationResolved(outcome) => self.on_geolocation(outcome).await,
            ExploreCommand::RegionSelected(region) => self.on_region(region).await,
            ExploreCommand::CitySelected(name) => self.on_city(&name).await,
        }
    }

    async fn record_change(&mut self) -> Result<(), SessionEnded> {
        self.orchestrator.record_change(Instant::now());
        self.sync_loading().await
    }

    async fn on_deadline(&mut self) -> Result<(), SessionEnded> {
        let query = self
            .focus
            .viewport()
            .map(|viewport| build_spot_query(&viewport, &self.categories));
        let query = match query {
            Some(Ok(query)) => query,
            Some(Err(error)) => {
                debug!(%error, "skipping spot fetch");
                self.orchestrator.fire(false);
                return self.sync_loading().await;
            }
            None => {
                debug!("skipping spot fetch until the map reports a viewport");
                self.orchestrator.fire(false);
                return self.sync_loading().await;
            }
        };
        let Some(generation) = self.orchestrator.fire(true) else {
            return self.sync_loading().await;
        };
        debug!(generation = generation.get(), "issuing spot fetch");
        let source = Arc::clone(&self.source);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_elements(&query).await;
            if completions
                .send(Completion::Spots { generation, result })
                .await
                .is_err()
            {
                debug!(generation = generation.get(), "session gone before fetch completed");
            }
        });
        Ok(())
    }

    async fn on_completion(&mut self, completion: Completion) -> Result<(), SessionEnded> {
        match completion {
            Completion::Spots { generation, result } => {
                if self.orchestrator.resolve(generation) == Resolution::Superseded {
                    debug!(generation = generation.get(), "discarding superseded fetch");
                    return Ok(());
                }
                match result {
                    Ok(elements) => {
                        self.spots = normalize_elements(&elements);
                        debug!(count = self.spots.len(), "applied spot fetch");
                        self.publish_spots().await?;
                    }
                    Err(error) => {
                        warn!(%error, "spot fetch failed; keeping previous results");
                    }
                }
                self.sync_loading().await
            }
            Completion::Cities {
                ticket,
                region,
                result,
            } => {
                if ticket != self.region_ticket {
                    debug!(%region, "discarding city list for replaced region");
                    return Ok(());
                }
                self.cities = match result {
                    Ok(elements) => collect_cities(&elements),
                    Err(error) => {
                        warn!(%region, %error, "city lookup failed");
                        Vec::new()
                    }
                };
                self.emit(ExploreUpdate::Cities(self.cities.clone())).await
            }
        }
    }

    async fn on_geolocation(&mut self, outcome: GeolocationOutcome) -> Result<(), SessionEnded> {
        match outcome {
            GeolocationOutcome::Fix(fix) => match self.focus.geolocation_fixed(fix) {
                Ok(_) => {
                    self.publish_focus().await?;
                    self.publish_spots().await
                }
                Err(error) => {
                    warn!(%error, "ignoring unusable geolocation fix");
                    self.notify(GEOLOCATION_DENIED_MESSAGE.to_owned()).await
                }
            },
            GeolocationOutcome::Failed { message } => {
                let message = message
                    .map(|text| text.trim().to_owned())
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| GEOLOCATION_DENIED_MESSAGE.to_owned());
                self.notify(message).await
            }
            GeolocationOutcome::Unsupported => {
                self.notify(GEOLOCATION_UNSUPPORTED_MESSAGE.to_owned()).await
            }
        }
    }

    async fn on_region(&mut self, region: Option<RegionCode>) -> Result<(), SessionEnded> {
        self.region_ticket += 1;
        self.cities.clear();
        let Some(region) = region else {
            return self.emit(ExploreUpdate::Cities(Vec::new())).await;
        };
        let ticket = self.region_ticket;
        let query = build_city_query(&region);
        let source = Arc::clone(&self.source);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_elements(&query).await;
            if completions
                .send(Completion::Cities {
                    ticket,
                    region,
                    result,
                })
                .await
                .is_err()
            {
                debug!(%region, "session gone before city lookup completed");
            }
        });
        Ok(())
    }

    async fn on_city(&mut self, name: &str) -> Result<(), SessionEnded> {
        let Some(coordinates) = self
            .cities
            .iter()
            .find(|city| city.name == name)
            .map(|city| city.coordinates)
        else {
            debug!(city = name, "ignoring selection of unknown city");
            return Ok(());
        };
        match self.focus.city_selected(coordinates) {
            Ok(_) => self.publish_focus().await,
            Err(error) => {
                warn!(%error, city = name, "city has unusable coordinates");
                Ok(())
            }
        }
    }

    async fn publish_focus(&mut self) -> Result<(), SessionEnded> {
        match self.focus.take_focus_request() {
            Some(viewport) => self.emit(ExploreUpdate::Focus(viewport)).await,
            None => Ok(()),
        }
    }

    async fn publish_spots(&self) -> Result<(), SessionEnded> {
        let user = self.focus.user_location();
        let views = filter_spots(&self.spots, &self.categories, &self.search)
            .into_iter()
            .map(|spot| SpotView {
                spot: spot.clone(),
                distance_km: user.map(|from| distance_km(from, spot.coordinates)),
            })
            .collect();
        self.emit(ExploreUpdate::Spots(views)).await
    }

    async fn notify(&self, message: String) -> Result<(), SessionEnded> {
        self.emit(ExploreUpdate::Notice(Notice {
            message,
            ttl: self.notice_ttl,
        }))
        .await
    }

    async fn sync_loading(&mut self) -> Result<(), SessionEnded> {
        let loading = self.orchestrator.is_loading();
        if loading == self.reported_loading {
            return Ok(());
        }
        self.reported_loading = loading;
        self.emit(ExploreUpdate::Loading(loading)).await
    }

    async fn emit(&self, update: ExploreUpdate) -> Result<(), SessionEnded> {
        self.updates.send(update).await.map_err(|_| SessionEnded)
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
