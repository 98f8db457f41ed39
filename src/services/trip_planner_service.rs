use futures::{stream::BoxStream, StreamExt};
use log::{info, warn};
use tokio::sync::OwnedMutexGuard;

use crate::config::{AppConfig, PlannerConfig};
use crate::error::{PlannerError, Result};
use crate::models::budget::{BudgetBreakdown, BudgetSummary};
use crate::models::images::DestinationImages;
use crate::models::packing::PackingList;
use crate::models::schedule::{DayEdit, DaySchedule, GeneratedSchedule};
use crate::models::spot::{Spot, SpotMap};
use crate::models::trip::Coordinates;
use crate::models::weather::Forecast;
use crate::services::geocoding_service::GeocodingService;
use crate::services::image_service::ImageService;
use crate::services::llm_service::LlmService;
use crate::services::packing_parser::parse_packing_list;
use crate::services::prompts;
use crate::services::schedule_parser::{align_to_calendar, parse_schedule, ScheduleLabels};
use crate::services::session_store::PlannerSession;
use crate::services::spot_parser::parse_spots;
use crate::services::weather_service::{forecast_span, WeatherService};

pub const DEFAULT_IMAGE_COUNT: u32 = 3;
const MAX_IMAGE_COUNT: u32 = 30;

/// The planning operations. Holds the external clients and runs every
/// operation against a session that the caller has locked.
pub struct TripPlanner {
    config: PlannerConfig,
    llm: LlmService,
    geocoder: GeocodingService,
    weather: WeatherService,
    images: ImageService,
}

impl TripPlanner {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            config: config.planner.clone(),
            llm: LlmService::new(config.llm.clone())?,
            geocoder: GeocodingService::new(config.geocoder.clone())?,
            weather: WeatherService::new(config.weather.clone())?,
            images: ImageService::new(config.images.clone())?,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn llm(&self) -> &LlmService {
        &self.llm
    }

    pub fn images(&self) -> &ImageService {
        &self.images
    }

    /// Recommended sights for the destination, generated once per trip.
    pub async fn recommend_spots(&self, session: &mut PlannerSession) -> Result<Vec<Spot>> {
        if !session.spots.is_empty() {
            return Ok(session.spots.clone());
        }

        let destination = session.trip.destination.clone();
        let prompt = prompts::spots_prompt(self.config.language, &destination);
        let text = self.complete_cached(session, prompt).await?;

        let spots: Vec<Spot> = parse_spots(&text)
            .into_iter()
            .map(|spot| spot.with_map_link(&destination))
            .collect();
        info!("Parsed {} spot(s) for {}", spots.len(), destination);

        session.spots = spots.clone();
        Ok(spots)
    }

    /// Spots with coordinates for drawing a map. Spots that cannot be
    /// located are kept without coordinates and reported as warnings.
    pub async fn locate_spots(&self, session: &mut PlannerSession) -> Result<SpotMap> {
        let spots = self.recommend_spots(session).await?;
        let destination = session.trip.destination.clone();
        let center = self.locate_destination(session).await?;

        let mut located = Vec::with_capacity(spots.len());
        let mut warnings = Vec::new();
        for mut spot in spots {
            match self.geocode_cached(session, spot.search_query(&destination)).await {
                Ok(Some(coordinates)) => spot.coordinates = Some(coordinates),
                Ok(None) => warnings.push(format!("Could not locate {}", spot.name)),
                Err(e) => {
                    warn!("Geocoding spot '{}' failed: {}", spot.name, e);
                    warnings.push(format!("Could not locate {}: {}", spot.name, e));
                }
            }
            located.push(spot);
        }

        session.spots = located.clone();
        Ok(SpotMap {
            destination,
            center,
            spots: located,
            warnings,
        })
    }

    pub async fn generate_schedule(&self, session: &mut PlannerSession) -> Result<GeneratedSchedule> {
        let day_count = session.trip.require_days()?;
        let spots = self.recommend_spots(session).await?;

        let language = self.config.language;
        let cap = self.config.schedule_day_cap;
        let prompt = prompts::schedule_prompt(language, &session.trip, &spots, cap);
        let text = self.complete_cached(session, prompt).await?;

        let blocks = parse_schedule(&text, ScheduleLabels::for_language(language), cap);
        let days = align_to_calendar(
            &blocks,
            session.trip.start_date,
            day_count,
            cap,
            self.config.day_matching,
        );
        if blocks.len() != days.len() {
            warn!(
                "Model produced {} day block(s) for a {}-day schedule",
                blocks.len(),
                days.len()
            );
        }

        session.schedule = days.clone();
        Ok(GeneratedSchedule {
            generated_days: blocks.len(),
            days,
        })
    }

    /// Applies a user edit to one day (1-based) of the generated schedule.
    pub fn update_day(
        &self,
        session: &mut PlannerSession,
        day: u32,
        edit: DayEdit,
    ) -> Result<DaySchedule> {
        let scheduled = session.schedule.len();
        let entry = day
            .checked_sub(1)
            .and_then(|i| session.schedule.get_mut(i as usize))
            .ok_or_else(|| {
                PlannerError::InvalidInput(format!(
                    "day {} is not part of the schedule ({} day(s) scheduled)",
                    day, scheduled
                ))
            })?;

        entry.apply(edit);
        Ok(entry.clone())
    }

    pub async fn generate_packing_list(&self, session: &mut PlannerSession) -> Result<PackingList> {
        session.trip.require_days()?;

        let prompt = prompts::packing_prompt(self.config.language, &session.trip);
        let text = self.complete_cached(session, prompt).await?;
        let categories = parse_packing_list(&text);
        info!("Parsed packing list into {} categories", categories.len());

        let list = PackingList { text, categories };
        session.packing_list = Some(list.clone());
        Ok(list)
    }

    pub fn budget_summary(&self, session: &PlannerSession) -> BudgetSummary {
        BudgetSummary::new(&session.trip, session.budget_breakdown())
    }

    pub fn set_budget(&self, session: &mut PlannerSession, breakdown: BudgetBreakdown) -> BudgetSummary {
        session.budget = Some(breakdown);
        let summary = self.budget_summary(session);
        if let Some(overage) = summary.overage {
            info!("Planned spend exceeds the budget by {}", overage);
        }
        summary
    }

    pub async fn forecast(&self, session: &mut PlannerSession) -> Result<Forecast> {
        let coordinates = self.locate_destination(session).await?;
        let start = session.trip.start_date;
        let span = forecast_span(session.trip.day_count());
        let key = format!(
            "{},{},{},{}",
            coordinates.latitude, coordinates.longitude, start, span
        );

        let weather = &self.weather;
        let forecast = session
            .cache
            .forecasts
            .get_or_try_fetch(key, move || weather.forecast(coordinates, start, span))
            .await?;

        if forecast.days.is_empty() {
            return Err(PlannerError::NotFound(format!(
                "no forecast available for {} starting {}",
                session.trip.destination, start
            )));
        }
        Ok(forecast)
    }

    /// Photos never fail the request. Failures are logged, not cached, and
    /// reported as an empty list with a message.
    pub async fn destination_images(
        &self,
        session: &mut PlannerSession,
        count: Option<u32>,
    ) -> Result<DestinationImages> {
        let count = count.unwrap_or(DEFAULT_IMAGE_COUNT);
        if count == 0 || count > MAX_IMAGE_COUNT {
            return Err(PlannerError::InvalidInput(format!(
                "count must be between 1 and {}",
                MAX_IMAGE_COUNT
            )));
        }

        let query = session.trip.destination.clone();
        let images = &self.images;
        let fetched = session
            .cache
            .images
            .get_or_try_fetch((query.clone(), count), || images.search(&query, count))
            .await;

        let result = match fetched {
            Ok(urls) if urls.is_empty() => DestinationImages {
                message: Some(format!("No images found for {}", query)),
                query,
                images: urls,
            },
            Ok(urls) => DestinationImages {
                query,
                images: urls,
                message: None,
            },
            Err(e) => {
                warn!("Image search for '{}' failed: {}", query, e);
                DestinationImages {
                    message: Some(format!("Images are unavailable: {}", e)),
                    query,
                    images: Vec::new(),
                }
            }
        };
        Ok(result)
    }

    pub async fn chat(&self, session: &mut PlannerSession, message: &str) -> Result<String> {
        let message = chat_message(message)?;
        self.prime_conversation(session);

        let messages = session.conversation.with_pending(&message);
        let reply = self.llm.complete(&messages).await?;
        session
            .conversation
            .record_exchange(message, reply.clone());
        Ok(reply)
    }

    /// Streams the assistant's reply. The returned stream owns the session
    /// lock until it finishes, and records the exchange only after the last
    /// fragment arrives.
    pub async fn chat_stream(
        &self,
        mut session: OwnedMutexGuard<PlannerSession>,
        message: &str,
    ) -> Result<BoxStream<'static, Result<String>>> {
        let message = chat_message(message)?;
        self.prime_conversation(&mut session);

        let messages = session.conversation.with_pending(&message);
        let mut fragments = self.llm.complete_stream(&messages).await?;

        let reply_stream = async_stream::try_stream! {
            let mut reply = String::new();
            while let Some(fragment) = fragments.next().await {
                let fragment = fragment?;
                reply.push_str(&fragment);
                yield fragment;
            }
            info!("Streamed reply of {} characters", reply.chars().count());
            session.conversation.record_exchange(message, reply);
        };

        Ok(reply_stream.boxed())
    }

    fn prime_conversation(&self, session: &mut PlannerSession) {
        let language = self.config.language;
        let reference_urls = &self.config.reference_urls;
        let trip = &session.trip;
        session
            .conversation
            .ensure_system(|| prompts::chat_system_prompt(language, trip, reference_urls));
    }

    async fn locate_destination(&self, session: &mut PlannerSession) -> Result<Coordinates> {
        let destination = session.trip.destination.clone();
        self.geocode_cached(session, destination.clone())
            .await?
            .ok_or_else(|| {
                PlannerError::NotFound(format!("could not locate destination '{}'", destination))
            })
    }

    async fn geocode_cached(
        &self,
        session: &mut PlannerSession,
        place: String,
    ) -> Result<Option<Coordinates>> {
        let geocoder = &self.geocoder;
        let query = place.clone();
        session
            .cache
            .geocodes
            .get_or_try_fetch(place, move || async move { geocoder.geocode(&query).await })
            .await
    }

    async fn complete_cached(&self, session: &mut PlannerSession, prompt: String) -> Result<String> {
        let llm = &self.llm;
        let key = prompt.clone();
        session
            .cache
            .completions
            .get_or_try_fetch(key, move || async move { llm.complete_prompt(&prompt).await })
            .await
    }
}

fn chat_message(message: &str) -> Result<String> {
    let message = message.trim();
    if message.is_empty() {
        return Err(PlannerError::InvalidInput(
            "message must not be empty".to_string(),
        ));
    }
    Ok(message.to_string())
}
