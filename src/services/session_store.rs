use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{PlannerError, Result};
use crate::models::budget::{BudgetBreakdown, BudgetSummary};
use crate::models::conversation::{Conversation, ConversationMessage};
use crate::models::packing::PackingList;
use crate::models::schedule::DaySchedule;
use crate::models::spot::Spot;
use crate::models::trip::{Coordinates, TripParameters};
use crate::models::weather::Forecast;
use crate::services::memo::Memo;

const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

/// Results of external calls made on behalf of one session.
#[derive(Debug, Default)]
pub struct SessionCache {
    /// Completion text keyed by the full prompt.
    pub completions: Memo<String, String>,
    pub geocodes: Memo<String, Option<Coordinates>>,
    /// Keyed by latitude, longitude, start date and window.
    pub forecasts: Memo<String, Forecast>,
    pub images: Memo<(String, u32), Vec<String>>,
}

/// Everything one user has configured and generated. All planner operations
/// take the session by `&mut`, which the store hands out behind a mutex.
#[derive(Debug)]
pub struct PlannerSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub trip: TripParameters,
    pub spots: Vec<Spot>,
    pub schedule: Vec<DaySchedule>,
    pub packing_list: Option<PackingList>,
    pub budget: Option<BudgetBreakdown>,
    pub conversation: Conversation,
    pub cache: SessionCache,
}

impl PlannerSession {
    pub fn new(trip: TripParameters) -> Result<Self> {
        let trip = trip.normalized();
        trip.validate()?;

        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            trip,
            spots: Vec::new(),
            schedule: Vec::new(),
            packing_list: None,
            budget: None,
            conversation: Conversation::default(),
            cache: SessionCache::default(),
        })
    }

    /// Drops all generated content and the conversation. Cached external
    /// results are kept since their keys carry every input.
    pub fn reset(&mut self) {
        self.spots.clear();
        self.schedule.clear();
        self.packing_list = None;
        self.budget = None;
        self.conversation = Conversation::default();
    }

    pub fn update_trip(&mut self, trip: TripParameters) -> Result<()> {
        let trip = trip.normalized();
        trip.validate()?;
        self.trip = trip;
        self.reset();
        Ok(())
    }

    pub fn budget_breakdown(&self) -> BudgetBreakdown {
        self.budget
            .unwrap_or_else(|| BudgetBreakdown::suggested(self.trip.budget))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            trip: self.trip.clone(),
            day_count: self.trip.day_count(),
            spots: self.spots.clone(),
            schedule: self.schedule.clone(),
            packing_list: self.packing_list.clone(),
            budget: BudgetSummary::new(&self.trip, self.budget_breakdown()),
            messages: self.conversation.visible(),
        }
    }
}

/// Serializable view of a session.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub trip: TripParameters,
    pub day_count: u32,
    pub spots: Vec<Spot>,
    pub schedule: Vec<DaySchedule>,
    pub packing_list: Option<PackingList>,
    pub budget: BudgetSummary,
    pub messages: Vec<ConversationMessage>,
}

pub type SharedSession = Arc<Mutex<PlannerSession>>;

struct StoredSession {
    session: SharedSession,
    last_access: Instant,
}

/// In-memory sessions. Sessions untouched for longer than the idle TTL are
/// dropped the next time the store is accessed.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, StoredSession>>,
    idle_ttl: Option<Duration>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(Some(DEFAULT_IDLE_TTL))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` keeps sessions until they are deleted.
    pub fn with_idle_ttl(idle_ttl: Option<Duration>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub async fn create(&self, trip: TripParameters) -> Result<SharedSession> {
        let session = PlannerSession::new(trip)?;
        let id = session.id;
        info!("Created planner session {} for {}", id, session.trip.destination);

        let shared = Arc::new(Mutex::new(session));
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions);
        sessions.insert(
            id,
            StoredSession {
                session: shared.clone(),
                last_access: Instant::now(),
            },
        );
        Ok(shared)
    }

    pub async fn get(&self, id: Uuid) -> Result<SharedSession> {
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions);
        let stored = sessions
            .get_mut(&id)
            .ok_or(PlannerError::SessionNotFound(id))?;
        stored.last_access = Instant::now();
        Ok(stored.session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!("Removed planner session {}", id);
                Ok(())
            }
            None => Err(PlannerError::SessionNotFound(id)),
        }
    }

    pub async fn len(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions);
        sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn sweep(&self, sessions: &mut HashMap<Uuid, StoredSession>) {
        let Some(ttl) = self.idle_ttl else {
            return;
        };
        let before = sessions.len();
        sessions.retain(|_, stored| stored.last_access.elapsed() < ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            info!("Expired {} idle planner session(s)", expired);
        }
    }
}
