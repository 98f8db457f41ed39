#![allow(dead_code)]

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use trip_planner_api::config::AppConfig;
use trip_planner_api::routes;
use trip_planner_api::services::session_store::SessionStore;
use trip_planner_api::services::trip_planner_service::TripPlanner;

pub const LLM_KEY: &str = "test-key";
pub const IMAGE_KEY: &str = "test-access";

pub const SPOTS_REPLY: &str = "- Kinkaku-ji: Golden pavilion\n\
                               - Gion: Geisha district\n\
                               - Nowhere Shrine: Hidden shrine";

pub const SCHEDULE_REPLY: &str = "Date: Day 1\n\
                                  Morning: Kinkaku-ji\n\
                                  Afternoon: Gion\n\
                                  Night: Pontocho\n\
                                  Date: Day 2\n\
                                  Morning: Fushimi Inari\n\
                                  Afternoon: Nishiki Market\n\
                                  Night: Kyoto Tower";

pub const PACKING_REPLY: &str = "Clothing:\n- T-shirts x3\n- Light jacket\nToiletries:\n- Toothbrush\n";

pub const CHAT_FRAGMENTS: [&str; 3] = ["Try the ", "tofu in ", "Arashiyama."];

/// Request counters per upstream service.
#[derive(Clone, Default)]
pub struct Hits {
    pub llm: Arc<AtomicUsize>,
    pub geocoder: Arc<AtomicUsize>,
    pub weather: Arc<AtomicUsize>,
    pub images: Arc<AtomicUsize>,
}

impl Hits {
    pub fn llm(&self) -> usize {
        self.llm.load(Ordering::SeqCst)
    }

    pub fn geocoder(&self) -> usize {
        self.geocoder.load(Ordering::SeqCst)
    }

    pub fn weather(&self) -> usize {
        self.weather.load(Ordering::SeqCst)
    }

    pub fn images(&self) -> usize {
        self.images.load(Ordering::SeqCst)
    }
}

/// Stand-in for the LLM, geocoder, weather and image APIs, served from its
/// own thread and actix system.
pub struct MockUpstream {
    pub base_url: String,
    pub hits: Hits,
}

impl MockUpstream {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let hits = Hits::default();
        let state = hits.clone();

        std::thread::spawn(move || {
            actix_rt::System::new().block_on(async move {
                HttpServer::new(move || {
                    App::new()
                        .app_data(web::Data::new(state.clone()))
                        .route("/v1/chat/completions", web::post().to(chat_completions))
                        .route("/search", web::get().to(nominatim_search))
                        .route("/v1/forecast", web::get().to(open_meteo_forecast))
                        .route("/search/photos", web::get().to(photo_search))
                })
                .workers(1)
                .disable_signals()
                .listen(listener)
                .unwrap()
                .run()
                .await
            })
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            hits,
        }
    }
}

pub struct TestApp {
    pub planner: web::Data<TripPlanner>,
    pub store: web::Data<SessionStore>,
    pub upstream: MockUpstream,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    /// Extra pairs override the defaults pointing every service at the mock.
    pub async fn with_env(overrides: &[(&str, &str)]) -> Self {
        let upstream = MockUpstream::start();
        let base = upstream.base_url.clone();
        let llm_base = format!("{}/v1", base);

        let mut vars: Vec<(String, String)> = vec![
            ("OPENAI_API_KEY".into(), LLM_KEY.into()),
            ("LLM_BASE_URL".into(), llm_base),
            ("LLM_TIMEOUT_SECS".into(), "5".into()),
            ("GEOCODER_BASE_URL".into(), base.clone()),
            ("GEOCODER_RETRY_DELAY_MS".into(), "10".into()),
            ("WEATHER_BASE_URL".into(), base.clone()),
            ("IMAGE_SEARCH_BASE_URL".into(), base),
            ("IMAGE_SEARCH_ACCESS_KEY".into(), IMAGE_KEY.into()),
        ];
        for (key, value) in overrides {
            vars.retain(|(k, _)| k != key);
            vars.push((key.to_string(), value.to_string()));
        }

        let config = AppConfig::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap();

        Self {
            planner: web::Data::new(TripPlanner::new(&config).unwrap()),
            store: web::Data::new(SessionStore::with_idle_ttl(config.sessions.idle_ttl)),
            upstream,
        }
    }

    /// Creates a session directly in the store and returns its id.
    pub async fn create_session(&self, trip: Value) -> String {
        let trip = serde_json::from_value(trip).unwrap();
        let session = self.store.create(trip).await.unwrap();
        let id = session.lock().await.id;
        id.to_string()
    }

    pub fn hits(&self) -> &Hits {
        &self.upstream.hits
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.planner.clone())
            .app_data(self.store.clone())
            .configure(routes::config)
    }
}

pub fn trip_json(destination: &str, start: &str, end: &str) -> Value {
    json!({
        "destination": destination,
        "purpose": "sightseeing",
        "home_location": "Tokyo",
        "start_date": start,
        "end_date": end,
        "budget": 120000,
        "travelers": 2
    })
}

async fn chat_completions(
    hits: web::Data<Hits>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> impl Responder {
    hits.llm.fetch_add(1, Ordering::SeqCst);

    let authorized = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == format!("Bearer {}", LLM_KEY));
    if !authorized {
        return HttpResponse::Unauthorized().json(json!({"error": {"message": "bad key"}}));
    }

    let messages = body["messages"].as_array().cloned().unwrap_or_default();
    let first = messages
        .first()
        .and_then(|m| m["content"].as_str())
        .unwrap_or_default();
    let last = messages
        .last()
        .and_then(|m| m["content"].as_str())
        .unwrap_or_default();

    if last.contains("[fail]") {
        return HttpResponse::InternalServerError().json(json!({"error": {"message": "boom"}}));
    }

    if body["stream"] == json!(true) {
        let mut sse = String::new();
        for fragment in CHAT_FRAGMENTS {
            let chunk = completion_chunk(json!({"index": 0, "delta": {"content": fragment}}));
            sse.push_str(&format!("data: {}\n\n", chunk));
        }
        let last = completion_chunk(json!({"index": 0, "delta": {}, "finish_reason": "stop"}));
        sse.push_str(&format!("data: {}\n\n", last));
        sse.push_str("data: [DONE]\n\n");
        return HttpResponse::Ok().content_type("text/event-stream").body(sse);
    }

    let content = if first.contains("Morning:") {
        SCHEDULE_REPLY.to_string()
    } else if first.contains("packing list") {
        PACKING_REPLY.to_string()
    } else if first.contains("sights") {
        SPOTS_REPLY.to_string()
    } else {
        CHAT_FRAGMENTS.concat()
    };

    HttpResponse::Ok().json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
}

fn completion_chunk(choice: Value) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": "gpt-4o",
        "choices": [choice]
    })
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

async fn nominatim_search(hits: web::Data<Hits>, query: web::Query<SearchQuery>) -> impl Responder {
    hits.geocoder.fetch_add(1, Ordering::SeqCst);

    if query.q.contains("Flaky") {
        return HttpResponse::ServiceUnavailable().body("try later");
    }
    if query.q.contains("Missing") {
        return HttpResponse::NotFound().body("no such endpoint");
    }
    if query.q.contains("Garbled") {
        return HttpResponse::Ok().content_type("application/json").body("<html>oops</html>");
    }
    if query.q.contains("Nowhere") {
        return HttpResponse::Ok().json(json!([]));
    }
    if query.q.contains("Null Island") {
        return HttpResponse::Ok().json(json!([{"lat": "0.0", "lon": "0.0", "display_name": query.q}]));
    }
    HttpResponse::Ok().json(json!([
        {"lat": "35.0116", "lon": "135.7681", "display_name": query.q}
    ]))
}

#[derive(Deserialize)]
struct ForecastQuery {
    latitude: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

async fn open_meteo_forecast(
    hits: web::Data<Hits>,
    query: web::Query<ForecastQuery>,
) -> impl Responder {
    hits.weather.fetch_add(1, Ordering::SeqCst);

    let mut time = Vec::new();
    let mut temperature = Vec::new();
    let mut codes = Vec::new();
    let mut date = query.start_date;
    while date <= query.end_date {
        for (hour, temp, code) in [(0, 12.0, 0), (6, 14.0, 3), (12, 22.0, 3), (18, 16.0, 61)] {
            time.push(format!("{}T{:02}:00", date, hour));
            temperature.push(temp);
            // The station at 0,0 reports temperatures only.
            codes.push((query.latitude != 0.0).then_some(code));
        }
        date += Duration::days(1);
    }

    HttpResponse::Ok().json(json!({
        "latitude": 35.0,
        "longitude": 135.75,
        "hourly": {"time": time, "temperature_2m": temperature, "weathercode": codes}
    }))
}

#[derive(Deserialize)]
struct PhotoQuery {
    query: String,
    per_page: usize,
}

async fn photo_search(
    hits: web::Data<Hits>,
    req: HttpRequest,
    query: web::Query<PhotoQuery>,
) -> impl Responder {
    hits.images.fetch_add(1, Ordering::SeqCst);

    let authorized = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == format!("Client-ID {}", IMAGE_KEY));
    if !authorized {
        return HttpResponse::Unauthorized().json(json!({"errors": ["OAuth error"]}));
    }

    let results: Vec<Value> = (0..query.per_page)
        .map(|i| {
            json!({
                "id": i.to_string(),
                "urls": {"regular": format!("https://images.example/{}/{}.jpg", query.query, i)}
            })
        })
        .collect();
    HttpResponse::Ok().json(json!({"total": results.len(), "results": results}))
}
