pub mod export_service;
pub mod geocoding_service;
pub mod image_service;
pub mod llm_service;
pub mod memo;
pub mod packing_parser;
pub mod prompts;
pub mod schedule_parser;
pub mod session_store;
pub mod spot_parser;
pub mod trip_planner_service;
pub mod weather_service;
