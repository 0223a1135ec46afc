pub mod actor_service;
pub mod aggregator;
pub mod classifier;
pub mod content_service;
pub mod tmdb_service;
pub mod youtube_service;
