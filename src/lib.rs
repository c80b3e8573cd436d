pub mod app;
pub mod auth;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod state;
pub mod storage;
pub mod supabase;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{InMemoryStore, PushupStore};
pub use supabase::SupabaseStore;
