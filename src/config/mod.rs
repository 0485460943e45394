pub mod settings;

pub use settings::{AppConfig, FetcherSettings, ScoringSettings, StoreSettings};
