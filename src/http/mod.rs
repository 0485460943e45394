pub mod client;
pub mod throttle;

pub use client::ThrottledClient;
pub use throttle::Throttle;
