pub mod models;
pub mod payload;
pub mod profile;

pub use models::{RankedUser, RecentSubmission, UserRecord};
pub use payload::ProfilePayload;
pub use profile::ValidatedProfile;
