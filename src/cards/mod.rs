pub mod review;
pub mod stats;
pub mod store;
pub mod types;
pub mod validate;

pub use review::ReviewPolicy;
pub use store::CardStore;
pub use types::{Card, CardDraft, ReviewOutcome, ReviewUpdate};
