mod model;
mod store;

pub use model::{GoalTargets, NavigationOutcome, Session};
pub use store::SessionStore;
