pub mod users;

pub use users::{InMemoryUserStore, UserLookup};
