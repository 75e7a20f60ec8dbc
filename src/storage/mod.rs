pub mod journal;
pub mod store;

pub use store::{ComplaintStore, Stats, StoreError};
