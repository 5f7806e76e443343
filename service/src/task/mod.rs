//! Background [`Task`]s definitions.

mod background;
pub mod clean_visitor_hits;

pub use common::Handler as Task;

pub use self::{background::Background, clean_visitor_hits::CleanVisitorHits};
