//! Read entities definitions.

pub mod estate;
pub mod visitor_hit;
