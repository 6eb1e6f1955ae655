pub mod analytics_responses;
pub mod entities;
pub mod requests;
pub mod responses;
