pub mod age_term;
pub mod effort_rate;
