#[cfg(feature = "effort_rate")]
pub mod effort;

#[cfg(feature = "consumer_loans")]
pub mod auto;

#[cfg(feature = "consumer_loans")]
pub mod personal;

#[cfg(feature = "mortgage")]
pub mod mortgage;

#[cfg(feature = "consolidation")]
pub mod consolidation;

#[cfg(feature = "affordability")]
pub mod affordability;
