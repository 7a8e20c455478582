pub mod affordability;
pub mod consolidation;
pub mod effort;
pub mod loans;
pub mod mortgage;
pub mod policy;
