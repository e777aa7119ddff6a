pub mod affordability;
pub mod amortization;
pub mod costs;
pub mod plan;
pub mod property_tax;
pub mod savings;
