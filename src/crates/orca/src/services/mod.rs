//! Services for business logic

pub mod budget_service;
pub mod pricing_service;

pub use budget_service::{BudgetService, BudgetStatus};
pub use pricing_service::PricingService;
