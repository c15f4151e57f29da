//! CLI command implementations
//!
//! Provides command handlers for the orca CLI binary.

pub mod bug;
pub mod budget;
pub mod config;
pub mod helpers;
pub mod llm_profile;
pub mod rule;
pub mod task;
pub mod workflow;

pub use config::{get_or_create_context, is_initialized, get_init_instructions};
pub use helpers::{load_active_budget, load_active_llm_profile, load_budget_by_name, load_llm_profile_by_name, list_all_budgets, list_all_llm_profiles};
