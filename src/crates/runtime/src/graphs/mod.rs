//! Startup-registered graph factories (§4.3).
//!
//! `react` is the default single-turn ReAct graph registered under
//! [`crate::registry::DEFAULT_GRAPH_ID`]; `research` is the two-phase
//! research graph with internal fan-out and a human-in-the-loop pause
//! registered under its own `graph_id`.

pub mod react;
pub mod research;
