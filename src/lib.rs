// src/lib.rs — rollout-outreach library root

pub mod backend;
pub mod cli;
pub mod infra;
pub mod outreach;
pub mod tab;
