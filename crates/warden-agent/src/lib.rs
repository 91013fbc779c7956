//! # warden-agent
//!
//! A thin example façade wiring the five warden governance kernel crates
//! (`warden-constraint`, `warden-persona`, `warden-plan`, `warden-proxy`,
//! `warden-violations`) into a single `GovernedAgent` call surface, plus
//! a `warden.toml`-driven configuration layer.
//!
//! This crate is ambient integration harness, not enforcement surface:
//! every governance decision a `GovernedAgent` makes still flows through
//! the real kernel crates unmodified.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use warden_agent::{GovernedAgent, WardenConfig};
//! use warden_persona::AgentType;
//! use warden_proxy::ExecutionMode;
//!
//! let config = WardenConfig::resolve(std::path::Path::new("."), None)?;
//! let mut agent = GovernedAgent::create_with_defaults(
//!     "demo-001",
//!     AgentType::Coding,
//!     &config,
//!     ExecutionMode::Mock,
//! )?;
//! let execution = agent.execute_task("read file src/main.rs")?;
//! println!("outcome: {:?}", execution.validation.outcome);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod facade;

pub use config::WardenConfig;
pub use error::AgentError;
pub use facade::{GovernedAgent, TaskExecution};
