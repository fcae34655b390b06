//! Agent answer pipeline.
//!
//! Forwards a query to a hosted conversational agent, reads the streamed
//! execution trace, and returns the answer text together with its sources:
//! either the data query the agent generated, or a numbered list of the
//! knowledge-base documents it retrieved.
//!
//! # Quick Start
//!
//! ```no_run
//! use agent_answer::config::AnswerConfig;
//! use agent_answer::pipeline::Pipeline;
//!
//! # async fn example() -> agent_answer::error::Result<()> {
//! let config = AnswerConfig::from_env()?;
//! let pipeline = Pipeline::from_config(&config)?;
//! let response = pipeline.handle("Which plans include support?", "session-1").await?;
//! println!("{}\n\n{}", response.answer, response.source);
//! # Ok(())
//! # }
//! ```

pub mod citation;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod pipeline;
pub mod prelude;
pub mod runtime;
pub mod storage;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
