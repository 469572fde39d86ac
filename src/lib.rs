//! # u-binomial
//!
//! Binomial distribution calculator: probability tables, tail queries,
//! moments, charts and an interactive terminal session.
//!
//! ## Modules
//!
//! - [`binomial`]: the distribution engine ([`Binomial`])
//! - [`special`]: log-factorials and log-binomial coefficients
//! - [`stats`]: compensated summation and running moments of draws
//! - [`random`]: seeded sampling and simulation of draws
//! - [`render`]: text tables and plotters charts (read-only consumers)
//! - [`session`]: interactive menu driver
//! - [`config`]: presentation settings
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: log-domain table generation,
//!   Neumaier summation for every cumulative probability
//! - **Explicit recomputation**: `set_n`/`set_pi` regenerate the whole
//!   table, or change nothing on error
//! - **Property-based testing**: probability invariants verified via proptest
//!
//! ## Example
//!
//! ```
//! use u_binomial::Binomial;
//! let b = Binomial::new(4, 0.3).unwrap();
//! assert!((b.less_or_equal(2) - 0.9163).abs() < 1e-12);
//! assert!((b.less_or_equal(2) + b.greater_than(2) - 1.0).abs() < 1e-15);
//! ```

pub mod binomial;
pub mod config;
pub mod error;
pub mod random;
pub mod render;
pub mod session;
pub mod special;
pub mod stats;

pub use binomial::{Binomial, Outcome, Query, Summary};
pub use error::{BinomialError, RenderError, Result};
