//! GeoAI is a chat front end for questions about Kolkata's urban expansion,
//! together with the small services and tools around it.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the chat session: message history, the controller that
//!   drives one turn at a time, the completion client, the reveal scheduler
//!   and configuration.
//! - [`proxy`] is the `/api/chat` service that answers known localities
//!   directly and forwards everything else to a generative model.
//! - [`forecast`], [`analytics`] and [`map`] cover the year-based forecast
//!   backend, the CSV dashboard statistics and the built-up area map images.
//! - [`api`] defines the JSON payloads exchanged with the proxy, the upstream
//!   model and the forecast backend.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod analytics;
pub mod api;
pub mod cli;
pub mod core;
pub mod forecast;
pub mod map;
pub mod proxy;
pub mod utils;
