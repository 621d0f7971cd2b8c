//! # Overview
//! "Simflow" provides the station configuration model of a queueing-network
//! simulation editor, to facilitate Rust- and npm-based modeling products
//! and projects.  A model is a directed graph of stations; clients flow
//! along the edges and an external simulation runtime executes the model.
//!
//! This repository contains:
//!
//! * Station configurations, for routing clients (Decide), serving them
//! with resources, batches and setup times (Process), and creating,
//! holding and removing them (Source, Delay, Dispose).
//! * Input modeling framework, for distributions and formulas per client
//! type, and setup-time matrices.
//! * Expression engine, for the rate, condition, priority and cost formulas
//! of a model.
//! * Station graph, for keeping stations and edges consistent while a model
//! is edited, validating it, and answering routing requests of a runtime.
//! * Persistence and presentation, for YAML/JSON model documents and edge
//! labels.
//!
//! Simflow is compatible with a wide variety of compilation targets,
//! including WASM.  Simflow does not require nightly Rust.
pub mod expression;
pub mod input_modeling;
pub mod persistence;
pub mod presentation;
pub mod simulator;
pub mod stations;
pub mod utils;
