//! Game registry, lifecycle, and command surface for the `RtsMod` city layer.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `rtsmod-config.yaml` into
//!   strongly-typed structs.
//! - [`registry`] -- [`GameRegistry`], the authoritative map of player → city
//!   with its unit index.
//! - [`lifecycle`] -- [`Coordinator`], which loads on start, runs periodic
//!   jobs on tick, and flushes on stop.
//! - [`sync`] -- [`CitySnapshot`] and the [`SyncSink`] trait for pushing
//!   state to online players.
//! - [`command`] -- The `rts` console commands.
//!
//! [`GameRegistry`]: registry::GameRegistry
//! [`Coordinator`]: lifecycle::Coordinator
//! [`CitySnapshot`]: sync::CitySnapshot
//! [`SyncSink`]: sync::SyncSink

pub mod command;
pub mod config;
pub mod lifecycle;
pub mod registry;
pub mod sync;
