//! KRL commuter rail planner.
//!
//! A service that answers: "Leaving this station now, which trains get me
//! to my destination, where do I change, and how full will they be?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod occupancy;
pub mod planner;
pub mod timetable;
pub mod web;
