//! FitQuest - a fitness RPG where real workouts level up your character.
//!
//! Players log water and workouts to earn experience, take on quests and
//! fight enemies whose damage comes from their reps. The game core is plain
//! synchronous code over a [`player::PlayerRecord`]; [`service::GameService`]
//! adds persistence, locking and authentication, and [`web`] exposes it over
//! HTTP.

pub mod auth;
pub mod battle;
pub mod build_info;
pub mod catalog;
pub mod config;
pub mod core;
pub mod economy;
pub mod error;
pub mod player;
pub mod quests;
pub mod service;
pub mod storage;
pub mod web;
