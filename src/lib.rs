pub mod api;
pub mod config;
pub mod db;
pub mod drafts;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod timetable;
