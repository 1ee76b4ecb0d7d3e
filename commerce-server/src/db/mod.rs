//! Database layer: persistent models stored in the embedded redb database

pub mod models;
