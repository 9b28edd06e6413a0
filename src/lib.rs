// Library for tests to access modules

pub mod cluster_repo;
pub mod config;
pub mod config_store;
pub mod models;
pub mod routes;
pub mod stats_repo;
