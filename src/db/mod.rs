// src/db/mod.rs
//
// Database module
//
// Provides:
// - Connection pooling
// - Schema initialization
// - Integrity checks

pub mod connection;
pub mod migrations;

pub use connection::{
    create_connection_pool, create_test_connection, default_database_path, get_connection,
    ConnectionPool, PooledConn,
};

pub use migrations::{initialize_database, verify_database_integrity};
