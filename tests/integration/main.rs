//! Integration test harness for Bot-Warden
//!
//! These tests use wiremock to stand in for bot catalog sources and drive
//! the manager end to end: construction, classification, robots.txt
//! rendering, refresh retries, and concurrent traffic.

mod manager_tests;
