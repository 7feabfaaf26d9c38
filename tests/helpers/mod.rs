//! Shared test helpers and fixtures.

#![allow(dead_code)]

pub mod db_helpers;
