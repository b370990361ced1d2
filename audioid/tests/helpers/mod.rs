//! Test Helper Utilities
//!
//! Shared utilities for testing the matching engine

#![allow(dead_code, unused_imports)]

pub mod payloads;
pub mod scripted;

pub use scripted::{Reply, ScriptedTransport};

use audioid_common::KnownSong;

/// Recording id used by the recording lookup fixtures
pub const RECORDING_ID: &str = "5b11f4ce-a62d-471e-81fc-a69a8278c7da";

/// Song matching the fixtures in [`payloads`]
pub fn waltz() -> KnownSong {
    KnownSong {
        title: Some("Waltz No. 2".to_string()),
        artist: Some("Dmitri Shostakovich".to_string()),
        album: Some("Jazz Suites".to_string()),
        track_number: Some(4),
        disc_number: Some(1),
        duration_ms: Some(180000),
        ..Default::default()
    }
}

/// Same song with a known recording id
pub fn waltz_with_recording_id() -> KnownSong {
    KnownSong {
        recording_id: Some(RECORDING_ID.to_string()),
        ..waltz()
    }
}
