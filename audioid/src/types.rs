//! Core types shared by every stage of the matching engine
//!
//! - [`AttributeKey`]: metadata fields and internal parse markers, one
//!   numeric namespace
//! - [`Value`]: scalar stored under a key
//! - [`SourceId`]: which identification service produced a candidate

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

// ============================================================================
// Attribute keys
// ============================================================================

/// First discriminant used by internal markers. Metadata fields sit below it.
pub const MARKER_BASE: u16 = 100;

/// Metadata field or internal parse marker.
///
/// Metadata fields and markers share one numeric namespace but never overlap:
/// fields are numbered from 0, markers from [`MARKER_BASE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum AttributeKey {
    Album = 0,
    AlbumArtist = 1,
    AlbumArtistSort = 2,
    AlbumSort = 3,
    Artist = 4,
    ArtistSort = 5,
    Composer = 6,
    ComposerSort = 7,
    Conductor = 8,
    Date = 9,
    DiscNumber = 10,
    DiscTotal = 11,
    /// Duration in milliseconds
    Duration = 12,
    Genre = 13,
    RecordingId = 14,
    Title = 15,
    TitleSort = 16,
    /// Release track identifier
    TrackId = 17,
    TrackNumber = 18,
    TrackTotal = 19,
    WorkId = 20,
    /// Match score, 0-100 scale
    AudioIdScore = 21,
    /// Source identifier, see [`SourceId::ident`]
    AudioIdIdent = 22,

    /// Index the record was stored under
    RespIdx = MARKER_BASE,
    Tree = MARKER_BASE + 1,
    Array = MARKER_BASE + 2,
    /// Closing this node finalizes one candidate
    Top = MARKER_BASE + 3,
    JoinPhrase = MARKER_BASE + 4,
    ArtistType = MARKER_BASE + 5,
    Month = MARKER_BASE + 6,
    StatusCode = MARKER_BASE + 7,
    StatusMsg = MARKER_BASE + 8,
    Role = MARKER_BASE + 9,
}

impl AttributeKey {
    /// Every key, metadata fields first
    pub const ALL: [AttributeKey; 33] = [
        AttributeKey::Album,
        AttributeKey::AlbumArtist,
        AttributeKey::AlbumArtistSort,
        AttributeKey::AlbumSort,
        AttributeKey::Artist,
        AttributeKey::ArtistSort,
        AttributeKey::Composer,
        AttributeKey::ComposerSort,
        AttributeKey::Conductor,
        AttributeKey::Date,
        AttributeKey::DiscNumber,
        AttributeKey::DiscTotal,
        AttributeKey::Duration,
        AttributeKey::Genre,
        AttributeKey::RecordingId,
        AttributeKey::Title,
        AttributeKey::TitleSort,
        AttributeKey::TrackId,
        AttributeKey::TrackNumber,
        AttributeKey::TrackTotal,
        AttributeKey::WorkId,
        AttributeKey::AudioIdScore,
        AttributeKey::AudioIdIdent,
        AttributeKey::RespIdx,
        AttributeKey::Tree,
        AttributeKey::Array,
        AttributeKey::Top,
        AttributeKey::JoinPhrase,
        AttributeKey::ArtistType,
        AttributeKey::Month,
        AttributeKey::StatusCode,
        AttributeKey::StatusMsg,
        AttributeKey::Role,
    ];

    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Internal-only marker (not a song metadata field)
    pub fn is_marker(self) -> bool {
        self.as_u16() >= MARKER_BASE
    }

    /// Field participates in audio identification identity
    pub fn is_audio_id(self) -> bool {
        matches!(
            self,
            AttributeKey::Album
                | AttributeKey::AlbumArtist
                | AttributeKey::AlbumArtistSort
                | AttributeKey::AlbumSort
                | AttributeKey::Artist
                | AttributeKey::ArtistSort
                | AttributeKey::Composer
                | AttributeKey::ComposerSort
                | AttributeKey::Conductor
                | AttributeKey::Date
                | AttributeKey::DiscNumber
                | AttributeKey::DiscTotal
                | AttributeKey::Duration
                | AttributeKey::RecordingId
                | AttributeKey::Title
                | AttributeKey::TitleSort
                | AttributeKey::TrackNumber
                | AttributeKey::TrackTotal
                | AttributeKey::WorkId
                | AttributeKey::AudioIdScore
                | AttributeKey::AudioIdIdent
        )
    }

    /// Key holds a match score
    pub fn is_score(self) -> bool {
        self == AttributeKey::AudioIdScore
    }

    /// Stable snake_case name
    pub fn name(self) -> &'static str {
        match self {
            AttributeKey::Album => "album",
            AttributeKey::AlbumArtist => "album_artist",
            AttributeKey::AlbumArtistSort => "album_artist_sort",
            AttributeKey::AlbumSort => "album_sort",
            AttributeKey::Artist => "artist",
            AttributeKey::ArtistSort => "artist_sort",
            AttributeKey::Composer => "composer",
            AttributeKey::ComposerSort => "composer_sort",
            AttributeKey::Conductor => "conductor",
            AttributeKey::Date => "date",
            AttributeKey::DiscNumber => "disc_number",
            AttributeKey::DiscTotal => "disc_total",
            AttributeKey::Duration => "duration",
            AttributeKey::Genre => "genre",
            AttributeKey::RecordingId => "recording_id",
            AttributeKey::Title => "title",
            AttributeKey::TitleSort => "title_sort",
            AttributeKey::TrackId => "track_id",
            AttributeKey::TrackNumber => "track_number",
            AttributeKey::TrackTotal => "track_total",
            AttributeKey::WorkId => "work_id",
            AttributeKey::AudioIdScore => "audio_id_score",
            AttributeKey::AudioIdIdent => "audio_id_ident",
            AttributeKey::RespIdx => "resp_idx",
            AttributeKey::Tree => "tree",
            AttributeKey::Array => "array",
            AttributeKey::Top => "top",
            AttributeKey::JoinPhrase => "join_phrase",
            AttributeKey::ArtistType => "artist_type",
            AttributeKey::Month => "month",
            AttributeKey::StatusCode => "status_code",
            AttributeKey::StatusMsg => "status_msg",
            AttributeKey::Role => "role",
        }
    }
}

impl TryFrom<u16> for AttributeKey {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        AttributeKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_u16() == value)
            .ok_or(value)
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Values
// ============================================================================

/// Scalar stored in a candidate record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Num(f64),
}

impl Value {
    /// Empty string counts as absent. Numbers are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Str(s) => s.is_empty(),
            Value::Num(_) => false,
        }
    }

    /// Text form used for display and equality checks.
    ///
    /// Whole numbers print without a fractional part.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::Str(s) => Cow::Borrowed(s.as_str()),
            Value::Num(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Cow::Owned(format!("{}", *n as i64))
            }
            Value::Num(n) => Cow::Owned(n.to_string()),
        }
    }

    /// Numeric form; strings are parsed leniently after trimming.
    /// NaN and infinities read as absent.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n).filter(|n| n.is_finite()),
            Value::Str(s) => parse_finite(s),
        }
    }
}

/// Parse a payload number, refusing NaN and infinities
pub fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Num(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Identification service that produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    /// Acoustic fingerprint service
    AcoustId,
    /// Music encyclopedia recording lookup
    MusicBrainz,
    /// Commercial audio recognition service
    AcrCloud,
}

impl SourceId {
    /// Lookup order within one cycle
    pub const ROUND_ROBIN: [SourceId; 3] =
        [SourceId::AcoustId, SourceId::MusicBrainz, SourceId::AcrCloud];

    /// Numeric identifier stored under [`AttributeKey::AudioIdIdent`]
    pub fn ident(self) -> f64 {
        match self {
            SourceId::AcoustId => 1.0,
            SourceId::MusicBrainz => 2.0,
            SourceId::AcrCloud => 3.0,
        }
    }

    pub fn from_ident(ident: f64) -> Option<Self> {
        SourceId::ROUND_ROBIN
            .iter()
            .copied()
            .find(|s| s.ident() == ident)
    }

    pub fn name(self) -> &'static str {
        match self {
            SourceId::AcoustId => "acoustid",
            SourceId::MusicBrainz => "musicbrainz",
            SourceId::AcrCloud => "acrcloud",
        }
    }

    /// Multiplier bringing the service's native score onto a 0-100 scale.
    ///
    /// The recording lookup has no intrinsic score; its candidates are
    /// force-set to 100 when closed.
    pub fn score_scale(self) -> f64 {
        match self {
            SourceId::AcoustId => 100.0,
            SourceId::MusicBrainz | SourceId::AcrCloud => 1.0,
        }
    }

    /// Multiplier bringing the service's native duration unit to milliseconds
    pub fn duration_scale(self) -> f64 {
        match self {
            SourceId::AcoustId => 1000.0,
            SourceId::MusicBrainz | SourceId::AcrCloud => 1.0,
        }
    }

    /// Track and disc numbers are reported by this service
    pub fn reports_track_numbers(self) -> bool {
        self != SourceId::AcrCloud
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
