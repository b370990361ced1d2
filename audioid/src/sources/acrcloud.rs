//! ACRCloud recognition payloads
//!
//! Every response carries a `status` object. Only a zero status code means
//! the `metadata` block is present; anything else (no result, rate limit,
//! bad credentials) is reported by code and message.

use super::SourceResponse;
use crate::descriptor::{Descriptor, RoleMapping};
use crate::parse::parser_for;
use crate::pool::ResponsePool;
use crate::types::{AttributeKey as K, SourceId};
use tracing::{debug, warn};

/// Artist role names to the key the artist name is copied to
static ROLES: [RoleMapping; 4] = [
    RoleMapping {
        name: "AssociatedPerformer",
        key: K::Artist,
    },
    RoleMapping {
        name: "Conductor",
        key: K::Conductor,
    },
    RoleMapping {
        name: "Composer",
        key: K::Composer,
    },
    RoleMapping {
        name: "MainArtist",
        key: K::AlbumArtist,
    },
];

static ARTIST: [Descriptor; 3] = [
    Descriptor::data("name", K::Artist),
    // Must follow the name: roles copy the artist just written
    Descriptor::data_array("roles", K::Artist, &ROLES),
    Descriptor::end(),
];

static ALBUM: [Descriptor; 2] = [Descriptor::data("name", K::Album), Descriptor::end()];

static MUSIC: [Descriptor; 7] = [
    Descriptor::data("title", K::Title),
    Descriptor::data("score", K::AudioIdScore),
    Descriptor::data("duration_ms", K::Duration),
    Descriptor::data("release_date", K::Date),
    Descriptor::tree("album", K::Tree, &ALBUM),
    Descriptor::array("artists", K::Array, &ARTIST),
    Descriptor::end(),
];

static METADATA: [Descriptor; 2] = [
    Descriptor::array("music", K::Top, &MUSIC),
    Descriptor::end(),
];

/// Recognition result, one candidate per `metadata.music` entry
pub static MUSIC_RESPONSE: [Descriptor; 2] = [
    Descriptor::tree("metadata", K::Tree, &METADATA),
    Descriptor::end(),
];

static STATUS: [Descriptor; 3] = [
    Descriptor::data("code", K::StatusCode),
    Descriptor::data("msg", K::StatusMsg),
    Descriptor::end(),
];

/// Status block only
pub static STATUS_RESPONSE: [Descriptor; 2] = [
    Descriptor::tree("status", K::Top, &STATUS),
    Descriptor::end(),
];

/// Status code and message of a recognition payload
pub fn status(response: &SourceResponse) -> Option<(i64, String)> {
    let mut scratch = ResponsePool::new();
    parser_for(response.format).parse_all(
        &response.body,
        &STATUS_RESPONSE,
        &mut scratch,
        SourceId::AcrCloud,
    );

    let record = scratch.get(0)?;
    let code = record.number(K::StatusCode)? as i64;
    let msg = record
        .text(K::StatusMsg)
        .map(|m| m.into_owned())
        .unwrap_or_default();
    Some((code, msg))
}

/// Payload reports success and carries recognition results
pub(crate) fn status_ok(response: &SourceResponse) -> bool {
    match status(response) {
        Some((0, _)) => true,
        Some((code, msg)) => {
            // 1001 is "no result", a normal outcome
            if code == 1001 {
                debug!(code, msg = %msg, "Recognition found no match");
            } else {
                warn!(code, msg = %msg, "Recognition service error");
            }
            false
        }
        None => {
            warn!("Recognition payload without status");
            false
        }
    }
}
