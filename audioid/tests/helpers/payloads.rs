//! Service payload fixtures

use audioid::SourceResponse;

/// Fingerprint lookup with two results: 0.92 with matching track, 0.90 on
/// track 5 instead of 4
pub const ACOUSTID_TWO_CANDIDATES: &str = r#"{
  "status": "ok",
  "results": [
    {
      "id": "4e0d8649-1f89-44f3-91af-4c0dbee81f28",
      "score": 0.92,
      "recordings": [{
        "id": "b1a9c0e2-6d1f-4a57-9d0e-3a3c1f1d2b11",
        "title": "Waltz No. 2",
        "duration": 180,
        "artists": [{"id": "a-1", "name": "Dmitri Shostakovich"}],
        "releases": [{
          "title": "Jazz Suites",
          "date": {"year": 1991, "month": 6},
          "track_count": 8,
          "medium_count": 1,
          "mediums": [{"position": 1, "tracks": [{"id": "t-1", "position": 4}]}]
        }]
      }]
    },
    {
      "id": "77b0a6a5-5c2e-4f0c-8bd6-1bb1d0a6e7c3",
      "score": 0.90,
      "recordings": [{
        "id": "c2b8d1f3-7e2a-4b68-8e1f-4b4d2e2e3c22",
        "title": "Waltz No. 2",
        "duration": 181,
        "releases": [{
          "title": "Jazz Suites",
          "mediums": [{"position": 1, "tracks": [{"id": "t-2", "position": 5}]}]
        }]
      }]
    }
  ]
}"#;

/// Fingerprint lookup where the same recording is reported twice
pub const ACOUSTID_REPEATED_RESULT: &str = r#"{
  "status": "ok",
  "results": [
    {"id": "x-1", "score": 0.97, "recordings": [{"id": "b1a9c0e2-6d1f-4a57-9d0e-3a3c1f1d2b11",
      "title": "Waltz No. 2", "duration": 180,
      "releases": [{"title": "Jazz Suites", "mediums": [{"position": 1, "tracks": [{"position": 4}]}]}]}]},
    {"id": "x-2", "score": 0.95, "recordings": [{"id": "b1a9c0e2-6d1f-4a57-9d0e-3a3c1f1d2b11",
      "title": "Waltz No. 2", "duration": 180,
      "releases": [{"title": "Jazz Suites", "mediums": [{"position": 1, "tracks": [{"position": 4}]}]}]}]}
  ]
}"#;

/// Recording lookup with a single release
pub const MUSICBRAINZ_RECORDING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://musicbrainz.org/ns/mmd-2.0#">
  <recording id="5b11f4ce-a62d-471e-81fc-a69a8278c7da">
    <title>Waltz No. 2</title>
    <length>180200</length>
    <artist-credit>
      <name-credit><artist id="a-1"><name>Dmitri Shostakovich</name><sort-name>Shostakovich, Dmitri</sort-name></artist></name-credit>
    </artist-credit>
    <release-list count="1">
      <release id="rel-1">
        <title>Jazz Suites</title>
        <date>1991</date>
        <medium-list count="1">
          <medium>
            <position>1</position>
            <track-list count="8" offset="3">
              <track id="t-1"><position>4</position><length>180200</length></track>
            </track-list>
          </medium>
        </medium-list>
      </release>
    </release-list>
  </recording>
</metadata>"#;

/// Recording lookup that matched nothing usable
pub const MUSICBRAINZ_NO_RELEASES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://musicbrainz.org/ns/mmd-2.0#">
  <recording id="5b11f4ce-a62d-471e-81fc-a69a8278c7da"><title>Waltz No. 2</title></recording>
</metadata>"#;

/// Recognition result: one strong match, one below the minimum score
pub const ACRCLOUD_SUCCESS: &str = r#"{
  "status": {"msg": "Success", "code": 0, "version": "1.0"},
  "metadata": {
    "music": [
      {
        "title": "Waltz No. 2",
        "score": 95,
        "duration_ms": 180500,
        "release_date": "1991-06-01",
        "album": {"name": "Jazz Suites"},
        "artists": [{"name": "Royal Concertgebouw Orchestra", "roles": ["MainArtist"]},
                    {"name": "Riccardo Chailly", "roles": ["Conductor"]}]
      },
      {
        "title": "Second Waltz",
        "score": 70,
        "duration_ms": 179000,
        "album": {"name": "Film Music"}
      }
    ]
  }
}"#;

pub const ACRCLOUD_NO_RESULT: &str = r#"{"status": {"msg": "No result", "code": 1001, "version": "1.0"}}"#;

pub fn acoustid_json(body: &str) -> SourceResponse {
    SourceResponse::json(body)
}

pub fn musicbrainz_xml(body: &str) -> SourceResponse {
    SourceResponse::xml(body)
}

pub fn acrcloud_json(body: &str) -> SourceResponse {
    SourceResponse::json(body)
}
