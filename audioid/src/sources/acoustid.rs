//! AcoustID fingerprint lookup payloads
//!
//! A lookup returns fingerprint results, each with matched recordings, each
//! recording on one or more releases. One candidate is produced per release;
//! result and recording fields are written before the first release and
//! propagate to the rest.
//!
//! Scores are reported 0.0-1.0 and durations in seconds; both are normalized
//! by the parse engine.

use crate::descriptor::Descriptor;
use crate::types::AttributeKey as K;

// ============================================================================
// JSON (format=json)
// ============================================================================

static JSON_ARTIST: [Descriptor; 3] = [
    Descriptor::data("name", K::Artist),
    Descriptor::data("joinphrase", K::JoinPhrase),
    Descriptor::end(),
];

static JSON_ALBUM_ARTIST: [Descriptor; 3] = [
    Descriptor::data("name", K::AlbumArtist),
    Descriptor::data("joinphrase", K::JoinPhrase),
    Descriptor::end(),
];

static JSON_DATE: [Descriptor; 3] = [
    Descriptor::data("year", K::Date),
    Descriptor::data("month", K::Month),
    Descriptor::end(),
];

static JSON_TRACK: [Descriptor; 3] = [
    Descriptor::data("position", K::TrackNumber),
    Descriptor::data("id", K::TrackId),
    Descriptor::end(),
];

static JSON_MEDIUM: [Descriptor; 3] = [
    Descriptor::data("position", K::DiscNumber),
    Descriptor::array("tracks", K::Array, &JSON_TRACK),
    Descriptor::end(),
];

static JSON_RELEASE: [Descriptor; 7] = [
    Descriptor::data("title", K::Album),
    Descriptor::data("track_count", K::TrackTotal),
    Descriptor::data("medium_count", K::DiscTotal),
    Descriptor::tree("date", K::Tree, &JSON_DATE),
    Descriptor::array("mediums", K::Array, &JSON_MEDIUM),
    Descriptor::array("artists", K::Array, &JSON_ALBUM_ARTIST),
    Descriptor::end(),
];

static JSON_RECORDING: [Descriptor; 6] = [
    Descriptor::data("id", K::RecordingId),
    Descriptor::data("title", K::Title),
    Descriptor::data("duration", K::Duration),
    Descriptor::array("artists", K::Array, &JSON_ARTIST),
    Descriptor::array("releases", K::Top, &JSON_RELEASE),
    Descriptor::end(),
];

static JSON_RESULT: [Descriptor; 3] = [
    Descriptor::data("score", K::AudioIdScore),
    Descriptor::array("recordings", K::Array, &JSON_RECORDING),
    Descriptor::end(),
];

/// Lookup response in JSON form
pub static JSON_RESPONSE: [Descriptor; 2] = [
    Descriptor::array("results", K::Array, &JSON_RESULT),
    Descriptor::end(),
];

// ============================================================================
// XML (format=xml)
// ============================================================================

static XML_ARTIST: [Descriptor; 3] = [
    Descriptor::data("name", K::Artist),
    Descriptor::data("joinphrase", K::JoinPhrase),
    Descriptor::end(),
];

static XML_ALBUM_ARTIST: [Descriptor; 3] = [
    Descriptor::data("name", K::AlbumArtist),
    Descriptor::data("joinphrase", K::JoinPhrase),
    Descriptor::end(),
];

static XML_TRACK: [Descriptor; 3] = [
    Descriptor::data("position", K::TrackNumber),
    Descriptor::data("id", K::TrackId),
    Descriptor::end(),
];

static XML_MEDIUM: [Descriptor; 3] = [
    Descriptor::data("position", K::DiscNumber),
    Descriptor::array("tracks/track", K::Array, &XML_TRACK),
    Descriptor::end(),
];

static XML_RELEASE: [Descriptor; 7] = [
    Descriptor::data("title", K::Album),
    Descriptor::data("track_count", K::TrackTotal),
    Descriptor::data("medium_count", K::DiscTotal),
    Descriptor::tree("date", K::Tree, &JSON_DATE),
    Descriptor::array("mediums/medium", K::Array, &XML_MEDIUM),
    Descriptor::array("artists/artist", K::Array, &XML_ALBUM_ARTIST),
    Descriptor::end(),
];

static XML_RECORDING: [Descriptor; 6] = [
    Descriptor::data("id", K::RecordingId),
    Descriptor::data("title", K::Title),
    Descriptor::data("duration", K::Duration),
    Descriptor::array("artists/artist", K::Array, &XML_ARTIST),
    Descriptor::array("releases/release", K::Top, &XML_RELEASE),
    Descriptor::end(),
];

static XML_RESULT: [Descriptor; 3] = [
    Descriptor::data("score", K::AudioIdScore),
    Descriptor::array("recordings/recording", K::Array, &XML_RECORDING),
    Descriptor::end(),
];

/// Lookup response in XML form
pub static XML_RESPONSE: [Descriptor; 2] = [
    Descriptor::array("results/result", K::Array, &XML_RESULT),
    Descriptor::end(),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{DocumentParser, JsonParser, XmlParser};
    use crate::pool::ResponsePool;
    use crate::types::SourceId;

    const JSON: &str = r#"{
      "status": "ok",
      "results": [{
        "id": "9ff43b6a-4f16-427c-93c2-92307ca505e0",
        "score": 0.961,
        "recordings": [{
          "id": "cd2e7c47-16f5-46c6-a37c-a1eb7bf599ff",
          "title": "Moanin'",
          "duration": 182,
          "artists": [
            {"id": "a1", "name": "Art Blakey", "joinphrase": " & "},
            {"id": "a2", "name": "The Jazz Messengers"}
          ],
          "releases": [
            {
              "title": "Moanin'",
              "date": {"year": 1959, "month": 1},
              "track_count": 6,
              "medium_count": 1,
              "mediums": [{"position": 1, "tracks": [{"id": "t1", "position": 1}]}],
              "artists": [{"name": "Art Blakey & The Jazz Messengers"}]
            },
            {
              "title": "Blue Note Best",
              "mediums": [{"position": 2, "tracks": [{"id": "t2", "position": 7}]}]
            }
          ]
        }]
      }]
    }"#;

    #[test]
    fn test_json_one_candidate_per_release() {
        let mut pool = ResponsePool::new();
        let count = JsonParser.parse_all(JSON.as_bytes(), &JSON_RESPONSE, &mut pool, SourceId::AcoustId);
        assert_eq!(count, 2);

        let first = pool.get(0).unwrap();
        assert_eq!(first.text(K::Title).unwrap(), "Moanin'");
        assert_eq!(first.text(K::Artist).unwrap(), "Art Blakey & The Jazz Messengers");
        assert_eq!(first.text(K::Date).unwrap(), "1959-01");
        assert_eq!(first.number(K::Duration), Some(182000.0));
        assert_eq!(first.score(), Some(96.1));
        assert_eq!(first.text(K::TrackNumber).unwrap(), "1");

        let second = pool.get(1).unwrap();
        assert_eq!(second.text(K::Album).unwrap(), "Blue Note Best");
        assert_eq!(second.text(K::TrackNumber).unwrap(), "7");
        assert_eq!(second.text(K::DiscNumber).unwrap(), "2");
        // Inherited from the first release
        assert_eq!(second.text(K::Title).unwrap(), "Moanin'");
        assert_eq!(second.text(K::Date).unwrap(), "1959-01");
        assert_eq!(second.score(), Some(96.1));
    }

    #[test]
    fn test_xml_form_matches_json_form() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <status>ok</status>
  <results>
    <result>
      <id>9ff43b6a-4f16-427c-93c2-92307ca505e0</id>
      <score>0.961</score>
      <recordings>
        <recording>
          <id>cd2e7c47-16f5-46c6-a37c-a1eb7bf599ff</id>
          <title>Moanin'</title>
          <duration>182</duration>
          <artists>
            <artist><id>a1</id><name>Art Blakey</name><joinphrase> &amp; </joinphrase></artist>
            <artist><id>a2</id><name>The Jazz Messengers</name></artist>
          </artists>
          <releases>
            <release>
              <title>Moanin'</title>
              <date><year>1959</year><month>1</month></date>
              <track_count>6</track_count>
              <medium_count>1</medium_count>
              <mediums><medium><position>1</position><tracks><track><id>t1</id><position>1</position></track></tracks></medium></mediums>
              <artists><artist><name>Art Blakey &amp; The Jazz Messengers</name></artist></artists>
            </release>
            <release>
              <title>Blue Note Best</title>
              <mediums><medium><position>2</position><tracks><track><id>t2</id><position>7</position></track></tracks></medium></mediums>
            </release>
          </releases>
        </recording>
      </recordings>
    </result>
  </results>
</response>"#;

        let mut from_json = ResponsePool::new();
        let mut from_xml = ResponsePool::new();
        JsonParser.parse_all(JSON.as_bytes(), &JSON_RESPONSE, &mut from_json, SourceId::AcoustId);
        let count = XmlParser.parse_all(xml.as_bytes(), &XML_RESPONSE, &mut from_xml, SourceId::AcoustId);

        assert_eq!(count, 2);
        assert_eq!(from_json.get(0), from_xml.get(0));
        assert_eq!(from_json.get(1), from_xml.get(1));
    }
}
