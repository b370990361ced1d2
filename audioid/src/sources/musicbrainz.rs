//! MusicBrainz recording lookup payloads
//!
//! Response to `recording/<mbid>?inc=artist-credits+releases+media+work-rels+artist-rels+work-level-rels`.
//! One candidate per release. The lookup carries no score of its own; every
//! candidate is closed with a score of 100.
//!
//! Composer and conductor credits come from relations. The relation `type`
//! attribute arms a redirect so the next sort name and name land under the
//! role's key.

use crate::descriptor::Descriptor;
use crate::types::AttributeKey as K;

/// Artist relation: sort name first, so a composer redirect lands on the sort key
static ARTIST_RELATION: [Descriptor; 5] = [
    Descriptor::attr(".", "type", K::ArtistType),
    Descriptor::data("artist/sort-name", K::ArtistSort),
    Descriptor::attr(".", "type", K::ArtistType),
    Descriptor::data("artist/name", K::Role),
    Descriptor::end(),
];

/// Recording-level relation: a performance of a work, or a direct artist credit
static RECORDING_RELATION: [Descriptor; 7] = [
    Descriptor::attr("work", "id", K::WorkId),
    Descriptor::attr(".", "type", K::ArtistType),
    Descriptor::data("artist/sort-name", K::ArtistSort),
    Descriptor::attr(".", "type", K::ArtistType),
    Descriptor::data("artist/name", K::Role),
    Descriptor::array("work/relation-list/relation", K::Array, &ARTIST_RELATION),
    Descriptor::end(),
];

static ARTIST_CREDIT: [Descriptor; 4] = [
    Descriptor::data("artist/name", K::Artist),
    Descriptor::data("artist/sort-name", K::ArtistSort),
    Descriptor::attr(".", "joinphrase", K::JoinPhrase),
    Descriptor::end(),
];

static ALBUM_ARTIST_CREDIT: [Descriptor; 4] = [
    Descriptor::data("artist/name", K::AlbumArtist),
    Descriptor::data("artist/sort-name", K::AlbumArtistSort),
    Descriptor::attr(".", "joinphrase", K::JoinPhrase),
    Descriptor::end(),
];

static MEDIUM: [Descriptor; 6] = [
    Descriptor::data("position", K::DiscNumber),
    Descriptor::attr("track-list", "count", K::TrackTotal),
    Descriptor::attr("track-list/track", "id", K::TrackId),
    Descriptor::data("track-list/track/position", K::TrackNumber),
    Descriptor::data("track-list/track/length", K::Duration),
    Descriptor::end(),
];

static RELEASE: [Descriptor; 6] = [
    Descriptor::data("title", K::Album),
    Descriptor::data("date", K::Date),
    Descriptor::array("artist-credit/name-credit", K::Array, &ALBUM_ARTIST_CREDIT),
    Descriptor::attr("medium-list", "count", K::DiscTotal),
    Descriptor::tree("medium-list/medium", K::Tree, &MEDIUM),
    Descriptor::end(),
];

static RECORDING: [Descriptor; 7] = [
    Descriptor::attr(".", "id", K::RecordingId),
    Descriptor::data("title", K::Title),
    Descriptor::data("length", K::Duration),
    // Relations before credits: a relation may overwrite the artist sort name
    Descriptor::array("relation-list/relation", K::Array, &RECORDING_RELATION),
    Descriptor::array("artist-credit/name-credit", K::Array, &ARTIST_CREDIT),
    Descriptor::array("release-list/release", K::Top, &RELEASE),
    Descriptor::end(),
];

/// Recording lookup response (XML, default namespace stripped)
pub static RECORDING_RESPONSE: [Descriptor; 2] = [
    Descriptor::tree("recording", K::Tree, &RECORDING),
    Descriptor::end(),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{DocumentParser, XmlParser};
    use crate::pool::ResponsePool;
    use crate::types::SourceId;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://musicbrainz.org/ns/mmd-2.0#">
  <recording id="0d1cf6a4-6f2a-4bb4-8b5a-6f3c5d0b4a11">
    <title>Air on the G String</title>
    <length>301000</length>
    <artist-credit>
      <name-credit joinphrase=", ">
        <artist id="p1"><name>Berliner Philharmoniker</name><sort-name>Berliner Philharmoniker</sort-name></artist>
      </name-credit>
      <name-credit>
        <artist id="p2"><name>Herbert von Karajan</name><sort-name>Karajan, Herbert von</sort-name></artist>
      </name-credit>
    </artist-credit>
    <release-list count="2">
      <release id="r1">
        <title>Baroque Favourites</title>
        <date>1985-06-01</date>
        <artist-credit>
          <name-credit><artist><name>Various Artists</name><sort-name>Various Artists</sort-name></artist></name-credit>
        </artist-credit>
        <medium-list count="1">
          <medium>
            <position>1</position>
            <track-list count="12" offset="2">
              <track id="t-301"><position>3</position><number>3</number><length>300500</length></track>
            </track-list>
          </medium>
        </medium-list>
      </release>
      <release id="r2">
        <title>Bach: Orchestral Suites</title>
        <medium-list count="2">
          <medium>
            <position>2</position>
            <track-list count="8" offset="1">
              <track id="t-502"><position>2</position></track>
            </track-list>
          </medium>
        </medium-list>
      </release>
    </release-list>
    <relation-list target-type="artist">
      <relation type="conductor">
        <artist><name>Herbert von Karajan</name><sort-name>Karajan, Herbert von</sort-name></artist>
      </relation>
    </relation-list>
    <relation-list target-type="work">
      <relation type="performance">
        <work id="w-1068">
          <title>Orchestral Suite no. 3 in D major, BWV 1068: II. Air</title>
          <relation-list target-type="artist">
            <relation type="composer">
              <artist><name>Johann Sebastian Bach</name><sort-name>Bach, Johann Sebastian</sort-name></artist>
            </relation>
          </relation-list>
        </work>
      </relation>
    </relation-list>
  </recording>
</metadata>"#;

    #[test]
    fn test_recording_lookup() {
        let mut pool = ResponsePool::new();
        let count = XmlParser.parse_all(XML.as_bytes(), &RECORDING_RESPONSE, &mut pool, SourceId::MusicBrainz);
        assert_eq!(count, 2);

        let first = pool.get(0).unwrap();
        assert_eq!(first.text(K::RecordingId).unwrap(), "0d1cf6a4-6f2a-4bb4-8b5a-6f3c5d0b4a11");
        assert_eq!(first.text(K::Title).unwrap(), "Air on the G String");
        assert_eq!(
            first.text(K::Artist).unwrap(),
            "Berliner Philharmoniker, Herbert von Karajan"
        );
        assert_eq!(first.text(K::Conductor).unwrap(), "Herbert von Karajan");
        assert_eq!(first.text(K::Composer).unwrap(), "Johann Sebastian Bach");
        assert_eq!(first.text(K::ComposerSort).unwrap(), "Bach, Johann Sebastian");
        assert_eq!(first.text(K::WorkId).unwrap(), "w-1068");
        assert_eq!(first.text(K::AlbumArtist).unwrap(), "Various Artists");
        assert_eq!(first.text(K::TrackNumber).unwrap(), "3");
        assert_eq!(first.text(K::TrackTotal).unwrap(), "12");
        assert_eq!(first.text(K::TrackId).unwrap(), "t-301");
        assert_eq!(first.number(K::Duration), Some(300500.0));
        assert_eq!(first.score(), Some(100.0));

        let second = pool.get(1).unwrap();
        assert_eq!(second.text(K::Album).unwrap(), "Bach: Orchestral Suites");
        assert_eq!(second.text(K::DiscNumber).unwrap(), "2");
        assert_eq!(second.text(K::DiscTotal).unwrap(), "2");
        assert_eq!(second.text(K::TrackNumber).unwrap(), "2");
        assert_eq!(second.text(K::Date).unwrap(), "1985-06-01");
        assert_eq!(second.score(), Some(100.0));
    }
}
