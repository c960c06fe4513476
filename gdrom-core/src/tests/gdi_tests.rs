use super::*;

// -- Test helpers --

fn track(number: u32, start: u32, kind: TrackType, name: &str) -> Track {
    Track {
        number,
        start,
        kind,
        sector_size: SECTOR_SIZE,
        name: name.to_string(),
        zero: 0,
    }
}

/// The smallest valid layout: data, audio, then the high-density data track.
fn three_tracks() -> TrackList {
    TrackList {
        count: 3,
        tracks: vec![
            track(1, 0, TrackType::Data, "track01.bin"),
            track(2, 756, TrackType::Audio, "track02.raw"),
            track(3, TRACK_THREE_START, TrackType::Data, "track03.bin"),
        ],
        trim_whitespace: false,
    }
}

const THREE_TRACKS_TEXT: &str = "3
1     0 4 2352 track01.bin 0
2   756 0 2352 track02.raw 0
3 45000 4 2352 track03.bin 0
";

/// Replace one line (0-based, line 0 being the count) of the sample text.
fn with_line(index: usize, line: &str) -> String {
    THREE_TRACKS_TEXT
        .lines()
        .enumerate()
        .map(|(i, l)| if i == index { line } else { l })
        .map(|l| format!("{l}\n"))
        .collect()
}

// -- Model --

#[test]
fn test_track_type_codes() {
    assert_eq!(TrackType::from_code(0), TrackType::Audio);
    assert_eq!(TrackType::from_code(4), TrackType::Data);
    assert_eq!(TrackType::from_code(2), TrackType::Other(2));
    assert_eq!(TrackType::Audio.code(), 0);
    assert_eq!(TrackType::Data.code(), 4);
}

#[test]
fn test_is_audio_and_data() {
    let list = three_tracks();
    assert!(list.tracks[1].is_audio());
    assert!(!list.tracks[0].is_audio());
    assert!(list.tracks[0].is_data());
    assert!(!list.tracks[1].is_data());
}

#[test]
fn test_is_valid() {
    assert!(three_tracks().is_valid());

    let mut list = three_tracks();
    list.count = 4;
    assert!(!list.is_valid());
}

#[test]
fn test_later_tracks_have_no_type_constraint() {
    let mut list = three_tracks();
    list.tracks
        .push(track(4, 60000, TrackType::Other(2), "track04.bin"));
    list.count = 4;
    assert_eq!(list.validate(), Ok(()));
}

// -- Encoding --

#[test]
fn test_encode_three_tracks() {
    assert_eq!(three_tracks().encode().unwrap(), THREE_TRACKS_TEXT);
}

#[test]
fn test_encode_trim_whitespace() {
    let mut list = three_tracks();
    list.trim_whitespace = true;
    assert_eq!(
        list.encode().unwrap(),
        "3\n1 0 4 2352 track01.bin 0\n2 756 0 2352 track02.raw 0\n3 45000 4 2352 track03.bin 0\n"
    );
}

#[test]
fn test_encode_aligns_to_last_track() {
    let mut list = three_tracks();
    for n in 4..=12 {
        list.tracks.push(track(
            n,
            45000 + n * 1000,
            TrackType::Audio,
            &format!("track{n:02}.raw"),
        ));
    }
    list.tracks
        .push(track(13, 123456, TrackType::Data, "track13.bin"));
    list.count = 13;

    let text = list.encode().unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "13");
    assert_eq!(lines[1], " 1      0 4 2352 track01.bin 0");
    assert_eq!(lines[3], " 3  45000 4 2352 track03.bin 0");
    assert_eq!(lines[13], "13 123456 4 2352 track13.bin 0");
}

#[test]
fn test_encode_quotes_names_with_spaces() {
    let mut list = three_tracks();
    list.tracks[0].name = "Game (Track 1).bin".to_string();
    let text = list.encode().unwrap();
    assert!(text.contains("1     0 4 2352 \"Game (Track 1).bin\" 0\n"));
    assert!(text.contains(" track02.raw "));
    assert!(!text.contains("\"track02.raw\""));
}

#[test]
fn test_encode_quotes_names_with_tabs() {
    let mut list = three_tracks();
    list.tracks[1].name = "a\tb.raw".to_string();
    let text = list.encode().unwrap();
    assert!(text.contains("2   756 0 2352 \"a\tb.raw\" 0\n"));
    assert_eq!(TrackList::decode(&text).unwrap(), list);
}

#[test]
fn test_encode_validates_first() {
    let mut list = three_tracks();
    list.tracks[2].start = 45001;
    assert_eq!(
        list.encode(),
        Err(GdiError::InvalidStart {
            track: 3,
            start: 45001
        })
    );
}

// -- Decoding --

#[test]
fn test_decode_three_tracks() {
    let list: TrackList = THREE_TRACKS_TEXT.parse().unwrap();
    assert_eq!(list, three_tracks());
}

#[test]
fn test_decode_crlf_and_missing_trailing_newline() {
    let text = "3\r\n1 0 4 2352 track01.bin 0\r\n2 756 0 2352 track02.raw 0\r\n3 45000 4 2352 track03.bin 0";
    assert_eq!(TrackList::decode(text).unwrap(), three_tracks());
}

#[test]
fn test_decode_quoted_name() {
    let text = with_line(2, "2 756 0 2352 \"Track 02 (Audio).raw\" 0");
    let list = TrackList::decode(&text).unwrap();
    assert_eq!(list.tracks[1].name, "Track 02 (Audio).raw");
}

#[test]
fn test_round_trip() {
    let mut list = three_tracks();
    list.tracks[1].name = "Some Game (Track 2).raw".to_string();
    for n in 4..=7 {
        let kind = if n == 7 {
            TrackType::Data
        } else {
            TrackType::Audio
        };
        list.tracks
            .push(track(n, 45000 + n * 4321, kind, &format!("track{n:02}.bin")));
    }
    list.count = list.tracks.len();

    let decoded = TrackList::decode(&list.encode().unwrap()).unwrap();
    assert_eq!(decoded, list);
}

#[test]
fn test_round_trip_ignores_trim_flag() {
    let mut list = three_tracks();
    list.trim_whitespace = true;
    let decoded = TrackList::decode(&list.encode().unwrap()).unwrap();
    assert!(!decoded.trim_whitespace);
    assert_eq!(decoded.tracks, list.tracks);
}

// -- Decoding errors, one per rule --

#[test]
fn test_decode_empty_is_not_enough_tracks() {
    assert_eq!(TrackList::decode(""), Err(GdiError::NotEnoughTracks(0)));
}

#[test]
fn test_decode_not_enough_tracks() {
    let text = "2\n1 0 4 2352 track01.bin 0\n2 756 0 2352 track02.raw 0\n";
    assert_eq!(TrackList::decode(text), Err(GdiError::NotEnoughTracks(2)));
}

#[test]
fn test_decode_too_many_tracks() {
    assert_eq!(
        TrackList::decode(&with_line(0, "100")),
        Err(GdiError::TooManyTracks(100))
    );
}

#[test]
fn test_decode_inconsistent_tracks() {
    assert_eq!(
        TrackList::decode(&with_line(0, "4")),
        Err(GdiError::InconsistentTracks {
            declared: 4,
            found: 3
        })
    );
}

#[test]
fn test_decode_invalid_start() {
    assert_eq!(
        TrackList::decode(&with_line(3, "3 45150 4 2352 track03.bin 0")),
        Err(GdiError::InvalidStart {
            track: 3,
            start: 45150
        })
    );
}

#[test]
fn test_decode_invalid_type_each_position() {
    assert_eq!(
        TrackList::decode(&with_line(1, "1 0 0 2352 track01.bin 0")),
        Err(GdiError::InvalidType { track: 1 })
    );
    assert_eq!(
        TrackList::decode(&with_line(2, "2 756 4 2352 track02.raw 0")),
        Err(GdiError::InvalidType { track: 2 })
    );
    assert_eq!(
        TrackList::decode(&with_line(3, "3 45000 0 2352 track03.bin 0")),
        Err(GdiError::InvalidType { track: 3 })
    );
    assert_eq!(
        TrackList::decode(&with_line(1, "1 0 1 2352 track01.bin 0")),
        Err(GdiError::InvalidType { track: 1 })
    );
}

#[test]
fn test_decode_overlapping_tracks() {
    let text = "3
1 756 4 2352 track01.bin 0
2 0 0 2352 \"track02.raw\" 0
3 45000 4 2352 track03.bin 0
";
    assert_eq!(
        TrackList::decode(text),
        Err(GdiError::OverlappingTracks {
            track: 2,
            start: 0,
            previous: 756
        })
    );
}

#[test]
fn test_later_tracks_must_not_go_backwards() {
    let mut list = three_tracks();
    list.tracks.push(track(4, 44_000, TrackType::Audio, "track04.raw"));
    list.count = 4;
    assert_eq!(
        list.validate(),
        Err(GdiError::OverlappingTracks {
            track: 4,
            start: 44_000,
            previous: TRACK_THREE_START
        })
    );
}

#[test]
fn test_decode_non_continuous_tracks() {
    assert_eq!(
        TrackList::decode(&with_line(3, "4 45000 4 2352 track03.bin 0")),
        Err(GdiError::NonContinuousTracks {
            expected: 3,
            found: 4
        })
    );
}

#[test]
fn test_decode_invalid_sector_size() {
    assert_eq!(
        TrackList::decode(&with_line(2, "2 756 0 2048 track02.raw 0")),
        Err(GdiError::InvalidSectorSize {
            track: 2,
            size: 2048
        })
    );
}

#[test]
fn test_decode_field_not_zero() {
    assert_eq!(
        TrackList::decode(&with_line(1, "1 0 4 2352 track01.bin 1")),
        Err(GdiError::FieldNotZero { track: 1 })
    );
}

#[test]
fn test_decode_check_order_within_track() {
    // Wrong type, numbering, sector size and reserved field at once: the
    // type check comes first.
    assert_eq!(
        TrackList::decode(&with_line(1, "5 0 0 2048 track01.bin 9")),
        Err(GdiError::InvalidType { track: 1 })
    );
    // Numbering is checked before sector size.
    assert_eq!(
        TrackList::decode(&with_line(2, "7 756 0 2048 track02.raw 9")),
        Err(GdiError::NonContinuousTracks {
            expected: 2,
            found: 7
        })
    );
}

#[test]
fn test_decode_count_checked_before_tracks() {
    let text = "2\n1 0 0 2048 track01.bin 0\n2 756 0 2352 track02.raw 0\n";
    assert_eq!(TrackList::decode(text), Err(GdiError::NotEnoughTracks(2)));
}

// -- Structural and numeric parse errors --

#[test]
fn test_decode_wrong_field_count() {
    assert_eq!(
        TrackList::decode(&with_line(1, "1 0 4 2352 track01.bin")),
        Err(GdiError::InvalidTrack)
    );
    assert_eq!(
        TrackList::decode(&with_line(1, "1 0 4 2352 track 01.bin 0")),
        Err(GdiError::InvalidTrack)
    );
}

#[test]
fn test_decode_unterminated_quote() {
    assert_eq!(
        TrackList::decode(&with_line(1, "1 0 4 2352 \"track 01.bin 0")),
        Err(GdiError::InvalidTrack)
    );
}

#[test]
fn test_decode_blank_track_line() {
    let text = format!("{THREE_TRACKS_TEXT}\n");
    assert_eq!(TrackList::decode(&text), Err(GdiError::InvalidTrack));
}

#[test]
fn test_decode_bad_count_is_parse_error() {
    let err = TrackList::decode(&with_line(0, "INVALID")).unwrap_err();
    let expected = "INVALID".parse::<usize>().unwrap_err();
    assert_eq!(err, GdiError::ParseInt(expected));
    assert_eq!(err.to_string(), "invalid digit found in string");
}

#[test]
fn test_decode_bad_numeric_field_is_parse_error() {
    let err = TrackList::decode(&with_line(2, "2 INVALID 0 2352 track02.raw 0")).unwrap_err();
    assert!(matches!(err, GdiError::ParseInt(_)));
}

#[test]
fn test_decode_parse_error_wins_over_validation() {
    // Count is wrong too, but the numeric failure on the first track line
    // comes before validation ever runs.
    let text = "1\n1 0 X 2352 track01.bin 0\n";
    assert!(matches!(
        TrackList::decode(text),
        Err(GdiError::ParseInt(_))
    ));
}
