// core/tests/text_properties.rs
//
// Cross-module properties of the text utilities:
// - decode/encode round trips over mixed 1-4 byte input
// - utf8_strlen agrees with decode
// - TextBuffer invariants after arbitrary edit sequences
// - Config files on disk

use libcim_core::utf8::{decode, encode, utf8_strlen};
use libcim_core::{Config, PluginSource, TextBuffer};

const SAMPLES: &[&str] = &[
    "",
    "ascii only",
    "café",
    "한글 입력기",
    "日本語とEnglish",
    "emoji 😀🎉 mixed",
    "\u{7f}\u{80}\u{7ff}\u{800}\u{ffff}\u{10000}\u{10ffff}",
];

#[test]
fn encode_decode_roundtrip() {
    for s in SAMPLES {
        let cps = decode(*s);
        assert_eq!(encode(&cps), s.as_bytes(), "round trip failed for {:?}", s);
    }
}

#[test]
fn codepoints_roundtrip_below_limit() {
    let cps: Vec<u32> = vec![0x41, 0xe9, 0x20ac, 0xac00, 0x1f600, 0x10ffff];
    assert_eq!(decode(&encode(&cps)), cps);
}

#[test]
fn strlen_agrees_with_decode() {
    for s in SAMPLES {
        assert_eq!(utf8_strlen(*s), decode(*s).len(), "length mismatch for {:?}", s);
        assert_eq!(utf8_strlen(*s), s.chars().count());
    }
}

#[test]
fn cafe_scenario() {
    let s = "café";
    assert_eq!(decode(s).len(), 4);
    assert_eq!(utf8_strlen(s), 4);
    assert_eq!(s.len(), 5);
}

#[test]
fn buffer_invariant_holds_through_edits() {
    let mut buf = TextBuffer::new();
    let check = |buf: &TextBuffer| {
        assert!(buf.capacity() >= buf.len() + 1, "capacity {} len {}", buf.capacity(), buf.len());
        assert_eq!(*buf.as_bytes_with_nul().last().unwrap(), 0);
    };

    for round in 0..40 {
        buf.append("가나다");
        check(&buf);
        buf.insert(0, "xy");
        check(&buf);
        if round % 3 == 0 {
            buf.erase(1, Some(4));
            check(&buf);
        }
        buf.overwrite(buf.len() / 2, "overwrite");
        check(&buf);
    }

    buf.erase(0, None);
    check(&buf);
    assert!(buf.is_empty());
    assert!(buf.capacity() <= 64, "capacity should shrink back, got {}", buf.capacity());
}

#[test]
fn append_is_assign_of_concatenation() {
    let pairs = [
        ("", ""),
        ("a", ""),
        ("", "b"),
        ("hello ", "세계"),
        ("abcdefghijklmnopqrstuvwxyz0123456789", "y"),
    ];
    for (a, b) in pairs {
        let mut appended = TextBuffer::new();
        appended.append(a);
        appended.append(b);

        let mut assigned = TextBuffer::new();
        assigned.assign(&format!("{}{}", a, b));

        assert_eq!(appended, assigned);
    }
}

#[test]
fn config_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cim.toml");
    std::fs::write(&path, "backend = \"fullwidth\"\n").unwrap();

    let config = Config::load_toml(&path).unwrap();
    assert_eq!(config.plugin_source(), PluginSource::Builtin("fullwidth".to_string()));

    let saved = dir.path().join("saved.toml");
    config.save_toml(&saved).unwrap();
    assert_eq!(Config::load_toml(&saved).unwrap(), config);
}

#[test]
fn config_rejects_bad_toml() {
    assert!(Config::from_toml_str("backend = [").is_err());
}
