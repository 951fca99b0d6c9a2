use super::*;

fn fake_fallback() -> Option<ResolvedFont> {
    Some(ResolvedFont {
        bytes: Arc::new(vec![0u8; 4]),
        index: 0,
        source: FontSource::System {
            family: "Fake Sans".to_owned(),
        },
    })
}

#[test]
fn style_without_font_uses_fallback_silently() {
    let res = resolve_font_with("default", &TextStyle::default(), fake_fallback);
    assert!(res.warnings.is_empty());
    assert_eq!(
        res.font.unwrap().source,
        FontSource::System {
            family: "Fake Sans".to_owned()
        }
    );
}

#[test]
fn missing_style_font_warns_and_falls_back() {
    let style = TextStyle {
        font_path: Some(PathBuf::from("target/unit_font/absent.ttf")),
        transliteration: None,
    };
    let res = resolve_font_with("fm1", &style, fake_fallback);
    assert!(res.font.is_some());
    assert_eq!(res.warnings.len(), 1);
    assert!(matches!(
        &res.warnings[0],
        JobWarning::FontFallback { style, .. } if style == "fm1"
    ));
}

#[test]
fn garbage_font_file_is_rejected() {
    let dir = PathBuf::from("target").join("unit_font");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("garbage.ttf");
    std::fs::write(&path, b"definitely not a font").unwrap();
    let err = load_font_file(&path).unwrap_err();
    assert!(err.contains("no usable font face"), "{err}");
}

#[test]
fn no_face_at_all_still_resolves_without_error() {
    let style = TextStyle {
        font_path: Some(PathBuf::from("target/unit_font/absent.ttf")),
        transliteration: None,
    };
    let res = resolve_font_with("fm1", &style, || None);
    assert!(res.font.is_none());
    assert_eq!(res.warnings.len(), 2);
}
