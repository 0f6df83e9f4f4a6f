use super::*;

#[test]
fn keys_round_trip_and_unknown_is_indoor() {
    for m in Mood::ALL {
        assert_eq!(Mood::from_key(m.key()), m);
    }
    assert_eq!(Mood::from_key("Sunset-Warm"), Mood::SunsetWarm);
    assert_eq!(Mood::from_key("disco"), Mood::Indoor);
}

#[test]
fn serde_uses_kebab_keys_and_tolerates_unknown() {
    assert_eq!(serde_json::to_string(&Mood::SunsetCold).unwrap(), "\"sunset-cold\"");
    let m: Mood = serde_json::from_str("\"day-cool\"").unwrap();
    assert_eq!(m, Mood::DayCool);
    let m: Mood = serde_json::from_str("\"neon\"").unwrap();
    assert_eq!(m, Mood::Indoor);
}

#[test]
fn stock_table_has_every_mood_and_indoor_is_off() {
    let t = MoodTable::default();
    for m in Mood::ALL {
        if m == Mood::Indoor {
            assert_eq!(t.config(m), MoodConfig::OFF);
        } else {
            assert!(t.config(m).haze.opacity > 0.0, "{m}");
        }
    }
    assert_eq!(t.mood_for_sky("sky-night"), Some(Mood::Night));
    assert_eq!(t.mood_for_sky("sky-mars"), None);
}

#[test]
fn json_overrides_merge_onto_stock() {
    let json = r#"{
        "moods": {
            "night": {
                "haze": { "color": [10, 20, 30], "opacity": 0.9, "height": 12.0 },
                "spill": { "color": [0, 0, 0], "opacity": 0.0, "height": 0.0 },
                "dust": { "count": 3, "color": [255, 255, 255] }
            }
        },
        "skies": { "sky-mars": "sand" }
    }"#;
    let t = MoodTable::from_reader(json.as_bytes()).unwrap();
    assert_eq!(t.config(Mood::Night).haze.color, [10, 20, 30]);
    assert_eq!(t.mood_for_sky("sky-mars"), Some(Mood::Sand));
    assert_eq!(t.mood_for_sky("sky-day"), Some(Mood::DayWarm));
}

#[test]
fn json_overrides_are_validated() {
    let json = r#"{ "moods": { "dusk": {
        "haze": { "color": [0, 0, 0], "opacity": 2.0, "height": 10.0 },
        "spill": { "color": [0, 0, 0], "opacity": 0.0, "height": 0.0 },
        "dust": { "count": 0, "color": [0, 0, 0] } } } }"#;
    assert!(matches!(
        MoodTable::from_reader(json.as_bytes()),
        Err(TableauError::Validation(_))
    ));
    assert!(matches!(
        MoodTable::from_reader("[1, 2]".as_bytes()),
        Err(TableauError::Serde(_))
    ));
}

fn blank(
    _: crate::FrameIndex,
    _: &crate::StyleParams,
    c: crate::Canvas,
) -> TableauResult<crate::Layer> {
    crate::Layer::for_canvas(c)
}

#[test]
fn audit_reports_unmapped_mismatched_and_unregistered() {
    let t = MoodTable::default();
    let mut registry = AssetRegistry::new();
    registry.register("sky-night", blank);
    registry.register("hills", blank);
    let combos = [
        SceneCombo::new("sky-night", "hills", Mood::Night),
        SceneCombo::new("sky-night", "hills", Mood::Dawn),
        SceneCombo::new("sky-void", "hills", Mood::Night),
    ];
    let issues = t.audit(&combos, &registry);
    assert_eq!(
        issues,
        vec![
            TableIssue::MoodMismatch {
                sky: "sky-night".into(),
                expected: Mood::Dawn,
                found: Mood::Night
            },
            TableIssue::UnmappedSky {
                sky: "sky-void".into()
            },
            TableIssue::Unregistered {
                id: "sky-void".into()
            },
        ]
    );
}
