use std::collections::BTreeMap;
use std::path::Path;

fn load(locale: &str) -> BTreeMap<String, String> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("i18n")
        .join(format!("{locale}.json"));
    let raw = std::fs::read_to_string(&path).expect("read catalog");
    serde_json::from_str(&raw).expect("parse catalog")
}

#[test]
fn hindi_catalog_covers_every_english_key() {
    let en = load("en");
    let hi = load("hi");
    let en_keys = en.keys().collect::<Vec<_>>();
    let hi_keys = hi.keys().collect::<Vec<_>>();
    assert_eq!(en_keys, hi_keys);
}

#[test]
fn placeholders_match_between_locales() {
    let en = load("en");
    let hi = load("hi");
    for (key, value) in &en {
        assert_eq!(
            value.matches("{}").count(),
            hi[key].matches("{}").count(),
            "placeholder mismatch for {key}"
        );
    }
}

#[test]
fn cli_keys_exist_in_english_catalog() {
    let catalog = load("en");
    let required = [
        "cli.about",
        "cli.help.print_help",
        "cli.help.print_version",
        "cli.fill.submitted",
        "cli.fill.not_saved",
        "cli.fill.needs_answers",
        "cli.fill.missing_fields",
        "cli.prompt.value_required",
        "cli.prompt.invalid_choice",
        "cli.prompt.select_number_or_value",
        "cli.prompt.rank",
        "cli.prompt.stdin_closed",
        "cli.validate.ok",
        "cli.validate.failed",
        "cli.report.written",
    ];
    for key in required {
        assert!(catalog.contains_key(key), "missing i18n key {key}");
    }
}
