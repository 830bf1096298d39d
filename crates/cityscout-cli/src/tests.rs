use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["cityscout-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert!(!cli.json);
}

#[test]
fn parses_geocode_command() {
    let cli = Cli::try_parse_from(["cityscout-cli", "geocode", "Paris"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Geocode { ref city }) if city == "Paris"
    ));
}

#[test]
fn nearby_defaults_to_attractions() {
    let cli = Cli::try_parse_from(["cityscout-cli", "nearby", "Rome"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Nearby {
            category: Category::Attraction,
            ..
        })
    ));
}

#[test]
fn nearby_accepts_category_flag() {
    let cli =
        Cli::try_parse_from(["cityscout-cli", "nearby", "Rome", "--category", "Restaurants"])
            .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Nearby {
            category: Category::Restaurant,
            ..
        })
    ));
}

#[test]
fn nearby_accepts_custom_place_type() {
    let cli =
        Cli::try_parse_from(["cityscout-cli", "nearby", "Rome", "--category", "museum"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Nearby {
            category: Category::Custom(ref t),
            ..
        }) if t == "museum"
    ));
}

#[test]
fn nearby_rejects_invalid_category() {
    let result =
        Cli::try_parse_from(["cityscout-cli", "nearby", "Rome", "--category", "caf\u{e9}s!"]);
    assert!(result.is_err());
}

#[test]
fn parses_detail_command() {
    let cli = Cli::try_parse_from(["cityscout-cli", "detail", "ChIJD7fiBh9u5kcRYJSMaMOCCwQ"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Detail { ref place_id }) if place_id == "ChIJD7fiBh9u5kcRYJSMaMOCCwQ"
    ));
}

#[test]
fn json_flag_is_global() {
    let cli = Cli::try_parse_from(["cityscout-cli", "autocomplete", "Par", "--json"]).unwrap();
    assert!(cli.json);
    assert!(matches!(cli.command, Some(Commands::Autocomplete { .. })));
}

#[test]
fn parses_explore_with_lodging() {
    let cli = Cli::try_parse_from(["cityscout-cli", "explore", "Lisbon", "--category", "lodging"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Explore {
            ref city,
            category: Category::Lodging,
        }) if city == "Lisbon"
    ));
}

#[test]
fn parses_browse_command() {
    let cli = Cli::try_parse_from(["cityscout-cli", "browse"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Browse {
            category: Category::Attraction
        })
    ));
}

#[test]
fn truncate_keeps_short_text() {
    assert_eq!(lookup::truncate("Louvre", 10), "Louvre");
}

#[test]
fn truncate_cuts_long_text_with_ellipsis() {
    let out = lookup::truncate("Cathédrale Notre-Dame de Paris", 10);
    assert_eq!(out.chars().count(), 10);
    assert!(out.ends_with('\u{2026}'));
}
