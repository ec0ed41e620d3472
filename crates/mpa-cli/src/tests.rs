use super::*;
use crate::settings::Toggle;

#[test]
fn parses_search_command() {
    let cli = Cli::try_parse_from([
        "mpa",
        "search",
        "--make",
        "Carrier",
        "--model",
        "58STA",
        "--part",
        "hi limit switch",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Search(SearchArgs {
            ref make,
            ref part,
            generic: false,
            select: None,
            out: None,
            csv: None,
            ..
        })) if make == "Carrier" && part == "hi limit switch"
    ));
}

#[test]
fn parses_search_outputs_and_selection() {
    let cli = Cli::try_parse_from([
        "mpa", "search", "--make", "Carrier", "--model", "58STA", "--part", "switch", "--out",
        "results", "--csv", "suppliers.csv", "--generic", "--select", "2",
    ])
    .unwrap();

    let Some(Commands::Search(args)) = cli.command else {
        panic!("expected search command");
    };
    assert!(args.generic);
    assert_eq!(args.select, Some(2));
    assert_eq!(args.out.as_deref(), Some(std::path::Path::new("results")));
    assert_eq!(args.csv.as_deref(), Some(std::path::Path::new("suppliers.csv")));
}

#[test]
fn search_requires_all_three_fields() {
    assert!(Cli::try_parse_from(["mpa", "search", "--make", "Carrier", "--model", "58STA"]).is_err());
}

#[test]
fn parses_settings_set() {
    let cli = Cli::try_parse_from(["mpa", "settings", "set", "--speed", "2500", "--headless", "false"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Settings {
            command: SettingsCommands::Set {
                speed: Some(2500),
                headless: Some(false),
                max_attempts: None,
                capture_screenshots: None,
            }
        })
    ));
}

#[test]
fn parses_real_purchases_toggle() {
    let cli = Cli::try_parse_from(["mpa", "settings", "real-purchases", "on"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Settings {
            command: SettingsCommands::RealPurchases { state: Toggle::On }
        })
    ));
    assert!(Cli::try_parse_from(["mpa", "settings", "real-purchases", "maybe"]).is_err());
}

#[test]
fn parses_profile_delete() {
    let cli = Cli::try_parse_from(["mpa", "profile", "delete", "12"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Profile {
            command: ProfileCommands::Delete { id: 12 }
        })
    ));
}

#[test]
fn parses_purchase_with_default_quantity() {
    let cli = Cli::try_parse_from([
        "mpa",
        "purchase",
        "--part",
        "HH18HA499",
        "--supplier-url",
        "https://www.grainger.com/product/HH18HA499",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Purchase(PurchaseArgs { quantity: 1, ref part, .. })) if part == "HH18HA499"
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["mpa"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}
