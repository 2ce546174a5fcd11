use howmuch_core::format::THIN_SPACE;
use howmuch_core::{convert, Catalog, ComparisonRow, Engine, Query, UnitRow, MAX_CONVERSIONS};
use pretty_assertions::assert_eq;

fn unit(name: &str, symbol: &str, aliases: &str, equivalent_to: &str) -> UnitRow {
    UnitRow {
        name: name.into(),
        symbol: symbol.into(),
        aliases: aliases.into(),
        equivalent_to: equivalent_to.into(),
        ..UnitRow::default()
    }
}

#[test]
fn test_two_kilometres_to_metres() {
    let catalog = Catalog::build(
        &[
            unit("metre", "m", "meter, meters", "1 m"),
            unit("kilometre", "km", "kilometer", "1000 m"),
        ],
        &[],
    )
    .unwrap();

    let engine = Engine::new(catalog);
    let query = engine.query("2 km");
    let answer = query.answer().expect("2 km should be recognized");
    assert_eq!(answer.fundamental_quantity, 2000.0);
    assert_eq!(answer.unit.fundamental_unit, "m");

    let metre = &answer.conversions[0];
    assert_eq!(metre.unit.name, "metre");
    assert_eq!(metre.quantity, 2000.0);
}

#[test]
fn test_energy_chain() {
    let rows = [
        unit("gigajoule", "GJ", "", "1000 MJ"),
        unit("megajoule", "MJ", "", "1000 kJ"),
        unit("kilojoule", "kJ", "", "1000 J"),
        unit("joule", "J", "", "1 J"),
    ];
    let catalog = Catalog::build(&rows, &[]).unwrap();
    let gj = catalog.lookup("GJ").unwrap();
    assert_eq!(gj.fundamental_unit, "j");
    assert_eq!(gj.fundamental_quantity, 1e9);

    // Building again from the same rows gives the same fundamentals
    let again = Catalog::build(&rows, &[]).unwrap();
    assert_eq!(catalog.units(), again.units());
}

#[test]
fn test_comparison_thresholds() {
    let catalog = Catalog::build(
        &[unit("litre", "l", "liter, liters", "1 l")],
        &[
            ComparisonRow {
                name: "a bucket".into(),
                equivalent_to: "10 l".into(),
                description: String::new(),
            },
            ComparisonRow {
                name: "a bathtub".into(),
                equivalent_to: "150 l".into(),
                description: String::new(),
            },
        ],
    )
    .unwrap();
    let engine = Engine::new(catalog);

    let query = engine.query("24 litres");
    let answer = query.answer().unwrap();
    let phrases: Vec<&str> = answer.comparisons.iter().map(|c| c.phrase.as_str()).collect();
    assert_eq!(phrases, vec!["16% of a bathtub", "2.4 × a bucket"]);

    let query = engine.query("99.9 l");
    assert_eq!(query.answer().unwrap().comparisons.len(), 2);

    let query = engine.query("100 l");
    let names: Vec<&str> = query
        .answer()
        .unwrap()
        .comparisons
        .iter()
        .map(|c| c.comparison.name.as_str())
        .collect();
    assert_eq!(names, vec!["a bathtub"]);
}

#[test]
fn test_builtin_answers() {
    let engine = Engine::builtin().unwrap();

    let query = engine.query("2 km");
    let answer = query.answer().unwrap();
    assert_eq!(answer.unit.name, "kilometre");
    assert!(answer.conversions.len() <= MAX_CONVERSIONS);
    for candidate in &answer.conversions {
        assert_eq!(candidate.unit.fundamental_unit, "m");
        assert_ne!(candidate.unit.name, "kilometre");
        assert_ne!(candidate.unit.name, "league");
    }
    assert!(answer
        .comparisons
        .iter()
        .any(|c| c.comparison.name == "a marathon"));
}

#[test]
fn test_builtin_rough_match() {
    let engine = Engine::builtin().unwrap();
    let query = engine.query("1500 KILO-watt hours");
    let answer = query.answer().unwrap();
    assert_eq!(answer.unit.name, "kilowatt hour");
    assert_eq!(answer.fundamental_quantity, 1500.0 * 3.6e6);
    assert_eq!(
        answer.interpretation,
        "KILO-watt hours is probably kilowatt hour (kWh)"
    );
}

#[test]
fn test_builtin_gigajoule() {
    let catalog = Catalog::builtin().unwrap();
    let gj = catalog.lookup("gigajoules").unwrap();
    assert_eq!(gj.fundamental_unit, "j");
    assert_eq!(gj.fundamental_quantity, 1e9);
}

#[test]
fn test_excluded_unit_is_still_an_input() {
    let engine = Engine::builtin().unwrap();
    let query = engine.query("1 league");
    let answer = query.answer().unwrap();
    assert_eq!(answer.unit.name, "league");
    assert!(!answer.conversions.is_empty());
}

#[test]
fn test_not_recognized_and_incomplete() {
    let engine = Engine::builtin().unwrap();
    assert!(matches!(engine.query("3 wibbles"), Query::Unrecognized { .. }));
    assert_eq!(engine.query("3"), Query::Incomplete);
    assert_eq!(engine.query("litres"), Query::Incomplete);
}

/// Converting to another unit at the input's figures and back lands within
/// the rounding those figures allow
#[test]
fn test_round_trip_within_rounding() {
    let catalog = Catalog::builtin().unwrap();
    let figures = 2;
    let tolerance = 0.05;

    for from in catalog.units() {
        let conversion = convert(&catalog, 1.5, &from.name, figures).unwrap();
        for candidate in &conversion.candidates {
            let number = candidate
                .formatted
                .split(THIN_SPACE)
                .take_while(|part| part.chars().all(|c| c.is_ascii_digit() || c == '.'))
                .collect::<String>();
            let shown: f64 = number.parse().unwrap();

            let back =
                convert(&catalog, shown, &candidate.unit.name, figures).unwrap();
            let back = back.fundamental_quantity / from.fundamental_quantity;
            assert!(
                (back - 1.5).abs() / 1.5 <= tolerance,
                "{} -> {} ({}) -> {}",
                from.name,
                candidate.unit.name,
                candidate.formatted,
                back
            );
        }
    }
}

/// Halves round up, so a quarter day shows as 0.3 at one figure
#[test]
fn test_builtin_ties_round_up() {
    let engine = Engine::builtin().unwrap();
    let query = engine.query("6 h");
    let answer = query.answer().unwrap();
    let day = answer
        .conversions
        .iter()
        .find(|c| c.unit.name == "day")
        .expect("day should be among the conversions");
    assert_eq!(day.quantity, 0.25);
    assert_eq!(day.formatted, format!("0.3{THIN_SPACE}d"));
}

#[test]
fn test_interpretation_shows_symbol_equal_to_name() {
    let engine = Engine::builtin().unwrap();
    let query = engine.query("2 cups");
    assert_eq!(
        query.answer().unwrap().interpretation,
        "cups is probably cup (cup)"
    );
}
