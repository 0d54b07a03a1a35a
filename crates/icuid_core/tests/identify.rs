use icuid_core::{backend::{NoCpuid, ReplayCpu}, *};

fn check_fixture(name: &str, text: &str) {
    let fixture = match Fixture::parse(text) {
        Ok(fixture) => fixture,
        Err(err) => panic!("{name}: {err}"),
    };
    assert!(!fixture.expectations.is_empty(), "{name} has no expected results");

    let info = identify_with(Some(fixture.raw.clone()), &NoCpuid).expect("passed data should always decode");
    let mismatches = fixture.expectations.check(&info);
    assert!(mismatches.is_empty(), "{name}:\n{}", mismatches.iter().map(|mismatch| mismatch.to_string()).collect::<Vec<_>>().join("\n"));

    // Acquiring the dump again through a backend has to give the same results
    let replayed = identify_with(None, &ReplayCpu::new(fixture.raw)).expect("replayed data should always decode");
    assert_eq!(replayed, info, "{name}: replayed results differ");
}

macro_rules! fixture_test {
    ($name:ident, $file:literal) => {
        #[test]
        fn $name() {
            check_fixture($file, include_str!(concat!("data/", $file)));
        }
    };
}

fixture_test!(coffee_lake, "coffee_lake.txt");
fixture_test!(ryzen_1700, "ryzen_1700.txt");
fixture_test!(wolfdale, "wolfdale.txt");

#[test]
fn fixture_features_are_known() {
    let fixture = Fixture::parse(include_str!("data/ryzen_1700.txt")).expect("fixture should parse");
    let names = fixture.expectations.get("features").expect("fixture has features");
    for name in names.split_whitespace() {
        assert!(CpuFeature::from_name(name).is_some(), "'{name}' isn't a known feature");
    }
}

#[test]
fn summary_of_fixture() {
    let fixture = Fixture::parse(include_str!("data/wolfdale.txt")).expect("fixture should parse");
    let info = identify_with(Some(fixture.raw), &NoCpuid).expect("passed data should always decode");
    let summary = info.to_string();
    assert!(summary.contains(" CPU         : Intel(R) Core(TM)2 Duo CPU     E8400  @ 3.00GHz\n"));
    assert!(summary.contains(" Codename    : Wolfdale\n"));
    assert!(summary.contains(" L2 Cache    : 6144kB\n"));
    assert!(summary.contains(" Address szs : 36 bits physical, 48 bits virtual\n"));
    assert!(!summary.contains("L4 Cache"));
}

#[test]
fn expectations_render_back() {
    let fixture = Fixture::parse(include_str!("data/coffee_lake.txt")).expect("fixture should parse");
    let info = identify_with(Some(fixture.raw.clone()), &NoCpuid).expect("passed data should always decode");

    let text = format!("{}{}", serialize(&fixture.raw), Expectations::render(&info));
    let rendered = Fixture::parse(&text).expect("rendered fixture should parse");
    assert_eq!(rendered.raw, fixture.raw);
    assert_eq!(rendered.expectations, fixture.expectations);
}
