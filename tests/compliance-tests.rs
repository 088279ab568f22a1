use std::{error::Error, fs::File, io::BufReader};

use jsonpath_query::{compile, find};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct TestSuite {
    tests: Vec<Case>,
}

#[derive(Deserialize)]
struct Case {
    name: String,
    selector: String,

    #[serde(default)]
    document: Value,

    #[serde(default)]
    result: Vec<Value>,

    #[serde(default)]
    result_paths: Vec<String>,

    #[serde(default)]
    invalid_selector: bool,
}

#[test]
fn compliance() -> Result<(), Box<dyn Error>> {
    // Path is relative to the crate root.
    let file = File::open("tests/cases/cases.json")?;
    let reader = BufReader::new(file);
    let test_suite: TestSuite = serde_json::from_reader(reader)?;

    for case in test_suite.tests {
        println!("{}", case.name);

        if case.invalid_selector {
            assert!(
                compile(&case.selector).is_err(),
                "{} did not fail",
                case.name
            );
            continue;
        }

        let nodes = find(&case.selector, &case.document)?;
        let values: Vec<Value> = nodes.iter().map(|n| n.value.clone()).collect();
        let paths: Vec<String> = nodes.iter().map(|n| n.path()).collect();

        assert_eq!(values, case.result, "{}: {}", case.name, case.selector);
        assert_eq!(paths, case.result_paths, "{}: {}", case.name, case.selector);
    }

    Ok(())
}
