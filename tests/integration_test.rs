// Integration tests for fuzzyjoin
use fuzzyjoin::prelude::*;
use fuzzyjoin::OneOrMany;
use fuzzyjoin_similarity::{haversine_meters, parse_timestamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;

const ALL_MODES: [JoinMode; 5] = [
    JoinMode::Inner,
    JoinMode::Left,
    JoinMode::Right,
    JoinMode::Outer,
    JoinMode::Cross,
];

fn int_column(name: &str, values: impl IntoIterator<Item = i64>) -> Column {
    Column::new(name, values.into_iter().map(Value::Int).collect()).with_type(SemanticType::Integer)
}

fn float_column(name: &str, values: impl IntoIterator<Item = f64>) -> Column {
    Column::new(name, values.into_iter().map(Value::Float).collect()).with_type(SemanticType::Float)
}

fn text_column(name: &str, values: &[&str]) -> Column {
    Column::new(name, values.iter().map(|v| Value::from(*v)).collect()).with_type(SemanticType::Text)
}

fn spec(columns: Vec<JoinColumnSpec>, mode: JoinMode) -> JoinSpec {
    JoinSpec::new(columns, mode)
}

fn ids(table: &Table, column: &str) -> Vec<Option<i64>> {
    table
        .column(column)
        .unwrap()
        .values
        .iter()
        .map(|v| match v {
            Value::Int(i) => Some(*i),
            _ => None,
        })
        .collect()
}

fn random_tables(seed: u64, left_rows: usize, right_rows: usize) -> (Table, Table) {
    let mut rng = StdRng::seed_from_u64(seed);
    let words = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta"];

    let mut left_names = Vec::with_capacity(left_rows);
    let mut left_values = Vec::with_capacity(left_rows);
    for _ in 0..left_rows {
        left_names.push(words[rng.random_range(0..words.len())]);
        left_values.push(rng.random_range(0.0..100.0));
    }
    let mut right_names = Vec::with_capacity(right_rows);
    let mut right_values = Vec::with_capacity(right_rows);
    for _ in 0..right_rows {
        right_names.push(words[rng.random_range(0..words.len())]);
        right_values.push(rng.random_range(0.0..100.0));
    }

    let left = Table::new(vec![
        int_column("lid", 0..left_rows as i64),
        text_column("word", &left_names),
        float_column("value", left_values),
    ])
    .unwrap();
    let right = Table::new(vec![
        int_column("rid", 0..right_rows as i64),
        text_column("word", &right_names),
        float_column("value", right_values),
    ])
    .unwrap();
    (left, right)
}

#[test]
fn test_self_join_identity() {
    let table = Table::new(vec![
        int_column("id", [1, 2, 3, 4]),
        text_column("name", &["ann", "bo", "cy", "di"]),
    ])
    .unwrap();

    for column in ["id", "name"] {
        let output = fuzzy_join(
            &table,
            &table,
            &spec(vec![JoinColumnSpec::new(column, column, 1.0)], JoinMode::Inner),
        )
        .unwrap();
        assert_eq!(output.table.num_rows(), table.num_rows());
    }
}

#[test]
fn test_alice_alicia_example() {
    let left = Table::new(vec![int_column("id", [1]), text_column("name", &["Alice"])]).unwrap();
    let right = Table::new(vec![int_column("id", [10]), text_column("name", &["Alicia"])]).unwrap();

    let output = fuzzy_join(
        &left,
        &right,
        &spec(vec![JoinColumnSpec::new("name", "name", 0.6)], JoinMode::Inner),
    )
    .unwrap();

    assert_eq!(output.table.num_rows(), 1);
    assert_eq!(ids(&output.table, "id_left"), vec![Some(1)]);
    assert_eq!(ids(&output.table, "id_right"), vec![Some(10)]);
}

#[test]
fn test_numeric_examples() {
    let left = Table::new(vec![float_column("v", [100.0])]).unwrap();
    let right = Table::new(vec![float_column("v", [108.0]), int_column("rid", [7])]).unwrap();

    let matched = fuzzy_join(&left, &right, &spec(vec![JoinColumnSpec::new("v", "v", 0.9)], JoinMode::Inner)).unwrap();
    assert_eq!(ids(&matched.table, "rid"), vec![Some(7)]);

    let unmatched = fuzzy_join(&left, &right, &spec(vec![JoinColumnSpec::new("v", "v", 0.95)], JoinMode::Inner)).unwrap();
    assert_eq!(unmatched.table.num_rows(), 0);

    let left_join = fuzzy_join(&left, &right, &spec(vec![JoinColumnSpec::new("v", "v", 0.95)], JoinMode::Left)).unwrap();
    assert_eq!(ids(&left_join.table, "rid"), vec![None]);
}

#[test]
fn test_partition_invariance() {
    let (left, right) = random_tables(7, 53, 31);
    let columns = vec![
        JoinColumnSpec::new("word", "word", 0.8),
        JoinColumnSpec::absolute("value", "value", 15.0),
    ];

    for mode in ALL_MODES {
        let baseline = fuzzy_join(
            &left,
            &right,
            &spec(columns.clone(), mode).with_chunks(1).with_workers(1),
        )
        .unwrap();

        for (chunks, workers) in [(2, 1), (5, 2), (32, 4), (100, 0)] {
            let chunked = fuzzy_join(
                &left,
                &right,
                &spec(columns.clone(), mode).with_chunks(chunks).with_workers(workers),
            )
            .unwrap();
            assert_eq!(chunked, baseline, "mode {} with {} chunks", mode, chunks);
        }
    }
}

#[test]
fn test_numeric_monotonicity() {
    let (left, right) = random_tables(11, 80, 40);
    let mut previous = usize::MAX;
    for accuracy in [0.5, 0.7, 0.9, 0.95, 0.99, 1.0] {
        let output = fuzzy_join(
            &left,
            &right,
            &spec(vec![JoinColumnSpec::new("value", "value", accuracy)], JoinMode::Inner),
        )
        .unwrap();
        let matched_left: std::collections::BTreeSet<i64> =
            ids(&output.table, "lid").into_iter().flatten().collect();
        assert!(matched_left.len() <= previous, "accuracy {}", accuracy);
        previous = matched_left.len();
    }
}

#[test]
fn test_empty_left_in_every_mode() {
    let (_, right) = random_tables(3, 0, 10);
    let left = Table::new(vec![
        int_column("lid", []),
        text_column("word", &[]),
        float_column("value", []),
    ])
    .unwrap();

    for mode in ALL_MODES {
        let output = fuzzy_join(
            &left,
            &right,
            &spec(vec![JoinColumnSpec::new("word", "word", 0.5)], mode),
        )
        .unwrap();
        assert_eq!(output.table.num_rows(), 0, "mode {}", mode);
    }
}

#[test]
fn test_right_and_outer_keep_unmatched_right_rows() {
    let left = Table::new(vec![int_column("lid", [0, 1]), text_column("k", &["a", "b"])]).unwrap();
    let right = Table::new(vec![int_column("rid", [0, 1, 2]), text_column("k", &["c", "a", "a"])]).unwrap();
    let columns = vec![JoinColumnSpec::new("k", "k", 1.0)];

    let right_join = fuzzy_join(&left, &right, &spec(columns.clone(), JoinMode::Right)).unwrap();
    assert_eq!(ids(&right_join.table, "rid"), vec![Some(0), Some(1), Some(2)]);
    assert_eq!(ids(&right_join.table, "lid"), vec![None, Some(0), Some(0)]);

    let outer = fuzzy_join(&left, &right, &spec(columns, JoinMode::Outer)).unwrap();
    assert_eq!(ids(&outer.table, "lid"), vec![Some(0), Some(0), Some(1), None]);
    assert_eq!(ids(&outer.table, "rid"), vec![Some(1), Some(2), None, Some(0)]);
}

#[test]
fn test_geo_bound() {
    let tolerance = 500.0;
    let polygon = |lat: f64, lon: f64| format!("{},{},{},{}", lat, lon, lat + 0.01, lon + 0.01);
    let left_values: Vec<String> = (0..20).map(|i| polygon(45.0 + i as f64 * 0.003, 9.0)).collect();
    let right_values: Vec<String> = (0..20).map(|i| polygon(45.0 + i as f64 * 0.005, 9.001)).collect();

    let geo = |name: &str, values: &[String]| {
        Column::new(name, values.iter().map(|v| Value::from(v.as_str())).collect())
            .with_type(SemanticType::BoundingPolygon)
    };
    let left = Table::new(vec![int_column("lid", 0..20), geo("area", &left_values)]).unwrap();
    let right = Table::new(vec![int_column("rid", 0..20), geo("area", &right_values)]).unwrap();

    let output = fuzzy_join(
        &left,
        &right,
        &spec(vec![JoinColumnSpec::absolute("area", "area", tolerance)], JoinMode::Inner),
    )
    .unwrap();
    assert!(output.table.num_rows() > 0);

    let points = |text: &str| -> Vec<(f64, f64)> {
        let flat = fuzzyjoin_core::parse_float_list(text).unwrap();
        flat.chunks_exact(2).map(|p| (p[0], p[1])).collect()
    };
    for (l, r) in ids(&output.table, "lid").into_iter().zip(ids(&output.table, "rid")) {
        let (l, r) = (l.unwrap() as usize, r.unwrap() as usize);
        for (a, b) in points(&left_values[l]).into_iter().zip(points(&right_values[r])) {
            assert!(haversine_meters(a, b) <= tolerance);
        }
    }
}

#[test]
fn test_geo_requires_absolute_tolerance() {
    let column = Column::new("area", vec![Value::from("1,2,3,4")]).with_type(SemanticType::BoundingPolygon);
    let table = Table::new(vec![column]).unwrap();
    let result = fuzzy_join(
        &table,
        &table,
        &spec(vec![JoinColumnSpec::new("area", "area", 0.5)], JoinMode::Inner),
    );
    assert!(matches!(result, Err(Error::UnsupportedType(_))));
}

#[test]
fn test_datetime_bound() {
    let accuracy = 0.9;
    let left_dates = ["2021-03-01", "2021-03-05", "2021-03-09", "2021-03-20", "2021-04-01"];
    let right_dates = ["2021-03-02T12:00:00Z", "2021-03-12", "2021-03-31 18:00:00", "2021-02-15"];

    let dates = |name: &str, values: &[&str]| {
        Column::new(name, values.iter().map(|v| Value::from(*v)).collect())
            .with_type(SemanticType::DateTime)
    };
    let left = Table::new(vec![int_column("lid", 0..5), dates("when", &left_dates)]).unwrap();
    let right = Table::new(vec![int_column("rid", 0..4), dates("when", &right_dates)]).unwrap();

    let output = fuzzy_join(
        &left,
        &right,
        &spec(vec![JoinColumnSpec::new("when", "when", accuracy)], JoinMode::Inner),
    )
    .unwrap();
    assert!(output.table.num_rows() > 0);

    let micros = |text: &str| parse_timestamp(&Value::from(text)).unwrap().unwrap();
    let range = |values: &[&str]| {
        let times: Vec<i64> = values.iter().map(|v| micros(v)).collect();
        times.iter().max().unwrap() - times.iter().min().unwrap()
    };
    let tolerance = (1.0 - accuracy) * range(&left_dates).min(range(&right_dates)) as f64;

    for (l, r) in ids(&output.table, "lid").into_iter().zip(ids(&output.table, "rid")) {
        let delta = micros(left_dates[l.unwrap() as usize]).abs_diff(micros(right_dates[r.unwrap() as usize]));
        assert!(delta as f64 <= tolerance);
    }
}

#[test]
fn test_vector_join_with_type_hints() {
    let vectors = |name: &str, values: Vec<Vec<f64>>| {
        Column::new(name, values.into_iter().map(Value::from).collect()).with_type(SemanticType::FloatVector)
    };
    let left = Table::new(vec![
        int_column("lid", [0, 1]),
        vectors("embedding", vec![vec![1.0, 2.0], vec![5.0, 5.0]]),
    ])
    .unwrap();
    let right = Table::new(vec![
        int_column("rid", [0, 1]),
        vectors("embedding", vec![vec![1.05, 1.95], vec![9.0, 9.0]]),
        vectors("other", vec![vec![0.0], vec![1.0]]),
    ])
    .unwrap();

    let output = fuzzy_join(
        &left,
        &right,
        &spec(vec![JoinColumnSpec::absolute("embedding", "embedding", 0.1)], JoinMode::Left),
    )
    .unwrap();
    assert_eq!(ids(&output.table, "rid"), vec![Some(0), None]);
    assert_eq!(output.vector_columns, vec!["embedding", "other"]);
}

#[test]
fn test_configuration_errors() {
    let table = Table::new(vec![text_column("name", &["a"])]).unwrap();
    let bad = JoinConfig {
        right_col: OneOrMany::Many(vec!["name".into(), "name".into()]),
        ..JoinConfig::single("name", "name", 0.5)
    };
    assert!(matches!(bad.validate(), Err(Error::Configuration(_))));

    let result = fuzzy_join(
        &table,
        &table,
        &spec(vec![JoinColumnSpec::new("name", "name", 0.0)], JoinMode::Inner),
    );
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_datasets_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, dataset: &Dataset| {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(serde_json::to_string(dataset).unwrap().as_bytes()).unwrap();
        path
    };

    let left = Dataset::from_table(Table::new(vec![int_column("id", [1, 2]), text_column("city", &["Rome", "Milan"])]).unwrap());
    let right = Dataset::from_table(
        Table::new(vec![
            int_column("d3mIndex", [0, 1]),
            text_column("city", &["rome", "Turin"]),
            int_column("population", [2_800_000, 850_000]),
        ])
        .unwrap(),
    );
    let left_path = write("left.json", &left);
    let right_path = write("right.json", &right);

    let config: JoinConfig = serde_json::from_str(
        r#"{"left_col": "city", "right_col": "city", "accuracy": 0.9, "join_type": "left", "n_jobs": 2, "chunks": 4}"#,
    )
    .unwrap();
    let joined = join_datasets(
        &Dataset::from_path(&left_path).unwrap(),
        None,
        &Dataset::from_path(&right_path).unwrap(),
        None,
        &config.validate().unwrap(),
    )
    .unwrap();

    let table = &joined.dataset.resources[&joined.resource_id];
    assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "city", "population"]);
    assert_eq!(ids(table, "population"), vec![Some(2_800_000), None]);
}
