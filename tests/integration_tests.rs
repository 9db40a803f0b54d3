use hotcharts::{
    graph, summarize, AttributeSelector, ChartDispatcher, ChartError, ChartKind, Dataset, Visual,
    SPOTIFY_ATTRIBUTES,
};
use std::process::Command;

const SAMPLE_CSV: &str = "test/spotify_sample.csv";

/// Helper function to run the hotcharts binary against the sample dataset
fn run_hotcharts(args: &[&str]) -> Result<Vec<u8>, String> {
    let output = Command::new(env!("CARGO_BIN_EXE_hotcharts"))
        .args(["--data", SAMPLE_CSV])
        .args(args)
        .output()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn sample() -> Dataset {
    Dataset::load(SAMPLE_CSV).expect("Failed to load sample dataset")
}

fn selector_for(kind: ChartKind, first: &str, second: &str) -> AttributeSelector {
    if kind.arity() == 1 {
        AttributeSelector::single(first)
    } else {
        AttributeSelector::pair(first, second)
    }
}

#[test]
fn test_summarize_streams_scenario() {
    let data = Dataset::from_csv_str("streams\n10\n20\n30\n40\n50\n").unwrap();
    let stats = summarize(&data, &["streams"]).unwrap();
    let row = stats.get("streams").unwrap();
    assert_eq!(row.count, 5);
    assert_eq!(row.mean, 30.0);
    assert_eq!(row.min, 10.0);
    assert_eq!(row.median, 30.0);
    assert_eq!(row.max, 50.0);
}

#[test]
fn test_histogram_bpm_scenario() {
    let rows: String = (0..100).map(|i| format!("{},{}\n", 60 + i, i % 10)).collect();
    let data = Dataset::from_csv_str(&format!("bpm,energy\n{}", rows)).unwrap();
    let dispatcher = ChartDispatcher::new(&data);

    let figure = dispatcher
        .dispatch("histogram", &AttributeSelector::single("bpm"))
        .unwrap();
    match &figure.visual {
        Visual::Histogram(bins) => assert_eq!(bins.counts.iter().sum::<usize>(), 100),
        other => panic!("Expected histogram, got {:?}", other),
    }

    let err = dispatcher
        .dispatch("histogram", &AttributeSelector::pair("bpm", "energy"))
        .unwrap_err();
    assert!(matches!(err, ChartError::AttributeArity { expected: 1, found: 2, .. }));
}

#[test]
fn test_scatter_stats_panel_scenario() {
    let data = sample();
    let figure = ChartDispatcher::new(&data)
        .dispatch("scatter", &AttributeSelector::pair("releasedyear", "streams"))
        .unwrap();

    let rows = figure.stats_panel().unwrap().rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].attribute, "releasedyear");
    assert_eq!(rows[1].attribute, "streams");
    assert_eq!(rows[0].values().len(), 8);
    assert_eq!(rows[1].count, 40);
}

#[test]
fn test_unknown_attribute_for_every_kind() {
    let data = sample();
    let dispatcher = ChartDispatcher::new(&data);
    for kind in ChartKind::ALL {
        let err = dispatcher
            .dispatch(kind.name(), &selector_for(kind, "genre", "streams"))
            .unwrap_err();
        assert_eq!(err, ChartError::UnknownAttribute("genre".to_string()), "{}", kind);
    }
}

#[test]
fn test_empty_column_for_every_kind() {
    let data = Dataset::from_csv_str("liveness,streams\n,1\nNA,2\n,3\n").unwrap();
    let dispatcher = ChartDispatcher::new(&data);
    for kind in ChartKind::ALL {
        let err = dispatcher
            .dispatch(kind.name(), &selector_for(kind, "liveness", "streams"))
            .unwrap_err();
        assert_eq!(err, ChartError::EmptyColumn("liveness".to_string()), "{}", kind);
    }
}

#[test]
fn test_pair_without_shared_rows_renders_empty_visual() {
    // bpm and energy both have a value, but never in the same row
    let data = Dataset::from_csv_str("bpm,energy\n1,\n,3\n").unwrap();
    let dispatcher = ChartDispatcher::new(&data);
    let selector = AttributeSelector::pair("bpm", "energy");

    for kind in [ChartKind::Bar, ChartKind::Scatter, ChartKind::Line] {
        let figure = dispatcher.dispatch(kind.name(), &selector).unwrap();
        match &figure.visual {
            Visual::Bars(bars) => {
                assert!(bars.categories.is_empty() && bars.heights.is_empty());
                assert_eq!(figure.stats_panel().unwrap().rows().len(), 1);
            }
            Visual::Points(points) | Visual::Trace(points) => {
                assert!(points.is_empty());
                let rows = figure.stats_panel().unwrap().rows();
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].attribute, "bpm");
                assert_eq!(rows[1].attribute, "energy");
            }
            other => panic!("Unexpected visual for {}: {:?}", kind, other),
        }

        let png = graph::render(&figure, dispatcher.options()).unwrap();
        assert!(is_valid_png(&png), "{} did not render", kind);
    }
}

#[test]
fn test_infinite_cell_is_non_numeric() {
    let data = Dataset::from_csv_str("bpm\n1\ninf\n3\n").unwrap();
    let err = ChartDispatcher::new(&data)
        .dispatch("histogram", &AttributeSelector::single("bpm"))
        .unwrap_err();
    assert!(matches!(err, ChartError::NonNumeric { row: 2, .. }));
}

#[test]
fn test_every_kind_and_attribute_renders() {
    let data = sample();
    let dispatcher = ChartDispatcher::new(&data);
    for kind in ChartKind::ALL {
        for &attr in SPOTIFY_ATTRIBUTES.iter() {
            let selector = if kind.arity() == 1 {
                AttributeSelector::single(attr)
            } else {
                AttributeSelector::pair("releasedyear", attr)
            };
            let figure = dispatcher
                .dispatch(kind.name(), &selector)
                .unwrap_or_else(|e| panic!("{} over {:?} failed: {}", kind, selector, e));
            assert_eq!(figure.kind, kind);
            assert_eq!(figure.summary.is_some(), kind.has_stats_panel());
        }
    }
}

#[test]
fn test_arity_mismatch_for_every_kind() {
    let data = sample();
    let dispatcher = ChartDispatcher::new(&data);
    for kind in ChartKind::ALL {
        let wrong = if kind.arity() == 1 {
            AttributeSelector::pair("bpm", "energy")
        } else {
            AttributeSelector::single("bpm")
        };
        let err = dispatcher.dispatch(kind.name(), &wrong).unwrap_err();
        assert_eq!(
            err,
            ChartError::AttributeArity {
                kind: kind.name().to_string(),
                expected: kind.arity(),
                found: wrong.arity(),
            }
        );
    }
}

#[test]
fn test_rendering_leaves_dataset_unchanged() {
    let data = sample();
    let before = data.clone();
    let dispatcher = ChartDispatcher::new(&data);

    for _ in 0..3 {
        summarize(&data, &["streams", "bpm"]).unwrap();
        for kind in ChartKind::ALL {
            let _ = dispatcher.dispatch(kind.name(), &selector_for(kind, "bpm", "streams"));
        }
    }

    assert_eq!(data, before);
    assert_eq!(
        summarize(&data, &["streams"]).unwrap(),
        summarize(&before, &["streams"]).unwrap()
    );
}

#[test]
fn test_dispatch_from_threads() {
    let data = sample();
    let dispatcher = ChartDispatcher::new(&data);
    std::thread::scope(|scope| {
        let handles: Vec<_> = ChartKind::ALL
            .into_iter()
            .map(|kind| {
                let dispatcher = &dispatcher;
                scope.spawn(move || dispatcher.dispatch(kind.name(), &selector_for(kind, "bpm", "energy")))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
    });
}

#[test]
fn test_figure_renders_to_png() {
    let data = sample();
    let dispatcher = ChartDispatcher::new(&data);
    let figure = dispatcher
        .dispatch("density", &AttributeSelector::single("danceability"))
        .unwrap();
    let png = graph::render(&figure, dispatcher.options()).unwrap();
    assert!(is_valid_png(&png));
}

#[test]
fn test_end_to_end_histogram() {
    let result = run_hotcharts(&["histogram(streams)"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()), "Output is not a valid PNG");
}

#[test]
fn test_end_to_end_bar_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bar.png");
    let path_arg = path.to_str().unwrap();
    let result = run_hotcharts(&["--output", path_arg, "bar(x: releasedyear, y: streams)"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(result.unwrap().is_empty());
    assert!(is_valid_png(&std::fs::read(&path).unwrap()));
}

#[test]
fn test_end_to_end_svg_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("options.json");
    std::fs::write(&config, r#"{"type": "svg", "width": 600, "height": 600}"#).unwrap();
    let result = run_hotcharts(&["--config", config.to_str().unwrap(), "boxplot(bpm)"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let svg = String::from_utf8(result.unwrap()).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn test_end_to_end_summary() {
    let result = run_hotcharts(&["--summary", "line(releasedyear, streams)"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let text = String::from_utf8(result.unwrap()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("count") && lines[0].contains("75%"));
    assert!(lines[1].starts_with("releasedyear"));
    assert!(lines[2].starts_with("streams"));
}

#[test]
fn test_end_to_end_list_attributes() {
    let result = run_hotcharts(&["--list-attributes"]);
    let text = String::from_utf8(result.unwrap()).unwrap();
    let names: Vec<&str> = text.lines().collect();
    assert_eq!(names, SPOTIFY_ATTRIBUTES.to_vec());
}

#[test]
fn test_end_to_end_unknown_chart_kind() {
    let result = run_hotcharts(&["pie(streams)"]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("pie"));
}

#[test]
fn test_end_to_end_restricted_column() {
    let result = run_hotcharts(&["histogram(trackname)"]);
    assert!(result.is_err());
}

#[test]
fn test_end_to_end_missing_dataset() {
    let output = Command::new(env!("CARGO_BIN_EXE_hotcharts"))
        .args(["--data", "test/does-not-exist.csv", "histogram(streams)"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does-not-exist"));
}
