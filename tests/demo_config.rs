mod common;

use std::path::PathBuf;

use azkaban_jobs::config::load_registry;
use azkaban_jobs::graph::{DotSink, GraphOptions, GraphStyle, LockGraph};
use azkaban_jobs::job::check_acyclic;
use azkaban_jobs::properties::render_all;

use common::{init_tracing, lines};

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/Jobs.toml")
}

#[test]
fn test_demo_file_builds() {
    init_tracing();
    let (cfg, registry) = load_registry(demo_path()).unwrap();
    check_acyclic(&registry).unwrap();

    assert_eq!(cfg.deploy.project.as_deref(), Some("etl"));

    let files = render_all(&registry).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(
        names,
        [
            "prepare.job",
            "etl-extract.job",
            "etl-load.job",
            "report-daily.job",
            "etl-common.properties"
        ]
    );

    let report = lines(&files[3].content);
    assert_eq!(report.last(), Some(&"dependencies=etl-load"));

    let extract = lines(&files[1].content);
    assert!(extract.contains(&"param.input=raw/events"));
    assert!(extract.contains(&"param.output=work/events"));
    assert!(extract.contains(&"dependencies=prepare"));
}

#[test]
fn test_demo_file_graph() {
    let (_cfg, registry) = load_registry(demo_path()).unwrap();
    let graph = LockGraph::build(
        &registry,
        &GraphOptions {
            namespaces: vec!["etl".to_string()],
            include_task_edges: true,
        },
    );

    // extract and load; the properties file has no locks.
    assert_eq!(graph.nodes().filter(|n| n.is_task()).count(), 2);

    let mut sink = DotSink::new("etl");
    graph.render(&GraphStyle::default(), &mut sink);
    let dot = sink.finish();
    assert!(dot.contains("\"TASKetlextract\" -> \"TASKetlload\" [style=dotted];"));
    assert!(dot.contains("\"DATAworkevents\" -> \"TASKetlload\" [style=solid];"));
}
