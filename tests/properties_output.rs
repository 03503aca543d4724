mod common;

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use tempfile::tempdir;

use azkaban_jobs::errors::AzkabanError;
use azkaban_jobs::fs::RealFileSystem;
use azkaban_jobs::fs::mock::MockFileSystem;
use azkaban_jobs::job::{JobDefaults, JobRegistry, LockOptions};
use azkaban_jobs::properties::{PropertiesWriter, render_all, serialize};
use azkaban_jobs::types::JobKind;

use common::{init_tracing, lines};

const NO_DEPS: [&str; 0] = [];

fn render_one(registry: &JobRegistry, name: &str) -> Option<String> {
    let spec = registry.spec_by_name(name).unwrap();
    serialize(spec, registry.tasks())
        .unwrap()
        .map(|file| file.content)
}

#[test]
fn test_lock_lines_come_first_then_arguments_in_order() {
    init_tracing();
    let mut registry = JobRegistry::default();
    registry
        .declare(JobKind::Command, "A", NO_DEPS)
        .unwrap()
        .uses("echo hi")
        .unwrap()
        .reads("a.txt")
        .writes("b.txt");

    let spec = registry.spec_by_name("A").unwrap();
    let file = serialize(spec, registry.tasks()).unwrap().unwrap();

    assert_eq!(file.file_name, "A.job");
    assert_eq!(
        lines(&file.content),
        ["read.lock=a.txt", "write.lock=b.txt", "type=command", "command=echo hi"]
    );
    assert!(file.content.ends_with('\n'));
}

#[test]
fn test_multiple_locks_are_comma_joined() {
    let mut registry = JobRegistry::default();
    registry
        .declare(JobKind::Command, "A", NO_DEPS)
        .unwrap()
        .uses("true")
        .unwrap()
        .reads("a")
        .reads("b")
        .writes("c")
        .writes("d");

    let content = render_one(&registry, "A").unwrap();
    assert_eq!(lines(&content)[0], "read.lock=a,b");
    assert_eq!(lines(&content)[1], "write.lock=c,d");
}

#[test]
fn test_spec_without_arguments_produces_no_file() {
    let mut registry = JobRegistry::default();
    registry.declare(JobKind::Generic, "noop", NO_DEPS).unwrap();
    registry
        .declare(JobKind::Generic, "locks:only", NO_DEPS)
        .unwrap()
        .reads("a.txt");
    registry.declare_props("shared", NO_DEPS).unwrap();

    assert!(render_one(&registry, "noop").is_none());
    assert!(render_one(&registry, "locks:only").is_none());
    assert!(render_one(&registry, "shared").is_none());
    assert!(render_all(&registry).unwrap().is_empty());
}

#[test]
fn test_kind_defaults_set_type_and_primary_resource_key() {
    let mut registry = JobRegistry::default();
    registry
        .declare(JobKind::Pig, "p", NO_DEPS)
        .unwrap()
        .uses("load.pig")
        .unwrap();
    registry
        .declare(JobKind::Java, "j", NO_DEPS)
        .unwrap()
        .uses("com.example.Job")
        .unwrap();
    registry
        .declare(JobKind::JavaProcess, "jp", NO_DEPS)
        .unwrap()
        .uses("com.example.Main")
        .unwrap();
    registry
        .declare(JobKind::VoldemortBuildAndPush, "v", NO_DEPS)
        .unwrap();

    assert_eq!(
        lines(&render_one(&registry, "p").unwrap()),
        ["type=pig", "pig.script=load.pig"]
    );
    assert_eq!(
        lines(&render_one(&registry, "j").unwrap()),
        ["type=java", "job.class=com.example.Job"]
    );
    assert_eq!(
        lines(&render_one(&registry, "jp").unwrap()),
        ["type=java", "java.class=com.example.Main"]
    );
    assert_eq!(
        lines(&render_one(&registry, "v").unwrap()),
        ["type=VoldemortBuildandPush"]
    );
}

#[test]
fn test_overwritten_argument_keeps_its_position() {
    let mut registry = JobRegistry::default();
    registry
        .declare(JobKind::Generic, "g", NO_DEPS)
        .unwrap()
        .set([("first", "1"), ("second", "2")])
        .set([("first", "one")]);

    assert_eq!(
        lines(&render_one(&registry, "g").unwrap()),
        ["first=one", "second=2"]
    );
}

#[test]
fn test_dependencies_are_resolved_and_flattened() {
    let mut registry = JobRegistry::default();
    registry
        .declare(JobKind::Command, "etl:extract", NO_DEPS)
        .unwrap()
        .uses("extract.sh")
        .unwrap();
    registry
        .declare(JobKind::Command, "publish", NO_DEPS)
        .unwrap()
        .uses("publish.sh")
        .unwrap();
    registry
        .declare(JobKind::Command, "etl:daily:load", ["extract", "publish"])
        .unwrap()
        .uses("load.sh")
        .unwrap();

    let spec = registry.spec_by_name("etl:daily:load").unwrap();
    let file = serialize(spec, registry.tasks()).unwrap().unwrap();

    assert_eq!(file.file_name, "etl-daily-load.job");
    assert_eq!(
        lines(&file.content),
        [
            "type=command",
            "command=load.sh",
            "dependencies=etl-extract,publish"
        ]
    );
}

#[test]
fn test_unresolved_dependency_fails_the_spec() {
    let mut registry = JobRegistry::default();
    registry
        .declare(JobKind::Command, "load", ["missing"])
        .unwrap()
        .uses("load.sh")
        .unwrap();

    let spec = registry.spec_by_name("load").unwrap();
    match serialize(spec, registry.tasks()) {
        Err(AzkabanError::UnresolvedDependency { job, dependency }) => {
            assert_eq!(job, "load");
            assert_eq!(dependency, "missing");
        }
        other => panic!("Expected UnresolvedDependency, got: {:?}", other),
    }
}

#[test]
fn test_jvm_args_start_from_defaults_and_keep_insertion_order() {
    let mut jvm_defaults = IndexMap::new();
    jvm_defaults.insert("java.io.tmpdir".to_string(), "/tmp".to_string());
    let mut registry = JobRegistry::new(JobDefaults {
        output_dir: PathBuf::from("out"),
        jvm_args: jvm_defaults,
    });

    registry
        .declare(JobKind::Java, "j", NO_DEPS)
        .unwrap()
        .uses("com.example.Job")
        .unwrap()
        .jvm_args([("xmx", "1g"), ("env", "prod")]);
    registry
        .declare(JobKind::Java, "untouched", NO_DEPS)
        .unwrap()
        .uses("com.example.Other")
        .unwrap();

    assert_eq!(
        lines(&render_one(&registry, "j").unwrap()),
        [
            "type=java",
            "job.class=com.example.Job",
            "jvm.args=-Djava.io.tmpdir=/tmp -Dxmx=1g -Denv=prod"
        ]
    );
    // The template is only applied once JVM args are touched.
    assert!(!render_one(&registry, "untouched").unwrap().contains("jvm.args"));
}

#[test]
fn test_manual_jvm_args_win_over_synthesized_value() {
    init_tracing();
    let mut registry = JobRegistry::default();
    registry
        .declare(JobKind::Java, "j", NO_DEPS)
        .unwrap()
        .set([("jvm.args", "-Xmx2g")])
        .jvm_args([("ignored", "yes")]);

    let content = render_one(&registry, "j").unwrap();
    assert!(lines(&content).contains(&"jvm.args=-Xmx2g"));
    assert!(!content.contains("-Dignored"));
}

#[test]
fn test_caches_add_read_lock_and_cache_jvm_args() {
    let mut registry = JobRegistry::default();
    registry
        .declare(JobKind::Java, "j", NO_DEPS)
        .unwrap()
        .uses("com.example.Job")
        .unwrap()
        .caches("hdfs/lookup.dat", "lookup")
        .caches("hdfs/words.txt", "words");

    let spec = registry.spec_by_name("j").unwrap();
    assert_eq!(spec.read_locks(), ["hdfs/lookup.dat", "hdfs/words.txt"]);

    assert_eq!(
        lines(&render_one(&registry, "j").unwrap()),
        [
            "read.lock=hdfs/lookup.dat,hdfs/words.txt",
            "type=java",
            "job.class=com.example.Job",
            "jvm.args=-Dmapred.create.symlink=yes -Dmapred.cache.files=hdfs/lookup.dat#lookup,hdfs/words.txt#words"
        ]
    );
}

#[test]
fn test_pig_lock_alias_becomes_script_parameter() {
    let mut registry = JobRegistry::default();
    registry
        .declare(JobKind::Pig, "p", NO_DEPS)
        .unwrap()
        .uses("load.pig")
        .unwrap()
        .reads_with("raw/input.txt", &LockOptions::aliased("input"))
        .writes_with("clean/output", &LockOptions::aliased("output"))
        .parameter([("date", "2024-01-01")])
        .unwrap();

    let spec = registry.spec_by_name("p").unwrap();
    assert_eq!(spec.parameters().get("input").unwrap(), "raw/input.txt");
    assert_eq!(spec.parameters().get("date").unwrap(), "2024-01-01");

    assert_eq!(
        lines(&render_one(&registry, "p").unwrap()),
        [
            "read.lock=raw/input.txt",
            "write.lock=clean/output",
            "type=pig",
            "pig.script=load.pig",
            "param.input=raw/input.txt",
            "param.output=clean/output",
            "param.date=2024-01-01"
        ]
    );
}

#[test]
fn test_java_lock_alias_becomes_bare_argument() {
    let mut registry = JobRegistry::default();
    registry
        .declare(JobKind::Java, "j", NO_DEPS)
        .unwrap()
        .uses("com.example.Job")
        .unwrap()
        .reads_with("raw/input.txt", &LockOptions::aliased("input.path"));

    let spec = registry.spec_by_name("j").unwrap();
    assert_eq!(spec.argument("input.path"), Some("raw/input.txt"));
}

#[test]
fn test_other_kinds_ignore_lock_alias() {
    let mut registry = JobRegistry::default();
    registry
        .declare(JobKind::Command, "c", NO_DEPS)
        .unwrap()
        .uses("run.sh")
        .unwrap()
        .reads_with("raw/input.txt", &LockOptions::aliased("input"));

    assert_eq!(
        lines(&render_one(&registry, "c").unwrap()),
        ["read.lock=raw/input.txt", "type=command", "command=run.sh"]
    );
}

#[test]
fn test_uses_on_generic_job_is_a_config_error() {
    let mut registry = JobRegistry::default();
    let mut builder = registry.declare(JobKind::Generic, "g", NO_DEPS).unwrap();

    assert!(matches!(builder.uses("x"), Err(AzkabanError::ConfigError(_))));
}

#[test]
fn test_parameters_on_non_pig_job_are_a_config_error() {
    let mut registry = JobRegistry::default();
    let mut builder = registry.declare(JobKind::Command, "c", NO_DEPS).unwrap();

    let result = builder.parameter([("k", "v")]);
    assert!(matches!(result, Err(AzkabanError::ConfigError(_))));
}

#[test]
fn test_properties_format_uses_properties_extension() {
    let mut registry = JobRegistry::default();
    registry
        .declare_props("etl:shared", NO_DEPS)
        .unwrap()
        .set([("hdfs.root", "/data")]);

    let files = render_all(&registry).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name, "etl-shared.properties");
    assert_eq!(files[0].content, "hdfs.root=/data\n");
}

#[test]
fn test_duplicate_declaration_is_rejected() {
    let mut registry = JobRegistry::default();
    registry.declare(JobKind::Command, "a", NO_DEPS).unwrap();

    let result = registry.declare(JobKind::Pig, "a", NO_DEPS);
    assert!(matches!(result, Err(AzkabanError::DuplicateJob(_))));
}

fn sample_registry() -> JobRegistry {
    let mut registry = JobRegistry::default();
    registry
        .declare(JobKind::Command, "etl:extract", NO_DEPS)
        .unwrap()
        .uses("extract.sh")
        .unwrap()
        .writes("raw");
    registry.declare(JobKind::Generic, "etl:noop", NO_DEPS).unwrap();
    registry
        .declare(JobKind::Command, "etl:load", ["extract"])
        .unwrap()
        .uses("load.sh")
        .unwrap()
        .reads("raw");
    registry
        .declare(JobKind::Command, "etl:report", ["load"])
        .unwrap()
        .uses("report.sh")
        .unwrap();
    registry
}

#[test]
fn test_building_twice_produces_identical_files() {
    let dir = tempdir().unwrap();
    let registry = sample_registry();
    let writer = PropertiesWriter::new(RealFileSystem, dir.path().join("conf"));

    let first = writer.write_all(&registry).unwrap();
    let snapshot: Vec<Vec<u8>> = first.iter().map(|p| fs::read(p).unwrap()).collect();

    let second = writer.write_all(&registry).unwrap();
    let again: Vec<Vec<u8>> = second.iter().map(|p| fs::read(p).unwrap()).collect();

    assert_eq!(first, second);
    assert_eq!(snapshot, again);
    // The no-op job is skipped.
    assert_eq!(first.len(), 3);
    assert_eq!(
        fs::read_to_string(dir.path().join("conf/etl-load.job")).unwrap(),
        "read.lock=raw\ntype=command\ncommand=load.sh\ndependencies=etl-extract\n"
    );
}

#[test]
fn test_write_failure_reports_files_already_written() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.deny_writes("conf/etl-load.job");
    let writer = PropertiesWriter::new(fs.clone(), "conf");

    match writer.write_all(&sample_registry()) {
        Err(AzkabanError::BuildAborted { written, source }) => {
            assert_eq!(written, 1);
            assert!(source.to_string().contains("Permission denied"));
        }
        other => panic!("Expected BuildAborted, got: {:?}", other),
    }

    // Earlier files stay on disk.
    assert_eq!(fs.file_paths(), [PathBuf::from("conf/etl-extract.job")]);
    assert_eq!(
        fs.contents("conf/etl-extract.job").unwrap(),
        b"write.lock=raw\ntype=command\ncommand=extract.sh\n"
    );
}

#[test]
fn test_unresolved_dependency_aborts_build_after_earlier_files() {
    let fs = MockFileSystem::new();
    let mut registry = sample_registry();
    registry
        .declare(JobKind::Command, "etl:broken", ["nowhere"])
        .unwrap()
        .uses("broken.sh")
        .unwrap();
    let writer = PropertiesWriter::new(fs.clone(), "conf");

    match writer.write_all(&registry) {
        Err(AzkabanError::BuildAborted { written, source }) => {
            assert_eq!(written, 3);
            assert!(matches!(*source, AzkabanError::UnresolvedDependency { .. }));
        }
        other => panic!("Expected BuildAborted, got: {:?}", other),
    }
    assert_eq!(fs.file_paths().len(), 3);
}

#[test]
fn test_registry_level_declarations_by_task_id() {
    let mut registry = JobRegistry::default();
    let id = registry.declare(JobKind::Pig, "p", NO_DEPS).unwrap().id();

    registry.set_arguments(id, [("pig.script", "p.pig")]).unwrap();
    registry
        .declare_read(id, "in.txt", &LockOptions::aliased("input"))
        .unwrap();
    registry
        .declare_write(id, "out", &LockOptions::default())
        .unwrap();
    registry.declare_cache(id, "lib/udf.jar", "udf").unwrap();
    registry.set_jvm_args(id, [("xmx", "1g")]).unwrap();

    let spec = registry.spec(id).unwrap();
    assert_eq!(spec.read_locks(), ["in.txt", "lib/udf.jar"]);
    assert_eq!(spec.write_locks(), ["out"]);
    assert_eq!(
        lines(&render_one(&registry, "p").unwrap()),
        [
            "read.lock=in.txt,lib/udf.jar",
            "write.lock=out",
            "type=pig",
            "pig.script=p.pig",
            "param.input=in.txt",
            "jvm.args=-Dmapred.create.symlink=yes -Dmapred.cache.files=lib/udf.jar#udf -Dxmx=1g"
        ]
    );
}
