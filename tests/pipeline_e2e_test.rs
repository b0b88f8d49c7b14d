// ==========================================
// 管道端到端测试
// ==========================================
// 测试目标: BoM 行 → 包装推断 → 映射 → 载荷 → 落盘 → 提交
// ==========================================


use bom_to_epd::domain::{EpdUnit, Payload, PayloadComponent};
use bom_to_epd::engine::{
    AutoSkip, EpdPipeline, PipelineError, SequentialIds, PACKAGING_LABELS,
};
use bom_to_epd::api::ApiError;
use bom_to_epd::domain::MappingEntry;
use bom_to_epd::logging;
use std::sync::Arc;
use tempfile::TempDir;
use test_helpers::{
    steel_mapping, steel_scenario_rows, test_config, MockSubmitter, RecordingSink, STEEL_UUID,
};

fn steel_pipeline(dir: &TempDir, submitter: &MockSubmitter) -> EpdPipeline {
    EpdPipeline::new(
        test_config(dir.path()),
        Box::new(steel_scenario_rows()),
        Box::new(steel_mapping()),
    )
    .with_policy(Box::new(AutoSkip))
    .with_submitter(Box::new(submitter.clone()))
    .with_id_source(Box::new(SequentialIds::default()))
}

#[test]
fn test_steel_scenario_end_to_end() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let submitter = MockSubmitter::ok();

    let outcome = steel_pipeline(&dir, &submitter)
        .run()
        .unwrap()
        .expect("run should not be aborted");

    // 包装三行无映射，被丢弃
    let dropped: Vec<&str> = outcome.dropped.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(dropped, PACKAGING_LABELS.to_vec());
    for item in &outcome.dropped {
        assert!((item.amount - 6.6667).abs() < 1e-4);
    }

    // 只剩 Steel
    assert_eq!(outcome.resolved.len(), 1);
    assert_eq!(outcome.resolved[0].material, "Steel");
    assert_eq!(outcome.resolved[0].a1.amount, 10.0);
    assert_eq!(outcome.resolved[0].a1.unit, "kg");
    assert_eq!(outcome.resolved[0].a1.process_uuid, STEEL_UUID);

    // 1 个过程组件 + 根组件
    let payload = &outcome.payload;
    assert_eq!(payload.components.len(), 2);
    assert_eq!(payload.process_components().count(), 1);
    let component = payload.process_components().next().unwrap();
    assert_eq!(component.name, "Steel (A1)");
    assert_eq!(component.epd, STEEL_UUID);

    let root = payload.root_component().unwrap();
    assert_eq!(root.name, "Test Product");
    assert_eq!(root.inputs.len(), 1);
    assert_eq!(root.inputs[0].component, component.id);
    assert_eq!(root.inputs[0].amount, 10.0);
    assert!(matches!(payload.components.last(), Some(PayloadComponent::Root(_))));
    assert!(payload.check_integrity().is_ok());

    // 凭据顺序保持
    assert_eq!(payload.auth.len(), 2);
    assert_eq!(payload.auth[0].user, "user-0");
    assert_eq!(payload.auth[1].user, "user-1");

    // 文件与提交
    assert_eq!(outcome.output_path, dir.path().join("Test Product.json"));
    let saved: Payload =
        serde_json::from_str(&std::fs::read_to_string(&outcome.output_path).unwrap()).unwrap();
    assert_eq!(&saved, payload);
    assert_eq!(submitter.call_count(), 1);
    assert_eq!(outcome.status_code(), Some(200));
    assert!(outcome.finished_at >= outcome.started_at);
}

#[test]
fn test_packaging_resolves_when_mapped() {
    let dir = TempDir::new().unwrap();
    let submitter = MockSubmitter::ok();

    let mut mapping = steel_mapping();
    for (idx, label) in PACKAGING_LABELS.iter().enumerate() {
        mapping.push(
            MappingEntry::for_material(label).with_a1("kg", &format!("pack-{idx}"), None),
        );
    }

    let outcome = EpdPipeline::new(
        test_config(dir.path()),
        Box::new(steel_scenario_rows()),
        Box::new(mapping),
    )
    .with_policy(Box::new(AutoSkip))
    .with_submitter(Box::new(submitter.clone()))
    .run()
    .unwrap()
    .unwrap();

    assert!(outcome.dropped.is_empty());
    assert_eq!(outcome.resolved.len(), 4);
    let root = outcome.payload.root_component().unwrap();
    let total: f64 = root.inputs.iter().map(|i| i.amount).sum();
    assert!((total - 30.0).abs() < 1e-9);
}

#[test]
fn test_a3_stage_adds_second_component() {
    let dir = TempDir::new().unwrap();
    let submitter = MockSubmitter::ok();
    let mapping = vec![MappingEntry::for_material("steel")
        .with_a1("kg", STEEL_UUID, Some(2.0))
        .with_a3(Some("MJ"), "steel-a3", Some(0.5))];

    let outcome = EpdPipeline::new(
        test_config(dir.path()),
        Box::new(test_helpers::bom_rows(&[("Steel", "10")])),
        Box::new(mapping),
    )
    .with_submitter(Box::new(submitter))
    .run()
    .unwrap()
    .unwrap();

    let names: Vec<&str> = outcome
        .payload
        .process_components()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Steel (A1)", "Steel (A3 process)"]);

    let root = outcome.payload.root_component().unwrap();
    assert_eq!(root.inputs[0].amount, 20.0);
    assert_eq!(root.inputs[1].amount, 10.0);
    assert_eq!(root.inputs[1].unit, "MJ");
}

#[test]
fn test_idempotent_with_fixed_id_source() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();

    let first = steel_pipeline(&first_dir, &MockSubmitter::ok())
        .run()
        .unwrap()
        .unwrap();
    let second = steel_pipeline(&second_dir, &MockSubmitter::ok())
        .run()
        .unwrap()
        .unwrap();

    assert_eq!(first.payload, second.payload);
}

#[test]
fn test_no_submit_writes_file_only() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.api.api_key = None;
    config.epd.unit = EpdUnit::Items;

    let outcome = EpdPipeline::new(
        config,
        Box::new(steel_scenario_rows()),
        Box::new(steel_mapping()),
    )
    .with_policy(Box::new(AutoSkip))
    .without_submission()
    .run()
    .unwrap()
    .unwrap();

    assert!(outcome.submission.is_none());
    assert!(outcome.output_path.exists());
    assert_eq!(outcome.payload.root.unit, EpdUnit::Items);
}

#[test]
fn test_non_success_status_surfaces_after_file_written() {
    let dir = TempDir::new().unwrap();
    let submitter = MockSubmitter::with_status(500);

    let result = steel_pipeline(&dir, &submitter).run();

    match result {
        Err(PipelineError::Api(ApiError::UnexpectedStatus { status, .. })) => {
            assert_eq!(status, 500)
        }
        other => panic!("expected UnexpectedStatus, got {:?}", other.map(|_| ())),
    }
    assert!(dir.path().join("Test Product.json").exists());
}

#[test]
fn test_missing_credentials_fail_before_reading() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.auth[0].password = None;
    let submitter = MockSubmitter::ok();

    let result = EpdPipeline::new(
        config,
        Box::new(steel_scenario_rows()),
        Box::new(steel_mapping()),
    )
    .with_submitter(Box::new(submitter.clone()))
    .run();

    assert!(matches!(result, Err(PipelineError::Config(_))));
    assert_eq!(submitter.call_count(), 0);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_progress_messages_reported() {
    let dir = TempDir::new().unwrap();
    let sink = Arc::new(RecordingSink::default());

    steel_pipeline(&dir, &MockSubmitter::ok())
        .with_progress(sink.clone())
        .run()
        .unwrap()
        .unwrap();

    let messages = sink.messages();
    assert!(messages.len() >= 6);
    assert!(messages.iter().any(|m| m.contains("Packaging pallet")));
    assert!(messages.iter().any(|m| m.contains("200")));
}

#[test]
fn test_preview_lists_missing_first() {
    let dir = TempDir::new().unwrap();
    let pipeline = EpdPipeline::new(
        test_config(dir.path()),
        Box::new(steel_scenario_rows()),
        Box::new(steel_mapping()),
    );

    let preview = pipeline.preview().unwrap();
    assert_eq!(preview.found.len(), 1);
    assert_eq!(preview.found[0].material, "Steel");
    assert_eq!(preview.missing.len(), 3);

    let rendered = preview.render();
    assert!(rendered.find("Packaging pallet").unwrap() < rendered.find("Steel").unwrap());
    assert!(rendered.contains("6.6667"));
    // 预览不落盘
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
