use intake_spec::{
    AnswerSet, FormController, PersistenceGateway, Rank, ScalarField, Service, from_flat_record,
    to_flat_record,
};
use intake_store::{FileGateway, GatewayKind, StoreConfig};
use tempfile::TempDir;

fn answers(name: &str) -> AnswerSet {
    let mut answers = AnswerSet {
        name: name.into(),
        age: "41".into(),
        gender: "male".into(),
        contact: "9000000000".into(),
        address: "Naugaon Road".into(),
        emergency_contact: "9000000001".into(),
        blood_group: "A+".into(),
        ..AnswerSet::default()
    };
    answers.set_rank(Service::GenericMedicines, Some(Rank::First));
    answers
}

#[tokio::test]
async fn appends_one_line_per_record() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("nested").join("responses.jsonl");
    let gateway = FileGateway::new(&path);

    gateway
        .insert(&to_flat_record(&answers("Ravi")))
        .await
        .expect("first insert");
    gateway
        .insert(&to_flat_record(&answers("Meena")))
        .await
        .expect("second insert");

    let raw = std::fs::read_to_string(&path).expect("read file");
    assert_eq!(raw.lines().count(), 2);

    let records = gateway.read_records().await.expect("records");
    let restored = from_flat_record(&records[1]).expect("answers");
    assert_eq!(restored, answers("Meena"));
}

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let dir = TempDir::new().expect("tempdir");
    let gateway = FileGateway::new(dir.path().join("none.jsonl"));
    assert!(gateway.read_records().await.expect("records").is_empty());
}

#[tokio::test]
async fn controller_submits_through_configured_file_gateway() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("responses.jsonl");
    let mut config = StoreConfig::default();
    config.gateway.kind = GatewayKind::File;
    config.gateway.path = Some(path.clone());

    let gateway = config.build_gateway().expect("gateway");
    let mut controller = FormController::with_answers(gateway, answers("Ravi"));
    controller
        .set_text(ScalarField::Feedback, "Need a lab nearby")
        .expect("editable");
    controller.submit().await.expect("submitted");

    let records = FileGateway::new(&path).read_records().await.expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["feedback"], "Need a lab nearby");
    assert_eq!(records[0]["services_needed"], r#"{"generic-medicines":"1"}"#);
}
