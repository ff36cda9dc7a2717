//! Artifact persistence tests.

use std::fs;
use std::io::Write;

use tempfile::TempDir;

use medallion::{ArtifactWriter, Pipeline, PipelineConfig};

const ENCOUNTERS: &str = "\
encounter_id,patient_nbr,age,gender,insulin,time_in_hospital,readmitted
1,p1,[50-60),Male,Up,3,<30
2,p2,[60-70),Female,No,7,NO
";

const LOOKUPS: &str = "\
admission_type_id,description
1,Emergency
";

#[test]
fn test_persist_writes_all_artifacts() {
    let dir = TempDir::new().expect("temp dir");
    let encounters_path = dir.path().join("enc.csv");
    let lookups_path = dir.path().join("ids.csv");
    fs::File::create(&encounters_path)
        .and_then(|mut f| f.write_all(ENCOUNTERS.as_bytes()))
        .expect("write encounters");
    fs::File::create(&lookups_path)
        .and_then(|mut f| f.write_all(LOOKUPS.as_bytes()))
        .expect("write lookups");

    let run = Pipeline::new(PipelineConfig {
        encounters_path,
        lookups_path,
        ingest: Default::default(),
    })
    .run()
    .expect("pipeline");

    let data_dir = dir.path().join("data");
    let report_dir = dir.path().join("reports");
    let paths = ArtifactWriter::new(&data_dir, &report_dir)
        .persist(&run)
        .expect("persist");

    for path in [
        &paths.bronze_csv,
        &paths.silver_csv,
        &paths.ingestion_report,
        &paths.quality_report,
        &paths.silver_export_report,
    ] {
        assert!(path.exists(), "missing artifact: {}", path.display());
    }
    assert_eq!(paths.summary_files.len(), 4);

    // Summary tables carry their fixed schemas.
    let overall = fs::read_to_string(&paths.summary_files[0]).expect("read overall");
    assert!(overall.starts_with(
        "n_encounters,n_unique_patients,mean_length_of_stay_days,\
         median_length_of_stay_days,mean_num_medications,\
         readmission_rate_any,readmission_rate_30d"
    ));

    let by_insulin = fs::read_to_string(&paths.summary_files[2]).expect("read insulin");
    let mut lines = by_insulin.lines();
    assert_eq!(lines.next(), Some("insulin,n_encounters,readmission_rate"));
    assert_eq!(lines.next(), Some("No,1,0"));
    assert_eq!(lines.next(), Some("Up,1,1"));

    // Reports parse back as JSON.
    let quality: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.quality_report).expect("read"))
            .expect("valid json");
    assert_eq!(quality["row_count"], 2);
}
