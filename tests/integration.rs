use std::fs;
use std::process::Command;

#[test]
fn generates_demo_page_from_reference_scene() {
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let status = Command::new(env!("CARGO_BIN_EXE_constella"))
        .args([
            "generate",
            "--input",
            "tests/fixtures/scene.yaml",
            "--output",
            output_dir.path().to_str().unwrap(),
        ])
        .status()
        .expect("Failed to execute constella");

    assert!(status.success(), "constella exited with error");

    let index_path = output_dir.path().join("index.html");
    assert!(index_path.exists(), "index.html was not generated");

    let html = fs::read_to_string(&index_path).expect("Failed to read index.html");

    // Verify key content
    assert!(
        html.contains("<title>Aurora Consulting</title>"),
        "Missing page title"
    );
    assert!(
        html.contains(r#"id="constellation""#),
        "Missing canvas element"
    );
    assert!(
        html.contains(r#""particle_count":120"#),
        "Missing embedded scene config"
    );
    assert!(
        html.contains("constella_viz.js"),
        "Missing widget loader glue"
    );
}

#[test]
fn default_invocation_without_subcommand_generates() {
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let status = Command::new(env!("CARGO_BIN_EXE_constella"))
        .args([
            "--input",
            "tests/fixtures/scene.yaml",
            "--output",
            output_dir.path().to_str().unwrap(),
        ])
        .status()
        .expect("Failed to execute constella");

    assert!(status.success(), "constella exited with error");
    assert!(output_dir.path().join("index.html").exists());
}

#[test]
fn unsupported_input_format_fails_cleanly() {
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = output_dir.path().join("scene.toml");
    fs::write(&input, "particle_count = 10").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_constella"))
        .args([
            "generate",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output_dir.path().to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute constella");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported format"), "stderr: {stderr}");
}
