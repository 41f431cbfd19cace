use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use std::process::Command;

fn constant_input(n: usize) -> String {
    let mut s = String::from("# constant input\n");
    for _ in 0..n {
        s.push_str("1.0\n");
    }
    s
}

fn parse_output(text: &str) -> Vec<Vec<f64>> {
    text.lines()
        .map(|line| line.split(',').map(|x| x.parse().unwrap()).collect())
        .collect()
}

#[test]
fn lowpass_text() -> anyhow::Result<()> {
    let tmp = assert_fs::TempDir::new()?;
    let input = tmp.child("input.txt");
    let output = tmp.child("output.txt");
    input.write_str(&constant_input(500))?;

    let mut cmd = Command::cargo_bin("cfilter")?;
    cmd.arg(input.path())
        .arg(output.path())
        .args(&["--cutoff", "1", "--sample-period", "0.01", "--derivative"]);
    cmd.assert().success();

    let out = parse_output(&std::fs::read_to_string(output.path())?);
    assert_eq!(out.len(), 500);
    assert!(out[0][0] > 0.0 && out[0][0] < 0.01);
    assert!((out[499][0] - 1.0).abs() < 1e-3);
    assert!(out[499][1].abs() < 1e-3);
    Ok(())
}

#[test]
fn highpass_text() -> anyhow::Result<()> {
    let tmp = assert_fs::TempDir::new()?;
    let input = tmp.child("input.txt");
    let output = tmp.child("output.txt");
    input.write_str(&constant_input(500))?;

    let mut cmd = Command::cargo_bin("cfilter")?;
    cmd.arg(input.path()).arg(output.path()).args(&[
        "--kind",
        "highpass",
        "--cutoff",
        "1",
        "--sample-rate",
        "100",
    ]);
    cmd.assert().success();

    let out = parse_output(&std::fs::read_to_string(output.path())?);
    assert_eq!(out.len(), 500);
    assert_eq!(out[0].len(), 1);
    assert!(out[0][0] > 0.0);
    assert!(out[499][0].abs() < 1e-3);
    Ok(())
}

#[test]
fn wav_round_trip() -> anyhow::Result<()> {
    let tmp = assert_fs::TempDir::new()?;
    let input = tmp.child("input.wav");
    let output = tmp.child("output.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(input.path(), spec)?;
    for _ in 0..300 {
        writer.write_sample(i16::MAX / 2)?;
    }
    writer.finalize()?;

    let mut cmd = Command::cargo_bin("cfilter")?;
    cmd.arg(input.path()).arg(output.path()).args(&["--cutoff", "2"]);
    cmd.assert().success();

    let mut reader = hound::WavReader::open(output.path())?;
    assert_eq!(reader.spec().sample_rate, 100);
    let samples = reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(samples.len(), 300);
    assert!((samples[299] - 0.5).abs() < 1e-3);
    Ok(())
}

#[test]
fn missing_sample_rate() -> anyhow::Result<()> {
    let tmp = assert_fs::TempDir::new()?;
    let input = tmp.child("input.txt");
    let output = tmp.child("output.txt");
    input.write_str("1.0\n")?;

    let mut cmd = Command::cargo_bin("cfilter")?;
    cmd.arg(input.path()).arg(output.path()).args(&["--cutoff", "1"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("--sample-rate or --sample-period"));
    Ok(())
}

#[test]
fn invalid_parameters() -> anyhow::Result<()> {
    let tmp = assert_fs::TempDir::new()?;
    let input = tmp.child("input.txt");
    let output = tmp.child("output.txt");
    input.write_str("1.0\n")?;

    let mut cmd = Command::cargo_bin("cfilter")?;
    cmd.arg(input.path())
        .arg(output.path())
        .args(&["--cutoff", "0", "--sample-rate", "100"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("must be a positive number"));
    Ok(())
}

#[test]
fn invalid_sample() -> anyhow::Result<()> {
    let tmp = assert_fs::TempDir::new()?;
    let input = tmp.child("input.txt");
    let output = tmp.child("output.txt");
    input.write_str("1.0\n\nabc\n")?;

    let mut cmd = Command::cargo_bin("cfilter")?;
    cmd.arg(input.path())
        .arg(output.path())
        .args(&["--cutoff", "1", "--sample-rate", "100"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Invalid sample"))
        .stderr(predicates::str::contains("on line 3"));
    Ok(())
}

#[test]
fn invalid_wav() -> anyhow::Result<()> {
    let tmp = assert_fs::TempDir::new()?;
    let input = tmp.child("input.txt");
    let output = tmp.child("output.txt");
    input.write_binary(&vec![0u8; 480])?;

    let mut cmd = Command::cargo_bin("cfilter")?;
    cmd.arg("--wav-in")
        .arg(input.path())
        .arg(output.path())
        .args(&["--cutoff", "1"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("no RIFF tag found"));
    Ok(())
}

#[test]
fn wav_rate_out_of_range() -> anyhow::Result<()> {
    let tmp = assert_fs::TempDir::new()?;
    let input = tmp.child("input.txt");
    let output = tmp.child("output.wav");
    input.write_str("1.0\n2.0\n")?;

    let mut cmd = Command::cargo_bin("cfilter")?;
    cmd.arg(input.path())
        .arg(output.path())
        .args(&["--cutoff", "0.01", "--sample-period", "5"]);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicates::str::contains("cannot be written to a wav file"));
    assert!(!output.path().exists());

    // The same period is fine for text output.
    let output = tmp.child("output.txt");
    let mut cmd = Command::cargo_bin("cfilter")?;
    cmd.arg(input.path())
        .arg(output.path())
        .args(&["--cutoff", "0.01", "--sample-period", "5"]);
    cmd.assert().success();
    Ok(())
}

#[test]
fn warns_at_nyquist() -> anyhow::Result<()> {
    let tmp = assert_fs::TempDir::new()?;
    let input = tmp.child("input.txt");
    let output = tmp.child("output.txt");
    input.write_str("1.0\n")?;

    let mut cmd = Command::cargo_bin("cfilter")?;
    cmd.env("RUST_LOG", "warn")
        .arg(input.path())
        .arg(output.path())
        .args(&["--cutoff", "50", "--sample-rate", "100"]);
    cmd.assert()
        .success()
        .stderr(predicates::str::contains("at or above the Nyquist frequency"));
    Ok(())
}
