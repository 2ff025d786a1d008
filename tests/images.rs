use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use pretty_assertions::assert_eq;
use romgen::catalog::CATALOG;
use romgen::generator::generate_all;
use romgen::image::{build_image, ImageError, DEFAULT_IMAGE_SIZE};
use romgen::program::{pad_to, PROGRAM_FILL};

fn scratch_dir(tag: &str) -> PathBuf {
    let uniq = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("romgen-it-{tag}-{uniq}"));
    fs::create_dir_all(&dir).expect("mkdir");
    dir
}

fn cleanup(dir: PathBuf) {
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn nop_halt_image_layout() {
    let dir = scratch_dir("nop");
    let dest = dir.join("01_nop_halt.rom");
    build_image(&[0x00, 0x00, 0x00, 0x76], &dest, DEFAULT_IMAGE_SIZE).expect("build");

    let bytes = fs::read(&dest).expect("read");
    assert_eq!(bytes.len(), 8192);
    assert_eq!(&bytes[..4], &[0x00, 0x00, 0x00, 0x76]);
    assert!(bytes[4..].iter().all(|&b| b == 0xff));
    cleanup(dir);
}

#[test]
fn gapped_program_lands_at_absolute_offsets() {
    let mut program = pad_to(vec![0x06, 0x05], 0x20, PROGRAM_FILL).expect("pad");
    program.extend_from_slice(&[0x04, 0xc9]);

    for size in [0x22, 0x100, DEFAULT_IMAGE_SIZE] {
        let dir = scratch_dir("gap");
        let dest = dir.join("gap.rom");
        build_image(&program, &dest, size).expect("build");
        let bytes = fs::read(&dest).expect("read");
        assert_eq!(bytes.len(), size);
        assert_eq!(bytes[0x20], 0x04);
        assert_eq!(bytes[0x21], 0xc9);
        cleanup(dir);
    }
}

#[test]
fn oversized_program_fails_without_output() {
    let dir = scratch_dir("oversized");
    let dest = dir.join("too_big.rom");
    let program = vec![0x00; DEFAULT_IMAGE_SIZE + 1];
    let err = build_image(&program, &dest, DEFAULT_IMAGE_SIZE).expect_err("must fail");
    assert!(matches!(
        err,
        ImageError::SizeMismatch {
            expected: 8192,
            actual: 8193
        }
    ));
    assert!(!dest.exists());
    assert_eq!(fs::read_dir(&dir).expect("read_dir").count(), 0);
    cleanup(dir);
}

#[test]
fn full_program_has_no_padding() {
    let dir = scratch_dir("full");
    let dest = dir.join("full.rom");
    let program: Vec<u8> = (0..DEFAULT_IMAGE_SIZE).map(|i| (i % 251) as u8).collect();
    build_image(&program, &dest, DEFAULT_IMAGE_SIZE).expect("build");
    assert_eq!(fs::read(&dest).expect("read"), program);
    cleanup(dir);
}

#[test]
fn every_catalog_image_is_program_then_fill() {
    let dir = scratch_dir("catalog");
    let cases: Vec<_> = CATALOG.iter().enumerate().map(|(i, c)| (i + 1, c)).collect();
    let built = generate_all(&cases, &dir, DEFAULT_IMAGE_SIZE, true).expect("generate");
    assert_eq!(built.len(), 25);

    for ((ordinal, case), image) in cases.iter().zip(&built) {
        let program = case.program().expect("program");
        let path = dir.join(case.file_name(*ordinal));
        assert_eq!(image.path, path);
        assert_eq!(image.program_len, program.len());

        let bytes = fs::read(&path).expect("read");
        assert_eq!(bytes.len(), DEFAULT_IMAGE_SIZE, "{}", case.name);
        assert_eq!(&bytes[..program.len()], program.as_slice(), "{}", case.name);
        assert!(
            bytes[program.len()..].iter().all(|&b| b == 0xff),
            "{} fill",
            case.name
        );
    }

    let mut names: Vec<_> = fs::read_dir(&dir)
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.first().map(String::as_str), Some("01_nop_halt.rom"));
    assert_eq!(names.last().map(String::as_str), Some("25_conditional_call.rom"));
    assert_eq!(names.len(), 25);
    cleanup(dir);
}

#[test]
fn regeneration_is_byte_identical() {
    let dir = scratch_dir("idem");
    let cases: Vec<_> = CATALOG.iter().enumerate().map(|(i, c)| (i + 1, c)).collect();

    generate_all(&cases, &dir, DEFAULT_IMAGE_SIZE, true).expect("first run");
    let first: Vec<Vec<u8>> = cases
        .iter()
        .map(|(n, c)| fs::read(dir.join(c.file_name(*n))).expect("read"))
        .collect();

    generate_all(&cases, &dir, DEFAULT_IMAGE_SIZE, true).expect("second run");
    let second: Vec<Vec<u8>> = cases
        .iter()
        .map(|(n, c)| fs::read(dir.join(c.file_name(*n))).expect("read"))
        .collect();

    assert!(first == second, "images differ between runs");
    cleanup(dir);
}
