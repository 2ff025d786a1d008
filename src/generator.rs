use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::debug;

use crate::catalog::{find, TestCase, CATALOG};
use crate::cli::Args;
use crate::image::{build_image, BuiltImage};

/// Builds one case's program and writes its image into `out_dir`.
///
/// # Errors
/// Fails on a definition error in the case, a size mismatch, or an I/O error.
pub fn generate_case(
    case: &TestCase,
    ordinal: usize,
    out_dir: &Path,
    image_size: usize,
) -> Result<BuiltImage> {
    let program = case
        .program()
        .with_context(|| format!("test case {} is malformed", case.name))?;
    let destination = out_dir.join(case.file_name(ordinal));
    debug!("case {ordinal} ({}): {} bytes", case.name, program.len());
    let built = build_image(&program, &destination, image_size)
        .with_context(|| format!("failed to generate {}", case.name))?;
    Ok(built)
}

/// Generates `cases` in order, stopping at the first failure.
///
/// `cases` pairs each case with its catalog ordinal so a partial selection keeps
/// the file numbering of the full catalog.
///
/// # Errors
/// Returns the first case's error; images already written are kept.
pub fn generate_all(
    cases: &[(usize, &TestCase)],
    out_dir: &Path,
    image_size: usize,
    quiet: bool,
) -> Result<Vec<BuiltImage>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut built = Vec::with_capacity(cases.len());
    for (ordinal, case) in cases {
        let image = generate_case(case, *ordinal, out_dir, image_size)?;
        if !quiet {
            println!(
                "Created {} ({} bytes program, {} bytes total)",
                image.path.display(),
                image.program_len,
                image.image_size
            );
        }
        built.push(image);
    }
    Ok(built)
}

pub fn run(args: Args) -> Result<()> {
    if args.list {
        for (idx, case) in CATALOG.iter().enumerate() {
            println!("{:<28} {}", case.file_name(idx + 1), case.summary);
        }
        return Ok(());
    }

    let cases = select_cases(&args.only)?;
    let out_dir = PathBuf::from(&args.out_dir);

    if !args.quiet {
        println!("Generating Z80 CPU test ROMs...\n");
    }
    let built = generate_all(&cases, &out_dir, args.image_size, args.quiet)?;
    println!(
        "\nGenerated {} test ROM(s) in {}, {} bytes ({:#06x}) each.",
        built.len(),
        out_dir.display(),
        args.image_size,
        args.image_size
    );
    Ok(())
}

fn select_cases(only: &[String]) -> Result<Vec<(usize, &'static TestCase)>> {
    if only.is_empty() {
        return Ok(CATALOG.iter().enumerate().map(|(idx, c)| (idx + 1, c)).collect());
    }
    let mut selected = Vec::with_capacity(only.len());
    for name in only {
        let Some(entry) = find(name) else {
            bail!("unknown test case: {name}");
        };
        if !selected.iter().any(|(ordinal, _)| *ordinal == entry.0) {
            selected.push(entry);
        }
    }
    selected.sort_by_key(|(ordinal, _)| *ordinal);
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::{generate_all, generate_case, select_cases};
    use crate::catalog::{TestCase, CATALOG};
    use crate::program::{ProgramBuilder, ProgramError};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(tag: &str) -> PathBuf {
        let uniq = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!("romgen-generator-{tag}-{uniq}"))
    }

    fn gap_behind_cursor() -> Result<Vec<u8>, ProgramError> {
        let mut p = ProgramBuilder::new();
        p.emit(&[0x00; 0x13]);
        p.pad_to(0x12)?;
        Ok(p.finish())
    }

    fn tiny() -> Result<Vec<u8>, ProgramError> {
        Ok(vec![0x76])
    }

    const BROKEN: TestCase = TestCase {
        name: "broken",
        summary: "pads behind the cursor",
        build: gap_behind_cursor,
    };

    const TINY: TestCase = TestCase {
        name: "tiny",
        summary: "HALT only",
        build: tiny,
    };

    #[test]
    fn selects_whole_catalog_by_default() {
        let cases = select_cases(&[]).expect("select");
        assert_eq!(cases.len(), CATALOG.len());
        assert_eq!(cases[0].0, 1);
        assert_eq!(cases[24].0, 25);
    }

    #[test]
    fn selection_keeps_catalog_ordinals_and_order() {
        let only = vec!["sbc".to_string(), "jump".to_string(), "sbc".to_string()];
        let cases = select_cases(&only).expect("select");
        let picked: Vec<_> = cases.iter().map(|(n, c)| (*n, c.name)).collect();
        assert_eq!(picked, vec![(6, "jump"), (13, "sbc")]);
    }

    #[test]
    fn rejects_unknown_case() {
        let err = select_cases(&["nope".to_string()]).expect_err("must fail");
        assert!(err.to_string().contains("unknown test case: nope"));
    }

    #[test]
    fn definition_error_writes_nothing() {
        let dir = scratch_dir("broken");
        fs::create_dir_all(&dir).expect("mkdir");
        let err = generate_case(&BROKEN, 99, &dir, 0x2000).expect_err("must fail");
        assert!(format!("{err:#}").contains("test case broken is malformed"));
        assert!(!dir.join("99_broken.rom").exists());
        let _ = fs::remove_dir(dir);
    }

    #[test]
    fn halts_at_first_failing_case() {
        let dir = scratch_dir("halt");
        let cases = [(1, &TINY), (2, &BROKEN), (3, &TINY)];
        let err = generate_all(&cases, &dir, 16, true).expect_err("must fail");
        assert!(format!("{err:#}").contains("broken"));
        assert!(dir.join("01_tiny.rom").exists());
        assert!(!dir.join("02_broken.rom").exists());
        assert!(!dir.join("03_tiny.rom").exists());

        let _ = fs::remove_file(dir.join("01_tiny.rom"));
        let _ = fs::remove_dir(dir);
    }

    #[test]
    fn oversized_image_request_fails_for_long_case() {
        let dir = scratch_dir("small");
        let (ordinal, case) = crate::catalog::find("push_pop").expect("case");
        let err = generate_all(&[(ordinal, case)], &dir, 16, true).expect_err("must fail");
        assert!(format!("{err:#}").contains("ROM size mismatch: expected 16, got 32"));
        assert!(!dir.join("23_push_pop.rom").exists());
        let _ = fs::remove_dir(dir);
    }
}
