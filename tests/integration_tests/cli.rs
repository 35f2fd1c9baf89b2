use std::{error::Error, fs};

use tempfile::tempdir;

use crate::integration_tests::common::{SECTOR_SIZE, SyntheticDisc, run_tool};

#[test]
fn test_missing_argument_prints_usage() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let output = run_tool(temp_dir.path(), &[], "")?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("IMAGE"));
    Ok(())
}

#[test]
fn test_repairs_into_default_output() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("disc.iso"), SyntheticDisc::default().build())?;

    let output = run_tool(temp_dir.path(), &["disc.iso"], "")?;
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("contains 3 files"));
    assert!(stdout.contains(&format!("{} Bytes", 0xC00 * SECTOR_SIZE)));

    let fixed = temp_dir.path().join("fixed.iso");
    assert_eq!(fs::metadata(fixed)?.len(), 0xC00 * SECTOR_SIZE as u64);
    Ok(())
}

#[test]
fn test_bad_signature_exits_with_failure() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("disc.iso"), vec![0u8; 0xC00 * SECTOR_SIZE])?;

    let output = run_tool(temp_dir.path(), &["disc.iso"], "")?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a recognized disc image"));
    assert!(!temp_dir.path().join("fixed.iso").exists());
    Ok(())
}

#[test]
fn test_declining_finalized_disc_exits_cleanly() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let disc = SyntheticDisc {
        finalized: 1,
        ..Default::default()
    };
    fs::write(temp_dir.path().join("disc.iso"), disc.build())?;

    let output = run_tool(temp_dir.path(), &["disc.iso"], "no\n")?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("seems to be finalized"));
    assert!(stdout.contains("Abort."));
    assert!(!temp_dir.path().join("fixed.iso").exists());
    Ok(())
}

#[test]
fn test_accepting_finalized_disc_repairs() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let disc = SyntheticDisc {
        finalized: 1,
        ..Default::default()
    };
    fs::write(temp_dir.path().join("disc.iso"), disc.build())?;

    let output = run_tool(temp_dir.path(), &["disc.iso"], "y\n")?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("seems to be finalized"));
    assert!(!stdout.contains("Abort."));

    let fixed = temp_dir.path().join("fixed.iso");
    assert_eq!(fs::metadata(fixed)?.len(), 0xC00 * SECTOR_SIZE as u64);
    Ok(())
}

#[test]
fn test_only_lowercase_y_accepts() -> Result<(), Box<dyn Error>> {
    for reply in ["Y\n", "Yes\n", "  y\n"] {
        let temp_dir = tempdir()?;
        let disc = SyntheticDisc {
            finalized: 1,
            ..Default::default()
        };
        fs::write(temp_dir.path().join("disc.iso"), disc.build())?;

        let output = run_tool(temp_dir.path(), &["disc.iso"], reply)?;
        assert_eq!(output.status.code(), Some(0), "reply {:?}", reply);
        assert!(
            String::from_utf8_lossy(&output.stdout).contains("Abort."),
            "reply {:?} should abort",
            reply
        );
        assert!(!temp_dir.path().join("fixed.iso").exists(), "reply {:?}", reply);
    }
    Ok(())
}

#[test]
fn test_header_reported_when_copy_fails() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    // The descriptor claims more sectors than the image holds.
    let disc = SyntheticDisc {
        disc_size: 0xD00,
        ..Default::default()
    };
    fs::write(temp_dir.path().join("disc.iso"), disc.build())?;

    let output = run_tool(temp_dir.path(), &["disc.iso"], "")?;
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("contains 3 files"));
    assert!(stdout.contains(&format!("{} Bytes", 0xD00 * SECTOR_SIZE)));
    assert!(!temp_dir.path().join("fixed.iso").exists());
    Ok(())
}

#[test]
fn test_yes_flag_skips_prompt() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let disc = SyntheticDisc {
        finalized: 1,
        ..Default::default()
    };
    fs::write(temp_dir.path().join("disc.iso"), disc.build())?;

    let output = run_tool(temp_dir.path(), &["--yes", "-o", "out.iso", "disc.iso"], "")?;
    assert_eq!(output.status.code(), Some(0));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("seems to be finalized"));
    assert!(temp_dir.path().join("out.iso").exists());
    Ok(())
}
