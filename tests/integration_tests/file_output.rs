use std::{error::Error, fs};

use discfinalize::{RepairError, RepairOutcome, repair_image_file};
use tempfile::tempdir;

use crate::integration_tests::common::{SECTOR_SIZE, SyntheticDisc, assert_run_copied};

#[test]
fn test_repair_writes_output_file() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("disc.iso");
    let output = temp_dir.path().join("fixed.iso");
    let source = SyntheticDisc::default().build();
    fs::write(&input, &source)?;

    let outcome = repair_image_file(&input, &output, false)?;
    let report = match outcome {
        RepairOutcome::Repaired(report) => report,
        other => panic!("expected a repaired image, got {:?}", other),
    };
    assert_eq!(report.file_count, 3);
    assert_eq!(report.disc_size_bytes(), 0xC00 * SECTOR_SIZE as u64);

    let repaired = fs::read(&output)?;
    assert_eq!(repaired.len(), 0xC00 * SECTOR_SIZE);
    assert_run_copied(&repaired, &source, 0, 0x10, 0x10);
    assert_run_copied(&repaired, &source, 0xB00, 0x20, 0x10);
    assert_run_copied(&repaired, &source, 0xB10, 0x30, 0x10);

    // The source is left untouched.
    assert!(fs::read(&input)? == source);
    Ok(())
}

#[test]
fn test_declined_repair_creates_no_output() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("disc.iso");
    let output = temp_dir.path().join("fixed.iso");
    let source = SyntheticDisc {
        finalized: 1,
        ..Default::default()
    }
    .build();
    fs::write(&input, &source)?;

    let outcome = repair_image_file(&input, &output, false)?;
    assert!(matches!(outcome, RepairOutcome::Declined(d) if d.file_count == 3));
    assert!(!output.exists());
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_failed_repair_leaves_no_partial_output() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("disc.iso");
    let output = temp_dir.path().join("fixed.iso");
    // The descriptor claims more sectors than the image holds.
    let source = SyntheticDisc {
        image_sectors: 0xC00,
        disc_size: 0xD00,
        ..Default::default()
    }
    .build();
    fs::write(&input, &source)?;

    let result = repair_image_file(&input, &output, true);
    match result {
        Err(RepairError::Io { source, .. }) => {
            assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof)
        }
        other => panic!("expected an I/O error, got {:?}", other),
    }
    assert!(!output.exists());
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_missing_input_is_io_error() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let result = repair_image_file(
        &temp_dir.path().join("absent.iso"),
        &temp_dir.path().join("fixed.iso"),
        true,
    );
    assert!(matches!(result, Err(RepairError::Io { .. })));
    Ok(())
}
