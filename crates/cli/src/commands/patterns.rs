//! Pattern catalog listing command

use anyhow::Result;
use stamplog_timestamp_ocr::catalog;

pub fn list_patterns() -> Result<()> {
    println!("Date/time notation catalog (priority order):");

    for (index, pattern) in catalog().iter().enumerate() {
        println!("\n{:2}. {}", index + 1, pattern.name());
        println!("    Matching rule: {}", pattern.matching_rule());
        println!("    Layouts: {}", pattern.layouts().join(", "));
    }

    Ok(())
}
