//! Validation of a loaded blockset against its graphics and a map.
//!
//! Runs a suite of checks and reports errors and warnings. Used by
//! `polished check` and `polished info`.

mod checks;
mod warning;

pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::metatileset::Metatileset;
use crate::output::Printer;
use crate::types::Map;

/// Run all validation checks.
pub fn validate(metatileset: &Metatileset, map: &Map) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_empty_blockset(metatileset));
    result.merge(checks::check_undefined_blocks(metatileset, map));
    result.merge(checks::check_tile_refs(metatileset));
    result.merge(checks::check_collision_labels(metatileset, map));

    result
}

/// Print diagnostics to stderr.
pub fn print_diagnostics(printer: &Printer, result: &ValidationResult) {
    for d in result.iter() {
        let line = format!("[{}] {}", d.code, d.message);
        match d.severity {
            Severity::Error => printer.error("error", &line),
            Severity::Warning => printer.warning("warning", &line),
        }
        if let Some(help) = &d.help {
            printer.detail(&format!("help: {}", help));
        }
    }

    let errors = result.error_count();
    let warnings = result.warning_count();

    if errors > 0 {
        printer.error(
            "Failed",
            &format!("{} error(s), {} warning(s)", errors, warnings),
        );
    } else if warnings > 0 {
        printer.warning("Checked", &format!("{} warning(s)", warnings));
    } else {
        printer.success("Checked", "no problems found");
    }
}
