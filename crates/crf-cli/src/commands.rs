//! Command implementations for the CRF definition CLI.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use tracing::{debug, info};

use crf_model::{CaseReportForm, DisplayStatus, Section, Severity, validate_form};

use crate::cli::{ItemsArgs, ValidateArgs};

/// Load a CRF definition from a JSON file.
fn load_form(path: &Path) -> Result<CaseReportForm> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let form: CaseReportForm = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parse {}", path.display()))?;
    debug!(
        sections = form.sections.len(),
        items = form.items().count(),
        "loaded CRF definition"
    );
    Ok(form)
}

/// Validate a form definition and print the issue report. Returns whether
/// the definition passed.
pub fn run_validate(args: &ValidateArgs) -> Result<bool> {
    let form = load_form(&args.form)?;
    info!(form = %form.name, version = %form.version, "validating CRF definition");
    let report = validate_form(&form);
    if report.issues.is_empty() {
        println!("{} {}: no issues found", form.name, form.version);
        return Ok(true);
    }

    let mut table = Table::new();
    table.set_header(vec!["Severity", "Item", "Field", "Message"]);
    apply_table_style(&mut table);
    for issue in &report.issues {
        let severity_cell = match issue.severity {
            Severity::Error => Cell::new("error").fg(Color::Red),
            Severity::Warning => Cell::new("warning").fg(Color::Yellow),
        };
        table.add_row(vec![
            severity_cell,
            Cell::new(issue.item.as_deref().unwrap_or("-")),
            Cell::new(issue.field.as_deref().unwrap_or("-")),
            Cell::new(&issue.message),
        ]);
    }
    println!("{table}");
    println!(
        "{} errors, {} warnings",
        report.error_count(),
        report.warning_count()
    );

    let passed = !report.has_errors() && !(args.strict && report.warning_count() > 0);
    Ok(passed)
}

/// Print the items of a form, one table per section.
pub fn run_items(args: &ItemsArgs) -> Result<()> {
    let form = load_form(&args.form)?;
    let sections: Vec<&Section> = match args.section.as_deref() {
        Some(label) => match form.section(label) {
            Some(section) => vec![section],
            None => bail!("form {} has no section {label}", form.name),
        },
        None => form.sections.iter().collect(),
    };

    for section in sections {
        println!(
            "Section {} ({} items)",
            section.label,
            section.items.len()
        );
        let mut table = Table::new();
        table.set_header(vec!["Item", "Response Type", "Options", "Required", "Hidden"]);
        apply_table_style(&mut table);
        for item in &section.items {
            let options = match item.response_options() {
                Ok(options) => options.len().to_string(),
                // Leave the count unreadable rather than fail the listing.
                Err(error) => {
                    debug!(item = %item.name, %error, "unreadable response set");
                    "?".to_string()
                }
            };
            table.add_row(vec![
                Cell::new(&item.name),
                Cell::new(item.response_type.as_str()),
                Cell::new(options),
                Cell::new(if item.required { "yes" } else { "" }),
                Cell::new(if item.display_status == DisplayStatus::Hide {
                    "yes"
                } else {
                    ""
                }),
            ]);
        }
        println!("{table}");
    }
    Ok(())
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crf_model::{DataType, Item, ResponseOption, ResponseType};

    use super::*;

    fn sample_form() -> CaseReportForm {
        let mut form = CaseReportForm::new("DEMOGRAPHICS", "v1.0");
        let mut section = Section::new("demographics");
        let mut sex = Item::new("SEX", "Sex of the subject", ResponseType::Radio);
        sex.data_type = Some(DataType::Int);
        sex.set_response_options([
            ResponseOption::new("Male", "1"),
            ResponseOption::new("Female", "2"),
        ]);
        section.add_item(sex);
        form.add_section(section);
        form
    }

    fn write_form(form: &CaseReportForm) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        let json = serde_json::to_string(form).expect("serialize form");
        file.write_all(json.as_bytes()).expect("write form");
        file
    }

    #[test]
    fn validate_passes_a_clean_form() {
        let file = write_form(&sample_form());
        let args = ValidateArgs {
            form: file.path().to_path_buf(),
            strict: false,
        };
        assert!(run_validate(&args).expect("run validate"));
    }

    #[test]
    fn validate_fails_a_broken_form() {
        let mut form = sample_form();
        form.sections[0].items[0].response_values_or_calculations = Some("1".to_string());
        let file = write_form(&form);
        let args = ValidateArgs {
            form: file.path().to_path_buf(),
            strict: false,
        };
        assert!(!run_validate(&args).expect("run validate"));
    }

    #[test]
    fn items_rejects_an_unknown_section() {
        let file = write_form(&sample_form());
        let args = ItemsArgs {
            form: file.path().to_path_buf(),
            section: Some("nope".to_string()),
        };
        assert!(run_items(&args).is_err());
    }

    #[test]
    fn items_lists_a_section() {
        let file = write_form(&sample_form());
        let args = ItemsArgs {
            form: file.path().to_path_buf(),
            section: Some("demographics".to_string()),
        };
        run_items(&args).expect("run items");
    }
}
