//! Definition-level validation for CRF forms, sections, and items.
//!
//! The worksheet format imposes per-field constraints (lengths, name
//! patterns, the `w(d)` width syntax) and cross-field rules that make a
//! response set or conditional display rule usable. Violations are
//! collected into a report rather than raised, so a whole definition can
//! be checked in one pass.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::encoding::decode_list;
use crate::enums::{DataType, DisplayStatus};
use crate::error::ModelError;
use crate::form::{CaseReportForm, Group, Section};
use crate::item::Item;

/// Severity of a validation issue. Errors cause the definition to be
/// rejected on upload; warnings flag configuration that is legal but
/// ineffective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single problem found in a CRF definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Name of the item the issue belongs to, when item-scoped.
    pub item: Option<String>,
    /// Worksheet field the issue refers to.
    pub field: Option<String>,
    /// Human-readable message describing the issue.
    pub message: String,
}

/// All issues found in one validation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn push(
        &mut self,
        severity: Severity,
        item: Option<&str>,
        field: Option<&str>,
        message: impl Into<String>,
    ) {
        self.issues.push(ValidationIssue {
            severity,
            item: item.map(str::to_string),
            field: field.map(str::to_string),
            message: message.into(),
        });
    }

    fn error(&mut self, item: Option<&str>, field: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Error, item, field, message);
    }

    fn warning(&mut self, item: Option<&str>, field: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Warning, item, field, message);
    }
}

/// Check a single item's field constraints.
pub fn validate_item(item: &Item) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_item(&mut report, item);
    report
}

/// Check a section: every item, plus the rules that need section scope
/// (name uniqueness, parent references, conditional display resolution).
pub fn validate_section(section: &Section) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_section(&mut report, section);
    report
}

/// Check a whole form definition.
pub fn validate_form(form: &CaseReportForm) -> ValidationReport {
    let mut report = ValidationReport::default();

    if form.name.is_empty() {
        report.error(None, Some("CRF_NAME"), "must not be empty");
    }
    check_len(&mut report, None, "CRF_NAME", Some(&form.name), 255);
    if form.version.is_empty() {
        report.error(None, Some("VERSION"), "must not be empty");
    }
    check_len(&mut report, None, "VERSION", Some(&form.version), 255);
    check_len(
        &mut report,
        None,
        "VERSION_DESCRIPTION",
        form.version_description.as_deref(),
        4000,
    );
    check_len(
        &mut report,
        None,
        "REVISION_NOTES",
        form.revision_notes.as_deref(),
        255,
    );

    let mut section_labels = HashSet::new();
    for section in &form.sections {
        if !section_labels.insert(section.label.as_str()) {
            report.error(
                None,
                Some("SECTION_LABEL"),
                format!("duplicate section label {}", section.label),
            );
        }
    }

    let mut group_labels = HashSet::new();
    for group in &form.groups {
        if !group_labels.insert(group.label.as_str()) {
            report.error(
                None,
                Some("GROUP_LABEL"),
                format!("duplicate group label {}", group.label),
            );
        }
        check_group(&mut report, group);
    }

    for section in &form.sections {
        check_section(&mut report, section);
    }

    // Item names must be unique across the whole form; within-section
    // duplicates are reported by the section pass.
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for section in &form.sections {
        for item in &section.items {
            match seen.get(item.name.as_str()) {
                Some(other) if *other != section.label.as_str() => {
                    report.error(
                        Some(&item.name),
                        Some("ITEM_NAME"),
                        format!("also used in section {other}"),
                    );
                }
                Some(_) => {}
                None => {
                    seen.insert(item.name.as_str(), section.label.as_str());
                }
            }
        }
    }

    for item in form.items() {
        if let Some(label) = item.group_label.as_deref()
            && form.group(label).is_none()
        {
            report.error(
                Some(&item.name),
                Some("GROUP_LABEL"),
                format!("references undeclared group {label}"),
            );
        }
    }

    report
}

fn check_section(report: &mut ValidationReport, section: &Section) {
    if section.label.is_empty() {
        report.error(None, Some("SECTION_LABEL"), "must not be empty");
    }
    check_len(report, None, "SECTION_LABEL", Some(&section.label), 255);
    check_len(report, None, "SECTION_TITLE", section.title.as_deref(), 2000);
    check_len(
        report,
        None,
        "INSTRUCTIONS",
        section.instructions.as_deref(),
        2000,
    );

    let mut names = HashSet::new();
    for item in &section.items {
        if !names.insert(item.name.as_str()) {
            report.error(
                Some(&item.name),
                Some("ITEM_NAME"),
                format!("duplicate item name in section {}", section.label),
            );
        }
        check_item(report, item);
    }

    for item in &section.items {
        if let Some(parent) = item.parent_item.as_deref() {
            if parent == item.name {
                report.error(
                    Some(&item.name),
                    Some("PARENT_ITEM"),
                    "an item cannot be its own parent",
                );
            } else if section.item(parent).is_none() {
                report.error(
                    Some(&item.name),
                    Some("PARENT_ITEM"),
                    format!("references item {parent} outside section {}", section.label),
                );
            }
        }
        check_conditional_display(report, section, item);
    }
}

/// Resolution checks for a conditional display rule. Field-shape problems
/// are reported by the item pass; this covers everything that needs the
/// section's other items.
fn check_conditional_display(report: &mut ValidationReport, section: &Section, item: &Item) {
    if item.simple_conditional_display.is_none() {
        return;
    }
    match item.conditional_display(Some(section)) {
        Ok(Some(display)) => match section.item(&display.trigger_item) {
            Some(trigger) if !trigger.response_type.has_response_set() => {
                report.error(
                    Some(&item.name),
                    Some("SIMPLE_CONDITIONAL_DISPLAY"),
                    format!("trigger item {} has no response set", display.trigger_item),
                );
            }
            _ => {
                if display.option.is_none() {
                    report.warning(
                        Some(&item.name),
                        Some("SIMPLE_CONDITIONAL_DISPLAY"),
                        format!(
                            "trigger item {} defines no option with value {}",
                            display.trigger_item, display.trigger_value
                        ),
                    );
                }
            }
        },
        Ok(None) => {}
        Err(ModelError::UnknownTriggerItem { trigger, .. }) => {
            report.error(
                Some(&item.name),
                Some("SIMPLE_CONDITIONAL_DISPLAY"),
                format!("references unknown item {trigger}"),
            );
        }
        // Part-count problems are reported by the item pass; an option
        // count mismatch on the trigger is reported when the trigger
        // itself is checked.
        Err(
            ModelError::MalformedConditionalDisplay { .. }
            | ModelError::OptionCountMismatch { .. },
        ) => {}
    }
}

fn check_item(report: &mut ValidationReport, item: &Item) {
    let name = item.name.as_str();

    if name.is_empty() {
        report.error(Some(name), Some("ITEM_NAME"), "must not be empty");
    } else if !is_item_name(name) {
        report.error(
            Some(name),
            Some("ITEM_NAME"),
            "allows English letters, digits, and underscores only",
        );
    }
    check_len(report, Some(name), "ITEM_NAME", Some(name), 255);

    if item.description_label.is_empty() {
        report.error(Some(name), Some("DESCRIPTION_LABEL"), "must not be empty");
    }
    check_len(
        report,
        Some(name),
        "DESCRIPTION_LABEL",
        Some(&item.description_label),
        4000,
    );

    check_len(
        report,
        Some(name),
        "LEFT_ITEM_TEXT",
        item.left_item_text.as_deref(),
        2000,
    );
    check_len(report, Some(name), "UNITS", item.units.as_deref(), 64);
    check_len(
        report,
        Some(name),
        "RIGHT_ITEM_TEXT",
        item.right_item_text.as_deref(),
        2000,
    );
    check_len(report, Some(name), "HEADER", item.header.as_deref(), 2000);
    check_len(report, Some(name), "SUBHEADER", item.subheader.as_deref(), 240);
    check_len(
        report,
        Some(name),
        "RESPONSE_OPTIONS_TEXT",
        item.response_options_text.as_deref(),
        4000,
    );
    check_len(
        report,
        Some(name),
        "RESPONSE_VALUES_OR_CALCULATIONS",
        item.response_values_or_calculations.as_deref(),
        4000,
    );
    check_len(
        report,
        Some(name),
        "DEFAULT_VALUE",
        item.default_value.as_deref(),
        4000,
    );

    if item.column_number == Some(0) {
        report.error(Some(name), Some("COLUMN_NUMBER"), "must be at least 1");
    }

    check_token(report, name, "PAGE_NUMBER", item.page_number.as_deref(), 5);
    check_token(
        report,
        name,
        "QUESTION_NUMBER",
        item.question_number.as_deref(),
        20,
    );
    check_token(
        report,
        name,
        "RESPONSE_LABEL",
        item.response_label.as_deref(),
        80,
    );

    if item.data_type.is_none() {
        report.warning(Some(name), Some("DATA_TYPE"), "not set");
    }

    if let Some(validation) = item.validation.as_deref() {
        if validation.is_empty() {
            report.error(Some(name), Some("VALIDATION"), "must not be empty when present");
        }
        check_len(report, Some(name), "VALIDATION", Some(validation), 1000);
        if item.validation_error_message.is_none() {
            report.error(
                Some(name),
                Some("VALIDATION_ERROR_MESSAGE"),
                "required when VALIDATION is set",
            );
        }
    }
    if let Some(message) = item.validation_error_message.as_deref() {
        if message.is_empty() {
            report.error(
                Some(name),
                Some("VALIDATION_ERROR_MESSAGE"),
                "must not be empty when present",
            );
        }
        check_len(
            report,
            Some(name),
            "VALIDATION_ERROR_MESSAGE",
            Some(message),
            255,
        );
    }

    if item.response_type.has_response_set() && item.response_options_text.is_none() {
        report.error(
            Some(name),
            Some("RESPONSE_OPTIONS_TEXT"),
            format!("{} items must define response options", item.response_type),
        );
    }
    if !item.response_type.has_response_set() && item.response_options_text.is_some() {
        report.warning(
            Some(name),
            Some("RESPONSE_OPTIONS_TEXT"),
            format!("ignored for {} items", item.response_type),
        );
    }
    if item.response_type.is_calculated() && item.response_values_or_calculations.is_none() {
        report.error(
            Some(name),
            Some("RESPONSE_VALUES_OR_CALCULATIONS"),
            format!("{} items must define an expression", item.response_type),
        );
    }

    // Only response-set items pair the two fields; for calculated items the
    // values field holds an expression whose commas are not separators.
    if item.response_type.has_response_set()
        && let Err(ModelError::OptionCountMismatch { texts, values, .. }) = item.response_options()
    {
        report.error(
            Some(name),
            Some("RESPONSE_OPTIONS_TEXT"),
            format!("{texts} response options but {values} stored values"),
        );
    }

    if item.default_value.is_some() && !item.response_type.allows_default_value() {
        report.error(
            Some(name),
            Some("DEFAULT_VALUE"),
            format!("not supported for {} items", item.response_type),
        );
    }

    check_width_decimal(report, item);

    if let Some(encoded) = item.simple_conditional_display.as_deref() {
        if item.display_status == DisplayStatus::Show {
            report.warning(
                Some(name),
                Some("SIMPLE_CONDITIONAL_DISPLAY"),
                "only takes effect when ITEM_DISPLAY_STATUS is HIDE",
            );
        }
        let parts = decode_list(encoded);
        if parts.len() != 3 {
            report.error(
                Some(name),
                Some("SIMPLE_CONDITIONAL_DISPLAY"),
                format!(
                    "has {} parts, expected ITEM_NAME, RESPONSE_VALUE, and a message",
                    parts.len()
                ),
            );
        }
    }
}

fn check_width_decimal(report: &mut ValidationReport, item: &Item) {
    let Some(value) = item.width_decimal.as_deref() else {
        return;
    };
    let name = item.name.as_str();
    if let Some(data_type) = item.data_type
        && !data_type.supports_width_decimal()
    {
        report.error(
            Some(name),
            Some("WIDTH_DECIMAL"),
            format!("must be blank for {data_type} items"),
        );
        return;
    }
    let Some((width, decimal)) = parse_width_decimal(value) else {
        report.error(Some(name), Some("WIDTH_DECIMAL"), "must be of the form w(d)");
        return;
    };
    let max_width = if item.data_type == Some(DataType::St) {
        4000
    } else {
        26
    };
    if let Some(width) = width
        && !(1..=max_width).contains(&width)
    {
        report.error(
            Some(name),
            Some("WIDTH_DECIMAL"),
            format!("width must be between 1 and {max_width}"),
        );
    }
    if let Some(decimal) = decimal {
        if item.data_type.is_some_and(|data_type| data_type != DataType::Real) {
            report.error(
                Some(name),
                Some("WIDTH_DECIMAL"),
                "numeric decimal places only apply to REAL items",
            );
        }
        if !(1..=20).contains(&decimal) {
            report.error(
                Some(name),
                Some("WIDTH_DECIMAL"),
                "decimal places must be between 1 and 20",
            );
        }
        if let Some(width) = width
            && decimal > width
        {
            report.error(
                Some(name),
                Some("WIDTH_DECIMAL"),
                "decimal places cannot exceed the width",
            );
        }
    }
}

/// Parse `w(d)` into optional numeric width and decimal counts; the
/// literal `w` and `d` tokens yield `None` for their position.
fn parse_width_decimal(value: &str) -> Option<(Option<u32>, Option<u32>)> {
    let rest = value.strip_suffix(')')?;
    let (width, decimal) = rest.split_once('(')?;
    let width = match width {
        "w" => None,
        _ => Some(width.parse().ok()?),
    };
    let decimal = match decimal {
        "d" => None,
        _ => Some(decimal.parse().ok()?),
    };
    Some((width, decimal))
}

fn check_group(report: &mut ValidationReport, group: &Group) {
    if group.label.is_empty() {
        report.error(None, Some("GROUP_LABEL"), "must not be empty");
    }
    check_len(report, None, "GROUP_LABEL", Some(&group.label), 255);
    if group.repeat_number == Some(0) {
        report.error(
            None,
            Some("GROUP_REPEAT_NUMBER"),
            format!("group {}: must be at least 1", group.label),
        );
    }
    if group.repeat_max == Some(0) {
        report.error(
            None,
            Some("GROUP_REPEAT_MAX"),
            format!("group {}: must be at least 1", group.label),
        );
    }
    if let (Some(number), Some(max)) = (group.repeat_number, group.repeat_max)
        && max < number
    {
        report.error(
            None,
            Some("GROUP_REPEAT_MAX"),
            format!("group {}: below GROUP_REPEAT_NUMBER", group.label),
        );
    }
}

fn check_len(
    report: &mut ValidationReport,
    item: Option<&str>,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(value) = value
        && value.len() > max
    {
        report.error(item, Some(field), format!("exceeds {max} characters"));
    }
}

/// Short identifier fields: bounded length, alphanumeric only.
fn check_token(
    report: &mut ValidationReport,
    item: &str,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    let Some(value) = value else {
        return;
    };
    if value.len() > max {
        report.error(Some(item), Some(field), format!("exceeds {max} characters"));
    }
    if !value.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        report.error(Some(item), Some(field), "must be alphanumeric");
    }
}

fn is_item_name(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ResponseType;
    use crate::item::ResponseOption;

    fn minimal_item(name: &str, response_type: ResponseType) -> Item {
        let mut item = Item::new(name, "Test item", response_type);
        item.data_type = Some(DataType::St);
        item
    }

    #[test]
    fn minimal_item_passes() {
        let report = validate_item(&minimal_item("AGE", ResponseType::Text));
        assert!(report.issues.is_empty());
    }

    #[test]
    fn item_name_pattern_is_enforced() {
        let report = validate_item(&minimal_item("BAD NAME", ResponseType::Text));
        assert!(report.has_errors());
        assert_eq!(report.issues[0].field.as_deref(), Some("ITEM_NAME"));
    }

    #[test]
    fn validation_requires_an_error_message() {
        let mut item = minimal_item("WEIGHT", ResponseType::Text);
        item.validation = Some("func: range(1, 500)".to_string());
        let report = validate_item(&item);
        assert!(report.has_errors());
        assert!(
            report
                .issues
                .iter()
                .any(|issue| issue.field.as_deref() == Some("VALIDATION_ERROR_MESSAGE"))
        );
    }

    #[test]
    fn default_value_rejected_for_radio() {
        let mut item = minimal_item("SEX", ResponseType::Radio);
        item.set_response_options([
            ResponseOption::new("Male", "1"),
            ResponseOption::new("Female", "2"),
        ]);
        item.default_value = Some("1".to_string());
        let report = validate_item(&item);
        assert!(
            report
                .issues
                .iter()
                .any(|issue| issue.field.as_deref() == Some("DEFAULT_VALUE")
                    && issue.severity == Severity::Error)
        );
    }

    #[test]
    fn response_set_items_must_define_options() {
        let report = validate_item(&minimal_item("SEX", ResponseType::Radio));
        assert!(report.has_errors());
    }

    #[test]
    fn option_count_mismatch_is_reported() {
        let mut item = minimal_item("SEV", ResponseType::SingleSelect);
        item.response_options_text = Some("Mild,Moderate,Severe".to_string());
        item.response_values_or_calculations = Some("1,2".to_string());
        let report = validate_item(&item);
        assert!(
            report
                .issues
                .iter()
                .any(|issue| issue.message.contains("3 response options but 2"))
        );
    }

    #[test]
    fn width_decimal_rules() {
        let mut item = minimal_item("BMI", ResponseType::Text);
        item.data_type = Some(DataType::Real);
        item.width_decimal = Some("5(1)".to_string());
        assert!(validate_item(&item).issues.is_empty());

        item.width_decimal = Some("5(30)".to_string());
        assert!(validate_item(&item).has_errors());

        item.width_decimal = Some("nonsense".to_string());
        assert!(validate_item(&item).has_errors());

        item.data_type = Some(DataType::Int);
        item.width_decimal = Some("5(1)".to_string());
        assert!(validate_item(&item).has_errors());

        item.data_type = Some(DataType::Date);
        assert!(validate_item(&item).has_errors());
    }

    #[test]
    fn conditional_display_on_visible_item_warns() {
        let mut item = minimal_item("PREGNANT", ResponseType::Text);
        item.simple_conditional_display = Some("SEX,2,check sex first".to_string());
        let report = validate_item(&item);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.has_errors());
    }

    #[test]
    fn section_reports_duplicate_names_and_bad_references() {
        let mut section = Section::new("demographics");
        section.add_item(minimal_item("AGE", ResponseType::Text));
        section.add_item(minimal_item("AGE", ResponseType::Text));
        let mut orphan = minimal_item("HEIGHT", ResponseType::Text);
        orphan.parent_item = Some("MISSING".to_string());
        section.add_item(orphan);
        let report = validate_section(&section);
        assert!(
            report
                .issues
                .iter()
                .any(|issue| issue.message.contains("duplicate item name"))
        );
        assert!(
            report
                .issues
                .iter()
                .any(|issue| issue.field.as_deref() == Some("PARENT_ITEM"))
        );
    }

    #[test]
    fn unresolved_trigger_is_an_error_and_missing_value_a_warning() {
        let mut sex = minimal_item("SEX", ResponseType::Radio);
        sex.set_response_options([
            ResponseOption::new("Male", "1"),
            ResponseOption::new("Female", "2"),
        ]);

        let mut hidden = minimal_item("PREGNANT", ResponseType::Text);
        hidden.display_status = DisplayStatus::Hide;
        hidden.simple_conditional_display = Some("NOBODY,2,message".to_string());

        let mut section = Section::new("demographics");
        section.add_item(sex);
        section.add_item(hidden);
        let report = validate_section(&section);
        assert!(
            report
                .issues
                .iter()
                .any(|issue| issue.message.contains("unknown item NOBODY"))
        );

        // Point at a real item but a value it never stores.
        let mut section = Section::new("demographics");
        let mut sex = minimal_item("SEX", ResponseType::Radio);
        sex.set_response_options([ResponseOption::new("Male", "1")]);
        let mut hidden = minimal_item("PREGNANT", ResponseType::Text);
        hidden.display_status = DisplayStatus::Hide;
        hidden.simple_conditional_display = Some("SEX,2,message".to_string());
        section.add_item(sex);
        section.add_item(hidden);
        let report = validate_section(&section);
        assert!(!report.has_errors());
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn form_checks_group_references() {
        let mut form = CaseReportForm::new("DEMO", "v1.0");
        let mut section = Section::new("main");
        let mut item = minimal_item("AGE", ResponseType::Text);
        item.group_label = Some("vitals".to_string());
        section.add_item(item);
        form.add_section(section);
        let report = validate_form(&form);
        assert!(
            report
                .issues
                .iter()
                .any(|issue| issue.message.contains("undeclared group vitals"))
        );
    }
}
