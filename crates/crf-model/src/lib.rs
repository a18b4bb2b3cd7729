pub mod encoding;
pub mod enums;
pub mod error;
pub mod form;
pub mod item;
pub mod validate;

pub use encoding::{decode_list, encode_list};
pub use enums::{DataType, DisplayStatus, ResponseLayout, ResponseType};
pub use error::{ModelError, Result};
pub use form::{CaseReportForm, Group, Section};
pub use item::{ConditionalDisplay, Item, ResponseOption};
pub use validate::{
    Severity, ValidationIssue, ValidationReport, validate_form, validate_item, validate_section,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_serializes() {
        let mut item = Item::new("SEX", "Sex of the subject", ResponseType::Radio);
        item.data_type = Some(DataType::Int);
        item.set_response_options([
            ResponseOption::new("Male", "1"),
            ResponseOption::new("Female", "2"),
        ]);
        let json = serde_json::to_string(&item).expect("serialize item");
        let round: Item = serde_json::from_str(&json).expect("deserialize item");
        assert_eq!(round.name, "SEX");
        assert_eq!(round.response_options_text.as_deref(), Some("Male,Female"));
        assert_eq!(round.response_options().expect("decode options").len(), 2);
    }

    #[test]
    fn report_counts() {
        let item = Item::new("BAD NAME", "", ResponseType::Text);
        let report = validate_item(&item);
        assert!(report.has_errors());
        assert_eq!(
            report.error_count() + report.warning_count(),
            report.issues.len()
        );
    }
}
