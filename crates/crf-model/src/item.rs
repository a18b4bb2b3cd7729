//! A single data-capture field definition within a CRF section.

use serde::{Deserialize, Serialize};

use crate::encoding::{decode_list, encode_list};
use crate::enums::{DataType, DisplayStatus, ResponseLayout, ResponseType};
use crate::error::{ModelError, Result};
use crate::form::Section;

/// One (text, value) choice pair offered to the data entry person for
/// selection-type items.
///
/// Response options are never stored on their own: they are decoded on
/// demand from, and flattened back into, the owning item's two encoded
/// text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseOption {
    /// Text displayed on the form.
    pub text: String,
    /// Value saved to the database when the text is chosen.
    pub value: String,
}

impl ResponseOption {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// A decoded conditional display rule: show the owning (hidden) item when
/// another item in the same section holds a given response value.
///
/// Derived from the packed SIMPLE_CONDITIONAL_DISPLAY field; never stored
/// in this form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalDisplay {
    /// Name of the item whose response controls visibility.
    pub trigger_item: String,
    /// Stored value that triggers display.
    pub trigger_value: String,
    /// The matching option on the trigger item. `None` when the trigger
    /// defines no option with that value, which is a configuration defect
    /// the caller decides how to report.
    pub option: Option<ResponseOption>,
    /// Validation message shown when the item holds a value but should no
    /// longer be visible.
    pub message: String,
}

/// A single data-capture field on a CRF.
///
/// The three encoded string fields (`response_options_text`,
/// `response_values_or_calculations`, `simple_conditional_display`) are the
/// storable representation consumed by the worksheet pipeline; the methods
/// below are the only code that interprets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique variable name for the data element. Case-sensitive; items
    /// named `item1` and `Item1` are distinct, which many downstream
    /// analysis tools handle poorly.
    pub name: String,

    /// Definition of the data element, shown in the data dictionary rather
    /// than on the form.
    pub description_label: String,

    /// Descriptive text to the left of the input, usually the question.
    #[serde(default)]
    pub left_item_text: Option<String>,

    /// Unit label shown to the right of the input.
    #[serde(default)]
    pub units: Option<String>,

    /// Supporting text to the right of the input and of any units.
    #[serde(default)]
    pub right_item_text: Option<String>,

    /// Label of the item group this item belongs to, if any.
    #[serde(default)]
    pub group_label: Option<String>,

    /// Bolded header text separating this item from the ones above it.
    #[serde(default)]
    pub header: Option<String>,

    #[serde(default)]
    pub subheader: Option<String>,

    /// Name of an item immediately preceding this one in the same section;
    /// this item is indented underneath it.
    #[serde(default)]
    pub parent_item: Option<String>,

    #[serde(default)]
    pub column_number: Option<u32>,

    /// Printed page number of the source document.
    #[serde(default)]
    pub page_number: Option<String>,

    /// Question identifier shown to the left of the item text.
    #[serde(default)]
    pub question_number: Option<String>,

    /// Data type of the captured value.
    #[serde(default)]
    pub data_type: Option<DataType>,

    pub response_type: ResponseType,

    /// Label of a reusable response set shared with other items.
    #[serde(default)]
    pub response_label: Option<String>,

    /// Encoded list of option texts shown to the data entry person. Only
    /// used by response-set types; commas inside an option are escaped.
    #[serde(default)]
    pub response_options_text: Option<String>,

    /// Encoded list of stored values paired positionally with
    /// `response_options_text`, or a calculation expression for derived
    /// items. The option and value counts must match exactly.
    #[serde(default)]
    pub response_values_or_calculations: Option<String>,

    #[serde(default)]
    pub response_layout: Option<ResponseLayout>,

    /// Value pre-filled the first time the section opens. Not supported by
    /// every response type.
    #[serde(default)]
    pub default_value: Option<String>,

    /// Field width and decimal places in the form `w(d)`.
    #[serde(default)]
    pub width_decimal: Option<String>,

    /// Edit-check expression of the form `expressionType: expression`, run
    /// when the section is saved. Evaluated by an external engine; opaque
    /// configuration here.
    #[serde(default)]
    pub validation: Option<String>,

    /// Message shown when entered data does not satisfy `validation`.
    #[serde(default)]
    pub validation_error_message: Option<String>,

    /// Marks the item as protected health information. A label only; no
    /// masking happens here.
    #[serde(default)]
    pub phi: bool,

    /// Whether data entry must provide a value (or a discrepancy note)
    /// before saving the section.
    #[serde(default)]
    pub required: bool,

    /// Initial visibility of the item; hidden items are revealed by rules
    /// or by a conditional display.
    #[serde(default)]
    pub display_status: DisplayStatus,

    /// Packed conditional display rule: ITEM_NAME, RESPONSE_VALUE, and a
    /// validation message, comma-delimited with the usual escaping. Only
    /// takes effect on hidden items; the trigger must live in the same
    /// section.
    #[serde(default)]
    pub simple_conditional_display: Option<String>,
}

impl Item {
    /// Create an item with the required fields; everything else starts
    /// unset.
    pub fn new(
        name: impl Into<String>,
        description_label: impl Into<String>,
        response_type: ResponseType,
    ) -> Self {
        Self {
            name: name.into(),
            description_label: description_label.into(),
            left_item_text: None,
            units: None,
            right_item_text: None,
            group_label: None,
            header: None,
            subheader: None,
            parent_item: None,
            column_number: None,
            page_number: None,
            question_number: None,
            data_type: None,
            response_type,
            response_label: None,
            response_options_text: None,
            response_values_or_calculations: None,
            response_layout: None,
            default_value: None,
            width_decimal: None,
            validation: None,
            validation_error_message: None,
            phi: false,
            required: false,
            display_status: DisplayStatus::default(),
            simple_conditional_display: None,
        }
    }

    /// Decode the paired option fields into (text, value) pairs.
    ///
    /// Both fields absent means no response set is configured and yields an
    /// empty list. A length mismatch between the two decoded lists is a
    /// data integrity fault and is surfaced, never truncated or padded.
    pub fn response_options(&self) -> Result<Vec<ResponseOption>> {
        if self.response_options_text.is_none() && self.response_values_or_calculations.is_none() {
            return Ok(Vec::new());
        }
        let texts = self
            .response_options_text
            .as_deref()
            .map(decode_list)
            .unwrap_or_default();
        let values = self
            .response_values_or_calculations
            .as_deref()
            .map(decode_list)
            .unwrap_or_default();
        if texts.len() != values.len() {
            return Err(ModelError::OptionCountMismatch {
                item: self.name.clone(),
                texts: texts.len(),
                values: values.len(),
            });
        }
        Ok(texts
            .into_iter()
            .zip(values)
            .map(|(text, value)| ResponseOption { text, value })
            .collect())
    }

    /// Replace the response set, encoding texts and values into the two
    /// stored fields.
    pub fn set_response_options<I>(&mut self, options: I)
    where
        I: IntoIterator<Item = ResponseOption>,
    {
        let mut texts = Vec::new();
        let mut values = Vec::new();
        for option in options {
            texts.push(option.text);
            values.push(option.value);
        }
        self.response_options_text = Some(encode_list(&texts));
        self.response_values_or_calculations = Some(encode_list(&values));
    }

    /// Resolve the conditional display rule against the section that owns
    /// this item.
    ///
    /// Returns `Ok(None)` when no rule is configured or when no section
    /// scope is available; both are valid "not configured" states, not
    /// errors. A rule that references an item the section does not contain
    /// is a reference fault and is surfaced.
    pub fn conditional_display(
        &self,
        section: Option<&Section>,
    ) -> Result<Option<ConditionalDisplay>> {
        let Some(encoded) = self.simple_conditional_display.as_deref() else {
            return Ok(None);
        };
        let Some(section) = section else {
            return Ok(None);
        };
        let (trigger_item, trigger_value, message) =
            match <[String; 3]>::try_from(decode_list(encoded)) {
                Ok([trigger_item, trigger_value, message]) => {
                    (trigger_item, trigger_value, message)
                }
                Err(parts) => {
                    return Err(ModelError::MalformedConditionalDisplay {
                        item: self.name.clone(),
                        parts: parts.len(),
                    });
                }
            };
        let trigger = section
            .item(&trigger_item)
            .ok_or_else(|| ModelError::UnknownTriggerItem {
                item: self.name.clone(),
                trigger: trigger_item.clone(),
            })?;
        let option = trigger
            .response_options()?
            .into_iter()
            .find(|option| option.value == trigger_value);
        Ok(Some(ConditionalDisplay {
            trigger_item,
            trigger_value,
            option,
            message,
        }))
    }

    /// Store a conditional display rule into the packed field. The three
    /// parts share the response option codec, so commas in the message are
    /// escaped and survive a decode.
    pub fn set_conditional_display(&mut self, display: &ConditionalDisplay) {
        self.simple_conditional_display = Some(encode_list([
            display.trigger_item.as_str(),
            display.trigger_value.as_str(),
            display.message.as_str(),
        ]));
    }
}
