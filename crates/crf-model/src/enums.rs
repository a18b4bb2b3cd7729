//! Type-safe enumerations for CRF item metadata.
//!
//! These enums give compile-time safety to concepts the worksheet format
//! represents as strings. `FromStr` implementations are forgiving about the
//! casing and separator variants found in authored spreadsheets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of form input an item renders as.
///
/// Based on the standard HTML form elements. Which response types an item
/// may use depends on its data type and on whether it defines a response set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseType {
    /// Single-line free text input.
    Text,
    /// Multi-line free text input.
    Textarea,
    /// Drop-down allowing one choice from the response set.
    SingleSelect,
    /// List allowing several choices from the response set.
    MultiSelect,
    /// Radio buttons; one choice, cannot be deselected once picked.
    Radio,
    /// Checkboxes; several choices from the response set.
    Checkbox,
    /// Value derived from other items via an expression.
    Calculation,
    /// Cumulative calculation over a repeating item group.
    GroupCalculation,
    /// File upload.
    File,
    /// Calculation evaluated on change of a trigger item.
    InstantCalculation,
}

impl ResponseType {
    /// Returns the worksheet token for this response type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Text => "text",
            ResponseType::Textarea => "textarea",
            ResponseType::SingleSelect => "single-select",
            ResponseType::MultiSelect => "multi-select",
            ResponseType::Radio => "radio",
            ResponseType::Checkbox => "checkbox",
            ResponseType::Calculation => "calculation",
            ResponseType::GroupCalculation => "group-calculation",
            ResponseType::File => "file",
            ResponseType::InstantCalculation => "instant-calculation",
        }
    }

    /// Returns true if this response type presents a set of predefined
    /// (text, value) options to the data entry person.
    pub fn has_response_set(&self) -> bool {
        matches!(
            self,
            ResponseType::SingleSelect
                | ResponseType::MultiSelect
                | ResponseType::Radio
                | ResponseType::Checkbox
        )
    }

    /// Returns true if the item's value is derived rather than entered.
    pub fn is_calculated(&self) -> bool {
        matches!(
            self,
            ResponseType::Calculation
                | ResponseType::GroupCalculation
                | ResponseType::InstantCalculation
        )
    }

    /// Returns true if a DEFAULT_VALUE may be specified for this response
    /// type. Radio inputs and derived values reject defaults.
    pub fn allows_default_value(&self) -> bool {
        matches!(
            self,
            ResponseType::Text
                | ResponseType::Textarea
                | ResponseType::SingleSelect
                | ResponseType::MultiSelect
                | ResponseType::Checkbox
        )
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = String;

    /// Parse a worksheet response type token (case-insensitive; accepts
    /// underscores or spaces in place of hyphens).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "text" => Ok(ResponseType::Text),
            "textarea" => Ok(ResponseType::Textarea),
            "single-select" => Ok(ResponseType::SingleSelect),
            "multi-select" => Ok(ResponseType::MultiSelect),
            "radio" => Ok(ResponseType::Radio),
            "checkbox" => Ok(ResponseType::Checkbox),
            "calculation" => Ok(ResponseType::Calculation),
            "group-calculation" => Ok(ResponseType::GroupCalculation),
            "file" => Ok(ResponseType::File),
            "instant-calculation" => Ok(ResponseType::InstantCalculation),
            _ => Err(format!("Unknown response type: {s}")),
        }
    }
}

/// The data type of the value an item captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    /// Character string.
    St,
    /// Integer.
    Int,
    /// Real number.
    Real,
    /// Full date.
    Date,
    /// Partial date (year or year-month).
    Pdate,
    /// Uploaded file reference.
    File,
}

impl DataType {
    /// Returns the worksheet token for this data type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::St => "ST",
            DataType::Int => "INT",
            DataType::Real => "REAL",
            DataType::Date => "DATE",
            DataType::Pdate => "PDATE",
            DataType::File => "FILE",
        }
    }

    /// Returns true if WIDTH_DECIMAL applies to this data type. Date and
    /// file items must leave the field blank.
    pub fn supports_width_decimal(&self) -> bool {
        matches!(self, DataType::St | DataType::Int | DataType::Real)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ST" => Ok(DataType::St),
            "INT" => Ok(DataType::Int),
            "REAL" => Ok(DataType::Real),
            "DATE" => Ok(DataType::Date),
            "PDATE" => Ok(DataType::Pdate),
            "FILE" => Ok(DataType::File),
            _ => Err(format!("Unknown data type: {s}")),
        }
    }
}

/// Layout of the options for radio and checkbox items. Blank defaults to
/// vertical, a single column from top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseLayout {
    /// Options in a single row, left to right.
    Horizontal,
    /// Options in a single column, top to bottom.
    #[default]
    Vertical,
}

impl ResponseLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseLayout::Horizontal => "HORIZONTAL",
            ResponseLayout::Vertical => "VERTICAL",
        }
    }
}

impl fmt::Display for ResponseLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResponseLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HORIZONTAL" => Ok(ResponseLayout::Horizontal),
            "VERTICAL" => Ok(ResponseLayout::Vertical),
            _ => Err(format!("Unknown response layout: {s}")),
        }
    }
}

/// Whether an item is visible when the form opens for data entry. Hidden
/// items are revealed by a conditional display rule. Blank defaults to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayStatus {
    #[default]
    Show,
    Hide,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Show => "SHOW",
            DisplayStatus::Hide => "HIDE",
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DisplayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SHOW" => Ok(DisplayStatus::Show),
            "HIDE" => Ok(DisplayStatus::Hide),
            _ => Err(format!("Unknown display status: {s}")),
        }
    }
}
