//! CRF hierarchy: the form, its sections, and its item groups.

use serde::{Deserialize, Serialize};

use crate::item::Item;

/// A logical page of a CRF. Items in a section are shown together on one
/// web page, in authoring order, and item names are unique within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Unique label items reference from the worksheet.
    pub label: String,
    /// Title shown at the top of the page.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Instructions shown underneath the title.
    #[serde(default)]
    pub instructions: Option<String>,
    /// Printed page number where the section begins.
    #[serde(default)]
    pub page_number: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            title: None,
            subtitle: None,
            instructions: None,
            page_number: None,
            items: Vec::new(),
        }
    }

    /// Look up an item by its unique name. Names are case-sensitive.
    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }
}

/// An item group. Repeating groups render their items on a single row,
/// repeated per record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique label items reference via GROUP_LABEL.
    pub label: String,
    /// Header text shown above the group.
    #[serde(default)]
    pub header: Option<String>,
    /// Number of rows initially displayed for a repeating group.
    #[serde(default)]
    pub repeat_number: Option<u32>,
    /// Maximum number of rows a repeating group may grow to.
    #[serde(default)]
    pub repeat_max: Option<u32>,
}

impl Group {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            header: None,
            repeat_number: None,
            repeat_max: None,
        }
    }
}

/// A complete CRF definition: identification plus the section and group
/// hierarchy all items hang off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReportForm {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub version_description: Option<String>,
    #[serde(default)]
    pub revision_notes: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl CaseReportForm {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            version_description: None,
            revision_notes: None,
            sections: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Look up a section by its unique label.
    pub fn section(&self, label: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.label == label)
    }

    /// Look up an item group by its unique label.
    pub fn group(&self, label: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.label == label)
    }

    /// All items of the form, in section order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.sections.iter().flat_map(|section| section.items.iter())
    }

    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn add_group(&mut self, group: Group) {
        self.groups.push(group);
    }
}
