//! Static identifier registries.
//!
//! The external platform assigns a stable definition id to every element
//! template. The per-template sets below are the ground truth for "this
//! definition id always opens with this schema". Two coarser tables cover the
//! cases where only a category string is known: the category registry (keyed
//! by normalised schema/domain names) and the domain allow-list (keyed by
//! lower-cased `domainId` values from tree listings).

use crate::SchemaIntent;

// ---------------------------------------------------------------------------
// Per-template definition ids
// ---------------------------------------------------------------------------

/// Financial documents: quotes, rental quotes, invoices, credit notes,
/// purchase orders, sub-rental orders.
pub const FINANCIAL_DOCUMENT_DEFINITIONS: &[&str] = &[
    "9bfb850c-b117-11df-b8d5-00e08175e43e",
    "7c5d8a0e-3b8e-4c7f-9a3b-2f1e6d4c5b8a",
    "e7f5a2c0-14b6-4d8e-8f3a-6c9d0b1e2f3a",
    "3a4b5c6d-7e8f-4a1b-9c2d-3e4f5a6b7c8d",
    "c1d2e3f4-a5b6-4c7d-8e9f-0a1b2c3d4e5f",
    "566d32e0-1a1e-11e0-a472-00e08175e43e",
];

/// Expense sheets (crew expenses, per diems).
pub const EXPENSE_SHEET_DEFINITIONS: &[&str] = &[
    "566d32e0-1a1e-11e0-a472-00e08175e43f",
    "b8a7c6d5-e4f3-4a2b-9c1d-0e9f8a7b6c5d",
];

/// Contact lists and crew calls.
pub const CONTACT_LIST_DEFINITIONS: &[&str] = &[
    "a220432c-af33-11df-b8d5-00e08175e43e",
    "4f3e2d1c-0b9a-4877-a665-544332211000",
];

/// Equipment lists and pull sheets.
pub const EQUIPMENT_LIST_DEFINITIONS: &[&str] = &[
    "a20c4e5c-b05c-11df-b8d5-00e08175e43e",
    "8e7d6c5b-4a39-4281-a7f6-e5d4c3b2a190",
];

/// Folders and sub-folders.
///
/// Checked last: some financial sub-types were historically registered under
/// generic folder templates, and the financial set must win.
pub const SIMPLE_ELEMENT_DEFINITIONS: &[&str] = &[
    "e281e71c-2c42-49cd-9834-0eb68135e9ac",
    "2f49c62c-b139-11df-b8d5-00e08175e43e",
    "6c7e5b4a-3d2f-4e1a-9b8c-7d6e5f4a3b2c",
    "566d32e0-1a1e-11e0-a472-00e08175e43e",
];

/// Order in which the per-template registries are consulted.
const DEFINITION_REGISTRIES: [(SchemaIntent, &[&str]); 5] = [
    (SchemaIntent::FinDoc, FINANCIAL_DOCUMENT_DEFINITIONS),
    (SchemaIntent::ExpenseSheet, EXPENSE_SHEET_DEFINITIONS),
    (SchemaIntent::ContactList, CONTACT_LIST_DEFINITIONS),
    (SchemaIntent::EquipmentList, EQUIPMENT_LIST_DEFINITIONS),
    (SchemaIntent::SimpleElement, SIMPLE_ELEMENT_DEFINITIONS),
];

/// Returns the intent a known definition id always maps to.
///
/// Comparison ignores ASCII case and surrounding whitespace.
pub fn intent_for_definition(definition_id: &str) -> Option<SchemaIntent> {
    let wanted = definition_id.trim();
    if wanted.is_empty() {
        return None;
    }
    DEFINITION_REGISTRIES
        .iter()
        .find(|(_, ids)| ids.iter().any(|id| id.eq_ignore_ascii_case(wanted)))
        .map(|(intent, _)| *intent)
}

// ---------------------------------------------------------------------------
// Coarse category registry
// ---------------------------------------------------------------------------

/// Normalised category names and the intent each maps to.
const CATEGORIES: &[(&str, SchemaIntent)] = &[
    ("simple-element", SchemaIntent::SimpleElement),
    ("folder", SchemaIntent::SimpleElement),
    ("subfolder", SchemaIntent::SimpleElement),
    ("sub-folder", SchemaIntent::SimpleElement),
    ("fin-doc", SchemaIntent::FinDoc),
    ("financial-document", SchemaIntent::FinDoc),
    ("quote", SchemaIntent::FinDoc),
    ("rental-quote", SchemaIntent::FinDoc),
    ("invoice", SchemaIntent::FinDoc),
    ("expense-sheet", SchemaIntent::ExpenseSheet),
    ("expense-report", SchemaIntent::ExpenseSheet),
    ("contact-list", SchemaIntent::ContactList),
    ("crew-call", SchemaIntent::ContactList),
    ("equipment-list", SchemaIntent::EquipmentList),
    ("pull-sheet", SchemaIntent::EquipmentList),
    ("remote-file-list", SchemaIntent::RemoteFileList),
    ("file-list", SchemaIntent::RemoteFileList),
];

/// Looks a free-form category string up after normalising it.
///
/// The generic project-element category is not in the table; see
/// [`category_signal`].
pub fn intent_for_category(raw: &str) -> Option<SchemaIntent> {
    let key = normalize_category(raw);
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, intent)| *intent)
}

/// Normalises camelCase, snake_case and space-separated names to
/// lower-kebab-case.
///
/// Runs of separators collapse to one dash; leading and trailing separators
/// are dropped. `"financialDocument"`, `"Financial_Document"` and
/// `" financial  document "` all become `"financial-document"`.
pub fn normalize_category(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower_or_digit = false;
    for ch in raw.trim().chars() {
        if ch == '_' || ch == '-' || ch == '.' || ch.is_whitespace() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            prev_lower_or_digit = false;
        } else if ch.is_uppercase() {
            if prev_lower_or_digit && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
            prev_lower_or_digit = false;
        } else {
            out.push(ch);
            prev_lower_or_digit = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Like [`intent_for_category`], but reports the generic project-element
/// category as a weak signal, the same way [`domain_signal`] does.
pub fn category_signal(raw: &str) -> Option<DomainSignal> {
    if normalize_category(raw) == GENERIC_PROJECT_ELEMENT_DOMAIN {
        return Some(DomainSignal::Weak(SchemaIntent::SimpleElement));
    }
    intent_for_category(raw).map(DomainSignal::Strong)
}

// ---------------------------------------------------------------------------
// Domain allow-list
// ---------------------------------------------------------------------------

/// How much a `domainId` or `schemaId` match is worth to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainSignal {
    /// Unambiguous: the domain always maps to this intent.
    Strong(SchemaIntent),
    /// Only applies when no later rule contradicts it.
    Weak(SchemaIntent),
}

impl DomainSignal {
    /// Returns the intent carried by the signal, whatever its strength.
    pub fn intent(self) -> SchemaIntent {
        match self {
            DomainSignal::Strong(intent) | DomainSignal::Weak(intent) => intent,
        }
    }
}

/// The generic project-element domain. Tree listings report it for folders
/// and for several document types alike, so it is only a weak signal.
pub const GENERIC_PROJECT_ELEMENT_DOMAIN: &str = "simple-project-element";

/// Lower-cased domain ids and the intent each maps to.
const DOMAINS: &[(&str, SchemaIntent)] = &[
    ("fin-doc", SchemaIntent::FinDoc),
    ("financial-document", SchemaIntent::FinDoc),
    ("expense-sheet", SchemaIntent::ExpenseSheet),
    ("contact-list", SchemaIntent::ContactList),
    ("crew-call", SchemaIntent::ContactList),
    ("equipment-list", SchemaIntent::EquipmentList),
    ("remote-file-list", SchemaIntent::RemoteFileList),
    ("simple-element", SchemaIntent::SimpleElement),
    ("folder", SchemaIntent::SimpleElement),
];

/// Tests a domain id (lower-cased, trimmed) against the allow-list.
pub fn domain_signal(domain_id: &str) -> Option<DomainSignal> {
    let key = domain_id.trim().to_lowercase();
    if key == GENERIC_PROJECT_ELEMENT_DOMAIN {
        return Some(DomainSignal::Weak(SchemaIntent::SimpleElement));
    }
    DOMAINS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, intent)| DomainSignal::Strong(*intent))
}
