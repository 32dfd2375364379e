//! Deep-link URL builder.
//!
//! Every deep link is `<base>#<fragment>` where the fragment is one of six
//! shapes, selected by [`SchemaIntent`]:
//!
//! | Intent | Fragment |
//! |--------|----------|
//! | `simple-element` | `element/<id>/view/simple-element/header` |
//! | `fin-doc` | `fin-doc/<id>/doc-view/<fin_doc_view_id>/header` |
//! | `expense-sheet` | `fin-doc/<id>/doc-view/<expense_view_id>/header` |
//! | `contact-list` | `contact-list/<id>/view/<crew_call_view_id>/header` |
//! | `equipment-list` | `element/<id>/view/equipment-list/header` |
//! | `remote-file-list` | `element/<id>/view/remote-file-list/header` |
//!
//! The element id and view id are always percent-encoded as path segments.

use serde::{Deserialize, Serialize};

use crate::{ElementId, LinkError, SchemaIntent};

/// Default platform UI entry point.
pub const DEFAULT_BASE_URL: &str = "https://rental.example.com/f5/ui/?desktop";

/// Default document view for financial documents.
pub const DEFAULT_FIN_DOC_VIEW_ID: &str = "ca6b072c-b122-11df-b8d5-00e08175e43e";

/// Default document view for expense sheets.
pub const DEFAULT_EXPENSE_VIEW_ID: &str = "a2d6e7c0-b3f4-4d5e-8f9a-0b1c2d3e4f5a";

/// Default crew-call view for contact lists.
pub const DEFAULT_CREW_CALL_VIEW_ID: &str = "139e2f60-8d20-11e2-b07f-00e08175e43e";

/// Base URL and default view ids used to build deep links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlTemplates {
    pub base_url: String,
    pub fin_doc_view_id: String,
    pub expense_view_id: String,
    pub crew_call_view_id: String,
}

impl Default for UrlTemplates {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            fin_doc_view_id: DEFAULT_FIN_DOC_VIEW_ID.to_owned(),
            expense_view_id: DEFAULT_EXPENSE_VIEW_ID.to_owned(),
            crew_call_view_id: DEFAULT_CREW_CALL_VIEW_ID.to_owned(),
        }
    }
}

/// Builds deep links from validated templates.
#[derive(Debug, Clone, Default)]
pub struct UrlBuilder {
    templates: UrlTemplates,
}

impl UrlBuilder {
    /// Validates `templates` and creates a builder.
    ///
    /// The base URL must be non-empty, must not already carry a fragment, and
    /// every default view id must be non-empty.
    pub fn new(templates: UrlTemplates) -> Result<Self, LinkError> {
        let base = templates.base_url.trim();
        if base.is_empty() {
            return Err(LinkError::InvalidBaseUrl {
                base_url: templates.base_url.clone(),
                reason: "empty",
            });
        }
        if base.contains('#') {
            return Err(LinkError::InvalidBaseUrl {
                base_url: templates.base_url.clone(),
                reason: "already contains a fragment",
            });
        }
        for (intent, view_id) in [
            (SchemaIntent::FinDoc, &templates.fin_doc_view_id),
            (SchemaIntent::ExpenseSheet, &templates.expense_view_id),
            (SchemaIntent::ContactList, &templates.crew_call_view_id),
        ] {
            if view_id.trim().is_empty() {
                return Err(LinkError::InvalidViewOverride { intent });
            }
        }
        Ok(Self {
            templates: UrlTemplates {
                base_url: base.to_owned(),
                ..templates
            },
        })
    }

    /// Returns the templates this builder was created with.
    pub fn templates(&self) -> &UrlTemplates {
        &self.templates
    }

    /// Builds the deep link for `intent`.
    ///
    /// Rejects an empty or whitespace-only `element_id` before anything else,
    /// and a blank `view_id_override`. The override replaces the intent's
    /// default view id; for intents whose view is fixed
    /// (`simple-element`, `equipment-list`, `remote-file-list`) it replaces
    /// the view segment itself.
    pub fn build_url(
        &self,
        intent: SchemaIntent,
        element_id: &str,
        view_id_override: Option<&str>,
    ) -> Result<String, LinkError> {
        let id = ElementId::parse(element_id)?;
        let view = match view_id_override {
            Some(v) if v.trim().is_empty() => {
                return Err(LinkError::InvalidViewOverride { intent });
            }
            Some(v) => v.trim(),
            None => self.default_view_id(intent),
        };
        Ok(self.render(intent, &id, view))
    }

    /// Builds the deterministic `simple-element` link used whenever
    /// resolution fails.
    pub fn fallback_url(&self, element_id: &str) -> Result<String, LinkError> {
        self.build_url(SchemaIntent::SimpleElement, element_id, None)
    }

    fn default_view_id(&self, intent: SchemaIntent) -> &str {
        match intent {
            SchemaIntent::FinDoc => &self.templates.fin_doc_view_id,
            SchemaIntent::ExpenseSheet => &self.templates.expense_view_id,
            SchemaIntent::ContactList => &self.templates.crew_call_view_id,
            SchemaIntent::SimpleElement
            | SchemaIntent::EquipmentList
            | SchemaIntent::RemoteFileList => intent.as_str(),
        }
    }

    fn render(&self, intent: SchemaIntent, id: &ElementId, view: &str) -> String {
        let base = &self.templates.base_url;
        let id = urlencoding::encode(id.as_str());
        let view = urlencoding::encode(view);
        match intent {
            SchemaIntent::FinDoc | SchemaIntent::ExpenseSheet => {
                format!("{base}#fin-doc/{id}/doc-view/{view}/header")
            }
            SchemaIntent::ContactList => {
                format!("{base}#contact-list/{id}/view/{view}/header")
            }
            SchemaIntent::SimpleElement
            | SchemaIntent::EquipmentList
            | SchemaIntent::RemoteFileList => {
                format!("{base}#element/{id}/view/{view}/header")
            }
        }
    }
}
