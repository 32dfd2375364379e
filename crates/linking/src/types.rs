//! Shared value types for link resolution.
//!
//! [`SchemaIntent`] is the closed set of URL-template families. The
//! [`ElementReference`] and [`ResolutionContext`] types are the caller-facing
//! inputs: they carry raw, unvalidated strings exactly as the calling screen
//! supplied them. Validation happens when they are folded into
//! [`crate::Hints`] or when the element id is parsed.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::MatchedRule;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// A string did not name a known variant of one of the closed enumerations
/// in this module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} '{value}'")]
pub struct UnknownVariant {
    /// Which enumeration was being parsed (e.g. `"job type"`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

// ---------------------------------------------------------------------------
// Schema intent
// ---------------------------------------------------------------------------

/// The URL-template family required to open an element's correct view.
///
/// Exactly one applies per element. It selects a template; it says nothing
/// about what the element means to the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaIntent {
    /// Plain element view (folders, sub-folders, anything without a
    /// dedicated document view).
    SimpleElement,
    /// Financial document (quotes, invoices, ...).
    FinDoc,
    /// Expense sheet; shares the financial-document path family.
    ExpenseSheet,
    /// Contact / crew-call list.
    ContactList,
    /// Equipment list.
    EquipmentList,
    /// Remote file list.
    RemoteFileList,
}

impl SchemaIntent {
    /// Every variant, in declaration order.
    pub const ALL: [SchemaIntent; 6] = [
        SchemaIntent::SimpleElement,
        SchemaIntent::FinDoc,
        SchemaIntent::ExpenseSheet,
        SchemaIntent::ContactList,
        SchemaIntent::EquipmentList,
        SchemaIntent::RemoteFileList,
    ];

    /// Returns the lower-kebab wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaIntent::SimpleElement => "simple-element",
            SchemaIntent::FinDoc => "fin-doc",
            SchemaIntent::ExpenseSheet => "expense-sheet",
            SchemaIntent::ContactList => "contact-list",
            SchemaIntent::EquipmentList => "equipment-list",
            SchemaIntent::RemoteFileList => "remote-file-list",
        }
    }
}

impl FromStr for SchemaIntent {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SchemaIntent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == wanted)
            .ok_or_else(|| UnknownVariant {
                kind: "schema intent",
                value: s.to_owned(),
            })
    }
}

impl std::fmt::Display for SchemaIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------

/// Explicit view hint: a concrete intent, or `auto` to defer to the
/// classifier's other rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ViewHint {
    /// Sentinel meaning "no explicit preference".
    Auto,
    /// Forces the given intent.
    Intent(SchemaIntent),
}

impl ViewHint {
    /// Returns the forced intent, or `None` for [`ViewHint::Auto`].
    pub fn intent(self) -> Option<SchemaIntent> {
        match self {
            ViewHint::Auto => None,
            ViewHint::Intent(intent) => Some(intent),
        }
    }
}

impl From<SchemaIntent> for ViewHint {
    fn from(intent: SchemaIntent) -> Self {
        ViewHint::Intent(intent)
    }
}

impl FromStr for ViewHint {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(ViewHint::Auto);
        }
        s.parse::<SchemaIntent>()
            .map(ViewHint::Intent)
            .map_err(|_| UnknownVariant {
                kind: "view hint",
                value: s.to_owned(),
            })
    }
}

impl TryFrom<String> for ViewHint {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ViewHint> for String {
    fn from(hint: ViewHint) -> String {
        hint.to_string()
    }
}

impl std::fmt::Display for ViewHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewHint::Auto => f.write_str("auto"),
            ViewHint::Intent(intent) => intent.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Host-application categories
// ---------------------------------------------------------------------------

macro_rules! category_enum {
    (
        $(#[$attr:meta])*
        $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Returns the lower-case wire name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownVariant { kind: $kind, value: s.to_owned() }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

category_enum! {
    /// Job classification in the host application.
    JobType, "job type" {
        Single => "single",
        Festival => "festival",
        Dryhire => "dryhire",
        Tourdate => "tourdate",
        Evento => "evento",
    }
}

category_enum! {
    /// Kind of folder the host application created for a job.
    FolderType, "folder type" {
        Main => "main",
        Dryhire => "dryhire",
        Tourdate => "tourdate",
    }
}

impl JobType {
    /// `dryhire` and `tourdate` jobs always address a plain folder element.
    pub fn implies_plain_folder(self) -> bool {
        matches!(self, JobType::Dryhire | JobType::Tourdate)
    }
}

impl FolderType {
    /// `dryhire` and `tourdate` folders are always plain folder elements.
    pub fn implies_plain_folder(self) -> bool {
        matches!(self, FolderType::Dryhire | FolderType::Tourdate)
    }
}

// ---------------------------------------------------------------------------
// Caller inputs
// ---------------------------------------------------------------------------

/// An element to link to, plus whatever the caller already knows about it.
///
/// Only `element_id` is required; every other field is optional evidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementReference {
    /// Raw element id as supplied by the caller (validated later).
    pub element_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_hint: Option<ViewHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ElementReference {
    /// Creates a reference carrying only an element id.
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            ..Self::default()
        }
    }

    pub fn with_domain_id(mut self, domain_id: impl Into<String>) -> Self {
        self.domain_id = Some(domain_id.into());
        self
    }

    pub fn with_definition_id(mut self, definition_id: impl Into<String>) -> Self {
        self.definition_id = Some(definition_id.into());
        self
    }

    pub fn with_schema_id(mut self, schema_id: impl Into<String>) -> Self {
        self.schema_id = Some(schema_id.into());
        self
    }

    pub fn with_view_hint(mut self, view_hint: impl Into<ViewHint>) -> Self {
        self.view_hint = Some(view_hint.into());
        self
    }
}

/// What the calling screen knows about the job the element belongs to.
///
/// Never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_type: Option<FolderType>,
    /// Used when the reference itself has no definition id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_definition_id: Option<String>,
    /// Used when the reference itself has no domain id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_domain_id: Option<String>,
    /// Used when the reference itself has no view hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_hint: Option<ViewHint>,
    /// Replaces the per-intent default view id in the built URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_id_override: Option<String>,
}

impl ResolutionContext {
    pub fn with_job_type(mut self, job_type: JobType) -> Self {
        self.job_type = Some(job_type);
        self
    }

    pub fn with_folder_type(mut self, folder_type: FolderType) -> Self {
        self.folder_type = Some(folder_type);
        self
    }

    pub fn with_view_hint(mut self, view_hint: impl Into<ViewHint>) -> Self {
        self.view_hint = Some(view_hint.into());
        self
    }

    pub fn with_view_id_override(mut self, view_id: impl Into<String>) -> Self {
        self.view_id_override = Some(view_id.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Resolver output
// ---------------------------------------------------------------------------

/// Where the evidence behind a resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintSource {
    /// Only caller-supplied hints were used; no network call was made.
    LocalHints,
    /// Remote element metadata was merged into the hints before classifying.
    RemoteMetadata,
}

/// A fully built deep link and how it was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub url: String,
    pub intent: SchemaIntent,
    pub rule: MatchedRule,
    pub source: HintSource,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
