//! Intent classifier.
//!
//! [`classify`] maps a [`Hints`] set to a [`SchemaIntent`] using a fixed
//! precedence; the first rule that matches wins:
//!
//! | # | Rule | Strength |
//! |---|------|----------|
//! | 1 | explicit view hint other than `auto` | strong |
//! | 2 | normalised `schemaId` in the category registry | strong, except the generic category |
//! | 3 | `definitionId` in a per-template registry | strong |
//! | 4 | `domainId` in the domain allow-list | strong, except the generic project-element domain |
//! | 5 | job or folder type is `dryhire` / `tourdate` → `simple-element` | strong |
//! | 6 | the weak signal from rule 2 or 4, if nothing above matched | weak |
//! | 7 | the caller's [`ClassifierDefault`] | — |
//!
//! The classifier is pure: no I/O, no interior state, same input, same output.

use serde::{Deserialize, Serialize};

use crate::identifiers::{DefinitionId, DomainId, SchemaId};
use crate::registries::{self, DomainSignal};
use crate::{
    ElementReference, FolderType, JobType, ResolutionContext, SchemaIntent, SchemaMetadata,
    ViewHint,
};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The evidence the classifier reads.
///
/// Empty or whitespace-only strings never make it in: the identifier
/// newtypes reject them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hints {
    pub view_hint: Option<ViewHint>,
    pub schema_id: Option<SchemaId>,
    pub definition_id: Option<DefinitionId>,
    pub domain_id: Option<DomainId>,
    pub job_type: Option<JobType>,
    pub folder_type: Option<FolderType>,
}

impl Hints {
    /// Folds a reference and its context into one hint set.
    ///
    /// Fields on the reference win over the context's fallbacks.
    pub fn from_parts(reference: &ElementReference, context: &ResolutionContext) -> Self {
        Self {
            view_hint: explicit_view_hint(reference.view_hint)
                .or(explicit_view_hint(context.view_hint))
                .or(reference.view_hint)
                .or(context.view_hint),
            schema_id: reference.schema_id.as_deref().and_then(SchemaId::new),
            definition_id: reference
                .definition_id
                .as_deref()
                .and_then(DefinitionId::new)
                .or_else(|| {
                    context
                        .fallback_definition_id
                        .as_deref()
                        .and_then(DefinitionId::new)
                }),
            domain_id: reference
                .domain_id
                .as_deref()
                .and_then(DomainId::new)
                .or_else(|| context.fallback_domain_id.as_deref().and_then(DomainId::new)),
            job_type: context.job_type,
            folder_type: context.folder_type,
        }
    }

    /// Fills fields that are still unknown from fetched metadata. Fields
    /// already known locally are never overwritten; a local `auto` view hint
    /// counts as unknown.
    ///
    /// Returns the number of fields that were filled.
    pub fn merge_missing(&mut self, metadata: &SchemaMetadata) -> usize {
        let mut filled = 0;
        if self.view_hint.and_then(ViewHint::intent).is_none() {
            // An unparseable remote hint is ignored rather than treated as auto.
            if let Some(hint) = metadata.view_hint.as_deref().and_then(|v| v.parse().ok()) {
                self.view_hint = Some(hint);
                filled += 1;
            }
        }
        if self.schema_id.is_none() {
            self.schema_id = metadata.schema_id.as_deref().and_then(SchemaId::new);
            filled += usize::from(self.schema_id.is_some());
        }
        if self.definition_id.is_none() {
            self.definition_id = metadata.definition_id.as_deref().and_then(DefinitionId::new);
            filled += usize::from(self.definition_id.is_some());
        }
        if self.domain_id.is_none() {
            self.domain_id = metadata.domain_id.as_deref().and_then(DomainId::new);
            filled += usize::from(self.domain_id.is_some());
        }
        filled
    }

    fn implies_plain_folder(&self) -> bool {
        self.job_type.is_some_and(JobType::implies_plain_folder)
            || self.folder_type.is_some_and(FolderType::implies_plain_folder)
    }
}

/// `hint` if it names an intent; `auto` carries no preference.
fn explicit_view_hint(hint: Option<ViewHint>) -> Option<ViewHint> {
    hint.filter(|h| h.intent().is_some())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Which precedence rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedRule {
    ExplicitViewHint,
    SchemaId,
    DefinitionId,
    DomainId,
    JobType,
    WeakDomain,
    Default,
}

impl MatchedRule {
    /// Strong matches are trusted without consulting remote metadata.
    pub fn is_strong(self) -> bool {
        !matches!(self, MatchedRule::WeakDomain | MatchedRule::Default)
    }
}

impl std::fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchedRule::ExplicitViewHint => "explicit_view_hint",
            MatchedRule::SchemaId => "schema_id",
            MatchedRule::DefinitionId => "definition_id",
            MatchedRule::DomainId => "domain_id",
            MatchedRule::JobType => "job_type",
            MatchedRule::WeakDomain => "weak_domain",
            MatchedRule::Default => "default",
        };
        f.write_str(name)
    }
}

/// An intent together with the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: SchemaIntent,
    pub rule: MatchedRule,
}

/// What to return when no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierDefault {
    /// Always produce something; used by the direct URL-building path.
    SimpleElement,
    /// Report "unresolved"; used by the resolver that can fetch metadata.
    Unresolved,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classifies `hints`; `None` means unresolved (only possible with
/// [`ClassifierDefault::Unresolved`]).
pub fn classify(hints: &Hints, default: ClassifierDefault) -> Option<Classification> {
    let matched = |intent, rule| Some(Classification { intent, rule });

    if let Some(intent) = hints.view_hint.and_then(ViewHint::intent) {
        return matched(intent, MatchedRule::ExplicitViewHint);
    }

    let mut weak = None;
    match hints
        .schema_id
        .as_ref()
        .and_then(|id| registries::category_signal(id.as_str()))
    {
        Some(DomainSignal::Strong(intent)) => return matched(intent, MatchedRule::SchemaId),
        Some(DomainSignal::Weak(intent)) => weak = Some(intent),
        None => {}
    }

    if let Some(intent) = hints
        .definition_id
        .as_ref()
        .and_then(|id| registries::intent_for_definition(id.as_str()))
    {
        return matched(intent, MatchedRule::DefinitionId);
    }

    match hints
        .domain_id
        .as_ref()
        .and_then(|id| registries::domain_signal(id.as_str()))
    {
        Some(DomainSignal::Strong(intent)) => return matched(intent, MatchedRule::DomainId),
        Some(DomainSignal::Weak(intent)) => weak = weak.or(Some(intent)),
        None => {}
    }

    if hints.implies_plain_folder() {
        return matched(SchemaIntent::SimpleElement, MatchedRule::JobType);
    }

    if let Some(intent) = weak {
        return matched(intent, MatchedRule::WeakDomain);
    }

    match default {
        ClassifierDefault::SimpleElement => {
            matched(SchemaIntent::SimpleElement, MatchedRule::Default)
        }
        ClassifierDefault::Unresolved => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registries::{
        CONTACT_LIST_DEFINITIONS, EQUIPMENT_LIST_DEFINITIONS, EXPENSE_SHEET_DEFINITIONS,
        FINANCIAL_DOCUMENT_DEFINITIONS,
    };

    fn hints() -> Hints {
        Hints::default()
    }

    fn intent_of(hints: &Hints) -> Option<SchemaIntent> {
        classify(hints, ClassifierDefault::Unresolved).map(|c| c.intent)
    }

    #[test]
    fn empty_hints_follow_the_caller_default() {
        assert_eq!(classify(&hints(), ClassifierDefault::Unresolved), None);
        assert_eq!(
            classify(&hints(), ClassifierDefault::SimpleElement),
            Some(Classification {
                intent: SchemaIntent::SimpleElement,
                rule: MatchedRule::Default
            })
        );
    }

    #[test]
    fn explicit_view_hint_beats_everything() {
        let h = Hints {
            view_hint: Some(ViewHint::Intent(SchemaIntent::RemoteFileList)),
            schema_id: SchemaId::new("crewCall"),
            definition_id: DefinitionId::new(FINANCIAL_DOCUMENT_DEFINITIONS[0]),
            domain_id: DomainId::new("equipment-list"),
            job_type: Some(JobType::Dryhire),
            folder_type: None,
        };
        let c = classify(&h, ClassifierDefault::Unresolved).unwrap();
        assert_eq!(c.intent, SchemaIntent::RemoteFileList);
        assert_eq!(c.rule, MatchedRule::ExplicitViewHint);
    }

    #[test]
    fn auto_view_hint_defers_to_later_rules() {
        let h = Hints {
            view_hint: Some(ViewHint::Auto),
            definition_id: DefinitionId::new(EXPENSE_SHEET_DEFINITIONS[0]),
            ..hints()
        };
        assert_eq!(intent_of(&h), Some(SchemaIntent::ExpenseSheet));
    }

    #[test]
    fn schema_id_beats_definition_id() {
        let h = Hints {
            schema_id: SchemaId::new("Equipment_List"),
            definition_id: DefinitionId::new(CONTACT_LIST_DEFINITIONS[0]),
            ..hints()
        };
        let c = classify(&h, ClassifierDefault::Unresolved).unwrap();
        assert_eq!(c.intent, SchemaIntent::EquipmentList);
        assert_eq!(c.rule, MatchedRule::SchemaId);
    }

    #[test]
    fn unknown_schema_id_falls_through() {
        let h = Hints {
            schema_id: SchemaId::new("mystery"),
            definition_id: DefinitionId::new(EQUIPMENT_LIST_DEFINITIONS[0]),
            ..hints()
        };
        assert_eq!(intent_of(&h), Some(SchemaIntent::EquipmentList));
    }

    #[test]
    fn definition_id_beats_domain_id() {
        let h = Hints {
            definition_id: DefinitionId::new(FINANCIAL_DOCUMENT_DEFINITIONS[1]),
            domain_id: DomainId::new("contact-list"),
            ..hints()
        };
        let c = classify(&h, ClassifierDefault::Unresolved).unwrap();
        assert_eq!(c.intent, SchemaIntent::FinDoc);
        assert_eq!(c.rule, MatchedRule::DefinitionId);
    }

    #[test]
    fn strong_domain_beats_job_type() {
        let h = Hints {
            domain_id: DomainId::new("Fin-Doc"),
            job_type: Some(JobType::Dryhire),
            ..hints()
        };
        let c = classify(&h, ClassifierDefault::Unresolved).unwrap();
        assert_eq!(c.intent, SchemaIntent::FinDoc);
        assert_eq!(c.rule, MatchedRule::DomainId);
    }

    #[test]
    fn dryhire_and_tourdate_resolve_to_simple_element() {
        for h in [
            Hints { job_type: Some(JobType::Dryhire), ..hints() },
            Hints { job_type: Some(JobType::Tourdate), ..hints() },
            Hints { folder_type: Some(FolderType::Dryhire), ..hints() },
            Hints { folder_type: Some(FolderType::Tourdate), ..hints() },
        ] {
            let c = classify(&h, ClassifierDefault::Unresolved).unwrap();
            assert_eq!(c.intent, SchemaIntent::SimpleElement);
            assert_eq!(c.rule, MatchedRule::JobType);
        }
    }

    #[test]
    fn other_job_types_are_not_evidence() {
        for job_type in [JobType::Single, JobType::Festival, JobType::Evento] {
            let h = Hints {
                job_type: Some(job_type),
                folder_type: Some(FolderType::Main),
                ..hints()
            };
            assert_eq!(intent_of(&h), None);
        }
    }

    #[test]
    fn weak_domain_only_applies_when_uncontradicted() {
        let weak = Hints {
            domain_id: DomainId::new("simple-project-element"),
            ..hints()
        };
        let c = classify(&weak, ClassifierDefault::Unresolved).unwrap();
        assert_eq!(c.intent, SchemaIntent::SimpleElement);
        assert_eq!(c.rule, MatchedRule::WeakDomain);
        assert!(!c.rule.is_strong());

        let contradicted = Hints {
            definition_id: DefinitionId::new(CONTACT_LIST_DEFINITIONS[1]),
            ..weak.clone()
        };
        assert_eq!(intent_of(&contradicted), Some(SchemaIntent::ContactList));

        let with_job_type = Hints {
            job_type: Some(JobType::Tourdate),
            ..weak
        };
        let c = classify(&with_job_type, ClassifierDefault::Unresolved).unwrap();
        assert_eq!(c.rule, MatchedRule::JobType);
    }

    #[test]
    fn classification_is_deterministic() {
        let h = Hints {
            schema_id: SchemaId::new("fin doc"),
            job_type: Some(JobType::Festival),
            ..hints()
        };
        let first = classify(&h, ClassifierDefault::Unresolved);
        for _ in 0..10 {
            assert_eq!(classify(&h, ClassifierDefault::Unresolved), first);
        }
    }

    #[test]
    fn reference_fields_win_over_context_fallbacks() {
        let reference = ElementReference::new("e-1").with_domain_id("contact-list");
        let context = ResolutionContext {
            fallback_domain_id: Some("fin-doc".into()),
            fallback_definition_id: Some(EXPENSE_SHEET_DEFINITIONS[1].into()),
            view_hint: Some(ViewHint::Auto),
            ..ResolutionContext::default()
        };
        let h = Hints::from_parts(&reference, &context);
        assert_eq!(h.domain_id.as_ref().map(DomainId::as_str), Some("contact-list"));
        assert_eq!(
            h.definition_id.as_ref().map(DefinitionId::as_str),
            Some(EXPENSE_SHEET_DEFINITIONS[1])
        );
        assert_eq!(h.view_hint, Some(ViewHint::Auto));
    }

    #[test]
    fn blank_reference_fields_use_context_fallbacks() {
        let reference = ElementReference::new("e-1").with_domain_id("   ");
        let context = ResolutionContext {
            fallback_domain_id: Some("remote-file-list".into()),
            ..ResolutionContext::default()
        };
        let h = Hints::from_parts(&reference, &context);
        assert_eq!(intent_of(&h), Some(SchemaIntent::RemoteFileList));
    }

    #[test]
    fn merge_never_overwrites_local_fields() {
        let mut h = Hints {
            domain_id: DomainId::new("contact-list"),
            ..hints()
        };
        let fetched = SchemaMetadata {
            domain_id: Some("fin-doc".into()),
            definition_id: Some(EQUIPMENT_LIST_DEFINITIONS[0].into()),
            view_hint: Some("not-a-hint".into()),
            ..SchemaMetadata::default()
        };
        assert_eq!(h.merge_missing(&fetched), 1);
        assert_eq!(h.domain_id.as_ref().map(DomainId::as_str), Some("contact-list"));
        assert!(h.definition_id.is_some());
        assert_eq!(h.view_hint, None);
    }

    #[test]
    fn explicit_context_hint_beats_auto_on_reference() {
        let reference = ElementReference::new("e-1").with_view_hint(ViewHint::Auto);
        let context = ResolutionContext::default().with_view_hint(SchemaIntent::FinDoc);
        let h = Hints::from_parts(&reference, &context);
        assert_eq!(h.view_hint, Some(ViewHint::Intent(SchemaIntent::FinDoc)));

        let c = classify(&h, ClassifierDefault::SimpleElement).unwrap();
        assert_eq!(c.intent, SchemaIntent::FinDoc);
        assert_eq!(c.rule, MatchedRule::ExplicitViewHint);
    }

    #[test]
    fn explicit_reference_hint_beats_context_hint() {
        let reference = ElementReference::new("e-1").with_view_hint(SchemaIntent::ContactList);
        let context = ResolutionContext::default().with_view_hint(SchemaIntent::FinDoc);
        let h = Hints::from_parts(&reference, &context);
        assert_eq!(intent_of(&h), Some(SchemaIntent::ContactList));
    }

    #[test]
    fn merge_replaces_local_auto_view_hint() {
        let mut h = Hints {
            view_hint: Some(ViewHint::Auto),
            ..hints()
        };
        let fetched = SchemaMetadata {
            view_hint: Some("contact-list".into()),
            ..SchemaMetadata::default()
        };
        assert_eq!(h.merge_missing(&fetched), 1);
        assert_eq!(intent_of(&h), Some(SchemaIntent::ContactList));
    }

    #[test]
    fn merge_keeps_explicit_local_view_hint() {
        let mut h = Hints {
            view_hint: Some(ViewHint::Intent(SchemaIntent::EquipmentList)),
            ..hints()
        };
        let fetched = SchemaMetadata {
            view_hint: Some("contact-list".into()),
            ..SchemaMetadata::default()
        };
        assert_eq!(h.merge_missing(&fetched), 0);
        assert_eq!(intent_of(&h), Some(SchemaIntent::EquipmentList));
    }

    #[test]
    fn generic_project_schema_id_is_weak() {
        let h = Hints {
            schema_id: SchemaId::new("simpleProjectElement"),
            ..hints()
        };
        let c = classify(&h, ClassifierDefault::Unresolved).unwrap();
        assert_eq!(c.intent, SchemaIntent::SimpleElement);
        assert_eq!(c.rule, MatchedRule::WeakDomain);
        assert!(!c.rule.is_strong());

        let h = Hints {
            definition_id: DefinitionId::new(FINANCIAL_DOCUMENT_DEFINITIONS[0]),
            ..h
        };
        let c = classify(&h, ClassifierDefault::Unresolved).unwrap();
        assert_eq!(c.intent, SchemaIntent::FinDoc);
        assert_eq!(c.rule, MatchedRule::DefinitionId);
    }
}
