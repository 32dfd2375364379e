//! Link resolvers.
//!
//! [`LinkResolver::resolve`] is synchronous and hint-only: it never touches
//! the network and always produces a URL for a valid element id.
//!
//! [`LinkResolver::resolve_async`] may consult the platform:
//!
//! 1. validate the element id;
//! 2. classify from local hints; a strong match is built immediately with no
//!    network call;
//! 3. otherwise get a token from the [`CredentialCache`], fetch element
//!    metadata, merge it into the hints without overwriting local fields, and
//!    classify again (the `dryhire`/`tourdate` fallback is part of that pass);
//! 4. still unresolved → `Ok(None)`; the caller picks the UX fallback.
//!
//! Credential and metadata failures degrade to "no remote evidence"; they
//! never surface as errors from here.

use std::sync::Arc;

use linking::{
    classify, Classification, ClassifierDefault, ElementId, ElementReference, HintSource, Hints,
    LinkError, MatchedRule, MetadataSource, ResolutionContext, ResolvedLink, SchemaIntent,
    UrlBuilder,
};
use tracing::{debug, info, instrument, warn};

use crate::credentials::CredentialCache;

/// Resolves element references to deep links.
pub struct LinkResolver {
    builder: UrlBuilder,
    credentials: Arc<CredentialCache>,
    metadata: Arc<dyn MetadataSource>,
}

impl LinkResolver {
    pub fn new(
        builder: UrlBuilder,
        credentials: Arc<CredentialCache>,
        metadata: Arc<dyn MetadataSource>,
    ) -> Self {
        Self {
            builder,
            credentials,
            metadata,
        }
    }

    /// The URL builder, for callers that need the fallback link.
    pub fn builder(&self) -> &UrlBuilder {
        &self.builder
    }

    /// The credential cache this resolver draws tokens from.
    pub fn credentials(&self) -> &CredentialCache {
        &self.credentials
    }

    /// Resolves from local hints only. Falls back to `simple-element` when
    /// nothing matches.
    #[instrument(skip_all, fields(element_id = %reference.element_id.trim()))]
    pub fn resolve(
        &self,
        reference: &ElementReference,
        context: &ResolutionContext,
    ) -> Result<ResolvedLink, LinkError> {
        let element_id = ElementId::parse(&reference.element_id)?;
        let hints = Hints::from_parts(reference, context);
        let classification = classify(&hints, ClassifierDefault::SimpleElement).unwrap_or(
            Classification {
                intent: SchemaIntent::SimpleElement,
                rule: MatchedRule::Default,
            },
        );
        self.link(&element_id, classification, context, HintSource::LocalHints)
    }

    /// Resolves, fetching remote metadata when local hints are not strong.
    ///
    /// `Err` only for invalid input; `Ok(None)` when no evidence determines
    /// an intent.
    #[instrument(skip_all, fields(element_id = %reference.element_id.trim()))]
    pub async fn resolve_async(
        &self,
        reference: &ElementReference,
        context: &ResolutionContext,
    ) -> Result<Option<ResolvedLink>, LinkError> {
        let element_id = ElementId::parse(&reference.element_id)?;
        let mut hints = Hints::from_parts(reference, context);

        let local = classify(&hints, ClassifierDefault::Unresolved);
        if let Some(classification) = local.filter(|c| c.rule.is_strong()) {
            debug!(
                intent = %classification.intent,
                rule = %classification.rule,
                "Resolved from local hints"
            );
            return self
                .link(&element_id, classification, context, HintSource::LocalHints)
                .map(Some);
        }

        let mut source = HintSource::LocalHints;
        match self.credentials.get_token().await {
            Ok(token) => match self.metadata.fetch_metadata(&element_id, &token).await {
                Some(metadata) => {
                    let filled = hints.merge_missing(&metadata);
                    debug!(filled, "Merged remote element metadata");
                    if filled > 0 {
                        source = HintSource::RemoteMetadata;
                    }
                }
                None => warn!("Element metadata unavailable; using local hints only"),
            },
            Err(error) => {
                warn!(%error, "Platform token unavailable; skipping metadata lookup");
            }
        }

        match classify(&hints, ClassifierDefault::Unresolved) {
            Some(classification) => {
                debug!(
                    intent = %classification.intent,
                    rule = %classification.rule,
                    ?source,
                    "Resolved after metadata lookup"
                );
                self.link(&element_id, classification, context, source)
                    .map(Some)
            }
            None => {
                info!("No hint determines a schema for this element");
                Ok(None)
            }
        }
    }

    fn link(
        &self,
        element_id: &ElementId,
        classification: Classification,
        context: &ResolutionContext,
        source: HintSource,
    ) -> Result<ResolvedLink, LinkError> {
        // A blank override means "no override" here; only the element id can
        // make a resolution fail.
        let view_id_override = context
            .view_id_override
            .as_deref()
            .filter(|v| !v.trim().is_empty());
        let url = self.builder.build_url(
            classification.intent,
            element_id.as_str(),
            view_id_override,
        )?;
        Ok(ResolvedLink {
            url,
            intent: classification.intent,
            rule: classification.rule,
            source,
        })
    }
}
