//! End-to-end resolution scenarios against in-memory ports.

use std::sync::Arc;
use std::time::Duration;

use engine::fakes::{FakeMetadataSource, FakeSecretSource};
use engine::{build_resolver, CacheState, EngineConfig, LinkResolver};
use linking::registries::FINANCIAL_DOCUMENT_DEFINITIONS;
use linking::url::DEFAULT_FIN_DOC_VIEW_ID;
use linking::{
    ElementReference, FolderType, HintSource, JobType, MatchedRule, ResolutionContext,
    SchemaIntent, SchemaMetadata, UrlBuilder,
};

struct Setup {
    secrets: Arc<FakeSecretSource>,
    metadata: Arc<FakeMetadataSource>,
    resolver: Arc<LinkResolver>,
}

fn setup(secrets: FakeSecretSource, metadata: FakeMetadataSource) -> Setup {
    let secrets = Arc::new(secrets);
    let metadata = Arc::new(metadata);
    let resolver = build_resolver(
        &EngineConfig::default(),
        UrlBuilder::default(),
        secrets.clone(),
        metadata.clone(),
    );
    Setup {
        secrets,
        metadata,
        resolver: Arc::new(resolver),
    }
}

fn fin_doc_metadata() -> FakeMetadataSource {
    FakeMetadataSource::returning(SchemaMetadata {
        domain_id: Some("fin-doc".into()),
        ..SchemaMetadata::default()
    })
}

#[tokio::test]
async fn scenario_a_financial_definition_id() {
    let s = setup(FakeSecretSource::ok("tok"), FakeMetadataSource::unavailable());
    let reference =
        ElementReference::new("doc-17").with_definition_id(FINANCIAL_DOCUMENT_DEFINITIONS[0]);

    let link = s
        .resolver
        .resolve_async(&reference, &ResolutionContext::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(link.intent, SchemaIntent::FinDoc);
    assert!(link
        .url
        .contains(&format!("#fin-doc/doc-17/doc-view/{DEFAULT_FIN_DOC_VIEW_ID}/")));
    assert_eq!(s.secrets.calls() + s.metadata.calls(), 0);

    let sync = s
        .resolver
        .resolve(&reference, &ResolutionContext::default())
        .unwrap();
    assert_eq!(sync.url, link.url);
}

#[tokio::test]
async fn scenario_b_dryhire_needs_no_network() {
    let s = setup(FakeSecretSource::ok("tok"), fin_doc_metadata());
    let context = ResolutionContext::default().with_job_type(JobType::Dryhire);

    let link = s
        .resolver
        .resolve_async(&ElementReference::new("folder-1"), &context)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(link.intent, SchemaIntent::SimpleElement);
    assert_eq!(link.rule, MatchedRule::JobType);
    assert_eq!(s.secrets.calls(), 0);
    assert_eq!(s.metadata.calls(), 0);
}

#[tokio::test]
async fn tourdate_folder_type_needs_no_network() {
    let s = setup(FakeSecretSource::ok("tok"), fin_doc_metadata());
    let context = ResolutionContext::default().with_folder_type(FolderType::Tourdate);

    let link = s
        .resolver
        .resolve_async(&ElementReference::new("folder-2"), &context)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(link.intent, SchemaIntent::SimpleElement);
    assert_eq!(s.secrets.calls() + s.metadata.calls(), 0);
}

#[tokio::test]
async fn scenario_c_fetched_domain_with_warm_token() {
    let s = setup(FakeSecretSource::ok("tok"), fin_doc_metadata());
    s.resolver.credentials().get_token().await.unwrap();
    assert_eq!(s.secrets.calls(), 1);

    let link = s
        .resolver
        .resolve_async(&ElementReference::new("doc-9"), &ResolutionContext::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(link.intent, SchemaIntent::FinDoc);
    assert_eq!(link.rule, MatchedRule::DomainId);
    assert_eq!(link.source, HintSource::RemoteMetadata);
    assert_eq!(s.metadata.calls(), 1);
    assert_eq!(s.secrets.calls(), 1);
    assert_eq!(s.metadata.seen_tokens(), vec!["tok".to_string()]);
}

#[tokio::test]
async fn scenario_d_failed_fetch_with_single_job_is_unresolved() {
    let s = setup(FakeSecretSource::ok("tok"), FakeMetadataSource::unavailable());
    let context = ResolutionContext::default().with_job_type(JobType::Single);

    let result = s
        .resolver
        .resolve_async(&ElementReference::new("mystery"), &context)
        .await;

    assert_eq!(result, Ok(None));
    assert_eq!(s.metadata.calls(), 1);
}

#[tokio::test]
async fn scenario_e_simultaneous_resolutions_share_one_secret_fetch() {
    let s = setup(
        FakeSecretSource::ok("tok").with_delay(Duration::from_millis(20)),
        fin_doc_metadata(),
    );
    let context = ResolutionContext::default();
    let first = ElementReference::new("doc-1");
    let second = ElementReference::new("doc-2");

    let (a, b) = tokio::join!(
        s.resolver.resolve_async(&first, &context),
        s.resolver.resolve_async(&second, &context),
    );

    assert_eq!(s.secrets.calls(), 1);
    assert!(a.unwrap().unwrap().url.contains("#fin-doc/doc-1/"));
    assert!(b.unwrap().unwrap().url.contains("#fin-doc/doc-2/"));
    assert!(matches!(
        s.resolver.credentials().state(),
        CacheState::Ready { .. }
    ));
}

#[tokio::test]
async fn spawned_resolutions_share_one_secret_fetch() {
    let s = setup(
        FakeSecretSource::ok("tok").with_delay(Duration::from_millis(20)),
        fin_doc_metadata(),
    );

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let resolver = Arc::clone(&s.resolver);
            tokio::spawn(async move {
                resolver
                    .resolve_async(
                        &ElementReference::new(format!("doc-{i}")),
                        &ResolutionContext::default(),
                    )
                    .await
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_some());
    }

    assert_eq!(s.secrets.calls(), 1);
    assert_eq!(s.metadata.calls(), 16);
}

#[tokio::test]
async fn credential_timeout_from_config_degrades_resolution() {
    let secrets = Arc::new(FakeSecretSource::ok("tok").with_delay(Duration::from_millis(500)));
    let metadata = Arc::new(fin_doc_metadata());
    let resolver = build_resolver(
        &EngineConfig {
            credential_timeout_secs: Some(0),
        },
        UrlBuilder::default(),
        secrets.clone(),
        metadata.clone(),
    );

    let result = resolver
        .resolve_async(&ElementReference::new("doc"), &ResolutionContext::default())
        .await;

    assert_eq!(result, Ok(None));
    assert_eq!(metadata.calls(), 0);
    assert_eq!(resolver.credentials().state(), CacheState::Empty);
}

#[tokio::test]
async fn classification_is_stable_across_entry_points() {
    let s = setup(FakeSecretSource::ok("tok"), FakeMetadataSource::unavailable());
    let reference = ElementReference::new("x").with_schema_id("crew_call");
    let context = ResolutionContext::default().with_job_type(JobType::Dryhire);

    let sync = s.resolver.resolve(&reference, &context).unwrap();
    let asynchronous = s
        .resolver
        .resolve_async(&reference, &context)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(sync.intent, SchemaIntent::ContactList);
    assert_eq!(sync, asynchronous);
}
