//! Navigator behaviour against a recording browser.

use std::sync::Arc;

use engine::fakes::{
    BrowserEvent, FakeMetadataSource, FakeSecretSource, RecordingBrowser, RecordingListener,
};
use engine::{
    CredentialCache, DeferredNavigator, ImmediateNavigator, LinkResolver, NavigationOutcome,
    NavigationPort,
};
use linking::{
    CredentialError, ElementReference, JobType, LinkError, NavigationError, ResolutionContext,
    SchemaIntent, SchemaMetadata, UrlBuilder,
};

struct Rig {
    secrets: Arc<FakeSecretSource>,
    metadata: Arc<FakeMetadataSource>,
    browser: RecordingBrowser,
    listener: RecordingListener,
    resolver: Arc<LinkResolver>,
}

impl Rig {
    fn new(
        secrets: FakeSecretSource,
        metadata: FakeMetadataSource,
        browser: RecordingBrowser,
    ) -> Self {
        let secrets = Arc::new(secrets);
        let metadata = Arc::new(metadata);
        let cache = Arc::new(CredentialCache::new(secrets.clone()));
        let resolver = Arc::new(LinkResolver::new(
            UrlBuilder::default(),
            cache,
            metadata.clone(),
        ));
        Self {
            secrets,
            metadata,
            browser,
            listener: RecordingListener::new(),
            resolver,
        }
    }

    /// Working token, contact-list metadata, cooperative browser.
    fn standard() -> Self {
        Self::new(
            FakeSecretSource::ok("tok"),
            contact_list_metadata(),
            RecordingBrowser::new(),
        )
    }

    fn deferred(&self) -> DeferredNavigator {
        DeferredNavigator::new(self.resolver.clone(), Arc::new(self.browser.clone()))
    }

    fn immediate(&self) -> ImmediateNavigator {
        ImmediateNavigator::new(self.resolver.clone(), Arc::new(self.browser.clone()))
    }

    fn fallback(&self, id: &str) -> String {
        self.resolver.builder().fallback_url(id).unwrap()
    }

    fn network_calls(&self) -> usize {
        self.secrets.calls() + self.metadata.calls()
    }
}

fn contact_list_metadata() -> FakeMetadataSource {
    FakeMetadataSource::returning(SchemaMetadata {
        domain_id: Some("contact-list".into()),
        ..SchemaMetadata::default()
    })
}

// ---------------------------------------------------------------------------
// Deferred
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deferred_redirects_placeholder_to_resolved_link() {
    let rig = Rig::standard();

    let outcome = rig
        .deferred()
        .navigate(&ElementReference::new("crew-1"), &ResolutionContext::default(), &rig.listener)
        .await;

    let url = match &outcome {
        NavigationOutcome::Redirected { url } => url.clone(),
        other => panic!("unexpected outcome {other:?}"),
    };
    assert!(url.contains("#contact-list/crew-1/view/"));
    assert_eq!(
        rig.browser.events(),
        vec![BrowserEvent::TabOpened, BrowserEvent::LocationSet(url)]
    );
    assert!(rig.listener.errors().is_empty());
    assert!(rig.listener.warnings().is_empty());
}

#[tokio::test]
async fn deferred_rejects_blank_id_before_opening_a_tab() {
    let rig = Rig::standard();

    let outcome = rig
        .deferred()
        .navigate(&ElementReference::new("  "), &ResolutionContext::default(), &rig.listener)
        .await;

    assert_eq!(outcome, NavigationOutcome::Rejected);
    assert!(rig.browser.events().is_empty());
    assert_eq!(rig.network_calls(), 0);
    assert_eq!(
        rig.listener.errors(),
        vec![NavigationError::InvalidElement(LinkError::InvalidInput {
            field: "elementId"
        })]
    );
}

#[tokio::test]
async fn deferred_reports_blocked_popup_without_resolving() {
    let rig = Rig::new(
        FakeSecretSource::ok("tok"),
        contact_list_metadata(),
        RecordingBrowser::new().blocking_popups(),
    );

    let outcome = rig
        .deferred()
        .navigate(&ElementReference::new("crew-1"), &ResolutionContext::default(), &rig.listener)
        .await;

    assert_eq!(outcome, NavigationOutcome::Blocked);
    assert_eq!(rig.listener.errors(), vec![NavigationError::PopupBlocked]);
    assert_eq!(rig.network_calls(), 0);
}

#[tokio::test]
async fn deferred_falls_back_when_unresolvable() {
    let rig = Rig::new(
        FakeSecretSource::ok("tok"),
        FakeMetadataSource::unavailable(),
        RecordingBrowser::new(),
    );
    let context = ResolutionContext::default().with_job_type(JobType::Festival);

    let outcome = rig
        .deferred()
        .navigate(&ElementReference::new("e-5"), &context, &rig.listener)
        .await;

    let fallback = rig.fallback("e-5");
    assert_eq!(
        outcome,
        NavigationOutcome::FallbackRedirected {
            url: fallback.clone()
        }
    );
    assert!(outcome.is_fallback());
    assert_eq!(rig.listener.warnings().len(), 1);
    assert!(rig.listener.errors().is_empty());
    assert_eq!(
        rig.browser.events(),
        vec![BrowserEvent::TabOpened, BrowserEvent::LocationSet(fallback)]
    );
}

#[tokio::test]
async fn deferred_falls_back_when_token_is_unavailable() {
    let rig = Rig::new(
        FakeSecretSource::failing(CredentialError::Status { status: 401 }),
        contact_list_metadata(),
        RecordingBrowser::new(),
    );

    let outcome = rig
        .deferred()
        .navigate(&ElementReference::new("e-6"), &ResolutionContext::default(), &rig.listener)
        .await;

    assert_eq!(
        outcome,
        NavigationOutcome::FallbackRedirected {
            url: rig.fallback("e-6")
        }
    );
    assert_eq!(rig.metadata.calls(), 0);
    assert_eq!(rig.listener.warnings().len(), 1);
}

#[tokio::test]
async fn deferred_retries_with_fallback_when_redirect_throws() {
    let rig = Rig::new(
        FakeSecretSource::ok("tok"),
        contact_list_metadata(),
        RecordingBrowser::new().failing_redirects(1),
    );

    let outcome = rig
        .deferred()
        .navigate(&ElementReference::new("crew-2"), &ResolutionContext::default(), &rig.listener)
        .await;

    let fallback = rig.fallback("crew-2");
    assert_eq!(
        outcome,
        NavigationOutcome::FallbackRedirected {
            url: fallback.clone()
        }
    );
    let events = rig.browser.events();
    assert_eq!(events.len(), 3);
    assert!(matches!(
        &events[1],
        BrowserEvent::LocationRejected(url) if url.contains("#contact-list/")
    ));
    assert_eq!(events[2], BrowserEvent::LocationSet(fallback));
}

#[tokio::test]
async fn deferred_closes_tab_when_every_redirect_throws() {
    let rig = Rig::new(
        FakeSecretSource::ok("tok"),
        contact_list_metadata(),
        RecordingBrowser::new().failing_redirects(2),
    );

    let outcome = rig
        .deferred()
        .navigate(&ElementReference::new("crew-3"), &ResolutionContext::default(), &rig.listener)
        .await;

    assert_eq!(outcome, NavigationOutcome::ClosedWithError);
    assert_eq!(outcome.url(), None);
    assert_eq!(rig.browser.events().last(), Some(&BrowserEvent::TabClosed));
    let errors = rig.listener.errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        NavigationError::RedirectFailed { url, .. } if *url == rig.fallback("crew-3")
    ));
}

// ---------------------------------------------------------------------------
// Immediate
// ---------------------------------------------------------------------------

#[test]
fn immediate_clicks_locally_resolved_link() {
    let rig = Rig::standard();
    let reference = ElementReference::new("eq-1").with_view_hint(SchemaIntent::EquipmentList);

    let outcome = rig
        .immediate()
        .navigate_now(&reference, &ResolutionContext::default(), &rig.listener);

    let url = outcome.url().unwrap().to_owned();
    assert_eq!(outcome, NavigationOutcome::Clicked { url: url.clone() });
    assert!(url.ends_with("#element/eq-1/view/equipment-list/header"));
    assert_eq!(rig.browser.events(), vec![BrowserEvent::AnchorClicked(url)]);
    assert_eq!(rig.network_calls(), 0);
}

#[test]
fn immediate_rejects_blank_id() {
    let rig = Rig::standard();

    let outcome = rig
        .immediate()
        .navigate_now(&ElementReference::new(""), &ResolutionContext::default(), &rig.listener);

    assert_eq!(outcome, NavigationOutcome::Rejected);
    assert!(rig.browser.events().is_empty());
    assert_eq!(rig.listener.errors().len(), 1);
    assert_eq!(rig.network_calls(), 0);
}

#[test]
fn immediate_falls_back_when_click_fails() {
    let rig = Rig::new(
        FakeSecretSource::ok("tok"),
        contact_list_metadata(),
        RecordingBrowser::new().failing_clicks(1),
    );
    let context = ResolutionContext::default().with_view_hint(SchemaIntent::FinDoc);

    let outcome = rig
        .immediate()
        .navigate_now(&ElementReference::new("q-1"), &context, &rig.listener);

    assert_eq!(
        outcome,
        NavigationOutcome::FallbackClicked {
            url: rig.fallback("q-1")
        }
    );
    assert_eq!(rig.listener.warnings().len(), 1);
    assert!(rig.listener.errors().is_empty());
}

#[test]
fn immediate_reports_hard_error_when_fallback_click_fails() {
    let rig = Rig::new(
        FakeSecretSource::ok("tok"),
        contact_list_metadata(),
        RecordingBrowser::new().failing_clicks(2),
    );

    let outcome = rig
        .immediate()
        .navigate_now(&ElementReference::new("x-1"), &ResolutionContext::default(), &rig.listener);

    assert_eq!(outcome, NavigationOutcome::HardError);
    let errors = rig.listener.errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], NavigationError::AnchorFailed { .. }));
    assert_eq!(rig.browser.events().len(), 2);
}

#[tokio::test]
async fn immediate_navigator_works_through_the_port() {
    let rig = Rig::standard();
    let port: Box<dyn NavigationPort> = Box::new(rig.immediate());

    let outcome = port
        .navigate(
            &ElementReference::new("f-1"),
            &ResolutionContext::default().with_job_type(JobType::Tourdate),
            &rig.listener,
        )
        .await;

    assert!(matches!(outcome, NavigationOutcome::Clicked { .. }));
    assert_eq!(rig.network_calls(), 0);
}
