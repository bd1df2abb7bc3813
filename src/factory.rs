//! The pusher capability table: registration and selection.
//!
//! The registry is built once at startup from a list of
//! (kind, enablement predicate, constructor) registrations and never
//! mutates afterwards. Enablement is evaluated per lookup against the
//! immutable [`PusherContext`] the caller passes in.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::context::PusherContext;
use crate::core::{Pusher, PusherError};
use crate::descriptor::PusherDescriptor;
use crate::pushers::{EmailPusher, HttpPusher};

type Predicate = Box<dyn Fn(&PusherContext) -> bool + Send + Sync>;
type Constructor = Box<
    dyn Fn(&Arc<PusherContext>, &PusherDescriptor) -> Result<Box<dyn Pusher>, PusherError>
        + Send
        + Sync,
>;

struct Registration {
    kind: String,
    enabled: Predicate,
    build: Constructor,
}

/// Outcome of a registry lookup.
///
/// An unknown or disabled kind is a "nothing to do" answer, not an error.
#[must_use]
pub enum PusherLookup {
    /// The kind was registered and enabled; the constructor produced this
    /// pusher.
    Found(Box<dyn Pusher>),
    /// No registered, enabled kind matched the descriptor.
    NoSuchKind(String),
}

/// Builder for a [`PusherRegistry`].
///
/// This is the extension contract: a new pusher kind is added by
/// registering its kind string, an enablement predicate evaluated against
/// the context on every lookup, and a constructor taking
/// `(context, descriptor)`.
pub struct PusherRegistryBuilder {
    registrations: Vec<Registration>,
}

impl PusherRegistryBuilder {
    /// Registers one pusher kind.
    pub fn register<P, C>(mut self, kind: &str, enabled: P, build: C) -> Self
    where
        P: Fn(&PusherContext) -> bool + Send + Sync + 'static,
        C: Fn(&Arc<PusherContext>, &PusherDescriptor) -> Result<Box<dyn Pusher>, PusherError>
            + Send
            + Sync
            + 'static,
    {
        self.registrations.push(Registration {
            kind: kind.to_string(),
            enabled: Box::new(enabled),
            build: Box::new(build),
        });
        self
    }

    /// Finalizes the table, rejecting duplicate kinds.
    pub fn build(self) -> Result<PusherRegistry, PusherError> {
        let mut seen = HashSet::new();
        for registration in &self.registrations {
            if !seen.insert(registration.kind.clone()) {
                return Err(PusherError::DuplicateKind(registration.kind.clone()));
            }
        }
        Ok(PusherRegistry {
            registrations: self.registrations,
        })
    }
}

/// An immutable mapping from pusher kind to constructor capability.
pub struct PusherRegistry {
    registrations: Vec<Registration>,
}

impl PusherRegistry {
    /// Starts an empty registry builder.
    pub fn builder() -> PusherRegistryBuilder {
        PusherRegistryBuilder {
            registrations: Vec::new(),
        }
    }

    /// Builds the standard table: "http" always available, "email" gated
    /// on the context's email-notification flag. Both are registered
    /// unconditionally; only the predicate differs.
    pub fn with_default_kinds() -> Self {
        Self::builder()
            .register(
                "http",
                |_| true,
                |context, descriptor| {
                    HttpPusher::from_descriptor(context, descriptor)
                        .map(|pusher| Box::new(pusher) as Box<dyn Pusher>)
                },
            )
            .register(
                "email",
                PusherContext::email_notifications_enabled,
                |context, descriptor| {
                    EmailPusher::from_descriptor(context, descriptor)
                        .map(|pusher| Box::new(pusher) as Box<dyn Pusher>)
                },
            )
            .build()
            .expect("default kinds are distinct")
    }

    /// Selects and constructs a pusher for the descriptor.
    ///
    /// Returns `Ok(PusherLookup::NoSuchKind)` when no registered, enabled
    /// kind matches. Constructor failures propagate unchanged as `Err`.
    pub fn create_pusher(
        &self,
        context: &Arc<PusherContext>,
        descriptor: &PusherDescriptor,
    ) -> Result<PusherLookup, PusherError> {
        info!(?descriptor, "Trying to create pusher");
        info!(
            email_enable_notifs = context.email_notifications_enabled(),
            "Evaluated email notification flag"
        );

        let registration = self
            .registrations
            .iter()
            .find(|r| r.kind == descriptor.kind && (r.enabled)(context));

        match registration {
            Some(registration) => {
                info!(kind = %registration.kind, "Found pusher kind");
                let pusher = (registration.build)(context, descriptor)?;
                metrics::counter!("pushers_created", "kind" => registration.kind.clone())
                    .increment(1);
                Ok(PusherLookup::Found(pusher))
            }
            None => Ok(PusherLookup::NoSuchKind(descriptor.kind.clone())),
        }
    }

    /// Reports every registered kind with its enablement under the given
    /// context, in registration order.
    pub fn audit(&self, context: &PusherContext) -> Vec<(&str, bool)> {
        self.registrations
            .iter()
            .map(|r| (r.kind.as_str(), (r.enabled)(context)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::Notification;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct NullPusher;

    #[async_trait]
    impl Pusher for NullPusher {
        fn kind(&self) -> &'static str {
            "null"
        }

        async fn push(&self, _notification: &Notification) -> Result<(), PusherError> {
            Ok(())
        }
    }

    // Records every (descriptor) a constructor was invoked with.
    #[derive(Default)]
    struct ConstructorSpy {
        calls: AtomicUsize,
        descriptors: Mutex<Vec<PusherDescriptor>>,
    }

    impl ConstructorSpy {
        fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_descriptor(&self) -> Option<PusherDescriptor> {
            self.descriptors.lock().unwrap().last().cloned()
        }
    }

    fn spy_registry(
        http_spy: Arc<ConstructorSpy>,
        email_spy: Arc<ConstructorSpy>,
    ) -> PusherRegistry {
        let record = |spy: Arc<ConstructorSpy>| {
            move |_context: &Arc<PusherContext>, descriptor: &PusherDescriptor| {
                spy.calls.fetch_add(1, Ordering::SeqCst);
                spy.descriptors.lock().unwrap().push(descriptor.clone());
                Ok::<_, PusherError>(Box::new(NullPusher) as Box<dyn Pusher>)
            }
        };

        PusherRegistry::builder()
            .register("http", |_| true, record(http_spy))
            .register(
                "email",
                PusherContext::email_notifications_enabled,
                record(email_spy),
            )
            .build()
            .unwrap()
    }

    fn context_with_email(enabled: bool) -> Arc<PusherContext> {
        let mut config = Config::default();
        config.email.enable_notifications = enabled;
        Arc::new(PusherContext::from_config(&config).unwrap())
    }

    #[test]
    fn test_http_kind_constructed_regardless_of_email_flag() {
        for email_enabled in [false, true] {
            let http_spy = Arc::new(ConstructorSpy::default());
            let email_spy = Arc::new(ConstructorSpy::default());
            let registry = spy_registry(http_spy.clone(), email_spy.clone());
            let context = context_with_email(email_enabled);
            let descriptor = PusherDescriptor::new("http").with_field("url", "https://x/");

            let result = registry.create_pusher(&context, &descriptor).unwrap();

            assert!(matches!(result, PusherLookup::Found(_)));
            assert_eq!(http_spy.count(), 1);
            assert_eq!(http_spy.last_descriptor(), Some(descriptor));
            assert_eq!(email_spy.count(), 0);
        }
    }

    #[test]
    fn test_email_kind_gated_on_flag() {
        // Enabled: constructor invoked exactly once.
        let http_spy = Arc::new(ConstructorSpy::default());
        let email_spy = Arc::new(ConstructorSpy::default());
        let registry = spy_registry(http_spy.clone(), email_spy.clone());
        let context = context_with_email(true);
        let descriptor =
            PusherDescriptor::new("email").with_field("address", "a@example.com");

        let result = registry.create_pusher(&context, &descriptor).unwrap();

        assert!(matches!(result, PusherLookup::Found(_)));
        assert_eq!(email_spy.count(), 1);
        assert_eq!(email_spy.last_descriptor(), Some(descriptor.clone()));

        // Disabled: no constructor runs and the miss is explicit.
        let http_spy = Arc::new(ConstructorSpy::default());
        let email_spy = Arc::new(ConstructorSpy::default());
        let registry = spy_registry(http_spy.clone(), email_spy.clone());
        let context = context_with_email(false);

        let result = registry.create_pusher(&context, &descriptor).unwrap();

        assert!(matches!(result, PusherLookup::NoSuchKind(kind) if kind == "email"));
        assert_eq!(email_spy.count(), 0);
        assert_eq!(http_spy.count(), 0);
    }

    #[test]
    fn test_unknown_kind_returns_no_such_kind_under_both_flags() {
        for email_enabled in [false, true] {
            let http_spy = Arc::new(ConstructorSpy::default());
            let email_spy = Arc::new(ConstructorSpy::default());
            let registry = spy_registry(http_spy.clone(), email_spy.clone());
            let context = context_with_email(email_enabled);
            let descriptor = PusherDescriptor::new("sms");

            let result = registry.create_pusher(&context, &descriptor).unwrap();

            assert!(matches!(result, PusherLookup::NoSuchKind(kind) if kind == "sms"));
            assert_eq!(http_spy.count(), 0);
            assert_eq!(email_spy.count(), 0);
        }
    }

    #[test]
    fn test_constructor_errors_propagate_unchanged() {
        let registry = PusherRegistry::with_default_kinds();
        let context = context_with_email(false);
        // Valid kind, but missing the url the http constructor requires.
        let descriptor = PusherDescriptor::new("http");

        let result = registry.create_pusher(&context, &descriptor);

        assert!(matches!(result, Err(PusherError::MissingField("url"))));
    }

    #[test]
    fn test_default_kinds_build_real_pushers() {
        let registry = PusherRegistry::with_default_kinds();
        let context = context_with_email(true);

        let http = registry
            .create_pusher(
                &context,
                &PusherDescriptor::new("http").with_field("url", "https://push.example.com"),
            )
            .unwrap();
        match http {
            PusherLookup::Found(pusher) => assert_eq!(pusher.kind(), "http"),
            PusherLookup::NoSuchKind(kind) => panic!("http kind missing: {}", kind),
        }

        let email = registry
            .create_pusher(
                &context,
                &PusherDescriptor::new("email").with_field("address", "a@example.com"),
            )
            .unwrap();
        match email {
            PusherLookup::Found(pusher) => assert_eq!(pusher.kind(), "email"),
            PusherLookup::NoSuchKind(kind) => panic!("email kind missing: {}", kind),
        }
    }

    #[test]
    fn test_builder_rejects_duplicate_kind() {
        let constructor = |_: &Arc<PusherContext>, _: &PusherDescriptor| {
            Ok::<_, PusherError>(Box::new(NullPusher) as Box<dyn Pusher>)
        };

        let result = PusherRegistry::builder()
            .register("http", |_| true, constructor)
            .register("http", |_| true, constructor)
            .build();

        assert!(matches!(
            result,
            Err(PusherError::DuplicateKind(kind)) if kind == "http"
        ));
    }

    #[test]
    fn test_audit_reports_enablement_per_context() {
        let registry = PusherRegistry::with_default_kinds();

        let audit = registry.audit(&context_with_email(false));
        assert_eq!(audit, vec![("http", true), ("email", false)]);

        let audit = registry.audit(&context_with_email(true));
        assert_eq!(audit, vec![("http", true), ("email", true)]);
    }
}
