//! Common test fixtures: in-memory stores and scripted providers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use aac_authority::{
    AttributeAuthorityRegistry, AttributeProvider, Authority, ConfiguredProvider,
    IdentityAuthorityRegistry, IdentityProvider, ProviderError, ProviderResult,
};
use aac_model::attributes::{AttributeSet, UserAttributes, UserAuthenticatedPrincipal};
use aac_model::group::Group;
use aac_model::identity::{Identity, InternalAccount, OidcAccount, UserIdentity};
use aac_model::realm::Realm;
use aac_model::role::RealmRole;
use aac_model::subject::Subject;
use aac_user::{
    GroupService, RealmStore, RoleService, SubjectStore, UserError, UserResult, UserService,
    UserTranslator,
};

/// Shared log of lifecycle events, used to assert cleanup ordering.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Test environment wiring in-memory stores and registries into an engine.
pub struct TestEnv {
    pub subjects: Arc<InMemorySubjects>,
    pub realms: Arc<InMemoryRealms>,
    pub identity_providers: Arc<IdentityAuthorityRegistry>,
    pub attribute_providers: Arc<AttributeAuthorityRegistry>,
    pub roles: Arc<InMemoryRoles>,
    pub groups: Arc<InMemoryGroups>,
    pub events: EventLog,
}

impl TestEnv {
    /// Creates an environment with the given realms configured.
    pub fn new(realms: &[&str]) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("aac_user=debug")
            .try_init();

        let events: EventLog = Arc::default();
        Self {
            subjects: Arc::new(InMemorySubjects::new(events.clone())),
            realms: Arc::new(InMemoryRealms::new(realms)),
            identity_providers: Arc::new(IdentityAuthorityRegistry::new()),
            attribute_providers: Arc::new(AttributeAuthorityRegistry::new()),
            roles: Arc::new(InMemoryRoles::default()),
            groups: Arc::new(InMemoryGroups::new(events.clone())),
            events,
        }
    }

    /// Builds the aggregation engine over this environment.
    pub fn service(&self) -> UserService {
        UserService::new(
            self.subjects.clone(),
            self.realms.clone(),
            self.identity_providers.clone(),
            self.attribute_providers.clone(),
            self.roles.clone(),
            self.groups.clone(),
        )
    }

    /// Builds the engine with a cross-realm translator configured.
    pub fn service_with_translator(&self, translator: Arc<dyn UserTranslator>) -> UserService {
        self.service().with_translator(translator)
    }

    /// Creates and stores a user subject homed in a realm.
    pub fn create_user(&self, realm: &str, username: &str) -> Subject {
        let subject = Subject::new(realm, username);
        self.subjects.insert(subject.clone());
        subject
    }

    /// Assigns a role to an entity (subject or group) in a realm.
    pub fn assign_role(&self, entity_id: Uuid, realm: &str, role: &str) {
        self.roles.assign(entity_id, RealmRole::new(realm, role));
    }

    /// Creates a group and enrolls a subject as a direct member.
    pub fn enroll_in_group(&self, subject_id: Uuid, realm: &str, name: &str) -> Group {
        let group = Group::new(realm, name);
        self.groups.add_member(subject_id, group.clone());
        group
    }
}

// ============================================================================
// Stores
// ============================================================================

/// Subject store over a plain map.
pub struct InMemorySubjects {
    inner: Mutex<HashMap<Uuid, Subject>>,
    events: EventLog,
}

impl InMemorySubjects {
    pub fn new(events: EventLog) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            events,
        }
    }

    pub fn insert(&self, subject: Subject) {
        self.inner.lock().insert(subject.id, subject);
    }

    pub fn contains(&self, subject_id: Uuid) -> bool {
        self.inner.lock().contains_key(&subject_id)
    }
}

#[async_trait]
impl SubjectStore for InMemorySubjects {
    async fn get(&self, subject_id: Uuid) -> UserResult<Subject> {
        self.inner
            .lock()
            .get(&subject_id)
            .cloned()
            .ok_or(UserError::NoSuchUser(subject_id))
    }

    async fn find(&self, subject_id: Uuid) -> UserResult<Option<Subject>> {
        Ok(self.inner.lock().get(&subject_id).cloned())
    }

    async fn list(&self, realm: &str) -> UserResult<Vec<Subject>> {
        let mut subjects: Vec<Subject> = self
            .inner
            .lock()
            .values()
            .filter(|s| s.realm == realm)
            .cloned()
            .collect();
        subjects.sort_by_key(|s| s.id);
        Ok(subjects)
    }

    async fn count(&self, realm: &str) -> UserResult<u64> {
        Ok(self.inner.lock().values().filter(|s| s.realm == realm).count() as u64)
    }

    async fn delete(&self, subject_id: Uuid) -> UserResult<()> {
        self.events.lock().push("subject:delete".to_string());
        self.inner.lock().remove(&subject_id);
        Ok(())
    }
}

/// Realm store over a fixed slug set.
pub struct InMemoryRealms {
    slugs: Vec<String>,
}

impl InMemoryRealms {
    pub fn new(slugs: &[&str]) -> Self {
        Self {
            slugs: slugs.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

#[async_trait]
impl RealmStore for InMemoryRealms {
    async fn get(&self, slug: &str) -> UserResult<Realm> {
        if self.slugs.iter().any(|s| s == slug) {
            Ok(Realm::new(slug, slug))
        } else {
            Err(UserError::NoSuchRealm(slug.to_string()))
        }
    }
}

/// Role assignments keyed by entity and realm.
#[derive(Default)]
pub struct InMemoryRoles {
    inner: Mutex<HashMap<(Uuid, String), HashSet<RealmRole>>>,
}

impl InMemoryRoles {
    pub fn assign(&self, entity_id: Uuid, role: RealmRole) {
        self.inner
            .lock()
            .entry((entity_id, role.realm.clone()))
            .or_default()
            .insert(role);
    }
}

#[async_trait]
impl RoleService for InMemoryRoles {
    async fn get_roles(&self, entity_id: Uuid, realm: &str) -> UserResult<HashSet<RealmRole>> {
        Ok(self
            .inner
            .lock()
            .get(&(entity_id, realm.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Direct group memberships keyed by subject and realm.
pub struct InMemoryGroups {
    inner: Mutex<HashMap<(Uuid, String), HashSet<Group>>>,
    events: EventLog,
}

impl InMemoryGroups {
    pub fn new(events: EventLog) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            events,
        }
    }

    pub fn add_member(&self, subject_id: Uuid, group: Group) {
        self.inner
            .lock()
            .entry((subject_id, group.realm.clone()))
            .or_default()
            .insert(group);
    }
}

#[async_trait]
impl GroupService for InMemoryGroups {
    async fn get_subject_groups(
        &self,
        subject_id: Uuid,
        realm: &str,
    ) -> UserResult<HashSet<Group>> {
        Ok(self
            .inner
            .lock()
            .get(&(subject_id, realm.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_subject_memberships(&self, subject_id: Uuid) -> UserResult<()> {
        self.events.lock().push("groups:delete".to_string());
        self.inner.lock().retain(|(id, _), _| *id != subject_id);
        Ok(())
    }
}

// ============================================================================
// Scripted providers
// ============================================================================

/// Identity provider serving a scripted identity list.
pub struct ScriptedIdp {
    id: String,
    realm: String,
    authority: Authority,
    identities: Mutex<Vec<UserIdentity>>,
    fail: bool,
    hang: bool,
    events: EventLog,
}

impl std::fmt::Debug for ScriptedIdp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedIdp").field("id", &self.id).finish()
    }
}

impl ScriptedIdp {
    pub fn new(id: &str, realm: &str, authority: Authority, events: EventLog) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            realm: realm.to_string(),
            authority,
            identities: Mutex::new(Vec::new()),
            fail: false,
            hang: false,
            events,
        })
    }

    pub fn failing(id: &str, realm: &str, authority: Authority, events: EventLog) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            realm: realm.to_string(),
            authority,
            identities: Mutex::new(Vec::new()),
            fail: true,
            hang: false,
            events,
        })
    }

    pub fn hanging(id: &str, realm: &str, authority: Authority, events: EventLog) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            realm: realm.to_string(),
            authority,
            identities: Mutex::new(Vec::new()),
            fail: false,
            hang: true,
            events,
        })
    }

    /// Registers an internal identity for a subject with this provider.
    pub fn register_internal(&self, subject_id: Uuid, username: &str) -> UserIdentity {
        let identity = UserIdentity::Internal(Identity::new(
            &self.id,
            &self.realm,
            subject_id,
            InternalAccount {
                username: username.to_string(),
                email: None,
                confirmed: true,
            },
        ));
        self.identities.lock().push(identity.clone());
        identity
    }

    /// Registers an upstream OIDC identity for a subject with this provider.
    pub fn register_oidc(&self, subject_id: Uuid, upstream_subject: &str) -> UserIdentity {
        let identity = UserIdentity::Oidc(Identity::new(
            &self.id,
            &self.realm,
            subject_id,
            OidcAccount {
                issuer: "https://idp.example.com".to_string(),
                subject: upstream_subject.to_string(),
                username: upstream_subject.to_string(),
                email: None,
            },
        ));
        self.identities.lock().push(identity.clone());
        identity
    }
}

impl ConfiguredProvider for ScriptedIdp {
    fn authority(&self) -> Authority {
        self.authority
    }

    fn provider_id(&self) -> &str {
        &self.id
    }

    fn realm(&self) -> &str {
        &self.realm
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdp {
    async fn list_identities(&self, subject_id: Uuid) -> ProviderResult<Vec<UserIdentity>> {
        if self.fail {
            return Err(ProviderError::connection("upstream unreachable"));
        }
        if self.hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(self
            .identities
            .lock()
            .iter()
            .filter(|i| i.subject_id() == subject_id)
            .cloned()
            .collect())
    }

    async fn delete_identities(&self, subject_id: Uuid) -> ProviderResult<()> {
        self.events.lock().push(format!("idp:{}", self.id));
        if self.fail {
            return Err(ProviderError::connection("upstream unreachable"));
        }
        self.identities.lock().retain(|i| i.subject_id() != subject_id);
        Ok(())
    }
}

/// Attribute provider serving scripted attribute sets.
pub struct ScriptedAp {
    id: String,
    realm: String,
    sets: Mutex<Vec<UserAttributes>>,
    fail: bool,
    events: EventLog,
}

impl std::fmt::Debug for ScriptedAp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedAp").field("id", &self.id).finish()
    }
}

impl ScriptedAp {
    pub fn new(id: &str, realm: &str, events: EventLog) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            realm: realm.to_string(),
            sets: Mutex::new(Vec::new()),
            fail: false,
            events,
        })
    }

    pub fn failing(id: &str, realm: &str, events: EventLog) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            realm: realm.to_string(),
            sets: Mutex::new(Vec::new()),
            fail: true,
            events,
        })
    }

    /// Stores a named attribute set for a subject.
    pub fn store_set(&self, subject_id: Uuid, identifier: &str, key: &str, value: &str) {
        let set = AttributeSet::new(identifier).with_attribute(key, value);
        self.sets.lock().push(UserAttributes::new(
            Authority::Internal,
            &self.id,
            &self.realm,
            subject_id,
            set,
        ));
    }
}

impl ConfiguredProvider for ScriptedAp {
    fn authority(&self) -> Authority {
        Authority::Internal
    }

    fn provider_id(&self) -> &str {
        &self.id
    }

    fn realm(&self) -> &str {
        &self.realm
    }
}

#[async_trait]
impl AttributeProvider for ScriptedAp {
    async fn get_user_attributes(&self, subject_id: Uuid) -> ProviderResult<Vec<UserAttributes>> {
        if self.fail {
            return Err(ProviderError::connection("attribute store down"));
        }
        Ok(self
            .sets
            .lock()
            .iter()
            .filter(|a| a.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn convert_principal_attributes(
        &self,
        principal: &UserAuthenticatedPrincipal,
        subject_id: Uuid,
    ) -> ProviderResult<Vec<UserAttributes>> {
        if self.fail {
            return Err(ProviderError::connection("attribute store down"));
        }
        let mut set = AttributeSet::new("login");
        set.attributes = principal.attributes.clone();
        Ok(vec![UserAttributes::new(
            Authority::Internal,
            &self.id,
            &self.realm,
            subject_id,
            set,
        )])
    }

    async fn delete_user_attributes(&self, subject_id: Uuid) -> ProviderResult<()> {
        self.events.lock().push(format!("ap:{}", self.id));
        self.sets.lock().retain(|a| a.subject_id != subject_id);
        Ok(())
    }
}
