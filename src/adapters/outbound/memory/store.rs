use super::{StoreSnapshot, SNAPSHOT_VERSION};
use crate::ports::outbound::{
    BreachEventRepository, CompanyRepository, DeviceRepository, UserRepository,
};
use crate::risk_assessment::domain::{
    BreachEvent, BreachPolicy, Company, Device, IpReputation, PassportString, Score, User,
    UserName,
};
use crate::shared::{Result, RiskError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::net::IpAddr;
use uuid::Uuid;

/// InMemoryStore implements every repository port on concurrent maps
///
/// Each entity lives in its own `DashMap`, so updates lock a single shard and
/// no lock is ever held across an `.await`. Ordering is applied on read:
/// users and companies in creation order, events and devices newest first.
#[derive(Default)]
pub struct InMemoryStore {
    users: DashMap<PassportString, User>,
    companies: DashMap<String, Company>,
    policies: DashMap<String, BreachPolicy>,
    events: DashMap<Uuid, BreachEvent>,
    devices: DashMap<Uuid, Device>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a snapshot. Later duplicates overwrite earlier ones.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new();
        for user in snapshot.users {
            store.users.insert(user.passport_string.clone(), user);
        }
        for company in snapshot.companies {
            store.companies.insert(company.id.clone(), company);
        }
        for policy in snapshot.breach_policies {
            store.policies.insert(policy.company_id.clone(), policy);
        }
        for event in snapshot.breach_events {
            store.events.insert(event.id, event);
        }
        for device in snapshot.devices {
            store.devices.insert(device.id, device);
        }
        store
    }

    /// Copies the current contents into a snapshot, in listing order.
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut breach_policies = cloned_values(&self.policies);
        breach_policies.sort_by(|a, b| a.company_id.cmp(&b.company_id));

        StoreSnapshot {
            version: SNAPSHOT_VERSION,
            users: self.users_in_order(),
            companies: self.companies_in_order(),
            breach_policies,
            breach_events: newest_events_first(cloned_values(&self.events)),
            devices: most_recent_devices_first(cloned_values(&self.devices)),
        }
    }

    fn users_in_order(&self) -> Vec<User> {
        let mut users = cloned_values(&self.users);
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.passport_string.cmp(&b.passport_string))
        });
        users
    }

    fn companies_in_order(&self) -> Vec<Company> {
        let mut companies = cloned_values(&self.companies);
        companies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        companies
    }

    fn events_where(&self, keep: impl Fn(&BreachEvent) -> bool) -> Vec<BreachEvent> {
        let events = self
            .events
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        newest_events_first(events)
    }
}

fn cloned_values<K, V>(map: &DashMap<K, V>) -> Vec<V>
where
    K: Eq + std::hash::Hash,
    V: Clone,
{
    map.iter().map(|entry| entry.value().clone()).collect()
}

fn newest_events_first(mut events: Vec<BreachEvent>) -> Vec<BreachEvent> {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
    events
}

fn most_recent_devices_first(mut devices: Vec<Device>) -> Vec<Device> {
    devices.sort_by(|a, b| b.last_seen.cmp(&a.last_seen).then_with(|| a.id.cmp(&b.id)));
    devices
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_if_absent(&self, user: User) -> Result<(User, bool)> {
        match self.users.entry(user.passport_string.clone()) {
            Entry::Occupied(existing) => Ok((existing.get().clone(), false)),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok((user, true))
            }
        }
    }

    async fn find_by_passport(&self, passport: &PassportString) -> Result<Option<User>> {
        Ok(self.users.get(passport).map(|u| u.clone()))
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.users_in_order())
    }

    async fn rename(
        &self,
        passport: &PassportString,
        name: UserName,
        now: DateTime<Utc>,
    ) -> Result<Option<User>> {
        Ok(self.users.get_mut(passport).map(|mut user| {
            user.rename(name, now);
            user.clone()
        }))
    }

    async fn set_ref_score(
        &self,
        passport: &PassportString,
        score: Score,
        now: DateTime<Utc>,
    ) -> Result<Option<Score>> {
        Ok(self.users.get_mut(passport).map(|mut user| {
            let previous = user.ref_score;
            user.set_ref_score(score, now);
            previous
        }))
    }

    async fn delete(&self, passport: &PassportString) -> Result<bool> {
        Ok(self.users.remove(passport).is_some())
    }
}

#[async_trait]
impl CompanyRepository for InMemoryStore {
    async fn insert_company_if_absent(&self, company: Company) -> Result<(Company, bool)> {
        match self.companies.entry(company.id.clone()) {
            Entry::Occupied(existing) => Ok((existing.get().clone(), false)),
            Entry::Vacant(slot) => {
                slot.insert(company.clone());
                Ok((company, true))
            }
        }
    }

    async fn find_company(&self, id: &str) -> Result<Option<Company>> {
        Ok(self.companies.get(id).map(|c| c.clone()))
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        Ok(self.companies_in_order())
    }

    async fn find_policy(&self, company_id: &str) -> Result<Option<BreachPolicy>> {
        Ok(self.policies.get(company_id).map(|p| p.clone()))
    }

    async fn insert_policy_if_absent(&self, policy: BreachPolicy) -> Result<(BreachPolicy, bool)> {
        match self.policies.entry(policy.company_id.clone()) {
            Entry::Occupied(existing) => Ok((existing.get().clone(), false)),
            Entry::Vacant(slot) => {
                slot.insert(policy.clone());
                Ok((policy, true))
            }
        }
    }

    async fn update_policy(&self, policy: BreachPolicy) -> Result<()> {
        match self.policies.get_mut(&policy.company_id) {
            Some(mut existing) => {
                *existing = policy;
                Ok(())
            }
            None => Err(RiskError::not_found("Breach policy", policy.company_id).into()),
        }
    }

    async fn delete_policy(&self, company_id: &str) -> Result<bool> {
        Ok(self.policies.remove(company_id).is_some())
    }

    async fn list_policies(&self) -> Result<Vec<BreachPolicy>> {
        let mut policies = cloned_values(&self.policies);
        policies.sort_by(|a, b| a.company_id.cmp(&b.company_id));
        Ok(policies)
    }
}

#[async_trait]
impl BreachEventRepository for InMemoryStore {
    async fn insert(&self, event: BreachEvent) -> Result<()> {
        self.events.insert(event.id, event);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<BreachEvent>> {
        Ok(self.events.get(&id).map(|e| e.clone()))
    }

    async fn list(&self) -> Result<Vec<BreachEvent>> {
        Ok(self.events_where(|_| true))
    }

    async fn list_by_user(&self, user_id: &PassportString) -> Result<Vec<BreachEvent>> {
        Ok(self.events_where(|e| &e.user_id == user_id))
    }

    async fn list_by_company(&self, company_id: &str) -> Result<Vec<BreachEvent>> {
        Ok(self.events_where(|e| e.company_id.as_deref() == Some(company_id)))
    }

    async fn resolve(
        &self,
        id: Uuid,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<BreachEvent> {
        let mut event = self
            .events
            .get_mut(&id)
            .ok_or_else(|| RiskError::not_found("Breach event", id.to_string()))?;
        event.resolve(notes, now)?;
        Ok(event.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<BreachEvent>> {
        Ok(self.events.remove(&id).map(|(_, event)| event))
    }
}

#[async_trait]
impl DeviceRepository for InMemoryStore {
    async fn find_by_user_and_ip(
        &self,
        user_id: &PassportString,
        ip_address: IpAddr,
    ) -> Result<Option<Device>> {
        Ok(self
            .devices
            .iter()
            .find(|entry| &entry.user_id == user_id && entry.ip_address == ip_address)
            .map(|entry| entry.value().clone()))
    }

    async fn save(&self, device: Device) -> Result<()> {
        self.devices.insert(device.id, device);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Device>> {
        Ok(self.devices.get(&id).map(|d| d.clone()))
    }

    async fn refresh(
        &self,
        id: Uuid,
        reputation: IpReputation,
        now: DateTime<Utc>,
    ) -> Result<Option<Device>> {
        Ok(self.devices.get_mut(&id).map(|mut device| {
            device.touch(reputation, now);
            device.clone()
        }))
    }

    async fn list_by_user(&self, user_id: &PassportString) -> Result<Vec<Device>> {
        let devices = self
            .devices
            .iter()
            .filter(|entry| &entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        Ok(most_recent_devices_first(devices))
    }

    async fn list(&self) -> Result<Vec<Device>> {
        Ok(most_recent_devices_first(cloned_values(&self.devices)))
    }

    async fn delete_by_user(&self, user_id: &PassportString) -> Result<usize> {
        let before = self.devices.len();
        self.devices.retain(|_, device| &device.user_id != user_id);
        Ok(before - self.devices.len())
    }
}
