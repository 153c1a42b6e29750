//! Query primitives beyond plain CRUD.

use chrono::{DateTime, Utc};

use planboard_core::{EmployeeId, TeamId, TenantId};
use planboard_planning::{day_bounds, Employee, Record, View};

use crate::document::{Direction, DocumentStore, Query};

use super::binding::fields;
use super::{Operation, RepositoryError, TenantRepository};

impl<S> TenantRepository<Employee, S>
where
    S: DocumentStore + ?Sized,
{
    /// Employees assigned to `team_id`, ordered by display name.
    pub async fn list_by_team(&self, tenant_id: &TenantId, team_id: &TeamId) -> Result<Vec<Employee>, RepositoryError> {
        let query = Query::new()
            .where_eq(fields::TEAM_ID, team_id.as_str())
            .order_by(fields::DISPLAY_NAME, Direction::Ascending);
        self.run_query(tenant_id, &query, Operation::Query("list_by_team"))
            .await
    }
}

impl<S> TenantRepository<Record, S>
where
    S: DocumentStore + ?Sized,
{
    /// Records of one employee with `start <= date <= end`, ascending by date.
    pub async fn list_records_by_employee_and_date_range(
        &self,
        tenant_id: &TenantId,
        employee_id: &EmployeeId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Record>, RepositoryError> {
        let query = Query::new()
            .where_eq(fields::EMPLOYEE_ID, employee_id.as_str())
            .where_gte(fields::DATE, start)
            .where_lte(fields::DATE, end)
            .order_by(fields::DATE, Direction::Ascending);
        self.run_query(
            tenant_id,
            &query,
            Operation::Query("list_records_by_employee_and_date_range"),
        )
        .await
    }

    /// The record of one employee on the UTC day containing `date`, if any.
    ///
    /// The store does not enforce one record per day; if several exist, the
    /// earliest is returned.
    pub async fn list_record_by_employee_and_date(
        &self,
        tenant_id: &TenantId,
        employee_id: &EmployeeId,
        date: DateTime<Utc>,
    ) -> Result<Option<Record>, RepositoryError> {
        let (start, end) = day_bounds(date);
        let query = Query::new()
            .where_eq(fields::EMPLOYEE_ID, employee_id.as_str())
            .where_gte(fields::DATE, start)
            .where_lte(fields::DATE, end)
            .order_by(fields::DATE, Direction::Ascending)
            .limit(1);
        let mut found = self
            .run_query(tenant_id, &query, Operation::Query("list_record_by_employee_and_date"))
            .await?;
        Ok(found.pop())
    }

    /// Records of every employee with `start <= date <= end`, ascending by date.
    pub async fn list_records_by_date_range(
        &self,
        tenant_id: &TenantId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Record>, RepositoryError> {
        let query = Query::new()
            .where_gte(fields::DATE, start)
            .where_lte(fields::DATE, end)
            .order_by(fields::DATE, Direction::Ascending);
        self.run_query(tenant_id, &query, Operation::Query("list_records_by_date_range"))
            .await
    }
}

impl<S> TenantRepository<View, S>
where
    S: DocumentStore + ?Sized,
{
    pub async fn list_views_by_owner(&self, tenant_id: &TenantId, owner_id: &EmployeeId) -> Result<Vec<View>, RepositoryError> {
        let query = Query::new().where_eq(fields::OWNER_ID, owner_id.as_str());
        self.run_query(tenant_id, &query, Operation::Query("list_views_by_owner"))
            .await
    }

    /// Views whose `sharedWith` set contains `employee_id`.
    pub async fn list_views_shared_with(
        &self,
        tenant_id: &TenantId,
        employee_id: &EmployeeId,
    ) -> Result<Vec<View>, RepositoryError> {
        let query = Query::new().array_contains(fields::SHARED_WITH, employee_id.as_str());
        self.run_query(tenant_id, &query, Operation::Query("list_views_shared_with"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use chrono::TimeZone;
    use planboard_core::ManualClock;
    use planboard_planning::{NewRecord, NewView, RequiredText, ViewFilters};

    use super::*;
    use crate::document::InMemoryDocumentStore;
    use crate::path::PathScheme;
    use crate::repository::Repositories;

    fn setup() -> Repositories<InMemoryDocumentStore> {
        Repositories::new(
            Arc::new(InMemoryDocumentStore::new()),
            PathScheme::default(),
            Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap())),
        )
    }

    fn eid(s: &str) -> EmployeeId {
        EmployeeId::new(s).unwrap()
    }

    fn record(employee: &str, date: DateTime<Utc>, value: &str) -> NewRecord {
        NewRecord {
            employee_id: eid(employee),
            date,
            value: value.to_string(),
            style: None,
            updated_by: eid(employee),
        }
    }

    fn day(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, d, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn record_for_a_day_matches_any_time_that_day() {
        let repos = setup();
        let demo = TenantId::new("demo").unwrap();
        repos.records.create(&demo, &record("e1", day(13, 0), "Ramcon")).await.unwrap();

        let afternoon = repos
            .records
            .list_record_by_employee_and_date(&demo, &eid("e1"), day(13, 15))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(afternoon.value, "Ramcon");

        let next_day = repos
            .records
            .list_record_by_employee_and_date(&demo, &eid("e1"), day(14, 0))
            .await
            .unwrap();
        assert!(next_day.is_none());

        let other_employee = repos
            .records
            .list_record_by_employee_and_date(&demo, &eid("e2"), day(13, 15))
            .await
            .unwrap();
        assert!(other_employee.is_none());
    }

    #[tokio::test]
    async fn date_range_is_inclusive_and_ascending() {
        let repos = setup();
        let demo = TenantId::new("demo").unwrap();
        for (d, v) in [(15, "c"), (10, "a"), (12, "b"), (20, "out")] {
            repos.records.create(&demo, &record("e1", day(d, 0), v)).await.unwrap();
        }
        repos.records.create(&demo, &record("e2", day(12, 0), "other")).await.unwrap();

        let values: Vec<_> = repos
            .records
            .list_records_by_employee_and_date_range(&demo, &eid("e1"), day(10, 0), day(15, 0))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.value)
            .collect();
        assert_eq!(values, ["a", "b", "c"]);

        let everyone = repos
            .records
            .list_records_by_date_range(&demo, day(12, 0), day(12, 0))
            .await
            .unwrap();
        assert_eq!(everyone.len(), 2);
    }

    #[tokio::test]
    async fn views_by_owner_and_by_share() {
        let repos = setup();
        let demo = TenantId::new("demo").unwrap();
        let view = |owner: &str, shared: &[&str], name: &str| NewView {
            owner_id: eid(owner),
            name: RequiredText::parse("name", name).unwrap(),
            filters: ViewFilters::default(),
            shared_with: shared.iter().map(|s| eid(s)).collect::<BTreeSet<_>>(),
            color: None,
            is_default: None,
        };

        repos.views.create(&demo, &view("e1", &["e2"], "Mine")).await.unwrap();
        repos.views.create(&demo, &view("e3", &["e1", "e2"], "Team")).await.unwrap();

        let owned = repos.views.list_views_by_owner(&demo, &eid("e1")).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].name, "Mine");

        let shared = repos.views.list_views_shared_with(&demo, &eid("e1")).await.unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].name, "Team");

        assert_eq!(repos.views.list_views_shared_with(&demo, &eid("e2")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn record_create_stamps_both_timestamps() {
        let repos = setup();
        let demo = TenantId::new("demo").unwrap();
        let id = repos.records.create(&demo, &record("e1", day(13, 0), "MIGASA")).await.unwrap();

        let stored = repos.records.get_by_id(&demo, &id).await.unwrap().unwrap();
        assert_eq!(stored.created_at, stored.updated_at);
        assert_eq!(stored.date, day(13, 0));
    }
}
