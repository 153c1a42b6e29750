//! Gated planning operations.
//!
//! Each method checks the permission gate for the caller's [`TenantContext`]
//! and then delegates to the tenant-scoped repository. Reads need a scoped
//! identity; writes also need `canEdit`. Writes that point at another team or
//! employee are refused unless the target exists in the same tenant.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use planboard_auth::can_delete_team;
use planboard_core::{Clock, EmployeeId, RecordId, TeamId, TenantId, ViewId};
use planboard_infra::{DocumentStore, EntityKind, PathScheme, Repositories, Subscription};
use planboard_planning::{
    DateRange, EmailAddress, Employee, EmployeeDisplayName, EmployeePatch, HexColor, NewEmployee,
    NewRecord, NewTeam, NewView, Record, RecordPatch, RequiredText, Team, TeamDisplayName,
    TeamPatch, View, ViewPatch,
};

use crate::authz::{require_edit, require_view};
use crate::context::TenantContext;
use crate::demo::DEMO_TEAMS;
use crate::errors::ServiceError;

/// Result of [`PlanningService::clear_tenant_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    pub employees_deleted: usize,
    pub teams_deleted: usize,
}

/// Result of [`PlanningService::seed_demo_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub teams_created: usize,
    pub employees_created: usize,
    pub managers_assigned: usize,
}

/// Team and employee counts of one tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TenantStats {
    pub teams: usize,
    pub employees: usize,
}

pub struct PlanningService<S: ?Sized> {
    repos: Repositories<S>,
}

impl<S> PlanningService<S>
where
    S: DocumentStore + ?Sized,
{
    pub fn new(store: Arc<S>, scheme: PathScheme, clock: Arc<dyn Clock>) -> Self {
        Self {
            repos: Repositories::new(store, scheme, clock),
        }
    }

    pub fn repositories(&self) -> &Repositories<S> {
        &self.repos
    }

    // ─────────────────────────────────────────────────────────────────────
    // Employees
    // ─────────────────────────────────────────────────────────────────────

    pub async fn list_employees(&self, ctx: &TenantContext) -> Result<Vec<Employee>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.employees.list_all(ctx.tenant_id()).await?)
    }

    pub async fn get_employee(&self, ctx: &TenantContext, id: &EmployeeId) -> Result<Option<Employee>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.employees.get_by_id(ctx.tenant_id(), id).await?)
    }

    pub async fn list_employees_by_team(&self, ctx: &TenantContext, team_id: &TeamId) -> Result<Vec<Employee>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.employees.list_by_team(ctx.tenant_id(), team_id).await?)
    }

    /// Fails with `NotFound` if `input.team_id` names no team of the tenant.
    pub async fn create_employee(&self, ctx: &TenantContext, input: &NewEmployee) -> Result<EmployeeId, ServiceError> {
        require_edit(ctx)?;
        self.ensure_team(ctx.tenant_id(), &input.team_id).await?;
        Ok(self.repos.employees.create(ctx.tenant_id(), input).await?)
    }

    pub async fn update_employee(
        &self,
        ctx: &TenantContext,
        id: &EmployeeId,
        patch: &EmployeePatch,
    ) -> Result<(), ServiceError> {
        require_edit(ctx)?;
        if let Some(team_id) = &patch.team_id {
            self.ensure_team(ctx.tenant_id(), team_id).await?;
        }
        Ok(self.repos.employees.update(ctx.tenant_id(), id, patch).await?)
    }

    pub async fn delete_employee(&self, ctx: &TenantContext, id: &EmployeeId) -> Result<(), ServiceError> {
        require_edit(ctx)?;
        Ok(self.repos.employees.delete(ctx.tenant_id(), id).await?)
    }

    pub fn subscribe_employees(&self, ctx: &TenantContext) -> Result<Subscription<Employee>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.employees.subscribe(ctx.tenant_id()))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Teams
    // ─────────────────────────────────────────────────────────────────────

    pub async fn list_teams(&self, ctx: &TenantContext) -> Result<Vec<Team>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.teams.list_all(ctx.tenant_id()).await?)
    }

    pub async fn get_team(&self, ctx: &TenantContext, id: &TeamId) -> Result<Option<Team>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.teams.get_by_id(ctx.tenant_id(), id).await?)
    }

    pub async fn create_team(&self, ctx: &TenantContext, input: &NewTeam) -> Result<TeamId, ServiceError> {
        require_edit(ctx)?;
        if let Some(manager_id) = &input.manager_id {
            self.ensure_employee(ctx.tenant_id(), manager_id).await?;
        }
        Ok(self.repos.teams.create(ctx.tenant_id(), input).await?)
    }

    /// Clearing the manager (`Some(None)`) needs no check.
    pub async fn update_team(&self, ctx: &TenantContext, id: &TeamId, patch: &TeamPatch) -> Result<(), ServiceError> {
        require_edit(ctx)?;
        if let Some(Some(manager_id)) = &patch.manager_id {
            self.ensure_employee(ctx.tenant_id(), manager_id).await?;
        }
        Ok(self.repos.teams.update(ctx.tenant_id(), id, patch).await?)
    }

    /// Delete a team that no employee references.
    ///
    /// The check and the delete are two separate store calls; an employee
    /// assigned in between is not detected.
    pub async fn delete_team(&self, ctx: &TenantContext, id: &TeamId) -> Result<(), ServiceError> {
        require_edit(ctx)?;
        let tenant_id = ctx.tenant_id();

        let team = self
            .repos
            .teams
            .get_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                kind: EntityKind::Team,
                id: id.to_string(),
            })?;

        let members = self.repos.employees.list_by_team(tenant_id, id).await?;
        if !can_delete_team(&team, &members) {
            tracing::info!(
                "refusing to delete team {} in tenant {}: {} employees assigned",
                id,
                tenant_id,
                members.len()
            );
            return Err(ServiceError::TeamInUse {
                team_id: id.clone(),
                employees: members.into_iter().map(|e| e.id).collect(),
            });
        }

        Ok(self.repos.teams.delete(tenant_id, id).await?)
    }

    pub fn subscribe_teams(&self, ctx: &TenantContext) -> Result<Subscription<Team>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.teams.subscribe(ctx.tenant_id()))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Records
    // ─────────────────────────────────────────────────────────────────────

    pub async fn list_records(&self, ctx: &TenantContext) -> Result<Vec<Record>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.records.list_all(ctx.tenant_id()).await?)
    }

    pub async fn get_record(&self, ctx: &TenantContext, id: &RecordId) -> Result<Option<Record>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.records.get_by_id(ctx.tenant_id(), id).await?)
    }

    pub async fn records_for_employee(
        &self,
        ctx: &TenantContext,
        employee_id: &EmployeeId,
        range: &DateRange,
    ) -> Result<Vec<Record>, ServiceError> {
        require_view(ctx)?;
        Ok(self
            .repos
            .records
            .list_records_by_employee_and_date_range(ctx.tenant_id(), employee_id, range.start(), range.end())
            .await?)
    }

    /// The employee's record on the UTC day containing `date`.
    pub async fn record_on(
        &self,
        ctx: &TenantContext,
        employee_id: &EmployeeId,
        date: DateTime<Utc>,
    ) -> Result<Option<Record>, ServiceError> {
        require_view(ctx)?;
        Ok(self
            .repos
            .records
            .list_record_by_employee_and_date(ctx.tenant_id(), employee_id, date)
            .await?)
    }

    /// Records of every employee between `start` and `end`, inclusive.
    pub async fn records_between(
        &self,
        ctx: &TenantContext,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Record>, ServiceError> {
        require_view(ctx)?;
        let range = DateRange::new(start, end)?;
        Ok(self
            .repos
            .records
            .list_records_by_date_range(ctx.tenant_id(), range.start(), range.end())
            .await?)
    }

    pub async fn create_record(&self, ctx: &TenantContext, input: &NewRecord) -> Result<RecordId, ServiceError> {
        require_edit(ctx)?;
        Ok(self.repos.records.create(ctx.tenant_id(), input).await?)
    }

    pub async fn update_record(&self, ctx: &TenantContext, id: &RecordId, patch: &RecordPatch) -> Result<(), ServiceError> {
        require_edit(ctx)?;
        Ok(self.repos.records.update(ctx.tenant_id(), id, patch).await?)
    }

    pub async fn delete_record(&self, ctx: &TenantContext, id: &RecordId) -> Result<(), ServiceError> {
        require_edit(ctx)?;
        Ok(self.repos.records.delete(ctx.tenant_id(), id).await?)
    }

    pub fn subscribe_records(&self, ctx: &TenantContext) -> Result<Subscription<Record>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.records.subscribe(ctx.tenant_id()))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────────

    pub async fn list_views(&self, ctx: &TenantContext) -> Result<Vec<View>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.views.list_all(ctx.tenant_id()).await?)
    }

    pub async fn get_view(&self, ctx: &TenantContext, id: &ViewId) -> Result<Option<View>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.views.get_by_id(ctx.tenant_id(), id).await?)
    }

    pub async fn views_owned_by(&self, ctx: &TenantContext, owner_id: &EmployeeId) -> Result<Vec<View>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.views.list_views_by_owner(ctx.tenant_id(), owner_id).await?)
    }

    pub async fn views_shared_with(&self, ctx: &TenantContext, employee_id: &EmployeeId) -> Result<Vec<View>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.views.list_views_shared_with(ctx.tenant_id(), employee_id).await?)
    }

    /// Views the employee owns plus views shared with them, each once, by id.
    pub async fn visible_views(&self, ctx: &TenantContext, employee_id: &EmployeeId) -> Result<Vec<View>, ServiceError> {
        require_view(ctx)?;
        let tenant_id = ctx.tenant_id();
        let owned = self.repos.views.list_views_by_owner(tenant_id, employee_id).await?;
        let shared = self.repos.views.list_views_shared_with(tenant_id, employee_id).await?;

        let mut by_id: BTreeMap<ViewId, View> = BTreeMap::new();
        for view in owned.into_iter().chain(shared) {
            by_id.entry(view.id.clone()).or_insert(view);
        }
        Ok(by_id.into_values().collect())
    }

    pub async fn create_view(&self, ctx: &TenantContext, input: &NewView) -> Result<ViewId, ServiceError> {
        require_edit(ctx)?;
        Ok(self.repos.views.create(ctx.tenant_id(), input).await?)
    }

    pub async fn update_view(&self, ctx: &TenantContext, id: &ViewId, patch: &ViewPatch) -> Result<(), ServiceError> {
        require_edit(ctx)?;
        Ok(self.repos.views.update(ctx.tenant_id(), id, patch).await?)
    }

    pub async fn delete_view(&self, ctx: &TenantContext, id: &ViewId) -> Result<(), ServiceError> {
        require_edit(ctx)?;
        Ok(self.repos.views.delete(ctx.tenant_id(), id).await?)
    }

    pub fn subscribe_views(&self, ctx: &TenantContext) -> Result<Subscription<View>, ServiceError> {
        require_view(ctx)?;
        Ok(self.repos.views.subscribe(ctx.tenant_id()))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Admin
    // ─────────────────────────────────────────────────────────────────────

    /// Delete every employee, then every team, in the caller's tenant.
    ///
    /// Records and views are left in place. Stops at the first store failure;
    /// whatever was deleted before it stays deleted.
    pub async fn clear_tenant_data(&self, ctx: &TenantContext) -> Result<ClearReport, ServiceError> {
        require_edit(ctx)?;
        let tenant_id = ctx.tenant_id();
        let mut report = ClearReport::default();

        for employee in self.repos.employees.list_all(tenant_id).await? {
            self.repos.employees.delete(tenant_id, &employee.id).await?;
            report.employees_deleted += 1;
        }
        for team in self.repos.teams.list_all(tenant_id).await? {
            self.repos.teams.delete(tenant_id, &team.id).await?;
            report.teams_deleted += 1;
        }

        tracing::info!(
            "cleared tenant {}: {} employees, {} teams",
            tenant_id,
            report.employees_deleted,
            report.teams_deleted
        );
        Ok(report)
    }

    /// Load the demo teams and employees into the caller's tenant.
    ///
    /// Teams are created first, then their members, then each team gets its
    /// first editor as manager. Existing data is kept; running it twice
    /// creates a second copy. Stops at the first failure.
    pub async fn seed_demo_data(&self, ctx: &TenantContext) -> Result<SeedReport, ServiceError> {
        require_edit(ctx)?;
        let tenant_id = ctx.tenant_id();
        let mut report = SeedReport::default();

        let mut team_ids = Vec::with_capacity(DEMO_TEAMS.len());
        for team in DEMO_TEAMS {
            let input = NewTeam {
                full_name: RequiredText::parse("fullName", team.full_name)?,
                display_name: TeamDisplayName::parse(team.display_name)?,
                color: HexColor::parse(team.color)?,
                manager_id: None,
            };
            team_ids.push(self.repos.teams.create(tenant_id, &input).await?);
            report.teams_created += 1;
        }

        let mut managers = Vec::new();
        for (team, team_id) in DEMO_TEAMS.iter().zip(&team_ids) {
            let mut manager = None;
            for member in team.members {
                let input = NewEmployee {
                    full_name: RequiredText::parse("fullName", member.full_name)?,
                    display_name: EmployeeDisplayName::parse(member.display_name)?,
                    team_id: team_id.clone(),
                    can_edit: member.can_edit,
                    email: Some(EmailAddress::parse(member.email)?),
                    user_id: None,
                };
                let employee_id = self.repos.employees.create(tenant_id, &input).await?;
                report.employees_created += 1;
                if member.can_edit && manager.is_none() {
                    manager = Some(employee_id);
                }
            }
            if let Some(manager) = manager {
                managers.push((team_id, manager));
            }
        }

        for (team_id, manager_id) in managers {
            let patch = TeamPatch {
                manager_id: Some(Some(manager_id)),
                ..TeamPatch::default()
            };
            self.repos.teams.update(tenant_id, team_id, &patch).await?;
            report.managers_assigned += 1;
        }

        tracing::info!(
            "seeded tenant {}: {} teams, {} employees, {} managers",
            tenant_id,
            report.teams_created,
            report.employees_created,
            report.managers_assigned
        );
        Ok(report)
    }

    pub async fn tenant_stats(&self, ctx: &TenantContext) -> Result<TenantStats, ServiceError> {
        require_view(ctx)?;
        let tenant_id = ctx.tenant_id();
        Ok(TenantStats {
            teams: self.repos.teams.list_all(tenant_id).await?.len(),
            employees: self.repos.employees.list_all(tenant_id).await?.len(),
        })
    }

    async fn ensure_team(&self, tenant_id: &TenantId, id: &TeamId) -> Result<(), ServiceError> {
        match self.repos.teams.get_by_id(tenant_id, id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound {
                kind: EntityKind::Team,
                id: id.to_string(),
            }),
        }
    }

    async fn ensure_employee(&self, tenant_id: &TenantId, id: &EmployeeId) -> Result<(), ServiceError> {
        match self.repos.employees.get_by_id(tenant_id, id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound {
                kind: EntityKind::Employee,
                id: id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use planboard_auth::{AuthzError, Identity};
    use planboard_core::{ManualClock, SubjectId, TenantId};
    use planboard_infra::{InMemoryDocumentStore, StoreError, TenantPolicy};
    use planboard_planning::{
        EmployeeDisplayName, HexColor, NewTenant, RequiredText, TeamDisplayName,
    };

    use crate::errors::UserOutcome;

    fn identity(tenant: &str, can_edit: bool) -> Identity {
        Identity {
            subject_id: SubjectId::new("uid-1").unwrap(),
            email: "ana@demo.com".to_string(),
            display_name: "Ana".to_string(),
            tenant_id: Some(TenantId::new(tenant).unwrap()),
            can_edit,
        }
    }

    async fn setup() -> (Arc<InMemoryDocumentStore>, PlanningService<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 10, 13, 8, 0, 0).unwrap(),
        ));
        let service = PlanningService::new(Arc::clone(&store), PathScheme::default(), clock);
        let demo = TenantId::new("demo").unwrap();
        let tenant = NewTenant {
            name: RequiredText::parse("name", "Demo").unwrap(),
            owner_id: None,
        };
        service.repositories().tenants.create(&demo, &tenant).await.unwrap();
        (store, service)
    }

    async fn ctx(service: &PlanningService<InMemoryDocumentStore>, can_edit: bool) -> TenantContext {
        TenantContext::for_identity(
            identity("demo", can_edit),
            &service.repositories().tenants,
            TenantPolicy::RequireExisting,
        )
        .await
        .unwrap()
    }

    fn team(name: &str) -> NewTeam {
        NewTeam {
            full_name: RequiredText::parse("fullName", format!("{name} Team")).unwrap(),
            display_name: TeamDisplayName::parse(name).unwrap(),
            color: HexColor::parse("#16A34A").unwrap(),
            manager_id: None,
        }
    }

    fn employee(name: &str, team_id: &TeamId) -> NewEmployee {
        NewEmployee {
            full_name: RequiredText::parse("fullName", name).unwrap(),
            display_name: EmployeeDisplayName::parse(name).unwrap(),
            team_id: team_id.clone(),
            can_edit: false,
            email: None,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn read_only_identity_can_read_but_not_write() {
        let (_, service) = setup().await;
        let reader = ctx(&service, false).await;

        assert!(service.list_teams(&reader).await.unwrap().is_empty());
        let err = service.create_team(&reader, &team("SALES")).await.unwrap_err();
        assert_eq!(err, ServiceError::Forbidden(AuthzError::ReadOnly));
        assert_eq!(err.user_outcome(), UserOutcome::Rejected);

        // Nothing reached the store.
        let writer = ctx(&service, true).await;
        assert!(service.list_teams(&writer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_missing_team_is_not_found() {
        let (_, service) = setup().await;
        let writer = ctx(&service, true).await;

        let err = service
            .delete_team(&writer, &TeamId::new("ghost").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: EntityKind::Team, .. }));
    }

    #[tokio::test]
    async fn clear_tenant_data_removes_employees_then_teams() {
        let (_, service) = setup().await;
        let writer = ctx(&service, true).await;

        let sales = service.create_team(&writer, &team("SALES")).await.unwrap();
        let ops = service.create_team(&writer, &team("OPS")).await.unwrap();
        service.create_employee(&writer, &employee("Ana", &sales)).await.unwrap();
        service.create_employee(&writer, &employee("Luis", &ops)).await.unwrap();

        let report = service.clear_tenant_data(&writer).await.unwrap();
        assert_eq!(
            report,
            ClearReport {
                employees_deleted: 2,
                teams_deleted: 2,
            }
        );
        assert!(service.list_employees(&writer).await.unwrap().is_empty());
        assert!(service.list_teams(&writer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn employees_must_reference_an_existing_team() {
        let (_, service) = setup().await;
        let writer = ctx(&service, true).await;
        let ghost = TeamId::new("no-such-team").unwrap();

        let err = service.create_employee(&writer, &employee("Ana", &ghost)).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::NotFound {
                kind: EntityKind::Team,
                id: "no-such-team".to_string(),
            }
        );
        assert_eq!(err.user_outcome(), UserOutcome::Rejected);
        assert!(service.list_employees(&writer).await.unwrap().is_empty());

        let sales = service.create_team(&writer, &team("SALES")).await.unwrap();
        let ana = service.create_employee(&writer, &employee("Ana", &sales)).await.unwrap();
        let moved = EmployeePatch {
            team_id: Some(ghost),
            ..EmployeePatch::default()
        };
        let err = service.update_employee(&writer, &ana, &moved).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: EntityKind::Team, .. }));
        let stored = service.get_employee(&writer, &ana).await.unwrap().unwrap();
        assert_eq!(stored.team_id, sales);
    }

    #[tokio::test]
    async fn team_managers_must_be_existing_employees() {
        let (_, service) = setup().await;
        let writer = ctx(&service, true).await;
        let ghost = EmployeeId::new("no-such-employee").unwrap();

        let err = service
            .create_team(
                &writer,
                &NewTeam {
                    manager_id: Some(ghost.clone()),
                    ..team("SALES")
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: EntityKind::Employee, .. }));
        assert!(service.list_teams(&writer).await.unwrap().is_empty());

        let sales = service.create_team(&writer, &team("SALES")).await.unwrap();
        let ana = service.create_employee(&writer, &employee("Ana", &sales)).await.unwrap();
        let dangling = TeamPatch {
            manager_id: Some(Some(ghost)),
            ..TeamPatch::default()
        };
        assert!(service.update_team(&writer, &sales, &dangling).await.is_err());

        let assign = TeamPatch {
            manager_id: Some(Some(ana.clone())),
            ..TeamPatch::default()
        };
        service.update_team(&writer, &sales, &assign).await.unwrap();
        let clear = TeamPatch {
            manager_id: Some(None),
            ..TeamPatch::default()
        };
        service.update_team(&writer, &sales, &clear).await.unwrap();
        assert_eq!(service.get_team(&writer, &sales).await.unwrap().unwrap().manager_id, None);
    }

    #[tokio::test]
    async fn demo_data_loads_teams_members_and_managers() {
        let (_, service) = setup().await;
        let writer = ctx(&service, true).await;

        let report = service.seed_demo_data(&writer).await.unwrap();
        assert_eq!(
            report,
            SeedReport {
                teams_created: 5,
                employees_created: 15,
                managers_assigned: 5,
            }
        );
        assert_eq!(
            service.tenant_stats(&writer).await.unwrap(),
            TenantStats {
                teams: 5,
                employees: 15,
            }
        );

        let teams = service.list_teams(&writer).await.unwrap();
        let tech = teams.iter().find(|t| t.display_name == "TEC-BCN").unwrap();
        let manager = service
            .get_employee(&writer, tech.manager_id.as_ref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(manager.full_name, "Carlos García");
        assert_eq!(manager.team_id, tech.id);
        assert!(manager.can_edit);

        // Seeded teams are real references: they cannot be deleted while staffed.
        assert!(matches!(
            service.delete_team(&writer, &tech.id).await,
            Err(ServiceError::TeamInUse { .. })
        ));
    }

    #[tokio::test]
    async fn seeding_needs_edit_rights_but_stats_do_not() {
        let (_, service) = setup().await;
        let reader = ctx(&service, false).await;

        let err = service.seed_demo_data(&reader).await.unwrap_err();
        assert_eq!(err, ServiceError::Forbidden(AuthzError::ReadOnly));
        assert_eq!(service.tenant_stats(&reader).await.unwrap(), TenantStats::default());
    }

    #[tokio::test]
    async fn store_failures_abort() {
        let (store, service) = setup().await;
        let writer = ctx(&service, true).await;
        store.set_failure(Some(StoreError::Unavailable("offline".to_string())));

        let err = service.list_employees(&writer).await.unwrap_err();
        assert!(matches!(err, ServiceError::Repository(_)));
        assert_eq!(err.user_outcome(), UserOutcome::Aborted);
    }

    #[tokio::test]
    async fn inverted_range_is_a_validation_error() {
        let (_, service) = setup().await;
        let reader = ctx(&service, false).await;
        let start = Utc.with_ymd_and_hms(2025, 10, 14, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 10, 13, 0, 0, 0).unwrap();

        let err = service.records_between(&reader, start, end).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
