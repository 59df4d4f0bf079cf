//! Maintenance planning domain service and the periodic overdue sweep.
//!
//! Completion and the sweep are the only emitters here; due-date
//! classification and the dashboard counts are read-only. The sweep's dedup
//! runs through the repository's watermark compare-and-set, so repeated runs
//! against the same overdue episode notify exactly once and a completion
//! racing the sweep can never produce a notification for a due date that was
//! just cleared.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::maintenance::{DUE_SOON_WINDOW_DAYS, UPCOMING_WINDOW_DAYS};
use crate::domain::ports::{
    EquipmentRepository, EquipmentRepositoryError, MaintenancePlanning, MaintenanceQuery,
    MaintenanceScheduleRepository, MaintenanceScheduleRepositoryError, NotificationDispatch,
    OverdueSweep, ScheduleDraft, SweepReport,
};
use crate::domain::{
    Actor, Capability, DepartmentId, DomainEvent, EquipmentId, Error, MaintenanceSchedule,
    MaintenanceStats, ScheduleId,
};

fn map_schedule_repo_error(error: MaintenanceScheduleRepositoryError) -> Error {
    match error {
        MaintenanceScheduleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("maintenance repository unavailable: {message}"))
        }
        MaintenanceScheduleRepositoryError::Query { message } => {
            Error::internal(format!("maintenance repository error: {message}"))
        }
    }
}

fn map_equipment_repo_error(error: EquipmentRepositoryError) -> Error {
    match error {
        EquipmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("equipment repository unavailable: {message}"))
        }
        EquipmentRepositoryError::Query { message } => {
            Error::internal(format!("equipment repository error: {message}"))
        }
        EquipmentRepositoryError::RevisionMismatch { .. } => {
            Error::conflict("equipment was modified concurrently; retry with fresh state")
        }
    }
}

/// Maintenance service implementing the [`MaintenancePlanning`],
/// [`MaintenanceQuery`], and [`OverdueSweep`] driving ports.
pub struct MaintenancePlanningService<M, E> {
    schedule_repo: Arc<M>,
    equipment_repo: Arc<E>,
    dispatcher: Arc<dyn NotificationDispatch>,
    clock: Arc<dyn Clock>,
}

impl<M, E> MaintenancePlanningService<M, E> {
    /// Create a new service over the given collaborators.
    pub fn new(
        schedule_repo: Arc<M>,
        equipment_repo: Arc<E>,
        dispatcher: Arc<dyn NotificationDispatch>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            schedule_repo,
            equipment_repo,
            dispatcher,
            clock,
        }
    }
}

impl<M, E> MaintenancePlanningService<M, E>
where
    M: MaintenanceScheduleRepository,
    E: EquipmentRepository,
{
    /// Resolve the department of a schedule's equipment for recipient
    /// fallback. Runs after the state commit, so lookup failures degrade to
    /// a missing department rather than failing the operation.
    async fn department_of(&self, equipment_id: EquipmentId) -> Option<DepartmentId> {
        match self.equipment_repo.find_by_id(equipment_id).await {
            Ok(Some(equipment)) => equipment.department_id,
            Ok(None) => {
                tracing::warn!(
                    equipment = %equipment_id,
                    "maintenance schedule references missing equipment",
                );
                None
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    equipment = %equipment_id,
                    "equipment lookup failed while resolving notification recipients",
                );
                None
            }
        }
    }

    async fn emit(&self, event: DomainEvent, schedule_id: ScheduleId) {
        if let Err(error) = self.dispatcher.dispatch(event).await {
            tracing::warn!(
                %error,
                schedule = %schedule_id,
                "notification dispatch failed after maintenance commit",
            );
        }
    }
}

#[async_trait]
impl<M, E> MaintenancePlanning for MaintenancePlanningService<M, E>
where
    M: MaintenanceScheduleRepository,
    E: EquipmentRepository,
{
    async fn create_schedule(
        &self,
        draft: ScheduleDraft,
        actor: Actor,
    ) -> Result<MaintenanceSchedule, Error> {
        if !actor.role.has(Capability::CreateMaintenance) {
            return Err(Error::forbidden(
                "creating maintenance schedules requires the maintenance capability",
            ));
        }
        if draft.frequency_days == 0 {
            return Err(Error::invalid_request(
                "maintenance frequency must be at least one day",
            ));
        }

        let equipment = self
            .equipment_repo
            .find_by_id(draft.equipment_id)
            .await
            .map_err(map_equipment_repo_error)?
            .ok_or_else(|| Error::not_found(format!("equipment {} not found", draft.equipment_id)))?;
        if equipment.department_id.is_none() {
            return Err(Error::invalid_request(
                "equipment must be assigned to a department before maintenance can be scheduled",
            ));
        }

        let schedule = MaintenanceSchedule::new(
            ScheduleId::random(),
            equipment.id,
            draft.maintenance_type,
            draft.frequency_days,
            draft.first_due,
            draft.assignee_id,
        );
        self.schedule_repo
            .insert(&schedule)
            .await
            .map_err(map_schedule_repo_error)?;
        Ok(schedule)
    }

    async fn complete(
        &self,
        schedule_id: ScheduleId,
        actor: Actor,
    ) -> Result<MaintenanceSchedule, Error> {
        if !actor.role.has(Capability::CompleteMaintenance) {
            return Err(Error::forbidden(
                "completing maintenance requires the maintenance capability",
            ));
        }

        let mut schedule = self
            .schedule_repo
            .find_by_id(schedule_id)
            .await
            .map_err(map_schedule_repo_error)?
            .ok_or_else(|| Error::not_found(format!("maintenance schedule {schedule_id} not found")))?;

        schedule.complete(self.clock.utc());
        self.schedule_repo
            .update(&schedule)
            .await
            .map_err(map_schedule_repo_error)?;

        let department_id = self.department_of(schedule.equipment_id).await;
        self.emit(
            DomainEvent::MaintenanceCompleted {
                schedule: schedule.clone(),
                department_id,
                actor,
            },
            schedule.id,
        )
        .await;
        Ok(schedule)
    }
}

#[async_trait]
impl<M, E> MaintenanceQuery for MaintenancePlanningService<M, E>
where
    M: MaintenanceScheduleRepository,
    E: EquipmentRepository,
{
    async fn stats(&self, now: DateTime<Utc>) -> Result<MaintenanceStats, Error> {
        let total_active = self
            .schedule_repo
            .count_active()
            .await
            .map_err(map_schedule_repo_error)?;
        let overdue = self
            .schedule_repo
            .count_active_due_before(now)
            .await
            .map_err(map_schedule_repo_error)?;
        let due_within_7_days = self
            .schedule_repo
            .count_active_due_between(now, now + TimeDelta::days(DUE_SOON_WINDOW_DAYS))
            .await
            .map_err(map_schedule_repo_error)?;
        let due_within_30_days = self
            .schedule_repo
            .count_active_due_between(now, now + TimeDelta::days(UPCOMING_WINDOW_DAYS))
            .await
            .map_err(map_schedule_repo_error)?;
        Ok(MaintenanceStats {
            total_active,
            overdue,
            due_within_7_days,
            due_within_30_days,
        })
    }
}

#[async_trait]
impl<M, E> OverdueSweep for MaintenancePlanningService<M, E>
where
    M: MaintenanceScheduleRepository,
    E: EquipmentRepository,
{
    async fn run_overdue_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, Error> {
        let due = self
            .schedule_repo
            .list_active_due_before(now)
            .await
            .map_err(map_schedule_repo_error)?;

        let mut report = SweepReport {
            examined: due.len(),
            ..SweepReport::default()
        };
        for mut schedule in due {
            let due_date = schedule.next_maintenance_date;
            let claimed = match self
                .schedule_repo
                .claim_overdue_notification(schedule.id, due_date)
                .await
            {
                Ok(claimed) => claimed,
                Err(error) => {
                    tracing::warn!(
                        %error,
                        schedule = %schedule.id,
                        "overdue claim failed; skipping schedule until the next sweep",
                    );
                    report.failed += 1;
                    continue;
                }
            };
            if !claimed {
                // Already notified for this episode, or a completion moved
                // the due date between the listing and the claim.
                continue;
            }

            schedule.overdue_notified_for = Some(due_date);
            let department_id = self.department_of(schedule.equipment_id).await;
            match self
                .dispatcher
                .dispatch(DomainEvent::MaintenanceOverdue {
                    schedule: schedule.clone(),
                    department_id,
                })
                .await
            {
                Ok(_) => report.notified += 1,
                Err(error) => {
                    tracing::warn!(
                        %error,
                        schedule = %schedule.id,
                        "overdue notification dispatch failed",
                    );
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
#[path = "maintenance_service_tests.rs"]
mod tests;
