//! Tests for the maintenance planning service and the overdue sweep.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    FixtureNotificationDispatch, MockEquipmentRepository, MockMaintenanceScheduleRepository,
    MockNotificationDispatch,
};
use crate::domain::{DepartmentId, Equipment, ErrorCode, MaintenanceStanding, Role, UserId};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_time(),
    })
}

fn actor_with_role(role: Role) -> Actor {
    Actor {
        user_id: UserId::random(),
        role,
        department_id: Some(DepartmentId::random()),
    }
}

fn draft_for(equipment_id: EquipmentId) -> ScheduleDraft {
    ScheduleDraft {
        equipment_id,
        maintenance_type: "calibration".to_owned(),
        frequency_days: 30,
        first_due: fixture_time() + TimeDelta::days(30),
        assignee_id: Some(UserId::random()),
    }
}

fn overdue_schedule(due: DateTime<Utc>) -> MaintenanceSchedule {
    MaintenanceSchedule::new(
        ScheduleId::random(),
        EquipmentId::random(),
        "preventive maintenance".to_owned(),
        30,
        due,
        Some(UserId::random()),
    )
}

fn make_service(
    schedule_repo: MockMaintenanceScheduleRepository,
    equipment_repo: MockEquipmentRepository,
    dispatcher: Arc<dyn NotificationDispatch>,
) -> MaintenancePlanningService<MockMaintenanceScheduleRepository, MockEquipmentRepository> {
    MaintenancePlanningService::new(
        Arc::new(schedule_repo),
        Arc::new(equipment_repo),
        dispatcher,
        fixture_clock(),
    )
}

#[rstest]
#[case(Role::Support)]
#[case(Role::DepartmentLiaison)]
#[case(Role::DepartmentHead)]
#[tokio::test]
async fn creating_schedules_requires_the_maintenance_capability(#[case] role: Role) {
    let service = make_service(
        MockMaintenanceScheduleRepository::new(),
        MockEquipmentRepository::new(),
        Arc::new(FixtureNotificationDispatch),
    );

    let error = service
        .create_schedule(draft_for(EquipmentId::random()), actor_with_role(role))
        .await
        .expect_err("role lacks the creation capability");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn creation_rejects_a_zero_frequency() {
    let service = make_service(
        MockMaintenanceScheduleRepository::new(),
        MockEquipmentRepository::new(),
        Arc::new(FixtureNotificationDispatch),
    );

    let mut draft = draft_for(EquipmentId::random());
    draft.frequency_days = 0;
    let error = service
        .create_schedule(draft, actor_with_role(Role::Manager))
        .await
        .expect_err("zero frequency never recurs");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn creation_rejects_unknown_equipment() {
    let mut equipment_repo = MockEquipmentRepository::new();
    equipment_repo.expect_find_by_id().return_once(|_| Ok(None));

    let service = make_service(
        MockMaintenanceScheduleRepository::new(),
        equipment_repo,
        Arc::new(FixtureNotificationDispatch),
    );

    let error = service
        .create_schedule(
            draft_for(EquipmentId::random()),
            actor_with_role(Role::Manager),
        )
        .await
        .expect_err("unknown equipment");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn creation_rejects_equipment_without_a_department() {
    let orphaned = Equipment::new(EquipmentId::random(), None);
    let orphaned_id = orphaned.id;
    let mut equipment_repo = MockEquipmentRepository::new();
    equipment_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(orphaned)));

    let service = make_service(
        MockMaintenanceScheduleRepository::new(),
        equipment_repo,
        Arc::new(FixtureNotificationDispatch),
    );

    let error = service
        .create_schedule(draft_for(orphaned_id), actor_with_role(Role::Manager))
        .await
        .expect_err("equipment has no department");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn creation_stores_an_active_schedule_with_the_draft_fields() {
    let equipment = Equipment::new(EquipmentId::random(), Some(DepartmentId::random()));
    let draft = draft_for(equipment.id);
    let assignee_id = draft.assignee_id;
    let first_due = draft.first_due;

    let mut equipment_repo = MockEquipmentRepository::new();
    equipment_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(equipment)));

    let mut schedule_repo = MockMaintenanceScheduleRepository::new();
    schedule_repo
        .expect_insert()
        .withf(move |schedule| {
            schedule.is_active
                && schedule.maintenance_type == "calibration"
                && schedule.frequency_days == 30
                && schedule.next_maintenance_date == first_due
                && schedule.last_maintenance_date.is_none()
                && schedule.assignee_id == assignee_id
                && schedule.overdue_notified_for.is_none()
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(
        schedule_repo,
        equipment_repo,
        Arc::new(FixtureNotificationDispatch),
    );

    let schedule = service
        .create_schedule(draft, actor_with_role(Role::Manager))
        .await
        .expect("creation succeeds");
    assert!(schedule.is_active);
}

#[tokio::test]
async fn completion_requires_the_maintenance_capability() {
    let service = make_service(
        MockMaintenanceScheduleRepository::new(),
        MockEquipmentRepository::new(),
        Arc::new(FixtureNotificationDispatch),
    );

    let error = service
        .complete(ScheduleId::random(), actor_with_role(Role::Support))
        .await
        .expect_err("support lacks the completion capability");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn completing_a_missing_schedule_is_not_found() {
    let mut schedule_repo = MockMaintenanceScheduleRepository::new();
    schedule_repo.expect_find_by_id().return_once(|_| Ok(None));

    let service = make_service(
        schedule_repo,
        MockEquipmentRepository::new(),
        Arc::new(FixtureNotificationDispatch),
    );

    let error = service
        .complete(ScheduleId::random(), actor_with_role(Role::Manager))
        .await
        .expect_err("unknown schedule");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn completion_rolls_the_due_date_and_announces_it_with_the_department() {
    let now = fixture_time();
    let department_id = DepartmentId::random();
    let equipment = Equipment::new(EquipmentId::random(), Some(department_id));
    let mut schedule = overdue_schedule(now - TimeDelta::days(1));
    schedule.equipment_id = equipment.id;
    schedule.overdue_notified_for = Some(schedule.next_maintenance_date);
    let schedule_id = schedule.id;

    let mut schedule_repo = MockMaintenanceScheduleRepository::new();
    schedule_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(schedule)));
    schedule_repo
        .expect_update()
        .withf(move |schedule| {
            schedule.last_maintenance_date == Some(now)
                && schedule.next_maintenance_date == now + TimeDelta::days(30)
                && schedule.overdue_notified_for.is_none()
        })
        .times(1)
        .return_once(|_| Ok(()));

    let mut equipment_repo = MockEquipmentRepository::new();
    equipment_repo
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(equipment)));

    let mut dispatcher = MockNotificationDispatch::new();
    dispatcher
        .expect_dispatch()
        .withf(move |event| {
            matches!(
                event,
                DomainEvent::MaintenanceCompleted {
                    department_id: Some(id),
                    ..
                } if *id == department_id
            )
        })
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let service = make_service(schedule_repo, equipment_repo, Arc::new(dispatcher));

    let completed = service
        .complete(schedule_id, actor_with_role(Role::Manager))
        .await
        .expect("completion succeeds");
    assert_eq!(completed.classify(now), MaintenanceStanding::Scheduled);
}

#[tokio::test]
async fn stats_assemble_the_dashboard_counts() {
    let now = fixture_time();

    let mut schedule_repo = MockMaintenanceScheduleRepository::new();
    schedule_repo.expect_count_active().return_once(|| Ok(12));
    schedule_repo
        .expect_count_active_due_before()
        .withf(move |cutoff| *cutoff == now)
        .return_once(|_| Ok(3));
    schedule_repo
        .expect_count_active_due_between()
        .withf(move |from, to| *from == now && *to == now + TimeDelta::days(7))
        .times(1)
        .return_once(|_, _| Ok(2));
    schedule_repo
        .expect_count_active_due_between()
        .withf(move |from, to| *from == now && *to == now + TimeDelta::days(30))
        .times(1)
        .return_once(|_, _| Ok(5));

    let service = make_service(
        schedule_repo,
        MockEquipmentRepository::new(),
        Arc::new(FixtureNotificationDispatch),
    );

    let stats = service.stats(now).await.expect("stats succeed");
    assert_eq!(
        stats,
        MaintenanceStats {
            total_active: 12,
            overdue: 3,
            due_within_7_days: 2,
            due_within_30_days: 5,
        }
    );
}

#[tokio::test]
async fn the_sweep_claims_each_episode_before_notifying() {
    let now = fixture_time();
    let schedule = overdue_schedule(now - TimeDelta::days(1));
    let schedule_id = schedule.id;
    let due_date = schedule.next_maintenance_date;

    let mut schedule_repo = MockMaintenanceScheduleRepository::new();
    let listed = schedule.clone();
    schedule_repo
        .expect_list_active_due_before()
        .return_once(move |_| Ok(vec![listed]));
    schedule_repo
        .expect_claim_overdue_notification()
        .withf(move |id, due| *id == schedule_id && *due == due_date)
        .times(1)
        .return_once(|_, _| Ok(true));

    let mut equipment_repo = MockEquipmentRepository::new();
    equipment_repo.expect_find_by_id().return_once(|_| Ok(None));

    let mut dispatcher = MockNotificationDispatch::new();
    dispatcher
        .expect_dispatch()
        .withf(move |event| {
            matches!(
                event,
                DomainEvent::MaintenanceOverdue { schedule, .. }
                    if schedule.overdue_notified_for == Some(due_date)
            )
        })
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let service = make_service(schedule_repo, equipment_repo, Arc::new(dispatcher));

    let report = service.run_overdue_sweep(now).await.expect("sweep succeeds");
    assert_eq!(report.examined, 1);
    assert_eq!(report.notified, 1);
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn a_lost_claim_suppresses_the_notification() {
    let now = fixture_time();
    let schedule = overdue_schedule(now - TimeDelta::days(1));

    let mut schedule_repo = MockMaintenanceScheduleRepository::new();
    schedule_repo
        .expect_list_active_due_before()
        .return_once(move |_| Ok(vec![schedule]));
    schedule_repo
        .expect_claim_overdue_notification()
        .return_once(|_, _| Ok(false));

    let mut dispatcher = MockNotificationDispatch::new();
    dispatcher.expect_dispatch().times(0);

    let service = make_service(
        schedule_repo,
        MockEquipmentRepository::new(),
        Arc::new(dispatcher),
    );

    let report = service.run_overdue_sweep(now).await.expect("sweep succeeds");
    assert_eq!(report.examined, 1);
    assert_eq!(report.notified, 0);
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn one_failing_schedule_does_not_abort_the_sweep() {
    let now = fixture_time();
    let failing = overdue_schedule(now - TimeDelta::days(2));
    let healthy = overdue_schedule(now - TimeDelta::days(1));
    let failing_id = failing.id;

    let mut schedule_repo = MockMaintenanceScheduleRepository::new();
    schedule_repo
        .expect_list_active_due_before()
        .return_once(move |_| Ok(vec![failing, healthy]));
    schedule_repo
        .expect_claim_overdue_notification()
        .returning(move |id, _| {
            if id == failing_id {
                Err(MaintenanceScheduleRepositoryError::query(
                    "lock timed out".to_owned(),
                ))
            } else {
                Ok(true)
            }
        });

    let mut equipment_repo = MockEquipmentRepository::new();
    equipment_repo.expect_find_by_id().returning(|_| Ok(None));

    let mut dispatcher = MockNotificationDispatch::new();
    dispatcher
        .expect_dispatch()
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let service = make_service(schedule_repo, equipment_repo, Arc::new(dispatcher));

    let report = service.run_overdue_sweep(now).await.expect("sweep succeeds");
    assert_eq!(report.examined, 2);
    assert_eq!(report.notified, 1);
    assert_eq!(report.failed, 1);
}

#[tokio::test]
async fn dispatch_failures_count_as_failed_but_keep_sweeping() {
    let now = fixture_time();
    let schedule = overdue_schedule(now - TimeDelta::days(1));

    let mut schedule_repo = MockMaintenanceScheduleRepository::new();
    schedule_repo
        .expect_list_active_due_before()
        .return_once(move |_| Ok(vec![schedule]));
    schedule_repo
        .expect_claim_overdue_notification()
        .return_once(|_, _| Ok(true));

    let mut equipment_repo = MockEquipmentRepository::new();
    equipment_repo.expect_find_by_id().return_once(|_| Ok(None));

    let mut dispatcher = MockNotificationDispatch::new();
    dispatcher
        .expect_dispatch()
        .return_once(|_| Err(Error::service_unavailable("notification store is down")));

    let service = make_service(schedule_repo, equipment_repo, Arc::new(dispatcher));

    let report = service.run_overdue_sweep(now).await.expect("sweep succeeds");
    assert_eq!(report.notified, 0);
    assert_eq!(report.failed, 1);
}
