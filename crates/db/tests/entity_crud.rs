use std::time::Duration;

use chrono::NaiveDate;
use smoothie_core::project_filter::ProjectFilter;
use smoothie_core::project_wizard::SessionStore;
use smoothie_db::models::company::CreateCompany;
use smoothie_db::models::employee::{CreateEmployee, EmployeeFilter};
use smoothie_db::models::project::NewProject;
use smoothie_db::models::project_document::CreateProjectDocument;
use smoothie_db::repositories::{CompanyRepo, EmployeeRepo, ProjectDocumentRepo, ProjectRepo};
use smoothie_db::session_store::PgSessionStore;
use sqlx::PgPool;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_project(name: &str, priority: i32, start: NaiveDate, end: NaiveDate) -> NewProject {
    NewProject {
        name: name.to_string(),
        start_date: start,
        end_date: end,
        priority,
        customer_company_id: 101,
        executor_company_id: 102,
        head_id: 101,
        employee_ids: vec![101, 102],
    }
}

async fn insert_project(pool: &PgPool, input: &NewProject) -> i64 {
    let mut tx = pool.begin().await.unwrap();
    let project = ProjectRepo::create(&mut *tx, input).await.unwrap();
    ProjectRepo::add_employees(&mut *tx, project.id, &input.employee_ids)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    project.id
}

// ---------------------------------------------------------------------------
// Reference entities
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_company_create_and_list(pool: PgPool) {
    let company = CompanyRepo::create(
        &pool,
        &CreateCompany {
            name: "  Acme  ".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(company.name, "Acme");

    let found = CompanyRepo::find_by_id(&pool, company.id).await.unwrap();
    assert_eq!(found.map(|c| c.name), Some("Acme".to_string()));

    let all = CompanyRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].name, "Acme");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_employee_blank_second_name_is_null(pool: PgPool) {
    let employee = EmployeeRepo::create(
        &pool,
        &CreateEmployee {
            first_name: "Ada".into(),
            second_name: Some(String::new()),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(employee.second_name, None);
    assert_eq!(employee.full_name(), "Ada Lovelace");
    assert_eq!(EmployeeRepo::list(&pool, &EmployeeFilter::default()).await.unwrap().len(), 8);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_employee_pattern_search(pool: PgPool) {
    let search = |pattern: &str| EmployeeFilter {
        pattern: Some(pattern.to_string()),
    };

    let bobs = EmployeeRepo::list(&pool, &search("bob BOB")).await.unwrap();
    assert_eq!(bobs.iter().map(|e| e.id).collect::<Vec<_>>(), vec![101]);

    let ho = EmployeeRepo::list(&pool, &search("Ho")).await.unwrap();
    assert_eq!(
        ho.iter().map(|e| e.last_name.as_str()).collect::<Vec<_>>(),
        vec!["Hoking", "House"]
    );

    assert!(EmployeeRepo::list(&pool, &search("nobody")).await.unwrap().is_empty());
    assert_eq!(EmployeeRepo::list(&pool, &search("  ")).await.unwrap().len(), 7);
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_with_team_and_documents(pool: PgPool) {
    let input = new_project("Alpha", 5, date(2025, 1, 1), date(2025, 6, 1));
    let id = insert_project(&pool, &input).await;

    let mut tx = pool.begin().await.unwrap();
    ProjectDocumentRepo::create(
        &mut *tx,
        &CreateProjectDocument {
            project_id: id,
            file_name: "plan.pdf".into(),
            file_path: format!("uploads/projects/{id}/x_plan.pdf"),
            file_size: 3,
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(
        ProjectRepo::list_employee_ids(&pool, id).await.unwrap(),
        vec![101, 102]
    );
    assert_eq!(ProjectDocumentRepo::count_by_project(&pool, id).await.unwrap(), 1);

    assert!(ProjectRepo::delete(&pool, id).await.unwrap());
    assert!(ProjectRepo::find_by_id(&pool, id).await.unwrap().is_none());
    assert_eq!(ProjectDocumentRepo::count_by_project(&pool, id).await.unwrap(), 0);
    assert!(!ProjectRepo::delete(&pool, id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_team_member_is_fk_violation(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let input = new_project("Alpha", 5, date(2025, 1, 1), date(2025, 6, 1));
    let project = ProjectRepo::create(&mut *tx, &input).await.unwrap();
    let err = ProjectRepo::add_employees(&mut *tx, project.id, &[101, 999_999])
        .await
        .unwrap_err();
    assert!(smoothie_db::is_foreign_key_violation(&err));
    assert!(!smoothie_db::is_transient_error(&err));
    drop(tx);

    assert_eq!(ProjectRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_sorts(pool: PgPool) {
    insert_project(&pool, &new_project("Bravo", 3, date(2025, 2, 1), date(2025, 3, 1))).await;
    insert_project(&pool, &new_project("Alpha", 8, date(2025, 1, 1), date(2025, 9, 1))).await;
    insert_project(&pool, &new_project("Charlie", 3, date(2025, 5, 1), date(2025, 6, 1))).await;

    let names = |projects: Vec<smoothie_db::models::project::Project>| {
        projects.into_iter().map(|p| p.name).collect::<Vec<_>>()
    };

    let default = ProjectRepo::list(&pool, &ProjectFilter::default()).await.unwrap();
    assert_eq!(names(default), vec!["Alpha", "Bravo", "Charlie"]);

    let by_priority = ProjectFilter {
        sort_order: Some("priority_desc".into()),
        ..ProjectFilter::default()
    };
    let sorted = ProjectRepo::list(&pool, &by_priority).await.unwrap();
    assert_eq!(sorted[0].name, "Alpha");

    let priority_three = ProjectFilter {
        priority: Some(3),
        sort_order: Some("start_date_desc".into()),
        ..ProjectFilter::default()
    };
    assert_eq!(
        names(ProjectRepo::list(&pool, &priority_three).await.unwrap()),
        vec!["Charlie", "Bravo"]
    );

    let started_by_feb = ProjectFilter {
        start_date_to: Some(date(2025, 2, 1)),
        ..ProjectFilter::default()
    };
    assert_eq!(
        names(ProjectRepo::list(&pool, &started_by_feb).await.unwrap()),
        vec!["Alpha", "Bravo"]
    );
}

// ---------------------------------------------------------------------------
// Session store
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pg_session_store_upserts_and_removes(pool: PgPool) {
    let store = PgSessionStore::new(pool.clone(), Duration::from_secs(1800));

    assert_eq!(store.get("s1", "k").await.unwrap(), None);
    store.put("s1", "k", "one".into()).await.unwrap();
    store.put("s1", "k", "two".into()).await.unwrap();
    assert_eq!(store.get("s1", "k").await.unwrap().as_deref(), Some("two"));
    assert_eq!(store.get("s2", "k").await.unwrap(), None);

    store.remove("s1", "k").await.unwrap();
    assert_eq!(store.get("s1", "k").await.unwrap(), None);
    store.remove("s1", "k").await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pg_session_store_expires_idle_slots(pool: PgPool) {
    let store = PgSessionStore::new(pool.clone(), Duration::from_secs(60));
    store.put("s1", "k", "value".into()).await.unwrap();

    sqlx::query("UPDATE wizard_sessions SET updated_at = NOW() - INTERVAL '2 minutes'")
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(store.get("s1", "k").await.unwrap(), None);
    assert_eq!(store.purge_stale().await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pg_session_store_read_refreshes_slot(pool: PgPool) {
    let store = PgSessionStore::new(pool.clone(), Duration::from_secs(30 * 60));
    store.put("s1", "k", "value".into()).await.unwrap();

    sqlx::query("UPDATE wizard_sessions SET updated_at = NOW() - INTERVAL '20 minutes'")
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(store.get("s1", "k").await.unwrap().as_deref(), Some("value"));

    // The read restarted the idle clock: another 20 minutes is still fresh.
    sqlx::query("UPDATE wizard_sessions SET updated_at = updated_at - INTERVAL '20 minutes'")
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(store.get("s1", "k").await.unwrap().as_deref(), Some("value"));
    assert_eq!(store.purge_stale().await.unwrap(), 0);
}
