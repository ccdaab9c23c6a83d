mod common;

use common::*;
use rust_enrollsys_next::models::enrollments::entities::EnrollmentStatus;
use rust_enrollsys_next::models::enrollments::requests::EnrollmentListQuery;
use rust_enrollsys_next::models::payments::entities::InstallmentStatus;

#[tokio::test]
async fn test_end_to_end_enrollment() {
    let storage = memory_storage().await;
    let student = seed_student(&storage, "alice").await;
    let course = seed_course(&storage, "Spanish A1", 300, 3).await;
    let class = seed_class(&storage, course.id, "A1-Evening", 10, 9).await;

    let request = storage
        .create_enrollment_request(student.id, course.id, Some(" beginner ".to_string()))
        .await
        .unwrap();
    assert_eq!(request.status, EnrollmentStatus::Pending);
    assert_eq!(request.preferred_level.as_deref(), Some("beginner"));
    assert!(!request.registration_fee_paid);
    assert!(request.is_consistent());

    let approved = storage
        .approve_enrollment_request(request.id, class.id, Some("welcome".to_string()))
        .await
        .unwrap();
    assert_eq!(approved.status, EnrollmentStatus::Approved);
    assert_eq!(approved.assigned_class_id, Some(class.id));
    assert!(approved.approval_date.is_some());
    assert_eq!(approved.admin_notes.as_deref(), Some("welcome"));
    assert!(approved.is_consistent());

    assert_eq!(class_enrollment(&storage, class.id).await, 10);

    let assignment = storage
        .get_class_assignment(student.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assignment.class_ids, vec![class.id]);
    assert_eq!(storage.count_assigned_classes(student.id).await.unwrap(), 1);

    let installments = storage.list_installments(request.id).await.unwrap();
    let amounts: Vec<i64> = installments.iter().map(|i| i.amount).collect();
    assert_eq!(amounts, vec![100, 100, 100]);
    assert_eq!(installments[0].status, InstallmentStatus::Unpaid);
    assert_eq!(installments[1].status, InstallmentStatus::Pending);
    assert_eq!(installments[2].status, InstallmentStatus::Pending);

    let paid = storage.record_payment(request.id, None).await.unwrap();
    assert_eq!(paid.installment_no, 1);
    assert_eq!(paid.status, InstallmentStatus::Paid);
    assert!(paid.paid_date.is_some());

    let installments = storage.list_installments(request.id).await.unwrap();
    let statuses: Vec<InstallmentStatus> =
        installments.iter().map(|i| i.status.clone()).collect();
    assert_eq!(
        statuses,
        vec![
            InstallmentStatus::Paid,
            InstallmentStatus::Pending,
            InstallmentStatus::Pending
        ]
    );

    // 班级已满 10/10，再批准其他学生进入该班失败
    let late = seed_student(&storage, "alan").await;
    let late_request = storage
        .create_enrollment_request(late.id, course.id, None)
        .await
        .unwrap();
    let err = storage
        .approve_enrollment_request(late_request.id, class.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E009");
    assert_eq!(class_enrollment(&storage, class.id).await, 10);
    let late_request = storage
        .get_enrollment_request_by_id(late_request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(late_request.status, EnrollmentStatus::Pending);

    // 剩余两期依次支付，第四次付款失败
    assert_eq!(
        storage.record_payment(request.id, None).await.unwrap().installment_no,
        2
    );
    assert_eq!(
        storage.record_payment(request.id, None).await.unwrap().installment_no,
        3
    );
    let err = storage.record_payment(request.id, None).await.unwrap_err();
    assert_eq!(err.code(), "E011");

    let installments = storage.list_installments(request.id).await.unwrap();
    assert!(
        installments
            .iter()
            .all(|i| i.status == InstallmentStatus::Paid)
    );
}

#[tokio::test]
async fn test_approval_into_full_class_changes_nothing() {
    let storage = memory_storage().await;
    let student = seed_student(&storage, "bob").await;
    let course = seed_course(&storage, "French B2", 500, 2).await;
    let full = seed_class(&storage, course.id, "B2-Full", 5, 5).await;

    let request = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap();

    let err = storage
        .approve_enrollment_request(request.id, full.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E009");

    let reloaded = storage
        .get_enrollment_request_by_id(request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, EnrollmentStatus::Pending);
    assert!(reloaded.assigned_class_id.is_none());
    assert!(reloaded.approval_date.is_none());
    assert_eq!(class_enrollment(&storage, full.id).await, 5);
    assert!(storage.get_class_assignment(student.id).await.unwrap().is_none());
    assert!(storage.list_installments(request.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_approvals_claim_one_seat() {
    let storage = memory_storage().await;
    let student = seed_student(&storage, "carol").await;
    let course = seed_course(&storage, "German A2", 200, 1).await;
    let class = seed_class(&storage, course.id, "A2-Morning", 3, 0).await;

    let request = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        storage.approve_enrollment_request(request.id, class.id, None),
        storage.approve_enrollment_request(request.id, class.id, None),
    );

    let results = [first, second];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    let failure = results.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert_eq!(failure.code(), "E008");

    assert_eq!(class_enrollment(&storage, class.id).await, 1);
    assert_eq!(storage.list_installments(request.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_decided_requests_never_return_to_pending() {
    let storage = memory_storage().await;
    let student = seed_student(&storage, "dave").await;
    let course = seed_course(&storage, "Italian A1", 100, 1).await;
    let class = seed_class(&storage, course.id, "IT-1", 10, 0).await;

    let request = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap();
    let rejected = storage
        .reject_enrollment_request(request.id, Some("course closed".to_string()))
        .await
        .unwrap();
    assert_eq!(rejected.status, EnrollmentStatus::Rejected);
    assert!(rejected.is_consistent());

    let err = storage
        .approve_enrollment_request(request.id, class.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E008");

    let err = storage
        .reject_enrollment_request(request.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E008");
    assert_eq!(class_enrollment(&storage, class.id).await, 0);
}

#[tokio::test]
async fn test_create_request_validation_and_duplicates() {
    let storage = memory_storage().await;
    let student = seed_student(&storage, "erin").await;
    let course = seed_course(&storage, "Japanese N5", 900, 3).await;

    let err = storage
        .create_enrollment_request(student.id, 9999, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    let err = storage
        .create_enrollment_request(0, course.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    let err = storage
        .create_enrollment_request(student.id, course.id, Some("level<script>".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    let first = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap();
    let err = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E010");

    // 被拒绝后可以重新申请
    storage
        .reject_enrollment_request(first.id, None)
        .await
        .unwrap();
    let again = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap();
    assert_ne!(again.id, first.id);
}

#[tokio::test]
async fn test_approve_rejects_class_of_other_course() {
    let storage = memory_storage().await;
    let student = seed_student(&storage, "frank").await;
    let course = seed_course(&storage, "Korean 1", 400, 2).await;
    let other = seed_course(&storage, "Korean 2", 400, 2).await;
    let foreign_class = seed_class(&storage, other.id, "K2-A", 10, 0).await;

    let request = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap();

    let err = storage
        .approve_enrollment_request(request.id, foreign_class.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    let err = storage
        .approve_enrollment_request(request.id, 4242, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E007");

    let err = storage
        .approve_enrollment_request(4242, foreign_class.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E007");
}

#[tokio::test]
async fn test_delete_approved_request_cascades() {
    let storage = memory_storage().await;
    let admin = seed_user(
        &storage,
        "root",
        rust_enrollsys_next::models::users::entities::UserRole::Admin,
    )
    .await;
    let student = seed_student(&storage, "gina").await;
    let course = seed_course(&storage, "Portuguese", 600, 2).await;
    let class = seed_class(&storage, course.id, "PT-1", 4, 1).await;

    let request = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap();
    storage
        .approve_enrollment_request(request.id, class.id, None)
        .await
        .unwrap();
    assert_eq!(class_enrollment(&storage, class.id).await, 2);

    let receipt = storage
        .delete_enrollment_request(request.id, admin.id)
        .await
        .unwrap();
    assert_eq!(receipt.id, request.id);
    assert_eq!(receipt.deleted_by, admin.id);
    assert_eq!(receipt.released_class_id, Some(class.id));

    assert_eq!(class_enrollment(&storage, class.id).await, 1);
    assert_eq!(storage.count_assigned_classes(student.id).await.unwrap(), 0);
    assert!(
        storage
            .get_enrollment_request_by_id(request.id)
            .await
            .unwrap()
            .is_none()
    );

    // 删除后的申请对所有操作不可见
    let err = storage
        .delete_enrollment_request(request.id, admin.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E007");
    let err = storage.record_payment(request.id, None).await.unwrap_err();
    assert_eq!(err.code(), "E007");
    assert_eq!(class_enrollment(&storage, class.id).await, 1);
}

#[tokio::test]
async fn test_delete_pending_request_releases_nothing() {
    let storage = memory_storage().await;
    let student = seed_student(&storage, "hank").await;
    let course = seed_course(&storage, "Dutch", 100, 1).await;
    let class = seed_class(&storage, course.id, "NL-1", 4, 2).await;

    let request = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap();
    let receipt = storage
        .delete_enrollment_request(request.id, 1)
        .await
        .unwrap();
    assert!(receipt.released_class_id.is_none());
    assert_eq!(class_enrollment(&storage, class.id).await, 2);
}

#[tokio::test]
async fn test_registration_fee_is_idempotent() {
    let storage = memory_storage().await;
    let student = seed_student(&storage, "iris").await;
    let course = seed_course(&storage, "Greek", 100, 1).await;

    let request = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap();

    let first = storage.mark_registration_fee_paid(request.id).await.unwrap();
    assert!(first.registration_fee_paid);
    assert!(first.payment_date.is_some());

    let second = storage.mark_registration_fee_paid(request.id).await.unwrap();
    assert_eq!(second.payment_date, first.payment_date);

    storage
        .reject_enrollment_request(request.id, None)
        .await
        .unwrap();
    let err = storage
        .mark_registration_fee_paid(request.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E008");
}

#[tokio::test]
async fn test_list_and_detail() {
    let storage = memory_storage().await;
    let alice = seed_student(&storage, "jane").await;
    let bob = seed_student(&storage, "kyle").await;
    let course = seed_course(&storage, "Latin", 300, 3).await;
    let other = seed_course(&storage, "Hebrew", 300, 3).await;
    let class = seed_class(&storage, course.id, "LA-1", 10, 0).await;

    let a1 = storage
        .create_enrollment_request(alice.id, course.id, None)
        .await
        .unwrap();
    storage
        .create_enrollment_request(alice.id, other.id, None)
        .await
        .unwrap();
    storage
        .create_enrollment_request(bob.id, course.id, None)
        .await
        .unwrap();
    storage
        .approve_enrollment_request(a1.id, class.id, None)
        .await
        .unwrap();

    let all = storage
        .list_enrollment_requests_with_pagination(EnrollmentListQuery::default())
        .await
        .unwrap();
    assert_eq!(all.pagination.total, 3);

    let alices = storage
        .list_enrollment_requests_with_pagination(EnrollmentListQuery {
            student_id: Some(alice.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(alices.items.len(), 2);
    assert!(alices.items.iter().all(|r| r.student_id == alice.id));

    let approved = storage
        .list_enrollment_requests_with_pagination(EnrollmentListQuery {
            status: Some(EnrollmentStatus::Approved),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(approved.items.len(), 1);
    assert_eq!(approved.items[0].id, a1.id);

    let paged = storage
        .list_enrollment_requests_with_pagination(EnrollmentListQuery {
            page: Some(2),
            size: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(paged.items.len(), 1);
    assert_eq!(paged.pagination.total_pages, 2);

    let detail = storage
        .get_enrollment_request_detail(a1.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.student.unwrap().username, "jane");
    assert_eq!(detail.course.unwrap().title, "Latin");
    assert_eq!(detail.assigned_class.unwrap().id, class.id);
    assert_eq!(detail.installments.len(), 3);

    assert!(
        storage
            .get_enrollment_request_detail(9999)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_approvals_on_file_database() {
    let db = file_storage(8).await;
    let storage = db.storage.clone();
    let course = seed_course(&storage, "Portuguese A1", 300, 3).await;
    let class = seed_class(&storage, course.id, "PT-1", 50, 0).await;
    let class_id = class.id;

    for round in 0..10 {
        let student = seed_student(&storage, &format!("racer{round}")).await;
        let request = storage
            .create_enrollment_request(student.id, course.id, None)
            .await
            .unwrap();
        let request_id = request.id;

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage
                        .approve_enrollment_request(request_id, class_id, None)
                        .await
                })
            })
            .collect();

        let mut codes = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => codes.push("ok".to_string()),
                Err(e) => codes.push(e.code().to_string()),
            }
        }
        codes.sort();
        assert_eq!(codes, vec!["E008", "ok"], "round {round}");
        assert_eq!(storage.list_installments(request_id).await.unwrap().len(), 3);
    }

    assert_eq!(class_enrollment(&storage, class_id).await, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_last_seat_race_on_file_database() {
    let db = file_storage(8).await;
    let storage = db.storage.clone();
    let course = seed_course(&storage, "Dutch A1", 100, 1).await;
    let class_id = seed_class(&storage, course.id, "NL-1", 1, 0).await.id;

    let mut handles = Vec::new();
    for name in ["lena", "milo"] {
        let student = seed_student(&storage, name).await;
        let request = storage
            .create_enrollment_request(student.id, course.id, None)
            .await
            .unwrap();
        let request_id = request.id;
        let storage = storage.clone();
        handles.push(tokio::spawn(async move {
            storage
                .approve_enrollment_request(request_id, class_id, None)
                .await
        }));
    }

    let mut codes = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => codes.push("ok".to_string()),
            Err(e) => codes.push(e.code().to_string()),
        }
    }
    codes.sort();
    assert_eq!(codes, vec!["E009", "ok"]);
    assert_eq!(class_enrollment(&storage, class_id).await, 1);
}
