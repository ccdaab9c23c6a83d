mod common;

use common::*;
use rust_enrollsys_next::models::enrollments::entities::EnrollmentStatus;

/// 学生在两门课程中各被分配一个班级
async fn student_with_two_classes(
    storage: &std::sync::Arc<dyn rust_enrollsys_next::storage::Storage>,
) -> (i64, i64, i64, i64, i64) {
    let student = seed_student(storage, "lena").await;
    let math = seed_course(storage, "Math", 300, 3).await;
    let art = seed_course(storage, "Art", 200, 2).await;
    let class_a = seed_class(storage, math.id, "Math-A", 10, 3).await;
    let class_b = seed_class(storage, art.id, "Art-B", 8, 0).await;

    let request_a = storage
        .create_enrollment_request(student.id, math.id, None)
        .await
        .unwrap();
    let request_b = storage
        .create_enrollment_request(student.id, art.id, None)
        .await
        .unwrap();
    storage
        .approve_enrollment_request(request_a.id, class_a.id, None)
        .await
        .unwrap();
    storage
        .approve_enrollment_request(request_b.id, class_b.id, None)
        .await
        .unwrap();

    (student.id, class_a.id, class_b.id, request_a.id, request_b.id)
}

#[tokio::test]
async fn test_remove_all_classes_releases_every_seat() {
    let storage = memory_storage().await;
    let (student_id, class_a, class_b, request_a, request_b) =
        student_with_two_classes(&storage).await;

    assert_eq!(class_enrollment(&storage, class_a).await, 4);
    assert_eq!(class_enrollment(&storage, class_b).await, 1);
    assert_eq!(storage.count_assigned_classes(student_id).await.unwrap(), 2);

    let remaining = storage.remove_classes(student_id, vec![]).await.unwrap();
    assert_eq!(remaining.student_id, student_id);
    assert!(remaining.class_ids.is_empty());
    assert!(remaining.updated_at.is_some());

    assert_eq!(class_enrollment(&storage, class_a).await, 3);
    assert_eq!(class_enrollment(&storage, class_b).await, 0);
    assert_eq!(storage.count_assigned_classes(student_id).await.unwrap(), 0);

    for request_id in [request_a, request_b] {
        let request = storage
            .get_enrollment_request_by_id(request_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.status, EnrollmentStatus::Unassigned);
        assert!(request.assigned_class_id.is_none());
        assert!(request.approval_date.is_none());
        assert!(request.unassigned_at.is_some());
        assert!(request.is_consistent());
    }
}

#[tokio::test]
async fn test_remove_selected_classes_ignores_unknown_ids() {
    let storage = memory_storage().await;
    let (student_id, class_a, class_b, request_a, request_b) =
        student_with_two_classes(&storage).await;

    let remaining = storage
        .remove_classes(student_id, vec![class_a, 777])
        .await
        .unwrap();
    assert_eq!(remaining.class_ids, vec![class_b]);

    assert_eq!(class_enrollment(&storage, class_a).await, 3);
    assert_eq!(class_enrollment(&storage, class_b).await, 1);

    let a = storage
        .get_enrollment_request_by_id(request_a)
        .await
        .unwrap()
        .unwrap();
    let b = storage
        .get_enrollment_request_by_id(request_b)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(a.status, EnrollmentStatus::Unassigned);
    assert_eq!(b.status, EnrollmentStatus::Approved);

    // 再次移除同一班级不会重复释放名额
    let again = storage
        .remove_classes(student_id, vec![class_a])
        .await
        .unwrap();
    assert_eq!(again.class_ids, vec![class_b]);
    assert_eq!(class_enrollment(&storage, class_a).await, 3);
}

#[tokio::test]
async fn test_remove_without_record() {
    let storage = memory_storage().await;
    let student = seed_student(&storage, "milo").await;

    let empty = storage.remove_classes(student.id, vec![]).await.unwrap();
    assert!(empty.class_ids.is_empty());
    assert!(empty.updated_at.is_none());

    let err = storage
        .remove_classes(student.id, vec![1])
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E007");
}

#[tokio::test]
async fn test_reads_on_missing_student_are_empty() {
    let storage = memory_storage().await;

    assert_eq!(storage.count_assigned_classes(404).await.unwrap(), 0);
    assert!(storage.get_available_classes(404).await.unwrap().is_empty());
    assert!(
        storage
            .get_student_assigned_classes(404)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(storage.get_class_assignment(404).await.unwrap().is_none());
}

#[tokio::test]
async fn test_available_classes() {
    let storage = memory_storage().await;
    let student = seed_student(&storage, "nora").await;
    let course = seed_course(&storage, "Chemistry", 300, 3).await;
    let unrelated = seed_course(&storage, "Physics", 300, 3).await;
    let assigned = seed_class(&storage, course.id, "Chem-1", 10, 0).await;
    let open = seed_class(&storage, course.id, "Chem-2", 10, 4).await;
    let _full = seed_class(&storage, course.id, "Chem-3", 2, 2).await;
    let _other = seed_class(&storage, unrelated.id, "Phys-1", 10, 0).await;

    // 尚无批准的申请
    assert!(
        storage
            .get_available_classes(student.id)
            .await
            .unwrap()
            .is_empty()
    );

    let request = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap();
    storage
        .approve_enrollment_request(request.id, assigned.id, None)
        .await
        .unwrap();

    let available = storage.get_available_classes(student.id).await.unwrap();
    let ids: Vec<i64> = available.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![open.id]);
    assert!(available.iter().all(|c| c.has_capacity()));
}

#[tokio::test]
async fn test_assigned_classes_carry_display_data() {
    let storage = memory_storage().await;
    let (student_id, class_a, class_b, _, _) = student_with_two_classes(&storage).await;

    let assigned = storage
        .get_student_assigned_classes(student_id)
        .await
        .unwrap();
    let ids: Vec<i64> = assigned.iter().map(|a| a.class.id).collect();
    assert_eq!(ids, vec![class_a, class_b]);
    assert_eq!(assigned[0].course_title.as_deref(), Some("Math"));
    assert_eq!(assigned[1].course_title.as_deref(), Some("Art"));
    assert_eq!(assigned[1].class.class_name, "Art-B");
}

#[tokio::test]
async fn test_class_cannot_be_assigned_twice() {
    let storage = memory_storage().await;
    let student = seed_student(&storage, "omar").await;
    let course = seed_course(&storage, "Biology", 100, 1).await;
    let class = seed_class(&storage, course.id, "Bio-1", 10, 0).await;

    let first = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap();
    storage
        .approve_enrollment_request(first.id, class.id, None)
        .await
        .unwrap();

    let second = storage
        .create_enrollment_request(student.id, course.id, None)
        .await
        .unwrap();
    let err = storage
        .approve_enrollment_request(second.id, class.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");
    assert_eq!(class_enrollment(&storage, class.id).await, 1);

    let pending = storage
        .get_enrollment_request_by_id(second.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pending.status, EnrollmentStatus::Pending);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_removals_release_seat_once() {
    let db = file_storage(8).await;
    let storage = db.storage.clone();
    let (student_id, class_a, class_b, request_a, _) = student_with_two_classes(&storage).await;
    assert_eq!(class_enrollment(&storage, class_a).await, 4);

    let mut handles = Vec::new();
    for _ in 0..2 {
        let storage = storage.clone();
        handles.push(tokio::spawn(async move {
            storage
                .remove_classes(student_id, vec![class_a])
                .await
                .map(|_| ())
        }));
    }
    let deleter = storage.clone();
    handles.push(tokio::spawn(async move {
        deleter
            .delete_enrollment_request(request_a, 1)
            .await
            .map(|_| ())
    }));

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(class_enrollment(&storage, class_a).await, 3);
    assert_eq!(class_enrollment(&storage, class_b).await, 1);
    let assignment = storage
        .get_class_assignment(student_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assignment.class_ids, vec![class_b]);
    assert!(
        storage
            .get_enrollment_request_by_id(request_a)
            .await
            .unwrap()
            .is_none()
    );
}
