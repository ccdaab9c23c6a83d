mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use common::*;
use rust_enrollsys_next::models::users::entities::UserRole;
use rust_enrollsys_next::routes;
use rust_enrollsys_next::utils::{json_error_handler, query_error_handler};
use serde_json::{Value, json};

macro_rules! init_app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($storage.clone()))
                .configure(routes::configure_enrollment_routes)
                .configure(routes::configure_student_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_requests_without_valid_token_are_rejected() {
    let storage = memory_storage().await;
    let app = init_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/enrollments")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/enrollments")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1001);
}

#[actix_web::test]
async fn test_student_enrollment_flow() {
    let storage = memory_storage().await;
    let admin = seed_user(&storage, "admin", UserRole::Admin).await;
    let student = seed_student(&storage, "sara").await;
    let stranger = seed_student(&storage, "tom").await;
    let course = seed_course(&storage, "Spanish A1", 300, 3).await;
    let class = seed_class(&storage, course.id, "A1-Evening", 10, 9).await;
    let app = init_app!(storage);

    // 学生提交申请
    let req = test::TestRequest::post()
        .uri("/api/v1/enrollments")
        .insert_header(bearer(student.id, "student"))
        .set_json(json!({ "course_id": course.id, "preferred_level": "beginner" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["student_id"], student.id);
    let request_id = body["data"]["id"].as_i64().unwrap();

    // 不能替别人提交
    let req = test::TestRequest::post()
        .uri("/api/v1/enrollments")
        .insert_header(bearer(student.id, "student"))
        .set_json(json!({ "course_id": course.id, "student_id": stranger.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 学生无权审批
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/enrollments/{request_id}/approve"))
        .insert_header(bearer(student.id, "student"))
        .set_json(json!({ "class_id": class.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/enrollments/{request_id}/approve"))
        .insert_header(bearer(admin.id, "admin"))
        .set_json(json!({ "class_id": class.id, "admin_notes": "last seat" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["assigned_class_id"], class.id);

    // 重复审批
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/enrollments/{request_id}/approve"))
        .insert_header(bearer(admin.id, "admin"))
        .set_json(json!({ "class_id": class.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2001);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/enrollments/{request_id}"))
        .insert_header(bearer(student.id, "student"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["assigned_class"]["current_enrollment"], 10);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/enrollments/{request_id}"))
        .insert_header(bearer(stranger.id, "student"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/enrollments/{request_id}/installments"))
        .insert_header(bearer(student.id, "student"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["total_amount"], 300);
    assert_eq!(body["data"]["outstanding_amount"], 300);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/enrollments/{request_id}/payments"))
        .insert_header(bearer(student.id, "student"))
        .set_json(json!({ "installment_no": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["installment_no"], 1);
    assert_eq!(body["data"]["status"], "paid");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/enrollments/{request_id}/installments/1/refund"))
        .insert_header(bearer(admin.id, "admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "refunded");

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/students/{}/assigned-classes/count",
            student.id
        ))
        .insert_header(bearer(student.id, "student"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["count"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/students/{}/assigned-classes", student.id))
        .insert_header(bearer(stranger.id, "student"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 教师可以查看学生的分班
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/students/{}/assigned-classes", student.id))
        .insert_header(bearer(500, "teacher"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["items"][0]["course_title"], "Spanish A1");

    // 无请求体时移除全部班级
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/students/{}/assigned-classes", student.id))
        .insert_header(bearer(admin.id, "admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["class_ids"], json!([]));
    assert_eq!(class_enrollment(&storage, class.id).await, 9);
}

#[actix_web::test]
async fn test_admin_must_name_the_student() {
    let storage = memory_storage().await;
    let admin = seed_user(&storage, "admin", UserRole::Admin).await;
    let student = seed_student(&storage, "uma").await;
    let course = seed_course(&storage, "Russian", 200, 2).await;
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/enrollments")
        .insert_header(bearer(admin.id, "admin"))
        .set_json(json!({ "course_id": course.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/enrollments")
        .insert_header(bearer(admin.id, "admin"))
        .set_json(json!({ "course_id": course.id, "student_id": student.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["student_id"], student.id);
}

#[actix_web::test]
async fn test_error_responses() {
    let storage = memory_storage().await;
    let admin = seed_user(&storage, "admin", UserRole::Admin).await;
    let app = init_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/enrollments/abc")
        .insert_header(bearer(admin.id, "admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/enrollments/999")
        .insert_header(bearer(admin.id, "admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2000);

    let req = test::TestRequest::put()
        .uri("/api/v1/enrollments/999/reject")
        .insert_header(bearer(admin.id, "admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // 教师不能提交申请
    let req = test::TestRequest::post()
        .uri("/api/v1/enrollments")
        .insert_header(bearer(77, "teacher"))
        .set_json(json!({ "course_id": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri("/api/v1/students/5/assigned-classes")
        .insert_header(bearer(admin.id, "admin"))
        .set_json(json!({ "class_ids": [1] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_students_only_list_their_own_requests() {
    let storage = memory_storage().await;
    let admin = seed_user(&storage, "admin", UserRole::Admin).await;
    let first = seed_student(&storage, "vera").await;
    let second = seed_student(&storage, "walt").await;
    let course = seed_course(&storage, "Arabic", 400, 4).await;

    storage
        .create_enrollment_request(first.id, course.id, None)
        .await
        .unwrap();
    storage
        .create_enrollment_request(second.id, course.id, None)
        .await
        .unwrap();
    let app = init_app!(storage);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/enrollments?student_id={}", second.id))
        .insert_header(bearer(first.id, "student"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["student_id"], first.id);

    let req = test::TestRequest::get()
        .uri("/api/v1/enrollments?status=pending&page=1&size=10")
        .insert_header(bearer(admin.id, "admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["pagination"]["total"], 2);
}
