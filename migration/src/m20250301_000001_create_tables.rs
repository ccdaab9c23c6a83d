use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表（身份由外部网关签发，这里只保存展示信息）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().null())
                    .col(ColumnDef::new(Courses::Price).big_integer().not_null())
                    .col(ColumnDef::new(Courses::Currency).string().not_null())
                    .col(
                        ColumnDef::new(Courses::InstallmentCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Courses::PaymentPlan).text().null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建班级表
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classes::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Classes::ClassName).string().not_null())
                    .col(ColumnDef::new(Classes::TeacherName).string().null())
                    .col(ColumnDef::new(Classes::Schedule).string().null())
                    .col(ColumnDef::new(Classes::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Classes::CurrentEnrollment)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Classes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Classes::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建选课申请表
        manager
            .create_table(
                Table::create()
                    .table(EnrollmentRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrollmentRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentRequests::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentRequests::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentRequests::PreferredLevel)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentRequests::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentRequests::RequestDate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentRequests::ApprovalDate)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentRequests::AssignedClassId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(EnrollmentRequests::AdminNotes).text().null())
                    .col(
                        ColumnDef::new(EnrollmentRequests::RegistrationFeePaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(EnrollmentRequests::PaymentDate)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentRequests::UnassignedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentRequests::DeletedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentRequests::DeletedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentRequests::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EnrollmentRequests::Table, EnrollmentRequests::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EnrollmentRequests::Table, EnrollmentRequests::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                EnrollmentRequests::Table,
                                EnrollmentRequests::AssignedClassId,
                            )
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生分班文档表（每个学生一行）
        manager
            .create_table(
                Table::create()
                    .table(ClassAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassAssignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassAssignments::StudentId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ClassAssignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassAssignments::Table, ClassAssignments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建分班条目表（学生的班级集合）
        manager
            .create_table(
                Table::create()
                    .table(ClassAssignmentEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassAssignmentEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassAssignmentEntries::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassAssignmentEntries::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassAssignmentEntries::AssignedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ClassAssignmentEntries::Table,
                                ClassAssignmentEntries::StudentId,
                            )
                            .to(ClassAssignments::Table, ClassAssignments::StudentId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ClassAssignmentEntries::Table,
                                ClassAssignmentEntries::ClassId,
                            )
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建分期付款表
        manager
            .create_table(
                Table::create()
                    .table(PaymentInstallments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentInstallments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentInstallments::EnrollmentRequestId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentInstallments::InstallmentNo)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentInstallments::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentInstallments::AmountType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentInstallments::Percentage)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentInstallments::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentInstallments::DueDate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentInstallments::PaidDate)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentInstallments::RefundedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentInstallments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                PaymentInstallments::Table,
                                PaymentInstallments::EnrollmentRequestId,
                            )
                            .to(EnrollmentRequests::Table, EnrollmentRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 班级表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_classes_course_id")
                    .table(Classes::Table)
                    .col(Classes::CourseId)
                    .to_owned(),
            )
            .await?;

        // 选课申请表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollment_requests_student_course")
                    .table(EnrollmentRequests::Table)
                    .col(EnrollmentRequests::StudentId)
                    .col(EnrollmentRequests::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollment_requests_status")
                    .table(EnrollmentRequests::Table)
                    .col(EnrollmentRequests::Status)
                    .to_owned(),
            )
            .await?;

        // 分班条目唯一索引：同一学生不能重复分到同一班级
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_assignment_entries_student_class")
                    .table(ClassAssignmentEntries::Table)
                    .col(ClassAssignmentEntries::StudentId)
                    .col(ClassAssignmentEntries::ClassId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 分期付款唯一索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payment_installments_request_no")
                    .table(PaymentInstallments::Table)
                    .col(PaymentInstallments::EnrollmentRequestId)
                    .col(PaymentInstallments::InstallmentNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentInstallments::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(ClassAssignmentEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ClassAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EnrollmentRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    Role,
    DisplayName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    Title,
    Description,
    Price,
    Currency,
    InstallmentCount,
    PaymentPlan,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    Id,
    CourseId,
    ClassName,
    TeacherName,
    Schedule,
    Capacity,
    CurrentEnrollment,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EnrollmentRequests {
    #[sea_orm(iden = "enrollment_requests")]
    Table,
    Id,
    StudentId,
    CourseId,
    PreferredLevel,
    Status,
    RequestDate,
    ApprovalDate,
    AssignedClassId,
    AdminNotes,
    RegistrationFeePaid,
    PaymentDate,
    UnassignedAt,
    DeletedAt,
    DeletedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassAssignments {
    #[sea_orm(iden = "class_assignments")]
    Table,
    Id,
    StudentId,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassAssignmentEntries {
    #[sea_orm(iden = "class_assignment_entries")]
    Table,
    Id,
    StudentId,
    ClassId,
    AssignedAt,
}

#[derive(DeriveIden)]
enum PaymentInstallments {
    #[sea_orm(iden = "payment_installments")]
    Table,
    Id,
    EnrollmentRequestId,
    InstallmentNo,
    Amount,
    AmountType,
    Percentage,
    Status,
    DueDate,
    PaidDate,
    RefundedAt,
    CreatedAt,
}
