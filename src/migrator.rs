use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240501_000001_create_users_table::Migration),
            Box::new(m20240501_000002_create_maintenance_requests_table::Migration),
        ]
    }
}

mod m20240501_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Username)
                                .string_len(150)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::DisplayName).string_len(150).not_null())
                        .col(ColumnDef::new(Users::Email).string_len(254).null())
                        .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                        .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Username,
        DisplayName,
        Email,
        PasswordHash,
        Role,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240501_000002_create_maintenance_requests_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000002_create_maintenance_requests_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MaintenanceRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaintenanceRequests::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::RequesterName)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::RequestDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::RequestTime)
                                .time()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::Department)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::MaintenanceType)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::EquipmentStatus)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::EquipmentLocationPress)
                                .string_len(100)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::EquipmentLocationPressNumber)
                                .string_len(50)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::EquipmentLocationThread)
                                .string_len(100)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::EquipmentLocationThreadNumber)
                                .string_len(50)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::EquipmentLocationOther)
                                .string_len(100)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::EquipmentLocationOtherNumber)
                                .string_len(50)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::ProblemDescription)
                                .text()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::Status)
                                .string_len(20)
                                .not_null()
                                .default("open"),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::TechnicianName)
                                .string_len(100)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::StartTime)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::EndTime)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::ResolutionNotes)
                                .text()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Listing order: newest request date and time first
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_maintenance_requests_requested_at")
                        .table(MaintenanceRequests::Table)
                        .col(MaintenanceRequests::RequestDate)
                        .col(MaintenanceRequests::RequestTime)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_maintenance_requests_status")
                        .table(MaintenanceRequests::Table)
                        .col(MaintenanceRequests::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MaintenanceRequests::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum MaintenanceRequests {
        Table,
        Id,
        RequesterName,
        RequestDate,
        RequestTime,
        Department,
        MaintenanceType,
        EquipmentStatus,
        EquipmentLocationPress,
        EquipmentLocationPressNumber,
        EquipmentLocationThread,
        EquipmentLocationThreadNumber,
        EquipmentLocationOther,
        EquipmentLocationOtherNumber,
        ProblemDescription,
        Status,
        TechnicianName,
        StartTime,
        EndTime,
        ResolutionNotes,
        CreatedAt,
        UpdatedAt,
    }
}
