use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_suppliers_tables::Migration),
            Box::new(m20260101_000002_create_warehouses_table::Migration),
            Box::new(m20260101_000003_create_requisitions_tables::Migration),
            Box::new(m20260101_000004_create_purchase_order_tables::Migration),
            Box::new(m20260101_000005_create_inventory_tables::Migration),
            Box::new(m20260101_000006_create_reorder_rules_table::Migration),
            Box::new(m20260101_000007_create_tender_tables::Migration),
        ]
    }
}

mod m20260101_000001_create_suppliers_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000001_create_suppliers_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Suppliers::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::RegistrationNumber).string().null())
                        .col(ColumnDef::new(Suppliers::TaxId).string().null())
                        .col(ColumnDef::new(Suppliers::ContactEmail).string().null())
                        .col(ColumnDef::new(Suppliers::ContactPhone).string().null())
                        .col(ColumnDef::new(Suppliers::BankDetails).string().null())
                        .col(ColumnDef::new(Suppliers::Status).string().not_null())
                        .col(
                            ColumnDef::new(Suppliers::Rating)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Suppliers::RatingCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Suppliers::OnTimeDeliveryRate)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Suppliers::TotalSpent)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Suppliers::QualityScore)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Suppliers::AverageLeadTimeDays)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Suppliers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Suppliers::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SupplierRatings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SupplierRatings::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SupplierRatings::SupplierId).uuid().not_null())
                        .col(
                            ColumnDef::new(SupplierRatings::Rating)
                                .small_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SupplierRatings::Comment).string().null())
                        .col(ColumnDef::new(SupplierRatings::RatedBy).uuid().not_null())
                        .col(
                            ColumnDef::new(SupplierRatings::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_supplier_ratings_supplier")
                        .table(SupplierRatings::Table)
                        .col(SupplierRatings::SupplierId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SupplierRatings::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Suppliers {
        Table,
        Id,
        TenantId,
        Name,
        RegistrationNumber,
        TaxId,
        ContactEmail,
        ContactPhone,
        BankDetails,
        Status,
        Rating,
        RatingCount,
        OnTimeDeliveryRate,
        TotalSpent,
        QualityScore,
        AverageLeadTimeDays,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum SupplierRatings {
        Table,
        Id,
        SupplierId,
        Rating,
        Comment,
        RatedBy,
        CreatedAt,
    }
}

mod m20260101_000002_create_warehouses_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000002_create_warehouses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Warehouses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Warehouses::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Warehouses::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Warehouses::Code).string().not_null())
                        .col(ColumnDef::new(Warehouses::Name).string().not_null())
                        .col(ColumnDef::new(Warehouses::Location).string().null())
                        .col(
                            ColumnDef::new(Warehouses::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Warehouses::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Warehouses::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Warehouses::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Warehouses {
        Table,
        Id,
        TenantId,
        Code,
        Name,
        Location,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000003_create_requisitions_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000003_create_requisitions_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Requisitions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Requisitions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Requisitions::TenantId).uuid().not_null())
                        .col(
                            ColumnDef::new(Requisitions::RequisitionNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Requisitions::Department).string().not_null())
                        .col(ColumnDef::new(Requisitions::Status).string().not_null())
                        .col(ColumnDef::new(Requisitions::Priority).string().not_null())
                        .col(ColumnDef::new(Requisitions::RequiredBy).date().null())
                        .col(
                            ColumnDef::new(Requisitions::TotalAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Requisitions::ApprovalComments)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(Requisitions::RequestedBy).uuid().not_null())
                        .col(ColumnDef::new(Requisitions::ApprovedBy).uuid().null())
                        .col(ColumnDef::new(Requisitions::ConvertedPoId).uuid().null())
                        .col(
                            ColumnDef::new(Requisitions::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(Requisitions::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Requisitions::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_requisitions_tenant_status")
                        .table(Requisitions::Table)
                        .col(Requisitions::TenantId)
                        .col(Requisitions::Status)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RequisitionLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RequisitionLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RequisitionLines::RequisitionId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RequisitionLines::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RequisitionLines::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RequisitionLines::Unit).string().not_null())
                        .col(
                            ColumnDef::new(RequisitionLines::EstimatedUnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RequisitionLines::LineTotal)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RequisitionLines::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_requisition_lines_requisition")
                        .table(RequisitionLines::Table)
                        .col(RequisitionLines::RequisitionId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RequisitionLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Requisitions::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Requisitions {
        Table,
        Id,
        TenantId,
        RequisitionNumber,
        Department,
        Status,
        Priority,
        RequiredBy,
        TotalAmount,
        ApprovalComments,
        RequestedBy,
        ApprovedBy,
        ConvertedPoId,
        Version,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum RequisitionLines {
        Table,
        Id,
        RequisitionId,
        Description,
        Quantity,
        Unit,
        EstimatedUnitPrice,
        LineTotal,
        CreatedAt,
    }
}

mod m20260101_000004_create_purchase_order_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000004_create_purchase_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::TenantId).uuid().not_null())
                        .col(ColumnDef::new(PurchaseOrders::PoNumber).string().not_null())
                        .col(ColumnDef::new(PurchaseOrders::SupplierId).uuid().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::RequisitionId)
                                .uuid()
                                .null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::TenderId).uuid().null())
                        .col(ColumnDef::new(PurchaseOrders::Status).string().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::PaymentStatus)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::ExpectedDeliveryDate)
                                .date()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::ActualDeliveryDate)
                                .date()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::TotalAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::TaxAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::GrandTotal)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::AmountPaid)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(PurchaseOrders::Currency).string().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Notes).string().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::CancellationReason)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::CreatedBy).uuid().not_null())
                        .col(ColumnDef::new(PurchaseOrders::ApprovedBy).uuid().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_purchase_orders_tenant_status")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::TenantId)
                        .col(PurchaseOrders::Status)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrderLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrderLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::PurchaseOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::ProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::QuantityOrdered)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::QuantityReceived)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::LineTotal)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_purchase_order_lines_po")
                        .table(PurchaseOrderLines::Table)
                        .col(PurchaseOrderLines::PurchaseOrderId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(GoodsReceipts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GoodsReceipts::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GoodsReceipts::PurchaseOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(GoodsReceipts::GrnNumber).string().not_null())
                        .col(ColumnDef::new(GoodsReceipts::ReceivedBy).uuid().not_null())
                        .col(
                            ColumnDef::new(GoodsReceipts::ReceivedDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(GoodsReceipts::Notes).string().null())
                        .col(
                            ColumnDef::new(GoodsReceipts::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(GoodsReceiptLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GoodsReceiptLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GoodsReceiptLines::GoodsReceiptId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GoodsReceiptLines::PurchaseOrderLineId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GoodsReceiptLines::QuantityReceived)
                                .integer()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(GoodsReceiptLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(GoodsReceipts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseOrderLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum PurchaseOrders {
        Table,
        Id,
        TenantId,
        PoNumber,
        SupplierId,
        RequisitionId,
        TenderId,
        Status,
        PaymentStatus,
        OrderDate,
        ExpectedDeliveryDate,
        ActualDeliveryDate,
        TotalAmount,
        TaxAmount,
        GrandTotal,
        AmountPaid,
        Currency,
        Notes,
        CancellationReason,
        CreatedBy,
        ApprovedBy,
        Version,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum PurchaseOrderLines {
        Table,
        Id,
        PurchaseOrderId,
        ProductId,
        Description,
        QuantityOrdered,
        QuantityReceived,
        UnitPrice,
        LineTotal,
        CreatedAt,
    }

    #[derive(Iden)]
    enum GoodsReceipts {
        Table,
        Id,
        PurchaseOrderId,
        GrnNumber,
        ReceivedBy,
        ReceivedDate,
        Notes,
        CreatedAt,
    }

    #[derive(Iden)]
    enum GoodsReceiptLines {
        Table,
        Id,
        GoodsReceiptId,
        PurchaseOrderLineId,
        QuantityReceived,
    }
}

mod m20260101_000005_create_inventory_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000005_create_inventory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryRecords::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryRecords::TenantId).uuid().not_null())
                        .col(
                            ColumnDef::new(InventoryRecords::ProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::WarehouseId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::ReservedQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::ReorderLevel)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::MaxStockLevel)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::UnitCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::Condition)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // One record per product per warehouse within a tenant.
            manager
                .create_index(
                    Index::create()
                        .name("idx_inventory_tenant_product_warehouse")
                        .table(InventoryRecords::Table)
                        .col(InventoryRecords::TenantId)
                        .col(InventoryRecords::ProductId)
                        .col(InventoryRecords::WarehouseId)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockAdjustments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockAdjustments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockAdjustments::InventoryId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockAdjustments::DeltaQuantity)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockAdjustments::Reason).string().not_null())
                        .col(
                            ColumnDef::new(StockAdjustments::AdjustedBy)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockAdjustments::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockAdjustments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InventoryRecords::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum InventoryRecords {
        Table,
        Id,
        TenantId,
        ProductId,
        WarehouseId,
        Quantity,
        ReservedQuantity,
        ReorderLevel,
        MaxStockLevel,
        UnitCost,
        Condition,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum StockAdjustments {
        Table,
        Id,
        InventoryId,
        DeltaQuantity,
        Reason,
        AdjustedBy,
        CreatedAt,
    }
}

mod m20260101_000006_create_reorder_rules_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000006_create_reorder_rules_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ReorderRules::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ReorderRules::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ReorderRules::TenantId).uuid().not_null())
                        .col(ColumnDef::new(ReorderRules::ProductId).uuid().not_null())
                        .col(ColumnDef::new(ReorderRules::WarehouseId).uuid().not_null())
                        .col(
                            ColumnDef::new(ReorderRules::MinStockLevel)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReorderRules::MaxStockLevel)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReorderRules::ReorderQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ReorderRules::AutoApprove)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ReorderRules::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(ReorderRules::LastTriggeredAt)
                                .timestamp()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ReorderRules::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReorderRules::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ReorderRules::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum ReorderRules {
        Table,
        Id,
        TenantId,
        ProductId,
        WarehouseId,
        MinStockLevel,
        MaxStockLevel,
        ReorderQuantity,
        AutoApprove,
        IsActive,
        LastTriggeredAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000007_create_tender_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000007_create_tender_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Tenders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Tenders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Tenders::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Tenders::TenderNumber).string().not_null())
                        .col(ColumnDef::new(Tenders::Title).string().not_null())
                        .col(ColumnDef::new(Tenders::Description).string().null())
                        .col(ColumnDef::new(Tenders::TenderType).string().not_null())
                        .col(ColumnDef::new(Tenders::Category).string().null())
                        .col(ColumnDef::new(Tenders::Status).string().not_null())
                        .col(ColumnDef::new(Tenders::OpeningDate).timestamp().not_null())
                        .col(ColumnDef::new(Tenders::ClosingDate).timestamp().not_null())
                        .col(ColumnDef::new(Tenders::Budget).decimal().null())
                        .col(ColumnDef::new(Tenders::AwardedBidId).uuid().null())
                        .col(
                            ColumnDef::new(Tenders::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(Tenders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Tenders::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Bids::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Bids::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Bids::TenderId).uuid().not_null())
                        .col(ColumnDef::new(Bids::SupplierId).uuid().not_null())
                        .col(ColumnDef::new(Bids::TotalAmount).decimal().not_null())
                        .col(
                            ColumnDef::new(Bids::ValidityDays)
                                .integer()
                                .not_null()
                                .default(90),
                        )
                        .col(ColumnDef::new(Bids::ProposalDocument).string().null())
                        .col(ColumnDef::new(Bids::SubmittedAt).timestamp().not_null())
                        .col(ColumnDef::new(Bids::TechnicalScore).decimal().null())
                        .col(ColumnDef::new(Bids::FinancialScore).decimal().null())
                        .col(ColumnDef::new(Bids::TotalScore).decimal().null())
                        .col(ColumnDef::new(Bids::EvaluatorComments).string().null())
                        .col(ColumnDef::new(Bids::ScoredBy).uuid().null())
                        .col(ColumnDef::new(Bids::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_bids_tender")
                        .table(Bids::Table)
                        .col(Bids::TenderId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Bids::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Tenders::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Tenders {
        Table,
        Id,
        TenantId,
        TenderNumber,
        Title,
        Description,
        TenderType,
        Category,
        Status,
        OpeningDate,
        ClosingDate,
        Budget,
        AwardedBidId,
        Version,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum Bids {
        Table,
        Id,
        TenderId,
        SupplierId,
        TotalAmount,
        ValidityDays,
        ProposalDocument,
        SubmittedAt,
        TechnicalScore,
        FinancialScore,
        TotalScore,
        EvaluatorComments,
        ScoredBy,
        CreatedAt,
    }
}
