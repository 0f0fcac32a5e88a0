use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum StockCondition {
    #[sea_orm(string_value = "New")]
    New,
    #[sea_orm(string_value = "Good")]
    Good,
    #[sea_orm(string_value = "Fair")]
    Fair,
    #[sea_orm(string_value = "Damaged")]
    Damaged,
    #[sea_orm(string_value = "Expired")]
    Expired,
}

/// On-hand stock per (tenant, product, warehouse).
///
/// Low-stock and out-of-stock are query filters over these rows, never
/// stored flags; available and total value are derived, not stored.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub quantity: i32,
    pub reserved_quantity: i32,
    pub reorder_level: i32,
    pub max_stock_level: i32,
    pub unit_cost: Decimal,
    pub condition: StockCondition,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// On-hand minus reserved; never exceeds on-hand.
    pub fn available_quantity(&self) -> i32 {
        self.quantity - self.reserved_quantity
    }

    pub fn total_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_cost
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::WarehouseId",
        to = "super::warehouse::Column::Id"
    )]
    Warehouse,
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(quantity: i32, reserved: i32, unit_cost: Decimal) -> Model {
        Model {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            warehouse_id: Uuid::new_v4(),
            quantity,
            reserved_quantity: reserved,
            reorder_level: 10,
            max_stock_level: 100,
            unit_cost,
            condition: StockCondition::Good,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn derived_quantities() {
        let rec = record(12, 5, dec!(2.50));
        assert_eq!(rec.available_quantity(), 7);
        assert_eq!(rec.total_value(), dec!(30.00));
    }
}
