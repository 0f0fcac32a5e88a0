use crate::{
    commands::requisitions::{
        ApproveRequisitionCommand, CreateRequisitionCommand, RequisitionLineRequest,
        SubmitRequisitionCommand,
    },
    commands::Command,
    db::DbPool,
    entities::{inventory_record, reorder_rule, requisition::RequisitionPriority},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

lazy_static! {
    static ref REORDERS_TRIGGERED: IntCounter = IntCounter::new(
        "reorders_triggered_total",
        "Total number of automated reorders triggered"
    )
    .expect("metric can be created");
}

/// Actor recorded on requisitions the engine raises on its own.
const SYSTEM_ACTOR: Uuid = Uuid::nil();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReorderRuleInput {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub min_stock_level: i32,
    pub max_stock_level: i32,
    /// 0 means "fill back up to max_stock_level".
    pub reorder_quantity: i32,
    pub auto_approve: bool,
}

/// One reorder raised by a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderAction {
    pub rule_id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub reorder_quantity: i32,
    pub requisition_id: Uuid,
    pub auto_approved: bool,
}

/// The automated reordering engine.
///
/// A rule fires when on-hand stock sits at or below its minimum AND the
/// inventory row changed since the rule last fired. The second condition
/// makes sweeps idempotent: repeated runs over unchanged stock raise
/// nothing new, while a fresh dip after a restock fires again.
#[derive(Clone)]
pub struct ReorderingService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ReorderingService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_rule(
        &self,
        tenant_id: Uuid,
        input: CreateReorderRuleInput,
    ) -> Result<reorder_rule::Model, ServiceError> {
        if input.min_stock_level < 0 || input.reorder_quantity < 0 {
            return Err(ServiceError::ValidationError(
                "Stock levels must not be negative".to_string(),
            ));
        }
        if input.min_stock_level >= input.max_stock_level {
            return Err(ServiceError::ValidationError(
                "Minimum stock level must be below the maximum".to_string(),
            ));
        }

        let existing = reorder_rule::Entity::find()
            .filter(reorder_rule::Column::TenantId.eq(tenant_id))
            .filter(reorder_rule::Column::ProductId.eq(input.product_id))
            .filter(reorder_rule::Column::WarehouseId.eq(input.warehouse_id))
            .one(&*self.db_pool)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A reorder rule already covers product {} at warehouse {}",
                input.product_id, input.warehouse_id
            )));
        }

        let now = Utc::now();
        let model = reorder_rule::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            product_id: Set(input.product_id),
            warehouse_id: Set(input.warehouse_id),
            min_stock_level: Set(input.min_stock_level),
            max_stock_level: Set(input.max_stock_level),
            reorder_quantity: Set(input.reorder_quantity),
            auto_approve: Set(input.auto_approve),
            is_active: Set(true),
            last_triggered_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(rule_id = %model.id, product_id = %model.product_id, "Reorder rule created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn deactivate_rule(&self, tenant_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let result = reorder_rule::Entity::update_many()
            .col_expr(reorder_rule::Column::IsActive, Expr::value(false))
            .col_expr(reorder_rule::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(reorder_rule::Column::Id.eq(id))
            .filter(reorder_rule::Column::TenantId.eq(tenant_id))
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Reorder rule {}", id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_rules(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<reorder_rule::Model>, ServiceError> {
        reorder_rule::Entity::find()
            .filter(reorder_rule::Column::TenantId.eq(tenant_id))
            .order_by_asc(reorder_rule::Column::CreatedAt)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Sweeps every active rule for one tenant and raises requisitions for
    /// those that fire. Returns the actions taken, empty when nothing fired.
    #[instrument(skip(self))]
    pub async fn run_check(&self, tenant_id: Uuid) -> Result<Vec<ReorderAction>, ServiceError> {
        let rules = reorder_rule::Entity::find()
            .filter(reorder_rule::Column::TenantId.eq(tenant_id))
            .filter(reorder_rule::Column::IsActive.eq(true))
            .all(&*self.db_pool)
            .await?;

        let mut actions = Vec::new();
        for rule in rules {
            match self.evaluate_rule(&rule).await {
                Ok(Some(action)) => actions.push(action),
                Ok(None) => {}
                Err(e) => {
                    // One broken rule must not starve the rest of the sweep.
                    warn!(rule_id = %rule.id, "Reorder rule evaluation failed: {}", e);
                }
            }
        }
        Ok(actions)
    }

    async fn evaluate_rule(
        &self,
        rule: &reorder_rule::Model,
    ) -> Result<Option<ReorderAction>, ServiceError> {
        let record = inventory_record::Entity::find()
            .filter(inventory_record::Column::TenantId.eq(rule.tenant_id))
            .filter(inventory_record::Column::ProductId.eq(rule.product_id))
            .filter(inventory_record::Column::WarehouseId.eq(rule.warehouse_id))
            .one(&*self.db_pool)
            .await?;

        let record = match record {
            Some(r) => r,
            None => return Ok(None),
        };

        if record.quantity > rule.min_stock_level {
            return Ok(None);
        }
        if let Some(last) = rule.last_triggered_at {
            // Unchanged stock since the last trigger: the earlier
            // requisition already covers this dip.
            if record.updated_at <= last {
                return Ok(None);
            }
        }

        let reorder_quantity = if rule.reorder_quantity > 0 {
            rule.reorder_quantity
        } else {
            rule.max_stock_level - record.quantity
        };
        if reorder_quantity <= 0 {
            return Ok(None);
        }

        let created = CreateRequisitionCommand {
            tenant_id: rule.tenant_id,
            requested_by: SYSTEM_ACTOR,
            department: "Automated Reordering".to_string(),
            priority: RequisitionPriority::High,
            required_by: None,
            lines: vec![RequisitionLineRequest {
                description: format!(
                    "Restock product {} at warehouse {}",
                    rule.product_id, rule.warehouse_id
                ),
                quantity: reorder_quantity,
                unit: "unit".to_string(),
                estimated_unit_price: record.unit_cost,
            }],
        }
        .execute(self.db_pool.clone(), self.event_sender.clone())
        .await?;

        if rule.auto_approve {
            SubmitRequisitionCommand {
                id: created.id,
                tenant_id: rule.tenant_id,
            }
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await?;
            ApproveRequisitionCommand {
                id: created.id,
                tenant_id: rule.tenant_id,
                approver_id: SYSTEM_ACTOR,
                comments: Some("Auto-approved by reorder rule".to_string()),
            }
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await?;
        }

        reorder_rule::Entity::update_many()
            .col_expr(
                reorder_rule::Column::LastTriggeredAt,
                Expr::value(Some(Utc::now())),
            )
            .col_expr(reorder_rule::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(reorder_rule::Column::Id.eq(rule.id))
            .exec(&*self.db_pool)
            .await?;

        REORDERS_TRIGGERED.inc();
        info!(
            rule_id = %rule.id,
            product_id = %rule.product_id,
            reorder_quantity,
            auto_approved = rule.auto_approve,
            "Reorder triggered"
        );
        self.event_sender
            .send(Event::ReorderTriggered {
                rule_id: rule.id,
                product_id: rule.product_id,
                warehouse_id: rule.warehouse_id,
                reorder_quantity,
                auto_approved: rule.auto_approve,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(Some(ReorderAction {
            rule_id: rule.id,
            product_id: rule.product_id,
            warehouse_id: rule.warehouse_id,
            reorder_quantity,
            requisition_id: created.id,
            auto_approved: rule.auto_approve,
        }))
    }

    /// Sweeps all tenants that carry active rules; for the background task.
    #[instrument(skip(self))]
    pub async fn run_check_all_tenants(&self) -> Result<usize, ServiceError> {
        let rules = reorder_rule::Entity::find()
            .filter(reorder_rule::Column::IsActive.eq(true))
            .all(&*self.db_pool)
            .await?;

        let mut tenants: Vec<Uuid> = rules.iter().map(|r| r.tenant_id).collect();
        tenants.sort();
        tenants.dedup();

        let mut triggered = 0;
        for tenant_id in tenants {
            triggered += self.run_check(tenant_id).await?.len();
        }
        Ok(triggered)
    }
}
