//! Shared fixtures for the handler tests.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use tokio_util::sync::CancellationToken;

use catalog_core::UserId;
use catalog_events::{BusEventPublisher, EventBus, EventEnvelope, InMemoryEventBus, Subscription};
use catalog_products::{BaseProductId, ProductVariantId, UnitKind, UnitOfMeasureId};

use crate::commands::{
    CatalogService, CommandContext, CreateBaseProduct, CreateUnitOfMeasure, CreateVariant, UpdateVariant,
};
use crate::config::CatalogConfig;
use crate::repository::{
    InMemoryBaseProductRepository, InMemoryUnitOfMeasureRepository, InMemoryVariantRepository,
};

pub(crate) type TestBus = InMemoryEventBus<EventEnvelope<JsonValue>>;

pub(crate) struct Harness {
    pub service: CatalogService,
    pub variants: Arc<InMemoryVariantRepository>,
    pub bus: Arc<TestBus>,
    pub actor: UserId,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        let variants = Arc::new(InMemoryVariantRepository::new());
        let bus = Arc::new(TestBus::new());
        let service = CatalogService::new(
            variants.clone(),
            Arc::new(InMemoryBaseProductRepository::new()),
            Arc::new(InMemoryUnitOfMeasureRepository::new()),
            Arc::new(BusEventPublisher::new(bus.clone())),
            config,
        );

        Self {
            service,
            variants,
            bus,
            actor: UserId::new(),
        }
    }

    pub fn ctx(&self) -> CommandContext {
        CommandContext::now(self.actor)
    }

    pub fn subscribe(&self) -> Subscription<EventEnvelope<JsonValue>> {
        self.bus.subscribe()
    }

    pub async fn base_product(&self, name: &str) -> BaseProductId {
        self.service
            .create_base_product(
                &self.ctx(),
                CreateBaseProduct {
                    id: None,
                    name: name.to_string(),
                    description: Some(format!("{name} description")),
                    category_id: None,
                },
            )
            .await
            .unwrap()
            .id_typed()
    }

    pub async fn unit(&self, name: &str, symbol: &str) -> UnitOfMeasureId {
        self.service
            .create_unit_of_measure(
                &self.ctx(),
                CreateUnitOfMeasure {
                    id: None,
                    name: name.to_string(),
                    symbol: symbol.to_string(),
                    kind: UnitKind::Count,
                },
            )
            .await
            .unwrap()
            .id_typed()
    }

    pub async fn variant(
        &self,
        base: BaseProductId,
        unit: UnitOfMeasureId,
        name: &str,
        stock: i64,
    ) -> ProductVariantId {
        let mut cmd = create_cmd(base, unit, name);
        cmd.stock_quantity = Some(stock);
        self.service
            .create_variant(&self.ctx(), cmd, &CancellationToken::new())
            .await
            .unwrap()
            .id
    }
}

pub(crate) fn create_cmd(base: BaseProductId, unit: UnitOfMeasureId, name: &str) -> CreateVariant {
    CreateVariant {
        variant_id: None,
        base_product_id: base,
        name: name.to_string(),
        stock_quantity: None,
        unit_of_measure_id: unit,
        unit_value: Decimal::ONE,
        usage_notes: Some("Handle with care".to_string()),
        photos: vec![],
        dynamic_properties: Default::default(),
    }
}

pub(crate) fn stock_update(id: ProductVariantId, stock: i64) -> UpdateVariant {
    let mut cmd = UpdateVariant::new(id);
    cmd.stock_quantity = Some(stock);
    cmd
}
