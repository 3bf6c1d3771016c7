//! # Lifecycle Flows
//!
//! End-to-end product lifecycle through the service API with bus-side
//! assertions: an external subscriber must see one notification per side
//! effect, in commit order.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, SupplyChainEvent, Subscription};
    use shared_types::{AccountId, Stage};
    use supply_ledger::prelude::*;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn random_account() -> AccountId {
        AccountId::new(rand::random())
    }

    fn registration(name: &str, quantity: u64) -> ProductRegistration {
        ProductRegistration {
            name: name.into(),
            source: format!("{name} estate"),
            quality: "grade 1".into(),
            initial_quantity: quantity,
            pickup_time_manual: "2024-01-01 08:00".into(),
        }
    }

    struct Harness {
        bus: Arc<InMemoryEventBus>,
        clock: Arc<ManualClock>,
        service: SupplyChainService<Arc<ManualClock>>,
        admin: AccountId,
        producer: AccountId,
    }

    /// Service over a fresh ledger with one authorized producer.
    async fn harness() -> Harness {
        crate::init_test_logging();
        let bus = Arc::new(InMemoryEventBus::new());
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let admin = random_account();
        let producer = random_account();
        let service = SupplyChainService::new(admin, bus.clone(), clock.clone());
        service.add_producer(admin, producer).await.unwrap();
        Harness {
            bus,
            clock,
            service,
            admin,
            producer,
        }
    }

    async fn next_event(sub: &mut Subscription) -> SupplyChainEvent {
        timeout(Duration::from_millis(200), sub.recv())
            .await
            .expect("timed out waiting for event")
            .expect("bus closed")
    }

    // =============================================================================
    // INTEGRATION TESTS: FULL LIFECYCLE
    // =============================================================================

    /// The reference scenario: register 100 units of raw material, consume
    /// 30 into a production run, package, distribute, and read the trace.
    #[tokio::test]
    async fn full_lifecycle_with_trace() -> anyhow::Result<()> {
        let h = harness().await;

        let input_id = h
            .service
            .create_product(h.producer, registration("palm oil", 100))
            .await?;
        let main_id = h
            .service
            .create_product(h.producer, registration("cooking oil", 40))
            .await?;

        h.clock.advance(60);
        let batch_id = h
            .service
            .start_production(h.producer, main_id, vec![input_id], vec![30], "shift 1".into())
            .await?;

        let products = h.service.get_all_products().await;
        assert_eq!(products[(input_id - 1) as usize].available_quantity, 70);
        assert_eq!(products[(main_id - 1) as usize].stage, Stage::Production);

        h.clock.advance(60);
        h.service
            .package_product(
                h.producer,
                main_id,
                PackagingCertification {
                    halal_cert_hash: "halal1".into(),
                    bpom_cert_hash: "bpom1".into(),
                    packaging_time_manual: "t1".into(),
                },
            )
            .await?;

        h.clock.advance(60);
        h.service
            .distribute_product(h.producer, main_id, "shipped".into())
            .await?;

        let trace = h.service.get_full_trace(main_id).await?;
        assert_eq!(trace.product.stage, Stage::Distribution);
        assert_eq!(trace.product.distribution_details, "shipped");

        let batch = trace.batch.expect("batch section");
        assert_eq!(batch.batch_id, batch_id);
        assert_eq!(batch.halal_cert_hash, "halal1");
        assert_eq!(batch.bpom_cert_hash, "bpom1");
        assert_ne!(batch.packaging_time, 0);
        assert_eq!(batch.inputs.len(), 1);
        assert_eq!(batch.inputs[0].product_id, input_id);
        assert_eq!(batch.inputs[0].quantity_used, 30);
        assert!(matches!(batch.inputs[0].detail, InputDetail::Known { .. }));
        Ok(())
    }

    /// Every side effect of a production run reaches a subscriber, in the
    /// documented order: quantity updates in input order, batch-created,
    /// stage-changed.
    #[tokio::test]
    async fn production_event_order_on_the_bus() {
        let h = harness().await;
        let a = h
            .service
            .create_product(h.producer, registration("palm oil", 100))
            .await
            .unwrap();
        let b = h
            .service
            .create_product(h.producer, registration("coconut oil", 80))
            .await
            .unwrap();
        let main_id = h
            .service
            .create_product(h.producer, registration("blend", 50))
            .await
            .unwrap();

        // Subscribe after setup so only the production events arrive
        let mut sub = h.bus.subscribe(EventFilter::all());

        h.service
            .start_production(h.producer, main_id, vec![a, b], vec![25, 10], "s".into())
            .await
            .unwrap();

        match next_event(&mut sub).await {
            SupplyChainEvent::ProductQuantityUpdated {
                product_id,
                quantity_used,
                available_remaining,
                ..
            } => {
                assert_eq!(product_id, a);
                assert_eq!(quantity_used, 25);
                assert_eq!(available_remaining, 75);
            }
            other => panic!("expected quantity update for {a}, got {other:?}"),
        }
        match next_event(&mut sub).await {
            SupplyChainEvent::ProductQuantityUpdated {
                product_id,
                quantity_used,
                ..
            } => {
                assert_eq!(product_id, b);
                assert_eq!(quantity_used, 10);
            }
            other => panic!("expected quantity update for {b}, got {other:?}"),
        }
        match next_event(&mut sub).await {
            SupplyChainEvent::BatchCreated {
                product_id,
                input_count,
                ..
            } => {
                assert_eq!(product_id, main_id);
                assert_eq!(input_count, 2);
            }
            other => panic!("expected batch created, got {other:?}"),
        }
        match next_event(&mut sub).await {
            SupplyChainEvent::ProductStageChanged {
                product_id,
                previous,
                current,
                ..
            } => {
                assert_eq!(product_id, main_id);
                assert_eq!(previous, Stage::RawMaterial);
                assert_eq!(current, Stage::Production);
            }
            other => panic!("expected stage change, got {other:?}"),
        }
    }

    /// Topic filtering: a batch-lifecycle subscriber sees batch events only.
    #[tokio::test]
    async fn topic_filtered_subscriber_sees_batch_events_only() {
        let h = harness().await;
        let mut sub = h
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::BatchLifecycle]));

        let input_id = h
            .service
            .create_product(h.producer, registration("palm oil", 100))
            .await
            .unwrap();
        let main_id = h
            .service
            .create_product(h.producer, registration("main", 10))
            .await
            .unwrap();
        h.service
            .start_production(h.producer, main_id, vec![input_id], vec![5], "s".into())
            .await
            .unwrap();
        h.service
            .package_product(h.producer, main_id, PackagingCertification::default())
            .await
            .unwrap();

        assert!(matches!(
            next_event(&mut sub).await,
            SupplyChainEvent::BatchCreated { .. }
        ));
        assert!(matches!(
            next_event(&mut sub).await,
            SupplyChainEvent::BatchPackaged { .. }
        ));
        assert_eq!(sub.try_recv(), Ok(None));
    }

    /// A second package attempt is rejected and publishes nothing.
    #[tokio::test]
    async fn double_package_rejected() {
        let h = harness().await;
        let input_id = h
            .service
            .create_product(h.producer, registration("palm oil", 100))
            .await
            .unwrap();
        let main_id = h
            .service
            .create_product(h.producer, registration("main", 10))
            .await
            .unwrap();
        h.service
            .start_production(h.producer, main_id, vec![input_id], vec![5], "s".into())
            .await
            .unwrap();
        h.service
            .package_product(h.producer, main_id, PackagingCertification::default())
            .await
            .unwrap();

        let mut sub = h.bus.subscribe(EventFilter::all());
        let err = h
            .service
            .package_product(h.producer, main_id, PackagingCertification::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidProductStage {
                product_id: main_id,
                actual: Stage::Packaging,
                required: Stage::Production
            }
        );
        assert_eq!(sub.try_recv(), Ok(None));
    }

    /// Stage transitions cannot skip: packaging straight from RawMaterial
    /// and distributing straight from Production both fail.
    #[tokio::test]
    async fn no_stage_skipping() {
        let h = harness().await;
        let input_id = h
            .service
            .create_product(h.producer, registration("palm oil", 100))
            .await
            .unwrap();
        let main_id = h
            .service
            .create_product(h.producer, registration("main", 10))
            .await
            .unwrap();

        let err = h
            .service
            .package_product(h.producer, main_id, PackagingCertification::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidProductStage { .. }));

        h.service
            .start_production(h.producer, main_id, vec![input_id], vec![5], "s".into())
            .await
            .unwrap();
        let err = h
            .service
            .distribute_product(h.producer, main_id, "early".into())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidProductStage {
                product_id: main_id,
                actual: Stage::Production,
                required: Stage::Packaging
            }
        );
    }

    /// Only the owner may drive a product through its lifecycle, even if
    /// the caller is an authorized producer.
    #[tokio::test]
    async fn non_owner_producer_cannot_mutate() {
        let h = harness().await;
        let other = random_account();
        h.service.add_producer(h.admin, other).await.unwrap();

        let input_id = h
            .service
            .create_product(h.producer, registration("palm oil", 100))
            .await
            .unwrap();
        let main_id = h
            .service
            .create_product(h.producer, registration("main", 10))
            .await
            .unwrap();

        let err = h
            .service
            .start_production(other, main_id, vec![input_id], vec![5], "s".into())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::NotProductOwner {
                product_id: main_id,
                caller: other
            }
        );
    }
}
