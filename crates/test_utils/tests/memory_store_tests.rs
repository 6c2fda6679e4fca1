//! In-memory store behaviour tests
//!
//! The tool tests rely on the in-memory store answering like the database
//! does, so its semantics are pinned here.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{AfiliadoId, DateRange, Money, ReintegroId};
use domain_reintegros::{
    AfiliadoPort, EstadoReintegro, NuevoReintegro, PracticaPort, ReintegroPort,
};
use test_utils::{
    assert_all_within, assert_listing_order, assert_money_eq, assert_new_claim,
    date_range_strategy, fecha_strategy, AfiliadoFixtures, InMemoryStore, NuevoItemBuilder,
    PracticaFixtures, ReintegroBuilder, TemporalFixtures,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod lookups {
    use super::*;

    #[tokio::test]
    async fn test_unknown_document_is_not_found() {
        let store = InMemoryStore::seeded().await;
        let result = store.find_by_documento("DNI", "11111111").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_document_match_is_exact() {
        let store = InMemoryStore::seeded().await;
        assert!(store.find_by_documento("dni", "30123456").await.unwrap().is_none());
        assert!(store.find_by_documento("DNI", "30123456").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_practica_search_substring() {
        let store = InMemoryStore::seeded().await;
        let found = store.search_by_nombre("radio").await.unwrap();
        assert_eq!(found, vec![PracticaFixtures::radiografia()]);
        assert!(store.search_by_nombre("cirugía").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_uncovered_plan_has_no_practicas() {
        let store = InMemoryStore::seeded().await;
        let found = store
            .covered_by_plan(core_kernel::PlanId::new(99))
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_new_claim_is_pending_with_zero_approved() {
        let store = InMemoryStore::seeded().await;
        let id = store
            .create(
                NuevoReintegro::new(AfiliadoFixtures::afiliado_id())
                    .with_total_presentado(Money::new(dec!(300))),
            )
            .await
            .unwrap();

        let reintegro = store.reintegro(id).await.unwrap();
        assert_new_claim(&reintegro);
        assert_money_eq(reintegro.total_presentado, Money::new(dec!(300)));
        assert_eq!(reintegro.fecha_presentacion, TemporalFixtures::today());
    }

    #[tokio::test]
    async fn test_items_leave_totals_unchanged() {
        let store = InMemoryStore::seeded().await;
        let id = store
            .create(NuevoReintegro::new(AfiliadoFixtures::afiliado_id()))
            .await
            .unwrap();

        for _ in 0..5 {
            store.add_item(id, NuevoItemBuilder::practica().build()).await.unwrap();
        }

        let reintegro = store.reintegro(id).await.unwrap();
        assert!(reintegro.total_presentado.is_zero());
        assert!(reintegro.total_aprobado.is_zero());
        assert_eq!(store.item_count(id).await, 5);
    }

    #[tokio::test]
    async fn test_items_are_accepted_after_close() {
        let store = InMemoryStore::seeded().await;
        let id = store
            .create(NuevoReintegro::new(AfiliadoFixtures::afiliado_id()))
            .await
            .unwrap();
        store.force_estado(id, EstadoReintegro::Enviado).await;

        assert!(store.add_item(id, NuevoItemBuilder::medicamento().build()).await.is_ok());
    }

    #[tokio::test]
    async fn test_request_attachments_resets_flag() {
        let store = InMemoryStore::seeded().await;
        let id = store
            .create(NuevoReintegro::new(AfiliadoFixtures::afiliado_id()))
            .await
            .unwrap();

        assert!(store.request_attachments(id).await.unwrap());
        let reintegro = store.reintegro(id).await.unwrap();
        assert_eq!(reintegro.estado, EstadoReintegro::EsperandoAdjuntos);
        assert!(!reintegro.adjuntos_confirmados);
    }

    #[tokio::test]
    async fn test_marking_missing_claim_returns_false() {
        let store = InMemoryStore::seeded().await;
        assert!(!store.request_attachments(ReintegroId::new(77)).await.unwrap());
        assert!(!store.submit_for_review(ReintegroId::new(77)).await.unwrap());
    }

    #[tokio::test]
    async fn test_detail_lists_documents() {
        let store = InMemoryStore::seeded().await;
        let id = store
            .create(NuevoReintegro::new(AfiliadoFixtures::afiliado_id()))
            .await
            .unwrap();
        store.add_item(id, NuevoItemBuilder::practica().build()).await.unwrap();
        store.attach_documento(id, "factura.pdf").await;
        store.attach_documento(id, "receta.pdf").await;

        let detalle = store.get_detalle(id).await.unwrap().unwrap();
        assert_eq!(detalle.items.len(), 1);
        assert_eq!(
            detalle
                .documentos
                .iter()
                .map(|d| d.nombre_archivo.as_str())
                .collect::<Vec<_>>(),
            vec!["factura.pdf", "receta.pdf"]
        );
    }
}

mod listing {
    use super::*;

    async fn store_with_dates(dates: &[NaiveDate]) -> InMemoryStore {
        let store = InMemoryStore::seeded().await;
        for (i, fecha) in dates.iter().enumerate() {
            store
                .insert_reintegro(ReintegroBuilder::new(i as i32 + 1).presented_on(*fecha).build())
                .await;
        }
        store
    }

    #[tokio::test]
    async fn test_range_is_inclusive_and_descending() {
        let store = store_with_dates(&[
            date(2023, 12, 31),
            date(2024, 1, 1),
            date(2024, 1, 15),
            date(2024, 1, 15),
            date(2024, 1, 31),
            date(2024, 2, 1),
        ])
        .await;

        let listed = store
            .list_by_afiliado(AfiliadoFixtures::afiliado_id(), TemporalFixtures::enero_2024())
            .await
            .unwrap();

        let ids: Vec<i32> = listed.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![5, 4, 3, 2]);
    }

    #[tokio::test]
    async fn test_other_affiliates_are_excluded() {
        let store = InMemoryStore::seeded().await;
        store
            .insert_reintegro(ReintegroBuilder::new(1).with_afiliado(AfiliadoId::new(43)).build())
            .await;

        let listed = store
            .list_by_afiliado(AfiliadoFixtures::afiliado_id(), TemporalFixtures::enero_2024())
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    proptest! {
        #[test]
        fn prop_listing_respects_range(
            fechas in proptest::collection::vec(fecha_strategy(), 0..20),
            range in date_range_strategy(),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let store = store_with_dates(&fechas).await;
                let listed = store
                    .list_by_afiliado(AfiliadoFixtures::afiliado_id(), range)
                    .await
                    .unwrap();

                assert_all_within(&listed, range);
                assert_listing_order(&listed);
                let expected = fechas.iter().filter(|f| range.contains(**f)).count();
                assert_eq!(listed.len(), expected);
            });
        }
    }

    #[tokio::test]
    async fn test_inverted_range_is_empty() {
        let store = store_with_dates(&[date(2024, 1, 10)]).await;
        let listed = store
            .list_by_afiliado(
                AfiliadoFixtures::afiliado_id(),
                DateRange::new(date(2024, 1, 31), date(2024, 1, 1)),
            )
            .await
            .unwrap();
        assert!(listed.is_empty());
    }
}
