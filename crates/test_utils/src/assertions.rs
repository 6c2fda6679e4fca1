//! Custom Test Assertions
//!
//! Assertion helpers for claim listings that give more useful failure
//! messages than a bare `assert!`.

use core_kernel::{DateRange, Money};
use domain_reintegros::{EstadoReintegro, Reintegro};

/// Asserts that claims are ordered newest presentation first, then newest id
pub fn assert_listing_order(reintegros: &[Reintegro]) {
    for pair in reintegros.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            (a.fecha_presentacion, a.id) > (b.fecha_presentacion, b.id),
            "Listing out of order: {} ({}) before {} ({})",
            a.id,
            a.fecha_presentacion,
            b.id,
            b.fecha_presentacion
        );
    }
}

/// Asserts that every claim was presented within the range
pub fn assert_all_within(reintegros: &[Reintegro], range: DateRange) {
    for reintegro in reintegros {
        assert!(
            range.contains(reintegro.fecha_presentacion),
            "Claim {} presented on {} is outside {}",
            reintegro.id,
            reintegro.fecha_presentacion,
            range
        );
    }
}

/// Asserts a freshly created claim's initial values
pub fn assert_new_claim(reintegro: &Reintegro) {
    assert_eq!(
        reintegro.estado,
        EstadoReintegro::Pendiente,
        "New claim {} is in state {}",
        reintegro.id,
        reintegro.estado
    );
    assert!(
        reintegro.total_aprobado.is_zero(),
        "New claim {} has approved total {}",
        reintegro.id,
        reintegro.total_aprobado
    );
    assert!(!reintegro.adjuntos_confirmados);
}

/// Asserts two amounts are equal, comparing their decimal values
pub fn assert_money_eq(actual: Money, expected: Money) {
    assert_eq!(
        actual.amount(),
        expected.amount(),
        "Amounts differ: actual={}, expected={}",
        actual,
        expected
    );
}
