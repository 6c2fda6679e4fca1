//! Pre-built Test Fixtures
//!
//! Provides ready-to-use records shared by the unit, tool, and container
//! tests. The values are fixed so scenarios can refer to them by id.

use chrono::NaiveDate;
use core_kernel::{AfiliadoId, DateRange, MedicamentoId, Money, PlanId, PracticaId};
use domain_reintegros::{Afiliado, Practica};
use rust_decimal_macros::dec;

/// Fixture for affiliates
pub struct AfiliadoFixtures;

impl AfiliadoFixtures {
    /// Id of the standard affiliate
    pub fn afiliado_id() -> AfiliadoId {
        AfiliadoId::new(42)
    }

    /// Plan the standard affiliate is enrolled in
    pub fn plan_general() -> PlanId {
        PlanId::new(1)
    }

    /// Standard affiliate: DNI 30123456, plan 1
    pub fn juana_perez() -> Afiliado {
        Afiliado {
            id: Self::afiliado_id(),
            tipo_doc: "DNI".to_string(),
            nro_doc: "30123456".to_string(),
            nombre: "Juana".to_string(),
            apellido: "Pérez".to_string(),
            fecha_nac: NaiveDate::from_ymd_opt(1985, 3, 14),
            email: Some("juana.perez@example.com".to_string()),
            tel: Some("+54 261 555-0101".to_string()),
            plan_id: Some(Self::plan_general()),
        }
    }

    /// Affiliate with no plan and no contact data
    pub fn sin_plan() -> Afiliado {
        Afiliado {
            id: AfiliadoId::new(43),
            tipo_doc: "PASAPORTE".to_string(),
            nro_doc: "AR998877".to_string(),
            nombre: "Tomás".to_string(),
            apellido: "Gómez".to_string(),
            fecha_nac: None,
            email: None,
            tel: None,
            plan_id: None,
        }
    }

    pub fn all() -> Vec<Afiliado> {
        vec![Self::juana_perez(), Self::sin_plan()]
    }
}

/// Fixture for the practice catalog
pub struct PracticaFixtures;

impl PracticaFixtures {
    /// Id of "Consulta médica"
    pub fn consulta_id() -> PracticaId {
        PracticaId::new(7)
    }

    pub fn consulta() -> Practica {
        Practica {
            id: Self::consulta_id(),
            codigo: "420101".to_string(),
            nombre: "Consulta médica".to_string(),
            requiere_autorizacion: false,
        }
    }

    pub fn consulta_especialista() -> Practica {
        Practica {
            id: PracticaId::new(8),
            codigo: "420351".to_string(),
            nombre: "Consulta con especialista".to_string(),
            requiere_autorizacion: false,
        }
    }

    pub fn radiografia() -> Practica {
        Practica {
            id: PracticaId::new(12),
            codigo: "340101".to_string(),
            nombre: "Radiografía de tórax".to_string(),
            requiere_autorizacion: true,
        }
    }

    pub fn all() -> Vec<Practica> {
        vec![Self::consulta(), Self::consulta_especialista(), Self::radiografia()]
    }

    /// Practices covered by the standard plan
    pub fn covered_by_plan_general() -> Vec<PracticaId> {
        vec![Self::consulta_id(), PracticaId::new(12)]
    }

    /// A medicine present in the catalog
    pub fn medicamento_id() -> MedicamentoId {
        MedicamentoId::new(3)
    }
}

/// Fixture for dates
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Date new in-memory claims are presented on
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    /// Date of the standard reimbursed service
    pub fn fecha_prestacion() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    /// January 2024, both ends included
    pub fn enero_2024() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }
}

/// Fixture for amounts
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Standard consultation amount
    pub fn consulta() -> Money {
        Money::new(dec!(1500.00))
    }

    /// Standard medicine amount
    pub fn medicamento() -> Money {
        Money::new(dec!(842.50))
    }
}
