//! Test Data Builders
//!
//! Builder patterns for records whose tests care about one or two fields.
//! Everything else defaults to the fixtures.

use chrono::{NaiveDate, Utc};
use core_kernel::{AfiliadoId, Money, ReintegroId};
use domain_reintegros::{EstadoReintegro, ItemKind, NuevoItem, Reintegro};

use crate::fixtures::{AfiliadoFixtures, MoneyFixtures, PracticaFixtures, TemporalFixtures};

/// Builder for stored claims
pub struct ReintegroBuilder {
    id: ReintegroId,
    afiliado_id: AfiliadoId,
    estado: EstadoReintegro,
    fecha_presentacion: NaiveDate,
    total_presentado: Money,
}

impl ReintegroBuilder {
    /// Creates a builder for a pending claim of the standard affiliate
    pub fn new(id: i32) -> Self {
        Self {
            id: ReintegroId::new(id),
            afiliado_id: AfiliadoFixtures::afiliado_id(),
            estado: EstadoReintegro::Pendiente,
            fecha_presentacion: TemporalFixtures::today(),
            total_presentado: Money::zero(),
        }
    }

    pub fn with_afiliado(mut self, afiliado_id: AfiliadoId) -> Self {
        self.afiliado_id = afiliado_id;
        self
    }

    pub fn with_estado(mut self, estado: EstadoReintegro) -> Self {
        self.estado = estado;
        self
    }

    /// Sets the presentation date
    pub fn presented_on(mut self, date: NaiveDate) -> Self {
        self.fecha_presentacion = date;
        self
    }

    pub fn with_total_presentado(mut self, total: Money) -> Self {
        self.total_presentado = total;
        self
    }

    pub fn build(self) -> Reintegro {
        let now = Utc::now();
        Reintegro {
            id: self.id,
            afiliado_id: self.afiliado_id,
            estado: self.estado,
            fecha_presentacion: self.fecha_presentacion,
            total_presentado: self.total_presentado,
            total_aprobado: Money::zero(),
            adjuntos_confirmados: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Builder for new line items
pub struct NuevoItemBuilder {
    kind: ItemKind,
    fecha_prestacion: NaiveDate,
    monto_presentado: Money,
}

impl Default for NuevoItemBuilder {
    fn default() -> Self {
        Self::practica()
    }
}

impl NuevoItemBuilder {
    /// A consultation item for the standard service date
    pub fn practica() -> Self {
        Self {
            kind: ItemKind::Practica(PracticaFixtures::consulta_id()),
            fecha_prestacion: TemporalFixtures::fecha_prestacion(),
            monto_presentado: MoneyFixtures::consulta(),
        }
    }

    /// A medicine item for the standard service date
    pub fn medicamento() -> Self {
        Self {
            kind: ItemKind::Medicamento(PracticaFixtures::medicamento_id()),
            fecha_prestacion: TemporalFixtures::fecha_prestacion(),
            monto_presentado: MoneyFixtures::medicamento(),
        }
    }

    pub fn with_monto(mut self, monto: Money) -> Self {
        self.monto_presentado = monto;
        self
    }

    pub fn with_fecha(mut self, fecha: NaiveDate) -> Self {
        self.fecha_prestacion = fecha;
        self
    }

    pub fn build(self) -> NuevoItem {
        NuevoItem::new(self.kind, self.fecha_prestacion, self.monto_presentado)
    }
}
