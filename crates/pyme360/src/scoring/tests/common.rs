use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

use crate::scoring::{BusinessProfile, ScoreEngine, ScoringOptions};

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

pub(super) fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub(super) fn engine() -> ScoreEngine {
    ScoreEngine::new(ScoringOptions::default())
}

pub(super) fn profile(value: Value) -> BusinessProfile {
    BusinessProfile::from_value(value).expect("profile parses")
}

pub(super) fn payments(on_time: usize, late: usize) -> Vec<Value> {
    std::iter::repeat(json!({ "fecha": "2026-01-15", "monto": 1200, "estado": "A tiempo" }))
        .take(on_time)
        .chain(
            std::iter::repeat(json!({ "fecha": "2026-02-15", "monto": 1200, "estado": "Atrasado 10 días" }))
                .take(late),
        )
        .collect()
}

/// One loan opened exactly ten years before `as_of`, twelve on-time
/// payments, 5% utilization and no recent applications.
pub(super) fn single_account_document() -> Value {
    json!({
        "informacion_general": {
            "nombre_empresa": "Textiles Andinos",
            "fecha_fundacion": "2012-03-01",
            "tamano_empresa": "Pequeña",
            "sector": "Manufactura",
            "numero_empleados": 35
        },
        "historial_crediticio": {
            "cuentas_credito": [{
                "id": "CC-001",
                "tipo": "Préstamo",
                "entidad": "Banco Central",
                "fecha_apertura": "2016-10-19",
                "saldo_actual": 500,
                "limite_credito": 10000,
                "historial_pagos": payments(12, 0)
            }],
            "credito_proveedores": [],
            "solicitudes_credito_recientes": []
        }
    })
}

pub(super) fn single_account_profile() -> BusinessProfile {
    profile(single_account_document())
}

pub(super) fn stored_trust_document() -> Value {
    let mut document = single_account_document();
    document["pyme360_trust_score"] = json!({
        "calificacion_global": 84,
        "componentes": {
            "sostenibilidad": { "puntuacion": 80, "metricas": [], "iniciativas": [{ "iniciativa": "Reciclaje" }] },
            "cumplimiento_fiscal": { "puntuacion": 90, "metricas": [], "historial": [] },
            "practicas_laborales": { "puntuacion": 85, "metricas": [], "iniciativas": [] },
            "estabilidad_financiera": { "puntuacion": 75, "metricas": [], "tendencias": [] },
            "puntualidad_pagos": { "puntuacion": 95, "metricas": [], "historial": [] },
            "innovacion": { "puntuacion": 70, "metricas": [], "iniciativas": [] }
        }
    });
    document
}
