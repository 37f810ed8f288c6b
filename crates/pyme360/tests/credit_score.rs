use chrono::NaiveDate;
use pyme360::scoring::{
    BusinessProfile, CreditBand, CreditFactor, EmptyHistoryPolicy, ScoreBasis, ScoreEngine,
    ScoreError, ScoringOptions,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid as_of date")
}

fn established_manufacturer() -> BusinessProfile {
    BusinessProfile::from_value(json!({
        "informacion_general": {
            "nombre_empresa": "Muebles del Valle",
            "fecha_fundacion": "2008-05-12",
            "tamano_empresa": "Mediana",
            "sector": "Manufactura",
            "numero_empleados": 120
        },
        "historial_crediticio": {
            "cuentas_credito": [
                {
                    "tipo": "Línea de crédito",
                    "entidad": "Banco Nacional",
                    "fecha_apertura": "2015-02-01",
                    "saldo_actual": 18000,
                    "limite_credito": 60000,
                    "historial_pagos": [
                        { "fecha": "2026-07-05", "monto": 2500, "estado": "A tiempo" },
                        { "fecha": "2026-08-05", "monto": 2500, "estado": "A tiempo" },
                        { "fecha": "2026-09-05", "monto": 2500, "estado": "Atrasado 5 días" }
                    ]
                },
                {
                    "tipo": "Préstamo",
                    "entidad": "Cooperativa Sur",
                    "fecha_apertura": "2021-02-01",
                    "saldo_actual": 12000,
                    "limite_credito": 40000,
                    "historial_pagos": [
                        { "fecha": "2026-08-10", "monto": 900, "estado": "Puntual" },
                        { "fecha": "2026-09-10", "monto": 900, "estado": "Puntual" }
                    ]
                }
            ],
            "credito_proveedores": [
                {
                    "proveedor": "Maderas Finas",
                    "saldo_actual": 0,
                    "limite_credito": 0,
                    "historial_pagos": [
                        { "fecha": "2026-09-20", "monto": 3000, "estado": "A tiempo" },
                        { "fecha": "2026-10-01", "monto": 3000, "estado": "en revisión" }
                    ]
                }
            ],
            "solicitudes_credito_recientes": [
                { "fecha": "2026-03-14", "entidad": "Banco Nacional", "tipo": "Leasing", "monto": 50000, "estado": "Aprobada" },
                { "fecha": "2026-09-01", "entidad": "Fintech Uno", "tipo": "Factoraje", "monto": 8000, "estado": "En revisión" }
            ],
            "incidentes_crediticios": [
                { "tipo": "Pago tardío", "fecha": "2026-09-05", "entidad": "Banco Nacional", "monto": 2500, "estado": "Resuelto" }
            ]
        }
    }))
    .expect("profile parses")
}

#[test]
fn measured_profile_combines_all_five_components() {
    let engine = ScoreEngine::default();
    let result = engine
        .credit_score(&established_manufacturer(), as_of(), &mut StdRng::seed_from_u64(3))
        .expect("credit score");

    // 5 of 6 classified payments on time, 30% utilization, accounts of
    // 11.7 and 5.7 years, three credit types, two recent applications.
    let scores: Vec<(CreditFactor, u8)> = result
        .components
        .iter()
        .map(|component| (component.factor, component.score))
        .collect();
    assert_eq!(
        scores,
        vec![
            (CreditFactor::PaymentHistory, 60),
            (CreditFactor::CreditUtilization, 80),
            (CreditFactor::HistoryLength, 90),
            (CreditFactor::CreditMix, 90),
            (CreditFactor::NewApplications, 80),
        ]
    );
    // 21 + 24 + 13.5 + 9 + 8 = 75.5 weighted points
    assert_eq!(result.score, 715);
    assert_eq!(result.tier.band, CreditBand::Good);
    assert_eq!(result.basis, ScoreBasis::Measured);

    assert_eq!(result.payments.total, 7);
    assert_eq!(result.payments.unclassified, 1);
    assert_eq!(result.incidents.count, 1);
    assert_eq!(result.incidents.open, 0);
}

#[test]
fn result_serializes_with_snake_case_tags() {
    let result = ScoreEngine::default()
        .credit_score(&established_manufacturer(), as_of(), &mut StdRng::seed_from_u64(3))
        .expect("credit score");
    let value = serde_json::to_value(&result).expect("serializes");

    assert_eq!(value["basis"], json!("measured"));
    assert_eq!(value["components"][0]["factor"], json!("payment_history"));
    assert_eq!(value["components"][0]["weight"], json!(0.35));
    assert_eq!(value["tier"]["name"], json!("Good"));
    assert_eq!(value["history"].as_array().map(Vec::len), Some(6));
    assert_eq!(value["as_of"], json!("2026-10-19"));
}

#[test]
fn neutral_policy_scores_empty_history_at_midpoint() {
    let engine = ScoreEngine::new(ScoringOptions {
        empty_history: EmptyHistoryPolicy::Neutral,
        ..ScoringOptions::default()
    });
    let profile = BusinessProfile::from_value(json!({
        "informacion_general": { "tamano_empresa": "Grande" },
        "historial_crediticio": { "cuentas_credito": [], "credito_proveedores": [] }
    }))
    .expect("profile parses");

    let result = engine
        .credit_score(&profile, as_of(), &mut StdRng::seed_from_u64(3))
        .expect("credit score");
    assert_eq!(result.score, 575);
    assert!(result
        .components
        .iter()
        .all(|component| component.score == 50 && component.metric.is_none()));
}

#[test]
fn profile_without_history_section_fails() {
    let profile = BusinessProfile::from_value(json!({
        "informacion_general": { "nombre_empresa": "Sin Historial" }
    }))
    .expect("profile parses");

    let result = ScoreEngine::default().credit_score(&profile, as_of(), &mut StdRng::seed_from_u64(3));
    assert!(matches!(result, Err(ScoreError::MissingSection { .. })));
}
