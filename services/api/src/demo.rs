use crate::infra::seeded_rng;
use chrono::{Local, NaiveDate};
use clap::Args;
use pyme360::config::AppConfig;
use pyme360::error::AppError;
use pyme360::scoring::profile::CreditHistory;
use pyme360::scoring::{
    BusinessProfile, CachePolicy, CreditScoreResult, ScoreEngine, TrendGranularity,
    TrustScoreResult,
};
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScoreKind {
    Credit,
    Trust,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Profile document (JSON) to score
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Scoring date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Seed for estimated components. Overrides APP_SCORE_SEED.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Ignore scores already stored in the profile
    #[arg(long)]
    pub(crate) force_recompute: bool,
    /// Report the trust trend by quarter instead of by month
    #[arg(long)]
    pub(crate) quarterly: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Scoring date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Seed for estimated components
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) fn run_score(kind: ScoreKind, args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        profile,
        as_of,
        seed,
        force_recompute,
        quarterly,
    } = args;

    let config = AppConfig::load()?;
    let raw = std::fs::read_to_string(&profile)?;
    let document: serde_json::Value = serde_json::from_str(&raw)?;
    let profile = BusinessProfile::from_value(document)?;

    let mut engine = ScoreEngine::new(config.scoring.options())
        .with_cache_policy(CachePolicy::from_force_recompute(force_recompute));
    if quarterly {
        engine = engine.with_trend(TrendGranularity::Quarterly);
    }

    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let mut rng = seeded_rng(seed.or(config.scoring.seed));

    let rendered = match kind {
        ScoreKind::Credit => {
            serde_json::to_string_pretty(&engine.credit_score(&profile, as_of, &mut rng)?)?
        }
        ScoreKind::Trust => {
            serde_json::to_string_pretty(&engine.trust_score(&profile, as_of, &mut rng)?)?
        }
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { as_of, seed } = args;

    let config = AppConfig::load()?;
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let mut rng = seeded_rng(seed.or(config.scoring.seed));

    let profile = BusinessProfile::from_value(demo_profile())?;
    let engine = ScoreEngine::new(config.scoring.options());

    println!("PyME360 scoring demo ({as_of})");
    println!("Sample business: Textiles Andinos S.A.S. (small textile manufacturer)");

    if let Some(history) = &profile.credit_history {
        println!("\nCredit lines:");
        for line in credit_lines(history) {
            println!("  - {line}");
        }
    }

    match engine.credit_score(&profile, as_of, &mut rng) {
        Ok(result) => render_credit(&result),
        Err(err) => println!("\nCredit score unavailable: {err}"),
    }

    match engine.trust_score(&profile, as_of, &mut rng) {
        Ok(result) => render_trust(&result),
        Err(err) => println!("\nTrust score unavailable: {err}"),
    }

    Ok(())
}

fn render_credit(result: &CreditScoreResult) {
    println!(
        "\nCredit score: {} ({}) [{:?}]",
        result.score, result.tier.name, result.basis
    );
    println!("  {}", result.tier.description);
    println!("Components:");
    for component in &result.components {
        let metric = component
            .metric
            .map(|value| format!(" | measured {value:.1}"))
            .unwrap_or_default();
        println!(
            "  - {:<20} {:>3} x {:.2} [{:?}]{}",
            component.factor.key(),
            component.score,
            component.weight,
            component.basis,
            metric
        );
    }

    let payments = &result.payments;
    println!(
        "Payments: {} recorded | {} on time | {} late | {} unclassified",
        payments.total, payments.on_time, payments.late, payments.unclassified
    );
    if let Some(pct) = payments.on_time_pct {
        println!("  {pct:.1}% of classified payments on time");
    }
    println!(
        "Incidents: {} ({} open, {:.0} total)",
        result.incidents.count, result.incidents.open, result.incidents.total_amount
    );

    let trend: Vec<String> = result
        .history
        .iter()
        .map(|point| format!("{} {}", point.label, point.score))
        .collect();
    println!("Trend: {}", trend.join(" -> "));
}

fn credit_lines(history: &CreditHistory) -> Vec<String> {
    fn or_unknown(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("unknown")
    }

    let accounts = history.accounts.iter().map(|account| {
        format!(
            "{} {} with {}",
            or_unknown(&account.id),
            or_unknown(&account.kind),
            or_unknown(&account.lender)
        )
    });
    let suppliers = history.supplier_credits.iter().map(|supplier| {
        format!(
            "{} trade credit from {} ({})",
            or_unknown(&supplier.id),
            or_unknown(&supplier.supplier),
            or_unknown(&supplier.payment_terms)
        )
    });
    let applications = history.applications.iter().map(|application| {
        format!(
            "application {} for {} with {}: {:.0} [{}]",
            or_unknown(&application.date),
            or_unknown(&application.kind),
            or_unknown(&application.lender),
            application.amount.unwrap_or(0.0),
            or_unknown(&application.status)
        )
    });
    let incidents = history.incidents.iter().map(|incident| {
        let state = if incident.is_resolved() { "resolved" } else { "open" };
        format!(
            "{state} incident with {}: {}",
            or_unknown(&incident.lender),
            or_unknown(&incident.details)
        )
    });

    accounts
        .chain(suppliers)
        .chain(applications)
        .chain(incidents)
        .collect()
}

fn render_trust(result: &TrustScoreResult) {
    let level = result
        .level
        .map(|level| format!("{level:?}"))
        .unwrap_or_else(|| "no tier".to_string());
    println!("\nTrust score: {}/100 ({level})", result.global_score);
    println!("Dimensions:");
    for component in &result.components {
        println!(
            "  - {:<20} {:>3} x {:.2} [{:?}]",
            component.dimension.key(),
            component.score,
            component.weight,
            component.basis
        );
    }

    if result.benefits.is_empty() {
        println!("Benefits: none unlocked yet");
    } else {
        println!("Benefits:");
        for benefit in &result.benefits {
            println!(
                "  - {} ({}): {}",
                benefit.name, benefit.provider, benefit.detail
            );
        }
    }

    let trend: Vec<String> = result
        .historical_trend
        .iter()
        .map(|point| format!("{} {}", point.label, point.score))
        .collect();
    println!("Trend: {}", trend.join(" -> "));
}

fn demo_profile() -> serde_json::Value {
    json!({
        "informacion_general": {
            "nombre_empresa": "Textiles Andinos S.A.S.",
            "fecha_fundacion": "2014-08-20",
            "tamano_empresa": "Pequeña",
            "sector": "Manufactura textil",
            "numero_empleados": 42
        },
        "historial_crediticio": {
            "cuentas_credito": [
                {
                    "id": "CRE001",
                    "tipo": "Préstamo",
                    "entidad": "Bancolombia",
                    "fecha_apertura": "2018-05-10",
                    "saldo_actual": 125000000,
                    "limite_credito": 450000000,
                    "historial_pagos": [
                        { "fecha": "2023-01-15", "monto": 9375000, "estado": "a tiempo" },
                        { "fecha": "2023-02-15", "monto": 9375000, "estado": "a tiempo" },
                        { "fecha": "2023-03-15", "monto": 9375000, "estado": "a tiempo" }
                    ]
                }
            ],
            "credito_proveedores": [
                {
                    "id": "PROV001",
                    "proveedor": "TextilMax",
                    "terminos_pago": "30 días",
                    "limite_credito": 120000000,
                    "saldo_actual": 45000000,
                    "historial_pagos": [
                        { "fecha": "2023-01-30", "monto": 15000000, "estado": "a tiempo" },
                        { "fecha": "2023-02-28", "monto": 20000000, "estado": "a tiempo" },
                        { "fecha": "2023-03-30", "monto": 18000000, "estado": "a tiempo" }
                    ]
                }
            ],
            "solicitudes_credito_recientes": [
                {
                    "fecha": "2023-06-12",
                    "entidad": "Banco de Occidente",
                    "tipo": "Línea de Crédito",
                    "monto": 300000000,
                    "estado": "aprobado"
                }
            ],
            "incidentes_crediticios": [
                {
                    "tipo": "Pago tardío",
                    "fecha": "2021-04-10",
                    "entidad": "Banco de Bogotá",
                    "detalles": "Cuota pagada con 12 días de retraso",
                    "monto": 4200000,
                    "estado": "resuelto"
                }
            ]
        },
        "margen_beneficio": {
            "datos_mensuales": [
                { "mes": "2023-01", "margen_neto": 0.14 },
                { "mes": "2023-02", "margen_neto": 0.17 },
                { "mes": "2023-03", "margen_neto": 0.19 }
            ]
        }
    })
}
