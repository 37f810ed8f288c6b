use chrono::NaiveDate;
use pyme360::scoring::{
    BusinessProfile, CachePolicy, ScoreBasis, ScoreEngine, ScoreError, TrendGranularity,
    TrustDimension, TrustLevel,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid as_of date")
}

fn software_startup() -> BusinessProfile {
    BusinessProfile::from_value(json!({
        "informacion_general": {
            "nombre_empresa": "Nube Andina",
            "fecha_fundacion": "2023-01-10",
            "tamano_empresa": "Pequeña",
            "sector": "Tecnología",
            "numero_empleados": 18
        },
        "margen_beneficio": {
            "datos_mensuales": [
                { "mes": "2026-07", "margen_neto": 0.24 },
                { "mes": "2026-08", "margen_neto": 0.26 },
                { "mes": "2026-09", "margen_neto": 0.22 }
            ]
        }
    }))
    .expect("profile parses")
}

#[test]
fn heuristics_stay_inside_dimension_bounds() {
    let engine = ScoreEngine::default();
    for seed in 0..50 {
        let result = engine
            .trust_score(&software_startup(), as_of(), &mut StdRng::seed_from_u64(seed))
            .expect("trust score");

        let innovation = result
            .component(TrustDimension::Innovation)
            .expect("innovation");
        // 65 + 15 (technology) + 10 (under five years) with ±5 jitter
        assert!((85..=90).contains(&innovation.score), "seed {seed}: {}", innovation.score);

        let stability = result
            .component(TrustDimension::FinancialStability)
            .expect("financial stability");
        // 80 + 10 for margins above 20% with ±3 jitter
        assert!((87..=93).contains(&stability.score), "seed {seed}: {}", stability.score);

        assert!(result.global_score <= 100);
        assert_eq!(result.level, TrustLevel::for_score(result.global_score));
    }
}

#[test]
fn stored_legacy_components_round_trip_through_output_shape() {
    let engine = ScoreEngine::default();
    let first = engine
        .trust_score(&software_startup(), as_of(), &mut StdRng::seed_from_u64(8))
        .expect("trust score");

    let mut document = json!({ "informacion_general": { "sector": "Tecnología" } });
    document["pyme360_trust_score"] = serde_json::to_value(&first).expect("serializes");
    let persisted = BusinessProfile::from_value(document).expect("profile parses");

    let reused = engine
        .trust_score(&persisted, as_of(), &mut StdRng::seed_from_u64(9))
        .expect("trust score");

    assert_eq!(reused.global_score, first.global_score);
    for (before, after) in first.components.iter().zip(&reused.components) {
        assert_eq!(after.score, before.score);
        assert_eq!(after.metrics, before.metrics);
        assert_eq!(after.details, before.details);
        assert_eq!(after.basis, ScoreBasis::Stored);
    }
}

#[test]
fn force_recompute_draws_fresh_estimates() {
    let persisted = BusinessProfile::from_value(json!({
        "informacion_general": { "fecha_fundacion": "2000-01-01" },
        "pyme360_trust_score": {
            "componentes": {
                "sostenibilidad": { "puntuacion": 99 }
            }
        }
    }))
    .expect("profile parses");

    let result = ScoreEngine::default()
        .with_cache_policy(CachePolicy::Recompute)
        .trust_score(&persisted, as_of(), &mut StdRng::seed_from_u64(4))
        .expect("trust score");

    let sustainability = result
        .component(TrustDimension::Sustainability)
        .expect("sustainability");
    assert_eq!(sustainability.basis, ScoreBasis::Estimated);
    assert!(sustainability.score <= 90);
}

#[test]
fn benefits_match_level() {
    let result = ScoreEngine::default()
        .with_trend(TrendGranularity::Quarterly)
        .trust_score(&software_startup(), as_of(), &mut StdRng::seed_from_u64(21))
        .expect("trust score");

    let expected = TrustLevel::ALL
        .iter()
        .filter(|level| result.global_score >= level.threshold())
        .count();
    let unlocked: std::collections::BTreeSet<TrustLevel> =
        result.benefits.iter().map(|benefit| benefit.level).collect();
    assert_eq!(unlocked.len(), expected);
    assert_eq!(result.historical_trend.len(), 4);
}

#[test]
fn document_without_known_sections_is_empty() {
    let profile = BusinessProfile::from_value(json!({ "username": "nube", "email": "a@b.c" }))
        .expect("profile parses");
    let result = ScoreEngine::default().trust_score(&profile, as_of(), &mut StdRng::seed_from_u64(1));
    assert_eq!(result.err(), Some(ScoreError::EmptyProfile));
}
