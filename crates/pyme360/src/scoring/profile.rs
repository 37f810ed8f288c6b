use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::credit::CreditScoreResult;
use super::lenient;

/// Business profile document as stored by the persistence layer.
///
/// Every section is optional. Field names follow the stored (Spanish) keys.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BusinessProfile {
    #[serde(
        default,
        rename = "informacion_general",
        deserialize_with = "lenient::section"
    )]
    pub general: Option<GeneralInfo>,
    #[serde(
        default,
        rename = "historial_crediticio",
        deserialize_with = "lenient::section"
    )]
    pub credit_history: Option<CreditHistory>,
    #[serde(
        default,
        rename = "margen_beneficio",
        deserialize_with = "lenient::section"
    )]
    pub profit_margin: Option<ProfitMargin>,
    #[serde(
        default,
        rename = "pyme360_trust_score",
        deserialize_with = "lenient::section"
    )]
    pub stored_trust_score: Option<StoredTrustScore>,
    #[serde(default, rename = "credit_score", deserialize_with = "lenient::section")]
    pub stored_credit_score: Option<CreditScoreResult>,
}

impl BusinessProfile {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// True when the document carries none of the sections the engine reads.
    pub fn is_empty(&self) -> bool {
        self.general.is_none()
            && self.credit_history.is_none()
            && self.profit_margin.is_none()
            && self.stored_trust_score.is_none()
            && self.stored_credit_score.is_none()
    }

    pub(crate) fn founded_on(&self) -> Option<NaiveDate> {
        self.general
            .as_ref()
            .and_then(|general| general.founded_on.as_deref())
            .and_then(parse_date)
    }

    pub(crate) fn company_age_years(&self, as_of: NaiveDate) -> Option<f64> {
        self.founded_on()
            .and_then(|founded| years_between(founded, as_of))
    }

    pub(crate) fn company_size(&self) -> CompanySize {
        self.general
            .as_ref()
            .map(|general| general.size)
            .unwrap_or_default()
    }
}

/// `informacion_general` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeneralInfo {
    #[serde(default, rename = "nombre_empresa", deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, rename = "fecha_fundacion", deserialize_with = "lenient::text")]
    pub founded_on: Option<String>,
    #[serde(default, rename = "tamano_empresa", deserialize_with = "company_size")]
    pub size: CompanySize,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sector: Option<String>,
    #[serde(default, rename = "numero_empleados", deserialize_with = "lenient::number")]
    pub employees: Option<f64>,
}

/// Company size category, parsed from the free-text size label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompanySize {
    Micro,
    Small,
    Medium,
    Large,
    #[default]
    Unknown,
}

impl CompanySize {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "micro" | "microempresa" => Self::Micro,
            "pequeña" | "pequena" | "pequeña empresa" | "small" => Self::Small,
            "mediana" | "mediana empresa" | "medium" => Self::Medium,
            "grande" | "gran empresa" | "large" => Self::Large,
            _ => Self::Unknown,
        }
    }
}

fn company_size<'de, D>(deserializer: D) -> Result<CompanySize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = lenient::text(deserializer)?;
    Ok(raw.as_deref().map(CompanySize::parse).unwrap_or_default())
}

/// `historial_crediticio` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreditHistory {
    #[serde(default, rename = "cuentas_credito", deserialize_with = "lenient::list")]
    pub accounts: Vec<CreditAccount>,
    #[serde(
        default,
        rename = "credito_proveedores",
        deserialize_with = "lenient::list"
    )]
    pub supplier_credits: Vec<SupplierCredit>,
    #[serde(
        default,
        rename = "solicitudes_credito_recientes",
        deserialize_with = "lenient::list"
    )]
    pub applications: Vec<CreditApplication>,
    #[serde(
        default,
        rename = "incidentes_crediticios",
        deserialize_with = "lenient::list"
    )]
    pub incidents: Vec<CreditIncident>,
}

impl CreditHistory {
    pub fn has_accounts(&self) -> bool {
        !self.accounts.is_empty() || !self.supplier_credits.is_empty()
    }

    /// Payment records across bank accounts and supplier credit lines.
    pub fn payments(&self) -> impl Iterator<Item = &PaymentRecord> {
        self.accounts
            .iter()
            .flat_map(|account| account.payments.iter())
            .chain(
                self.supplier_credits
                    .iter()
                    .flat_map(|supplier| supplier.payments.iter()),
            )
    }
}

/// Bank credit account (`cuentas_credito` entry).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreditAccount {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, rename = "tipo", deserialize_with = "lenient::text")]
    pub kind: Option<String>,
    #[serde(default, rename = "entidad", deserialize_with = "lenient::text")]
    pub lender: Option<String>,
    #[serde(default, rename = "fecha_apertura", deserialize_with = "lenient::text")]
    pub opened_on: Option<String>,
    #[serde(default, rename = "saldo_actual", deserialize_with = "lenient::number")]
    pub balance: Option<f64>,
    #[serde(default, rename = "limite_credito", deserialize_with = "lenient::number")]
    pub limit: Option<f64>,
    #[serde(default, rename = "historial_pagos", deserialize_with = "lenient::list")]
    pub payments: Vec<PaymentRecord>,
}

/// Trade credit extended by a supplier (`credito_proveedores` entry).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SupplierCredit {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, rename = "proveedor", deserialize_with = "lenient::text")]
    pub supplier: Option<String>,
    #[serde(default, rename = "terminos_pago", deserialize_with = "lenient::text")]
    pub payment_terms: Option<String>,
    #[serde(default, rename = "saldo_actual", deserialize_with = "lenient::number")]
    pub balance: Option<f64>,
    #[serde(default, rename = "limite_credito", deserialize_with = "lenient::number")]
    pub limit: Option<f64>,
    #[serde(default, rename = "historial_pagos", deserialize_with = "lenient::list")]
    pub payments: Vec<PaymentRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PaymentRecord {
    #[serde(default, rename = "fecha", deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(default, rename = "monto", deserialize_with = "lenient::number")]
    pub amount: Option<f64>,
    #[serde(default, rename = "estado", deserialize_with = "payment_status")]
    pub status: PaymentStatus,
}

/// Classified payment status. Unrecognized text stays `Unknown` and is not
/// counted as on time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    OnTime,
    Late { days: Option<u32> },
    Unknown(String),
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl PaymentStatus {
    const ON_TIME: [&'static str; 6] = ["a tiempo", "puntual", "on time", "on-time", "ontime", "paid"];
    const LATE: [&'static str; 5] = ["atrasado", "retrasado", "late", "mora", "vencido"];

    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        if Self::ON_TIME.contains(&normalized.as_str()) {
            return Self::OnTime;
        }
        if Self::LATE.iter().any(|marker| normalized.contains(marker)) {
            return Self::Late {
                days: first_integer(&normalized),
            };
        }
        Self::Unknown(raw.to_string())
    }
}

fn payment_status<'de, D>(deserializer: D) -> Result<PaymentStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = lenient::text(deserializer)?;
    Ok(raw.as_deref().map(PaymentStatus::parse).unwrap_or_default())
}

fn first_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|ch| !ch.is_ascii_digit())
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// `solicitudes_credito_recientes` entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreditApplication {
    #[serde(default, rename = "fecha", deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(default, rename = "entidad", deserialize_with = "lenient::text")]
    pub lender: Option<String>,
    #[serde(default, rename = "tipo", deserialize_with = "lenient::text")]
    pub kind: Option<String>,
    #[serde(default, rename = "monto", deserialize_with = "lenient::number")]
    pub amount: Option<f64>,
    #[serde(default, rename = "estado", deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

/// `incidentes_crediticios` entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreditIncident {
    #[serde(default, rename = "tipo", deserialize_with = "lenient::text")]
    pub kind: Option<String>,
    #[serde(default, rename = "fecha", deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(default, rename = "entidad", deserialize_with = "lenient::text")]
    pub lender: Option<String>,
    #[serde(default, rename = "detalles", deserialize_with = "lenient::text")]
    pub details: Option<String>,
    #[serde(default, rename = "monto", deserialize_with = "lenient::number")]
    pub amount: Option<f64>,
    #[serde(default, rename = "estado", deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

impl CreditIncident {
    pub fn is_resolved(&self) -> bool {
        self.status
            .as_deref()
            .map(|status| {
                let status = status.trim().to_lowercase();
                ["resuelto", "resolved", "cerrado", "closed", "pagado"]
                    .iter()
                    .any(|marker| status.contains(marker))
            })
            .unwrap_or(false)
    }
}

/// `margen_beneficio` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfitMargin {
    #[serde(default, rename = "datos_mensuales", deserialize_with = "lenient::list")]
    pub monthly: Vec<MonthlyMargin>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MonthlyMargin {
    #[serde(default, rename = "mes", deserialize_with = "lenient::text")]
    pub month: Option<String>,
    #[serde(default, rename = "margen_neto", deserialize_with = "lenient::number")]
    pub net_margin: Option<f64>,
}

/// Previously computed trust score persisted alongside the profile.
///
/// Reads both the engine's own output keys and the legacy document keys.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StoredTrustScore {
    #[serde(
        default,
        alias = "calificacion_global",
        deserialize_with = "lenient::number"
    )]
    pub global_score: Option<f64>,
    #[serde(default, alias = "componentes", deserialize_with = "stored_components")]
    pub components: BTreeMap<String, StoredComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StoredComponent {
    #[serde(default, alias = "puntuacion", deserialize_with = "lenient::number")]
    pub score: Option<f64>,
    #[serde(default, alias = "metricas", deserialize_with = "lenient::list")]
    pub metrics: Vec<Value>,
    #[serde(
        default,
        alias = "iniciativas",
        alias = "historial",
        alias = "tendencias",
        deserialize_with = "lenient::list"
    )]
    pub details: Vec<Value>,
}

/// Accepts the component collection either keyed by dimension or as the
/// engine's own output list (`[{ "dimension": ..., "score": ... }]`).
fn stored_components<'de, D>(deserializer: D) -> Result<BTreeMap<String, StoredComponent>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| {
                let key = item.get("dimension")?.as_str()?.to_string();
                let component = serde_json::from_value::<StoredComponent>(item).ok()?;
                Some((key, component))
            })
            .collect()),
        other => lenient::map(other).map_err(serde::de::Error::custom),
    }
}

/// Parses `YYYY-MM-DD`, tolerating a trailing time component.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Whole calendar years between the dates plus the fractional remainder.
///
/// Returns `None` when `from` lies after `to`.
pub(crate) fn years_between(from: NaiveDate, to: NaiveDate) -> Option<f64> {
    if from > to {
        return None;
    }

    let mut whole = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        whole -= 1;
    }
    let whole = u32::try_from(whole.max(0)).ok()?;
    let anniversary = from.checked_add_months(Months::new(whole * 12))?;
    let remainder = (to - anniversary).num_days().max(0) as f64 / 365.25;

    Some(whole as f64 + remainder)
}
