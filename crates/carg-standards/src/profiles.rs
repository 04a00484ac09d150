//! Standardization profiles of the seven deliverable layers, plus the
//! pre-merge profile used for fold lines.

use carg_model::GeometryType;

use crate::domain_cache::Fallback;
use crate::error::StandardsError;
use crate::profile::{DomainRule, EXCLUDED_FIELDS, FieldKind, StandardizationProfile};

/// Sheet name resolved from the raw sheet number.
const FOGLIO: DomainRule = DomainRule {
    target: "Foglio",
    source: "FoglioGeologico",
    table: "d_foglio",
    fallback: Fallback::RawCode,
};

const GEOMORFOLOGIA_MAPPINGS: &[(&str, &str)] = &[
    ("Tipo_G_txt", "Tipo_Gmrf"),
    ("Stato_txt", "Stato"),
    ("Tipol_txt", "Tipologia"),
];

const LINEE_FIELDS: &[&str] = &[
    "Foglio",
    "Fase",
    "Affiora",
    "Tipo_Geo",
    "Contorno",
    "Tipologia",
    "Direzione",
];

const LINEE_MAPPINGS: &[(&str, &str)] = &[
    ("Affior_txt", "Affiora"),
    ("Tipo_g_txt", "Tipo_Geo"),
    ("Cont_txt", "Contorno"),
    ("Tipol_txt", "Tipologia"),
    ("Fase_txt", "Fase"),
];

pub const GEOLOGIA_PUNTI: StandardizationProfile = StandardizationProfile {
    name: "geologia_punti",
    geometry_type: GeometryType::Point,
    field_order: &[
        "Num_Oss",
        "Quota",
        "Foglio",
        "Tipo_Geo",
        "Inclinaz",
        "Asimmetria",
        "Fase",
        "Immersione",
        "Verso",
        "Direzione",
        "Tipologia",
    ],
    field_mappings: &[
        ("Tipo_g_txt", "Tipo_Geo"),
        ("Asimm_txt", "Asimmetria"),
        ("Fase_txt", "Fase"),
        ("Verso_txt", "Verso"),
        ("Tipol_txt", "Tipologia"),
    ],
    domain_fields: &[FOGLIO],
    field_kinds: &[],
    exclusions: EXCLUDED_FIELDS,
};

pub const GEOLOGIA_LINEE: StandardizationProfile = StandardizationProfile {
    name: "geologia_linee",
    geometry_type: GeometryType::Polyline,
    field_order: LINEE_FIELDS,
    field_mappings: LINEE_MAPPINGS,
    domain_fields: &[FOGLIO],
    field_kinds: &[],
    exclusions: EXCLUDED_FIELDS,
};

/// Fold lines before they join `geologia_linee`.
pub const GEOLOGIA_LINEE_PIEGHE: StandardizationProfile = StandardizationProfile {
    name: "geologia_linee_pieghe",
    ..GEOLOGIA_LINEE
};

pub const GEOLOGIA_POLIGONI: StandardizationProfile = StandardizationProfile {
    name: "geologia_poligoni",
    geometry_type: GeometryType::Polygon,
    field_order: &[
        "Pol_Uc",
        "Uc_Lege",
        "Foglio",
        "Tipo_UQ",
        "Stato_UQ",
        "ETA_Super",
        "ETA_Infer",
        "Tipo_UG",
        "Tessitura",
        "Sigla1",
        "Sigla_UG",
        "Nome",
        "Legenda",
        "Sommerso",
        "Direzione",
    ],
    field_mappings: &[
        ("ETA_super", "ETA_Super"),
        ("ETA_infer", "ETA_Infer"),
        ("tipo_ug", "Tipo_UG"),
        ("Sigla_ug", "Sigla_UG"),
        ("Sommerso_", "Sommerso"),
    ],
    domain_fields: &[FOGLIO],
    field_kinds: &[("Sommerso", FieldKind::Flag)],
    exclusions: EXCLUDED_FIELDS,
};

pub const GEOMORFOLOGIA_PUNTI: StandardizationProfile = StandardizationProfile {
    name: "geomorfologia_punti",
    geometry_type: GeometryType::Point,
    field_order: &["Pun_Gmo", "Foglio", "Tipo_Gmrf", "Stato", "Tipologia", "Direzione"],
    field_mappings: GEOMORFOLOGIA_MAPPINGS,
    domain_fields: &[FOGLIO],
    field_kinds: &[],
    exclusions: EXCLUDED_FIELDS,
};

pub const GEOMORFOLOGIA_LINEE: StandardizationProfile = StandardizationProfile {
    name: "geomorfologia_linee",
    geometry_type: GeometryType::Polyline,
    field_order: &["Lin_Gmo", "Label", "Foglio", "Tipo_Gmrf", "Stato", "Tipologia"],
    field_mappings: GEOMORFOLOGIA_MAPPINGS,
    domain_fields: &[FOGLIO],
    field_kinds: &[],
    exclusions: EXCLUDED_FIELDS,
};

pub const GEOMORFOLOGIA_POLIGONI: StandardizationProfile = StandardizationProfile {
    name: "geomorfologia_poligoni",
    geometry_type: GeometryType::Polygon,
    field_order: &["Pol_Gmo", "Foglio", "Tipo_Gmrf", "Stato", "Tipologia", "Direzione"],
    field_mappings: GEOMORFOLOGIA_MAPPINGS,
    domain_fields: &[FOGLIO],
    field_kinds: &[],
    exclusions: EXCLUDED_FIELDS,
};

pub const RISORSE_PROSPEZIONI: StandardizationProfile = StandardizationProfile {
    name: "risorse_prospezioni",
    geometry_type: GeometryType::Point,
    field_order: &["Num_Ris", "Label1", "Label2", "Label3", "Foglio", "Tipo"],
    field_mappings: &[("Tipo_txt", "Tipo")],
    domain_fields: &[FOGLIO],
    field_kinds: &[],
    exclusions: EXCLUDED_FIELDS,
};

/// Every declared profile.
pub const PROFILES: &[StandardizationProfile] = &[
    GEOLOGIA_PUNTI,
    GEOLOGIA_LINEE,
    GEOLOGIA_LINEE_PIEGHE,
    GEOLOGIA_POLIGONI,
    GEOMORFOLOGIA_PUNTI,
    GEOMORFOLOGIA_LINEE,
    GEOMORFOLOGIA_POLIGONI,
    RISORSE_PROSPEZIONI,
];

/// The seven deliverable layers, in output order.
pub const OUTPUT_PROFILES: &[&str] = &[
    "geomorfologia_punti",
    "geomorfologia_poligoni",
    "geomorfologia_linee",
    "risorse_prospezioni",
    "geologia_linee",
    "geologia_punti",
    "geologia_poligoni",
];

pub fn profile(name: &str) -> Result<&'static StandardizationProfile, StandardsError> {
    PROFILES
        .iter()
        .find(|profile| profile.name == name)
        .ok_or_else(|| StandardsError::UnknownProfile(name.to_string()))
}
