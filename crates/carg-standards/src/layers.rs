//! Catalogue of the CARG input layers and how each one is prepared.

use carg_model::GeometryType;

use crate::error::StandardsError;

/// Copies the first available source field into `target`.
#[derive(Debug, Clone, Copy)]
pub struct FieldRename {
    pub target: &'static str,
    pub sources: &'static [&'static str],
}

const fn keep(name: &'static str) -> FieldRename {
    FieldRename {
        target: name,
        sources: &[],
    }
}

const fn rename(target: &'static str, sources: &'static [&'static str]) -> FieldRename {
    FieldRename { target, sources }
}

impl FieldRename {
    /// Candidate source names; a rename without sources reads its own target.
    pub fn candidates(&self) -> Vec<&'static str> {
        if self.sources.is_empty() {
            vec![self.target]
        } else {
            self.sources.to_vec()
        }
    }
}

/// Decodes a code field of the layer into a staging text field.
#[derive(Debug, Clone, Copy)]
pub struct LayerDomain {
    pub target: &'static str,
    pub source: &'static str,
    pub table: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct AuxiliaryColumn {
    pub target: &'static str,
    pub column: &'static str,
    pub domain: Option<&'static str>,
}

/// Attributes pulled from an auxiliary table joined on a key field.
#[derive(Debug, Clone, Copy)]
pub struct AuxiliaryJoin {
    pub table: &'static str,
    /// Key field on the feature.
    pub key_field: &'static str,
    /// Key column in the auxiliary table.
    pub key_column: &'static str,
    pub columns: &'static [AuxiliaryColumn],
}

/// Submerged-unit flag derived from a coded field.
#[derive(Debug, Clone, Copy)]
pub struct SommersoRule {
    pub source: &'static str,
    pub target: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct LayerSpec {
    pub id: &'static str,
    /// Dataset names tried in order; exact match first, then substring.
    pub patterns: &'static [&'static str],
    pub geometry_type: GeometryType,
    /// Profile applied right after preparation.
    pub profile: &'static str,
    /// Deliverable layer the records end up in.
    pub output: &'static str,
    /// Field identifying a feature in quality reports.
    pub id_field: Option<&'static str>,
    pub renames: &'static [FieldRename],
    pub domains: &'static [LayerDomain],
    pub fixed_values: &'static [(&'static str, &'static str)],
    pub auxiliary: &'static [AuxiliaryJoin],
    pub sommerso: Option<SommersoRule>,
}

impl LayerSpec {
    pub fn tables(&self) -> Vec<&'static str> {
        let mut tables: Vec<&'static str> = self.domains.iter().map(|domain| domain.table).collect();
        for join in self.auxiliary {
            tables.extend(join.columns.iter().filter_map(|column| column.domain));
        }
        tables.sort_unstable();
        tables.dedup();
        tables
    }

    pub fn auxiliary_tables(&self) -> Vec<&'static str> {
        self.auxiliary.iter().map(|join| join.table).collect()
    }
}

/// Layers contributing to one deliverable, in append order.
#[derive(Debug, Clone, Copy)]
pub struct MergeGroup {
    pub output: &'static str,
    pub members: &'static [&'static str],
}

const STATO: LayerDomain = LayerDomain {
    target: "Stato_txt",
    source: "Stato",
    table: "d_stato",
};

const TIPOLOGIA: LayerDomain = LayerDomain {
    target: "Tipol_txt",
    source: "Tipologia",
    table: "d_tipologia",
};

const FASE: LayerDomain = LayerDomain {
    target: "Fase_txt",
    source: "Fase",
    table: "d_fase",
};

/// Declared processing order.
pub const LAYER_SPECS: &[LayerSpec] = &[
    LayerSpec {
        id: "ST010Point",
        patterns: &["ST010Point", "main.ST010Point"],
        geometry_type: GeometryType::Point,
        profile: "geomorfologia_punti",
        output: "geomorfologia_punti",
        id_field: Some("Pun_Gmo"),
        renames: &[
            rename("Tipo_Gmrf", &["Tipo"]),
            keep("Tipologia"),
            keep("Stato"),
            keep("Pun_Gmo"),
            rename("Direzione", &["Direzio", "Direzione"]),
        ],
        domains: &[
            LayerDomain {
                target: "Tipo_G_txt",
                source: "Tipo_Gmrf",
                table: "d_10_tipo",
            },
            TIPOLOGIA,
            STATO,
        ],
        fixed_values: &[],
        auxiliary: &[],
        sommerso: None,
    },
    LayerSpec {
        id: "ST011Polygon",
        patterns: &["ST011Polygon", "main.ST011Polygon"],
        geometry_type: GeometryType::Polygon,
        profile: "geomorfologia_poligoni",
        output: "geomorfologia_poligoni",
        id_field: Some("Pol_Gmo"),
        renames: &[
            rename("Tipo_Gmrf", &["Tipo"]),
            keep("Tipologia"),
            keep("Stato"),
            keep("Pol_Gmo"),
            rename("Direzione", &["Direzio", "Direzione"]),
        ],
        domains: &[
            LayerDomain {
                target: "Tipo_G_txt",
                source: "Tipo_Gmrf",
                table: "d_11_tipo",
            },
            TIPOLOGIA,
            STATO,
        ],
        fixed_values: &[],
        auxiliary: &[],
        sommerso: None,
    },
    LayerSpec {
        id: "ST012Polyline",
        patterns: &["ST012Polyline", "main.ST012Polyline"],
        geometry_type: GeometryType::Polyline,
        profile: "geomorfologia_linee",
        output: "geomorfologia_linee",
        id_field: Some("Lin_Gmo"),
        renames: &[
            rename("Tipo_Gmrf", &["Tipo"]),
            keep("Tipologia"),
            keep("Stato"),
            keep("Lin_Gmo"),
            keep("Label"),
        ],
        domains: &[
            LayerDomain {
                target: "Tipo_G_txt",
                source: "Tipo_Gmrf",
                table: "d_12_tipo",
            },
            TIPOLOGIA,
            STATO,
        ],
        fixed_values: &[],
        auxiliary: &[],
        sommerso: None,
    },
    LayerSpec {
        id: "ST013Point",
        patterns: &["ST013Point", "main.ST013Point"],
        geometry_type: GeometryType::Point,
        profile: "risorse_prospezioni",
        output: "risorse_prospezioni",
        id_field: Some("Num_Ris"),
        renames: &[
            rename("Num_Ris", &["Num_Ris", "NUMERORIS"]),
            keep("Label1"),
            keep("Label2"),
            keep("Label3"),
            rename("Tipo", &["Tipo"]),
        ],
        domains: &[LayerDomain {
            target: "Tipo_txt",
            source: "Tipo",
            table: "d_13_tipo",
        }],
        fixed_values: &[],
        auxiliary: &[],
        sommerso: None,
    },
    LayerSpec {
        id: "ST018Polyline",
        patterns: &["ST018Polyline", "main.ST018Polyline"],
        geometry_type: GeometryType::Polyline,
        profile: "geologia_linee",
        output: "geologia_linee",
        id_field: None,
        renames: &[
            rename("Tipo_geo", &["Tipo"]),
            keep("Tipologia"),
            keep("Contorno"),
            keep("Affiora"),
            rename("Direzione", &["Direzio", "Direzione"]),
        ],
        domains: &[
            LayerDomain {
                target: "Tipo_g_txt",
                source: "Tipo_geo",
                table: "d_st018_line",
            },
            TIPOLOGIA,
            LayerDomain {
                target: "Cont_txt",
                source: "Contorno",
                table: "d_st018_contorno",
            },
            LayerDomain {
                target: "Affior_txt",
                source: "Affiora",
                table: "d_st018_affiora",
            },
        ],
        fixed_values: &[("Fase_txt", "non applicabile/non classificabile")],
        auxiliary: &[],
        sommerso: None,
    },
    LayerSpec {
        id: "ST021Polyline",
        patterns: &["ST021Polyline", "main.ST021Polyline"],
        geometry_type: GeometryType::Polyline,
        profile: "geologia_linee_pieghe",
        output: "geologia_linee",
        id_field: None,
        renames: &[
            rename("Tipo_geo", &["Tipo"]),
            keep("Tipologia"),
            keep("Fase"),
            rename("Direzione", &["Direzio", "Direzione"]),
        ],
        domains: &[
            LayerDomain {
                target: "Tipo_g_txt",
                source: "Tipo_geo",
                table: "d_st021",
            },
            TIPOLOGIA,
            FASE,
        ],
        fixed_values: &[("Affior_txt", "non applicabile"), ("Cont_txt", "no")],
        auxiliary: &[],
        sommerso: None,
    },
    LayerSpec {
        id: "ST019Point",
        patterns: &["ST019Point", "main.ST019Point"],
        geometry_type: GeometryType::Point,
        profile: "geologia_punti",
        output: "geologia_punti",
        id_field: Some("Num_Oss"),
        renames: &[
            rename("Tipo_geo", &["Tipo"]),
            keep("Tipologia"),
            keep("Fase"),
            keep("Verso"),
            keep("Asimmetria"),
            keep("Num_Oss"),
            keep("Quota"),
            rename("Inclinaz", &["Inclina", "Inclinaz"]),
            rename("Immersione", &["Immersio", "Immersione"]),
            rename("Direzione", &["Direzio", "Direzione"]),
        ],
        domains: &[
            LayerDomain {
                target: "Tipo_g_txt",
                source: "Tipo_geo",
                table: "d_19_tipo",
            },
            TIPOLOGIA,
            FASE,
            LayerDomain {
                target: "Verso_txt",
                source: "Verso",
                table: "d_verso",
            },
            LayerDomain {
                target: "Asimm_txt",
                source: "Asimmetria",
                table: "d_asimmetria",
            },
        ],
        fixed_values: &[],
        auxiliary: &[],
        sommerso: None,
    },
    LayerSpec {
        id: "ST018Polygon",
        patterns: &["ST018Polygon", "main.ST018Polygon"],
        geometry_type: GeometryType::Polygon,
        profile: "geologia_poligoni",
        output: "geologia_poligoni",
        id_field: Some("Pol_Uc"),
        renames: &[
            keep("Pol_Uc"),
            keep("Uc_Lege"),
            rename("Direzione", &["Direzio", "Direzione"]),
            keep("Uq_Car"),
            keep("Id_Tess"),
        ],
        domains: &[],
        fixed_values: &[],
        auxiliary: &[
            AuxiliaryJoin {
                table: "T0180801000",
                key_field: "Uq_Car",
                key_column: "Uq_Car",
                columns: &[
                    AuxiliaryColumn {
                        target: "Tipo_UQ",
                        column: "Tipo",
                        domain: Some("d_1000_tipo"),
                    },
                    AuxiliaryColumn {
                        target: "Stato_UQ",
                        column: "Stato",
                        domain: Some("d_stato"),
                    },
                ],
            },
            AuxiliaryJoin {
                table: "T0180802000",
                key_field: "Uc_Lege",
                key_column: "Uc_Lege",
                columns: &[
                    AuxiliaryColumn {
                        target: "ETA_super",
                        column: "Eta_Sup",
                        domain: Some("d_t2000_eta"),
                    },
                    AuxiliaryColumn {
                        target: "ETA_infer",
                        column: "Eta_Inf",
                        domain: Some("d_t2000_eta"),
                    },
                    AuxiliaryColumn {
                        target: "tipo_ug",
                        column: "S1_Tipo",
                        domain: Some("d_2000_SiglaTipo"),
                    },
                    AuxiliaryColumn {
                        target: "Sigla1",
                        column: "Sigla1",
                        domain: None,
                    },
                    AuxiliaryColumn {
                        target: "Sigla_ug",
                        column: "Sigla_Carta",
                        domain: None,
                    },
                    AuxiliaryColumn {
                        target: "Nome",
                        column: "Nome",
                        domain: None,
                    },
                    AuxiliaryColumn {
                        target: "Legenda",
                        column: "Legenda",
                        domain: None,
                    },
                ],
            },
            AuxiliaryJoin {
                table: "T0180803000",
                key_field: "Id_Tess",
                key_column: "Id_Tess",
                columns: &[AuxiliaryColumn {
                    target: "Tessitura",
                    column: "Tessitura",
                    domain: Some("d_t3000"),
                }],
            },
        ],
        sommerso: Some(SommersoRule {
            source: "Sommerso",
            target: "Sommerso_",
        }),
    },
];

pub const MERGE_GROUPS: &[MergeGroup] = &[MergeGroup {
    output: "geologia_linee",
    members: &["ST018Polyline", "ST021Polyline"],
}];

pub fn layer_spec(id: &str) -> Result<&'static LayerSpec, StandardsError> {
    LAYER_SPECS
        .iter()
        .find(|spec| spec.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| StandardsError::UnknownLayer(id.to_string()))
}

pub fn merge_group_for(output: &str) -> Option<&'static MergeGroup> {
    MERGE_GROUPS.iter().find(|group| group.output == output)
}
