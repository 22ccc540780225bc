//! "Medidas": areas, each saved together with its unit.

use super::FieldSpec;

const METRO_QUADRADO: &str = "m²";

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::decimal("areaConstruida", "area_construida").in_group("areaConstruida"),
    FieldSpec::text("unidadeMedidaAreaConstruida", "unidade_medida_area_construida")
        .in_group("areaConstruida")
        .with_default(METRO_QUADRADO),
    FieldSpec::decimal("areaPrivativa", "area_privativa").in_group("areaPrivativa"),
    FieldSpec::text("unidadeMedidaAreaPrivativa", "unidade_medida_area_privativa")
        .in_group("areaPrivativa")
        .with_default(METRO_QUADRADO),
    FieldSpec::decimal("areaTotal", "area_total").in_group("areaTotal"),
    FieldSpec::text("unidadeMedidaAreaTotal", "unidade_medida_area_total")
        .in_group("areaTotal")
        .with_default(METRO_QUADRADO),
    FieldSpec::decimal("areaTerreno", "area_terreno").in_group("areaTerreno"),
    FieldSpec::text("unidadeMedidaAreaTerreno", "unidade_medida_area_terreno")
        .in_group("areaTerreno")
        .with_default(METRO_QUADRADO),
    FieldSpec::decimal("frente", "frente"),
    FieldSpec::decimal("fundos", "fundos"),
];
