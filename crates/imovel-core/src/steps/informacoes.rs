//! "Informações": identification and classification of the property.

use super::FieldSpec;

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("tipo", "tipo"),
    FieldSpec::text("subtipo", "subtipo"),
    FieldSpec::text("finalidade", "finalidade"),
    FieldSpec::text("titulo", "titulo"),
    FieldSpec::text("codigoReferencia", "codigo_referencia"),
    FieldSpec::integer("proprietarioId", "proprietario_id"),
    FieldSpec::integer("condominioId", "condominio_id"),
    FieldSpec::text("situacao", "situacao"),
    FieldSpec::integer("anoConstrucao", "ano_construcao"),
];
