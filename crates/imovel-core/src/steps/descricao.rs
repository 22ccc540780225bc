//! "Descrição": listing title and free text.

use super::FieldSpec;

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("tituloAnuncio", "titulo_anuncio"),
    FieldSpec::text("descricao", "descricao"),
];
